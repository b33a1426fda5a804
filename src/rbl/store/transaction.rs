use super::{CasOutcome, RoomStore, StoreError, Versioned};

use crate::ids::RoomCode;
use crate::models::Room;
use crate::Result;

/// Runs `mutate` as one atomic read-modify-write of a room.
///
/// The room is read with its version, `mutate` edits a private copy, and the
/// copy is swapped in only if no other writer committed in between. On a
/// conflict the latest value is re-read and `mutate` runs again, so it must
/// derive everything from the room it is given. An error from `mutate` aborts
/// the whole thing and leaves the stored room untouched.
pub fn run_transaction<S, T, F>(
    store: &S,
    code: &RoomCode,
    max_attempts: usize,
    mut mutate: F,
) -> Result<(T, Versioned<Room>)>
where
    S: RoomStore + ?Sized,
    F: FnMut(&mut Room) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let current = store
            .read(code)?
            .ok_or_else(|| StoreError::RoomNotFound(code.clone()))?;

        let mut room = current.value;
        let output = mutate(&mut room)?;

        match store.compare_and_swap(code, Some(current.version), Some(room.clone()))? {
            CasOutcome::Committed(version) => {
                log::debug!("Committed room {code} at version {version} (attempt {attempt})");
                return Ok((output, Versioned { version, value: room }));
            }
            CasOutcome::Conflict => {
                log::debug!("Room {code} changed under attempt {attempt}/{max_attempts}, retrying");
            }
        }
    }

    log::warn!("Giving up on room {code} after {max_attempts} conflicting attempts");
    Err(StoreError::Conflict(code.clone(), max_attempts).into())
}

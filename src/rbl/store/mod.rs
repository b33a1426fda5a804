mod memory_store;
mod path;
mod subscription;
mod transaction;

pub use memory_store::MemoryStore;
pub use path::StorePath;
pub use subscription::Subscription;
pub use transaction::run_transaction;

use crate::ids::{PlayerId, RoomCode};
use crate::models::{Room, RoomStatus};
use crate::Result;

use thiserror::Error;

/// Per-room counter bumped by every committed write
pub type Version = u64;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomCode),

    #[error("Transaction conflict on room {0}: gave up after {1} attempts")]
    Conflict(RoomCode, usize),

    #[error("Room store is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: Version,
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Committed(Version),

    /// Another writer committed first; re-read and re-apply
    Conflict,
}

/// Unconditional last-writer-wins write of one subtree of a room
#[derive(Debug, Clone, PartialEq)]
pub enum SubtreeWrite {
    SetStatus(RoomStatus),
    RemovePlayer(PlayerId),
    ClearTransactions,
    DeleteRoom,
}

impl SubtreeWrite {
    pub fn path(&self, code: &RoomCode) -> StorePath {
        match self {
            Self::SetStatus(_) => StorePath::Status(code.clone()),
            Self::RemovePlayer(id) => StorePath::Player(code.clone(), id.clone()),
            Self::ClearTransactions => StorePath::Transactions(code.clone()),
            Self::DeleteRoom => StorePath::Room(code.clone()),
        }
    }

    /// Applies the write to a room document, returns false when nothing changed
    pub fn apply(self, room: &mut Room) -> bool {
        match self {
            Self::SetStatus(status) => {
                let changed = room.info.status != status;
                room.info.status = status;
                changed
            }
            Self::RemovePlayer(id) => room.players.remove(&id).is_some(),
            Self::ClearTransactions => {
                let changed = !room.transactions.is_empty();
                room.transactions.clear();
                changed
            }
            // Handled by the store itself
            Self::DeleteRoom => false,
        }
    }
}

/// A realtime document store holding one versioned document per room.
///
/// Implementations must be safe to share between threads: every method may be
/// called concurrently, and `compare_and_swap` must be atomic per room.
pub trait RoomStore: Send + Sync {
    fn read(&self, code: &RoomCode) -> Result<Option<Versioned<Room>>>;

    fn exists(&self, code: &RoomCode) -> Result<bool> {
        return Ok(self.read(code)?.is_some());
    }

    /// Replaces the whole room document (`None` deletes it) only if the stored
    /// version still equals `expected`, where `None` expects the room to be absent
    fn compare_and_swap(
        &self,
        code: &RoomCode,
        expected: Option<Version>,
        room: Option<Room>,
    ) -> Result<CasOutcome>;

    /// Writes one subtree without a version check. Returns the new version,
    /// or `None` when the room does not exist and nothing was written
    fn write(&self, code: &RoomCode, write: SubtreeWrite) -> Result<Option<Version>>;

    /// Pushes the current value immediately and then every committed change
    fn subscribe(&self, code: &RoomCode) -> Result<Subscription>;
}

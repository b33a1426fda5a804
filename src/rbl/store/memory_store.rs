use super::{CasOutcome, RoomStore, StoreError, StorePath, Subscription, SubtreeWrite, Version, Versioned};

use crate::ids::RoomCode;
use crate::models::Room;
use crate::Result;

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Debug, Default)]
struct Slot {
    version: Version,
    room: Option<Room>,
}

#[derive(Debug, Default)]
struct Inner {
    rooms: HashMap<RoomCode, Slot>,
    subscribers: HashMap<RoomCode, Vec<(u64, Sender<Option<Room>>)>>,
    next_subscriber_id: u64,
}

impl Inner {
    /// Commits `room` to the slot, bumping its version, and pushes it to subscribers
    fn commit(&mut self, code: &RoomCode, room: Option<Room>) -> Version {
        let slot = self.rooms.entry(code.clone()).or_default();
        slot.version += 1;
        slot.room = room;

        let version = slot.version;
        let snapshot = slot.room.clone();

        self.publish(code, snapshot);

        version
    }

    fn publish(&mut self, code: &RoomCode, snapshot: Option<Room>) {
        if let Some(senders) = self.subscribers.get_mut(code) {
            // Receivers that hung up without dropping their handle are pruned here
            senders.retain(|(_, sender)| sender.send(snapshot.clone()).is_ok());
        }
    }

    /// Drops subscriber `id`, and the room's entry with it once nobody is left
    fn unsubscribe(&mut self, code: &RoomCode, id: u64) {
        let Some(senders) = self.subscribers.get_mut(code) else {
            return;
        };

        senders.retain(|(sub_id, _)| *sub_id != id);

        if senders.is_empty() {
            self.subscribers.remove(code);
        }
    }
}

/// In-process `RoomStore` keeping every room as a versioned document.
///
/// Cloning is cheap and clones share the same data, so one store can serve many
/// simulated clients across threads.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;

        return Ok(guard);
    }

    /// Number of rooms currently stored
    pub fn room_count(&self) -> Result<usize> {
        let inner = self.lock()?;
        return Ok(inner.rooms.values().filter(|slot| slot.room.is_some()).count());
    }
}

impl RoomStore for MemoryStore {
    fn read(&self, code: &RoomCode) -> Result<Option<Versioned<Room>>> {
        let inner = self.lock()?;

        let versioned = inner.rooms.get(code).and_then(|slot| {
            slot.room.as_ref().map(|room| Versioned {
                version: slot.version,
                value: room.clone(),
            })
        });

        return Ok(versioned);
    }

    fn compare_and_swap(
        &self,
        code: &RoomCode,
        expected: Option<Version>,
        room: Option<Room>,
    ) -> Result<CasOutcome> {
        let mut inner = self.lock()?;

        let current = inner
            .rooms
            .get(code)
            .and_then(|slot| slot.room.as_ref().map(|_| slot.version));

        if current != expected {
            log::debug!(
                "CAS conflict on {}: expected {expected:?}, found {current:?}",
                StorePath::Room(code.clone())
            );
            return Ok(CasOutcome::Conflict);
        }

        let version = inner.commit(code, room);

        return Ok(CasOutcome::Committed(version));
    }

    fn write(&self, code: &RoomCode, write: SubtreeWrite) -> Result<Option<Version>> {
        let mut inner = self.lock()?;
        let path = write.path(code);

        let Some(slot) = inner.rooms.get(code) else {
            log::debug!("Skipping write to {path}: room does not exist");
            return Ok(None);
        };
        let Some(room) = slot.room.as_ref() else {
            log::debug!("Skipping write to {path}: room does not exist");
            return Ok(None);
        };

        if write == SubtreeWrite::DeleteRoom {
            log::debug!("Deleting {path}");
            return Ok(Some(inner.commit(code, None)));
        }

        let mut room = room.clone();
        let version = slot.version;

        if !write.apply(&mut room) {
            log::debug!("Write to {path} changed nothing");
            return Ok(Some(version));
        }

        log::debug!("Writing {path}");

        return Ok(Some(inner.commit(code, Some(room))));
    }

    fn subscribe(&self, code: &RoomCode) -> Result<Subscription> {
        let mut inner = self.lock()?;

        let (sender, receiver) = mpsc::channel();

        let current = inner.rooms.get(code).and_then(|slot| slot.room.clone());
        // Receiver is alive, so the initial push cannot fail
        let _ = sender.send(current);

        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.entry(code.clone()).or_default().push((id, sender));

        log::debug!("Subscriber {id} watching {}", StorePath::Room(code.clone()));

        let registry: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let watched = code.clone();

        return Ok(Subscription::new(code.clone(), receiver, move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            // Best effort: a poisoned store has nothing left to notify
            let Ok(mut inner) = registry.lock() else {
                return;
            };
            inner.unsubscribe(&watched, id);
        }));
    }
}

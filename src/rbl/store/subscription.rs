use crate::ids::RoomCode;
use crate::models::Room;

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Live feed of room snapshots; `None` means the room was deleted.
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    code: RoomCode,
    receiver: Receiver<Option<Room>>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        code: RoomCode,
        receiver: Receiver<Option<Room>>,
        on_drop: impl FnOnce() + Send + 'static,
    ) -> Self {
        return Self {
            code,
            receiver,
            on_drop: Some(Box::new(on_drop)),
        };
    }

    pub fn room_code(&self) -> &RoomCode {
        &self.code
    }

    /// Next pending snapshot without blocking
    pub fn try_next(&self) -> Option<Option<Room>> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<Option<Room>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drains everything pending and returns the most recent snapshot
    pub fn latest(&self) -> Option<Option<Room>> {
        let mut latest = None;
        while let Some(snapshot) = self.try_next() {
            latest = Some(snapshot);
        }
        latest
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            log::debug!("Unsubscribing from room {}", self.code);
            on_drop();
        }
    }
}

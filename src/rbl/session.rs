use crate::ids::{PlayerId, RoomCode};
use crate::store::RoomStore;
use crate::Result;

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;

use serde::{Deserialize, Serialize};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Couldn't read session file {0:?}")]
    Read(PathBuf),

    #[error("Couldn't write session file {0:?}")]
    Write(PathBuf),

    #[error("Session file {0:?} is corrupt")]
    Corrupt(PathBuf),
}

/// Who this client is: which room, which player, and whether it acts as the bank
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub room_code: RoomCode,
    pub player_id: PlayerId,
    pub is_bank: bool,
}

/// Client-local persisted session, one JSON file per client
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        return Self {
            path: path.as_ref().to_path_buf(),
        };
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result {
        let json = serde_json::to_string_pretty(session)?;

        fs::write(&self.path, json).with_context(|| SessionError::Write(self.path.clone()))?;

        log::debug!("Saved session for room {} to {:?}", session.room_code, self.path);

        return Ok(());
    }

    pub fn load(&self) -> Result<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => Err(e).with_context(|| SessionError::Read(self.path.clone()))?,
        };

        let session = serde_json::from_str(&json).with_context(|| SessionError::Corrupt(self.path.clone()))?;

        return Ok(Some(session));
    }

    /// Forgets the session; clearing an absent file is fine
    pub fn clear(&self) -> Result {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => Err(e).with_context(|| SessionError::Write(self.path.clone()))?,
        }

        log::debug!("Cleared session at {:?}", self.path);

        return Ok(());
    }

    /// Loads the stored session and checks it still points at a live room and a
    /// player that has not been removed. Stale or corrupt sessions are cleared.
    pub fn restore(&self, store: &dyn RoomStore) -> Result<Option<Session>> {
        let session = match self.load() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(e) if e.downcast_ref::<SessionError>().is_some() => {
                log::warn!("{e:#}");
                self.clear()?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let still_seated = match store.read(&session.room_code)? {
            Some(room) => room.value.players.contains_key(&session.player_id),
            None => false,
        };

        if !still_seated {
            log::debug!("Session for room {} is stale, clearing", session.room_code);
            self.clear()?;
            return Ok(None);
        }

        return Ok(Some(session));
    }
}

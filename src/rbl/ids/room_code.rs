use crate::Result;

use std::fmt;

use rand::Rng;

use serde::{Deserialize, Serialize};

use thiserror::Error;

pub const ROOM_CODE_LEN: usize = 6;
pub const ROOM_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Error, Debug, PartialEq)]
pub enum RoomCodeError {
    #[error("Room code must be {ROOM_CODE_LEN} characters, got {0:?}")]
    Length(String),

    #[error("Room code may only contain A-Z and 0-9, got {0:?}")]
    Alphabet(String),
}

/// Six character room identifier drawn from `ROOM_CODE_ALPHABET`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalises user input (trim + upper-case) and checks length and alphabet
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim().to_uppercase();

        if code.chars().count() != ROOM_CODE_LEN {
            Err(RoomCodeError::Length(code.clone()))?
        }

        if !code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)) {
            Err(RoomCodeError::Alphabet(code.clone()))?
        }

        return Ok(Self(code));
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();

        return Self(code);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

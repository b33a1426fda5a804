use crate::ids::{PlayerId, RoomCode, TransactionId};

use std::fmt;

/// Location of a node in the `rooms/` tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorePath {
    Room(RoomCode),
    Info(RoomCode),
    Status(RoomCode),
    Player(RoomCode, PlayerId),
    Transactions(RoomCode),
    Transaction(RoomCode, TransactionId),
}

impl StorePath {
    pub fn room_code(&self) -> &RoomCode {
        match self {
            Self::Room(code)
            | Self::Info(code)
            | Self::Status(code)
            | Self::Player(code, _)
            | Self::Transactions(code)
            | Self::Transaction(code, _) => code,
        }
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Room(code) => write!(f, "rooms/{code}"),
            Self::Info(code) => write!(f, "rooms/{code}/info"),
            Self::Status(code) => write!(f, "rooms/{code}/info/status"),
            Self::Player(code, id) => write!(f, "rooms/{code}/players/{id}"),
            Self::Transactions(code) => write!(f, "rooms/{code}/transactions"),
            Self::Transaction(code, id) => write!(f, "rooms/{code}/transactions/{id}"),
        }
    }
}

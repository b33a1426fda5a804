mod player;
mod room;
mod transaction;

pub use player::{Player, BANK_COLOR, PLAYER_COLORS};
pub use room::{Room, RoomInfo, RoomStatus};
pub use transaction::{Transaction, TransactionStatus, TransactionType};

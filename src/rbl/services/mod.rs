mod ledger_service;
mod room_service;

pub use ledger_service::{LedgerService, TransferReceipt};
pub use room_service::{RoomError, RoomService};

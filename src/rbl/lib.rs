pub mod clock;
pub mod config;
pub mod ids;
pub mod input;
pub mod ledger;
pub mod models;
mod money;
pub mod reports;
mod result;
pub mod services;
pub mod session;
pub mod store;
pub mod validation;

pub use config::LedgerConfig;
pub use money::{Money, MoneyError};
pub use result::Result;

use std::sync::Arc;

/// Room lifecycle and ledger services sharing one store
pub struct BankServices {
    pub rooms: services::RoomService,
    pub ledger: services::LedgerService,
}

pub fn build_services(store: Arc<dyn store::RoomStore>, config: LedgerConfig) -> BankServices {
    let rooms = services::RoomService::new(store.clone(), config.clone());
    let ledger = services::LedgerService::new(store, config);

    return BankServices { rooms, ledger };
}

/// Services over a fresh in-memory store with default settings
pub fn build_memory_services() -> BankServices {
    return build_services(Arc::new(store::MemoryStore::new()), LedgerConfig::default());
}

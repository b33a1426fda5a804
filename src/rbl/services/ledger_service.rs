use crate::clock;
use crate::config::LedgerConfig;
use crate::ids::{PlayerId, RoomCode, TransactionId};
use crate::ledger::{apply_balance_set, apply_transfer, Transfer};
use crate::models::Transaction;
use crate::store::{run_transaction, RoomStore, StorePath, Version};
use crate::validation::validate_amount;
use crate::{Money, Result};

use std::sync::Arc;

/// What a committed ledger mutation appended, and the room version it landed in
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub id: TransactionId,
    pub transaction: Transaction,
    pub version: Version,
}

/// Moves money between players of a room, one atomic room mutation per call
pub struct LedgerService {
    store: Arc<dyn RoomStore>,
    config: LedgerConfig,
}

impl LedgerService {
    pub fn new(store: Arc<dyn RoomStore>, config: LedgerConfig) -> Self {
        return Self { store, config };
    }

    /// Debits the sender, credits the receiver and appends the record, all or nothing.
    ///
    /// The amount is checked before the store is touched; missing players and
    /// insufficient funds abort the mutation against whatever the latest room is.
    pub fn transfer(&self, code: &RoomCode, transfer: Transfer) -> Result<TransferReceipt> {
        validate_amount(transfer.amount)?;

        log::debug!("Applying transfer to room {code}: {transfer:?}");

        let ((id, transaction), committed) = run_transaction(&*self.store, code, self.config.max_attempts, |room| {
            let timestamp = clock::now_millis();
            let id = TransactionId::generate(&mut rand::thread_rng(), timestamp);

            let transaction = apply_transfer(room, &transfer, id.clone(), timestamp)?;

            Ok((id, transaction))
        })?;

        log::debug!(
            "Wrote {} at version {}",
            StorePath::Transaction(code.clone(), id.clone()),
            committed.version
        );

        return Ok(TransferReceipt {
            id,
            transaction,
            version: committed.version,
        });
    }

    /// Bank-only: overwrites `player_id`'s balance with `balance` and records a
    /// `bank-transfer`, in the same atomic mutation
    pub fn bank_transfer(
        &self,
        code: &RoomCode,
        bank_id: &PlayerId,
        player_id: &PlayerId,
        balance: Money,
    ) -> Result<TransferReceipt> {
        validate_amount(balance)?;

        log::debug!("Bank {bank_id} setting balance of {player_id} in room {code} to {balance}");

        let ((id, transaction), committed) = run_transaction(&*self.store, code, self.config.max_attempts, |room| {
            let timestamp = clock::now_millis();
            let id = TransactionId::generate(&mut rand::thread_rng(), timestamp);

            let transaction = apply_balance_set(room, bank_id, player_id, balance, id.clone(), timestamp)?;

            Ok((id, transaction))
        })?;

        log::debug!(
            "Wrote {} at version {}",
            StorePath::Player(code.clone(), player_id.clone()),
            committed.version
        );

        return Ok(TransferReceipt {
            id,
            transaction,
            version: committed.version,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ledger::LedgerError;
    use crate::models::TransactionType;
    use crate::services::RoomService;
    use crate::session::Session;
    use crate::store::{MemoryStore, StoreError};
    use crate::validation::ValidationError;

    struct Table {
        rooms: RoomService,
        ledger: LedgerService,
        bank: Session,
        ann: Session,
        bob: Session,
    }

    /// Bank plus Ann (1500) and Bob (1500)
    fn build_table() -> Table {
        let store: Arc<dyn RoomStore> = Arc::new(MemoryStore::new());
        let rooms = RoomService::new(store.clone(), LedgerConfig::default());
        let ledger = LedgerService::new(store, LedgerConfig::default());

        let bank = rooms.create_room("Bank", Money(1500)).unwrap();
        let ann = rooms.join_room(bank.room_code.as_str(), "Ann", None).unwrap();
        let bob = rooms.join_room(bank.room_code.as_str(), "Bob", None).unwrap();

        Table {
            rooms,
            ledger,
            bank,
            ann,
            bob,
        }
    }

    fn money_of(table: &Table, session: &Session) -> Money {
        table
            .rooms
            .get_room(&session.room_code)
            .unwrap()
            .player(&session.player_id)
            .unwrap()
            .money
    }

    #[test]
    fn transfer_commits() {
        let table = build_table();
        let code = &table.bank.room_code;

        let receipt = table
            .ledger
            .transfer(
                code,
                Transfer::new(TransactionType::Rent, table.ann.player_id.clone(), table.bob.player_id.clone(), Money(200))
                    .with_concept("Park Place"),
            )
            .unwrap();

        assert_eq!(money_of(&table, &table.ann), Money(1300));
        assert_eq!(money_of(&table, &table.bob), Money(1700));

        let room = table.rooms.get_room(code).unwrap();
        assert_eq!(room.transactions.len(), 1);
        assert_eq!(room.transactions[&receipt.id], receipt.transaction);
        assert_eq!(receipt.transaction.tx_type, TransactionType::Rent);
        assert_eq!(receipt.transaction.concept.as_deref(), Some("Park Place"));
    }

    #[test]
    fn invalid_amount_never_reaches_store() {
        let table = build_table();
        let code = &table.bank.room_code;
        let subscription = table.rooms.watch_room(code).unwrap();
        subscription.latest();

        let err = table
            .ledger
            .transfer(
                code,
                Transfer::new(TransactionType::Rent, table.ann.player_id.clone(), table.bob.player_id.clone(), Money(0)),
            )
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::InvalidAmount(Money(0)))
        );
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn insufficient_funds_records_nothing() {
        let table = build_table();
        let code = &table.bank.room_code;
        let before = table.rooms.get_room(code).unwrap();

        let err = table
            .ledger
            .transfer(
                code,
                Transfer::new(TransactionType::Rent, table.ann.player_id.clone(), table.bob.player_id.clone(), Money(1501)),
            )
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(table.rooms.get_room(code).unwrap(), before);
    }

    #[test]
    fn unknown_player() {
        let table = build_table();
        let code = &table.bank.room_code;
        let ghost = PlayerId::from("ghost");

        let err = table
            .ledger
            .transfer(code, Transfer::new(TransactionType::Rent, ghost.clone(), table.bob.player_id.clone(), Money(1)))
            .unwrap_err();

        assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::PlayerNotFound(ghost)));
        assert!(table.rooms.get_room(code).unwrap().transactions.is_empty());
    }

    #[test]
    fn removed_player_cannot_be_paid() {
        let table = build_table();
        let code = &table.bank.room_code;

        table.rooms.remove_player(code, &table.bob.player_id).unwrap();

        let err = table
            .ledger
            .transfer(
                code,
                Transfer::new(TransactionType::Rent, table.ann.player_id.clone(), table.bob.player_id.clone(), Money(1)),
            )
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<LedgerError>(),
            Some(&LedgerError::PlayerNotFound(table.bob.player_id.clone()))
        );
    }

    #[test]
    fn missing_room() {
        let table = build_table();
        let code = RoomCode::parse("NOROOM").unwrap();

        let err = table
            .ledger
            .transfer(
                &code,
                Transfer::new(TransactionType::Rent, table.ann.player_id.clone(), table.bob.player_id.clone(), Money(1)),
            )
            .unwrap_err();

        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::RoomNotFound(code)));
    }

    #[test]
    fn bank_salary() {
        let table = build_table();

        table
            .ledger
            .transfer(
                &table.bank.room_code,
                Transfer::new(TransactionType::Salary, table.bank.player_id.clone(), table.ann.player_id.clone(), Money(200)),
            )
            .unwrap();

        assert_eq!(money_of(&table, &table.ann), Money(1700));
        assert_eq!(money_of(&table, &table.bank), Money::ZERO);
    }

    #[test]
    fn bank_transfer_sets_balance() {
        let table = build_table();
        let code = &table.bank.room_code;

        let receipt = table
            .ledger
            .bank_transfer(code, &table.bank.player_id, &table.ann.player_id, Money(42))
            .unwrap();

        assert_eq!(money_of(&table, &table.ann), Money(42));
        assert_eq!(receipt.transaction.tx_type, TransactionType::BankTransfer);
        assert_eq!(receipt.transaction.amount, Money(42));
        assert_eq!(table.rooms.get_room(code).unwrap().transactions.len(), 1);
    }

    #[test]
    fn bank_transfer_by_player_is_rejected() {
        let table = build_table();

        let err = table
            .ledger
            .bank_transfer(&table.bank.room_code, &table.bob.player_id, &table.ann.player_id, Money(42))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<LedgerError>(),
            Some(&LedgerError::NotBank(table.bob.player_id.clone()))
        );
        assert_eq!(money_of(&table, &table.ann), Money(1500));
    }

    #[test]
    fn cleared_history_keeps_balances() {
        let table = build_table();
        let code = &table.bank.room_code;

        table
            .ledger
            .transfer(
                code,
                Transfer::new(TransactionType::Fine, table.ann.player_id.clone(), table.bank.player_id.clone(), Money(50)),
            )
            .unwrap();
        table.rooms.clear_history(code).unwrap();

        let room = table.rooms.get_room(code).unwrap();
        assert!(room.transactions.is_empty());
        assert_eq!(money_of(&table, &table.ann), Money(1450));
    }
}

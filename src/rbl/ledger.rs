use crate::ids::{PlayerId, TransactionId};
use crate::models::{Room, Transaction, TransactionStatus, TransactionType};
use crate::{Money, Result};

use thiserror::Error;

/// Domain errors raised from inside an atomic room mutation; any of them
/// aborts the mutation and the stored room keeps its prior value
#[derive(Error, Debug, PartialEq)]
pub enum LedgerError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Insufficient funds: player {player} has {balance} but needs {amount}")]
    InsufficientFunds {
        player: PlayerId,
        balance: Money,
        amount: Money,
    },

    #[error("Player {0} is not the bank of this room")]
    NotBank(PlayerId),

    #[error("The bank's balance cannot be set directly")]
    BankBalance,

    #[error("Transaction id already used: {0}")]
    DuplicateTransaction(TransactionId),
}

/// A requested peer-to-peer (or bank-to-player) movement of money
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub tx_type: TransactionType,
    pub from: PlayerId,
    pub to: PlayerId,
    pub amount: Money,
    pub concept: Option<String>,
}

impl Transfer {
    pub fn new(tx_type: TransactionType, from: PlayerId, to: PlayerId, amount: Money) -> Self {
        return Self {
            tx_type,
            from,
            to,
            amount,
            concept: None,
        };
    }

    /// Blank concepts are dropped
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        let concept = concept.into();
        let concept = concept.trim();

        self.concept = if concept.is_empty() {
            None
        } else {
            Some(concept.to_string())
        };

        self
    }
}

/// Applies a transfer to `room`: both players must exist, a non-bank sender must
/// cover the amount, the bank's balance never moves, and exactly one
/// transaction is appended under `tx_id`.
///
/// The room is only modified once every check has passed.
pub fn apply_transfer(
    room: &mut Room,
    transfer: &Transfer,
    tx_id: TransactionId,
    timestamp: u64,
) -> Result<Transaction> {
    let sender = room
        .player(&transfer.from)
        .ok_or_else(|| LedgerError::PlayerNotFound(transfer.from.clone()))?;
    let receiver = room
        .player(&transfer.to)
        .ok_or_else(|| LedgerError::PlayerNotFound(transfer.to.clone()))?;

    if !sender.is_bank && sender.money < transfer.amount {
        Err(LedgerError::InsufficientFunds {
            player: transfer.from.clone(),
            balance: sender.money,
            amount: transfer.amount,
        })?
    }

    if room.transactions.contains_key(&tx_id) {
        Err(LedgerError::DuplicateTransaction(tx_id.clone()))?
    }

    let transaction = Transaction {
        tx_type: transfer.tx_type,
        from: transfer.from.clone(),
        from_name: sender.name.clone(),
        to: transfer.to.clone(),
        to_name: receiver.name.clone(),
        amount: transfer.amount,
        concept: transfer.concept.clone(),
        timestamp,
        status: TransactionStatus::Completed,
    };

    // Work out both balances before touching the room so an overflow leaves it intact
    let mut balances = vec![];
    if !sender.is_bank {
        balances.push((transfer.from.clone(), sender.money.checked_sub(transfer.amount)?));
    }
    if !receiver.is_bank {
        let start = balances
            .iter()
            .find(|(id, _)| *id == transfer.to)
            .map(|(_, money)| *money)
            .unwrap_or(receiver.money);
        balances.push((transfer.to.clone(), start.checked_add(transfer.amount)?));
    }

    for (id, money) in balances {
        if let Some(player) = room.players.get_mut(&id) {
            player.money = money;
        }
    }

    room.transactions.insert(tx_id, transaction.clone());

    return Ok(transaction);
}

/// Sets a player's balance outright on the bank's authority and records it as a
/// `bank-transfer` whose amount is the new balance. Not zero-sum.
pub fn apply_balance_set(
    room: &mut Room,
    bank_id: &PlayerId,
    player_id: &PlayerId,
    balance: Money,
    tx_id: TransactionId,
    timestamp: u64,
) -> Result<Transaction> {
    let bank = room
        .player(bank_id)
        .ok_or_else(|| LedgerError::PlayerNotFound(bank_id.clone()))?;

    if !bank.is_bank || &room.info.bank_id != bank_id {
        Err(LedgerError::NotBank(bank_id.clone()))?
    }

    let player = room
        .player(player_id)
        .ok_or_else(|| LedgerError::PlayerNotFound(player_id.clone()))?;

    if player.is_bank {
        Err(LedgerError::BankBalance)?
    }

    if room.transactions.contains_key(&tx_id) {
        Err(LedgerError::DuplicateTransaction(tx_id.clone()))?
    }

    let transaction = Transaction {
        tx_type: TransactionType::BankTransfer,
        from: bank_id.clone(),
        from_name: bank.name.clone(),
        to: player_id.clone(),
        to_name: player.name.clone(),
        amount: balance,
        concept: None,
        timestamp,
        status: TransactionStatus::Completed,
    };

    if let Some(player) = room.players.get_mut(player_id) {
        player.money = balance;
    }

    room.transactions.insert(tx_id, transaction.clone());

    return Ok(transaction);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ids::RoomCode;
    use crate::models::{Player, PLAYER_COLORS};

    const SOME_TIMESTAMP: u64 = 1_700_000_000_000;

    fn bank_id() -> PlayerId {
        PlayerId::from("bank")
    }

    fn ann() -> PlayerId {
        PlayerId::from("ann")
    }

    fn bob() -> PlayerId {
        PlayerId::from("bob")
    }

    fn tx_id(id: &str) -> TransactionId {
        TransactionId::from(id)
    }

    /// bank 0, ann 1500, bob 1000
    fn build_room() -> Room {
        let mut room = Room::new(
            RoomCode::parse("ABC123").unwrap(),
            bank_id(),
            "Banker".to_string(),
            Money(1500),
            SOME_TIMESTAMP,
        );
        room.players.insert(
            ann(),
            Player::new("Ann".to_string(), Money(1500), PLAYER_COLORS[0].to_string(), SOME_TIMESTAMP),
        );
        room.players.insert(
            bob(),
            Player::new("Bob".to_string(), Money(1000), PLAYER_COLORS[1].to_string(), SOME_TIMESTAMP),
        );
        room
    }

    fn money_of(room: &Room, id: &PlayerId) -> Money {
        room.player(id).unwrap().money
    }

    #[test]
    fn rent_between_players() {
        let mut room = build_room();
        let transfer = Transfer::new(TransactionType::Rent, ann(), bob(), Money(200)).with_concept("Boardwalk");

        let tx = apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();

        assert_eq!(money_of(&room, &ann()), Money(1300));
        assert_eq!(money_of(&room, &bob()), Money(1200));
        assert_eq!(money_of(&room, &bank_id()), Money(0));

        assert_eq!(room.transactions.len(), 1);
        assert_eq!(room.transactions[&tx_id("t1")], tx);
        assert_eq!(tx.tx_type, TransactionType::Rent);
        assert_eq!(tx.from_name, "Ann");
        assert_eq!(tx.to_name, "Bob");
        assert_eq!(tx.concept.as_deref(), Some("Boardwalk"));
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[test]
    fn player_transfers_are_zero_sum() {
        let mut room = build_room();
        let before = room.circulating_money().unwrap();

        for (idx, amount) in [1, 250, 999, 1500].into_iter().enumerate() {
            let transfer = Transfer::new(TransactionType::OtherExpense, ann(), bob(), Money(amount));
            let _ = apply_transfer(&mut room, &transfer, tx_id(&format!("t{idx}")), SOME_TIMESTAMP);
            assert_eq!(room.circulating_money().unwrap(), before);
        }
    }

    #[test]
    fn bank_pays_without_balance() {
        let mut room = build_room();
        let transfer = Transfer::new(TransactionType::Salary, bank_id(), ann(), Money(200));

        apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();

        assert_eq!(money_of(&room, &ann()), Money(1700));
        assert_eq!(money_of(&room, &bank_id()), Money(0));
    }

    #[test]
    fn bank_receives_without_balance() {
        let mut room = build_room();
        let transfer = Transfer::new(TransactionType::TaxIncome, bob(), bank_id(), Money(1000));

        apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();

        assert_eq!(money_of(&room, &bob()), Money(0));
        assert_eq!(money_of(&room, &bank_id()), Money(0));
    }

    #[test]
    fn insufficient_funds_leaves_room_untouched() {
        let mut room = build_room();
        let before = room.clone();
        let transfer = Transfer::new(TransactionType::Rent, bob(), ann(), Money(1001));

        let err = apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap_err();

        assert_eq!(
            err.downcast_ref::<LedgerError>(),
            Some(&LedgerError::InsufficientFunds {
                player: bob(),
                balance: Money(1000),
                amount: Money(1001),
            })
        );
        assert_eq!(room, before);
    }

    #[test]
    fn negative_balance_can_still_receive() {
        let mut room = build_room();
        room.players.get_mut(&bob()).unwrap().money = Money(-50);

        let transfer = Transfer::new(TransactionType::Rent, ann(), bob(), Money(20));
        apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();
        assert_eq!(money_of(&room, &bob()), Money(-30));

        let transfer = Transfer::new(TransactionType::Rent, bob(), ann(), Money(1));
        assert!(apply_transfer(&mut room, &transfer, tx_id("t2"), SOME_TIMESTAMP).is_err());
    }

    #[test]
    fn unknown_player_leaves_room_untouched() {
        let mut room = build_room();
        let before = room.clone();
        let ghost = PlayerId::from("ghost");

        for transfer in [
            Transfer::new(TransactionType::Rent, ghost.clone(), ann(), Money(1)),
            Transfer::new(TransactionType::Rent, ann(), ghost.clone(), Money(1)),
        ] {
            let err = apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap_err();
            assert_eq!(
                err.downcast_ref::<LedgerError>(),
                Some(&LedgerError::PlayerNotFound(ghost.clone()))
            );
            assert_eq!(room, before);
        }
    }

    #[test]
    fn self_transfer_only_records() {
        let mut room = build_room();
        let transfer = Transfer::new(TransactionType::Fine, ann(), ann(), Money(100));

        apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();

        assert_eq!(money_of(&room, &ann()), Money(1500));
        assert_eq!(room.transactions.len(), 1);
    }

    #[test]
    fn overflow_leaves_room_untouched() {
        let mut room = build_room();
        room.players.get_mut(&bob()).unwrap().money = Money::MAX;
        let before = room.clone();

        let transfer = Transfer::new(TransactionType::Rent, ann(), bob(), Money(1));
        assert!(apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).is_err());
        assert_eq!(room, before);
    }

    #[test]
    fn duplicate_transaction_id() {
        let mut room = build_room();
        let transfer = Transfer::new(TransactionType::Rent, ann(), bob(), Money(1));

        apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap();
        let err = apply_transfer(&mut room, &transfer, tx_id("t1"), SOME_TIMESTAMP).unwrap_err();

        assert_eq!(
            err.downcast_ref::<LedgerError>(),
            Some(&LedgerError::DuplicateTransaction(tx_id("t1")))
        );
        assert_eq!(money_of(&room, &ann()), Money(1499));
    }

    #[test]
    fn blank_concept_is_dropped() {
        let transfer = Transfer::new(TransactionType::Rent, ann(), bob(), Money(1)).with_concept("   ");
        assert_eq!(transfer.concept, None);
    }

    #[test]
    fn balance_set() {
        let mut room = build_room();

        let tx = apply_balance_set(&mut room, &bank_id(), &ann(), Money(50), tx_id("t1"), SOME_TIMESTAMP).unwrap();

        assert_eq!(money_of(&room, &ann()), Money(50));
        assert_eq!(tx.tx_type, TransactionType::BankTransfer);
        assert_eq!(tx.from, bank_id());
        assert_eq!(tx.to, ann());
        assert_eq!(tx.amount, Money(50));
        assert_eq!(room.transactions.len(), 1);
    }

    #[test]
    fn balance_set_requires_bank() {
        let mut room = build_room();
        let before = room.clone();

        let err = apply_balance_set(&mut room, &bob(), &ann(), Money(50), tx_id("t1"), SOME_TIMESTAMP).unwrap_err();
        assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::NotBank(bob())));

        let err = apply_balance_set(&mut room, &bank_id(), &bank_id(), Money(50), tx_id("t1"), SOME_TIMESTAMP)
            .unwrap_err();
        assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::BankBalance));

        let ghost = PlayerId::from("ghost");
        let err = apply_balance_set(&mut room, &bank_id(), &ghost, Money(50), tx_id("t1"), SOME_TIMESTAMP)
            .unwrap_err();
        assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::PlayerNotFound(ghost)));

        assert_eq!(room, before);
    }
}

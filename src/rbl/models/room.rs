use super::{Player, Transaction};

use crate::ids::{PlayerId, RoomCode, TransactionId};
use crate::{Money, Result};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Finished,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub bank_id: PlayerId,
    pub bank_name: String,
    pub created_at: u64,
    pub status: RoomStatus,
    #[serde(default)]
    pub initial_money: Money,
}

/// Whole `rooms/{code}` subtree
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    pub info: RoomInfo,
    #[serde(default)]
    pub players: BTreeMap<PlayerId, Player>,
    #[serde(default)]
    pub transactions: BTreeMap<TransactionId, Transaction>,
}

impl Room {
    /// A fresh active room holding only its bank
    pub fn new(
        code: RoomCode,
        bank_id: PlayerId,
        bank_name: String,
        initial_money: Money,
        created_at: u64,
    ) -> Self {
        let mut players = BTreeMap::new();
        players.insert(bank_id.clone(), Player::bank(bank_name.clone(), created_at));

        return Self {
            code,
            info: RoomInfo {
                bank_id,
                bank_name,
                created_at,
                status: RoomStatus::Active,
                initial_money,
            },
            players,
            transactions: BTreeMap::new(),
        };
    }

    pub fn is_active(&self) -> bool {
        self.info.status == RoomStatus::Active
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn is_bank(&self, id: &PlayerId) -> bool {
        self.player(id).map(|player| player.is_bank).unwrap_or(false)
    }

    /// Stored starting balance, or `default` when it was never set
    pub fn starting_money(&self, default: Money) -> Money {
        if self.info.initial_money.is_positive() {
            self.info.initial_money
        } else {
            default
        }
    }

    /// Non-bank players other than `viewer`, ordered by join time
    pub fn other_players(&self, viewer: &PlayerId) -> Vec<(&PlayerId, &Player)> {
        let mut others: Vec<_> = self
            .players
            .iter()
            .filter(|(id, player)| *id != viewer && !player.is_bank)
            .collect();

        others.sort_by_key(|(id, player)| (player.joined_at, (*id).clone()));
        others
    }

    /// Whole history, newest first
    pub fn history(&self) -> Vec<(&TransactionId, &Transaction)> {
        let mut history: Vec<_> = self.transactions.iter().collect();
        history.sort_by(|(a_id, a), (b_id, b)| b.timestamp.cmp(&a.timestamp).then(b_id.cmp(a_id)));
        history
    }

    /// Transactions sent or received by `player_id`, newest first
    pub fn history_for(&self, player_id: &PlayerId) -> Vec<(&TransactionId, &Transaction)> {
        self.history()
            .into_iter()
            .filter(|(_, tx)| tx.involves(player_id))
            .collect()
    }

    /// Sum of every non-bank balance
    pub fn circulating_money(&self) -> Result<Money> {
        let mut total = Money::ZERO;

        for player in self.players.values().filter(|player| !player.is_bank) {
            total.add(&player.money)?;
        }

        return Ok(total);
    }
}

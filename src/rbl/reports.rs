use crate::ids::PlayerId;
use crate::models::Room;
use crate::{Money, Result};

use serde::{Deserialize, Serialize};

/// Money a player has received and spent over the room's recorded history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub received: Money,
    pub spent: Money,
}

pub fn player_stats(room: &Room, player_id: &PlayerId) -> Result<PlayerStats> {
    let mut stats = PlayerStats::default();

    for tx in room.transactions.values() {
        if &tx.to == player_id {
            stats.received.add(&tx.amount)?;
        }
        if &tx.from == player_id {
            stats.spent.add(&tx.amount)?;
        }
    }

    return Ok(stats);
}

/// One row of the balance report
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlayerReport {
    pub room: String,
    pub player: String,
    pub name: String,
    pub bank: bool,
    pub balance: i64,
    pub received: i64,
    pub spent: i64,
}

impl PlayerReport {
    /// `room_label` and `player_label` name the row; callers pick ids or their own aliases
    pub fn build(room: &Room, player_id: &PlayerId, room_label: &str, player_label: &str) -> Option<Result<Self>> {
        let player = room.player(player_id)?;

        let report = player_stats(room, player_id).map(|stats| Self {
            room: room_label.to_string(),
            player: player_label.to_string(),
            name: player.name.clone(),
            bank: player.is_bank,
            balance: player.money.0,
            received: stats.received.0,
            spent: stats.spent.0,
        });

        Some(report)
    }
}

/// Report rows for every seated player, labelled by room code and player id
pub fn room_report(room: &Room) -> Result<Vec<PlayerReport>> {
    let mut reports = vec![];

    for id in room.players.keys() {
        if let Some(report) = PlayerReport::build(room, id, room.code.as_str(), id.as_str()) {
            reports.push(report?);
        }
    }

    return Ok(reports);
}

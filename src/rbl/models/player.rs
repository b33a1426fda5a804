use crate::Money;

use serde::{Deserialize, Serialize};

pub const BANK_COLOR: &str = "#2c3e50";

/// Colors offered to joining players, in picker order
pub const PLAYER_COLORS: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub money: Money,
    pub is_bank: bool,
    pub color: String,
    pub joined_at: u64,
}

impl Player {
    /// The bank holds no money of its own
    pub fn bank(name: String, joined_at: u64) -> Self {
        return Self {
            name,
            money: Money::ZERO,
            is_bank: true,
            color: BANK_COLOR.to_string(),
            joined_at,
        };
    }

    pub fn new(name: String, money: Money, color: String, joined_at: u64) -> Self {
        return Self {
            name,
            money,
            is_bank: false,
            color,
            joined_at,
        };
    }

    /// Up to two upper-case initials for avatars
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_has_no_money() {
        let bank = Player::bank("Banker".to_string(), 1);

        assert!(bank.is_bank);
        assert_eq!(bank.money, Money::ZERO);
        assert_eq!(bank.color, BANK_COLOR);
    }

    #[test]
    fn initials() {
        let player = Player::new("ana maria lopez".to_string(), Money(1500), PLAYER_COLORS[0].to_string(), 1);
        assert_eq!(player.initials(), "AM");

        let player = Player::new("Bo".to_string(), Money(1500), PLAYER_COLORS[0].to_string(), 1);
        assert_eq!(player.initials(), "B");
    }

    #[test]
    fn serializes_camel_case() {
        let player = Player::new("Ann".to_string(), Money(1500), "#fff".to_string(), 10);
        let json = serde_json::to_value(&player).unwrap();

        assert_eq!(json["isBank"], false);
        assert_eq!(json["joinedAt"], 10);
        assert_eq!(json["money"], 1500);
    }
}

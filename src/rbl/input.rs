use crate::config::DEFAULT_INITIAL_MONEY;
use crate::models::TransactionType;
use crate::{Money, Result};

use serde::Deserialize;

use thiserror::Error;

/// One row of a command script as it deserializes from CSV.
///
/// Rooms and players are named by script-local aliases, since real room codes
/// and player ids are only known once the commands run.
#[derive(Deserialize, Debug, Clone)]
pub struct InputCommand {
    #[serde(rename = "command")]
    pub typ: InputCommandType,

    pub room: String,
    pub player: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InputCommandType {
    Create,
    Join,
    Transfer,
    BankTransfer,
    End,
    Remove,
    Clear,
}

#[derive(Error, Debug)]
pub enum InputParseError {
    #[error("Error parsing input command: {0} missing from {1:?}")]
    MissingField(&'static str, InputCommand),

    #[error("Error parsing input command: unknown category in {0:?}")]
    UnknownCategory(InputCommand),
}

/// Typed command, one variant per lifecycle or ledger operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        room: String,
        bank: String,
        bank_name: String,
        initial_money: Money,
    },
    Join {
        room: String,
        player: String,
        name: String,
    },
    Transfer {
        room: String,
        from: String,
        to: String,
        amount: Money,
        tx_type: TransactionType,
        concept: Option<String>,
    },
    BankTransfer {
        room: String,
        bank: String,
        player: String,
        balance: Money,
    },
    End {
        room: String,
    },
    Remove {
        room: String,
        player: String,
    },
    Clear {
        room: String,
    },
}

impl InputCommand {
    pub fn parse_command(self) -> Result<Command> {
        let room = self.room.clone();

        let command = match self.typ {
            InputCommandType::Create => {
                let bank = self.required("player", &self.player)?;
                let bank_name = self.note.clone().unwrap_or_else(|| bank.clone());
                let initial_money = match &self.amount {
                    Some(amount) => Money::parse(amount)?,
                    None => DEFAULT_INITIAL_MONEY,
                };

                Command::Create {
                    room,
                    bank,
                    bank_name,
                    initial_money,
                }
            }
            InputCommandType::Join => {
                let player = self.required("player", &self.player)?;
                let name = self.note.clone().unwrap_or_else(|| player.clone());

                Command::Join { room, player, name }
            }
            InputCommandType::Transfer => {
                let from = self.required("player", &self.player)?;
                let to = self.required("counterparty", &self.counterparty)?;
                let amount = Money::parse(&self.required("amount", &self.amount)?)?;
                let tx_type = self
                    .required("category", &self.category)?
                    .parse::<TransactionType>()
                    .map_err(|_| InputParseError::UnknownCategory(self.clone()))?;

                Command::Transfer {
                    room,
                    from,
                    to,
                    amount,
                    tx_type,
                    concept: self.note.clone(),
                }
            }
            InputCommandType::BankTransfer => Command::BankTransfer {
                room,
                bank: self.required("player", &self.player)?,
                player: self.required("counterparty", &self.counterparty)?,
                balance: Money::parse(&self.required("amount", &self.amount)?)?,
            },
            InputCommandType::End => Command::End { room },
            InputCommandType::Remove => Command::Remove {
                room,
                player: self.required("player", &self.player)?,
            },
            InputCommandType::Clear => Command::Clear { room },
        };

        Ok(command)
    }

    fn required(&self, field: &'static str, value: &Option<String>) -> Result<String> {
        let value = value
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| InputParseError::MissingField(field, self.clone()))?;

        return Ok(value);
    }
}

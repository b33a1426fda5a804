use rbl::ids::{PlayerId, RoomCode};
use rbl::input::Command;
use rbl::ledger::Transfer;
use rbl::reports::PlayerReport;
use rbl::{BankServices, Result};

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Unknown room alias: {0}")]
    UnknownRoom(String),

    #[error("Unknown player alias {1} in room {0}")]
    UnknownPlayer(String, String),

    #[error("Alias already in use: {0}")]
    DuplicateAlias(String),
}

/// Runs script commands against the services, translating aliases to real codes and ids
pub struct Replay {
    services: BankServices,
    rooms: BTreeMap<String, RoomCode>,
    players: BTreeMap<(String, String), PlayerId>,
}

impl Replay {
    pub fn new(services: BankServices) -> Self {
        return Self {
            services,
            rooms: BTreeMap::new(),
            players: BTreeMap::new(),
        };
    }

    pub fn apply(&mut self, command: Command) -> Result {
        match command {
            Command::Create {
                room,
                bank,
                bank_name,
                initial_money,
            } => {
                if self.rooms.contains_key(&room) {
                    Err(ReplayError::DuplicateAlias(room.clone()))?
                }

                let session = self.services.rooms.create_room(&bank_name, initial_money)?;
                log::debug!("Room alias {room} is {}", session.room_code);

                self.players.insert((room.clone(), bank), session.player_id);
                self.rooms.insert(room, session.room_code);
            }
            Command::Join { room, player, name } => {
                let code = self.room_code(&room)?.clone();

                if self.players.contains_key(&(room.clone(), player.clone())) {
                    Err(ReplayError::DuplicateAlias(player.clone()))?
                }

                let session = self.services.rooms.join_room(code.as_str(), &name, None)?;
                self.players.insert((room, player), session.player_id);
            }
            Command::Transfer {
                room,
                from,
                to,
                amount,
                tx_type,
                concept,
            } => {
                let code = self.room_code(&room)?.clone();
                let from = self.player_id(&room, &from)?.clone();
                let to = self.player_id(&room, &to)?.clone();

                let mut transfer = Transfer::new(tx_type, from, to, amount);
                if let Some(concept) = concept {
                    transfer = transfer.with_concept(concept);
                }

                let receipt = self.services.ledger.transfer(&code, transfer)?;
                log::debug!("Recorded {} as {}", receipt.transaction.tx_type, receipt.id);
            }
            Command::BankTransfer {
                room,
                bank,
                player,
                balance,
            } => {
                let code = self.room_code(&room)?.clone();
                let bank = self.player_id(&room, &bank)?.clone();
                let player = self.player_id(&room, &player)?.clone();

                self.services.ledger.bank_transfer(&code, &bank, &player, balance)?;
            }
            Command::End { room } => {
                let code = self.room_code(&room)?.clone();
                self.services.rooms.end_room(&code)?;
            }
            Command::Remove { room, player } => {
                let code = self.room_code(&room)?.clone();
                let player_id = self.player_id(&room, &player)?.clone();

                self.services.rooms.remove_player(&code, &player_id)?;
            }
            Command::Clear { room } => {
                let code = self.room_code(&room)?.clone();
                self.services.rooms.clear_history(&code)?;
            }
        }

        return Ok(());
    }

    /// One row per seated player, ordered by room alias then player alias
    pub fn report(&self) -> Result<Vec<PlayerReport>> {
        let mut rows = vec![];

        for (room_alias, code) in self.rooms.iter() {
            let room = self.services.rooms.get_room(code)?;

            for ((alias_room, player_alias), player_id) in self.players.iter() {
                if alias_room != room_alias {
                    continue;
                }

                // Removed players have no row
                if let Some(row) = PlayerReport::build(&room, player_id, room_alias, player_alias) {
                    rows.push(row?);
                }
            }
        }

        return Ok(rows);
    }

    fn room_code(&self, room: &str) -> Result<&RoomCode> {
        let code = self
            .rooms
            .get(room)
            .ok_or_else(|| ReplayError::UnknownRoom(room.to_string()))?;

        return Ok(code);
    }

    fn player_id(&self, room: &str, player: &str) -> Result<&PlayerId> {
        let id = self
            .players
            .get(&(room.to_string(), player.to_string()))
            .ok_or_else(|| ReplayError::UnknownPlayer(room.to_string(), player.to_string()))?;

        return Ok(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rbl::models::TransactionType;
    use rbl::Money;

    fn s(value: &str) -> String {
        value.to_string()
    }

    fn seeded_replay() -> Replay {
        let mut replay = Replay::new(rbl::build_memory_services());

        replay
            .apply(Command::Create {
                room: s("game"),
                bank: s("bank"),
                bank_name: s("Banker"),
                initial_money: Money(1500),
            })
            .unwrap();
        for player in ["ann", "bob"] {
            replay
                .apply(Command::Join {
                    room: s("game"),
                    player: s(player),
                    name: s(player),
                })
                .unwrap();
        }

        replay
    }

    #[test]
    fn report_after_rent() {
        let mut replay = seeded_replay();

        replay
            .apply(Command::Transfer {
                room: s("game"),
                from: s("ann"),
                to: s("bob"),
                amount: Money(200),
                tx_type: TransactionType::Rent,
                concept: None,
            })
            .unwrap();

        let balances: Vec<_> = replay
            .report()
            .unwrap()
            .into_iter()
            .map(|row| (row.player, row.balance))
            .collect();

        assert_eq!(balances, vec![(s("ann"), 1300), (s("bank"), 0), (s("bob"), 1700)]);
    }

    #[test]
    fn unknown_aliases() {
        let mut replay = seeded_replay();

        let err = replay.apply(Command::End { room: s("other") }).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReplayError>(), Some(ReplayError::UnknownRoom(_))));

        let err = replay
            .apply(Command::Remove {
                room: s("game"),
                player: s("zed"),
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReplayError>(),
            Some(ReplayError::UnknownPlayer(_, _))
        ));
    }

    #[test]
    fn removed_players_leave_the_report() {
        let mut replay = seeded_replay();

        replay
            .apply(Command::Remove {
                room: s("game"),
                player: s("bob"),
            })
            .unwrap();

        let players: Vec<_> = replay.report().unwrap().into_iter().map(|row| row.player).collect();
        assert_eq!(players, vec![s("ann"), s("bank")]);
    }
}

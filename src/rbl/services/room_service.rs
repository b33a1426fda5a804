use crate::clock;
use crate::config::LedgerConfig;
use crate::ids::{PlayerId, RoomCode};
use crate::models::{Player, Room, RoomStatus, PLAYER_COLORS};
use crate::session::Session;
use crate::store::{run_transaction, CasOutcome, RoomStore, StoreError, StorePath, Subscription, SubtreeWrite};
use crate::validation::{validate_amount, validate_name};
use crate::{Money, Result};

use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RoomError {
    #[error("Room {0} is not active")]
    RoomNotActive(RoomCode),

    #[error("Could not allocate a free room code after {0} attempts")]
    CodeSpaceExhausted(usize),
}

/// Room lifecycle: create, join, end, remove players, clear history
pub struct RoomService {
    store: Arc<dyn RoomStore>,
    config: LedgerConfig,
}

impl RoomService {
    pub fn new(store: Arc<dyn RoomStore>, config: LedgerConfig) -> Self {
        return Self { store, config };
    }

    /// Opens a new room with a fresh code and seats its bank. Returns the bank's session.
    pub fn create_room(&self, bank_name: &str, initial_money: Money) -> Result<Session> {
        let bank_name = validate_name("Bank name", bank_name)?;
        let initial_money = validate_amount(initial_money)?;

        let mut rng = rand::thread_rng();
        let created_at = clock::now_millis();
        let bank_id = PlayerId::generate(&mut rng, created_at);

        for attempt in 1..=self.config.max_code_attempts {
            let code = RoomCode::generate(&mut rng);

            if self.store.exists(&code)? {
                log::debug!("Room code {code} taken (attempt {attempt})");
                continue;
            }

            let room = Room::new(code.clone(), bank_id.clone(), bank_name.clone(), initial_money, created_at);

            // Create-if-absent so a racing creator with the same code is never overwritten
            match self.store.compare_and_swap(&code, None, Some(room))? {
                CasOutcome::Committed(_) => {
                    log::debug!("Created room {code} for bank {bank_id}");
                    return Ok(Session {
                        room_code: code,
                        player_id: bank_id,
                        is_bank: true,
                    });
                }
                CasOutcome::Conflict => {
                    log::debug!("Room code {code} claimed concurrently (attempt {attempt})");
                }
            }
        }

        Err(RoomError::CodeSpaceExhausted(self.config.max_code_attempts).into())
    }

    /// Seats a new player in an active room with the room's starting balance.
    ///
    /// `color` defaults to the next unused picker color. The active check and
    /// the seating commit together, so a room ended concurrently rejects the join.
    pub fn join_room(&self, code: &str, player_name: &str, color: Option<&str>) -> Result<Session> {
        let code = RoomCode::parse(code)?;
        let player_name = validate_name("Player name", player_name)?;

        let joined_at = clock::now_millis();
        let player_id = PlayerId::generate(&mut rand::thread_rng(), joined_at);

        let (_, committed) = run_transaction(&*self.store, &code, self.config.max_attempts, |room| {
            if !room.is_active() {
                Err(RoomError::RoomNotActive(room.code.clone()))?
            }

            let color = match color {
                Some(color) => color.to_string(),
                None => next_color(room).to_string(),
            };

            let money = room.starting_money(self.config.default_initial_money);
            let player = Player::new(player_name.clone(), money, color, joined_at);

            log::debug!("Seating player {player_id} in room {code}: {player:?}");

            room.players.insert(player_id.clone(), player);

            Ok(())
        })?;

        log::debug!(
            "{} now at version {}",
            StorePath::Player(code.clone(), player_id.clone()),
            committed.version
        );

        return Ok(Session {
            room_code: code,
            player_id,
            is_bank: false,
        });
    }

    pub fn room_exists(&self, code: &RoomCode) -> Result<bool> {
        self.store.exists(code)
    }

    pub fn get_room(&self, code: &RoomCode) -> Result<Room> {
        let room = self
            .store
            .read(code)?
            .ok_or_else(|| StoreError::RoomNotFound(code.clone()))?;

        return Ok(room.value);
    }

    /// Marks the room finished; ending an already finished room is a no-op
    pub fn end_room(&self, code: &RoomCode) -> Result {
        self.apply(code, SubtreeWrite::SetStatus(RoomStatus::Finished))
    }

    /// Removes a player (leave or kick); removing an absent player is a no-op
    pub fn remove_player(&self, code: &RoomCode, player_id: &PlayerId) -> Result {
        self.apply(code, SubtreeWrite::RemovePlayer(player_id.clone()))
    }

    pub fn clear_history(&self, code: &RoomCode) -> Result {
        self.apply(code, SubtreeWrite::ClearTransactions)
    }

    pub fn delete_room(&self, code: &RoomCode) -> Result {
        self.apply(code, SubtreeWrite::DeleteRoom)
    }

    /// Live room snapshots until the returned handle is dropped
    pub fn watch_room(&self, code: &RoomCode) -> Result<Subscription> {
        self.store.subscribe(code)
    }

    fn apply(&self, code: &RoomCode, write: SubtreeWrite) -> Result {
        let path = write.path(code);

        let version = self
            .store
            .write(code, write)?
            .ok_or_else(|| StoreError::RoomNotFound(code.clone()))?;

        log::debug!("{path} now at version {version}");

        return Ok(());
    }
}

/// First picker color no seated player is using, cycling once all are taken
fn next_color(room: &Room) -> &'static str {
    let seated = room.players.values().filter(|player| !player.is_bank);

    let taken: Vec<&str> = seated.clone().map(|player| player.color.as_str()).collect();

    PLAYER_COLORS
        .iter()
        .copied()
        .find(|color| !taken.contains(color))
        .unwrap_or(PLAYER_COLORS[seated.count() % PLAYER_COLORS.len()])
}

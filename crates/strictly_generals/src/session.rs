//! Game session management: binds named players to sides.

use super::action::{Move, MoveError};
use super::game::{Game, GameError};
use super::types::{Side, TileIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player.
pub type PlayerId = String;

/// A player in a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player's unique ID.
    pub id: PlayerId,
    /// Player's name.
    pub name: String,
    /// Side the player commands.
    pub side: Side,
}

/// Errors from session management.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// Another player already owns the side.
    #[display("{} is already taken", _0)]
    SideTaken(Side),

    /// Both sides are owned.
    #[display("Session already has 2 players")]
    SessionFull,

    /// The player ID is already in the session.
    #[display("Player {} is already registered", _0)]
    AlreadyRegistered(PlayerId),

    /// A side has no player.
    #[display("No player for {}", _0)]
    MissingPlayer(Side),

    /// The player ID is not in the session.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(PlayerId),

    /// Lifecycle error from the game.
    #[display("Game error: {}", _0)]
    Game(GameError),

    /// The move was refused.
    #[display("Move rejected: {}", _0)]
    Move(MoveError),
}

impl std::error::Error for SessionError {}

impl From<GameError> for SessionError {
    fn from(err: GameError) -> Self {
        SessionError::Game(err)
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::Move(err)
    }
}

/// A game with up to two players.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// The game state.
    pub game: Game,
    /// Player commanding White.
    pub white: Option<Player>,
    /// Player commanding Black.
    pub black: Option<Player>,
}

impl GameSession {
    /// Creates a session around a game.
    #[instrument(skip(game))]
    pub fn new(id: SessionId, game: Game) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game,
            white: None,
            black: None,
        }
    }

    fn seat(&self, side: Side) -> &Option<Player> {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn seat_mut(&mut self, side: Side) -> &mut Option<Player> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// Registers a player on the first free side (White first).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn register_player(&mut self, id: PlayerId, name: String) -> Result<Side, SessionError> {
        let side = if self.white.is_none() {
            Side::White
        } else if self.black.is_none() {
            Side::Black
        } else {
            warn!(player_id = %id, "Session already has 2 players");
            return Err(SessionError::SessionFull);
        };
        self.claim_side(id, name, side)?;
        Ok(side)
    }

    /// Registers a player on a specific side.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn claim_side(
        &mut self,
        id: PlayerId,
        name: String,
        side: Side,
    ) -> Result<(), SessionError> {
        if self.player(&id).is_some() {
            return Err(SessionError::AlreadyRegistered(id));
        }
        if self.seat(side).is_some() {
            warn!(player_id = %id, %side, "Side already taken");
            return Err(SessionError::SideTaken(side));
        }
        info!(player_id = %id, %side, "Player joined");
        *self.seat_mut(side) = Some(Player { id, name, side });
        Ok(())
    }

    /// Gets the player with the given ID.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        [&self.white, &self.black]
            .into_iter()
            .flatten()
            .find(|player| player.id == player_id)
    }

    /// Checks if it's the given player's turn.
    pub fn is_players_turn(&self, player_id: &str) -> bool {
        let is_turn = self.game.phase().accepts_moves()
            && self
                .player(player_id)
                .is_some_and(|player| player.side == self.game.active_side());
        debug!(player_id, is_turn, "Checked if player's turn");
        is_turn
    }

    /// Starts the game once both sides have a player.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self, first_mover: Side) -> Result<(), SessionError> {
        if let Some(side) = [Side::White, Side::Black]
            .into_iter()
            .find(|side| self.seat(*side).is_none())
        {
            warn!(%side, "Cannot start without both players");
            return Err(SessionError::MissingPlayer(side));
        }
        self.game.start(first_mover)?;
        Ok(())
    }

    /// Makes a move for the given player.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn submit_move(
        &mut self,
        player_id: &str,
        source: TileIndex,
        target: TileIndex,
    ) -> Result<Move, SessionError> {
        let side = self
            .player(player_id)
            .map(|player| player.side)
            .ok_or_else(|| {
                warn!(player_id, "Unknown player attempted move");
                SessionError::UnknownPlayer(player_id.to_string())
            })?;
        Ok(self.game.attempt_move(side, source, target)?)
    }
}

//! Game rules for the generals board game.
//!
//! Pure functions over boards, ranks and moves. Rules are separated
//! from board storage so contracts and the game aggregate can compose
//! them.

pub mod combat;
pub mod reach;
pub mod win;

pub use combat::{Engagement, classify, engage};
pub use reach::{legal_moves, reachable};
pub use win::{Outcome, captured_flag, flag_reached_goal, is_immobilized, outcome_after};

pub mod action;
pub mod ai;
pub mod character;
pub mod config;
pub mod coup;
pub mod deck;
pub mod error;
pub mod game_log;
pub mod player;

pub use action::{Action, ActionKind, BlockKind, Claim, Response};
pub use ai::{Advice, Decision, Driver, Oracle, RandomOracle, Situation};
pub use character::Character;
pub use config::Config;
pub use coup::{Coup, Phase};
pub use error::{CoupError, OracleError};
pub use player::{Player, PlayerId};

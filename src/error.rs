use thiserror::Error;
use crate::action::{ActionKind, Response};
use crate::player::PlayerId;

/// Reasons an entry point refuses a call. None of these are fatal: the snapshot is returned
/// unchanged apart from a diagnostic log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoupError {
    #[error("expected between {min} and {max} seats with at most {max_ai} automated, got {humans} human and {ai} automated")]
    InvalidSeatCount { humans: usize, ai: usize, min: usize, max: usize, max_ai: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("there is no player {0}")]
    UnknownPlayer(PlayerId),
    #[error("player {0} is eliminated")]
    Eliminated(PlayerId),
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("{0} is not possible right now")]
    WrongPhase(&'static str),
    #[error("player {player} cannot afford {action} ({money} coins)")]
    InsufficientFunds { player: PlayerId, action: ActionKind, money: u8 },
    #[error("player {player} has {money} coins and must coup")]
    MustCoup { player: PlayerId, money: u8 },
    #[error("{0} needs a target")]
    MissingTarget(ActionKind),
    #[error("{0} does not take a target")]
    UnexpectedTarget(ActionKind),
    #[error("player {0} cannot target themselves")]
    SelfTarget(PlayerId),
    #[error("player {0} is not waiting to respond")]
    NotEligible(PlayerId),
    #[error("player {0} has already responded")]
    AlreadyResponded(PlayerId),
    #[error("{0:?} is not a legal response to this claim")]
    IllegalResponse(Response),
    #[error("expected {expected} cards to keep, got {got}")]
    WrongSelectionSize { expected: usize, got: usize },
    #[error("the kept cards are not all in the offered pool")]
    SelectionNotInPool,
}

/// Failures at the advisory oracle boundary. All of them are recovered with a safe default.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("malformed oracle output: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("oracle chose {0:?}, which is not a legal option")]
    IllegalChoice(String),
    #[error("oracle targeted {0:?}, which is not a visible opponent")]
    IllegalTarget(Option<String>),
}

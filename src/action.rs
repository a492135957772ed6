use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::character::Character;
use crate::character::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
use crate::player::PlayerId;

/// Coins needed for a coup, and the fortune at which a coup becomes mandatory.
pub const COUP_COST: u8 = 7;
pub const FORCED_COUP_THRESHOLD: u8 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Steal,
    Exchange,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    ForeignAid,
    Assassination,
    Stealing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    Allow,
    Challenge,
    Block(BlockKind),
}

#[derive(Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub action: ActionKind,
    pub cost: u8,
    // the character claimed; None means the action can't be challenged
    pub claim: Option<Character>,
    pub targeted: bool,
    pub blocked_by: Option<BlockKind>,
}

// indexed by `ActionKind as usize`
pub static CATALOG: [CatalogEntry; 7] = [
    CatalogEntry { action: ActionKind::Income, cost: 0, claim: None, targeted: false, blocked_by: None },
    CatalogEntry { action: ActionKind::ForeignAid, cost: 0, claim: None, targeted: false, blocked_by: Some(BlockKind::ForeignAid) },
    CatalogEntry { action: ActionKind::Coup, cost: COUP_COST, claim: None, targeted: true, blocked_by: None },
    CatalogEntry { action: ActionKind::Tax, cost: 0, claim: Some(Duke), targeted: false, blocked_by: None },
    CatalogEntry { action: ActionKind::Assassinate, cost: 3, claim: Some(Assassin), targeted: true, blocked_by: Some(BlockKind::Assassination) },
    CatalogEntry { action: ActionKind::Steal, cost: 0, claim: Some(Captain), targeted: true, blocked_by: Some(BlockKind::Stealing) },
    CatalogEntry { action: ActionKind::Exchange, cost: 0, claim: Some(Ambassador), targeted: false, blocked_by: None },
];

pub static ACTION_VARIANTS: [ActionKind; 7] = [
    ActionKind::Income,
    ActionKind::ForeignAid,
    ActionKind::Coup,
    ActionKind::Tax,
    ActionKind::Assassinate,
    ActionKind::Steal,
    ActionKind::Exchange,
];

impl ActionKind {
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    pub fn cost(self) -> u8 {
        self.entry().cost
    }

    pub fn claim(self) -> Option<Character> {
        self.entry().claim
    }

    pub fn is_challengeable(self) -> bool {
        self.entry().claim.is_some()
    }

    pub fn needs_target(self) -> bool {
        self.entry().targeted
    }

    pub fn blocked_by(self) -> Option<BlockKind> {
        self.entry().blocked_by
    }

    /// Income and Coup resolve on declaration; nobody gets to respond.
    pub fn resolves_immediately(self) -> bool {
        !self.is_challengeable() && self.blocked_by().is_none()
    }

    /// Coins paid out of the treasury when the action lands.
    pub fn payout(self) -> u8 {
        match self {
            ActionKind::Income => 1,
            ActionKind::ForeignAid => 2,
            ActionKind::Tax => 3,
            _ => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Income => "Income",
            ActionKind::ForeignAid => "Foreign Aid",
            ActionKind::Coup => "Coup",
            ActionKind::Tax => "Tax",
            ActionKind::Assassinate => "Assassinate",
            ActionKind::Steal => "Steal",
            ActionKind::Exchange => "Exchange",
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl BlockKind {
    pub fn counters(self) -> ActionKind {
        match self {
            BlockKind::ForeignAid => ActionKind::ForeignAid,
            BlockKind::Assassination => ActionKind::Assassinate,
            BlockKind::Stealing => ActionKind::Steal,
        }
    }

    /// Any one of these, face down, proves the block.
    pub fn proven_by(self) -> &'static [Character] {
        match self {
            BlockKind::ForeignAid => &[Duke],
            BlockKind::Assassination => &[Contessa],
            BlockKind::Stealing => &[Captain, Ambassador],
        }
    }

    /// Only the target may block a targeted action.
    pub fn target_only(self) -> bool {
        self.counters().needs_target()
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockKind::ForeignAid => "Block Foreign Aid",
            BlockKind::Assassination => "Block Assassination",
            BlockKind::Stealing => "Block Stealing",
        }
    }
}

impl Response {
    pub fn label(self) -> &'static str {
        match self {
            Response::Allow => "Allow",
            Response::Challenge => "Challenge",
            Response::Block(kind) => kind.label(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: PlayerId,
    pub kind: ActionKind,
    pub target: Option<PlayerId>,
}

/// Something a player asserted and others may dispute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Claim {
    Action(Action),
    Block { blocker: PlayerId, kind: BlockKind, action: Action },
}

impl Claim {
    pub fn claimant(&self) -> PlayerId {
        match self {
            Claim::Action(action) => action.actor,
            Claim::Block { blocker, .. } => *blocker,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Claim::Action(action) => *action,
            Claim::Block { action, .. } => *action,
        }
    }

    /// Cards that would prove the claim, empty when there is nothing to prove.
    pub fn proven_by(&self) -> &'static [Character] {
        match self {
            Claim::Action(action) => match action.kind {
                ActionKind::Tax => &[Duke],
                ActionKind::Assassinate => &[Assassin],
                ActionKind::Steal => &[Captain],
                ActionKind::Exchange => &[Ambassador],
                ActionKind::Income | ActionKind::ForeignAid | ActionKind::Coup => &[],
            },
            Claim::Block { kind, .. } => kind.proven_by(),
        }
    }

    pub fn is_challengeable(&self) -> bool {
        !self.proven_by().is_empty()
    }
}

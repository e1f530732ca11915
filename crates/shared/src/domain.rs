use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(EntryId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::A => f.write_str("A"),
            TeamSide::B => f.write_str("B"),
        }
    }
}

/// Which side's counter moves when an action is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Beneficiary {
    /// The team that performed the action.
    #[serde(rename = "self", alias = "acting")]
    Acting,
    #[serde(rename = "opponent")]
    Opponent,
}

impl Beneficiary {
    /// Resolves the scoring side for an action performed by `acting`.
    pub fn side(self, acting: TeamSide) -> TeamSide {
        match self {
            Beneficiary::Acting => acting,
            Beneficiary::Opponent => acting.other(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Point,
    Fault,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Point => "Point",
            Outcome::Fault => "Fault",
        }
    }

    /// A point always favours the acting team, a fault always concedes to the opponent.
    pub fn beneficiary(self) -> Beneficiary {
        match self {
            Outcome::Point => Beneficiary::Acting,
            Outcome::Fault => Beneficiary::Opponent,
        }
    }

    /// Background color for a log row: green for points, red for faults.
    pub fn row_color(self) -> &'static str {
        match self {
            Outcome::Point => "#e6ffe6",
            Outcome::Fault => "#ffe6e6",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettings {
    pub name: String,
    pub color: String,
    pub roster: Vec<String>,
}

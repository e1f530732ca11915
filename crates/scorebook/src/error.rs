use shared::{
    domain::TeamSide,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

use crate::{export::ExportError, state::UndoError, teams::TeamsError};

#[derive(Debug, Error)]
pub enum ScorebookError {
    #[error("unknown team '{0}'")]
    UnknownTeam(String),
    #[error("player '{player}' is not on the roster of team {side}")]
    UnknownPlayer { side: TeamSide, player: String },
    #[error("unknown action '{category}/{reason}'")]
    UnknownAction { category: String, reason: String },
    #[error("set {requested} has not started; current set is {current}")]
    UnknownSet { requested: u32, current: u32 },
    #[error(transparent)]
    Undo(#[from] UndoError),
    #[error(transparent)]
    Teams(#[from] TeamsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ScorebookError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ScorebookError::UnknownTeam(_)
            | ScorebookError::UnknownPlayer { .. }
            | ScorebookError::UnknownAction { .. }
            | ScorebookError::Teams(_) => ErrorCode::Validation,
            ScorebookError::UnknownSet { .. } => ErrorCode::NotFound,
            ScorebookError::Undo(_) => ErrorCode::Conflict,
            ScorebookError::Export(_) => ErrorCode::Internal,
        }
    }
}

impl From<ScorebookError> for ApiError {
    fn from(value: ScorebookError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    domain::{MatchId, TeamSide},
    protocol::{LogEntry, LogRow, MatchSnapshot, RecordActionRequest, SetLog, TeamScore},
};
use tracing::{debug, info, warn};

use crate::{
    error::ScorebookError,
    export,
    state::{MatchState, ResolvedAction},
    taxonomy::ActionTaxonomy,
    teams::MatchTeams,
};

/// Category recorded for entries scored through a manual override.
pub const CUSTOM_CATEGORY: &str = "Custom";

/// One match: its teams, the shared taxonomy and the score state.
#[derive(Debug, Clone)]
pub struct MatchSession {
    match_id: MatchId,
    teams: MatchTeams,
    taxonomy: Arc<ActionTaxonomy>,
    state: MatchState,
}

impl MatchSession {
    pub fn new(teams: MatchTeams, taxonomy: Arc<ActionTaxonomy>) -> Self {
        Self {
            match_id: MatchId::new(),
            teams,
            taxonomy,
            state: MatchState::new(),
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn teams(&self) -> &MatchTeams {
        &self.teams
    }

    pub fn taxonomy(&self) -> &ActionTaxonomy {
        &self.taxonomy
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn record_action(
        &mut self,
        request: &RecordActionRequest,
    ) -> Result<LogEntry, ScorebookError> {
        self.record_action_at(request, Utc::now())
    }

    pub fn record_action_at(
        &mut self,
        request: &RecordActionRequest,
        recorded_at: DateTime<Utc>,
    ) -> Result<LogEntry, ScorebookError> {
        let action = self.resolve(request)?;
        let entry = self.state.record(action, recorded_at);
        info!(
            set = entry.set_number,
            team = %entry.team_name,
            player = %entry.player,
            reason = %entry.reason,
            outcome = %entry.outcome,
            score = %entry.score_snapshot,
            "action recorded"
        );
        Ok(entry)
    }

    pub fn undo_last(&mut self) -> Result<LogEntry, ScorebookError> {
        match self.state.undo_last() {
            Ok(entry) => {
                info!(
                    entry_id = entry.entry_id.0,
                    score = %self.state.score_line(),
                    "last action undone"
                );
                Ok(entry)
            }
            Err(error) => {
                warn!(%error, "undo refused");
                Err(error.into())
            }
        }
    }

    pub fn end_set(&mut self) -> String {
        let closed_set = self.state.current_set();
        let final_score = self.state.end_set();
        info!(set = closed_set, %final_score, "set closed");
        final_score
    }

    pub fn update_teams(&mut self, teams: MatchTeams) {
        debug!(
            team_a = %teams.team(TeamSide::A).name,
            team_b = %teams.team(TeamSide::B).name,
            "team settings replaced"
        );
        self.teams = teams;
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.match_id,
            current_set: self.state.current_set(),
            team_a: self.team_score(TeamSide::A),
            team_b: self.team_score(TeamSide::B),
            set_history: self.state.set_history().to_vec(),
            log_len: self.state.log().len(),
        }
    }

    /// Entries of one set, newest first. Defaults to the current set.
    pub fn set_log(&self, set_number: Option<u32>) -> Result<SetLog, ScorebookError> {
        let current = self.state.current_set();
        let set_number = set_number.unwrap_or(current);
        if set_number == 0 || set_number > current {
            return Err(ScorebookError::UnknownSet {
                requested: set_number,
                current,
            });
        }

        let rows = self
            .state
            .set_entries(set_number)
            .rev()
            .map(|entry| LogRow {
                entry: entry.clone(),
                row_color: entry.outcome.row_color().to_string(),
            })
            .collect();
        Ok(SetLog { set_number, rows })
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, ScorebookError> {
        Ok(export::to_csv_bytes(self.state.log())?)
    }

    fn team_score(&self, side: TeamSide) -> TeamScore {
        let team = self.teams.team(side);
        TeamScore {
            side,
            name: team.name.clone(),
            color: team.color.clone(),
            score: self.state.score(side),
        }
    }

    fn resolve(&self, request: &RecordActionRequest) -> Result<ResolvedAction, ScorebookError> {
        let side = self
            .teams
            .side_for_name(&request.team)
            .ok_or_else(|| ScorebookError::UnknownTeam(request.team.clone()))?;
        let player = request.player.trim();
        if !self.teams.has_player(side, player) {
            return Err(ScorebookError::UnknownPlayer {
                side,
                player: player.to_string(),
            });
        }

        // A blank manual reason means the operator left the override box empty.
        let custom = request
            .custom
            .as_ref()
            .filter(|custom| !custom.reason.trim().is_empty());

        let (category, reason, outcome) = match custom {
            Some(custom) => (
                CUSTOM_CATEGORY.to_string(),
                custom.reason.trim().to_string(),
                custom.outcome,
            ),
            None => {
                let category = request.category.trim();
                let reason = request.reason.trim();
                let rule = self.taxonomy.lookup(category, reason).ok_or_else(|| {
                    ScorebookError::UnknownAction {
                        category: category.to_string(),
                        reason: reason.to_string(),
                    }
                })?;
                (category.to_string(), reason.to_string(), rule.outcome)
            }
        };

        Ok(ResolvedAction {
            team: side,
            team_name: self.teams.team(side).name.clone(),
            player: player.to_string(),
            category,
            reason,
            outcome,
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

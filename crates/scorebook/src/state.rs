use chrono::{DateTime, Utc};
use shared::{
    domain::{EntryId, Outcome, TeamSide},
    protocol::LogEntry,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error("no recorded action to undo")]
    NoHistory,
    #[error("last recorded action belongs to set {entry_set}; current set is {current_set}")]
    CrossSetBoundary { entry_set: u32, current_set: u32 },
}

/// A fully resolved action, ready to be scored.
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    pub team: TeamSide,
    pub team_name: String,
    pub player: String,
    pub category: String,
    pub reason: String,
    pub outcome: Outcome,
}

/// Scores, set progression and the append-only action log of one match.
///
/// `score_a`/`score_b` always equal the number of current-set entries that
/// favour each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    current_set: u32,
    score_a: u32,
    score_b: u32,
    set_history: Vec<String>,
    log: Vec<LogEntry>,
    next_entry_id: u64,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            current_set: 1,
            score_a: 0,
            score_b: 0,
            set_history: Vec::new(),
            log: Vec::new(),
            next_entry_id: 1,
        }
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::A => self.score_a,
            TeamSide::B => self.score_b,
        }
    }

    pub fn score_line(&self) -> String {
        format!("{}:{}", self.score_a, self.score_b)
    }

    pub fn set_history(&self) -> &[String] {
        &self.set_history
    }

    /// Chronological order, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn set_entries(&self, set_number: u32) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.log
            .iter()
            .filter(move |entry| entry.set_number == set_number)
    }

    /// Credits one point to the beneficiary of `action` and appends the entry.
    pub fn record(&mut self, action: ResolvedAction, recorded_at: DateTime<Utc>) -> LogEntry {
        let scoring_side = action.outcome.beneficiary().side(action.team);
        *self.score_mut(scoring_side) += 1;

        let entry = LogEntry {
            entry_id: EntryId(self.next_entry_id),
            recorded_at,
            set_number: self.current_set,
            team: action.team,
            team_name: action.team_name,
            player: action.player,
            category: action.category,
            reason: action.reason,
            outcome: action.outcome,
            score_snapshot: self.score_line(),
        };
        self.next_entry_id += 1;
        self.log.push(entry.clone());
        entry
    }

    /// Reverts the most recent entry if it belongs to the current set.
    pub fn undo_last(&mut self) -> Result<LogEntry, UndoError> {
        let last = self.log.last().ok_or(UndoError::NoHistory)?;
        if last.set_number != self.current_set {
            return Err(UndoError::CrossSetBoundary {
                entry_set: last.set_number,
                current_set: self.current_set,
            });
        }

        let scoring_side = last.outcome.beneficiary().side(last.team);
        let score = self.score_mut(scoring_side);
        *score = score.saturating_sub(1);

        let entry = self.log.pop().ok_or(UndoError::NoHistory)?;
        Ok(entry)
    }

    /// Closes the current set and returns its final score.
    pub fn end_set(&mut self) -> String {
        let final_score = self.score_line();
        self.set_history.push(final_score.clone());
        self.current_set += 1;
        self.score_a = 0;
        self.score_b = 0;
        final_score
    }

    fn score_mut(&mut self, side: TeamSide) -> &mut u32 {
        match side {
            TeamSide::A => &mut self.score_a,
            TeamSide::B => &mut self.score_b,
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;

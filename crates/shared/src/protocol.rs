use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Beneficiary, EntryId, MatchId, Outcome, TeamSettings, TeamSide};

/// Manual reason and verdict that bypass the action taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOverride {
    pub reason: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordActionRequest {
    pub team: String,
    pub player: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub entry_id: EntryId,
    pub recorded_at: DateTime<Utc>,
    pub set_number: u32,
    pub team: TeamSide,
    pub team_name: String,
    pub player: String,
    pub category: String,
    pub reason: String,
    pub outcome: Outcome,
    pub score_snapshot: String,
}

impl LogEntry {
    /// Wall-clock `HH:MM:SS` of the entry in the operator's local zone.
    pub fn local_time(&self) -> String {
        self.recorded_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub row_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLog {
    pub set_number: u32,
    /// Newest entry first.
    pub rows: Vec<LogRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamScore {
    pub side: TeamSide,
    pub name: String,
    pub color: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub current_set: u32,
    pub team_a: TeamScore,
    pub team_b: TeamScore,
    pub set_history: Vec<String>,
    pub log_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsView {
    pub team_a: TeamSettings,
    pub team_b: TeamSettings,
}

/// Settings form input; the roster is comma separated free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub roster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeamsRequest {
    pub team_a: TeamInput,
    pub team_b: TeamInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyReason {
    pub name: String,
    pub beneficiary: Beneficiary,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyCategory {
    pub name: String,
    pub reasons: Vec<TaxonomyReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MatchEvent {
    ActionRecorded {
        entry: LogEntry,
        snapshot: MatchSnapshot,
    },
    ActionUndone {
        entry: LogEntry,
        snapshot: MatchSnapshot,
    },
    SetEnded {
        closed_set: u32,
        final_score: String,
        snapshot: MatchSnapshot,
    },
    TeamsUpdated {
        teams: TeamsView,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_request_accepts_override_without_taxonomy_fields() {
        let req: RecordActionRequest = serde_json::from_value(serde_json::json!({
            "team": "Team A",
            "player": "3",
            "custom": { "reason": "ball hit the ceiling", "outcome": "fault" },
        }))
        .expect("parse");
        assert!(req.category.is_empty());
        assert_eq!(
            req.custom,
            Some(CustomOverride {
                reason: "ball hit the ceiling".into(),
                outcome: Outcome::Fault,
            })
        );
    }

    #[test]
    fn local_time_converts_from_utc() {
        use chrono::TimeZone;

        let recorded_at = Utc
            .with_ymd_and_hms(2024, 5, 4, 11, 0, 0)
            .single()
            .expect("timestamp");
        let entry = LogEntry {
            entry_id: EntryId(1),
            recorded_at,
            set_number: 1,
            team: TeamSide::A,
            team_name: "Team A".into(),
            player: "3".into(),
            category: "Attack".into(),
            reason: "Kill".into(),
            outcome: Outcome::Point,
            score_snapshot: "1:0".into(),
        };
        let expected = Local
            .from_utc_datetime(&recorded_at.naive_utc())
            .format("%H:%M:%S")
            .to_string();
        assert_eq!(entry.local_time(), expected);
    }

    #[test]
    fn events_are_tagged_with_type_and_payload() {
        let event = MatchEvent::TeamsUpdated {
            teams: TeamsView {
                team_a: TeamSettings {
                    name: "Home".into(),
                    color: "#3b82f6".into(),
                    roster: vec!["1".into()],
                },
                team_b: TeamSettings {
                    name: "Away".into(),
                    color: "#ef4444".into(),
                    roster: vec!["7".into()],
                },
            },
        };
        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["type"], "teams_updated");
        assert_eq!(value["payload"]["teams"]["team_a"]["name"], "Home");
    }
}

pub mod error;
pub mod export;
pub mod session;
pub mod state;
pub mod taxonomy;
pub mod teams;

pub use error::ScorebookError;
pub use session::MatchSession;
pub use taxonomy::ActionTaxonomy;
pub use teams::MatchTeams;

use shared::{
    error::ApiError,
    protocol::{MatchEvent, RecordActionRequest, UpdateTeamsRequest},
};

pub fn record_action(
    session: &mut MatchSession,
    request: &RecordActionRequest,
) -> Result<MatchEvent, ApiError> {
    let entry = session.record_action(request)?;
    Ok(MatchEvent::ActionRecorded {
        entry,
        snapshot: session.snapshot(),
    })
}

pub fn undo_last(session: &mut MatchSession) -> Result<MatchEvent, ApiError> {
    let entry = session.undo_last()?;
    Ok(MatchEvent::ActionUndone {
        entry,
        snapshot: session.snapshot(),
    })
}

pub fn end_set(session: &mut MatchSession) -> MatchEvent {
    let closed_set = session.state().current_set();
    let final_score = session.end_set();
    MatchEvent::SetEnded {
        closed_set,
        final_score,
        snapshot: session.snapshot(),
    }
}

pub fn update_teams(
    session: &mut MatchSession,
    request: &UpdateTeamsRequest,
) -> Result<MatchEvent, ApiError> {
    let teams = MatchTeams::from_request(request).map_err(ScorebookError::from)?;
    session.update_teams(teams);
    Ok(MatchEvent::TeamsUpdated {
        teams: session.teams().view(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared::{error::ErrorCode, protocol::TeamInput};

    use super::*;

    fn session() -> MatchSession {
        MatchSession::new(
            MatchTeams::default(),
            Arc::new(ActionTaxonomy::embedded().expect("taxonomy")),
        )
    }

    #[test]
    fn events_carry_post_operation_snapshots() {
        let mut session = session();
        let event = record_action(
            &mut session,
            &RecordActionRequest {
                team: "Team A".into(),
                player: "3".into(),
                category: "Attack".into(),
                reason: "Kill".into(),
                custom: None,
            },
        )
        .expect("record");
        match event {
            MatchEvent::ActionRecorded { entry, snapshot } => {
                assert_eq!(entry.score_snapshot, "1:0");
                assert_eq!(snapshot.team_a.score, 1);
                assert_eq!(snapshot.log_len, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        match end_set(&mut session) {
            MatchEvent::SetEnded {
                closed_set,
                final_score,
                snapshot,
            } => {
                assert_eq!(closed_set, 1);
                assert_eq!(final_score, "1:0");
                assert_eq!(snapshot.current_set, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn errors_map_to_api_codes() {
        let mut session = session();
        let err = undo_last(&mut session).expect_err("nothing to undo");
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = update_teams(
            &mut session,
            &UpdateTeamsRequest {
                team_a: TeamInput {
                    name: "".into(),
                    color: None,
                    roster: "1".into(),
                },
                team_b: TeamInput {
                    name: "B".into(),
                    color: None,
                    roster: "2".into(),
                },
            },
        )
        .expect_err("empty name");
        assert_eq!(err.code, ErrorCode::Validation);
    }
}

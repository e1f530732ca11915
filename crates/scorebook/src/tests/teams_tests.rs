use super::*;

fn input(name: &str, roster: &str) -> TeamInput {
    TeamInput {
        name: name.into(),
        color: None,
        roster: roster.into(),
    }
}

#[test]
fn roster_entries_are_trimmed_deduplicated_and_non_empty() {
    assert_eq!(parse_roster(" 1, 2 ,,3, 2 , L "), ["1", "2", "3", "L"]);
    assert!(parse_roster(" , ,").is_empty());
}

#[test]
fn defaults_match_sidebar_settings() {
    let teams = MatchTeams::default();
    assert_eq!(teams.team(TeamSide::A).name, "Team A");
    assert_eq!(teams.team(TeamSide::A).color, "#3b82f6");
    assert_eq!(
        teams.team(TeamSide::A).roster,
        ["1", "2", "3", "4", "5", "6", "12", "L"]
    );
    assert_eq!(teams.team(TeamSide::B).color, "#ef4444");
    assert!(teams.has_player(TeamSide::B, "13"));
    assert!(!teams.has_player(TeamSide::B, "12"));
}

#[test]
fn side_lookup_by_trimmed_name() {
    let teams = MatchTeams::default();
    assert_eq!(teams.side_for_name("Team B "), Some(TeamSide::B));
    assert_eq!(teams.side_for_name("Team C"), None);
}

#[test]
fn request_keeps_default_color_when_omitted() {
    let teams = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: input(" 台北隊 ", "1, 2"),
        team_b: TeamInput {
            color: Some("#00AA11".into()),
            ..input("Visitors", "9")
        },
    })
    .expect("teams");
    assert_eq!(teams.team(TeamSide::A).name, "台北隊");
    assert_eq!(teams.team(TeamSide::A).color, DEFAULT_TEAM_A_COLOR);
    assert_eq!(teams.team(TeamSide::B).color, "#00AA11");
    assert_eq!(teams.view().team_b.roster, ["9"]);
}

#[test]
fn request_validation_errors() {
    let err = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: input("  ", "1"),
        team_b: input("B", "2"),
    })
    .expect_err("empty name");
    assert_eq!(err, TeamsError::EmptyName(TeamSide::A));

    let err = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: input("Same", "1"),
        team_b: input("Same", "2"),
    })
    .expect_err("duplicate");
    assert_eq!(err, TeamsError::DuplicateName("Same".into()));

    let err = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: input("A", "1"),
        team_b: input("B", " , "),
    })
    .expect_err("empty roster");
    assert_eq!(err, TeamsError::EmptyRoster(TeamSide::B));

    let err = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: TeamInput {
            color: Some("blue".into()),
            ..input("A", "1")
        },
        team_b: input("B", "2"),
    })
    .expect_err("bad color");
    assert!(matches!(err, TeamsError::InvalidColor { side: TeamSide::A, .. }));
}

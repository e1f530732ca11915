use super::*;

#[test]
fn custom_outcome_requires_custom_reason() {
    let err = Cli::try_parse_from([
        "scorer",
        "record",
        "--team",
        "Team A",
        "--player",
        "3",
        "--category",
        "Attack",
        "--reason",
        "Kill",
        "--custom-outcome",
        "fault",
    ])
    .expect_err("outcome without reason");
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn custom_override_replaces_taxonomy_arguments() {
    let cli = Cli::try_parse_from([
        "scorer",
        "record",
        "--team",
        "Team B",
        "--player",
        "9",
        "--custom-reason",
        "ball hit the ceiling",
        "--custom-outcome",
        "point",
    ])
    .expect("parse");
    match cli.command {
        Command::Record {
            category,
            custom_reason,
            custom_outcome,
            ..
        } => {
            assert!(category.is_none());
            assert_eq!(custom_reason.as_deref(), Some("ball hit the ceiling"));
            assert!(matches!(custom_outcome, Some(Verdict::Point)));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use shared::domain::TeamSide;

fn temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("scorebook_server_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_yields_defaults() {
    let dir = temp_dir("missing");
    let settings = load_settings_from(&dir.join("server.toml"), no_env);
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
    assert!(settings.taxonomy_path.is_none());
    assert_eq!(settings.team_a.name, "Team A");
    assert_eq!(settings.team_b.roster, DEFAULT_TEAM_B_ROSTER);
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn file_values_then_env_overrides() {
    let dir = temp_dir("layered");
    let path = dir.join("server.toml");
    fs::write(
        &path,
        r##"
bind_addr = "0.0.0.0:9000"

[team_a]
name = "Home"
roster = "1, 2, 3"

[team_b]
color = "#112233"
"##,
    )
    .expect("write config");

    let overrides: HashMap<&str, &str> = [
        ("APP__BIND_ADDR", "127.0.0.1:9100"),
        ("APP__TEAM_B_NAME", "Away"),
    ]
    .into_iter()
    .collect();
    let settings = load_settings_from(&path, |key| overrides.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_bind, "127.0.0.1:9100");
    assert_eq!(settings.team_a.name, "Home");
    assert_eq!(settings.team_a.roster, "1, 2, 3");
    assert_eq!(settings.team_b.name, "Away");
    assert_eq!(settings.team_b.color.as_deref(), Some("#112233"));
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_is_ignored() {
    let dir = temp_dir("malformed");
    let path = dir.join("server.toml");
    fs::write(&path, "bind_addr = [").expect("write config");
    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.server_bind, Settings::default().server_bind);
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn builds_session_from_default_settings() {
    let session = build_session(&Settings::default()).expect("session");
    assert_eq!(session.teams().team(TeamSide::A).name, "Team A");
    assert!(session.taxonomy().lookup("Serve", "Ace").is_some());
    assert_eq!(session.state().current_set(), 1);
}

#[test]
fn builds_session_with_custom_taxonomy_file() {
    let dir = temp_dir("taxonomy");
    let path = dir.join("taxonomy.toml");
    fs::write(
        &path,
        r#"
[[category]]
name = "Dig"
reason = [{ name = "Shank", beneficiary = "opponent", outcome = "fault" }]
"#,
    )
    .expect("write taxonomy");

    let settings = Settings {
        taxonomy_path: Some(path),
        ..Settings::default()
    };
    let session = build_session(&settings).expect("session");
    assert!(session.taxonomy().lookup("Dig", "Shank").is_some());
    assert!(session.taxonomy().lookup("Attack", "Kill").is_none());
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn rejects_invalid_team_settings() {
    let mut settings = Settings::default();
    settings.team_b.name = settings.team_a.name.clone();
    assert!(build_session(&settings).is_err());

    let settings = Settings {
        taxonomy_path: Some(PathBuf::from("/nonexistent/scorebook/taxonomy.toml")),
        ..Settings::default()
    };
    assert!(build_session(&settings).is_err());
}

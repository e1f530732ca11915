use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use scorebook::{
    teams::{
        DEFAULT_TEAM_A_COLOR, DEFAULT_TEAM_A_NAME, DEFAULT_TEAM_A_ROSTER, DEFAULT_TEAM_B_COLOR,
        DEFAULT_TEAM_B_NAME, DEFAULT_TEAM_B_ROSTER,
    },
    ActionTaxonomy, MatchSession, MatchTeams,
};
use serde::Deserialize;
use shared::protocol::{TeamInput, UpdateTeamsRequest};
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub taxonomy_path: Option<PathBuf>,
    pub team_a: TeamInput,
    pub team_b: TeamInput,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            taxonomy_path: None,
            team_a: TeamInput {
                name: DEFAULT_TEAM_A_NAME.into(),
                color: Some(DEFAULT_TEAM_A_COLOR.into()),
                roster: DEFAULT_TEAM_A_ROSTER.into(),
            },
            team_b: TeamInput {
                name: DEFAULT_TEAM_B_NAME.into(),
                color: Some(DEFAULT_TEAM_B_COLOR.into()),
                roster: DEFAULT_TEAM_B_ROSTER.into(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    taxonomy_path: Option<PathBuf>,
    team_a: Option<TeamFileConfig>,
    team_b: Option<TeamFileConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct TeamFileConfig {
    name: Option<String>,
    color: Option<String>,
    roster: Option<String>,
}

impl TeamFileConfig {
    fn apply(self, team: &mut TeamInput) {
        if let Some(v) = self.name {
            team.name = v;
        }
        if let Some(v) = self.color {
            team.color = Some(v);
        }
        if let Some(v) = self.roster {
            team.roster = v;
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
            Ok(file_cfg) => apply_file_config(&mut settings, file_cfg),
            Err(error) => warn!(path = %path.display(), %error, "ignoring malformed config file"),
        },
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => warn!(path = %path.display(), %error, "failed to read config file"),
    }

    apply_env_overrides(&mut settings, env);
    settings
}

fn apply_file_config(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.taxonomy_path {
        settings.taxonomy_path = Some(v);
    }
    if let Some(team) = file_cfg.team_a {
        team.apply(&mut settings.team_a);
    }
    if let Some(team) = file_cfg.team_b {
        team.apply(&mut settings.team_b);
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("SCOREBOOK_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__TAXONOMY_PATH") {
        settings.taxonomy_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__TEAM_A_NAME") {
        settings.team_a.name = v;
    }
    if let Some(v) = env("APP__TEAM_A_COLOR") {
        settings.team_a.color = Some(v);
    }
    if let Some(v) = env("APP__TEAM_A_ROSTER") {
        settings.team_a.roster = v;
    }

    if let Some(v) = env("APP__TEAM_B_NAME") {
        settings.team_b.name = v;
    }
    if let Some(v) = env("APP__TEAM_B_COLOR") {
        settings.team_b.color = Some(v);
    }
    if let Some(v) = env("APP__TEAM_B_ROSTER") {
        settings.team_b.roster = v;
    }
}

pub fn build_session(settings: &Settings) -> anyhow::Result<MatchSession> {
    let taxonomy = match &settings.taxonomy_path {
        Some(path) => {
            info!(path = %path.display(), "loading action taxonomy");
            ActionTaxonomy::load(path)
                .with_context(|| format!("failed to load taxonomy '{}'", path.display()))?
        }
        None => ActionTaxonomy::embedded().context("embedded taxonomy is invalid")?,
    };

    let teams = MatchTeams::from_request(&UpdateTeamsRequest {
        team_a: settings.team_a.clone(),
        team_b: settings.team_b.clone(),
    })
    .context("invalid team settings")?;

    Ok(MatchSession::new(teams, Arc::new(taxonomy)))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

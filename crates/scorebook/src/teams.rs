use shared::{
    domain::{TeamSettings, TeamSide},
    protocol::{TeamInput, TeamsView, UpdateTeamsRequest},
};
use thiserror::Error;

pub const DEFAULT_TEAM_A_NAME: &str = "Team A";
pub const DEFAULT_TEAM_A_COLOR: &str = "#3b82f6";
pub const DEFAULT_TEAM_A_ROSTER: &str = "1, 2, 3, 4, 5, 6, 12, L";
pub const DEFAULT_TEAM_B_NAME: &str = "Team B";
pub const DEFAULT_TEAM_B_COLOR: &str = "#ef4444";
pub const DEFAULT_TEAM_B_ROSTER: &str = "7, 8, 9, 10, 11, 13, L";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamsError {
    #[error("team {0} name cannot be empty")]
    EmptyName(TeamSide),
    #[error("both teams are named '{0}'")]
    DuplicateName(String),
    #[error("team {side} color '{color}' is not a #rrggbb value")]
    InvalidColor { side: TeamSide, color: String },
    #[error("team {0} roster has no players")]
    EmptyRoster(TeamSide),
}

/// Splits a comma separated roster, trimming entries and dropping blanks and repeats.
pub fn parse_roster(raw: &str) -> Vec<String> {
    let mut players: Vec<String> = Vec::new();
    for player in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !players.iter().any(|existing| existing == player) {
            players.push(player.to_string());
        }
    }
    players
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn default_color(side: TeamSide) -> &'static str {
    match side {
        TeamSide::A => DEFAULT_TEAM_A_COLOR,
        TeamSide::B => DEFAULT_TEAM_B_COLOR,
    }
}

fn team_from_input(side: TeamSide, input: &TeamInput) -> Result<TeamSettings, TeamsError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TeamsError::EmptyName(side));
    }

    let color = input
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_color(side));
    if !is_hex_color(color) {
        return Err(TeamsError::InvalidColor {
            side,
            color: color.to_string(),
        });
    }

    let roster = parse_roster(&input.roster);
    if roster.is_empty() {
        return Err(TeamsError::EmptyRoster(side));
    }

    Ok(TeamSettings {
        name: name.to_string(),
        color: color.to_string(),
        roster,
    })
}

/// The two configured teams of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTeams {
    team_a: TeamSettings,
    team_b: TeamSettings,
}

impl Default for MatchTeams {
    fn default() -> Self {
        Self {
            team_a: TeamSettings {
                name: DEFAULT_TEAM_A_NAME.into(),
                color: DEFAULT_TEAM_A_COLOR.into(),
                roster: parse_roster(DEFAULT_TEAM_A_ROSTER),
            },
            team_b: TeamSettings {
                name: DEFAULT_TEAM_B_NAME.into(),
                color: DEFAULT_TEAM_B_COLOR.into(),
                roster: parse_roster(DEFAULT_TEAM_B_ROSTER),
            },
        }
    }
}

impl MatchTeams {
    pub fn from_request(request: &UpdateTeamsRequest) -> Result<Self, TeamsError> {
        let team_a = team_from_input(TeamSide::A, &request.team_a)?;
        let team_b = team_from_input(TeamSide::B, &request.team_b)?;
        if team_a.name == team_b.name {
            return Err(TeamsError::DuplicateName(team_a.name));
        }
        Ok(Self { team_a, team_b })
    }

    pub fn team(&self, side: TeamSide) -> &TeamSettings {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn side_for_name(&self, name: &str) -> Option<TeamSide> {
        let name = name.trim();
        [TeamSide::A, TeamSide::B]
            .into_iter()
            .find(|side| self.team(*side).name == name)
    }

    pub fn has_player(&self, side: TeamSide, player: &str) -> bool {
        self.team(side).roster.iter().any(|p| p == player)
    }

    pub fn view(&self) -> TeamsView {
        TeamsView {
            team_a: self.team_a.clone(),
            team_b: self.team_b.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/teams_tests.rs"]
mod tests;

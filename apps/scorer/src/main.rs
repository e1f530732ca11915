use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shared::{
    domain::Outcome,
    protocol::{
        CustomOverride, MatchEvent, MatchSnapshot, RecordActionRequest, SetLog, TeamInput,
        UpdateTeamsRequest,
    },
};
use tracing_subscriber::EnvFilter;

mod client;

use client::ScoreboardClient;

#[derive(Parser, Debug)]
#[command(about = "Operator console for a scorebook server")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Verdict {
    Point,
    Fault,
}

impl From<Verdict> for Outcome {
    fn from(value: Verdict) -> Self {
        match value {
            Verdict::Point => Outcome::Point,
            Verdict::Fault => Outcome::Fault,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the scoreboard.
    Status,
    /// Show a set's log, newest first.
    Log {
        #[arg(long)]
        set: Option<u32>,
    },
    /// Record a rally outcome for a player.
    Record {
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
        #[arg(long, required_unless_present = "custom_reason")]
        category: Option<String>,
        #[arg(long, required_unless_present = "custom_reason")]
        reason: Option<String>,
        /// Manual reason; overrides category and reason.
        #[arg(long, requires = "custom_outcome")]
        custom_reason: Option<String>,
        #[arg(long, value_enum, requires = "custom_reason")]
        custom_outcome: Option<Verdict>,
    },
    /// Remove the most recent action of the current set.
    Undo,
    /// Close the current set and start the next one.
    EndSet,
    /// List categories and reasons with their outcome.
    Taxonomy,
    /// Show team names, colors and rosters.
    Teams,
    /// Replace both teams' settings.
    SetTeams {
        #[arg(long)]
        team_a_name: String,
        #[arg(long)]
        team_a_roster: String,
        #[arg(long)]
        team_a_color: Option<String>,
        #[arg(long)]
        team_b_name: String,
        #[arg(long)]
        team_b_roster: String,
        #[arg(long)]
        team_b_color: Option<String>,
    },
    /// Download the match log as CSV.
    Export {
        #[arg(long, default_value = "match_log.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let client = ScoreboardClient::new(&cli.server_url)?;

    match cli.command {
        Command::Status => print_snapshot(&client.snapshot().await?),
        Command::Log { set } => print_log(&client.set_log(set).await?),
        Command::Record {
            team,
            player,
            category,
            reason,
            custom_reason,
            custom_outcome,
        } => {
            let custom = match (custom_reason, custom_outcome) {
                (Some(reason), Some(outcome)) => Some(CustomOverride {
                    reason,
                    outcome: outcome.into(),
                }),
                _ => None,
            };
            let request = RecordActionRequest {
                team,
                player,
                category: category.unwrap_or_default(),
                reason: reason.unwrap_or_default(),
                custom,
            };
            print_event(&client.record_action(&request).await?);
        }
        Command::Undo => print_event(&client.undo_last().await?),
        Command::EndSet => print_event(&client.end_set().await?),
        Command::Taxonomy => {
            for category in client.taxonomy().await? {
                println!("{}", category.name);
                for reason in category.reasons {
                    println!("  {:<20} {}", reason.name, reason.outcome);
                }
            }
        }
        Command::Teams => {
            let teams = client.teams().await?;
            for (label, team) in [("A", teams.team_a), ("B", teams.team_b)] {
                println!(
                    "{label}: {} ({}) roster: {}",
                    team.name,
                    team.color,
                    team.roster.join(", ")
                );
            }
        }
        Command::SetTeams {
            team_a_name,
            team_a_roster,
            team_a_color,
            team_b_name,
            team_b_roster,
            team_b_color,
        } => {
            let request = UpdateTeamsRequest {
                team_a: TeamInput {
                    name: team_a_name,
                    color: team_a_color,
                    roster: team_a_roster,
                },
                team_b: TeamInput {
                    name: team_b_name,
                    color: team_b_color,
                    roster: team_b_roster,
                },
            };
            print_event(&client.update_teams(&request).await?);
        }
        Command::Export { out } => {
            let csv = client.export_csv().await?;
            tokio::fs::write(&out, &csv)
                .await
                .with_context(|| format!("failed to write '{}'", out.display()))?;
            println!("wrote {} bytes to {}", csv.len(), out.display());
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &MatchSnapshot) {
    println!(
        "SET {}  {} {} : {} {}",
        snapshot.current_set,
        snapshot.team_a.name,
        snapshot.team_a.score,
        snapshot.team_b.score,
        snapshot.team_b.name
    );
    if !snapshot.set_history.is_empty() {
        println!("previous sets: {}", snapshot.set_history.join(" | "));
    }
}

fn print_log(log: &SetLog) {
    println!("set {}", log.set_number);
    if log.rows.is_empty() {
        println!("  no entries yet");
        return;
    }
    for row in &log.rows {
        let entry = &row.entry;
        println!(
            "  {}  {:<10} #{:<3} {:<8} {:<20} {:<5} {}",
            entry.local_time(),
            entry.team_name,
            entry.player,
            entry.category,
            entry.reason,
            entry.outcome.label(),
            entry.score_snapshot
        );
    }
}

fn print_event(event: &MatchEvent) {
    match event {
        MatchEvent::ActionRecorded { entry, snapshot } => {
            println!(
                "recorded {} #{} {}/{} ({})",
                entry.team_name, entry.player, entry.category, entry.reason, entry.outcome
            );
            print_snapshot(snapshot);
        }
        MatchEvent::ActionUndone { entry, snapshot } => {
            println!("undid {} #{} {}", entry.team_name, entry.player, entry.reason);
            print_snapshot(snapshot);
        }
        MatchEvent::SetEnded {
            closed_set,
            final_score,
            snapshot,
        } => {
            println!("set {closed_set} closed at {final_score}");
            print_snapshot(snapshot);
        }
        MatchEvent::TeamsUpdated { teams } => {
            println!("teams: {} vs {}", teams.team_a.name, teams.team_b.name);
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod pairing;
pub mod scoring;
pub mod services;
pub mod standings;
pub mod tiebreaker;

use std::collections::HashMap;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Command};
use crate::config::GameProfile;
use crate::domain::ParticipantId;
use crate::services::run_simulation;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_simulate(participants: u32, rounds: u32, seed: u64) -> Result<()> {
    let service = run_simulation(participants, rounds, seed)?;

    let names: HashMap<ParticipantId, String> = service
        .participants()
        .iter()
        .map(|p| (p.id, p.identity.display_name()))
        .collect();

    println!(
        "\n{} ({} participants, {} rounds, seed {})\n",
        "Final standings".bold(),
        participants,
        rounds,
        seed
    );
    println!(
        "{:>4}  {:<12} {:>6}  {:>9}  {:>9}  {:>6}",
        "Rank".bold(),
        "Player".bold(),
        "Pts".bold(),
        "W-D-L(B)".bold(),
        "Buchholz".bold(),
        "OWP".bold()
    );
    for standing in service.standings() {
        let name = names
            .get(&standing.participant_id)
            .cloned()
            .unwrap_or_else(|| format!("participant {}", standing.participant_id));
        let record = format!(
            "{}-{}-{}({})",
            standing.wins, standing.draws, standing.losses, standing.byes
        );
        let rank = if standing.rank == 1 {
            standing.rank.to_string().green().bold().to_string()
        } else {
            standing.rank.to_string()
        };
        println!(
            "{rank:>4}  {name:<12} {:>6.1}  {record:>9}  {:>9.1}  {:>6.3}",
            standing.points, standing.buchholz, standing.opponent_win_pct
        );
    }
    Ok(())
}

pub fn handle_profile() -> Result<()> {
    let profile = GameProfile::standard_swiss();
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

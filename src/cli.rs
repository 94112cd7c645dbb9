use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "swiss-rounds tournament engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Run a seeded tournament end to end and print the final standings
    Simulate {
        /// Number of participants
        #[arg(short, long, default_value_t = 8)]
        participants: u32,
        /// Number of Swiss rounds
        #[arg(short, long, default_value_t = 3)]
        rounds: u32,
        /// Seed for pairings and simulated results
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the default game profile (scoring, tiebreakers, pairing) as JSON
    Profile,
}

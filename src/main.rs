use anyhow::Result;

use swiss_rounds::cli::Command;
use swiss_rounds::{handle_profile, handle_simulate, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Simulate { participants, rounds, seed } => {
            handle_simulate(*participants, *rounds, *seed)
        }
        Command::Profile => handle_profile(),
    }
}

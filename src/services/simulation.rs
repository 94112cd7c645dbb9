//! Seeded end-to-end simulation: registers a field of guests, plays every
//! round with randomized results and returns the finished tournament.
//! The same seed always produces the same pairings, results and standings.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameProfile;
use crate::domain::{Actor, MatchId, MatchResult, ResultReporting, Tournament};
use crate::errors::Result;
use crate::lifecycle::ResultReport;
use crate::services::TournamentService;

pub fn run_simulation(participants: u32, rounds: u32, seed: u64) -> Result<TournamentService> {
    let mut tournament = Tournament::new(1, "simulated tournament");
    tournament.max_rounds = Some(rounds);
    tournament.result_reporting = ResultReporting::PlayersTrusted;
    let mut service = TournamentService::new(tournament, GameProfile::standard_swiss());

    service.open_registration()?;
    for i in 1..=participants {
        let id = service.register_guest(&format!("Player {i}"), None)?;
        service.confirm_participant(id)?;
    }
    service.close_registration()?;
    service.start()?;
    info!("simulation: {participants} participants, {rounds} rounds, seed {seed}");

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..rounds {
        let number = service.generate_next_round()?;
        play_round(&mut service, &mut rng)?;
        service.complete_current_round()?;
        info!("simulation: round {number} complete");
    }

    service.finish()?;
    Ok(service)
}

fn play_round(service: &mut TournamentService, rng: &mut StdRng) -> Result<()> {
    let pending: Vec<MatchId> = service
        .matches()
        .iter()
        .filter(|m| !m.is_decided())
        .map(|m| m.id)
        .collect();

    for match_id in pending {
        let reporter = service
            .matches()
            .iter()
            .find(|m| m.id == match_id)
            .map(|m| Actor::Player(m.player1_id))
            .unwrap_or(Actor::Admin);
        // One draw in ten; otherwise a coin flip.
        let result = match rng.random_range(0..10) {
            0 => MatchResult::Draw,
            n if n % 2 == 0 => MatchResult::PlayerOneWin,
            _ => MatchResult::PlayerTwoWin,
        };
        let report = ResultReport { result, ..Default::default() };
        service.report(match_id, report, reporter)?;
    }
    Ok(())
}

pub mod simulation;
pub mod tournament;

pub use simulation::run_simulation;
pub use tournament::TournamentService;

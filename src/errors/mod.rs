use thiserror::Error;

use crate::domain::{MatchId, ParticipantId, RoundId, TournamentId};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Typed failures surfaced by the engine. Each variant carries enough
/// context (entity id, current state, attempted state) for the caller to
/// render a precise message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("round {0} not found")]
    RoundNotFound(RoundId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("participant {0} not found")]
    ParticipantNotFound(ParticipantId),

    #[error("invalid {entity} transition for id {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: i64,
        from: String,
        to: String,
    },

    #[error("round {round_number} is not completed: {unreported} unreported matches")]
    PreviousRoundNotCompleted {
        round_number: u32,
        unreported: usize,
    },

    #[error("round {round_number} cannot be completed: {unreported} matches not played")]
    RoundNotComplete {
        round_number: u32,
        unreported: usize,
    },

    #[error("cannot generate pairings for tournament {tournament_id}: {reason}")]
    CannotGeneratePairings {
        tournament_id: TournamentId,
        reason: String,
    },

    #[error("tournament {tournament_id} has reached its round limit of {max_rounds}")]
    RoundLimitReached {
        tournament_id: TournamentId,
        max_rounds: u32,
    },

    #[error("registration for tournament {tournament_id} is not open (status: {status})")]
    RegistrationNotOpen {
        tournament_id: TournamentId,
        status: String,
    },

    #[error("tournament {tournament_id} is full ({limit} participants)")]
    ParticipantLimitReached {
        tournament_id: TournamentId,
        limit: u32,
    },

    #[error("{actor} is not authorized to {action} match {match_id}")]
    NotAuthorized {
        actor: String,
        action: &'static str,
        match_id: MatchId,
    },

    #[error("invalid stat '{key}': {reason}")]
    InvalidStat { key: String, reason: String },

    #[error("invalid report for match {match_id}: {reason}")]
    InvalidReport { match_id: MatchId, reason: String },
}

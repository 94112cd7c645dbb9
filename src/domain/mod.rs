pub mod models;
pub mod stats;
pub mod status;

pub use models::{
    Actor, Identity, MatchHistory, MatchId, MatchResult, Outcome, Participant, ParticipantId,
    Round, RoundId, Standing, Tournament, TournamentId, TournamentMatch, UserId,
};
pub use stats::{StatMap, StatValue, validate_stat_map};
pub use status::{
    MatchStatus, ParticipantStatus, ResultReporting, RoundStatus, TournamentStatus,
};

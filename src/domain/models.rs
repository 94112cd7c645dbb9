use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::StatMap;
use super::status::{MatchStatus, ParticipantStatus, ResultReporting, RoundStatus, TournamentStatus};

pub type TournamentId = i64;
pub type ParticipantId = i64;
pub type RoundId = i64;
pub type MatchId = i64;
pub type UserId = i64;

/// A tournament and its round/participant bookkeeping.
///
/// Invariant: `current_round <= max_rounds` whenever `max_rounds` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub max_rounds: Option<u32>,
    pub current_round: u32,
    pub min_participants: u32,
    pub max_participants: Option<u32>,
    pub result_reporting: ResultReporting,
    pub game_profile_id: Option<i64>,
}

impl Tournament {
    pub fn new(id: TournamentId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: TournamentStatus::Draft,
            max_rounds: None,
            current_round: 0,
            min_participants: 2,
            max_participants: None,
            result_reporting: ResultReporting::PlayersWithConfirmation,
            game_profile_id: None,
        }
    }
}

/// Who a participant is: a registered user or an ad-hoc guest. Exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    User { user_id: UserId },
    Guest { name: String, email: Option<String> },
}

impl Identity {
    pub fn display_name(&self) -> String {
        match self {
            Identity::User { user_id } => format!("user:{user_id}"),
            Identity::Guest { name, .. } => name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub identity: Identity,
    pub status: ParticipantStatus,
    pub seed: u32,
    pub has_received_bye: bool,
}

impl Participant {
    pub fn is_playable(&self) -> bool {
        self.status.is_playable()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    pub round_number: u32,
    pub status: RoundStatus,
}

/// The canonical match result, from player one's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[default]
    NotPlayed,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
    Bye,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::NotPlayed => write!(f, "not_played"),
            MatchResult::PlayerOneWin => write!(f, "player_one_win"),
            MatchResult::PlayerTwoWin => write!(f, "player_two_win"),
            MatchResult::Draw => write!(f, "draw"),
            MatchResult::Bye => write!(f, "bye"),
        }
    }
}

/// One player's outcome in a decided match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
    Bye,
}

/// Who performed a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Admin,
    Player(ParticipantId),
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Admin => write!(f, "admin"),
            Actor::Player(id) => write!(f, "participant {id}"),
        }
    }
}

/// A single pairing within a round. `player2_id == None` marks a bye;
/// a bye's result is only ever `NotPlayed` or `Bye`, and a two-player
/// match never carries a `Bye` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub id: MatchId,
    pub round_id: RoundId,
    pub table_number: u32,
    pub player1_id: ParticipantId,
    pub player2_id: Option<ParticipantId>,
    pub result: MatchResult,
    pub status: MatchStatus,
    pub player1_score: Option<u32>,
    pub player2_score: Option<u32>,
    pub player1_stats: StatMap,
    pub player2_stats: StatMap,
    pub reported_by: Option<Actor>,
    pub reported_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<Actor>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub is_disputed: bool,
}

impl TournamentMatch {
    pub fn new(id: MatchId, round_id: RoundId, table_number: u32, player1_id: ParticipantId) -> Self {
        Self {
            id,
            round_id,
            table_number,
            player1_id,
            player2_id: None,
            result: MatchResult::NotPlayed,
            status: MatchStatus::NotPlayed,
            player1_score: None,
            player2_score: None,
            player1_stats: StatMap::new(),
            player2_stats: StatMap::new(),
            reported_by: None,
            reported_at: None,
            confirmed_by: None,
            confirmed_at: None,
            is_disputed: false,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player2_id.is_none()
    }

    pub fn is_decided(&self) -> bool {
        self.result != MatchResult::NotPlayed
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.player1_id == participant || self.player2_id == Some(participant)
    }

    pub fn opponent_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        if self.player1_id == participant {
            self.player2_id
        } else if self.player2_id == Some(participant) {
            Some(self.player1_id)
        } else {
            None
        }
    }

    /// The given participant's outcome, if the match is decided and they
    /// took part in it.
    pub fn outcome_for(&self, participant: ParticipantId) -> Option<Outcome> {
        if !self.involves(participant) {
            return None;
        }
        let is_player_one = self.player1_id == participant;
        match self.result {
            MatchResult::NotPlayed => None,
            MatchResult::Draw => Some(Outcome::Draw),
            MatchResult::Bye => Some(Outcome::Bye),
            MatchResult::PlayerOneWin => {
                Some(if is_player_one { Outcome::Win } else { Outcome::Loss })
            }
            MatchResult::PlayerTwoWin => {
                Some(if is_player_one { Outcome::Loss } else { Outcome::Win })
            }
        }
    }

    pub fn score_for(&self, participant: ParticipantId) -> Option<u32> {
        if self.player1_id == participant {
            self.player1_score
        } else if self.player2_id == Some(participant) {
            self.player2_score
        } else {
            None
        }
    }

    pub fn stats_for(&self, participant: ParticipantId) -> Option<&StatMap> {
        if self.player1_id == participant {
            Some(&self.player1_stats)
        } else if self.player2_id == Some(participant) {
            Some(&self.player2_stats)
        } else {
            None
        }
    }
}

/// Immutable audit record of one result transition. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchHistory {
    pub match_id: MatchId,
    pub previous_result: MatchResult,
    pub new_result: MatchResult,
    pub previous_scores: (Option<u32>, Option<u32>),
    pub new_scores: (Option<u32>, Option<u32>),
    pub changed_by: Actor,
    pub reason: String,
    pub changed_at: DateTime<Utc>,
}

/// Derived ranking entry, fully recomputed on every standings pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub participant_id: ParticipantId,
    pub rank: u32,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub byes: u32,
    pub points: f64,
    pub buchholz: f64,
    pub median_buchholz: f64,
    pub progressive: f64,
    pub opponent_win_pct: f64,
    pub accumulated_stats: BTreeMap<String, f64>,
    pub calculated_tiebreakers: BTreeMap<String, f64>,
}

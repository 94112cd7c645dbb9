use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Validates a transition against an entity's allowed-transition table and
/// fails fast with a typed error instead of silently no-opping.
fn guard_transition<S>(entity: &'static str, id: i64, from: S, to: S, allowed: bool) -> Result<()>
where
    S: fmt::Display,
{
    if allowed {
        Ok(())
    } else {
        Err(EngineError::InvalidTransition {
            entity,
            id,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    #[default]
    Draft,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Finished,
    Cancelled,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::RegistrationOpen => write!(f, "registration_open"),
            Self::RegistrationClosed => write!(f, "registration_closed"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl TournamentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Linear progression plus cancellation from any non-terminal state.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Draft, Self::RegistrationOpen)
            | (Self::RegistrationOpen, Self::RegistrationClosed)
            | (Self::RegistrationClosed, Self::InProgress)
            | (Self::InProgress, Self::Finished) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn transition(self, id: i64, next: Self) -> Result<Self> {
        guard_transition("tournament", id, self, next, self.can_transition_to(next))?;
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Confirmed,
    CheckedIn,
    Withdrawn,
    Disqualified,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::CheckedIn => write!(f, "checked_in"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::Disqualified => write!(f, "disqualified"),
        }
    }
}

impl ParticipantStatus {
    /// Only confirmed or checked-in participants enter the pairing pool.
    pub fn is_playable(self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Withdrawn | Self::Disqualified)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Registered, Self::Confirmed) | (Self::Confirmed, Self::CheckedIn) => true,
            (from, Self::Withdrawn) | (from, Self::Disqualified) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn transition(self, id: i64, next: Self) -> Result<Self> {
        guard_transition("participant", id, self, next, self.can_transition_to(next))?;
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    #[default]
    Pending,
    InProgress,
    Finished,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl RoundStatus {
    /// Strictly linear: no skipping straight to `Finished`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress) | (Self::InProgress, Self::Finished)
        )
    }

    pub fn transition(self, id: i64, next: Self) -> Result<Self> {
        guard_transition("round", id, self, next, self.can_transition_to(next))?;
        Ok(next)
    }
}

/// Result-reporting lifecycle of a single match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    NotPlayed,
    Reported,
    Confirmed,
    Disputed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPlayed => write!(f, "not_played"),
            Self::Reported => write!(f, "reported"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Disputed => write!(f, "disputed"),
        }
    }
}

impl MatchStatus {
    /// `NotPlayed -> Reported -> Confirmed`, disputes branch off `Reported`,
    /// and every state resets back to `NotPlayed` (admin action).
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::NotPlayed, Self::Reported)
            | (Self::Reported, Self::Confirmed)
            | (Self::Reported, Self::Disputed)
            | (Self::Disputed, Self::Confirmed) => true,
            // Admin corrections re-report over a standing report or dispute.
            (Self::Reported, Self::Reported) | (Self::Disputed, Self::Reported) => true,
            (_, Self::NotPlayed) => true,
            _ => false,
        }
    }

    pub fn transition(self, id: i64, next: Self) -> Result<Self> {
        guard_transition("match", id, self, next, self.can_transition_to(next))?;
        Ok(next)
    }
}

/// Who may report match results and whether a confirmation step applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultReporting {
    AdminOnly,
    #[default]
    PlayersWithConfirmation,
    PlayersTrusted,
}

impl fmt::Display for ResultReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdminOnly => write!(f, "admin_only"),
            Self::PlayersWithConfirmation => write!(f, "players_with_confirmation"),
            Self::PlayersTrusted => write!(f, "players_trusted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tournament_progression_is_linear() {
        let mut status = TournamentStatus::Draft;
        for next in [
            TournamentStatus::RegistrationOpen,
            TournamentStatus::RegistrationClosed,
            TournamentStatus::InProgress,
            TournamentStatus::Finished,
        ] {
            status = status.transition(1, next).unwrap();
        }
        assert_eq!(status, TournamentStatus::Finished);
    }

    #[test]
    fn tournament_cannot_skip_states() {
        let err = TournamentStatus::Draft
            .transition(1, TournamentStatus::InProgress)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                entity: "tournament",
                id: 1,
                from: "draft".to_string(),
                to: "in_progress".to_string(),
            }
        );
    }

    #[test]
    fn cancellation_reachable_from_non_terminal_states_only() {
        assert!(TournamentStatus::Draft.can_transition_to(TournamentStatus::Cancelled));
        assert!(TournamentStatus::InProgress.can_transition_to(TournamentStatus::Cancelled));
        assert!(!TournamentStatus::Finished.can_transition_to(TournamentStatus::Cancelled));
        assert!(!TournamentStatus::Cancelled.can_transition_to(TournamentStatus::Cancelled));
    }

    #[test]
    fn round_cannot_skip_to_finished() {
        assert!(!RoundStatus::Pending.can_transition_to(RoundStatus::Finished));
        assert!(RoundStatus::Pending.can_transition_to(RoundStatus::InProgress));
        assert!(RoundStatus::InProgress.can_transition_to(RoundStatus::Finished));
    }

    #[test]
    fn confirmed_match_cannot_be_re_reported() {
        assert!(!MatchStatus::Confirmed.can_transition_to(MatchStatus::Reported));
        assert!(MatchStatus::Confirmed.can_transition_to(MatchStatus::NotPlayed));
    }

    #[test]
    fn playable_statuses() {
        assert!(ParticipantStatus::Confirmed.is_playable());
        assert!(ParticipantStatus::CheckedIn.is_playable());
        assert!(!ParticipantStatus::Registered.is_playable());
        assert!(!ParticipantStatus::Withdrawn.is_playable());
    }
}

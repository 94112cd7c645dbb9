//! In-memory orchestration of one tournament: registration, round
//! generation, result reporting and standings, with an append-only match
//! history. All rule enforcement lives in the pure modules underneath;
//! this layer only wires state together.

use log::info;

use crate::config::GameProfile;
use crate::domain::{
    Actor, Identity, MatchHistory, MatchId, Participant, ParticipantId, ParticipantStatus, Round,
    Standing, Tournament, TournamentMatch, TournamentStatus, UserId,
};
use crate::errors::{EngineError, Result};
use crate::lifecycle::{self, ResultReport};
use crate::pairing;
use crate::standings;

pub struct TournamentService {
    tournament: Tournament,
    profile: GameProfile,
    participants: Vec<Participant>,
    rounds: Vec<Round>,
    matches: Vec<TournamentMatch>,
    history: Vec<MatchHistory>,
}

impl TournamentService {
    pub fn new(tournament: Tournament, profile: GameProfile) -> Self {
        Self {
            tournament,
            profile,
            participants: Vec::new(),
            rounds: Vec::new(),
            matches: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn matches(&self) -> &[TournamentMatch] {
        &self.matches
    }

    pub fn history(&self) -> &[MatchHistory] {
        &self.history
    }

    // Tournament lifecycle.

    pub fn open_registration(&mut self) -> Result<()> {
        lifecycle::tournaments::open_registration(&mut self.tournament)
    }

    pub fn close_registration(&mut self) -> Result<()> {
        lifecycle::tournaments::close_registration(&mut self.tournament)
    }

    pub fn start(&mut self) -> Result<()> {
        let playable = self.participants.iter().filter(|p| p.is_playable()).count();
        if (playable as u32) < self.tournament.min_participants {
            return Err(EngineError::CannotGeneratePairings {
                tournament_id: self.tournament.id,
                reason: format!(
                    "{playable} playable participants, minimum is {}",
                    self.tournament.min_participants
                ),
            });
        }
        lifecycle::tournaments::start(&mut self.tournament)
    }

    pub fn finish(&mut self) -> Result<()> {
        lifecycle::tournaments::finish(&mut self.tournament)
    }

    pub fn cancel(&mut self) -> Result<()> {
        lifecycle::tournaments::cancel(&mut self.tournament)
    }

    // Registration.

    pub fn register_guest(&mut self, name: &str, email: Option<&str>) -> Result<ParticipantId> {
        self.register(Identity::Guest {
            name: name.to_string(),
            email: email.map(str::to_string),
        })
    }

    pub fn register_user(&mut self, user_id: UserId) -> Result<ParticipantId> {
        self.register(Identity::User { user_id })
    }

    fn register(&mut self, identity: Identity) -> Result<ParticipantId> {
        if self.tournament.status != TournamentStatus::RegistrationOpen {
            return Err(EngineError::RegistrationNotOpen {
                tournament_id: self.tournament.id,
                status: self.tournament.status.to_string(),
            });
        }
        if let Some(limit) = self.tournament.max_participants {
            if self.participants.len() as u32 >= limit {
                return Err(EngineError::ParticipantLimitReached {
                    tournament_id: self.tournament.id,
                    limit,
                });
            }
        }
        let seed = self.participants.len() as u32 + 1;
        let id = ParticipantId::from(seed);
        info!(
            "tournament {}: registered {} as participant {id} (seed {seed})",
            self.tournament.id,
            identity.display_name()
        );
        self.participants.push(Participant {
            id,
            tournament_id: self.tournament.id,
            identity,
            status: ParticipantStatus::Registered,
            seed,
            has_received_bye: false,
        });
        Ok(id)
    }

    pub fn confirm_participant(&mut self, id: ParticipantId) -> Result<()> {
        lifecycle::participants::confirm(self.participant_mut(id)?)
    }

    pub fn check_in_participant(&mut self, id: ParticipantId) -> Result<()> {
        lifecycle::participants::check_in(self.participant_mut(id)?)
    }

    pub fn withdraw_participant(&mut self, id: ParticipantId) -> Result<()> {
        lifecycle::participants::withdraw(self.participant_mut(id)?)
    }

    pub fn disqualify_participant(&mut self, id: ParticipantId) -> Result<()> {
        lifecycle::participants::disqualify(self.participant_mut(id)?)
    }

    // Rounds.

    /// Generates, stores and starts the next round. Returns its number.
    pub fn generate_next_round(&mut self) -> Result<u32> {
        let generated = pairing::generate_round(
            &self.tournament,
            &self.participants,
            &self.rounds,
            &self.matches,
            &self.profile,
        )?;
        let mut round = generated.round;
        lifecycle::start_round(&mut round)?;
        let number = round.round_number;

        for m in &generated.matches {
            if m.is_bye() {
                if let Some(p) = self.participants.iter_mut().find(|p| p.id == m.player1_id) {
                    p.has_received_bye = true;
                }
            }
        }
        self.rounds.push(round);
        self.matches.extend(generated.matches);
        self.tournament.current_round = number;
        Ok(number)
    }

    pub fn complete_current_round(&mut self) -> Result<()> {
        let number = self.tournament.current_round;
        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.round_number == number)
            .ok_or(EngineError::RoundNotFound(i64::from(number)))?;
        lifecycle::complete_round(round, &self.matches)
    }

    // Results.

    pub fn report(&mut self, match_id: MatchId, report: ResultReport, actor: Actor) -> Result<()> {
        let index = self.match_index(match_id)?;
        let entry = lifecycle::report_result(
            &mut self.matches[index],
            report,
            actor,
            &self.tournament,
            &self.profile,
        )?;
        self.history.push(entry);
        Ok(())
    }

    pub fn confirm(&mut self, match_id: MatchId, actor: Actor) -> Result<()> {
        let index = self.match_index(match_id)?;
        lifecycle::confirm_result(&mut self.matches[index], actor, &self.tournament)
    }

    pub fn dispute(&mut self, match_id: MatchId, actor: Actor) -> Result<()> {
        let index = self.match_index(match_id)?;
        lifecycle::dispute(&mut self.matches[index], actor)
    }

    pub fn reset(&mut self, match_id: MatchId, actor: Actor, reason: &str) -> Result<()> {
        let index = self.match_index(match_id)?;
        let entry = lifecycle::reset_result(&mut self.matches[index], actor, reason)?;
        self.history.push(entry);
        Ok(())
    }

    // Standings.

    pub fn standings(&self) -> Vec<Standing> {
        standings::calculate_standings(
            &self.tournament,
            &self.participants,
            &self.rounds,
            &self.matches,
            &self.profile,
        )
    }

    fn participant_mut(&mut self, id: ParticipantId) -> Result<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EngineError::ParticipantNotFound(id))
    }

    fn match_index(&self, id: MatchId) -> Result<usize> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(EngineError::MatchNotFound(id))
    }
}

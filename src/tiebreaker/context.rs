//! One aggregation pass over a tournament's decided matches, shared by the
//! standings calculator and every tiebreaker function. Built fresh on each
//! standings request; nothing here is incrementally patched.

use std::collections::{BTreeMap, HashMap};

use crate::config::GameProfile;
use crate::domain::{
    Outcome, Participant, ParticipantId, Round, StatMap, Tournament, TournamentId, TournamentMatch,
};
use crate::scoring;

/// One decided match from a single participant's perspective.
#[derive(Debug, Clone)]
pub struct Encounter {
    pub round_number: u32,
    /// `None` marks a bye.
    pub opponent: Option<ParticipantId>,
    pub outcome: Outcome,
    pub points_earned: f64,
    pub own_score: Option<u32>,
    pub opp_score: Option<u32>,
    pub own_stats: StatMap,
    pub opp_stats: StatMap,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Record {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub byes: u32,
}

impl Record {
    pub fn matches_played(&self) -> u32 {
        self.wins + self.draws + self.losses + self.byes
    }

    /// Byes are excluded from win-percentage denominators.
    pub fn non_bye_matches(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

#[derive(Debug, Clone)]
pub struct TiebreakerContext {
    pub tournament_id: TournamentId,
    /// The playable roster, in input order.
    pub participants: Vec<ParticipantId>,
    pub points: HashMap<ParticipantId, f64>,
    pub records: HashMap<ParticipantId, Record>,
    /// Per participant, sorted by round number.
    pub encounters: HashMap<ParticipantId, Vec<Encounter>>,
    pub accumulated_stats: HashMap<ParticipantId, BTreeMap<String, f64>>,
    pub bye_opponent_score: f64,
}

impl TiebreakerContext {
    /// Aggregates all decided matches. The roster keeps playable
    /// participants only, but opponents outside it (withdrawn,
    /// disqualified) still accumulate points so that schedule-strength
    /// tiebreakers stay meaningful.
    pub fn build(
        tournament: &Tournament,
        participants: &[Participant],
        rounds: &[Round],
        matches: &[TournamentMatch],
        profile: &GameProfile,
    ) -> Self {
        let round_numbers: HashMap<i64, u32> =
            rounds.iter().map(|r| (r.id, r.round_number)).collect();

        let mut ctx = Self {
            tournament_id: tournament.id,
            participants: participants
                .iter()
                .filter(|p| p.is_playable())
                .map(|p| p.id)
                .collect(),
            points: HashMap::new(),
            records: HashMap::new(),
            encounters: HashMap::new(),
            accumulated_stats: HashMap::new(),
            bye_opponent_score: profile.tiebreakers.bye_opponent_score,
        };

        for m in matches.iter().filter(|m| m.is_decided()) {
            let round_number = round_numbers.get(&m.round_id).copied().unwrap_or(0);
            let match_points = scoring::evaluate_match(m, &profile.scoring_rules);

            ctx.record_side(m, m.player1_id, match_points.player1, round_number);
            if let Some(player2) = m.player2_id {
                ctx.record_side(m, player2, match_points.player2, round_number);
            }
        }

        for sides in ctx.encounters.values_mut() {
            sides.sort_by_key(|e| e.round_number);
        }
        ctx
    }

    fn record_side(
        &mut self,
        m: &TournamentMatch,
        participant: ParticipantId,
        points_earned: f64,
        round_number: u32,
    ) {
        let Some(outcome) = m.outcome_for(participant) else {
            return;
        };

        *self.points.entry(participant).or_insert(0.0) += points_earned;

        let record = self.records.entry(participant).or_default();
        match outcome {
            Outcome::Win => record.wins += 1,
            Outcome::Draw => record.draws += 1,
            Outcome::Loss => record.losses += 1,
            Outcome::Bye => record.byes += 1,
        }

        let own_stats = m.stats_for(participant).cloned().unwrap_or_default();
        let opponent = m.opponent_of(participant);
        let opp_stats = opponent
            .and_then(|opp| m.stats_for(opp))
            .cloned()
            .unwrap_or_default();

        let stats = self.accumulated_stats.entry(participant).or_default();
        for (key, value) in &own_stats {
            *stats.entry(key.clone()).or_insert(0.0) += value.as_f64();
        }

        self.encounters.entry(participant).or_default().push(Encounter {
            round_number,
            opponent,
            outcome,
            points_earned,
            own_score: m.score_for(participant),
            opp_score: opponent.and_then(|opp| m.score_for(opp)),
            own_stats,
            opp_stats,
        });
    }

    pub fn points_of(&self, participant: ParticipantId) -> f64 {
        self.points.get(&participant).copied().unwrap_or(0.0)
    }

    pub fn record_of(&self, participant: ParticipantId) -> Record {
        self.records.get(&participant).copied().unwrap_or_default()
    }

    pub fn encounters_of(&self, participant: ParticipantId) -> &[Encounter] {
        self.encounters
            .get(&participant)
            .map_or(&[], |e| e.as_slice())
    }

    pub fn accumulated_stats_of(&self, participant: ParticipantId) -> BTreeMap<String, f64> {
        self.accumulated_stats
            .get(&participant)
            .cloned()
            .unwrap_or_default()
    }

    /// Match-win percentage over non-bye matches, floored.
    pub fn match_win_pct(&self, participant: ParticipantId, floor: f64) -> f64 {
        let record = self.record_of(participant);
        let denominator = f64::from(record.non_bye_matches());
        if denominator == 0.0 {
            return floor;
        }
        let pct = (f64::from(record.wins) + 0.5 * f64::from(record.draws)) / denominator;
        pct.max(floor)
    }

    /// Game-win percentage from reported scores, floored.
    pub fn game_win_pct(&self, participant: ParticipantId, floor: f64) -> f64 {
        let (mut won, mut total) = (0u32, 0u32);
        for encounter in self.encounters_of(participant) {
            if let (Some(own), Some(opp)) = (encounter.own_score, encounter.opp_score) {
                won += own;
                total += own + opp;
            }
        }
        if total == 0 {
            return floor;
        }
        (f64::from(won) / f64::from(total)).max(floor)
    }

    /// True when the two participants already met in a decided match.
    pub fn have_played(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.encounters_of(a)
            .iter()
            .any(|e| e.opponent == Some(b))
    }
}

//! Aggregates match outcomes into per-participant records and ranks them
//! by points plus the profile's ordered tiebreakers. Standings are always
//! recomputed in full from the match history, never patched in place.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;

use crate::config::{Direction, GameProfile, TiebreakerKind};
use crate::domain::{Participant, ParticipantId, Round, Standing, Tournament, TournamentMatch};
use crate::tiebreaker::{self, TiebreakerContext};

const POINTS_EPSILON: f64 = 1e-9;

/// Ranks all playable participants of a tournament. Ranking is total and
/// deterministic: points descending, configured tiebreakers in priority
/// order, then seed and participant id as the stable fallback, so ranks
/// come out 1..N with no gaps and no shared ranks.
pub fn calculate_standings(
    tournament: &Tournament,
    participants: &[Participant],
    rounds: &[Round],
    matches: &[TournamentMatch],
    profile: &GameProfile,
) -> Vec<Standing> {
    let ctx = TiebreakerContext::build(tournament, participants, rounds, matches, profile);
    debug!(
        "standings pass for tournament {}: {} playable participants, {} decided matches",
        tournament.id,
        ctx.participants.len(),
        matches.iter().filter(|m| m.is_decided()).count()
    );

    let seeds: HashMap<ParticipantId, u32> =
        participants.iter().map(|p| (p.id, p.seed)).collect();

    let mut standings: Vec<Standing> = ctx
        .participants
        .iter()
        .map(|&id| build_standing(&ctx, profile, id))
        .collect();

    standings.sort_by(|a, b| compare_standings(a, b, profile, &seeds));
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = index as u32 + 1;
    }
    standings
}

fn build_standing(ctx: &TiebreakerContext, profile: &GameProfile, id: ParticipantId) -> Standing {
    let record = ctx.record_of(id);

    let mut calculated_tiebreakers = std::collections::BTreeMap::new();
    for definition in &profile.tiebreakers.definitions {
        let value = tiebreaker::compute(&definition.kind, ctx, id);
        calculated_tiebreakers.insert(definition.key.clone(), value);
    }

    // The four classic tiebreakers are always present on a standing, on
    // top of whatever the profile configures.
    Standing {
        participant_id: id,
        rank: 0,
        matches_played: record.matches_played(),
        wins: record.wins,
        draws: record.draws,
        losses: record.losses,
        byes: record.byes,
        points: ctx.points_of(id),
        buchholz: tiebreaker::compute(&TiebreakerKind::Buchholz, ctx, id),
        median_buchholz: tiebreaker::compute(&TiebreakerKind::MedianBuchholz, ctx, id),
        progressive: tiebreaker::compute(&TiebreakerKind::Progressive, ctx, id),
        opponent_win_pct: tiebreaker::compute(
            &TiebreakerKind::OpponentWinPercentage { floor: 0.33 },
            ctx,
            id,
        ),
        accumulated_stats: ctx.accumulated_stats_of(id),
        calculated_tiebreakers,
    }
}

fn compare_standings(
    a: &Standing,
    b: &Standing,
    profile: &GameProfile,
    seeds: &HashMap<ParticipantId, u32>,
) -> Ordering {
    if let Some(order) = decisive(b.points, a.points) {
        return order;
    }
    for definition in &profile.tiebreakers.definitions {
        let left = a.calculated_tiebreakers.get(&definition.key).copied().unwrap_or(0.0);
        let right = b.calculated_tiebreakers.get(&definition.key).copied().unwrap_or(0.0);
        let (left, right) = match definition.direction {
            Direction::Descending => (right, left),
            Direction::Ascending => (left, right),
        };
        if let Some(order) = decisive(left, right) {
            return order;
        }
    }
    let seed_a = seeds.get(&a.participant_id).copied().unwrap_or(u32::MAX);
    let seed_b = seeds.get(&b.participant_id).copied().unwrap_or(u32::MAX);
    seed_a
        .cmp(&seed_b)
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}

/// A difference below the epsilon is a tie, not an ordering.
fn decisive(left: f64, right: f64) -> Option<Ordering> {
    if (left - right).abs() < POINTS_EPSILON {
        None
    } else {
        Some(left.total_cmp(&right))
    }
}

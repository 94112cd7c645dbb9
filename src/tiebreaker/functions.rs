//! One pure function per tiebreaker kind. All recompute from the shared
//! match-history context on every standings pass.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{StatAggregation, TiebreakerKind};
use crate::domain::{Outcome, ParticipantId};

use super::context::TiebreakerContext;

const POINTS_EPSILON: f64 = 1e-9;

/// Computes one tiebreaker value for a participant. Dispatch is exhaustive:
/// a new kind will not compile without a branch here.
pub fn compute(kind: &TiebreakerKind, ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    match kind {
        TiebreakerKind::Buchholz => buchholz_contributions(ctx, participant).iter().sum(),
        TiebreakerKind::MedianBuchholz => median_buchholz(ctx, participant),
        TiebreakerKind::Progressive => progressive(ctx, participant),
        TiebreakerKind::OpponentWinPercentage { floor } => {
            average_over_opponents(ctx, participant, |opp| ctx.match_win_pct(opp, *floor))
        }
        TiebreakerKind::OpponentOpponentWinPercentage { floor } => {
            average_over_opponents(ctx, participant, |opp| {
                average_over_opponents(ctx, opp, |theirs| ctx.match_win_pct(theirs, *floor))
            })
        }
        TiebreakerKind::GameWinPercentage { floor } => ctx.game_win_pct(participant, *floor),
        TiebreakerKind::OpponentGameWinPercentage { floor } => {
            average_over_opponents(ctx, participant, |opp| ctx.game_win_pct(opp, *floor))
        }
        TiebreakerKind::HeadToHead => head_to_head(ctx, participant),
        TiebreakerKind::SonnebornBerger => sonneborn_berger(ctx, participant),
        TiebreakerKind::StatAggregate { stat, aggregation } => {
            stat_aggregate(ctx, participant, stat, *aggregation)
        }
        TiebreakerKind::StrengthOfSchedule => {
            average_over_opponents(ctx, participant, |opp| ctx.points_of(opp))
        }
        TiebreakerKind::MarginOfVictory => margin_of_victory(ctx, participant),
        TiebreakerKind::Random => stable_random(ctx, participant),
    }
}

/// Opponent-strength contributions for Buchholz sums. Each bye counts the
/// configured nominal opponent score; rematches contribute per encounter.
fn buchholz_contributions(ctx: &TiebreakerContext, participant: ParticipantId) -> Vec<f64> {
    ctx.encounters_of(participant)
        .iter()
        .map(|e| match e.opponent {
            Some(opp) => ctx.points_of(opp),
            None => ctx.bye_opponent_score,
        })
        .collect()
}

/// Buchholz with the single highest and single lowest contribution dropped,
/// once there are at least three.
fn median_buchholz(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    let mut contributions = buchholz_contributions(ctx, participant);
    if contributions.len() >= 3 {
        contributions.sort_by(|a, b| a.total_cmp(b));
        contributions.pop();
        contributions.remove(0);
    }
    contributions.iter().sum()
}

/// Running sum of the participant's own cumulative points after each round
/// they played; rewards early strong performance.
fn progressive(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    let mut cumulative = 0.0;
    let mut total = 0.0;
    for encounter in ctx.encounters_of(participant) {
        cumulative += encounter.points_earned;
        total += cumulative;
    }
    total
}

fn average_over_opponents<F>(ctx: &TiebreakerContext, participant: ParticipantId, f: F) -> f64
where
    F: Fn(ParticipantId) -> f64,
{
    let values: Vec<f64> = ctx
        .encounters_of(participant)
        .iter()
        .filter_map(|e| e.opponent)
        .map(f)
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Relative ranking contribution from direct encounters with participants
/// on the same point total: +1 per win, -1 per loss.
fn head_to_head(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    let own_points = ctx.points_of(participant);
    ctx.encounters_of(participant)
        .iter()
        .filter_map(|e| e.opponent.map(|opp| (opp, e.outcome)))
        .filter(|(opp, _)| (ctx.points_of(*opp) - own_points).abs() < POINTS_EPSILON)
        .map(|(_, outcome)| match outcome {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw | Outcome::Bye => 0.0,
        })
        .sum()
}

/// Defeated opponents' points plus half of drawn opponents' points.
fn sonneborn_berger(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    ctx.encounters_of(participant)
        .iter()
        .filter_map(|e| e.opponent.map(|opp| (opp, e.outcome)))
        .map(|(opp, outcome)| match outcome {
            Outcome::Win => ctx.points_of(opp),
            Outcome::Draw => 0.5 * ctx.points_of(opp),
            Outcome::Loss | Outcome::Bye => 0.0,
        })
        .sum()
}

fn stat_aggregate(
    ctx: &TiebreakerContext,
    participant: ParticipantId,
    stat: &str,
    aggregation: StatAggregation,
) -> f64 {
    let encounters = ctx.encounters_of(participant);
    match aggregation {
        StatAggregation::Diff => encounters
            .iter()
            .filter_map(|e| {
                let own = e.own_stats.get(stat)?.as_f64();
                let opp = e.opp_stats.get(stat).map_or(0.0, |v| v.as_f64());
                Some(own - opp)
            })
            .sum(),
        StatAggregation::Sum | StatAggregation::Average | StatAggregation::Max => {
            let values: Vec<f64> = encounters
                .iter()
                .filter_map(|e| e.own_stats.get(stat).map(|v| v.as_f64()))
                .collect();
            if values.is_empty() {
                return 0.0;
            }
            match aggregation {
                StatAggregation::Sum => values.iter().sum(),
                StatAggregation::Average => values.iter().sum::<f64>() / values.len() as f64,
                StatAggregation::Max => values.iter().copied().fold(f64::MIN, f64::max),
                StatAggregation::Diff => unreachable!(),
            }
        }
    }
}

/// Total score differential across matches with reported scores.
fn margin_of_victory(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    ctx.encounters_of(participant)
        .iter()
        .filter_map(|e| match (e.own_score, e.opp_score) {
            (Some(own), Some(opp)) => Some(f64::from(own) - f64::from(opp)),
            _ => None,
        })
        .sum()
}

/// Stable random tiebreak seeded by (tournament, participant) ids — the
/// same pair always draws the same value.
fn stable_random(ctx: &TiebreakerContext, participant: ParticipantId) -> f64 {
    let seed = (ctx.tournament_id as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(participant as u64);
    StdRng::seed_from_u64(seed).random::<f64>()
}

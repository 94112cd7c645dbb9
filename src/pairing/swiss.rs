//! Swiss pairing: given current standings and match history, produce the
//! next round's pairings, respecting rematch avoidance and the bye policy.

use std::collections::{HashMap, VecDeque};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ByePolicy, GameProfile, PairingMethod, SortBasis};
use crate::domain::{
    MatchResult, MatchStatus, Participant, ParticipantId, Round, RoundId, RoundStatus, Tournament,
    TournamentMatch, TournamentStatus,
};
use crate::errors::{EngineError, Result};
use crate::standings;
use crate::tiebreaker::TiebreakerContext;

/// A freshly generated round and its matches, ready to persist. Ids are
/// composed from (tournament, round number, table number) so generation
/// stays pure; persistence layers may re-key.
#[derive(Debug, Clone)]
pub struct GeneratedRound {
    pub round: Round,
    pub matches: Vec<TournamentMatch>,
}

/// Pairs the playable pool for the next round.
///
/// Preconditions: the tournament is in progress, the prior round (if any)
/// is finished with zero unreported matches, and the round cap has not
/// been reached.
pub fn generate_round(
    tournament: &Tournament,
    participants: &[Participant],
    rounds: &[Round],
    matches: &[TournamentMatch],
    profile: &GameProfile,
) -> Result<GeneratedRound> {
    // One pairing method today; the match keeps the dispatch explicit.
    match profile.pairing.method {
        PairingMethod::Swiss => {}
    }

    if tournament.status != TournamentStatus::InProgress {
        return Err(EngineError::CannotGeneratePairings {
            tournament_id: tournament.id,
            reason: format!("tournament is {}", tournament.status),
        });
    }

    let round_number = rounds.iter().map(|r| r.round_number).max().unwrap_or(0) + 1;
    if let Some(max_rounds) = tournament.max_rounds {
        if round_number > max_rounds {
            return Err(EngineError::RoundLimitReached {
                tournament_id: tournament.id,
                max_rounds,
            });
        }
    }

    check_previous_round(rounds, matches)?;

    let playable: Vec<&Participant> = participants.iter().filter(|p| p.is_playable()).collect();
    if playable.len() < 2 {
        return Err(EngineError::CannotGeneratePairings {
            tournament_id: tournament.id,
            reason: format!("only {} playable participants", playable.len()),
        });
    }

    let ctx = TiebreakerContext::build(tournament, participants, rounds, matches, profile);
    let mut order = ranked_order(tournament, participants, rounds, matches, profile, round_number);

    // Stable per-round randomness: same inputs, same pairings.
    let mut rng = StdRng::seed_from_u64(
        (tournament.id as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(u64::from(round_number)),
    );

    let bye_recipient = if order.len() % 2 == 1 {
        let recipient = pick_bye(&order, &ctx, profile, &mut rng);
        order.retain(|&p| p != recipient);
        debug!(
            "round {round_number}: bye assigned to participant {recipient} ({:?} policy)",
            profile.pairing.bye_assignment
        );
        Some(recipient)
    } else {
        None
    };

    let pairs = pair_top_down(order, &ctx, profile.pairing.avoid_rematches, round_number);

    let round_id = compose_round_id(tournament.id, round_number);
    let round = Round {
        id: round_id,
        tournament_id: tournament.id,
        round_number,
        status: RoundStatus::Pending,
    };

    let mut new_matches = Vec::with_capacity(pairs.len() + usize::from(bye_recipient.is_some()));
    for (index, (player1, player2)) in pairs.into_iter().enumerate() {
        let table_number = index as u32 + 1;
        let mut m = TournamentMatch::new(
            compose_match_id(round_id, table_number),
            round_id,
            table_number,
            player1,
        );
        m.player2_id = Some(player2);
        new_matches.push(m);
    }
    if let Some(recipient) = bye_recipient {
        let table_number = new_matches.len() as u32 + 1;
        let mut bye = TournamentMatch::new(
            compose_match_id(round_id, table_number),
            round_id,
            table_number,
            recipient,
        );
        // Byes are decided on creation and need no confirmation.
        bye.result = MatchResult::Bye;
        bye.status = MatchStatus::Confirmed;
        new_matches.push(bye);
    }

    info!(
        "generated round {round_number} for tournament {}: {} matches{}",
        tournament.id,
        new_matches.len(),
        if bye_recipient.is_some() { " (incl. bye)" } else { "" }
    );
    Ok(GeneratedRound { round, matches: new_matches })
}

/// Fails when the latest round is unfinished or still has unreported
/// matches.
fn check_previous_round(rounds: &[Round], matches: &[TournamentMatch]) -> Result<()> {
    let Some(previous) = rounds.iter().max_by_key(|r| r.round_number) else {
        return Ok(());
    };
    let unreported = matches
        .iter()
        .filter(|m| m.round_id == previous.id && !m.is_decided())
        .count();
    if previous.status != RoundStatus::Finished || unreported > 0 {
        return Err(EngineError::PreviousRoundNotCompleted {
            round_number: previous.round_number,
            unreported,
        });
    }
    Ok(())
}

/// Round 1 pairs by seed; later rounds rank via the standings calculator
/// (points basis) or by a configured accumulated stat.
fn ranked_order(
    tournament: &Tournament,
    participants: &[Participant],
    rounds: &[Round],
    matches: &[TournamentMatch],
    profile: &GameProfile,
    round_number: u32,
) -> Vec<ParticipantId> {
    let mut playable: Vec<&Participant> = participants.iter().filter(|p| p.is_playable()).collect();

    if round_number == 1 {
        playable.sort_by_key(|p| (p.seed, p.id));
        return playable.iter().map(|p| p.id).collect();
    }

    match &profile.pairing.sort_by {
        SortBasis::Points => {
            standings::calculate_standings(tournament, participants, rounds, matches, profile)
                .into_iter()
                .map(|s| s.participant_id)
                .collect()
        }
        SortBasis::Stat(key) => {
            let standings =
                standings::calculate_standings(tournament, participants, rounds, matches, profile);
            let stat_values: HashMap<ParticipantId, f64> = standings
                .iter()
                .map(|s| {
                    (
                        s.participant_id,
                        s.accumulated_stats.get(key).copied().unwrap_or(0.0),
                    )
                })
                .collect();
            playable.sort_by(|a, b| {
                let left = stat_values.get(&a.id).copied().unwrap_or(0.0);
                let right = stat_values.get(&b.id).copied().unwrap_or(0.0);
                right
                    .total_cmp(&left)
                    .then_with(|| a.seed.cmp(&b.seed))
                    .then_with(|| a.id.cmp(&b.id))
            });
            playable.iter().map(|p| p.id).collect()
        }
    }
}

/// Applies the bye policy over candidates still under the bye cap. When
/// every candidate is at the cap the lowest-ranked participant receives
/// the bye anyway; failing here would deadlock the tournament.
fn pick_bye(
    order: &[ParticipantId],
    ctx: &TiebreakerContext,
    profile: &GameProfile,
    rng: &mut StdRng,
) -> ParticipantId {
    let cap = profile.pairing.max_byes_per_player;
    let candidates: Vec<ParticipantId> = order
        .iter()
        .copied()
        .filter(|&p| ctx.record_of(p).byes < cap)
        .collect();

    if candidates.is_empty() {
        let fallback = *order.last().expect("pool is non-empty");
        warn!(
            "all participants reached the bye cap of {cap}; assigning another bye to participant {fallback}"
        );
        return fallback;
    }

    match profile.pairing.bye_assignment {
        ByePolicy::LowestRanked => *candidates.last().expect("non-empty"),
        ByePolicy::HighestRanked => candidates[0],
        ByePolicy::Random => candidates[rng.random_range(0..candidates.len())],
    }
}

/// Greedy top-down pairing: the best unpaired participant takes the next
/// best opponent they have not met. When every remaining candidate is a
/// rematch, the constraint is relaxed instead of failing.
fn pair_top_down(
    order: Vec<ParticipantId>,
    ctx: &TiebreakerContext,
    avoid_rematches: bool,
    round_number: u32,
) -> Vec<(ParticipantId, ParticipantId)> {
    let mut queue: VecDeque<ParticipantId> = order.into();
    let mut pairs = Vec::with_capacity(queue.len() / 2);

    while let Some(top) = queue.pop_front() {
        let index = if avoid_rematches {
            match queue.iter().position(|&candidate| !ctx.have_played(top, candidate)) {
                Some(index) => index,
                None => {
                    let rematch = queue[0];
                    warn!(
                        "round {round_number}: no fresh opponent for participant {top}; allowing rematch with {rematch}"
                    );
                    0
                }
            }
        } else {
            0
        };
        let opponent = queue.remove(index).expect("queue has an even remainder");
        pairs.push((top, opponent));
    }
    pairs
}

fn compose_round_id(tournament_id: i64, round_number: u32) -> RoundId {
    tournament_id * 1_000 + i64::from(round_number)
}

fn compose_match_id(round_id: RoundId, table_number: u32) -> i64 {
    round_id * 1_000 + i64::from(table_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, ParticipantStatus};

    fn tournament() -> Tournament {
        let mut t = Tournament::new(1, "test");
        t.status = TournamentStatus::InProgress;
        t
    }

    fn participants(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant {
                id: i64::from(i),
                tournament_id: 1,
                identity: Identity::Guest { name: format!("Player {i}"), email: None },
                status: ParticipantStatus::Confirmed,
                seed: i,
                has_received_bye: false,
            })
            .collect()
    }

    fn profile() -> GameProfile {
        GameProfile::standard_swiss()
    }

    fn finish_round(generated: &mut GeneratedRound) {
        generated.round.status = RoundStatus::Finished;
        for m in &mut generated.matches {
            if !m.is_decided() {
                m.result = MatchResult::PlayerOneWin;
                m.status = MatchStatus::Confirmed;
            }
        }
    }

    #[test]
    fn seven_players_yield_three_matches_and_one_bye() {
        let generated =
            generate_round(&tournament(), &participants(7), &[], &[], &profile()).unwrap();
        assert_eq!(generated.matches.len(), 4);
        let byes: Vec<_> = generated.matches.iter().filter(|m| m.is_bye()).collect();
        assert_eq!(byes.len(), 1);
        assert_eq!(byes[0].result, MatchResult::Bye);
        assert_eq!(byes[0].status, MatchStatus::Confirmed);
        // Lowest-ranked (worst seed) receives the bye by default.
        assert_eq!(byes[0].player1_id, 7);
    }

    #[test]
    fn no_participant_appears_twice_in_a_round() {
        let generated =
            generate_round(&tournament(), &participants(8), &[], &[], &profile()).unwrap();
        let mut seen = Vec::new();
        for m in &generated.matches {
            seen.push(m.player1_id);
            if let Some(p2) = m.player2_id {
                seen.push(p2);
            }
        }
        let mut deduped = seen.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(seen.len(), 8);
        assert_eq!(deduped.len(), 8);
    }

    #[test]
    fn round_one_pairs_by_seed() {
        let generated =
            generate_round(&tournament(), &participants(4), &[], &[], &profile()).unwrap();
        assert_eq!(generated.round.round_number, 1);
        assert_eq!(generated.matches[0].player1_id, 1);
        assert_eq!(generated.matches[0].player2_id, Some(2));
        assert_eq!(generated.matches[1].player1_id, 3);
        assert_eq!(generated.matches[1].player2_id, Some(4));
        let tables: Vec<u32> = generated.matches.iter().map(|m| m.table_number).collect();
        assert_eq!(tables, vec![1, 2]);
    }

    #[test]
    fn second_round_avoids_rematches() {
        let mut first =
            generate_round(&tournament(), &participants(4), &[], &[], &profile()).unwrap();
        finish_round(&mut first);

        let second = generate_round(
            &tournament(),
            &participants(4),
            &[first.round.clone()],
            &first.matches,
            &profile(),
        )
        .unwrap();
        assert_eq!(second.round.round_number, 2);
        for m in &second.matches {
            let replay = first.matches.iter().any(|prev| {
                prev.involves(m.player1_id) && m.player2_id.is_some_and(|p2| prev.involves(p2))
            });
            assert!(!replay, "round 2 repeated a round 1 pairing");
        }
    }

    #[test]
    fn rematch_constraint_relaxes_when_unsatisfiable() {
        let mut first =
            generate_round(&tournament(), &participants(2), &[], &[], &profile()).unwrap();
        finish_round(&mut first);

        // Two players can only ever replay each other.
        let second = generate_round(
            &tournament(),
            &participants(2),
            &[first.round.clone()],
            &first.matches,
            &profile(),
        )
        .unwrap();
        assert_eq!(second.matches.len(), 1);
        assert_eq!(second.matches[0].player1_id, 1);
        assert_eq!(second.matches[0].player2_id, Some(2));
    }

    #[test]
    fn bye_cap_excludes_previous_recipients() {
        let mut first =
            generate_round(&tournament(), &participants(3), &[], &[], &profile()).unwrap();
        finish_round(&mut first);
        let first_bye = first.matches.iter().find(|m| m.is_bye()).unwrap().player1_id;

        let second = generate_round(
            &tournament(),
            &participants(3),
            &[first.round.clone()],
            &first.matches,
            &profile(),
        )
        .unwrap();
        let second_bye = second.matches.iter().find(|m| m.is_bye()).unwrap().player1_id;
        assert_ne!(first_bye, second_bye, "max_byes_per_player = 1 was ignored");
    }

    #[test]
    fn highest_ranked_bye_policy() {
        let mut custom = profile();
        custom.pairing.bye_assignment = ByePolicy::HighestRanked;
        let generated =
            generate_round(&tournament(), &participants(5), &[], &[], &custom).unwrap();
        let bye = generated.matches.iter().find(|m| m.is_bye()).unwrap();
        assert_eq!(bye.player1_id, 1);
    }

    #[test]
    fn fails_when_previous_round_has_unreported_matches() {
        let first = generate_round(&tournament(), &participants(4), &[], &[], &profile()).unwrap();
        // Matches left NotPlayed, round left Pending.
        let err = generate_round(
            &tournament(),
            &participants(4),
            &[first.round.clone()],
            &first.matches,
            &profile(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::PreviousRoundNotCompleted { round_number: 1, unreported: 2 }
        );
    }

    #[test]
    fn fails_with_fewer_than_two_playable_participants() {
        let mut roster = participants(2);
        roster[1].status = ParticipantStatus::Withdrawn;
        let err = generate_round(&tournament(), &roster, &[], &[], &profile()).unwrap_err();
        assert!(matches!(err, EngineError::CannotGeneratePairings { .. }));
    }

    #[test]
    fn fails_when_tournament_not_in_progress() {
        let t = Tournament::new(1, "draft");
        let err = generate_round(&t, &participants(4), &[], &[], &profile()).unwrap_err();
        assert!(matches!(err, EngineError::CannotGeneratePairings { .. }));
    }

    #[test]
    fn fails_when_round_limit_reached() {
        let mut t = tournament();
        t.max_rounds = Some(1);
        let mut first = generate_round(&t, &participants(4), &[], &[], &profile()).unwrap();
        finish_round(&mut first);
        t.current_round = 1;

        let err = generate_round(
            &t,
            &participants(4),
            &[first.round.clone()],
            &first.matches,
            &profile(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::RoundLimitReached { tournament_id: 1, max_rounds: 1 });
    }

    #[test]
    fn pairing_is_deterministic() {
        let a = generate_round(&tournament(), &participants(7), &[], &[], &profile()).unwrap();
        let b = generate_round(&tournament(), &participants(7), &[], &[], &profile()).unwrap();
        let key = |g: &GeneratedRound| {
            g.matches
                .iter()
                .map(|m| (m.player1_id, m.player2_id))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&a), key(&b));
    }
}

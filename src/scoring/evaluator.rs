//! Evaluates a prioritized scoring-rule set against a finished match to
//! produce per-player points. Pure and deterministic: identical inputs give
//! identical outputs.

use crate::config::{ScoringCondition, ScoringRule};
use crate::domain::{Outcome, StatMap, TournamentMatch};

/// Points awarded to each side of a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPoints {
    pub player1: f64,
    pub player2: f64,
}

/// Applies the rule set to a decided match. For each player the first
/// matching rule by descending priority (list order on equal priority)
/// wins; with no match, points default to 0.
pub fn evaluate_match(m: &TournamentMatch, rules: &[ScoringRule]) -> MatchPoints {
    let mut ordered: Vec<&ScoringRule> = rules.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.priority));

    let player1 = m
        .outcome_for(m.player1_id)
        .map(|outcome| points_for(&ordered, outcome, &m.player1_stats, m.player2_id.map(|_| &m.player2_stats)))
        .unwrap_or(0.0);
    let player2 = m
        .player2_id
        .and_then(|id| m.outcome_for(id))
        .map(|outcome| points_for(&ordered, outcome, &m.player2_stats, Some(&m.player1_stats)))
        .unwrap_or(0.0);

    MatchPoints { player1, player2 }
}

fn points_for(
    ordered: &[&ScoringRule],
    outcome: Outcome,
    own_stats: &StatMap,
    opponent_stats: Option<&StatMap>,
) -> f64 {
    ordered
        .iter()
        .find(|rule| condition_matches(&rule.condition, outcome, own_stats, opponent_stats))
        .map_or(0.0, |rule| rule.points)
}

/// A missing stat makes a stat condition not match; it never fails. Stat
/// maps were validated against the profile at the report boundary.
fn condition_matches(
    condition: &ScoringCondition,
    outcome: Outcome,
    own_stats: &StatMap,
    opponent_stats: Option<&StatMap>,
) -> bool {
    let own = |key: &str| own_stats.get(key).map(|v| v.as_f64());
    let opp = |key: &str| opponent_stats.and_then(|s| s.get(key)).map(|v| v.as_f64());

    match condition {
        ScoringCondition::Result { outcome: expected } => outcome == *expected,
        ScoringCondition::MarginDifference { stat, op, value } => {
            match (own(stat), opp(stat)) {
                (Some(mine), Some(theirs)) => op.holds(mine - theirs, *value),
                _ => false,
            }
        }
        ScoringCondition::StatThreshold { stat, op, value } => {
            own(stat).is_some_and(|mine| op.holds(mine, *value))
        }
        ScoringCondition::StatComparison { stat, op } => match (own(stat), opp(stat)) {
            (Some(mine), Some(theirs)) => op.holds(mine, theirs),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Comparison, GameProfile};
    use crate::domain::{MatchResult, StatValue};

    fn decided_match(result: MatchResult) -> TournamentMatch {
        let mut m = TournamentMatch::new(1, 1, 1, 10);
        m.player2_id = Some(20);
        m.result = result;
        m
    }

    #[test]
    fn win_draw_loss_rules_award_three_and_zero() {
        let profile = GameProfile::standard_swiss();
        let m = decided_match(MatchResult::PlayerOneWin);
        let points = evaluate_match(&m, &profile.scoring_rules);
        assert_eq!(points, MatchPoints { player1: 3.0, player2: 0.0 });
    }

    #[test]
    fn draw_awards_one_point_each() {
        let profile = GameProfile::standard_swiss();
        let m = decided_match(MatchResult::Draw);
        let points = evaluate_match(&m, &profile.scoring_rules);
        assert_eq!(points, MatchPoints { player1: 1.0, player2: 1.0 });
    }

    #[test]
    fn bye_awards_full_points_to_lone_player() {
        let profile = GameProfile::standard_swiss();
        let mut m = TournamentMatch::new(1, 1, 1, 10);
        m.result = MatchResult::Bye;
        let points = evaluate_match(&m, &profile.scoring_rules);
        assert_eq!(points, MatchPoints { player1: 3.0, player2: 0.0 });
    }

    #[test]
    fn not_played_match_awards_nothing() {
        let profile = GameProfile::standard_swiss();
        let m = decided_match(MatchResult::NotPlayed);
        let points = evaluate_match(&m, &profile.scoring_rules);
        assert_eq!(points, MatchPoints { player1: 0.0, player2: 0.0 });
    }

    #[test]
    fn higher_priority_margin_rule_wins_over_plain_result() {
        // Graduated scale: a win by 61+ is worth 4, any other win 3.
        let rules = vec![
            ScoringRule {
                name: "win".to_string(),
                condition: ScoringCondition::Result { outcome: Outcome::Win },
                points: 3.0,
                priority: 10,
            },
            ScoringRule {
                name: "big win".to_string(),
                condition: ScoringCondition::MarginDifference {
                    stat: "score".to_string(),
                    op: Comparison::GreaterOrEqual,
                    value: 61.0,
                },
                points: 4.0,
                priority: 20,
            },
        ];
        let mut m = decided_match(MatchResult::PlayerOneWin);
        m.player1_stats.insert("score".to_string(), StatValue::Integer(120));
        m.player2_stats.insert("score".to_string(), StatValue::Integer(40));

        let points = evaluate_match(&m, &rules);
        assert_eq!(points.player1, 4.0);
        assert_eq!(points.player2, 0.0);
    }

    #[test]
    fn margin_rule_skipped_when_stat_missing() {
        let rules = vec![
            ScoringRule {
                name: "big win".to_string(),
                condition: ScoringCondition::MarginDifference {
                    stat: "score".to_string(),
                    op: Comparison::GreaterOrEqual,
                    value: 61.0,
                },
                points: 4.0,
                priority: 20,
            },
            ScoringRule {
                name: "win".to_string(),
                condition: ScoringCondition::Result { outcome: Outcome::Win },
                points: 3.0,
                priority: 10,
            },
        ];
        let m = decided_match(MatchResult::PlayerOneWin);
        assert_eq!(evaluate_match(&m, &rules).player1, 3.0);
    }

    #[test]
    fn equal_priority_keeps_list_order() {
        let rules = vec![
            ScoringRule {
                name: "first".to_string(),
                condition: ScoringCondition::Result { outcome: Outcome::Win },
                points: 2.0,
                priority: 10,
            },
            ScoringRule {
                name: "second".to_string(),
                condition: ScoringCondition::Result { outcome: Outcome::Win },
                points: 5.0,
                priority: 10,
            },
        ];
        let m = decided_match(MatchResult::PlayerOneWin);
        assert_eq!(evaluate_match(&m, &rules).player1, 2.0);
    }
}

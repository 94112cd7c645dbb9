//! Game-profile configuration value objects.
//!
//! A `GameProfile` is the single structured configuration shape consumed by
//! the engine: scoring rules, tiebreaker definitions, stat definitions and
//! pairing settings. Profiles are plain data passed in explicitly; there are
//! no globals.

use serde::{Deserialize, Serialize};

use crate::domain::Outcome;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    pub id: i64,
    pub name: String,
    pub stat_definitions: Vec<StatDefinition>,
    pub scoring_rules: Vec<ScoringRule>,
    pub tiebreakers: TiebreakerConfig,
    pub pairing: PairingConfig,
}

impl GameProfile {
    /// The canonical Swiss profile: 3/1/0 scoring with a full-score bye,
    /// the four classic tiebreakers, rematch avoidance and at most one bye
    /// per player.
    pub fn standard_swiss() -> Self {
        Self {
            id: 1,
            name: "Standard Swiss".to_string(),
            stat_definitions: Vec::new(),
            scoring_rules: vec![
                ScoringRule {
                    name: "win".to_string(),
                    condition: ScoringCondition::Result { outcome: Outcome::Win },
                    points: 3.0,
                    priority: 100,
                },
                ScoringRule {
                    name: "bye".to_string(),
                    condition: ScoringCondition::Result { outcome: Outcome::Bye },
                    points: 3.0,
                    priority: 100,
                },
                ScoringRule {
                    name: "draw".to_string(),
                    condition: ScoringCondition::Result { outcome: Outcome::Draw },
                    points: 1.0,
                    priority: 100,
                },
                ScoringRule {
                    name: "loss".to_string(),
                    condition: ScoringCondition::Result { outcome: Outcome::Loss },
                    points: 0.0,
                    priority: 100,
                },
            ],
            tiebreakers: TiebreakerConfig::default(),
            pairing: PairingConfig::default(),
        }
    }
}

impl Default for GameProfile {
    fn default() -> Self {
        Self::standard_swiss()
    }
}

/// One prioritized scoring rule. The first matching rule (highest priority
/// first, list order on equal priority) determines a player's points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRule {
    pub name: String,
    pub condition: ScoringCondition,
    pub points: f64,
    pub priority: i32,
}

/// Closed set of conditions a scoring rule can test, evaluated from one
/// player's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoringCondition {
    /// The match's canonical outcome equals this outcome for the player.
    Result { outcome: Outcome },
    /// `(player stat - opponent stat) op value`, for graduated scales.
    MarginDifference { stat: String, op: Comparison, value: f64 },
    /// Player's stat compared against a fixed value.
    StatThreshold { stat: String, op: Comparison, value: f64 },
    /// Player's stat compared against the opponent's same stat.
    StatComparison { stat: String, op: Comparison },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    const EPSILON: f64 = 1e-9;

    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::GreaterThan => left > right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::LessThan => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Equal => (left - right).abs() < Self::EPSILON,
            Comparison::NotEqual => (left - right).abs() >= Self::EPSILON,
        }
    }
}

/// Ordered tiebreaker definitions plus the explicit nominal opponent score
/// a bye contributes to Buchholz-style sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiebreakerConfig {
    pub definitions: Vec<TiebreakerDefinition>,
    pub bye_opponent_score: f64,
}

impl Default for TiebreakerConfig {
    fn default() -> Self {
        Self {
            definitions: vec![
                TiebreakerDefinition {
                    key: "buchholz".to_string(),
                    kind: TiebreakerKind::Buchholz,
                    direction: Direction::Descending,
                },
                TiebreakerDefinition {
                    key: "median_buchholz".to_string(),
                    kind: TiebreakerKind::MedianBuchholz,
                    direction: Direction::Descending,
                },
                TiebreakerDefinition {
                    key: "progressive".to_string(),
                    kind: TiebreakerKind::Progressive,
                    direction: Direction::Descending,
                },
                TiebreakerDefinition {
                    key: "owp".to_string(),
                    kind: TiebreakerKind::OpponentWinPercentage { floor: 0.33 },
                    direction: Direction::Descending,
                },
            ],
            bye_opponent_score: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiebreakerDefinition {
    pub key: String,
    pub kind: TiebreakerKind,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Closed set of tiebreaker kinds. Adding a kind is a compile-time-checked
/// exercise: every dispatch site matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TiebreakerKind {
    Buchholz,
    MedianBuchholz,
    Progressive,
    OpponentWinPercentage { floor: f64 },
    OpponentOpponentWinPercentage { floor: f64 },
    GameWinPercentage { floor: f64 },
    OpponentGameWinPercentage { floor: f64 },
    HeadToHead,
    SonnebornBerger,
    StatAggregate { stat: String, aggregation: StatAggregation },
    StrengthOfSchedule,
    MarginOfVictory,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatAggregation {
    Sum,
    Diff,
    Average,
    Max,
}

/// Declares one per-match stat a profile tracks, with bounds enforced at
/// the report boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatDefinition {
    pub key: String,
    pub kind: StatKind,
    pub per_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatKind {
    Integer { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f64>, max: Option<f64> },
    Boolean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    pub method: PairingMethod,
    pub sort_by: SortBasis,
    pub avoid_rematches: bool,
    pub max_byes_per_player: u32,
    pub bye_assignment: ByePolicy,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            method: PairingMethod::Swiss,
            sort_by: SortBasis::Points,
            avoid_rematches: true,
            max_byes_per_player: 1,
            bye_assignment: ByePolicy::LowestRanked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairingMethod {
    Swiss,
}

/// What the pairing pool is ranked by before matching: accumulated points,
/// or one of the profile's accumulated stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortBasis {
    Points,
    Stat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByePolicy {
    LowestRanked,
    HighestRanked,
    Random,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile_scores_three_one_zero() {
        let profile = GameProfile::standard_swiss();
        let points: Vec<f64> = profile.scoring_rules.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![3.0, 3.0, 1.0, 0.0]);
        assert_eq!(profile.tiebreakers.bye_opponent_score, 3.0);
    }

    #[test]
    fn comparison_operators() {
        assert!(Comparison::GreaterOrEqual.holds(61.0, 61.0));
        assert!(!Comparison::GreaterThan.holds(61.0, 61.0));
        assert!(Comparison::Equal.holds(0.1 + 0.2, 0.3));
        assert!(Comparison::NotEqual.holds(1.0, 2.0));
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = GameProfile::standard_swiss();
        let json = serde_json::to_string(&profile).unwrap();
        let back: GameProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scoring_rules.len(), profile.scoring_rules.len());
        assert_eq!(back.pairing.max_byes_per_player, 1);
    }
}

pub mod profile;

pub use profile::{
    ByePolicy, Comparison, Direction, GameProfile, PairingConfig, PairingMethod, ScoringCondition,
    ScoringRule, SortBasis, StatAggregation, StatDefinition, StatKind, TiebreakerConfig,
    TiebreakerDefinition, TiebreakerKind,
};

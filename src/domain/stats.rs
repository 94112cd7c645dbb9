use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{StatDefinition, StatKind};
use crate::errors::{EngineError, Result};

/// A tagged per-match stat value. Stats are open-ended per game profile, so
/// the value itself carries its type; bounds live in `StatDefinition`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl StatValue {
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::Integer(v) => v as f64,
            StatValue::Float(v) => v,
            StatValue::Boolean(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Ordered map so serialization and iteration stay deterministic.
pub type StatMap = BTreeMap<String, StatValue>;

/// Validates a reported stat map against a profile's stat definitions.
/// Runs once at the report boundary; business logic downstream assumes
/// stats are well formed.
pub fn validate_stat_map(stats: &StatMap, definitions: &[StatDefinition]) -> Result<()> {
    for (key, value) in stats {
        let definition = definitions
            .iter()
            .find(|d| d.key == *key)
            .ok_or_else(|| EngineError::InvalidStat {
                key: key.clone(),
                reason: "not defined by the game profile".to_string(),
            })?;
        check_value(key, *value, &definition.kind)?;
    }
    Ok(())
}

fn check_value(key: &str, value: StatValue, kind: &StatKind) -> Result<()> {
    let fail = |reason: String| EngineError::InvalidStat {
        key: key.to_string(),
        reason,
    };
    match (kind, value) {
        (StatKind::Integer { min, max }, StatValue::Integer(v)) => {
            if min.is_some_and(|m| v < m) || max.is_some_and(|m| v > m) {
                return Err(fail(format!("{v} outside bounds {min:?}..{max:?}")));
            }
            Ok(())
        }
        (StatKind::Float { min, max }, StatValue::Float(v)) => {
            if !v.is_finite() {
                return Err(fail("must be a finite number".to_string()));
            }
            if min.is_some_and(|m| v < m) || max.is_some_and(|m| v > m) {
                return Err(fail(format!("{v} outside bounds {min:?}..{max:?}")));
            }
            Ok(())
        }
        // Integer values are acceptable where floats are expected.
        (StatKind::Float { min, max }, StatValue::Integer(v)) => check_value(
            key,
            StatValue::Float(v as f64),
            &StatKind::Float { min: *min, max: *max },
        ),
        (StatKind::Boolean, StatValue::Boolean(_)) => Ok(()),
        (expected, got) => Err(fail(format!("expected {expected:?}, got {got:?}"))),
    }
}

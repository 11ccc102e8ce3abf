//! Data-driven simulation balance
//!
//! Defaults reproduce the shipped park; a JSON override makes day-density
//! and bench-behavior experiments possible without recompiling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Knobs of the day generator. All rates are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Expected ticks between spawns at full daylight
    pub avg_ticks_per_animal: f64,
    /// How strongly the night curve suppresses spawning (0.0 to 1.0)
    pub night_suppression: f64,
    /// Expected extra benched ticks once the minimum stay has elapsed
    pub avg_benching_time: f64,
    /// Ticks every benched animal stays seated before the leave rolls begin
    pub min_benching_time: i32,
    /// Chance a lone animal takes the whole bench for itself
    pub bench_monopoly_chance: f64,
    /// World units walked per tick at speed multiplier 1.0
    pub walk_units_per_tick: f32,
    /// Lower bound of the walking speed multiplier
    pub speed_min: f32,
    /// Upper bound of the walking speed multiplier
    pub speed_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            avg_ticks_per_animal: consts::AVG_TICKS_PER_ANIMAL,
            night_suppression: consts::NIGHT_SUPPRESSION,
            avg_benching_time: consts::AVG_BENCHING_TIME,
            min_benching_time: consts::MIN_BENCHING_TIME,
            bench_monopoly_chance: consts::BENCH_MONOPOLY_CHANCE,
            walk_units_per_tick: consts::WALK_UNITS_PER_TICK,
            speed_min: consts::SPEED_MIN,
            speed_max: consts::SPEED_MAX,
        }
    }
}

/// A tuning override that would wedge or degenerate the simulation
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    /// Rates and durations must be strictly positive
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    /// Probabilities live in `[0, 1]`
    #[error("{0} must be between 0 and 1")]
    OutOfRange(&'static str),
    /// The sampled speed interval must be nonempty
    #[error("speed range is empty: {min}..={max}")]
    EmptySpeedRange {
        /// Configured lower bound
        min: f32,
        /// Configured upper bound
        max: f32,
    },
}

impl Tuning {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reject values that would stall the generator or divide by zero
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.avg_ticks_per_animal <= 0.0 {
            return Err(TuningError::NonPositive("avg_ticks_per_animal"));
        }
        if self.avg_benching_time < 1.0 {
            return Err(TuningError::NonPositive("avg_benching_time"));
        }
        if self.walk_units_per_tick <= 0.0 {
            return Err(TuningError::NonPositive("walk_units_per_tick"));
        }
        if self.min_benching_time < 0 {
            return Err(TuningError::NonPositive("min_benching_time"));
        }
        if !(0.0..=1.0).contains(&self.night_suppression) {
            return Err(TuningError::OutOfRange("night_suppression"));
        }
        if !(0.0..=1.0).contains(&self.bench_monopoly_chance) {
            return Err(TuningError::OutOfRange("bench_monopoly_chance"));
        }
        if !(self.speed_min > 0.0 && self.speed_min <= self.speed_max) {
            return Err(TuningError::EmptySpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "avg_ticks_per_animal": 8.0 }"#).unwrap();
        assert_eq!(tuning.avg_ticks_per_animal, 8.0);
        assert_eq!(tuning.min_benching_time, Tuning::default().min_benching_time);
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut tuning = Tuning::default();
        tuning.avg_ticks_per_animal = 0.0;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NonPositive("avg_ticks_per_animal"))
        );

        let mut tuning = Tuning::default();
        tuning.night_suppression = 1.5;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::OutOfRange("night_suppression"))
        );

        let mut tuning = Tuning::default();
        tuning.speed_min = 1.5;
        tuning.speed_max = 0.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::EmptySpeedRange { .. })
        ));
    }
}

//! Race time prediction and workout planning
//!
//! Riegel's formula `T2 = T1 * (D2 / D1)^1.06` scales a known result to another
//! distance. Pace zones hang off a 10K-type base pace: interval pace from the
//! predicted 3K, marathon pace from the predicted marathon, threshold 18 s/km
//! slower than base and easy 1:15/km slower than marathon.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalculationError;

pub const RIEGEL_EXPONENT: f64 = 1.06;

pub const MARATHON_KM: Decimal = dec!(42.195);

/// Threshold offset from the base pace, 18 s/km
const THRESHOLD_OFFSET: Decimal = dec!(0.3);
/// Easy pace offset from marathon pace, 1:15/km
const EASY_OFFSET: Decimal = dec!(1.25);
/// Warm-up pace offset from the main set pace, 1:45/km
const WARMUP_OFFSET: Decimal = dec!(1.75);
/// Half-width of the warm-up pace band, in seconds per km
const WARMUP_BAND_SECONDS: Decimal = dec!(10);
/// Cool-down takes this share of the warm-up time
const COOLDOWN_SHARE: Decimal = dec!(0.7);

/// Predict the time for `target_km` from `known_time` over `known_km`.
/// The result is in the unit of `known_time`.
pub fn riegel_prediction(
    known_time: Decimal,
    known_km: Decimal,
    target_km: Decimal,
) -> Result<Decimal, CalculationError> {
    if known_time <= dec!(0) {
        return Err(CalculationError::invalid("riegel prediction", "known_time", known_time));
    }
    if known_km <= dec!(0) {
        return Err(CalculationError::invalid("riegel prediction", "known_km", known_km));
    }
    if target_km <= dec!(0) {
        return Err(CalculationError::invalid("riegel prediction", "target_km", target_km));
    }

    let ratio = (target_km / known_km).to_f64().unwrap_or(0.0);
    let scale = Decimal::from_f64(ratio.powf(RIEGEL_EXPONENT))
        .map(|s| s.round_dp(12))
        .ok_or_else(|| CalculationError::invalid("riegel prediction", "target_km", target_km))?;

    known_time
        .checked_mul(scale)
        .ok_or_else(|| CalculationError::invalid("riegel prediction", "known_time", known_time))
}

/// Paces in minutes per kilometre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceZones {
    pub interval: Decimal,
    pub threshold: Decimal,
    pub marathon: Decimal,
    pub easy: Decimal,
}

impl PaceZones {
    pub fn pace_for(&self, target: TargetPace) -> Decimal {
        match target {
            TargetPace::Interval => self.interval,
            TargetPace::Threshold => self.threshold,
            TargetPace::Marathon => self.marathon,
            TargetPace::Easy => self.easy,
        }
    }
}

/// Pace zones from a 10K-type base pace in min/km
pub fn pace_zones(base_pace: Decimal) -> Result<PaceZones, CalculationError> {
    if base_pace <= dec!(0) {
        return Err(CalculationError::invalid("pace zones", "base_pace", base_pace));
    }

    let ten_k = base_pace * dec!(10);
    let interval = riegel_prediction(ten_k, dec!(10), dec!(3))? / dec!(3);
    let marathon = riegel_prediction(ten_k, dec!(10), MARATHON_KM)? / MARATHON_KM;

    Ok(PaceZones {
        interval,
        threshold: base_pace + THRESHOLD_OFFSET,
        marathon,
        easy: marathon + EASY_OFFSET,
    })
}

/// Intensity of the main set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetPace {
    Interval,
    Threshold,
    Marathon,
    Easy,
}

/// How long to warm up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warmup {
    Minutes(Decimal),
    Kilometres(Decimal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    pub base_distance_km: Decimal,
    pub base_hours: Decimal,
    pub target: TargetPace,
    /// Free text for the main set, e.g. "6x800m"
    pub main_set: String,
    pub warmup: Warmup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupBlock {
    pub minutes: Decimal,
    pub distance_km: Decimal,
    /// Faster end of the pace band
    pub pace_fast: Decimal,
    /// Slower end of the pace band
    pub pace_slow: Decimal,
    /// Strides before interval sessions
    pub strides: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainBlock {
    pub main_set: String,
    pub target: TargetPace,
    pub pace: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownBlock {
    pub minutes: Decimal,
    pub distance_km: Decimal,
    pub pace: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub warmup: WarmupBlock,
    pub main: MainBlock,
    pub cooldown: CooldownBlock,
    pub zones: PaceZones,
}

/// Build a warm-up, main set and cool-down from a recent result
pub fn generate_workout(request: &WorkoutRequest) -> Result<Workout, CalculationError> {
    if request.base_distance_km <= dec!(0) {
        return Err(CalculationError::invalid(
            "workout",
            "base_distance_km",
            request.base_distance_km,
        ));
    }
    if request.base_hours <= dec!(0) {
        return Err(CalculationError::invalid("workout", "base_hours", request.base_hours));
    }

    let base_pace = request.base_hours * dec!(60) / request.base_distance_km;
    let zones = pace_zones(base_pace)?;
    let main_pace = zones.pace_for(request.target);

    let warmup_pace = main_pace + WARMUP_OFFSET;
    let band = WARMUP_BAND_SECONDS / dec!(60);
    let (warmup_minutes, warmup_km) = match request.warmup {
        Warmup::Minutes(minutes) if minutes > dec!(0) => (minutes, minutes / warmup_pace),
        Warmup::Kilometres(km) if km > dec!(0) => (km * warmup_pace, km),
        Warmup::Minutes(value) | Warmup::Kilometres(value) => {
            return Err(CalculationError::invalid("workout", "warmup", value));
        }
    };

    let cooldown_pace = warmup_pace + band;
    let cooldown_minutes = warmup_minutes * COOLDOWN_SHARE;

    debug!(%base_pace, %main_pace, target = ?request.target, "Workout generated");

    Ok(Workout {
        warmup: WarmupBlock {
            minutes: warmup_minutes,
            distance_km: warmup_km,
            pace_fast: warmup_pace - band,
            pace_slow: warmup_pace + band,
            strides: request.target == TargetPace::Interval,
        },
        main: MainBlock {
            main_set: request.main_set.clone(),
            target: request.target,
            pace: main_pace,
        },
        cooldown: CooldownBlock {
            minutes: cooldown_minutes,
            distance_km: cooldown_minutes / cooldown_pace,
            pace: cooldown_pace,
        },
        zones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: Decimal, expected: Decimal) -> bool {
        (actual - expected).abs() < dec!(0.0001)
    }

    #[test]
    fn test_riegel_prediction() {
        // 10K in 50 minutes to a half marathon
        let half = riegel_prediction(dec!(50), dec!(10), dec!(21.0975)).unwrap();
        assert!(close(half, dec!(110.32015)));

        // Same distance is the same time
        assert!(close(riegel_prediction(dec!(50), dec!(10), dec!(10)).unwrap(), dec!(50)));

        assert!(riegel_prediction(dec!(0), dec!(10), dec!(5)).is_err());
        assert!(riegel_prediction(dec!(50), dec!(0), dec!(5)).is_err());
        assert!(riegel_prediction(dec!(50), dec!(10), dec!(0)).is_err());
    }

    #[test]
    fn test_pace_zones_from_ten_k() {
        let zones = pace_zones(dec!(5)).unwrap();

        assert_eq!(zones.threshold, dec!(5.3));
        assert!(close(zones.interval, dec!(4.651546)));
        assert!(close(zones.marathon, dec!(5.451119)));
        assert!(close(zones.easy, dec!(6.701119)));
        assert!(zones.interval < zones.threshold);
        assert!(zones.threshold < zones.marathon);
        assert!(zones.marathon < zones.easy);
    }

    #[test]
    fn test_workout_blocks() {
        let request = WorkoutRequest {
            base_distance_km: dec!(10),
            base_hours: dec!(50) / dec!(60),
            target: TargetPace::Marathon,
            main_set: "3x3km".to_string(),
            warmup: Warmup::Minutes(dec!(15)),
        };
        let workout = generate_workout(&request).unwrap();

        assert!(close(workout.main.pace, dec!(5.451119)));
        assert!(close(workout.warmup.distance_km, dec!(2.083010)));
        assert!(!workout.warmup.strides);
        assert!(workout.warmup.pace_fast < workout.warmup.pace_slow);

        assert_eq!(workout.cooldown.minutes, dec!(10.5));
        assert!(close(workout.cooldown.distance_km, dec!(1.425123)));
        assert_eq!(workout.main.main_set, "3x3km");
    }

    #[test]
    fn test_interval_workout_adds_strides() {
        let request = WorkoutRequest {
            base_distance_km: dec!(5),
            base_hours: dec!(0.4),
            target: TargetPace::Interval,
            main_set: "6x800m".to_string(),
            warmup: Warmup::Kilometres(dec!(2)),
        };
        let workout = generate_workout(&request).unwrap();

        assert!(workout.warmup.strides);
        assert_eq!(workout.warmup.distance_km, dec!(2));
        assert_eq!(
            workout.warmup.minutes,
            dec!(2) * (workout.main.pace + dec!(1.75))
        );
    }

    #[test]
    fn test_workout_rejects_bad_input() {
        let mut request = WorkoutRequest {
            base_distance_km: dec!(10),
            base_hours: dec!(1),
            target: TargetPace::Easy,
            main_set: String::new(),
            warmup: Warmup::Minutes(dec!(0)),
        };
        assert!(generate_workout(&request).is_err());

        request.warmup = Warmup::Minutes(dec!(10));
        request.base_hours = dec!(0);
        assert!(generate_workout(&request).is_err());
    }
}

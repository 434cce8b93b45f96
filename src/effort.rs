//! Effort points (EP), effort per hour (EPH) and race time prediction
//!
//! EP folds climbing into distance: every 100 m of gain counts as one extra
//! kilometre. EPH is EP covered per hour and works as a terrain-neutral speed.
//! Race prediction runs the other way, turning a course and an EPH into a
//! finishing time, with descents costing half as much as climbs.
//!
//! Advanced EPH scales a measured EPH by the route's terrain, by altitude above
//! 2000 m and, for ultra races longer than two hours, by a fatigue factor that
//! decays with the logarithm of the time on feet.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalculationError;

/// Metres of climbing worth one flat kilometre
pub const CLIMB_COEFFICIENT: Decimal = dec!(100);

/// Metres of descent worth one flat kilometre
pub const DESCENT_COEFFICIENT: Decimal = dec!(200);

/// Effort points for a distance and elevation gain
pub fn effort_points(distance_km: Decimal, gain_m: Decimal) -> Decimal {
    distance_km + gain_m / CLIMB_COEFFICIENT
}

/// Effort points per hour
pub fn effort_per_hour(effort_points: Decimal, hours: Decimal) -> Result<Decimal, CalculationError> {
    if hours <= dec!(0) {
        return Err(CalculationError::DivisionByZero {
            calculation: "effort per hour",
        });
    }
    Ok(effort_points / hours)
}

/// Altitude above which the gravity factor applies, in metres
pub const ALTITUDE_THRESHOLD_M: Decimal = dec!(2000);

/// Hours after which ultra fatigue sets in
pub const FATIGUE_ONSET_HOURS: Decimal = dec!(2);

/// Lowest fatigue factor
pub const FATIGUE_FLOOR: Decimal = dec!(0.5);

/// Kind of route the effort is run on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Road,
    #[default]
    FireTrail,
    Technical,
    Alpine,
}

impl RouteType {
    pub fn terrain_factor(&self) -> Decimal {
        match self {
            RouteType::Road => dec!(0.92),
            RouteType::FireTrail => dec!(1.0),
            RouteType::Technical => dec!(1.35),
            RouteType::Alpine => dec!(1.8),
        }
    }
}

/// Conditions an EPH is adjusted for
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EphConditions {
    pub route_type: RouteType,
    pub altitude_m: Decimal,
    pub ultra: bool,
}

/// EPH after terrain, altitude and fatigue adjustments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvancedEph {
    pub base_eph: Decimal,
    pub final_eph: Decimal,
    pub terrain_factor: Decimal,
    pub gravity_factor: Decimal,
    pub fatigue_factor: Decimal,
}

/// Altitude multiplier, `1 + altitude/10000` above 2000 m
pub fn gravity_factor(altitude_m: Decimal) -> Decimal {
    if altitude_m > ALTITUDE_THRESHOLD_M {
        dec!(1) + altitude_m / dec!(10000)
    } else {
        dec!(1)
    }
}

/// Fatigue multiplier `1 - log10(hours + 1) / 2`, floored at 0.5, for ultra
/// races beyond two hours
pub fn fatigue_factor(hours: Decimal, ultra: bool) -> Decimal {
    if !ultra || hours <= FATIGUE_ONSET_HOURS {
        return dec!(1);
    }

    let decay = (hours.to_f64().unwrap_or(f64::MAX) + 1.0).log10() / 2.0;
    Decimal::from_f64(1.0 - decay)
        .map(|f| f.round_dp(9))
        .unwrap_or(FATIGUE_FLOOR)
        .max(FATIGUE_FLOOR)
}

/// Adjust `base_eph`, measured over `hours`, for route, altitude and fatigue
pub fn advanced_eph(
    base_eph: Decimal,
    hours: Decimal,
    conditions: &EphConditions,
) -> Result<AdvancedEph, CalculationError> {
    if base_eph < dec!(0) {
        return Err(CalculationError::invalid("advanced eph", "base_eph", base_eph));
    }
    if hours <= dec!(0) {
        return Err(CalculationError::invalid("advanced eph", "hours", hours));
    }

    let terrain_factor = conditions.route_type.terrain_factor();
    let gravity_factor = gravity_factor(conditions.altitude_m);
    let fatigue_factor = fatigue_factor(hours, conditions.ultra);
    let final_eph = base_eph * terrain_factor * gravity_factor * fatigue_factor;

    debug!(
        %base_eph,
        %final_eph,
        route_type = ?conditions.route_type,
        "EPH adjusted"
    );

    Ok(AdvancedEph {
        base_eph,
        final_eph,
        terrain_factor,
        gravity_factor,
        fatigue_factor,
    })
}

/// A completed effort used as a reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortRecord {
    pub distance_km: Decimal,
    pub gain_m: Decimal,
    pub hours: Decimal,
}

impl EffortRecord {
    pub fn effort_points(&self) -> Decimal {
        effort_points(self.distance_km, self.gain_m)
    }

    pub fn eph(&self) -> Result<Decimal, CalculationError> {
        if self.distance_km <= dec!(0) {
            return Err(CalculationError::invalid("effort per hour", "distance_km", self.distance_km));
        }
        effort_per_hour(self.effort_points(), self.hours)
    }
}

/// Hours a training run should take when run at the reference effort's EPH
pub fn estimate_training_time(
    reference: &EffortRecord,
    distance_km: Decimal,
    gain_m: Decimal,
) -> Result<Decimal, CalculationError> {
    if distance_km < dec!(0) {
        return Err(CalculationError::invalid("training time", "distance_km", distance_km));
    }
    let eph = reference.eph()?;
    if eph <= dec!(0) {
        return Err(CalculationError::DivisionByZero {
            calculation: "training time",
        });
    }

    Ok(effort_points(distance_km, gain_m) / eph)
}

/// Course being raced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceProfile {
    pub distance_km: Decimal,
    pub gain_m: Decimal,
    pub loss_m: Decimal,
}

/// A planned stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AidStation {
    pub distance_km: Decimal,
    pub stop_minutes: Decimal,
}

/// Runner-specific adjustments to the baseline prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStrategy {
    /// Climbing ability, 1.0 = average; higher climbs faster
    pub climbing_factor: Decimal,
    /// Descending ability, 1.0 = average; higher descends faster
    pub descending_factor: Decimal,
    pub aid_stations: Vec<AidStation>,
}

impl Default for RaceStrategy {
    fn default() -> Self {
        Self {
            climbing_factor: dec!(1),
            descending_factor: dec!(1),
            aid_stations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Fixed climb/descent coefficients
    Standard,
    /// Coefficients scaled by the runner's climbing/descending factors
    Advanced,
    /// Standard coefficients plus aid-station stops
    AidStations,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacePrediction {
    /// Flat-equivalent distance in effort kilometres
    pub equivalent_distance_km: Decimal,
    pub total_minutes: Decimal,
    pub mode: PredictionMode,
}

impl RacePrediction {
    pub fn total_hours(&self) -> Decimal {
        self.total_minutes / dec!(60)
    }
}

/// Predict a finishing time for `race` at the given EPH
pub fn predict_race(
    race: &RaceProfile,
    eph: Decimal,
    strategy: Option<&RaceStrategy>,
) -> Result<RacePrediction, CalculationError> {
    if race.distance_km <= dec!(0) {
        return Err(CalculationError::invalid("race prediction", "distance_km", race.distance_km));
    }
    if eph <= dec!(0) {
        return Err(CalculationError::invalid("race prediction", "eph", eph));
    }

    let minutes_per_effort_km = dec!(60) / eph;
    let mut mode = PredictionMode::Standard;
    let mut climb = CLIMB_COEFFICIENT;
    let mut descent = DESCENT_COEFFICIENT;
    let mut stop_minutes = dec!(0);

    if let Some(strategy) = strategy {
        if strategy.climbing_factor <= dec!(0) {
            return Err(CalculationError::invalid(
                "race prediction",
                "climbing_factor",
                strategy.climbing_factor,
            ));
        }
        if strategy.descending_factor <= dec!(0) {
            return Err(CalculationError::invalid(
                "race prediction",
                "descending_factor",
                strategy.descending_factor,
            ));
        }

        if strategy.climbing_factor != dec!(1) || strategy.descending_factor != dec!(1) {
            mode = PredictionMode::Advanced;
            climb *= strategy.climbing_factor;
            descent *= strategy.descending_factor;
        }

        let stations: Vec<&AidStation> = strategy
            .aid_stations
            .iter()
            .filter(|s| s.distance_km > dec!(0) && s.stop_minutes > dec!(0))
            .collect();
        if !stations.is_empty() {
            stop_minutes = stations.iter().map(|s| s.stop_minutes).sum();
            if mode == PredictionMode::Standard {
                mode = PredictionMode::AidStations;
            }
        }
    }

    let equivalent_distance_km = race.distance_km + race.gain_m / climb + race.loss_m / descent;
    let total_minutes = equivalent_distance_km * minutes_per_effort_km + stop_minutes;

    debug!(
        %equivalent_distance_km,
        %total_minutes,
        ?mode,
        "Race predicted"
    );

    Ok(RacePrediction {
        equivalent_distance_km,
        total_minutes,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> RaceProfile {
        RaceProfile {
            distance_km: dec!(50),
            gain_m: dec!(3000),
            loss_m: dec!(3000),
        }
    }

    #[test]
    fn test_effort_points() {
        assert_eq!(effort_points(dec!(21), dec!(1200)), dec!(33));
        assert_eq!(effort_per_hour(dec!(33), dec!(3)).unwrap(), dec!(11));
        assert!(effort_per_hour(dec!(33), dec!(0)).is_err());
    }

    #[test]
    fn test_terrain_factors() {
        let plain = advanced_eph(dec!(10), dec!(1), &EphConditions::default()).unwrap();
        assert_eq!(plain.final_eph, dec!(10));

        let road = EphConditions {
            route_type: RouteType::Road,
            ..EphConditions::default()
        };
        assert_eq!(advanced_eph(dec!(10), dec!(1), &road).unwrap().final_eph, dec!(9.2));

        let alpine = EphConditions {
            route_type: RouteType::Alpine,
            ..EphConditions::default()
        };
        assert_eq!(advanced_eph(dec!(10), dec!(1), &alpine).unwrap().final_eph, dec!(18));
    }

    #[test]
    fn test_gravity_only_above_threshold() {
        assert_eq!(gravity_factor(dec!(2000)), dec!(1));
        assert_eq!(gravity_factor(dec!(3000)), dec!(1.3));
        assert_eq!(gravity_factor(dec!(-50)), dec!(1));
    }

    #[test]
    fn test_ultra_fatigue() {
        assert_eq!(fatigue_factor(dec!(9), false), dec!(1));
        assert_eq!(fatigue_factor(dec!(2), true), dec!(1));
        // log10(10) = 1
        assert_eq!(fatigue_factor(dec!(9), true), dec!(0.5));
        // Floored once log10(hours + 1) passes 1
        assert_eq!(fatigue_factor(dec!(30), true), FATIGUE_FLOOR);

        let three_hours = fatigue_factor(dec!(3), true);
        assert!((three_hours - dec!(0.69897)).abs() < dec!(0.00001));
    }

    #[test]
    fn test_combined_adjustment() {
        let conditions = EphConditions {
            route_type: RouteType::Technical,
            altitude_m: dec!(3000),
            ultra: true,
        };
        let eph = advanced_eph(dec!(10), dec!(3), &conditions).unwrap();

        assert_eq!(eph.terrain_factor, dec!(1.35));
        assert_eq!(eph.gravity_factor, dec!(1.3));
        assert!((eph.final_eph - dec!(12.2669)).abs() < dec!(0.001));
        assert!(advanced_eph(dec!(10), dec!(0), &conditions).is_err());
    }

    #[test]
    fn test_training_time_from_reference() {
        let reference = EffortRecord {
            distance_km: dec!(21),
            gain_m: dec!(1200),
            hours: dec!(3),
        };
        assert_eq!(reference.eph().unwrap(), dec!(11));

        let hours = estimate_training_time(&reference, dec!(10), dec!(100)).unwrap();
        assert_eq!(hours, dec!(1));
    }

    #[test]
    fn test_standard_prediction() {
        let prediction = predict_race(&course(), dec!(8), None).unwrap();

        // 50 + 30 + 15 effort km at 7.5 min each
        assert_eq!(prediction.equivalent_distance_km, dec!(95));
        assert_eq!(prediction.total_minutes, dec!(712.5));
        assert_eq!(prediction.mode, PredictionMode::Standard);
        assert_eq!(prediction.total_hours(), dec!(11.875));
    }

    #[test]
    fn test_strategy_modes() {
        let neutral = RaceStrategy::default();
        let prediction = predict_race(&course(), dec!(8), Some(&neutral)).unwrap();
        assert_eq!(prediction.mode, PredictionMode::Standard);

        let climber = RaceStrategy {
            climbing_factor: dec!(1.5),
            ..RaceStrategy::default()
        };
        let prediction = predict_race(&course(), dec!(8), Some(&climber)).unwrap();
        assert_eq!(prediction.mode, PredictionMode::Advanced);
        assert_eq!(prediction.equivalent_distance_km, dec!(85));

        let with_stops = RaceStrategy {
            aid_stations: vec![
                AidStation { distance_km: dec!(15), stop_minutes: dec!(5) },
                AidStation { distance_km: dec!(30), stop_minutes: dec!(10) },
                AidStation { distance_km: dec!(0), stop_minutes: dec!(60) },
            ],
            ..RaceStrategy::default()
        };
        let prediction = predict_race(&course(), dec!(8), Some(&with_stops)).unwrap();
        assert_eq!(prediction.mode, PredictionMode::AidStations);
        assert_eq!(prediction.total_minutes, dec!(727.5));
    }

    #[test]
    fn test_prediction_rejects_bad_input() {
        assert!(predict_race(&course(), dec!(0), None).is_err());
        let flat = RaceProfile {
            distance_km: dec!(0),
            gain_m: dec!(0),
            loss_m: dec!(0),
        };
        assert!(predict_race(&flat, dec!(8), None).is_err());

        let broken = RaceStrategy {
            descending_factor: dec!(0),
            ..RaceStrategy::default()
        };
        assert!(predict_race(&course(), dec!(8), Some(&broken)).is_err());
    }
}

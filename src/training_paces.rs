//! Training paces derived from a recent performance
//!
//! Interval pace tightens by 5 % of the base pace for every halving of the rep
//! distance below 800 m. LSD pace loosens by 2.5 % for every 10 km beyond 20 km.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

pub const DEFAULT_INTERVAL_DISTANCE_M: Decimal = dec!(400);
pub const DEFAULT_LSD_DISTANCE_KM: Decimal = dec!(20);

const INTERVAL_REFERENCE_M: f64 = 800.0;
const INTERVAL_REFERENCE_FACTOR: Decimal = dec!(0.95);
const INTERVAL_STEP: Decimal = dec!(0.05);
const INTERVAL_BOUNDS: (Decimal, Decimal) = (dec!(0.85), dec!(1.05));

const LSD_REFERENCE_KM: Decimal = dec!(20);
const LSD_REFERENCE_FACTOR: Decimal = dec!(1.25);
const LSD_STEP: Decimal = dec!(0.025);
const LSD_BOUNDS: (Decimal, Decimal) = (dec!(1.20), dec!(1.35));

const RECOVERY_FACTOR: Decimal = dec!(1.35);

/// Paces in minutes per kilometre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPaces {
    /// Pace of the reference performance
    pub base: Decimal,
    pub interval: Decimal,
    /// Long slow distance
    pub lsd: Decimal,
    pub recovery: Decimal,
    pub interval_distance_m: Decimal,
    pub lsd_distance_km: Decimal,
}

/// Average pace (min/km) of a performance
pub fn equivalent_pace(distance_km: Decimal, hours: Decimal) -> Result<Decimal, CalculationError> {
    if distance_km <= dec!(0) {
        return Err(CalculationError::invalid("equivalent pace", "distance_km", distance_km));
    }
    if hours <= dec!(0) {
        return Err(CalculationError::invalid("equivalent pace", "hours", hours));
    }

    let minutes = hours
        .checked_mul(dec!(60))
        .ok_or_else(|| CalculationError::invalid("equivalent pace", "hours", hours))?;
    Ok(minutes / distance_km)
}

/// Multiplier on the base pace for intervals of `distance_m`
pub fn interval_factor(distance_m: Decimal) -> Result<Decimal, CalculationError> {
    let ratio = distance_m.to_f64().unwrap_or(0.0) / INTERVAL_REFERENCE_M;
    if distance_m <= dec!(0) || !ratio.is_finite() || ratio <= 0.0 {
        return Err(CalculationError::invalid("training paces", "interval_distance_m", distance_m));
    }

    let doublings = Decimal::from_f64(ratio.log2())
        .map(|d| d.round_dp(9))
        .ok_or_else(|| CalculationError::invalid("training paces", "interval_distance_m", distance_m))?;
    let factor = INTERVAL_REFERENCE_FACTOR + doublings * INTERVAL_STEP;

    Ok(factor.max(INTERVAL_BOUNDS.0).min(INTERVAL_BOUNDS.1))
}

/// Multiplier on the base pace for a long run of `distance_km`
pub fn lsd_factor(distance_km: Decimal) -> Result<Decimal, CalculationError> {
    if distance_km <= dec!(0) {
        return Err(CalculationError::invalid("training paces", "lsd_distance_km", distance_km));
    }

    let factor = LSD_REFERENCE_FACTOR + (distance_km - LSD_REFERENCE_KM) / dec!(10) * LSD_STEP;
    Ok(factor.max(LSD_BOUNDS.0).min(LSD_BOUNDS.1))
}

/// Interval, LSD and recovery paces for the given workout distances
pub fn training_paces(
    base_pace: Decimal,
    interval_distance_m: Decimal,
    lsd_distance_km: Decimal,
) -> Result<TrainingPaces, CalculationError> {
    if base_pace <= dec!(0) {
        return Err(CalculationError::invalid("training paces", "base_pace", base_pace));
    }

    Ok(TrainingPaces {
        base: base_pace,
        interval: base_pace * interval_factor(interval_distance_m)?,
        lsd: base_pace * lsd_factor(lsd_distance_km)?,
        recovery: base_pace * RECOVERY_FACTOR,
        interval_distance_m,
        lsd_distance_km,
    })
}

//! Interval session planning
//!
//! Two ways in: rep times per set (which gives the pace of each set), or a
//! target pace (which gives the time of each rep).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// `count` reps each run in `seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    pub seconds: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetResult {
    pub set: IntervalSet,
    /// min/km
    pub pace: Decimal,
    /// Intensity relative to threshold pace, when one is known
    pub threshold_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalPlan {
    pub sets: Vec<SetResult>,
    pub total_distance_km: Decimal,
    pub total_seconds: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepPlan {
    pub seconds_per_rep: Decimal,
    pub total_distance_km: Decimal,
    pub total_seconds: Decimal,
}

/// Intensity of `pace` as a percentage of threshold pace; faster is above 100
pub fn threshold_percent(pace: Decimal, threshold_pace: Decimal) -> Result<Decimal, CalculationError> {
    if pace <= dec!(0) {
        return Err(CalculationError::DivisionByZero {
            calculation: "threshold percent",
        });
    }
    Ok(threshold_pace / pace * dec!(100))
}

fn check_distance(rep_distance_m: Decimal) -> Result<Decimal, CalculationError> {
    if rep_distance_m <= dec!(0) {
        return Err(CalculationError::invalid("intervals", "rep_distance_m", rep_distance_m));
    }
    Ok(rep_distance_m / dec!(1000))
}

/// Pace of each set from its rep time. Empty sets are dropped.
pub fn plan_by_time(
    rep_distance_m: Decimal,
    sets: &[IntervalSet],
    threshold_pace: Option<Decimal>,
) -> Result<IntervalPlan, CalculationError> {
    let rep_km = check_distance(rep_distance_m)?;
    let threshold_pace = threshold_pace.filter(|p| *p > dec!(0));

    let mut plan = IntervalPlan {
        sets: Vec::new(),
        total_distance_km: dec!(0),
        total_seconds: dec!(0),
    };

    for set in sets.iter().filter(|s| s.seconds > 0 && s.count > 0) {
        let seconds = Decimal::from(set.seconds);
        let count = Decimal::from(set.count);
        let pace = seconds / dec!(60) / rep_km;

        let threshold_percent = match threshold_pace {
            Some(t) => Some(threshold_percent(pace, t)?),
            None => None,
        };

        plan.total_distance_km += rep_km * count;
        plan.total_seconds += seconds * count;
        plan.sets.push(SetResult {
            set: *set,
            pace,
            threshold_percent,
        });
    }

    if plan.sets.is_empty() {
        return Err(CalculationError::InsufficientData {
            calculation: "intervals",
            reason: "no set has both a rep time and a rep count".to_string(),
        });
    }

    Ok(plan)
}

/// Rep time for running `reps` x `rep_distance_m` at a target pace
pub fn plan_by_pace(
    rep_distance_m: Decimal,
    target_pace_min_per_km: Decimal,
    reps: u32,
) -> Result<RepPlan, CalculationError> {
    let rep_km = check_distance(rep_distance_m)?;
    if target_pace_min_per_km <= dec!(0) {
        return Err(CalculationError::invalid("intervals", "target_pace", target_pace_min_per_km));
    }
    if reps == 0 {
        return Err(CalculationError::invalid("intervals", "reps", reps));
    }

    let seconds_per_rep = target_pace_min_per_km * dec!(60) * rep_km;
    let reps = Decimal::from(reps);

    Ok(RepPlan {
        seconds_per_rep,
        total_distance_km: rep_km * reps,
        total_seconds: seconds_per_rep * reps,
    })
}

//! Heat impact on pace from wet-bulb globe temperature (WBGT)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CalculationError;

/// WBGT above which heat starts to slow the pace, in °C
pub const HEAT_ONSET_C: Decimal = dec!(20);

const HEAT_FACTOR: Decimal = dec!(0.15);
const WIND_FACTOR: Decimal = dec!(0.05);
const HUMIDITY_FACTOR: Decimal = dec!(0.005);

pub const WBGT_BOUNDS: (Decimal, Decimal) = (dec!(15), dec!(45));
pub const WIND_BOUNDS: (Decimal, Decimal) = (dec!(0), dec!(20));
pub const HUMIDITY_BOUNDS: (Decimal, Decimal) = (dec!(0), dec!(100));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatRisk {
    Safe,
    Caution,
    High,
    VeryHigh,
    Extreme,
}

impl fmt::Display for HeatRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeatRisk::Safe => "safe",
            HeatRisk::Caution => "caution",
            HeatRisk::High => "high",
            HeatRisk::VeryHigh => "very high",
            HeatRisk::Extreme => "extreme",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatAssessment {
    /// Pace slowdown in percent
    pub pace_impact: Decimal,
    pub risk: HeatRisk,
}

fn check(
    value: Decimal,
    bounds: (Decimal, Decimal),
    parameter: &'static str,
) -> Result<(), CalculationError> {
    if value < bounds.0 || value > bounds.1 {
        return Err(CalculationError::invalid("heat impact", parameter, value));
    }
    Ok(())
}

/// Pace slowdown for a WBGT (°C), wind speed (m/s) and relative humidity (%).
/// Never negative: cool weather does not speed a runner up.
pub fn pace_impact(
    wbgt_c: Decimal,
    wind_mps: Decimal,
    humidity_percent: Decimal,
) -> Result<Decimal, CalculationError> {
    check(wbgt_c, WBGT_BOUNDS, "wbgt")?;
    check(wind_mps, WIND_BOUNDS, "wind")?;
    check(humidity_percent, HUMIDITY_BOUNDS, "humidity")?;

    let heat = (wbgt_c - HEAT_ONSET_C) * HEAT_FACTOR;
    let wind = wind_mps * WIND_FACTOR;
    let humidity = humidity_percent / dec!(100) * HUMIDITY_FACTOR * dec!(10);

    Ok((heat - wind + humidity).max(dec!(0)))
}

/// Risk band for a WBGT in °C
pub fn heat_risk(wbgt_c: Decimal) -> HeatRisk {
    if wbgt_c <= dec!(22) {
        HeatRisk::Safe
    } else if wbgt_c <= dec!(28) {
        HeatRisk::Caution
    } else if wbgt_c <= dec!(32) {
        HeatRisk::High
    } else if wbgt_c <= dec!(35) {
        HeatRisk::VeryHigh
    } else {
        HeatRisk::Extreme
    }
}

pub fn assess_heat(
    wbgt_c: Decimal,
    wind_mps: Decimal,
    humidity_percent: Decimal,
) -> Result<HeatAssessment, CalculationError> {
    Ok(HeatAssessment {
        pace_impact: pace_impact(wbgt_c, wind_mps, humidity_percent)?,
        risk: heat_risk(wbgt_c),
    })
}

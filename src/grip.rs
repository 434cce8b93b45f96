//! Footing risk from surface, shoe and weather
//!
//! Each condition maps to a 0-10 score through a constant table. The weighted
//! sum is a grip score out of 10; risk grows as the score drops.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CalculationError;

const SURFACE_WEIGHT: Decimal = dec!(0.4);
const SHOE_WEIGHT: Decimal = dec!(0.3);
const WEATHER_WEIGHT: Decimal = dec!(0.2);
const TECHNICALITY_WEIGHT: Decimal = dec!(0.1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    DryPavement,
    WetPavement,
    DryTrail,
    WetTrail,
    Muddy,
    Rocky,
    LooseGravel,
    Snow,
    Ice,
}

impl Surface {
    /// Grip the surface offers, 0-10
    pub fn score(&self) -> u8 {
        match self {
            Surface::DryPavement => 9,
            Surface::WetPavement => 6,
            Surface::DryTrail => 8,
            Surface::WetTrail => 4,
            Surface::Muddy => 2,
            Surface::Rocky => 7,
            Surface::LooseGravel => 3,
            Surface::Snow => 1,
            Surface::Ice => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Shoe {
    Road,
    TrailLight,
    TrailHeavy,
    Spikes,
}

impl Shoe {
    /// Outsole grip, 0-10
    pub fn grip(&self) -> u8 {
        match self {
            Shoe::Road => 3,
            Shoe::TrailLight => 6,
            Shoe::TrailHeavy => 8,
            Shoe::Spikes => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Dry,
    LightRain,
    HeavyRain,
    Fog,
    Snow,
    Ice,
}

impl Weather {
    /// How much the weather takes away, 0-10
    pub fn impact(&self) -> u8 {
        match self {
            Weather::Dry => 0,
            Weather::LightRain => 3,
            Weather::HeavyRain => 7,
            Weather::Fog => 2,
            Weather::Snow => 5,
            Weather::Ice => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{}", label)
    }
}

/// Weighted grip score out of 10. `technicality` runs from 0 (smooth) to 1.
pub fn grip_score(
    surface: Surface,
    shoe: Shoe,
    weather: Weather,
    technicality: Decimal,
) -> Result<Decimal, CalculationError> {
    if technicality < dec!(0) || technicality > dec!(1) {
        return Err(CalculationError::invalid("grip score", "technicality", technicality));
    }

    Ok(Decimal::from(surface.score()) * SURFACE_WEIGHT
        + Decimal::from(shoe.grip()) * SHOE_WEIGHT
        + (dec!(10) - Decimal::from(weather.impact())) * WEATHER_WEIGHT
        + (dec!(10) - technicality * dec!(10)) * TECHNICALITY_WEIGHT)
}

/// Risk band for a grip score
pub fn risk_level(score: Decimal) -> RiskLevel {
    let risk = dec!(10) - score;
    if risk <= dec!(3) {
        RiskLevel::Low
    } else if risk <= dec!(6) {
        RiskLevel::Moderate
    } else if risk <= dec!(8) {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_case_is_low_risk() {
        let score = grip_score(Surface::DryPavement, Shoe::Spikes, Weather::Dry, dec!(0)).unwrap();
        assert_eq!(score, dec!(9.6));
        assert_eq!(risk_level(score), RiskLevel::Low);
    }

    #[test]
    fn test_worst_case_is_critical() {
        let score = grip_score(Surface::Ice, Shoe::Road, Weather::Ice, dec!(1)).unwrap();
        assert_eq!(score, dec!(1.1));
        assert_eq!(risk_level(score), RiskLevel::Critical);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(risk_level(dec!(7)), RiskLevel::Low);
        assert_eq!(risk_level(dec!(4)), RiskLevel::Moderate);
        assert_eq!(risk_level(dec!(2)), RiskLevel::High);
        assert_eq!(risk_level(dec!(1.9)), RiskLevel::Critical);
    }

    #[test]
    fn test_technicality_range() {
        assert!(grip_score(Surface::Rocky, Shoe::TrailHeavy, Weather::Fog, dec!(1.5)).is_err());
        assert!(grip_score(Surface::Rocky, Shoe::TrailHeavy, Weather::Fog, dec!(-0.1)).is_err());
    }
}

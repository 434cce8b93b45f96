//! Route roughness and downhill risk

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::effort::RouteType;
use crate::grip::RiskLevel;

const ROUGHNESS_FACTOR: Decimal = dec!(0.15);
const DESCENT_FACTOR: Decimal = dec!(0.6);
const DOWNHILL_DISTANCE_FACTOR: Decimal = dec!(0.3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technicality {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl fmt::Display for Technicality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Technicality::VeryLow => "very low",
            Technicality::Low => "low",
            Technicality::Moderate => "moderate",
            Technicality::High => "high",
        };
        write!(f, "{}", label)
    }
}

pub fn technicality(route_type: RouteType) -> Technicality {
    match route_type {
        RouteType::Road => Technicality::VeryLow,
        RouteType::FireTrail => Technicality::Low,
        RouteType::Technical => Technicality::Moderate,
        RouteType::Alpine => Technicality::High,
    }
}

/// Roughness rating index (RRI): metres of gain per km, scaled by 0.15.
/// Zero for a route without distance.
pub fn roughness_index(distance_km: Decimal, gain_m: Decimal) -> Decimal {
    if distance_km <= dec!(0) {
        return dec!(0);
    }
    gain_m / distance_km * ROUGHNESS_FACTOR
}

/// Downhill risk score from the descending distance (km) and total descent (m)
pub fn downhill_risk(downhill_km: Decimal, descent_m: Decimal) -> Decimal {
    if downhill_km <= dec!(0) {
        return dec!(0);
    }
    descent_m / downhill_km * DESCENT_FACTOR + downhill_km * DOWNHILL_DISTANCE_FACTOR
}

/// Risk band for a downhill risk score
pub fn risk_level(score: Decimal) -> RiskLevel {
    if score <= dec!(20) {
        RiskLevel::Low
    } else if score <= dec!(40) {
        RiskLevel::Moderate
    } else if score <= dec!(70) {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteAssessment {
    pub roughness_index: Decimal,
    pub downhill_risk: Decimal,
    pub downhill_level: RiskLevel,
    pub technicality: Technicality,
}

pub fn assess_route(
    distance_km: Decimal,
    gain_m: Decimal,
    downhill_km: Decimal,
    descent_m: Decimal,
    route_type: RouteType,
) -> RouteAssessment {
    let downhill_risk = downhill_risk(downhill_km, descent_m);

    RouteAssessment {
        roughness_index: roughness_index(distance_km, gain_m),
        downhill_risk,
        downhill_level: risk_level(downhill_risk),
        technicality: technicality(route_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roughness_index() {
        assert_eq!(roughness_index(dec!(10), dec!(1000)), dec!(15));
        assert_eq!(roughness_index(dec!(0), dec!(1000)), dec!(0));
    }

    #[test]
    fn test_downhill_risk() {
        // 50 m/km * 0.6 + 4 km * 0.3
        assert_eq!(downhill_risk(dec!(4), dec!(200)), dec!(31.2));
        assert_eq!(downhill_risk(dec!(0), dec!(200)), dec!(0));
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(risk_level(dec!(20)), RiskLevel::Low);
        assert_eq!(risk_level(dec!(31.2)), RiskLevel::Moderate);
        assert_eq!(risk_level(dec!(70)), RiskLevel::High);
        assert_eq!(risk_level(dec!(70.1)), RiskLevel::Critical);
    }

    #[test]
    fn test_route_assessment() {
        let assessment = assess_route(dec!(20), dec!(1500), dec!(8), dec!(1500), RouteType::Alpine);

        assert_eq!(assessment.roughness_index, dec!(11.25));
        assert_eq!(assessment.downhill_risk, dec!(114.9));
        assert_eq!(assessment.downhill_level, RiskLevel::Critical);
        assert_eq!(assessment.technicality, Technicality::High);
        assert_eq!(technicality(RouteType::Road), Technicality::VeryLow);
    }
}

//! Unit systems, conversions and display formatting
//!
//! Internal values are always metric: kilometres, metres and minutes per
//! kilometre. Converting for display, or back from user input, always takes
//! the unit system as an explicit argument.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilometres in one statute mile
pub const KM_PER_MILE: f64 = 1.609344;

/// Metres in one foot
pub const M_PER_FOOT: f64 = 0.3048;

const KM_PER_MILE_DEC: Decimal = dec!(1.609344);
const M_PER_FOOT_DEC: Decimal = dec!(0.3048);

/// Longest duration accepted from user input, in hours
pub const MAX_DURATION_HOURS: Decimal = dec!(10000);

/// Slowest pace accepted from user input, in minutes per unit
pub const MAX_PACE_MINUTES: Decimal = dec!(120);

/// Largest distance, elevation or speed accepted from user input
pub const MAX_AMOUNT: Decimal = dec!(1000000);

/// Display unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "km" => Ok(UnitSystem::Metric),
            "imperial" | "mi" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Invalid unit system: {}", s)),
        }
    }
}

/// Kind of value being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// km / mi
    Distance,
    /// m / ft
    Elevation,
    /// min/km / min/mi
    Pace,
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

pub fn m_to_ft(m: f64) -> f64 {
    m / M_PER_FOOT
}

pub fn ft_to_m(ft: f64) -> f64 {
    ft * M_PER_FOOT
}

/// Convert a value entered in `units` into its internal metric value
pub fn to_internal_units(display_value: f64, quantity: Quantity, units: UnitSystem) -> f64 {
    match (units, quantity) {
        (UnitSystem::Metric, _) => display_value,
        (UnitSystem::Imperial, Quantity::Distance) => miles_to_km(display_value),
        (UnitSystem::Imperial, Quantity::Elevation) => ft_to_m(display_value),
        // min/mi -> min/km
        (UnitSystem::Imperial, Quantity::Pace) => display_value / KM_PER_MILE,
    }
}

/// Same as [`to_internal_units`] for exact decimal inputs such as paces.
/// Speeds convert like distances.
pub fn to_internal_decimal(display_value: Decimal, quantity: Quantity, units: UnitSystem) -> Decimal {
    match (units, quantity) {
        (UnitSystem::Metric, _) => display_value,
        (UnitSystem::Imperial, Quantity::Distance) => display_value * KM_PER_MILE_DEC,
        (UnitSystem::Imperial, Quantity::Elevation) => display_value * M_PER_FOOT_DEC,
        (UnitSystem::Imperial, Quantity::Pace) => display_value / KM_PER_MILE_DEC,
    }
}

/// Convert an internal metric value into `units` for display
pub fn to_display_units(internal_value: f64, quantity: Quantity, units: UnitSystem) -> f64 {
    match (units, quantity) {
        (UnitSystem::Metric, _) => internal_value,
        (UnitSystem::Imperial, Quantity::Distance) => km_to_miles(internal_value),
        (UnitSystem::Imperial, Quantity::Elevation) => m_to_ft(internal_value),
        (UnitSystem::Imperial, Quantity::Pace) => internal_value * KM_PER_MILE,
    }
}

/// Short unit label for a quantity
pub fn unit_label(quantity: Quantity, units: UnitSystem) -> &'static str {
    match (quantity, units) {
        (Quantity::Distance, UnitSystem::Metric) => "km",
        (Quantity::Distance, UnitSystem::Imperial) => "mi",
        (Quantity::Elevation, UnitSystem::Metric) => "m",
        (Quantity::Elevation, UnitSystem::Imperial) => "ft",
        (Quantity::Pace, UnitSystem::Metric) => "min/km",
        (Quantity::Pace, UnitSystem::Imperial) => "min/mi",
    }
}

/// Distance with one decimal, e.g. `12.3 km`
pub fn format_distance(km: f64, units: UnitSystem) -> String {
    format!(
        "{:.1} {}",
        to_display_units(km, Quantity::Distance, units),
        unit_label(Quantity::Distance, units)
    )
}

/// Elevation rounded to whole units, e.g. `523 m`
pub fn format_elevation(m: f64, units: UnitSystem) -> String {
    format!(
        "{:.0} {}",
        to_display_units(m, Quantity::Elevation, units),
        unit_label(Quantity::Elevation, units)
    )
}

/// Pace as minutes:seconds, e.g. `5:30/km`
pub fn format_pace(min_per_km: Decimal, units: UnitSystem) -> String {
    let (pace, suffix) = match units {
        UnitSystem::Metric => (min_per_km, "/km"),
        UnitSystem::Imperial => (min_per_km * KM_PER_MILE_DEC, "/mi"),
    };

    let total_seconds = pace
        .checked_mul(dec!(60))
        .and_then(|seconds| seconds.round().to_i64())
        .unwrap_or(0)
        .max(0);
    format!("{}:{:02}{}", total_seconds / 60, total_seconds % 60, suffix)
}

/// Duration in hours as `HH:MM:SS`
pub fn format_duration(hours: Decimal) -> String {
    let total_seconds = hours
        .checked_mul(dec!(3600))
        .and_then(|seconds| seconds.round().to_i64())
        .unwrap_or(0)
        .max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Hours from an hours/minutes/seconds triple
pub fn hms_to_hours(hours: u32, minutes: u32, seconds: u32) -> Decimal {
    Decimal::from(hours) + Decimal::from(minutes) / dec!(60) + Decimal::from(seconds) / dec!(3600)
}

/// Minutes per km from a `m:ss` pace split into parts
pub fn pace_from_parts(minutes: u32, seconds: u32) -> Decimal {
    Decimal::from(minutes) + Decimal::from(seconds) / dec!(60)
}

/// Parse a pace written as `m:ss` or as decimal minutes (`5.5`)
pub fn parse_pace(s: &str) -> Result<Decimal, String> {
    let s = s.trim();
    let pace = match s.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.parse().map_err(|_| format!("Invalid pace: {}", s))?;
            let seconds: u32 = seconds.parse().map_err(|_| format!("Invalid pace: {}", s))?;
            if seconds >= 60 {
                return Err(format!("Invalid pace: {} (seconds must be below 60)", s));
            }
            pace_from_parts(minutes, seconds)
        }
        None => s.parse::<Decimal>().map_err(|_| format!("Invalid pace: {}", s))?,
    };

    if pace <= dec!(0) {
        return Err(format!("Pace must be positive: {}", s));
    }
    if pace > MAX_PACE_MINUTES {
        return Err(format!("Pace must be at most {} minutes: {}", MAX_PACE_MINUTES, s));
    }
    Ok(pace)
}

/// Parse a duration written as `h:mm:ss`, `mm:ss` or decimal hours, into hours
pub fn parse_duration(s: &str) -> Result<Decimal, String> {
    let s = s.trim();
    let parts: Vec<&str> = s.split(':').collect();
    let numbers = parts
        .iter()
        .map(|p| p.parse::<u32>())
        .collect::<Result<Vec<u32>, _>>();

    let hours = match (parts.len(), numbers) {
        (1, _) => s.parse::<Decimal>().map_err(|_| format!("Invalid duration: {}", s))?,
        (2, Ok(n)) => hms_to_hours(0, n[0], n[1]),
        (3, Ok(n)) => hms_to_hours(n[0], n[1], n[2]),
        _ => return Err(format!("Invalid duration: {}", s)),
    };

    if hours <= dec!(0) {
        return Err(format!("Duration must be positive: {}", s));
    }
    if hours > MAX_DURATION_HOURS {
        return Err(format!("Duration must be at most {} hours: {}", MAX_DURATION_HOURS, s));
    }
    Ok(hours)
}

/// Parse a non-negative distance, elevation or speed
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("Invalid number: {}", s))?;

    if amount < dec!(0) {
        return Err(format!("Value must not be negative: {}", s));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("Value must be at most {}: {}", MAX_AMOUNT, s));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlongs".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::default(), UnitSystem::Metric);
    }

    #[test]
    fn test_conversions() {
        assert!((km_to_miles(KM_PER_MILE) - 1.0).abs() < 1e-12);
        assert!((m_to_ft(0.3048) - 1.0).abs() < 1e-12);
        assert!((to_internal_units(10.0, Quantity::Distance, UnitSystem::Imperial) - 16.09344).abs() < 1e-9);
        assert_eq!(to_internal_units(10.0, Quantity::Distance, UnitSystem::Metric), 10.0);

        // 8:00/mi is just under 5:00/km
        let pace = to_internal_units(8.0, Quantity::Pace, UnitSystem::Imperial);
        assert!((pace - 4.97097).abs() < 1e-4);

        assert_eq!(
            to_internal_decimal(dec!(1000), Quantity::Elevation, UnitSystem::Imperial),
            dec!(304.8)
        );
        assert_eq!(
            to_internal_decimal(dec!(5), Quantity::Distance, UnitSystem::Imperial),
            dec!(8.04672)
        );
        assert_eq!(
            to_internal_decimal(dec!(5.5), Quantity::Pace, UnitSystem::Metric),
            dec!(5.5)
        );
    }

    #[test]
    fn test_format_distance_and_elevation() {
        assert_eq!(format_distance(12.34, UnitSystem::Metric), "12.3 km");
        assert_eq!(format_distance(16.09344, UnitSystem::Imperial), "10.0 mi");
        assert_eq!(format_elevation(523.4, UnitSystem::Metric), "523 m");
        assert_eq!(format_elevation(304.8, UnitSystem::Imperial), "1000 ft");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(dec!(5.5), UnitSystem::Metric), "5:30/km");
        // 4:59.6 rounds up into the next minute
        assert_eq!(format_pace(dec!(4.9933), UnitSystem::Metric), "5:00/km");
        assert_eq!(format_pace(dec!(5), UnitSystem::Imperial), "8:03/mi");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(dec!(1.5)), "01:30:00");
        assert_eq!(format_duration(hms_to_hours(3, 4, 5)), "03:04:05");
        assert_eq!(format_duration(dec!(0)), "00:00:00");
    }

    #[test]
    fn test_parse_pace() {
        assert_eq!(parse_pace("5:30").unwrap(), dec!(5.5));
        assert_eq!(parse_pace("4.25").unwrap(), dec!(4.25));
        assert!(parse_pace("5:75").is_err());
        assert!(parse_pace("0:00").is_err());
        assert!(parse_pace("fast").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1:30:00").unwrap(), dec!(1.5));
        assert_eq!(parse_duration("45:00").unwrap(), dec!(0.75));
        assert_eq!(parse_duration("2.5").unwrap(), dec!(2.5));
        assert!(parse_duration("1:xx:00").is_err());
        assert!(parse_duration("0:00:00").is_err());
    }

    #[test]
    fn test_absurd_inputs_are_rejected() {
        assert!(parse_duration("79228162514264337593543950335").is_err());
        assert!(parse_duration("10001").is_err());
        assert_eq!(parse_duration("10000").unwrap(), MAX_DURATION_HOURS);
        assert!(parse_pace("79228162514264337593543950335").is_err());
        assert!(parse_pace("121").is_err());

        assert_eq!(parse_amount("12.5").unwrap(), dec!(12.5));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("79228162514264337593543950335").is_err());

        assert_eq!(format_duration(Decimal::MAX), "00:00:00");
        assert_eq!(format_pace(Decimal::MAX, UnitSystem::Metric), "0:00/km");
    }

    #[test]
    fn test_labels() {
        assert_eq!(unit_label(Quantity::Pace, UnitSystem::Imperial), "min/mi");
        assert_eq!(unit_label(Quantity::Elevation, UnitSystem::Metric), "m");
        assert_eq!(pace_from_parts(4, 30), dec!(4.5));
    }
}

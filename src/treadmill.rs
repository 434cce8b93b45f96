//! Treadmill speed and incline to road pace, and back

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CalculationError;

/// Extra minutes per km for each percent of incline
pub const INCLINE_PACE_COST: Decimal = dec!(0.15);

/// Highest incline most treadmills offer
pub const MAX_INCLINE_PERCENT: Decimal = dec!(15);

fn check_incline(incline_percent: Decimal) -> Result<(), CalculationError> {
    if incline_percent < dec!(0) || incline_percent > MAX_INCLINE_PERCENT {
        return Err(CalculationError::invalid("treadmill", "incline_percent", incline_percent));
    }
    Ok(())
}

/// Road pace (min/km) equivalent to a treadmill setting
pub fn treadmill_to_road_pace(
    speed_kmh: Decimal,
    incline_percent: Decimal,
) -> Result<Decimal, CalculationError> {
    if speed_kmh <= dec!(0) {
        return Err(CalculationError::invalid("treadmill", "speed_kmh", speed_kmh));
    }
    check_incline(incline_percent)?;

    Ok(dec!(60) / speed_kmh + incline_percent * INCLINE_PACE_COST)
}

/// Treadmill speed (km/h) that matches a road pace at the given incline
pub fn road_pace_to_treadmill_speed(
    pace_min_per_km: Decimal,
    incline_percent: Decimal,
) -> Result<Decimal, CalculationError> {
    if pace_min_per_km <= dec!(0) {
        return Err(CalculationError::invalid("treadmill", "pace_min_per_km", pace_min_per_km));
    }
    check_incline(incline_percent)?;

    let flat_pace = pace_min_per_km - incline_percent * INCLINE_PACE_COST;
    if flat_pace <= dec!(0) {
        return Err(CalculationError::DivisionByZero {
            calculation: "treadmill speed",
        });
    }

    Ok(dec!(60) / flat_pace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_treadmill() {
        assert_eq!(treadmill_to_road_pace(dec!(12), dec!(0)).unwrap(), dec!(5));
        assert_eq!(road_pace_to_treadmill_speed(dec!(5), dec!(0)).unwrap(), dec!(12));
    }

    #[test]
    fn test_incline_slows_equivalent_pace() {
        let pace = treadmill_to_road_pace(dec!(12), dec!(2)).unwrap();
        assert_eq!(pace, dec!(5.3));

        let speed = road_pace_to_treadmill_speed(pace, dec!(2)).unwrap();
        assert_eq!(speed, dec!(12));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(treadmill_to_road_pace(dec!(0), dec!(1)).is_err());
        assert!(treadmill_to_road_pace(dec!(10), dec!(16)).is_err());
        assert!(road_pace_to_treadmill_speed(dec!(-1), dec!(0)).is_err());
        assert_eq!(
            road_pace_to_treadmill_speed(dec!(1.5), dec!(10)),
            Err(CalculationError::DivisionByZero {
                calculation: "treadmill speed"
            })
        );
    }
}

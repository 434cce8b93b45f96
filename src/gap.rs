//! Grade-adjusted pace (GAP) and normalized graded pace (NGP)
//!
//! Both scale a pace held on a slope linearly with the grade, GAP at 7 % and
//! NGP at 5 % per grade point, then add 3 % per point of terrain technicality.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Pace change per grade point for GAP
pub const GAP_FACTOR: Decimal = dec!(0.07);

/// Pace change per grade point for NGP
pub const NGP_FACTOR: Decimal = dec!(0.05);

/// Pace change per point of technicality
pub const TECH_FACTOR: Decimal = dec!(0.03);

/// Accepted pace range in min/km
pub const PACE_BOUNDS: (Decimal, Decimal) = (dec!(0.5), dec!(25));

/// Accepted grade range in percent
pub const GRADE_BOUNDS: (Decimal, Decimal) = (dec!(-30), dec!(30));

/// GAP and NGP side by side for one pace and grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapComparison {
    pub gap: Decimal,
    pub ngp: Decimal,
    /// GAP minus NGP in min/km
    pub difference: Decimal,
    /// Difference as a percentage of NGP
    pub difference_percent: Decimal,
}

/// Grade-adjusted pace (min/km) for a pace held on `grade_percent`
pub fn grade_adjusted_pace(
    pace_min_per_km: Decimal,
    grade_percent: Decimal,
    technicality: Decimal,
) -> Result<Decimal, CalculationError> {
    graded_pace("grade adjusted pace", GAP_FACTOR, pace_min_per_km, grade_percent, technicality)
}

/// Normalized graded pace (min/km) for a pace held on `grade_percent`
pub fn normalized_graded_pace(
    pace_min_per_km: Decimal,
    grade_percent: Decimal,
    technicality: Decimal,
) -> Result<Decimal, CalculationError> {
    graded_pace("normalized graded pace", NGP_FACTOR, pace_min_per_km, grade_percent, technicality)
}

/// Convert a GAP into the NGP of the same underlying pace
pub fn gap_to_ngp(gap: Decimal, grade_percent: Decimal) -> Result<Decimal, CalculationError> {
    let divisor = slope_factor("gap to ngp", GAP_FACTOR, grade_percent)?;
    Ok(gap / divisor * (dec!(1) + grade_percent * NGP_FACTOR))
}

/// Convert an NGP into the GAP of the same underlying pace
pub fn ngp_to_gap(ngp: Decimal, grade_percent: Decimal) -> Result<Decimal, CalculationError> {
    let divisor = slope_factor("ngp to gap", NGP_FACTOR, grade_percent)?;
    Ok(ngp / divisor * (dec!(1) + grade_percent * GAP_FACTOR))
}

/// GAP, NGP and their difference
pub fn compare(
    pace_min_per_km: Decimal,
    grade_percent: Decimal,
    technicality: Decimal,
) -> Result<GapComparison, CalculationError> {
    let gap = grade_adjusted_pace(pace_min_per_km, grade_percent, technicality)?;
    let ngp = normalized_graded_pace(pace_min_per_km, grade_percent, technicality)?;
    let difference = gap - ngp;

    Ok(GapComparison {
        gap,
        ngp,
        difference,
        difference_percent: difference / ngp * dec!(100),
    })
}

/// Gradient in percent from horizontal and vertical distance
pub fn gradient_percent(horizontal: Decimal, vertical: Decimal) -> Decimal {
    if horizontal == dec!(0) {
        return dec!(0);
    }
    (vertical / horizontal) * dec!(100)
}

fn graded_pace(
    calculation: &'static str,
    factor: Decimal,
    pace_min_per_km: Decimal,
    grade_percent: Decimal,
    technicality: Decimal,
) -> Result<Decimal, CalculationError> {
    if pace_min_per_km < PACE_BOUNDS.0 || pace_min_per_km > PACE_BOUNDS.1 {
        return Err(CalculationError::invalid(calculation, "pace", pace_min_per_km));
    }
    if technicality < dec!(0) {
        return Err(CalculationError::invalid(calculation, "technicality", technicality));
    }
    let slope = slope_factor(calculation, factor, grade_percent)?;

    Ok(pace_min_per_km * slope * (dec!(1) + technicality * TECH_FACTOR))
}

/// `1 + grade·factor`, which must stay positive for a meaningful pace
fn slope_factor(
    calculation: &'static str,
    factor: Decimal,
    grade_percent: Decimal,
) -> Result<Decimal, CalculationError> {
    if grade_percent < GRADE_BOUNDS.0 || grade_percent > GRADE_BOUNDS.1 {
        return Err(CalculationError::invalid(calculation, "grade", grade_percent));
    }
    let slope = dec!(1) + grade_percent * factor;
    if slope <= dec!(0) {
        return Err(CalculationError::invalid(calculation, "grade", grade_percent));
    }
    Ok(slope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_adjustment() {
        let uphill = grade_adjusted_pace(dec!(6.0), dec!(5.0), dec!(0)).unwrap();
        assert_eq!(uphill, dec!(8.1));

        let downhill = grade_adjusted_pace(dec!(6.0), dec!(-5.0), dec!(0)).unwrap();
        assert_eq!(downhill, dec!(3.9));

        let flat = grade_adjusted_pace(dec!(6.0), dec!(0), dec!(0)).unwrap();
        assert_eq!(flat, dec!(6.0));
    }

    #[test]
    fn test_technicality_slows_pace() {
        // 5 * 1.07 * 1.06
        let technical = grade_adjusted_pace(dec!(5), dec!(1), dec!(2)).unwrap();
        assert_eq!(technical, dec!(5.671));

        assert!(grade_adjusted_pace(dec!(5), dec!(1), dec!(-1)).is_err());
    }

    #[test]
    fn test_normalized_graded_pace() {
        assert_eq!(normalized_graded_pace(dec!(6), dec!(5), dec!(0)).unwrap(), dec!(7.5));
        assert_eq!(normalized_graded_pace(dec!(6), dec!(-5), dec!(0)).unwrap(), dec!(4.5));
    }

    #[test]
    fn test_gap_ngp_conversions() {
        let gap = grade_adjusted_pace(dec!(6), dec!(5), dec!(0)).unwrap();
        let ngp = normalized_graded_pace(dec!(6), dec!(5), dec!(0)).unwrap();

        assert_eq!(gap_to_ngp(gap, dec!(5)).unwrap(), ngp);
        assert_eq!(ngp_to_gap(ngp, dec!(5)).unwrap(), gap);
    }

    #[test]
    fn test_comparison() {
        let comparison = compare(dec!(6), dec!(5), dec!(0)).unwrap();

        assert_eq!(comparison.difference, dec!(0.6));
        assert_eq!(comparison.difference_percent, dec!(8));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(grade_adjusted_pace(dec!(0), dec!(3), dec!(0)).is_err());
        assert!(grade_adjusted_pace(dec!(26), dec!(3), dec!(0)).is_err());
        assert!(grade_adjusted_pace(dec!(5), dec!(31), dec!(0)).is_err());
        assert!(grade_adjusted_pace(dec!(5), dec!(-31), dec!(0)).is_err());
    }

    #[test]
    fn test_steep_descent_without_positive_pace_is_rejected() {
        // 1 - 19 * 0.07 is negative, 1 - 19 * 0.05 is not
        assert!(grade_adjusted_pace(dec!(6), dec!(-19), dec!(0)).is_err());
        assert!(normalized_graded_pace(dec!(6), dec!(-19), dec!(0)).is_ok());
        assert!(normalized_graded_pace(dec!(6), dec!(-20), dec!(0)).is_err());
        assert!(gap_to_ngp(dec!(6), dec!(-20)).is_err());
    }

    #[test]
    fn test_gradient_calculation() {
        assert_eq!(gradient_percent(dec!(100), dec!(10)), dec!(10));
        assert_eq!(gradient_percent(dec!(100), dec!(-5)), dec!(-5));
        assert_eq!(gradient_percent(dec!(0), dec!(5)), dec!(0));
    }
}

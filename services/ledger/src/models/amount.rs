//! Conversions between decimal amounts and stored minor units (cents)

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

const MINOR_UNIT_SCALE: u32 = 2;

/// Round to cents and convert, or `None` when the value does not fit in an `i64`
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let cents = amount
        .round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?;
    cents.to_i64()
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_through_cents() {
        assert_eq!(to_minor_units(dec!(1000)), Some(100_000));
        assert_eq!(to_minor_units(dec!(-12.34)), Some(-1234));
        assert_eq!(from_minor_units(285_000), dec!(2850.00));
        assert_eq!(from_minor_units(-1234), dec!(-12.34));
    }

    #[test]
    fn test_sub_cent_values_are_rounded() {
        assert_eq!(to_minor_units(dec!(0.005)), Some(1));
        assert_eq!(to_minor_units(dec!(0.004)), Some(0));
        assert_eq!(to_minor_units(dec!(-0.005)), Some(-1));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }
}

//! Fixed-point money rules.
//!
//! Amounts and prices are stored as `NUMERIC(10, 2)`: non-negative, at most
//! two fractional digits and at most eight integral digits.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Number of fractional digits every monetary value carries.
pub const MONEY_SCALE: u32 = 2;

/// Exclusive upper bound implied by `NUMERIC(10, 2)`.
const MONEY_LIMIT: i64 = 100_000_000;

/// Check a monetary value against the storage rules.
///
/// Usable as a `#[validate(custom(function = ...))]` target.
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(money_error(
            "money_negative",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(money_error(
            "money_scale",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    if *value >= Decimal::from(MONEY_LIMIT) {
        return Err(money_error(
            "money_digits",
            "Ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(())
}

/// Rescale a validated value so it carries exactly two fractional digits.
pub fn normalize(value: Decimal) -> Decimal {
    let mut value = value.round_dp(MONEY_SCALE);
    value.rescale(MONEY_SCALE);
    value
}

fn money_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn whole_amount_renders_two_decimals() {
        assert_eq!(normalize(Decimal::from(2500)).to_string(), "2500.00");
        assert_eq!(normalize(dec("150.5")).to_string(), "150.50");
    }

    #[test]
    fn accepts_zero_and_two_places() {
        assert!(validate_money(&Decimal::ZERO).is_ok());
        assert!(validate_money(&dec("99999999.99")).is_ok());
        assert!(validate_money(&dec("10.10")).is_ok());
        // Trailing zeros beyond two places do not add precision.
        assert!(validate_money(&dec("10.100")).is_ok());
    }

    #[test]
    fn rejects_negative() {
        let err = validate_money(&dec("-0.01")).unwrap_err();
        assert_eq!(err.code, "money_negative");
    }

    #[test]
    fn rejects_third_decimal_place() {
        let err = validate_money(&dec("1.234")).unwrap_err();
        assert_eq!(err.code, "money_scale");
    }

    #[test]
    fn rejects_overflowing_digits() {
        let err = validate_money(&dec("100000000.00")).unwrap_err();
        assert_eq!(err.code, "money_digits");
    }
}

// Reference data
pub mod positions;

// Staff and catalog management
pub mod employees;
pub mod menu_items;

// Order workflow
pub mod customers;
pub mod orders;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use validator::ValidationError;

/// Largest value a `decimal(10, 2)` money column holds.
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Cents precision shared by every stored amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Whether `value` can be stored in a money column without rounding or overflow.
pub fn fits_money_column(value: &Decimal) -> bool {
    value.normalize().scale() <= AMOUNT_SCALE && value.abs() <= MAX_AMOUNT
}

fn money_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Money amounts that must be strictly positive (menu prices, line prices).
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if !value.is_sign_positive() || value.is_zero() {
        Err(money_error("positive_amount", "must be greater than zero"))
    } else if !fits_money_column(value) {
        Err(money_error(
            "money_column",
            "must have at most 2 decimal places and not exceed 99999999.99",
        ))
    } else {
        Ok(())
    }
}

/// Money amounts that may be zero but never negative (salaries).
pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(money_error("non_negative_amount", "must not be negative"))
    } else if !fits_money_column(value) {
        Err(money_error(
            "money_column",
            "must have at most 2 decimal places and not exceed 99999999.99",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_checks() {
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&dec!(0)).is_err());
        assert!(positive_amount(&dec!(-3)).is_err());
        assert!(non_negative_amount(&dec!(0)).is_ok());
        assert!(non_negative_amount(&dec!(-0.01)).is_err());
    }

    #[test]
    fn amounts_must_fit_the_money_columns() {
        assert!(positive_amount(&dec!(4.250)).is_ok());
        assert!(positive_amount(&dec!(0.005)).is_err());
        assert!(positive_amount(&dec!(99999999.99)).is_ok());
        assert!(positive_amount(&dec!(100000000)).is_err());
        assert!(non_negative_amount(&dec!(52000.125)).is_err());
        assert!(non_negative_amount(&Decimal::MAX).is_err());
    }
}

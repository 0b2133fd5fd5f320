use std::str::FromStr;

use anyhow::{anyhow, Result};
use substreams::scalar::{BigDecimal, BigInt};

use crate::consts::MULTIPLIER_DECIMALS;

/// Rescales an on-chain fixed point integer to its decimal value, `amount / 10^decimals`.
///
/// The result is exact: the decimal point is placed in the integer's digits rather than
/// going through a division, so no precision is lost whatever the exponent.
pub fn normalize(amount: &BigInt, decimals: u32) -> Result<BigDecimal> {
    let repr = amount.to_string();
    let (sign, digits) = match repr.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", repr.as_str()),
    };

    let decimals = decimals as usize;
    let value = if decimals == 0 {
        format!("{sign}{digits}")
    } else {
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (integer, fraction) = padded.split_at(padded.len() - decimals);
        format!("{sign}{integer}.{fraction}")
    };

    BigDecimal::from_str(&value).map_err(|e| anyhow!("Failed to build decimal from {}: {:?}", value, e))
}

/// Normalizes a reward multiplier expressed in `36 - stablecoin_decimals` fixed point.
pub fn normalize_multiplier(amount: &BigInt, stablecoin_decimals: u32) -> Result<BigDecimal> {
    let decimals = MULTIPLIER_DECIMALS
        .checked_sub(stablecoin_decimals)
        .ok_or_else(|| anyhow!("Stablecoin decimals {} exceed multiplier precision", stablecoin_decimals))?;
    normalize(amount, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn int(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn normalize_places_decimal_point() {
        assert_eq!(normalize(&int("1234"), 2).unwrap(), dec("12.34"));
        assert_eq!(normalize(&int("1500000000000000000"), 18).unwrap(), dec("1.5"));
    }

    #[test]
    fn normalize_pads_small_amounts() {
        assert_eq!(normalize(&int("5"), 3).unwrap(), dec("0.005"));
        assert_eq!(normalize(&int("0"), 18).unwrap(), dec("0"));
    }

    #[test]
    fn normalize_with_zero_exponent_is_identity() {
        assert_eq!(normalize(&int("987654321"), 0).unwrap(), dec("987654321"));
    }

    #[test]
    fn normalize_keeps_sign() {
        assert_eq!(normalize(&int("-25"), 1).unwrap(), dec("-2.5"));
    }

    #[test]
    fn normalize_is_exact_for_wide_values() {
        let raw = int("123456789012345678901234567890123456789");
        assert_eq!(normalize(&raw, 36).unwrap(), dec("123.456789012345678901234567890123456789"));
    }

    #[test]
    fn multiplier_uses_stablecoin_precision() {
        // 5 * 10^18 against a 6 decimals stablecoin is normalized with exponent 30.
        let raw = int("5000000000000000000");
        assert_eq!(normalize_multiplier(&raw, 6).unwrap(), dec("0.000000000005"));
        assert_eq!(normalize_multiplier(&raw, 6).unwrap(), normalize(&raw, 30).unwrap());
    }

    #[test]
    fn multiplier_rejects_oversized_decimals() {
        assert!(normalize_multiplier(&int("1"), 37).is_err());
    }
}

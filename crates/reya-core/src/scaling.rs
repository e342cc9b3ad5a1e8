//! Decimal to fixed-point conversion.
//!
//! The venue expects integers scaled by a power of ten, and the power differs
//! by field and by message category: sizes and conditional-order prices use
//! 18 decimals, while the market-order price uses the legacy 6-decimal scale.
//! The scale is a type parameter ([`E18`], [`E6`]) so a value scaled for one
//! field cannot be handed to a field expecting the other. The target bit
//! width is chosen by the conversion method (`to_int128`, `to_uint256`, ...),
//! each of which fails with a validation error when the value does not fit.
//!
//! All arithmetic is exact: inputs are parsed into arbitrary-precision
//! [`BigDecimal`] values and the decimal point is shifted on the digit string,
//! truncating toward zero. Precision is never a reason to reject an input;
//! only a result wider than 256 bits is.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use alloy_primitives::{Sign, I256, U256};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use rust_decimal::Decimal;

use crate::{Error, Result};

/// Decimal digits in `U256::MAX`.
const U256_MAX_DIGITS: usize = 78;

/// A power-of-ten fixed-point scale.
pub trait Scale {
    const DECIMALS: u32;
}

/// 18-decimal scale for sizes, amounts and conditional-order prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E18 {}

/// 6-decimal scale for the legacy market-order price field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E6 {}

impl Scale for E18 {
    const DECIMALS: u32 = 18;
}

impl Scale for E6 {
    const DECIMALS: u32 = 6;
}

/// Anything that can be read as an exact decimal.
///
/// Floats are converted through their shortest round-trip decimal text, so
/// `0.1_f64` reads as `0.1` rather than its binary expansion.
pub trait DecimalInput {
    fn to_decimal(&self) -> Result<BigDecimal>;
}

impl DecimalInput for BigDecimal {
    fn to_decimal(&self) -> Result<BigDecimal> {
        Ok(self.clone())
    }
}

impl DecimalInput for Decimal {
    fn to_decimal(&self) -> Result<BigDecimal> {
        parse_decimal(&self.to_string())
    }
}

impl DecimalInput for str {
    fn to_decimal(&self) -> Result<BigDecimal> {
        parse_decimal(self)
    }
}

impl DecimalInput for String {
    fn to_decimal(&self) -> Result<BigDecimal> {
        parse_decimal(self)
    }
}

impl DecimalInput for f64 {
    fn to_decimal(&self) -> Result<BigDecimal> {
        if !self.is_finite() {
            return Err(Error::validation(format!("{self} is not a finite number")));
        }
        parse_decimal(&self.to_string())
    }
}

macro_rules! impl_integer_input {
    ($($ty:ty),*) => {
        $(
            impl DecimalInput for $ty {
                fn to_decimal(&self) -> Result<BigDecimal> {
                    Ok(BigDecimal::from(*self))
                }
            }
        )*
    };
}

impl_integer_input!(i32, i64, u32, u64);

impl<T: DecimalInput + ?Sized> DecimalInput for &T {
    fn to_decimal(&self) -> Result<BigDecimal> {
        (**self).to_decimal()
    }
}

/// Parse a decimal string exactly, in plain (`-12.50`) or scientific
/// (`1.5e-3`) notation. Any number of digits is accepted.
pub fn parse_decimal(raw: &str) -> Result<BigDecimal> {
    let trimmed = raw.trim();
    if !is_decimal_literal(trimmed) {
        return Err(Error::validation(format!("{raw:?} is not a valid decimal")));
    }

    BigDecimal::from_str(trimmed)
        .map_err(|e| Error::validation(format!("{raw:?} is not a valid decimal: {e}")))
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn is_decimal_literal(text: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (body, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let exponent_ok = exponent.map_or(true, |exp| {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        !digits.is_empty() && all_digits(digits)
    });

    !(int_part.is_empty() && frac_part.is_empty())
        && all_digits(int_part)
        && all_digits(frac_part)
        && exponent_ok
}

/// A decimal value scaled to an integer at scale `S`.
///
/// Stored as sign and magnitude so every target width can be checked
/// without intermediate overflow.
pub struct Scaled<S> {
    negative: bool,
    magnitude: U256,
    _scale: PhantomData<S>,
}

/// Sizes, amounts and conditional-order prices.
pub type WadValue = Scaled<E18>;

/// Market-order price at the legacy 6-decimal scale.
pub type LegacyPriceValue = Scaled<E6>;

impl<S: Scale> Scaled<S> {
    /// Scale an exact decimal, truncating toward zero.
    ///
    /// Fails only when the scaled magnitude exceeds 256 bits.
    pub fn from_decimal(value: &BigDecimal) -> Result<Self> {
        let (unscaled, exponent) = value.as_bigint_and_exponent();
        let text = unscaled.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, text.as_str()),
        };

        // value * 10^DECIMALS = digits * 10^shift
        let shift = i64::from(S::DECIMALS)
            .checked_sub(exponent)
            .ok_or_else(too_wide::<S>)?;
        let integer_digits = if digits == "0" {
            None
        } else if shift >= 0 {
            let zeros = usize::try_from(shift).unwrap_or(usize::MAX);
            if digits.len().saturating_add(zeros) > U256_MAX_DIGITS {
                return Err(too_wide::<S>());
            }
            Some(format!("{digits}{}", "0".repeat(zeros)))
        } else {
            let dropped = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
            (dropped < digits.len()).then(|| digits[..digits.len() - dropped].to_string())
        };

        let magnitude = match integer_digits {
            Some(digits) => U256::from_str_radix(&digits, 10).map_err(|_| too_wide::<S>())?,
            None => U256::ZERO,
        };

        Ok(Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
            _scale: PhantomData,
        })
    }

    /// Parse and scale any [`DecimalInput`].
    pub fn parse<T: DecimalInput + ?Sized>(value: &T) -> Result<Self> {
        Self::from_decimal(&value.to_decimal()?)
    }

    pub fn decimals() -> u32 {
        S::DECIMALS
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Flip the sign; zero stays non-negative.
    pub fn negated(self) -> Self {
        Self {
            negative: !self.negative && !self.magnitude.is_zero(),
            ..self
        }
    }

    /// The same magnitude, non-negative.
    pub fn abs(self) -> Self {
        Self {
            negative: false,
            ..self
        }
    }

    pub fn to_int128(&self, field: &str) -> Result<i128> {
        let limit = if self.negative {
            U256::from(1u128 << 127)
        } else {
            U256::from(i128::MAX as u128)
        };
        if self.magnitude > limit {
            return Err(out_of_range(field, "int128", self));
        }
        let abs = self.magnitude.to::<u128>();
        Ok(if self.negative {
            0i128.wrapping_sub_unsigned(abs)
        } else {
            abs as i128
        })
    }

    pub fn to_uint128(&self, field: &str) -> Result<u128> {
        if self.negative {
            return Err(negative_unsigned(field, "uint128", self));
        }
        if self.magnitude > U256::from(u128::MAX) {
            return Err(out_of_range(field, "uint128", self));
        }
        Ok(self.magnitude.to::<u128>())
    }

    pub fn to_int256(&self, field: &str) -> Result<I256> {
        let sign = if self.negative {
            Sign::Negative
        } else {
            Sign::Positive
        };
        I256::checked_from_sign_and_abs(sign, self.magnitude)
            .ok_or_else(|| out_of_range(field, "int256", self))
    }

    pub fn to_uint256(&self, field: &str) -> Result<U256> {
        if self.negative {
            return Err(negative_unsigned(field, "uint256", self));
        }
        Ok(self.magnitude)
    }
}

fn out_of_range<S: Scale>(field: &str, ty: &str, value: &Scaled<S>) -> Error {
    Error::validation(format!("{field} = {value} does not fit in {ty}"))
}

fn too_wide<S: Scale>() -> Error {
    Error::validation(format!(
        "value does not fit in 256 bits once scaled by 1e{}",
        S::DECIMALS
    ))
}

fn negative_unsigned<S: Scale>(field: &str, ty: &str, value: &Scaled<S>) -> Error {
    Error::validation(format!("{field} = {value} is negative but {ty} is unsigned"))
}

// Manual impls: derives would require `S: Clone` etc. on the uninhabited markers.
impl<S> Clone for Scaled<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Scaled<S> {}

impl<S> PartialEq for Scaled<S> {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative && self.magnitude == other.magnitude
    }
}

impl<S> Eq for Scaled<S> {}

impl<S> fmt::Display for Scaled<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl<S: Scale> fmt::Debug for Scaled<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scaled<e{}>({})", S::DECIMALS, self)
    }
}

/// Scale a value at `S` in one step.
pub fn scale<S: Scale, T: DecimalInput + ?Sized>(value: &T) -> Result<Scaled<S>> {
    Scaled::<S>::parse(value)
}

/// Convert a fixed-point integer reported by the venue back to a decimal.
pub fn unscale<S: Scale>(raw: I256) -> Result<BigDecimal> {
    let unscaled = BigInt::from_str(&raw.to_string())
        .map_err(|e| Error::validation(format!("{raw} cannot be unscaled by 1e{}: {e}", S::DECIMALS)))?;
    Ok(BigDecimal::new(unscaled, i64::from(S::DECIMALS)).normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_scale_size_e18() {
        let size = scale::<E18, _>("0.1").unwrap();
        assert_eq!(size.to_int128("size").unwrap(), 100_000_000_000_000_000);
    }

    #[test]
    fn test_scale_price_e6() {
        let price = scale::<E6, _>("45000").unwrap();
        assert_eq!(price.to_uint128("price").unwrap(), 45_000_000_000);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let positive = scale::<E6, _>("1.23456789").unwrap();
        assert_eq!(positive.to_int128("v").unwrap(), 1_234_567);

        let negative = scale::<E6, _>("-1.23456789").unwrap();
        assert_eq!(negative.to_int128("v").unwrap(), -1_234_567);
    }

    #[test]
    fn test_negative_dust_truncates_to_zero() {
        let dust = scale::<E6, _>("-0.0000001").unwrap();
        assert!(dust.is_zero());
        assert!(!dust.is_negative());
        assert_eq!(dust.to_uint128("v").unwrap(), 0);
    }

    #[test]
    fn test_float_input_is_read_as_decimal_text() {
        // 0.1 has no exact binary representation; it must still scale to 1e17.
        let size = scale::<E18, _>(&0.1_f64).unwrap();
        assert_eq!(size.to_uint256("size").unwrap(), U256::from(100_000_000_000_000_000u128));

        let price = scale::<E18, _>(&45000.5_f64).unwrap();
        assert_eq!(
            price.to_uint256("price").unwrap(),
            U256::from(45_000_500_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_integer_inputs() {
        assert_eq!(
            scale::<E6, _>(&3u64).unwrap().to_uint128("v").unwrap(),
            3_000_000
        );
        assert_eq!(
            scale::<E6, _>(&-3i64).unwrap().to_int128("v").unwrap(),
            -3_000_000
        );
    }

    #[test]
    fn test_scientific_notation() {
        let value = scale::<E18, _>("1.5e-3").unwrap();
        assert_eq!(value.to_uint128("v").unwrap(), 1_500_000_000_000_000);
    }

    #[test]
    fn test_unparseable_input() {
        for bad in ["", "abc", "1.2.3", "--1", "12abc", ".", "1e", "1_000", "0x10", "1.5e+-3"] {
            let err = scale::<E18, _>(bad).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "input {bad:?}");
        }
        assert!(matches!(
            scale::<E18, _>(&f64::NAN),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_negative_rejected_for_unsigned() {
        let value = scale::<E18, _>("-1").unwrap();
        assert!(matches!(
            value.to_uint256("price"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            value.to_uint128("price"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_int128_bounds() {
        // i128::MAX / 1e18 is about 1.7e20.
        let fits = scale::<E18, _>("170141183460469231731").unwrap();
        assert!(fits.to_int128("size").is_ok());

        let too_big = scale::<E18, _>("170141183460469231732").unwrap();
        assert!(matches!(
            too_big.to_int128("size"),
            Err(Error::Validation { .. })
        ));

        let most_negative = scale::<E18, _>("-170141183460469231731").unwrap();
        assert!(most_negative.to_int128("size").is_ok());

        let too_negative = scale::<E18, _>("-170141183460469231732").unwrap();
        assert!(too_negative.to_int128("size").is_err());
    }

    #[test]
    fn test_uint128_bounds() {
        // u128::MAX / 1e18 is about 3.4e20.
        let too_big = scale::<E18, _>("340282366920938463464").unwrap();
        assert!(too_big.to_uint128("price").is_err());
        assert!(too_big.to_uint256("price").is_ok());
    }

    #[test]
    fn test_int256_negative() {
        let value = scale::<E18, _>("-2.5").unwrap();
        let expected = I256::try_from(-2_500_000_000_000_000_000i128).unwrap();
        assert_eq!(value.to_int256("size").unwrap(), expected);
    }

    #[test]
    fn test_negated_and_abs() {
        let value = scale::<E18, _>("2").unwrap();
        assert!(value.negated().is_negative());
        assert!(!value.negated().abs().is_negative());
        assert!(!scale::<E18, _>("0").unwrap().negated().is_negative());
    }

    #[test]
    fn test_unscale() {
        let dec = |s: &str| BigDecimal::from_str(s).unwrap();
        assert_eq!(
            unscale::<E18>(I256::try_from(100_000_000_000_000_000i128).unwrap()).unwrap(),
            dec("0.1")
        );
        assert_eq!(
            unscale::<E6>(I256::try_from(45_000_000_000i128).unwrap()).unwrap(),
            dec("45000")
        );
        assert_eq!(
            unscale::<E6>(I256::try_from(-1_500_000i128).unwrap()).unwrap(),
            dec("-1.5")
        );

        let widest = unscale::<E18>(I256::MAX).unwrap();
        assert_eq!(
            scale::<E18, _>(&widest).unwrap().to_int256("v").unwrap(),
            I256::MAX
        );
    }

    #[test]
    fn test_wei_precise_size() {
        let size = scale::<E18, _>("123456789012.123456789012345678").unwrap();
        assert_eq!(
            size.to_uint128("size").unwrap(),
            123_456_789_012_123_456_789_012_345_678
        );
    }

    #[test]
    fn test_sub_wei_dust_truncates_to_zero() {
        let dust = scale::<E18, _>("0.000000000000000000000000000001").unwrap();
        assert!(dust.is_zero());

        let almost_one = scale::<E18, _>("0.9999999999999999999999999999999999").unwrap();
        assert_eq!(
            almost_one.to_uint128("v").unwrap(),
            999_999_999_999_999_999
        );
    }

    #[test]
    fn test_large_price_fits_wide_slots() {
        let price = scale::<E6, _>("100000000000000000000000000000").unwrap();
        assert_eq!(
            price.to_uint128("price").unwrap(),
            100_000_000_000_000_000_000_000_000_000_000_000
        );

        let huge = scale::<E18, _>("1e50").unwrap();
        assert_eq!(
            huge.to_uint256("price").unwrap(),
            U256::from(10u64).pow(U256::from(68u64))
        );
        assert!(matches!(
            huge.to_uint128("price"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_beyond_uint256_rejected() {
        // U256::MAX is about 1.16e77.
        assert!(scale::<E18, _>("1e59").is_ok());
        for too_wide in ["1e60", "1e1000000000", "-1e60"] {
            assert!(
                matches!(scale::<E18, _>(too_wide), Err(Error::Validation { .. })),
                "input {too_wide}"
            );
        }
        // A tiny value with a huge negative exponent is just zero.
        assert!(scale::<E18, _>("1e-1000000000").unwrap().is_zero());
    }

    #[test]
    fn test_rust_decimal_input() {
        let price = scale::<E6, _>(&Decimal::new(450005, 1)).unwrap();
        assert_eq!(price.to_uint128("price").unwrap(), 45_000_500_000);
    }

    /// Reference: `trunc(digits * 10^decimals / 10^frac_len)` on big integers.
    fn reference_scale(int_part: &str, frac_part: &str, negative: bool, decimals: u32) -> String {
        let unscaled = BigInt::from_str(&format!("{int_part}{frac_part}")).unwrap();
        let ten = BigInt::from(10u32);
        let scaled = unscaled * ten.pow(decimals) / ten.pow(frac_part.len() as u32);
        if negative {
            (-scaled).to_string()
        } else {
            scaled.to_string()
        }
    }

    fn random_digits(rng: &mut impl Rng, len: usize) -> String {
        (0..len)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    #[test]
    fn test_scaling_matches_bigint_reference() {
        let mut rng = rand::thread_rng();

        for _ in 0..2000 {
            let int_len = rng.gen_range(1..=40);
            let frac_len = rng.gen_range(0..=40);
            let int_part = random_digits(&mut rng, int_len);
            let frac_part = random_digits(&mut rng, frac_len);
            let negative = rng.gen_bool(0.5);

            let text = if frac_len == 0 {
                format!("{}{}", if negative { "-" } else { "" }, int_part)
            } else {
                format!("{}{}.{}", if negative { "-" } else { "" }, int_part, frac_part)
            };

            let e18 = scale::<E18, _>(text.as_str()).unwrap();
            assert_eq!(
                e18.to_string(),
                reference_scale(&int_part, &frac_part, negative, 18),
                "e18 scaling of {text}"
            );

            let e6 = scale::<E6, _>(text.as_str()).unwrap();
            assert_eq!(
                e6.to_string(),
                reference_scale(&int_part, &frac_part, negative, 6),
                "e6 scaling of {text}"
            );
        }
    }
}

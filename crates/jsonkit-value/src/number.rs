//! Arbitrary-precision decimal numbers.
//!
//! A [`Number`] is an unscaled [`BigInt`] together with a decimal scale, so
//! the literal `1.50` is stored as `150 × 10^-2` and reads back as `1.50`.
//! Equality and hashing compare numeric values: `1.0 == 1` and `1e2 == 100`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("NOT_FINITE")]
    NotFinite,
    #[error("INVALID_LITERAL: {0}")]
    InvalidLiteral(String),
    #[error("OUT_OF_RANGE")]
    OutOfRange,
    #[error("LOSS_OF_PRECISION")]
    LossOfPrecision,
}

// ── Number ────────────────────────────────────────────────────────────────

/// Decimal value `unscaled × 10^-scale`.
#[derive(Clone, Debug, Default)]
pub struct Number {
    unscaled: BigInt,
    scale: i32,
}

impl Number {
    pub fn new(unscaled: BigInt, scale: i32) -> Self {
        Number { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// True when the literal carries no fractional digits.
    ///
    /// `10` and `1e3` are integral, `1.0` is not.
    pub fn is_integral(&self) -> bool {
        self.scale <= 0
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    // ── Best-effort conversions ───────────────────────────────────────────

    /// Integer part, truncated toward zero.
    pub fn to_big_int(&self) -> BigInt {
        if self.scale <= 0 {
            return &self.unscaled * pow10(self.scale.unsigned_abs());
        }
        if self.scale as usize >= digit_count(&self.unscaled) {
            return BigInt::zero();
        }
        &self.unscaled / pow10(self.scale as u32)
    }

    /// Low 64 bits of the truncated integer part in two's complement.
    fn low_bits(&self) -> u64 {
        // 10^64 is a multiple of 2^64.
        if self.scale < 0 && self.scale.unsigned_abs() >= 64 {
            return 0;
        }
        let (sign, digits) = self.to_big_int().to_u64_digits();
        let low = digits.first().copied().unwrap_or(0);
        if sign == Sign::Minus {
            low.wrapping_neg()
        } else {
            low
        }
    }

    pub fn to_i32(&self) -> i32 {
        self.low_bits() as i32
    }

    pub fn to_i64(&self) -> i64 {
        self.low_bits() as i64
    }

    pub fn to_u64(&self) -> u64 {
        self.low_bits()
    }

    /// Nearest `f64`; magnitudes beyond the `f64` range become infinite.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    // ── Exact conversions ─────────────────────────────────────────────────

    fn exact_integer(&self, max_digits: i64) -> Result<BigInt, NumberError> {
        let (unscaled, scale) = self.normalized();
        if scale > 0 {
            return Err(NumberError::LossOfPrecision);
        }
        if digit_count(&unscaled) as i64 - scale > max_digits {
            return Err(NumberError::OutOfRange);
        }
        let shift = u32::try_from(-scale).map_err(|_| NumberError::OutOfRange)?;
        Ok(unscaled * pow10(shift))
    }

    pub fn to_big_int_exact(&self) -> Result<BigInt, NumberError> {
        self.exact_integer(i64::MAX)
    }

    pub fn to_i64_exact(&self) -> Result<i64, NumberError> {
        self.exact_integer(20)?.to_i64().ok_or(NumberError::OutOfRange)
    }

    pub fn to_i32_exact(&self) -> Result<i32, NumberError> {
        i32::try_from(self.to_i64_exact()?).map_err(|_| NumberError::OutOfRange)
    }

    pub fn to_u64_exact(&self) -> Result<u64, NumberError> {
        self.exact_integer(20)?.to_u64().ok_or(NumberError::OutOfRange)
    }

    /// `f64` that converts back to exactly this decimal value.
    pub fn to_f64_exact(&self) -> Result<f64, NumberError> {
        let value = self.to_f64();
        if !value.is_finite() {
            return Err(NumberError::OutOfRange);
        }
        if Number::try_from(value)? == *self {
            Ok(value)
        } else {
            Err(NumberError::LossOfPrecision)
        }
    }

    /// Value with trailing zeros stripped from the unscaled part.
    fn normalized(&self) -> (BigInt, i64) {
        if self.unscaled.is_zero() {
            return (BigInt::zero(), 0);
        }
        let ten = BigInt::from(10u8);
        let mut unscaled = self.unscaled.clone();
        let mut scale = i64::from(self.scale);
        while (&unscaled % &ten).is_zero() {
            unscaled = &unscaled / &ten;
            scale -= 1;
        }
        (unscaled, scale)
    }
}

fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u8).pow(exponent)
}

fn digit_count(value: &BigInt) -> usize {
    value.magnitude().to_string().len()
}

// ── Literal parsing ───────────────────────────────────────────────────────

/// Parses the strict JSON number grammar
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
fn parse_literal(text: &str) -> Result<Number, NumberError> {
    let invalid = || NumberError::InvalidLiteral(text.to_string());
    let bytes = text.as_bytes();
    let is_digit = |pos: usize| bytes.get(pos).is_some_and(u8::is_ascii_digit);

    let mut pos = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }

    let int_start = pos;
    match bytes.get(pos) {
        Some(b'0') => pos += 1,
        Some(b'1'..=b'9') => {
            while is_digit(pos) {
                pos += 1;
            }
        }
        _ => return Err(invalid()),
    }
    let int_end = pos;

    let mut fraction = (pos, pos);
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        let start = pos;
        while is_digit(pos) {
            pos += 1;
        }
        if pos == start {
            return Err(invalid());
        }
        fraction = (start, pos);
    }

    let mut exponent: i64 = 0;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        let exponent_negative = match bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let start = pos;
        while is_digit(pos) {
            let digit = i64::from(bytes[pos] - b'0');
            exponent = exponent
                .checked_mul(10)
                .and_then(|e| e.checked_add(digit))
                .ok_or(NumberError::OutOfRange)?;
            pos += 1;
        }
        if pos == start {
            return Err(invalid());
        }
        if exponent_negative {
            exponent = -exponent;
        }
    }

    if pos != bytes.len() {
        return Err(invalid());
    }

    let mut digits = String::with_capacity(text.len());
    if negative {
        digits.push('-');
    }
    digits.push_str(&text[int_start..int_end]);
    digits.push_str(&text[fraction.0..fraction.1]);
    let unscaled: BigInt = digits.parse().map_err(|_| invalid())?;

    let scale = (fraction.1 - fraction.0) as i64 - exponent;
    let scale = i32::try_from(scale).map_err(|_| NumberError::OutOfRange)?;
    Ok(Number { unscaled, scale })
}

impl FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_literal(s)
    }
}

// ── Canonical text ────────────────────────────────────────────────────────

/// Plain notation when `scale >= 0` and the adjusted exponent is at least
/// `-6`, otherwise `d.dddE±n`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coefficient = self.unscaled.magnitude().to_string();
        let len = coefficient.len() as i64;
        let scale = i64::from(self.scale);
        let adjusted = len - 1 - scale;

        if self.is_negative() {
            f.write_str("-")?;
        }
        if scale >= 0 && adjusted >= -6 {
            if scale == 0 {
                return f.write_str(&coefficient);
            }
            if len > scale {
                let point = (len - scale) as usize;
                return write!(f, "{}.{}", &coefficient[..point], &coefficient[point..]);
            }
            f.write_str("0.")?;
            for _ in 0..(scale - len) {
                f.write_str("0")?;
            }
            return f.write_str(&coefficient);
        }

        f.write_str(&coefficient[..1])?;
        if len > 1 {
            write!(f, ".{}", &coefficient[1..])?;
        }
        let sign = if adjusted >= 0 { '+' } else { '-' };
        write!(f, "E{}{}", sign, adjusted.abs())
    }
}

// ── Equality ──────────────────────────────────────────────────────────────

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if self.scale == other.scale {
            return self.unscaled == other.unscaled;
        }
        self.normalized() == other.normalized()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Number { unscaled: BigInt::from(value), scale: 0 }
                }
            }
        )*
    };
}

number_from_int!(i32, i64, u32, u64);

impl From<BigInt> for Number {
    fn from(unscaled: BigInt) -> Self {
        Number { unscaled, scale: 0 }
    }
}

/// Shortest decimal that reads back as the same `f64`.
impl TryFrom<f64> for Number {
    type Error = NumberError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(NumberError::NotFinite);
        }
        format!("{value:e}").parse()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

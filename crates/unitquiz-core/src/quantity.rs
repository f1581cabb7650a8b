//! Exact decimal quantities.
//!
//! [`Quantity`] is a fixed-point decimal: an `i128` mantissa and a decimal
//! scale, so `value = mantissa / 10^scale`. Values are kept normalized (no
//! trailing fractional zeros, zero has scale 0), which makes structural
//! equality the same as numeric equality. Every scale factor in a unit family
//! is a power of ten, so converting between units only shifts the scale and
//! never rounds.
//!
//! [`Numeral`] is the parsed form of learner input. It keeps every digit the
//! learner typed, so answers longer than a `Quantity` can hold are still
//! compared exactly against an answer and tolerance.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Optional sign, integer digits, optional point and fraction digits.
static NUMERAL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^([+-])?([0-9]*)(?:\.([0-9]*))?$").ok());

/// Reasons a piece of text is not accepted as a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseQuantityError {
    /// The text is empty or only whitespace.
    #[error("input is empty")]
    Empty,
    /// The text is not a plain decimal numeral.
    #[error("not a decimal numeral")]
    Invalid,
    /// The integer part does not fit in 128 bits.
    #[error("too many digits before the decimal point")]
    TooLarge,
    /// The digits after the decimal point do not fit in 128 bits.
    #[error("too many digits after the decimal point")]
    TooPrecise,
}

/// An exact decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantity {
    mantissa: i128,
    scale: u32,
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Quantity {
    /// The value zero.
    pub const ZERO: Self = Self {
        mantissa: 0,
        scale: 0,
    };

    /// Creates `mantissa / 10^scale`, normalizing trailing zeros away.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::Quantity;
    ///
    /// let q = Quantity::from_parts(85_000, 6);
    /// assert_eq!(q.to_string(), "0.085");
    /// assert_eq!(q.scale(), 3);
    /// ```
    #[must_use]
    pub const fn from_parts(mantissa: i128, scale: u32) -> Self {
        if mantissa == 0 {
            return Self::ZERO;
        }
        let mut mantissa = mantissa;
        let mut scale = scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Creates a whole-number quantity.
    #[must_use]
    pub const fn from_integer(value: i64) -> Self {
        Self {
            mantissa: value as i128,
            scale: 0,
        }
    }

    /// Returns the normalized mantissa.
    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Returns the number of decimal places in the normalized value.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Returns `true` if the value is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Returns `true` if the value has no fractional part.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.scale == 0
    }

    /// Divides by `10^exp`. Always exact.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::Quantity;
    ///
    /// let mm = Quantity::from_integer(85_000);
    /// assert_eq!(mm.div_pow10(6).to_string(), "0.085");
    /// ```
    #[must_use]
    pub const fn div_pow10(self, exp: u32) -> Self {
        Self::from_parts(self.mantissa, self.scale.saturating_add(exp))
    }

    /// Multiplies by `10^exp`, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul_pow10(self, exp: u32) -> Option<Self> {
        if exp <= self.scale {
            return Some(Self::from_parts(self.mantissa, self.scale - exp));
        }
        let factor = pow10(exp - self.scale)?;
        Some(Self::from_parts(self.mantissa.checked_mul(factor)?, 0))
    }

    /// Adds two quantities, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Some(Self::from_parts(a.checked_add(b)?, scale))
    }

    /// Subtracts `other`, returning `None` on overflow.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Some(Self::from_parts(a.checked_sub(b)?, scale))
    }

    /// Returns the absolute value, or `None` for the single unrepresentable case.
    #[must_use]
    pub fn checked_abs(&self) -> Option<Self> {
        Some(Self {
            mantissa: self.mantissa.checked_abs()?,
            scale: self.scale,
        })
    }

    /// Returns `|self - other|`, or `None` if the operands cannot be aligned.
    #[must_use]
    pub fn abs_diff(&self, other: &Self) -> Option<Self> {
        self.checked_sub(other)?.checked_abs()
    }

    /// Returns `true` if `|self - other| <= tolerance`.
    ///
    /// Operands too far apart to be aligned in 128 bits are never within any
    /// tolerance a quiz would use, so that case reports `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::Quantity;
    ///
    /// let answer: Quantity = "0.085".parse().unwrap();
    /// let tolerance: Quantity = "0.0001".parse().unwrap();
    /// assert!("0.0851".parse::<Quantity>().unwrap().within(&answer, &tolerance));
    /// assert!(!"0.08511".parse::<Quantity>().unwrap().within(&answer, &tolerance));
    /// ```
    #[must_use]
    pub fn within(&self, other: &Self, tolerance: &Self) -> bool {
        self.abs_diff(other).is_some_and(|diff| diff <= *tolerance)
    }

    /// Rounds to `dp` decimal places, half away from zero.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        if self.scale <= dp {
            return *self;
        }
        let Some(divisor) = pow10(self.scale - dp) else {
            // More than 38 dropped digits: the magnitude is below half a unit.
            return Self::ZERO;
        };
        let quotient = self.mantissa / divisor;
        let remainder = self.mantissa % divisor;
        let rounded = if remainder.unsigned_abs() >= divisor.unsigned_abs() - remainder.unsigned_abs()
        {
            quotient + self.mantissa.signum()
        } else {
            quotient
        };
        Self::from_parts(rounded, dp)
    }

    /// Renders the value rounded to exactly `dp` decimal places.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::Quantity;
    ///
    /// let q: Quantity = "0.085".parse().unwrap();
    /// assert_eq!(q.format_fixed(1), "0.1");
    /// assert_eq!(Quantity::from_integer(85).format_fixed(1), "85.0");
    /// ```
    #[must_use]
    pub fn format_fixed(&self, dp: u32) -> String {
        let rounded = self.round_dp(dp);
        render(rounded.mantissa, rounded.scale, dp as usize)
    }

    /// Scales both mantissas to the larger of the two scales.
    fn aligned(&self, other: &Self) -> Option<(i128, i128, u32)> {
        let scale = self.scale.max(other.scale);
        let a = self.mantissa.checked_mul(pow10(scale - self.scale)?)?;
        let b = other.mantissa.checked_mul(pow10(scale - other.scale)?)?;
        Some((a, b, scale))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.aligned(other) {
            Some((a, b, _)) => a.cmp(&b),
            None => Numeral::from(*self).cmp(&Numeral::from(*other)),
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::from_parts(i128::from(value), 0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&render(self.mantissa, self.scale, self.scale as usize))
    }
}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Numeral>()?.to_quantity()
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| {
            serde::de::Error::custom(format!("invalid decimal '{s}': {e}"))
        })
    }
}

fn pow10(exp: u32) -> Option<i128> {
    10_i128.checked_pow(exp)
}

/// Formats `mantissa / 10^scale` with `frac_digits` digits after the point.
fn render(mantissa: i128, scale: u32, frac_digits: usize) -> String {
    let sign = if mantissa < 0 { "-" } else { "" };
    let mut digits = mantissa.unsigned_abs().to_string();
    let scale = scale as usize;
    if digits.len() <= scale {
        digits.insert_str(0, &"0".repeat(scale - digits.len() + 1));
    }
    let (int, frac) = digits.split_at(digits.len() - scale);
    if frac_digits == 0 {
        return format!("{sign}{int}");
    }
    let padding = "0".repeat(frac_digits.saturating_sub(frac.len()));
    format!("{sign}{int}.{frac}{padding}")
}

// ============================================================================
// Numeral
// ============================================================================

/// A decimal numeral of any length, held digit for digit.
///
/// Normalized like [`Quantity`]: no leading integer zeros, no trailing
/// fraction zeros, and zero is never negative.
///
/// # Examples
///
/// ```
/// use unitquiz_core::{Numeral, Quantity};
///
/// let answer: Quantity = "0.085".parse().unwrap();
/// let tolerance: Quantity = "0.0001".parse().unwrap();
/// let typed: Numeral = "0.0850000000000000000001".parse().unwrap();
/// assert!(typed.within(&answer, &tolerance));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Numeral {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Numeral {
    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    /// Returns `true` if the value is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Converts to a [`Quantity`] when the digits fit exactly.
    ///
    /// # Errors
    ///
    /// - `ParseQuantityError::TooLarge` if the integer part overflows `i128`.
    /// - `ParseQuantityError::TooPrecise` if the fraction digits do.
    pub fn to_quantity(&self) -> Result<Quantity, ParseQuantityError> {
        let mut mantissa = accumulate(0, &self.integer).ok_or(ParseQuantityError::TooLarge)?;
        mantissa = accumulate(mantissa, &self.fraction).ok_or(ParseQuantityError::TooPrecise)?;
        let scale =
            u32::try_from(self.fraction.len()).map_err(|_| ParseQuantityError::TooPrecise)?;
        if self.negative {
            mantissa = -mantissa;
        }
        Ok(Quantity::from_parts(mantissa, scale))
    }

    /// Returns `true` if `|self - target| <= tolerance`, decided exactly.
    ///
    /// The value is placed against the closed interval
    /// `[target - tolerance, target + tolerance]` digit by digit, so no digit
    /// the learner typed is dropped.
    #[must_use]
    pub fn within(&self, target: &Quantity, tolerance: &Quantity) -> bool {
        match (target.checked_sub(tolerance), target.checked_add(tolerance)) {
            (Some(low), Some(high)) => {
                self.cmp_quantity(&low).is_ge() && self.cmp_quantity(&high).is_le()
            }
            _ => self
                .to_quantity()
                .is_ok_and(|exact| exact.within(target, tolerance)),
        }
    }

    /// Orders this numeral against a quantity.
    #[must_use]
    pub fn cmp_quantity(&self, other: &Quantity) -> Ordering {
        self.cmp(&Self::from(*other))
    }

    fn signum(&self) -> i8 {
        if self.negative {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| self.fraction.cmp(&other.fraction))
    }
}

impl Ord for Numeral {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal {
            return by_sign;
        }
        let magnitude = self.cmp_magnitude(other);
        if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

impl PartialOrd for Numeral {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Quantity> for Numeral {
    fn from(value: Quantity) -> Self {
        let rendered = render(value.mantissa, value.scale, value.scale as usize);
        let digits = rendered.trim_start_matches('-');
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        Self {
            negative: value.is_negative(),
            integer: integer.trim_start_matches('0').to_string(),
            fraction: fraction.to_string(),
        }
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        let integer = if self.integer.is_empty() { "0" } else { &self.integer };
        if self.fraction.is_empty() {
            f.pad(&format!("{sign}{integer}"))
        } else {
            f.pad(&format!("{sign}{integer}.{}", self.fraction))
        }
    }
}

impl FromStr for Numeral {
    type Err = ParseQuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseQuantityError::Empty);
        }

        let re = NUMERAL.as_ref().ok_or(ParseQuantityError::Invalid)?;
        let caps = re.captures(text).ok_or(ParseQuantityError::Invalid)?;
        let int_part = caps.get(2).map_or("", |m| m.as_str());
        let frac_part = caps.get(3).map_or("", |m| m.as_str());
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseQuantityError::Invalid);
        }

        let mut numeral = Self {
            negative: caps.get(1).is_some_and(|m| m.as_str() == "-"),
            integer: int_part.trim_start_matches('0').to_string(),
            fraction: frac_part.trim_end_matches('0').to_string(),
        };
        if numeral.is_zero() {
            numeral.negative = false;
        }
        Ok(numeral)
    }
}

impl Serialize for Numeral {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Numeral {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| {
            serde::de::Error::custom(format!("invalid decimal '{s}': {e}"))
        })
    }
}

/// Appends ASCII `digits` to `start`, or `None` on overflow.
fn accumulate(start: i128, digits: &str) -> Option<i128> {
    digits.bytes().try_fold(start, |acc, digit| {
        acc.checked_mul(10)?.checked_add(i128::from(digit - b'0'))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_accepts_plain_numerals() {
        assert_eq!(q("85000"), Quantity::from_integer(85_000));
        assert_eq!(q("0.085"), Quantity::from_parts(85, 3));
        assert_eq!(q(".5"), Quantity::from_parts(5, 1));
        assert_eq!(q("5."), Quantity::from_integer(5));
        assert_eq!(q("-3"), Quantity::from_integer(-3));
        assert_eq!(q("+2.25"), Quantity::from_parts(225, 2));
        assert_eq!(q("  1.3 "), Quantity::from_parts(13, 1));
    }

    #[test]
    fn test_parse_normalizes_zeros() {
        assert_eq!(q("1.50"), q("1.5"));
        assert_eq!(q("007"), q("7"));
        assert_eq!(q("0.000"), Quantity::ZERO);
        assert_eq!(q("-0"), Quantity::ZERO);
        assert_eq!(q("8500.0").scale(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Quantity>(), Err(ParseQuantityError::Empty));
        assert_eq!("   ".parse::<Quantity>(), Err(ParseQuantityError::Empty));
        assert_eq!("abc".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!("1,5".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!("1e3".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!(".".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!("-".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!("1.2.3".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
        assert_eq!("١٢".parse::<Quantity>(), Err(ParseQuantityError::Invalid));
    }

    #[test]
    fn test_parse_fills_128_bits() {
        assert_eq!(
            q("12345678901234567890").to_string(),
            "12345678901234567890"
        );
        assert_eq!(
            q("0.0850000000000000000001"),
            Quantity::from_parts(850_000_000_000_000_000_001, 22)
        );
        assert_eq!(
            "1".repeat(40).parse::<Quantity>(),
            Err(ParseQuantityError::TooLarge)
        );
        assert_eq!(
            format!("0.{}", "1".repeat(40)).parse::<Quantity>(),
            Err(ParseQuantityError::TooPrecise)
        );
        // Padding zeros do not count.
        let padded = format!("{}1.1{}", "0".repeat(60), "0".repeat(60));
        assert_eq!(q(&padded), q("1.1"));
    }

    // ------------------------------------------------------------------------
    // Numeral
    // ------------------------------------------------------------------------

    fn n(s: &str) -> Numeral {
        s.parse().unwrap()
    }

    #[test]
    fn test_numeral_keeps_every_digit() {
        let long = format!("0.085{}1", "0".repeat(60));
        assert_eq!(n(&long).to_string(), long);
        assert_eq!(n(&long).to_quantity(), Err(ParseQuantityError::TooPrecise));
        assert_eq!(n("-007.50").to_string(), "-7.5");
        assert_eq!(n("-0.000"), Numeral::default());
        assert!(!n("-0").is_negative());
        assert_eq!(n(".5").to_string(), "0.5");
        assert_eq!("1e3".parse::<Numeral>(), Err(ParseQuantityError::Invalid));
        assert_eq!(" ".parse::<Numeral>(), Err(ParseQuantityError::Empty));
    }

    #[test]
    fn test_numeral_ordering() {
        assert!(n("0.51") > n("0.5"));
        assert!(n("0.5") > n("0.49"));
        assert!(n("10") > n("9.999"));
        assert!(n("-10") < n("-9.999"));
        assert!(n("-0.1") < n("0"));
        assert!(n("0") < n("0.0000001"));
        assert_eq!(n("3.0").cmp_quantity(&q("3")), Ordering::Equal);
        assert_eq!(n("-0.25").cmp_quantity(&q("-0.3")), Ordering::Greater);
        assert_eq!(n(&"9".repeat(50)).cmp_quantity(&q("1")), Ordering::Greater);
    }

    #[test]
    fn test_numeral_within_is_exact_past_128_bits() {
        let answer = q("0.085");
        let tolerance = q("0.0001");
        let zeros = "0".repeat(40);

        assert!(n("0.0850000000000000000001").within(&answer, &tolerance));
        assert!(n(&format!("0.0851{zeros}")).within(&answer, &tolerance));
        assert!(!n(&format!("0.0851{zeros}1")).within(&answer, &tolerance));
        assert!(!n(&format!("0.0848{zeros}1")).within(&answer, &tolerance));
        assert!(n(&format!("0.0849{zeros}1")).within(&answer, &tolerance));
        assert!(!n("12345678901234567890").within(&answer, &tolerance));
        assert!(!n(&format!("-{}", "9".repeat(60))).within(&answer, &tolerance));
        assert!(!n("0.0851").within(&answer, &q("-1")));
    }

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_integer(85_000).to_string(), "85000");
        assert_eq!(Quantity::from_parts(85, 3).to_string(), "0.085");
        assert_eq!(Quantity::from_parts(-5, 4).to_string(), "-0.0005");
        assert_eq!(Quantity::from_parts(13, 1).to_string(), "1.3");
        assert_eq!(Quantity::ZERO.to_string(), "0");
        assert_eq!(format!("{:>6}", Quantity::from_parts(13, 1)), "   1.3");
    }

    #[test]
    fn test_format_fixed_rounds_half_away_from_zero() {
        assert_eq!(q("85").format_fixed(1), "85.0");
        assert_eq!(q("0.085").format_fixed(1), "0.1");
        assert_eq!(q("0.05").format_fixed(1), "0.1");
        assert_eq!(q("0.04").format_fixed(1), "0.0");
        assert_eq!(q("-0.05").format_fixed(1), "-0.1");
        assert_eq!(q("12.345").format_fixed(2), "12.35");
        assert_eq!(q("12.345").format_fixed(0), "12");
        assert_eq!(q("0.0001").format_fixed(4), "0.0001");
    }

    // ------------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------------

    #[test]
    fn test_div_and_mul_pow10_are_exact() {
        let base = Quantity::from_integer(85_000);
        assert_eq!(base.div_pow10(1), q("8500"));
        assert_eq!(base.div_pow10(3), q("85"));
        assert_eq!(base.div_pow10(6), q("0.085"));
        assert_eq!(base.div_pow10(6).checked_mul_pow10(6), Some(base));
        assert_eq!(q("0.0001").checked_mul_pow10(6), Some(q("100")));
    }

    #[test]
    fn test_checked_mul_pow10_overflow() {
        let big = Quantity::from_parts(i128::MAX / 2, 0);
        assert_eq!(big.checked_mul_pow10(1), None);
    }

    #[test]
    fn test_add_sub_abs() {
        assert_eq!(q("0.085").checked_add(&q("0.015")), Some(q("0.1")));
        assert_eq!(q("8500").checked_sub(&q("850")), Some(q("7650")));
        assert_eq!(q("850").checked_sub(&q("8500")), Some(q("-7650")));
        assert_eq!(q("-1.5").checked_abs(), Some(q("1.5")));
        assert_eq!(q("1.3").abs_diff(&q("13")), Some(q("11.7")));
    }

    #[test]
    fn test_within_tolerance_boundary() {
        let tolerance = q("0.0001");
        let answer = q("0.085");
        assert!(q("0.085").within(&answer, &tolerance));
        assert!(q("0.0851").within(&answer, &tolerance));
        assert!(q("0.0849").within(&answer, &tolerance));
        assert!(!q("0.085100000000000001").within(&answer, &tolerance));
        assert!(!q("0.0852").within(&answer, &tolerance));
    }

    // ------------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------------

    #[test]
    fn test_ordering_across_scales() {
        assert!(q("0.1") > q("0.09"));
        assert!(q("-0.1") < q("-0.09"));
        assert!(q("100") > q("99.999999"));
        assert_eq!(q("1.000").cmp(&q("1")), Ordering::Equal);
    }

    #[test]
    fn test_ordering_when_alignment_overflows() {
        let huge = Quantity::from_parts(i128::MAX, 0);
        let tiny = Quantity::from_parts(1, 30);
        assert!(huge > tiny);
        assert!(tiny < huge);
        let neg_huge = Quantity::from_parts(-i128::MAX, 0);
        assert!(neg_huge < tiny);
        assert!(neg_huge < huge);

        let a = Quantity::from_parts(i128::MAX, 5);
        let b = Quantity::from_parts(i128::MAX - 1, 5);
        let c = Quantity::from_parts(1, 37);
        assert!(a > b);
        assert!(a > c);
        assert!(!huge.within(&tiny, &q("0.0001")));
        assert_eq!(neg_huge.cmp(&Quantity::from_parts(-1, 38)), Ordering::Less);
    }

    // ------------------------------------------------------------------------
    // Serde
    // ------------------------------------------------------------------------

    #[test]
    fn test_serializes_as_decimal_string() {
        assert_eq!(serde_json::to_string(&q("0.085")).unwrap(), r#""0.085""#);
        let back: Quantity = serde_json::from_str(r#""1.30""#).unwrap();
        assert_eq!(back, q("1.3"));
        assert!(serde_json::from_str::<Quantity>(r#""1e3""#).is_err());
        let typed: Numeral = serde_json::from_str(r#""0.50""#).unwrap();
        assert_eq!(serde_json::to_string(&typed).unwrap(), r#""0.5""#);
    }
}

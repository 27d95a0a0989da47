//! Numeric values that are either exact rationals or binary doubles.
//!
//! The representation is picked once per run by
//! [`Config::multiple_precision`](crate::config::Config): every `Number`
//! created with the same configuration carries the same variant, so
//! arithmetic never has to reconcile the two. Under
//! [`Config::log_counting`](crate::config::Config) the double denotes
//! `log10` of the represented value and `-inf` stands for zero.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use crate::config::Config;

const LOG10_2: f64 = std::f64::consts::LOG10_2;

/// An exact rational or a binary double, fixed per run.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Exact(BigRational),
    Float(f64),
}

impl Number {
    #[must_use]
    pub fn zero(config: &Config) -> Number {
        if config.multiple_precision {
            Number::Exact(BigRational::zero())
        } else {
            Number::Float(0.0)
        }
    }

    #[must_use]
    pub fn one(config: &Config) -> Number {
        if config.multiple_precision {
            Number::Exact(BigRational::one())
        } else {
            Number::Float(1.0)
        }
    }

    /// Parse a rational-form string `"p/q"` or a decimal/scientific string.
    ///
    /// Under `multiple_precision` both forms produce an exact rational;
    /// decimal strings are converted digit-by-digit and lose nothing.
    /// Otherwise both forms produce a double. Returns `None` when the
    /// token is not a number in either form.
    #[must_use]
    pub fn parse(s: &str, config: &Config) -> Option<Number> {
        if config.multiple_precision {
            match s.split_once('/') {
                Some((numer, denom)) => {
                    let numer: BigInt = numer.parse().ok()?;
                    let denom: BigInt = denom.parse().ok()?;
                    if denom.is_zero() {
                        return None;
                    }
                    Some(Number::Exact(BigRational::new(numer, denom)))
                }
                None => rational_from_decimal(s).map(Number::Exact),
            }
        } else {
            match s.split_once('/') {
                Some((numer, denom)) => {
                    let numer: f64 = numer.parse().ok()?;
                    let denom: f64 = denom.parse().ok()?;
                    Some(Number::Float(numer / denom))
                }
                None => s.parse().ok().map(Number::Float),
            }
        }
    }

    /// Base-10 logarithm of the represented value.
    ///
    /// In exact mode the rational is split into mantissa and exponent via
    /// its numerator's and denominator's bit lengths, so values far outside
    /// the double range still yield a finite logarithm.
    #[must_use]
    pub fn log10(&self) -> f64 {
        match self {
            Number::Float(f) => f.log10(),
            Number::Exact(q) => log10_bigint(q.numer()) - log10_bigint(q.denom()),
        }
    }

    /// Log of the sum of two log-space values, base 10.
    ///
    /// `-inf` is the additive identity. The result is computed in the
    /// max-shifted form `log10(10^(a-m) + 10^(b-m)) + m`, which cannot
    /// overflow for well-separated operands.
    ///
    /// # Panics
    ///
    /// Panics when either operand is an exact rational; log-space values
    /// only exist in the double representation.
    #[must_use]
    pub fn log_sum_exp(&self, other: &Number) -> f64 {
        let (a, b) = match (self, other) {
            (Number::Float(a), Number::Float(b)) => (*a, *b),
            _ => panic!("log-sum-exp requires log-space doubles"),
        };
        if a == f64::NEG_INFINITY {
            return b;
        }
        if b == f64::NEG_INFINITY {
            return a;
        }
        let m = a.max(b);
        (10f64.powf(a - m) + 10f64.powf(b - m)).log10() + m
    }
}

/// `log10` of a big integer without converting the whole value to a double.
fn log10_bigint(n: &BigInt) -> f64 {
    match n.sign() {
        Sign::Minus => f64::NAN,
        Sign::NoSign => f64::NEG_INFINITY,
        Sign::Plus => {
            let bits = n.bits();
            if bits <= 1000 {
                n.to_f64().unwrap_or(f64::NAN).log10()
            } else {
                let shift = (bits - 64) as usize;
                let top = (n >> shift).to_f64().unwrap_or(f64::NAN);
                top.log10() + shift as f64 * LOG10_2
            }
        }
    }
}

fn rational_from_decimal(s: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (s, 0),
    };

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits = format!("{int_part}{frac_part}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut numer: BigInt = digits.parse().ok()?;
    if negative {
        numer = -numer;
    }

    let mut value = BigRational::from_integer(numer);
    let scale = exponent - frac_part.len() as i64;
    if scale >= 0 {
        value *= BigRational::from_integer(pow10(scale as usize));
    } else {
        value /= BigRational::from_integer(pow10(scale.unsigned_abs() as usize));
    }
    Some(value)
}

fn pow10(exponent: usize) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent)
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a + b),
            (Number::Float(a), Number::Float(b)) => Number::Float(a + b),
            _ => unreachable!("mixed number representations"),
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a - b),
            (Number::Float(a), Number::Float(b)) => Number::Float(a - b),
            _ => unreachable!("mixed number representations"),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a * b),
            (Number::Float(a), Number::Float(b)) => Number::Float(a * b),
            _ => unreachable!("mixed number representations"),
        }
    }
}

impl AddAssign for Number {
    fn add_assign(&mut self, rhs: Number) {
        *self = self.clone() + rhs;
    }
}

impl MulAssign for Number {
    fn mul_assign(&mut self, rhs: Number) {
        *self = self.clone() * rhs;
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(b),
            _ => unreachable!("mixed number representations"),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(q) => write!(f, "{q}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Number;
    use crate::config::Config;

    fn exact() -> Config {
        Config::builder().multiple_precision(true).build()
    }

    fn float() -> Config {
        Config::builder().build()
    }

    #[test]
    fn rational_round_trip() {
        let config = exact();
        let n = Number::parse("22/7", &config).unwrap();
        assert_eq!(n.to_string(), "22/7");
        assert_eq!(Number::parse(&n.to_string(), &config).unwrap(), n);
    }

    #[test]
    fn decimal_is_exact() {
        let config = exact();
        assert_eq!(
            Number::parse("0.25", &config).unwrap(),
            Number::parse("1/4", &config).unwrap()
        );
        assert_eq!(
            Number::parse("-1.5e2", &config).unwrap(),
            Number::parse("-150", &config).unwrap()
        );
    }

    #[test]
    fn fraction_form_in_double_mode() {
        let config = float();
        assert_eq!(Number::parse("1/4", &config).unwrap(), Number::Float(0.25));
        assert_eq!(Number::parse("2.5", &config).unwrap(), Number::Float(2.5));
        assert_eq!(Number::parse("abc", &config), None);
    }

    #[test]
    fn arithmetic_and_ordering() {
        let config = exact();
        let a = Number::parse("1/3", &config).unwrap();
        let b = Number::parse("1/6", &config).unwrap();
        assert_eq!(a.clone() + b.clone(), Number::parse("1/2", &config).unwrap());
        assert_eq!(a.clone() - b.clone(), b.clone());
        assert_eq!(a.clone() * b.clone(), Number::parse("1/18", &config).unwrap());
        assert!(b < a);
        assert!(a >= b);

        let mut c = b.clone();
        c += b.clone();
        assert_eq!(c, a);
    }

    #[test]
    fn log10_of_huge_rational_stays_finite() {
        let config = exact();
        let n = Number::parse("1e400", &config).unwrap();
        assert!((n.log10() - 400.0).abs() < 1e-9);

        let tiny = Number::parse("1e-400", &config).unwrap();
        assert!((tiny.log10() + 400.0).abs() < 1e-9);
    }

    #[test]
    fn log_sum_exp_identities() {
        let a = Number::Float(3.0);
        let zero = Number::Float(f64::NEG_INFINITY);

        assert_eq!(a.log_sum_exp(&zero), 3.0);
        assert_eq!(zero.log_sum_exp(&a), 3.0);
        assert_eq!(a.log_sum_exp(&Number::Float(1.0)), Number::Float(1.0).log_sum_exp(&a));

        let doubled = a.log_sum_exp(&a);
        assert!((doubled - (3.0 + 2f64.log10())).abs() < 1e-12);
    }
}

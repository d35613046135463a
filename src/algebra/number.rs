//! # Numeric leaves
//!
//! `Number` is the concrete leaf every expression tree bottoms out at. Three kinds are supported:
//! machine integers (`Int`), exact fractions (`Rational`) and double precision floats (`Float`).
//!
//! Binary arithmetic promotes both operands to the wider kind (`Int < Rational < Float`), so
//! `2 + 0.5` is a `Float` and `1/3 + 1` stays an exact `Rational`. Integer arithmetic is checked
//! and truncates on division, like the machine type it wraps. Exponentiation and logarithms are
//! computed through an `f64` bridge, except for integer powers with a non-negative integer
//! exponent which stay exact.
use crate::algebra::errors::AlgebraError;
use crate::algebra::operation::OperatorKind;
use num::Integer;
use num::rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, ToPrimitive, Zero};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Kind of a numeric leaf, ordered from narrowest to widest
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum NumberKind {
    Int,
    Rational,
    Float,
}

/// A concrete numeric value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Rational(Rational64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(val) => write!(f, "{}", val),
            Number::Rational(val) => write!(f, "{}", val),
            Number::Float(val) => write!(f, "{}", val),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<Rational64> for Number {
    fn from(value: Rational64) -> Self {
        Number::Rational(value)
    }
}

impl Number {
    /// Exact fraction `numer / denom`, reduced to lowest terms
    pub fn rational(numer: i64, denom: i64) -> Result<Number, AlgebraError> {
        if denom == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        // reduced in i128: moving the sign of `i64::MIN` into the numerator overflows i64
        let (n, d) = (numer as i128, denom as i128);
        let g = n.gcd(&d);
        let (mut n, mut d) = (n / g, d / g);
        if d < 0 {
            n = -n;
            d = -d;
        }
        match (i64::try_from(n), i64::try_from(d)) {
            (Ok(n), Ok(d)) => Ok(Number::Rational(Rational64::new_raw(n, d))),
            _ => Err(AlgebraError::Overflow(format!("fraction {}/{}", numer, denom))),
        }
    }

    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Int(_) => NumberKind::Int,
            Number::Rational(_) => NumberKind::Rational,
            Number::Float(_) => NumberKind::Float,
        }
    }

    /// Lossy conversion used by the exponentiation/logarithm bridge
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(val) => *val as f64,
            Number::Rational(val) => *val.numer() as f64 / *val.denom() as f64,
            Number::Float(val) => *val,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(val) => *val == 0,
            Number::Rational(val) => val.is_zero(),
            Number::Float(val) => *val == 0.0,
        }
    }

    /// Converts the number to `kind`.
    ///
    /// Narrowing to `Int` rounds to the nearest integer, narrowing a float to `Rational` picks
    /// the closest fraction representable with 64-bit terms.
    pub fn coerce(self, kind: NumberKind) -> Result<Number, AlgebraError> {
        if self.kind() == kind {
            return Ok(self);
        }
        match (self, kind) {
            (Number::Int(val), NumberKind::Rational) => {
                Ok(Number::Rational(Rational64::from_integer(val)))
            }
            (Number::Int(_), NumberKind::Float) | (Number::Rational(_), NumberKind::Float) => {
                Ok(Number::Float(self.to_f64()))
            }
            (Number::Rational(val), NumberKind::Int) => Ok(Number::Int(val.round().to_integer())),
            (Number::Float(val), NumberKind::Int) => {
                if !val.is_finite() {
                    return Err(AlgebraError::Domain(format!("conversion of {} to Int", val)));
                }
                val.round()
                    .to_i64()
                    .map(Number::Int)
                    .ok_or_else(|| AlgebraError::Overflow(format!("conversion of {} to Int", val)))
            }
            (Number::Float(val), NumberKind::Rational) => Rational64::approximate_float(val)
                .map(Number::Rational)
                .ok_or_else(|| AlgebraError::Domain(format!("conversion of {} to Rational", val))),
            _ => Err(AlgebraError::Internal(format!(
                "no conversion from {} to {}",
                self.kind(),
                kind
            ))),
        }
    }

    /// Applies `op` with `self` as the left operand and `rhs` as the right one.
    ///
    /// For `Logarithm` the right operand is the base: `log_rhs(self)`.
    pub fn apply(self, op: OperatorKind, rhs: Number) -> Result<Number, AlgebraError> {
        match op {
            OperatorKind::Exponentiation => self.power(rhs),
            OperatorKind::Logarithm => {
                finite(float_op(op, self.to_f64(), rhs.to_f64()), op).map(Number::Float)
            }
            OperatorKind::Addition
            | OperatorKind::Subtraction
            | OperatorKind::Multiplication
            | OperatorKind::Division => {
                if op == OperatorKind::Division && rhs.is_zero() {
                    return Err(AlgebraError::DivisionByZero);
                }
                let kind = self.kind().max(rhs.kind());
                match (self.coerce(kind)?, rhs.coerce(kind)?) {
                    (Number::Int(a), Number::Int(b)) => checked_op(op, &a, &b).map(Number::Int),
                    (Number::Rational(a), Number::Rational(b)) => {
                        checked_op(op, &a, &b).map(Number::Rational)
                    }
                    (Number::Float(a), Number::Float(b)) => {
                        finite(float_op(op, a, b), op).map(Number::Float)
                    }
                    (a, b) => Err(AlgebraError::Internal(format!(
                        "operands {} and {} were not promoted to {}",
                        a.kind(),
                        b.kind(),
                        kind
                    ))),
                }
            }
        }
    }

    fn power(self, exponent: Number) -> Result<Number, AlgebraError> {
        if let (Number::Int(base), Number::Int(exp)) = (self, exponent) {
            if exp >= 0 {
                let overflow = || AlgebraError::Overflow(OperatorKind::Exponentiation.to_string());
                let exp = u32::try_from(exp).map_err(|_| overflow())?;
                return base.checked_pow(exp).map(Number::Int).ok_or_else(overflow);
            }
        }
        let op = OperatorKind::Exponentiation;
        finite(float_op(op, self.to_f64(), exponent.to_f64()), op).map(Number::Float)
    }
}

fn checked_op<T>(op: OperatorKind, a: &T, b: &T) -> Result<T, AlgebraError>
where
    T: CheckedAdd + CheckedSub + CheckedMul + CheckedDiv,
{
    let result = match op {
        OperatorKind::Addition => a.checked_add(b),
        OperatorKind::Subtraction => a.checked_sub(b),
        OperatorKind::Multiplication => a.checked_mul(b),
        OperatorKind::Division => a.checked_div(b),
        OperatorKind::Exponentiation | OperatorKind::Logarithm => {
            return Err(AlgebraError::Internal(format!(
                "{} has no checked integer form",
                op
            )));
        }
    };
    result.ok_or_else(|| AlgebraError::Overflow(op.to_string()))
}

fn float_op(op: OperatorKind, a: f64, b: f64) -> f64 {
    match op {
        OperatorKind::Addition => a + b,
        OperatorKind::Subtraction => a - b,
        OperatorKind::Multiplication => a * b,
        OperatorKind::Division => a / b,
        OperatorKind::Exponentiation => a.powf(b),
        OperatorKind::Logarithm => a.log(b),
    }
}

fn finite(val: f64, op: OperatorKind) -> Result<f64, AlgebraError> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(AlgebraError::Domain(op.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_promotion_picks_wider_kind() {
        let sum = Number::Int(2).apply(OperatorKind::Addition, Number::Float(0.5)).unwrap();
        assert_eq!(sum, Number::Float(2.5));
        let third = Number::rational(1, 3).unwrap();
        let sum = third.apply(OperatorKind::Addition, Number::Int(1)).unwrap();
        assert_eq!(sum, Number::rational(4, 3).unwrap());
    }

    #[test]
    fn test_integer_division_truncates() {
        let q = Number::Int(7).apply(OperatorKind::Division, Number::Int(2)).unwrap();
        assert_eq!(q, Number::Int(3));
        let q = Number::Int(-7).apply(OperatorKind::Division, Number::Int(2)).unwrap();
        assert_eq!(q, Number::Int(-3));
    }

    #[test]
    fn test_rational_division_is_exact() {
        let q = Number::rational(7, 1)
            .unwrap()
            .apply(OperatorKind::Division, Number::Int(2))
            .unwrap();
        assert_eq!(q, Number::rational(7, 2).unwrap());
    }

    #[test]
    fn test_division_by_zero() {
        for zero in [Number::Int(0), Number::Float(0.0), Number::rational(0, 5).unwrap()] {
            let res = Number::Int(1).apply(OperatorKind::Division, zero);
            assert_eq!(res, Err(AlgebraError::DivisionByZero));
        }
        assert_eq!(Number::rational(1, 0), Err(AlgebraError::DivisionByZero));
    }

    #[test]
    fn test_rational_sign_normalisation() {
        assert_eq!(Number::rational(2, -4), Number::rational(-1, 2));
        assert_eq!(
            Number::rational(i64::MIN, -2),
            Ok(Number::Rational(Rational64::from_integer(1 << 62)))
        );
        assert_eq!(
            Number::rational(i64::MIN, i64::MIN),
            Ok(Number::Rational(Rational64::from_integer(1)))
        );
        assert!(matches!(
            Number::rational(i64::MIN, -1),
            Err(AlgebraError::Overflow(_))
        ));
        assert!(matches!(
            Number::rational(1, i64::MIN),
            Err(AlgebraError::Overflow(_))
        ));
    }

    #[test]
    fn test_integer_overflow() {
        let res = Number::Int(i64::MAX).apply(OperatorKind::Addition, Number::Int(1));
        assert!(matches!(res, Err(AlgebraError::Overflow(_))));
        let res = Number::Int(10).apply(OperatorKind::Exponentiation, Number::Int(40));
        assert!(matches!(res, Err(AlgebraError::Overflow(_))));
    }

    #[test]
    fn test_power_and_logarithm() {
        let p = Number::Int(2).apply(OperatorKind::Exponentiation, Number::Int(10)).unwrap();
        assert_eq!(p, Number::Int(1024));
        let p = Number::Int(2).apply(OperatorKind::Exponentiation, Number::Int(-1)).unwrap();
        assert_eq!(p, Number::Float(0.5));
        let root = Number::Int(16)
            .apply(OperatorKind::Exponentiation, Number::Float(0.5))
            .unwrap();
        assert_relative_eq!(root.to_f64(), 4.0);
        let l = Number::Int(1000).apply(OperatorKind::Logarithm, Number::Int(10)).unwrap();
        assert_relative_eq!(l.to_f64(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_logarithm_of_negative_is_domain_error() {
        let res = Number::Int(-8).apply(OperatorKind::Logarithm, Number::Int(2));
        assert!(matches!(res, Err(AlgebraError::Domain(_))));
    }

    #[test]
    fn test_coerce_rounds_to_int() {
        assert_eq!(Number::Float(3.9999999).coerce(NumberKind::Int), Ok(Number::Int(4)));
        assert_eq!(
            Number::rational(7, 2).unwrap().coerce(NumberKind::Int),
            Ok(Number::Int(4))
        );
        assert!(matches!(
            Number::Float(f64::NAN).coerce(NumberKind::Int),
            Err(AlgebraError::Domain(_))
        ));
        assert!(matches!(
            Number::Float(1e30).coerce(NumberKind::Int),
            Err(AlgebraError::Overflow(_))
        ));
    }

    #[test]
    fn test_coerce_reaches_every_kind() {
        let n = Number::Float(0.25);
        for kind in NumberKind::iter() {
            let coerced = n.coerce(kind).unwrap();
            assert_eq!(coerced.kind(), kind);
        }
        assert_eq!(
            n.coerce(NumberKind::Rational),
            Ok(Number::rational(1, 4).unwrap())
        );
    }
}

//! Checked scalar operations.
//!
//! These back both the expression evaluator (function application and binary
//! operators) and the numbered menu, so the two surfaces report identical
//! errors for identical inputs.

use super::error::CalcError;
use super::state::AngleMode;

/// Largest `n` whose factorial is a finite `f64`.
pub const MAX_FACTORIAL: u32 = 170;

/// Reject a non-finite result: NaN is a domain error, infinity an overflow.
fn checked(value: f64, operation: &str) -> Result<f64, CalcError> {
    if value.is_nan() {
        return Err(CalcError::domain(format!("{operation} result is not a number")));
    }
    if value.is_infinite() {
        return Err(CalcError::overflow(format!("{operation} result is too large")));
    }
    Ok(value)
}

pub fn add(a: f64, b: f64) -> Result<f64, CalcError> {
    checked(a + b, "addition")
}

pub fn subtract(a: f64, b: f64) -> Result<f64, CalcError> {
    checked(a - b, "subtraction")
}

pub fn multiply(a: f64, b: f64) -> Result<f64, CalcError> {
    checked(a * b, "multiplication")
}

pub fn divide(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    checked(a / b, "division")
}

pub fn power(base: f64, exponent: f64) -> Result<f64, CalcError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    let value = base.powf(exponent);
    if value.is_nan() {
        return Err(CalcError::domain(format!(
            "{base} cannot be raised to the power {exponent}"
        )));
    }
    checked(value, "power")
}

pub fn square_root(a: f64) -> Result<f64, CalcError> {
    if a < 0.0 {
        return Err(CalcError::domain(
            "square root of negative number is not allowed",
        ));
    }
    Ok(a.sqrt())
}

pub fn sin(a: f64, mode: AngleMode) -> f64 {
    mode.angle_to_radians(a).sin()
}

pub fn cos(a: f64, mode: AngleMode) -> f64 {
    mode.angle_to_radians(a).cos()
}

pub fn tan(a: f64, mode: AngleMode) -> f64 {
    mode.angle_to_radians(a).tan()
}

pub fn asin(a: f64, mode: AngleMode) -> Result<f64, CalcError> {
    if !(-1.0..=1.0).contains(&a) {
        return Err(CalcError::domain("arc sine input must be between -1 and 1"));
    }
    Ok(mode.radians_to_angle(a.asin()))
}

pub fn acos(a: f64, mode: AngleMode) -> Result<f64, CalcError> {
    if !(-1.0..=1.0).contains(&a) {
        return Err(CalcError::domain(
            "arc cosine input must be between -1 and 1",
        ));
    }
    Ok(mode.radians_to_angle(a.acos()))
}

pub fn atan(a: f64, mode: AngleMode) -> f64 {
    mode.radians_to_angle(a.atan())
}

pub fn ln(a: f64) -> Result<f64, CalcError> {
    if a <= 0.0 {
        return Err(CalcError::domain(
            "natural logarithm input must be positive",
        ));
    }
    Ok(a.ln())
}

pub fn log10(a: f64) -> Result<f64, CalcError> {
    if a <= 0.0 {
        return Err(CalcError::domain("logarithm input must be positive"));
    }
    Ok(a.log10())
}

/// Logarithm of `a` in an arbitrary `base`.
pub fn log(a: f64, base: f64) -> Result<f64, CalcError> {
    if a <= 0.0 {
        return Err(CalcError::domain("logarithm input must be positive"));
    }
    if base <= 0.0 || base == 1.0 {
        return Err(CalcError::domain(
            "logarithm base must be positive and not equal to 1",
        ));
    }
    Ok(a.ln() / base.ln())
}

/// Factorial of a non-negative integer-valued `n`.
///
/// Non-integers and negatives are domain errors; anything above
/// [`MAX_FACTORIAL`] overflows `f64`.
pub fn factorial(n: f64) -> Result<f64, CalcError> {
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(CalcError::domain("factorial requires an integer"));
    }
    if n < 0.0 {
        return Err(CalcError::domain("factorial of negative number"));
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Err(CalcError::overflow(format!(
            "{n}! is too large (limit is {MAX_FACTORIAL}!)"
        )));
    }
    Ok((2..=n as u32).fold(1.0, |acc, k| acc * f64::from(k)))
}

pub fn absolute(a: f64) -> f64 {
    a.abs()
}

pub fn ceiling(a: f64) -> f64 {
    a.ceil()
}

pub fn floor(a: f64) -> f64 {
    a.floor()
}

/// Round to `decimals` places; negative values round to tens, hundreds, ...
pub fn round_to(a: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = a * factor;
    if !scaled.is_finite() || factor == 0.0 {
        return a;
    }
    scaled.round() / factor
}

pub fn degrees_to_radians(degrees: f64) -> Result<f64, CalcError> {
    checked(degrees.to_radians(), "degrees to radians")
}

pub fn radians_to_degrees(radians: f64) -> Result<f64, CalcError> {
    checked(radians.to_degrees(), "radians to degrees")
}

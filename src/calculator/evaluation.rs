//! Expression evaluation.
//!
//! Normalizes calculator notation, parses the canonical text with the
//! closed grammar in [`super::parser`], and folds the tree into a finite
//! `f64` using the checked operations in [`super::ops`].

use tracing::debug;

use super::error::CalcError;
use super::lexer::tokenize;
use super::normalize::normalize;
use super::ops;
use super::parser::{BinaryOp, Expr, Func, parse};
use super::state::AngleMode;

/// Result of a successful evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The input expression, trimmed.
    pub expression: String,
    /// Canonical text the evaluator actually parsed.
    pub normalized: String,
    /// The numeric value.
    pub value: f64,
}

impl Evaluation {
    /// Formatted for display (with thousand separators).
    pub fn display(&self) -> String {
        format_display(self.value)
    }

    /// Formatted without separators, rounded to 10 decimals.
    pub fn plain(&self) -> String {
        format_plain(self.value)
    }
}

/// Evaluate a calculator expression in the given angle mode.
pub fn evaluate_expression(input: &str, mode: AngleMode) -> Result<Evaluation, CalcError> {
    let expression = input.trim().to_string();
    let normalized = normalize(&expression, mode)?;
    let tree = parse(&tokenize(&normalized)?)?;
    let value = eval(&tree)?;

    debug!(%expression, %normalized, value, "evaluated expression");
    Ok(Evaluation {
        expression,
        normalized,
        value,
    })
}

/// Evaluate a parsed tree. Trigonometric calls work in radians.
pub fn eval(expr: &Expr) -> Result<f64, CalcError> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::Neg(inner) => -eval(inner)?,
        Expr::Chain { first, rest } => {
            let mut acc = eval(first)?;
            for (op, operand) in rest {
                acc = apply_binary(*op, acc, eval(operand)?)?;
            }
            acc
        }
        Expr::Binary { op, lhs, rhs } => apply_binary(*op, eval(lhs)?, eval(rhs)?)?,
        Expr::Call { func, args } => apply(*func, args)?,
    };
    finite(value)
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> Result<f64, CalcError> {
    match op {
        BinaryOp::Add => ops::add(a, b),
        BinaryOp::Sub => ops::subtract(a, b),
        BinaryOp::Mul => ops::multiply(a, b),
        BinaryOp::Div => ops::divide(a, b),
        BinaryOp::Pow => ops::power(a, b),
    }
}

fn apply(func: Func, args: &[Expr]) -> Result<f64, CalcError> {
    let Some(first) = args.first() else {
        return Err(CalcError::invalid(func.name(), "missing argument"));
    };
    let x = eval(first)?;
    let second = args.get(1).map(eval).transpose()?;
    let mode = AngleMode::Radians;

    match func {
        Func::Sin => Ok(ops::sin(x, mode)),
        Func::Cos => Ok(ops::cos(x, mode)),
        Func::Tan => Ok(ops::tan(x, mode)),
        Func::Asin => ops::asin(x, mode),
        Func::Acos => ops::acos(x, mode),
        Func::Atan => Ok(ops::atan(x, mode)),
        Func::Sqrt => ops::square_root(x),
        Func::Ln => ops::ln(x),
        Func::Log => match second {
            Some(base) => ops::log(x, base),
            None => ops::log10(x),
        },
        Func::Abs => Ok(ops::absolute(x)),
        Func::Fact => ops::factorial(x),
        Func::Rad => ops::degrees_to_radians(x),
        Func::Deg => ops::radians_to_degrees(x),
        Func::Exp => Ok(x.exp()),
        Func::Ceil => Ok(ops::ceiling(x)),
        Func::Floor => Ok(ops::floor(x)),
        Func::Round => {
            let decimals = second.unwrap_or(0.0);
            if decimals.fract() != 0.0 || decimals.abs() > 300.0 {
                return Err(CalcError::domain(
                    "round needs an integer number of decimals",
                ));
            }
            Ok(ops::round_to(x, decimals as i32))
        }
    }
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_nan() {
        Err(CalcError::domain("result is not a number"))
    } else if value.is_infinite() {
        Err(CalcError::overflow("result is too large"))
    } else {
        Ok(value)
    }
}

/// Format a number for display with thousand separators.
pub fn format_display(value: f64) -> String {
    let plain = format_plain(value);
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };

    match digits.split_once('.') {
        Some((int_part, dec_part)) => {
            format!("{sign}{}.{dec_part}", format_with_separators(int_part))
        }
        None => format!("{sign}{}", format_with_separators(digits)),
    }
}

/// Group a run of ASCII digits with thousand separators.
fn format_with_separators(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a number without separators (raw number, at most 10 decimals).
pub fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let formatted = format!("{:.10}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

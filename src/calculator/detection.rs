//! Shape checks run before an expression is evaluated.
//!
//! Rejects input whose failure would otherwise surface as an ambiguous parse
//! error deep inside the evaluator: empty parentheses, unbalanced parentheses,
//! a dangling trailing operator, or two operators in a row.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::CalcError;

lazy_static! {
    /// An opening parenthesis directly followed by its closing one.
    static ref EMPTY_PARENS: Regex = Regex::new(r"\(\s*\)").unwrap();

    /// Expression ending in an operator or an unfinished group.
    static ref TRAILING_OPERATOR: Regex = Regex::new(r"[+\-*/(^×÷−]\s*$").unwrap();

    /// Operator pairs that never form a valid expression, matched after
    /// glyph folding. A minus after `*`, `/` or `^` is a sign, so `2*-3`
    /// stays legal.
    static ref DOUBLED_OPERATOR: Regex = Regex::new(
        r"\+\+|--|\*\*|//|\^\^|\+-|-\+|\*\+|\+\*|/\+|\+/"
    ).unwrap();
}

/// Validate the overall shape of `input`.
pub fn check_shape(input: &str) -> Result<(), CalcError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(CalcError::invalid(input, "expression is empty"));
    }

    if let Some(m) = EMPTY_PARENS.find(trimmed) {
        return Err(CalcError::invalid(m.as_str(), "empty parentheses"));
    }

    check_balanced(trimmed)?;

    if TRAILING_OPERATOR.is_match(trimmed) {
        return Err(CalcError::invalid(
            trimmed,
            "expression ends with an operator",
        ));
    }

    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_operator_glyph)
        .collect();
    if let Some(m) = DOUBLED_OPERATOR.find(&compact) {
        return Err(CalcError::invalid(m.as_str(), "doubled operator"));
    }

    Ok(())
}

/// Whether a live preview should attempt to evaluate `input`.
///
/// A lone `"0"` (the keypad's idle display) is never previewed.
pub fn can_evaluate(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return false;
    }
    is_plain_number(trimmed) || check_shape(trimmed).is_ok()
}

/// Display glyphs to the ASCII operator the lexer reads them as.
fn fold_operator_glyph(c: char) -> char {
    match c {
        '×' => '*',
        '÷' => '/',
        '−' => '-',
        other => other,
    }
}

fn check_balanced(input: &str) -> Result<(), CalcError> {
    let mut depth: i32 = 0;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CalcError::invalid(input, "unmatched ')'"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CalcError::invalid(input, "unbalanced parentheses"));
    }
    Ok(())
}

/// Check if the input is just a plain number (no operations).
pub fn is_plain_number(input: &str) -> bool {
    let to_check = input.strip_prefix('-').unwrap_or(input);
    to_check.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && to_check.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_expressions() {
        assert!(check_shape("2 + 3 * 4").is_ok());
        assert!(check_shape("(2 + 3) * 4").is_ok());
        assert!(check_shape("sin(cos(30))").is_ok());
        assert!(check_shape("2*-3").is_ok());
        assert!(check_shape("√(25)×2").is_ok());
    }

    #[test]
    fn test_rejects_empty_parens() {
        let err = check_shape("sin()").unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression { ref text, .. } if text == "()"));
        assert!(check_shape("2 + ( )").is_err());
    }

    #[test]
    fn test_rejects_unbalanced_parens() {
        assert!(check_shape("(2 + 3").is_err());
        assert!(check_shape("2 + 3)").is_err());
        assert!(check_shape(")(").is_err());
    }

    #[test]
    fn test_rejects_trailing_operator() {
        assert!(check_shape("2 +").is_err());
        assert!(check_shape("2 ×").is_err());
        assert!(check_shape("2^").is_err());
    }

    #[test]
    fn test_rejects_doubled_operators() {
        for input in ["2 ++ 3", "2 ** 3", "2 // 3", "2 +- 3", "2 -- 3", "2 + + 3", "2 ÷÷ 3"] {
            assert!(check_shape(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_doubled_operator_glyphs() {
        for input in ["2−−3", "2 − − 3", "2××3", "2+−3", "2−+3", "2×+3", "2÷+3"] {
            assert!(
                matches!(check_shape(input), Err(CalcError::InvalidExpression { .. })),
                "{input} should be rejected"
            );
        }
        assert!(check_shape("2×−3").is_ok());
        assert!(check_shape("2÷−3").is_ok());
    }

    #[test]
    fn test_can_evaluate() {
        assert!(!can_evaluate(""));
        assert!(!can_evaluate("0"));
        assert!(can_evaluate("42"));
        assert!(can_evaluate("-1.5"));
        assert!(can_evaluate("2+2"));
        assert!(!can_evaluate("2+"));
        assert!(!can_evaluate("sqrt("));
    }

    #[test]
    fn test_plain_numbers() {
        assert!(is_plain_number("123"));
        assert!(is_plain_number("-42.5"));
        assert!(!is_plain_number("-"));
        assert!(!is_plain_number("2+2"));
    }
}

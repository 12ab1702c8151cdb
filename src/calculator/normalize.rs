//! Rewrites calculator notation into canonical evaluator text.
//!
//! All rewriting happens on tokens, never on raw text, so a rule cannot
//! re-match the output of an earlier rule and nested calls such as
//! `sin(cos(30))` keep their structure.

use tracing::trace;

use super::detection::check_shape;
use super::error::CalcError;
use super::lexer::{Token, render, tokenize};
use super::parser::{Func, constant_value};
use super::state::AngleMode;

/// Normalize `input` for evaluation in `mode`.
///
/// Passes, in order: shape checks, glyph folding (in the tokenizer), `|x|`
/// expansion, name aliases and allow-list check, implicit multiplication,
/// angle-mode wrapping of trigonometric calls, constant substitution.
pub fn normalize(input: &str, mode: AngleMode) -> Result<String, CalcError> {
    check_shape(input)?;

    let tokens = tokenize(input)?;
    let tokens = expand_abs_bars(tokens)?;
    let tokens = resolve_names(tokens)?;
    let tokens = insert_implicit_multiplication(tokens)?;
    let tokens = apply_angle_mode(tokens, mode);
    let tokens = substitute_constants(tokens);

    let normalized = render(&tokens);
    trace!(input, %normalized, "normalized expression");
    Ok(normalized)
}

/// `|x|` becomes `abs(x)`.
///
/// A bar opens a group unless it directly follows an operand while a group
/// is open, so `||x|-|y||` nests the way it reads.
fn expand_abs_bars(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut out = Vec::with_capacity(tokens.len() + 4);
    let mut open = 0usize;

    for token in tokens {
        if token != Token::Bar {
            out.push(token);
            continue;
        }

        let closes = open > 0 && out.last().is_some_and(Token::ends_operand);
        if closes {
            open -= 1;
            out.push(Token::RParen);
        } else {
            open += 1;
            out.push(Token::Ident("abs".to_string()));
            out.push(Token::LParen);
        }
    }

    if open > 0 {
        return Err(CalcError::invalid("|", "unmatched absolute value bar"));
    }
    Ok(out)
}

/// Map aliases to canonical names and reject names outside the allow-list.
fn resolve_names(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let name = match token {
            Token::Ident(name) => name,
            other => {
                out.push(other);
                continue;
            }
        };

        let name = match name.as_str() {
            "log10" => "log".to_string(),
            "factorial" => "fact".to_string(),
            "radians" => "rad".to_string(),
            "degrees" => "deg".to_string(),
            _ => name,
        };

        if constant_value(&name).is_some() {
            out.push(Token::Ident(name));
            continue;
        }

        if Func::from_name(&name).is_none() {
            return Err(CalcError::invalid(name, "unknown function or constant"));
        }
        if iter.peek() != Some(&Token::LParen) {
            return Err(CalcError::invalid(name, "function name must be followed by '('"));
        }
        out.push(Token::Ident(name));
    }

    Ok(out)
}

fn is_constant(token: &Token) -> bool {
    matches!(token, Token::Ident(name) if constant_value(name).is_some())
}

/// Insert `*` where two operands touch: `2(3)`, `(2)3`, `(2)(3)`, `2pi`,
/// `2sin(30)`, `(1)pi`, `pi(2)`.
///
/// Two bare numbers (`2 3`) are rejected rather than multiplied.
fn insert_implicit_multiplication(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len() * 2);

    for token in tokens {
        if let Some(prev) = out.last() {
            if let (Token::Number(a), Token::Number(b)) = (prev, &token) {
                return Err(CalcError::invalid(
                    format!("{a} {b}"),
                    "missing operator between numbers",
                ));
            }
            let prev_is_value =
                matches!(prev, Token::Number(_) | Token::RParen) || is_constant(prev);
            let next_starts_value =
                matches!(token, Token::LParen | Token::Ident(_) | Token::Number(_));
            if prev_is_value && next_starts_value {
                out.push(Token::Star);
            }
        }
        out.push(token);
    }

    Ok(out)
}

/// In degrees mode, `sin(x)` becomes `sin(rad(x))` and `asin(x)` becomes
/// `deg(asin(x))`. Radians mode leaves calls untouched.
fn apply_angle_mode(tokens: Vec<Token>, mode: AngleMode) -> Vec<Token> {
    if mode == AngleMode::Radians {
        return tokens;
    }

    let mut out = Vec::with_capacity(tokens.len() + 8);
    // One entry per open paren: whether its close needs an extra `)`.
    let mut closers: Vec<bool> = Vec::new();
    let mut wrap_next_paren = false;

    for token in tokens {
        let func = match &token {
            Token::Ident(name) => Func::from_name(name),
            _ => None,
        };
        match func {
            Some(Func::Sin | Func::Cos | Func::Tan) => {
                out.push(token);
                out.push(Token::LParen);
                out.push(Token::Ident(Func::Rad.name().to_string()));
                wrap_next_paren = true;
            }
            Some(Func::Asin | Func::Acos | Func::Atan) => {
                out.push(Token::Ident(Func::Deg.name().to_string()));
                out.push(Token::LParen);
                out.push(token);
                wrap_next_paren = true;
            }
            _ if token == Token::LParen => {
                closers.push(wrap_next_paren);
                wrap_next_paren = false;
                out.push(token);
            }
            _ if token == Token::RParen => {
                out.push(token);
                if closers.pop() == Some(true) {
                    out.push(Token::RParen);
                }
            }
            _ => out.push(token),
        }
    }

    out
}

/// Replace `pi` and `e` with their literal values.
fn substitute_constants(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| {
            let value = match &token {
                Token::Ident(name) => constant_value(name),
                _ => None,
            };
            value.map_or(token, Token::Number)
        })
        .collect()
}

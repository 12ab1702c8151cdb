//! Tokenizer for calculator notation.
//!
//! Display glyphs are folded into their canonical tokens here, so every later
//! stage only sees one spelling per operator or name.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::CalcError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    /// Function or constant name, always lowercase ASCII.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    /// `|`, delimiter of the `|x|` absolute value notation.
    Bar,
}

impl Token {
    /// Tokens that can end an operand: a number, a name, or a closing paren.
    pub fn ends_operand(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Ident(_) | Self::RParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Ident(name) => write!(f, "{name}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Caret => write!(f, "^"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Bar => write!(f, "|"),
        }
    }
}

/// Render tokens back into compact canonical text.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

/// Split `input` into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(start, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => lex_number(input, start, &mut chars)?,
            c if c.is_ascii_alphabetic() => lex_ident(input, start, &mut chars),
            _ => {
                chars.next();
                match ch {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '*' | '×' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    '|' => Token::Bar,
                    '√' => Token::Ident("sqrt".to_string()),
                    'π' => Token::Ident("pi".to_string()),
                    other => {
                        return Err(CalcError::invalid(
                            other.to_string(),
                            "unexpected character",
                        ));
                    }
                }
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn lex_number(
    input: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Token, CalcError> {
    let mut end = start;
    let mut seen_dot = false;

    while let Some(&(idx, c)) = chars.peek() {
        if c.is_ascii_digit() {
            end = idx + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = idx + 1;
        } else {
            break;
        }
        chars.next();
    }

    let text = &input[start..end];
    // A second dot directly after a number ("1.2.3") is never valid.
    if let Some(&(_, '.')) = chars.peek() {
        return Err(CalcError::invalid(
            format!("{text}."),
            "number has more than one decimal point",
        ));
    }

    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| CalcError::invalid(text, "malformed number"))
}

fn lex_ident(input: &str, start: usize, chars: &mut Peekable<CharIndices<'_>>) -> Token {
    let mut end = start;
    while let Some(&(idx, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            end = idx + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    Token::Ident(input[start..end].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let tokens = tokenize("2 + 3.5*(4)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Plus,
                Token::Number(3.5),
                Token::Star,
                Token::LParen,
                Token::Number(4.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_glyphs_fold_to_canonical_tokens() {
        let tokens = tokenize("√(25)×π÷2−1").unwrap();
        assert_eq!(render(&tokens), "sqrt(25)*pi/2-1");
    }

    #[test]
    fn test_identifiers_are_lowercased() {
        let tokens = tokenize("SIN(30) + Log10(100)").unwrap();
        assert_eq!(tokens[0], Token::Ident("sin".to_string()));
        assert_eq!(tokens[5], Token::Ident("log10".to_string()));
    }

    #[test]
    fn test_leading_dot_number() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
    }

    #[test]
    fn test_rejects_unknown_characters() {
        let err = tokenize("2 $ 3").unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression { ref text, .. } if text == "$"));
    }

    #[test]
    fn test_rejects_double_decimal_point() {
        assert!(tokenize("1.2.3").is_err());
        assert!(tokenize(".").is_err());
    }
}

//! Recursive-descent parser over the closed calculator grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | CONST | FUNC '(' expr (',' expr)? ')' | '(' expr ')'
//! ```
//!
//! Only the names in [`Func`] and the constants `pi` and `e` are accepted;
//! everything else is an `InvalidExpression`.

use super::error::CalcError;
use super::lexer::Token;

/// Nesting limit for parentheses, calls and unary chains.
const MAX_DEPTH: usize = 256;

/// Functions the evaluator knows about. Trigonometric functions take and
/// return radians; angle mode is applied by the normalizer via `rad`/`deg`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Ln,
    /// Base 10, or the base given as second argument.
    Log,
    Abs,
    Fact,
    /// Degrees to radians.
    Rad,
    /// Radians to degrees.
    Deg,
    Exp,
    Ceil,
    Floor,
    /// Nearest integer, or the number of decimals given as second argument.
    Round,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sqrt" => Self::Sqrt,
            "ln" => Self::Ln,
            "log" => Self::Log,
            "abs" => Self::Abs,
            "fact" => Self::Fact,
            "rad" => Self::Rad,
            "deg" => Self::Deg,
            "exp" => Self::Exp,
            "ceil" => Self::Ceil,
            "floor" => Self::Floor,
            "round" => Self::Round,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sqrt => "sqrt",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Fact => "fact",
            Self::Rad => "rad",
            Self::Deg => "deg",
            Self::Exp => "exp",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Round => "round",
        }
    }

    /// Whether a second argument is accepted.
    fn takes_optional_arg(self) -> bool {
        matches!(self, Self::Log | Self::Round)
    }
}

/// Named constants accepted in canonical text.
pub fn constant_value(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    /// Left-associative run of `+ -` or `* /`, kept flat so that long sums
    /// and products are evaluated and dropped without recursion.
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    /// Exponentiation; always `Pow`.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

/// Parse a complete token stream into an expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expr, CalcError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::invalid(extra.to_string(), "unexpected token"));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(CalcError::invalid(
                token.to_string(),
                format!("expected '{expected}'"),
            )),
            None => Err(CalcError::invalid(
                "",
                format!("expected '{expected}' before end of input"),
            )),
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::invalid("", "expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let first = self.term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.term()?));
        }
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        self.descend()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Expr::Neg(Box::new(self.unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    /// `-2^2` is `-(2^2)` and `2^3^2` is `2^(3^2)`.
    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        let Some(token) = self.next().cloned() else {
            return Err(CalcError::invalid("", "unexpected end of expression"));
        };

        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Ident(name) => {
                if let Some(value) = constant_value(&name) {
                    return Ok(Expr::Number(value));
                }
                let func = Func::from_name(&name)
                    .ok_or_else(|| CalcError::invalid(name.as_str(), "unknown name"))?;
                self.call(func)
            }
            other => Err(CalcError::invalid(other.to_string(), "unexpected token")),
        }
    }

    fn call(&mut self, func: Func) -> Result<Expr, CalcError> {
        self.expect(&Token::LParen)?;
        self.descend()?;
        let mut args = vec![self.expr()?];
        if self.eat(&Token::Comma) {
            if !func.takes_optional_arg() {
                return Err(CalcError::invalid(
                    func.name(),
                    "function takes exactly one argument",
                ));
            }
            args.push(self.expr()?);
        }
        self.expect(&Token::RParen)?;
        self.depth -= 1;
        Ok(Expr::Call { func, args })
    }
}

fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain {
            first: Box::new(first),
            rest,
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

//! Calculator core.
//!
//! This module provides functionality to:
//! - Check that user input has the shape of an expression
//! - Normalize calculator notation (glyphs, `|x|`, angle mode, constants,
//!   implicit multiplication) into canonical text
//! - Parse and evaluate that text against a closed set of functions
//! - Hold session state (memory register, last result, angle mode)

mod detection;
mod error;
mod evaluation;
mod lexer;
mod normalize;
pub mod ops;
mod parser;
mod state;

pub use detection::{can_evaluate, check_shape, is_plain_number};
pub use error::CalcError;
pub use evaluation::{Evaluation, evaluate_expression, format_display, format_plain};
pub use normalize::normalize;
pub use state::{AngleMode, Calculator};

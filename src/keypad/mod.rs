//! Button-driven calculator front end.
//!
//! Keys are pressed by label (as printed on the button grid) or as [`Key`]
//! values; the [`Keypad`] keeps the display, cursor and pending expression.

mod key;
mod pad;

pub use key::{BUTTON_GRID, FunctionKey, Key, MODE_SELECTOR, Operator};
pub use pad::Keypad;

//! Scientific calculator library.
//!
//! - [`calculator`]: expression normalization, evaluation and session state
//! - [`menu`]: numbered text menu over the operations
//! - [`keypad`]: button-driven front end without rendering
//! - [`config`]: user configuration

pub mod calculator;
pub mod config;
pub mod keypad;
pub mod menu;

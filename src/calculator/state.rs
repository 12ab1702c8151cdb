//! Session state: angle mode, memory register and last result.

use serde::Deserialize;
use tracing::debug;

use super::error::CalcError;
use super::evaluation::{Evaluation, evaluate_expression};

/// Unit used for trigonometric arguments and inverse trigonometric results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// Convert an angle given in this mode's unit to radians.
    pub fn angle_to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    /// Convert an angle in radians to this mode's unit.
    pub fn radians_to_angle(self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians.to_degrees(),
            Self::Radians => radians,
        }
    }

    /// Suffix used when printing angles.
    pub fn unit_suffix(self) -> &'static str {
        match self {
            Self::Degrees => "°",
            Self::Radians => " rad",
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Degrees => write!(f, "degrees"),
            Self::Radians => write!(f, "radians"),
        }
    }
}

/// Calculator session state.
///
/// Only successful computations touch `last_result`; a failed evaluation
/// leaves the state exactly as it was.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    memory: f64,
    last_result: f64,
    angle_mode: AngleMode,
}

impl Calculator {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            angle_mode,
            ..Self::default()
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        debug!(%mode, "angle mode changed");
        self.angle_mode = mode;
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn last_result(&self) -> f64 {
        self.last_result
    }

    pub fn store_memory(&mut self, value: f64) {
        debug!(value, "memory store");
        self.memory = value;
    }

    pub fn recall_memory(&self) -> f64 {
        self.memory
    }

    pub fn clear_memory(&mut self) {
        debug!("memory clear");
        self.memory = 0.0;
    }

    /// Record a computed value as the last result.
    pub fn record(&mut self, value: f64) -> f64 {
        self.last_result = value;
        value
    }

    /// Evaluate `input` in the current angle mode and record the result.
    pub fn evaluate(&mut self, input: &str) -> Result<Evaluation, CalcError> {
        let evaluation = evaluate_expression(input, self.angle_mode)?;
        self.record(evaluation.value);
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_register() {
        let mut calc = Calculator::default();
        assert_eq!(calc.recall_memory(), 0.0);
        calc.store_memory(42.5);
        assert_eq!(calc.recall_memory(), 42.5);
        calc.clear_memory();
        assert_eq!(calc.memory(), 0.0);
    }

    #[test]
    fn test_evaluate_records_last_result() {
        let mut calc = Calculator::new(AngleMode::Degrees);
        let evaluation = calc.evaluate("2 + 3 * 4").unwrap();
        assert_eq!(evaluation.value, 14.0);
        assert_eq!(calc.last_result(), 14.0);
    }

    #[test]
    fn test_failed_evaluation_keeps_state() {
        let mut calc = Calculator::new(AngleMode::Degrees);
        calc.evaluate("6 * 7").unwrap();
        calc.store_memory(3.0);
        assert_eq!(calc.evaluate("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(calc.last_result(), 42.0);
        assert_eq!(calc.memory(), 3.0);
    }

    #[test]
    fn test_angle_mode_conversions() {
        assert_eq!(AngleMode::Radians.angle_to_radians(1.5), 1.5);
        let rad = AngleMode::Degrees.angle_to_radians(180.0);
        assert!((rad - std::f64::consts::PI).abs() < 1e-12);
        let deg = AngleMode::Degrees.radians_to_angle(std::f64::consts::PI);
        assert!((deg - 180.0).abs() < 1e-12);
        assert_eq!(AngleMode::default(), AngleMode::Degrees);
    }
}

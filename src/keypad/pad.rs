//! Keypad state machine.

use tracing::{debug, warn};

use super::key::{FunctionKey, Key, Operator};
use crate::calculator::{
    AngleMode, CalcError, Calculator, can_evaluate, evaluate_expression, format_plain,
    is_plain_number, ops,
};
use crate::config::Config;

const IDLE: &str = "0";

/// Text for a value put back into the entry. Uses the shortest exact
/// representation so chained operations continue from the stored value.
fn entry_text(value: f64) -> String {
    if value == 0.0 {
        IDLE.to_string()
    } else {
        value.to_string()
    }
}

/// Button-driven calculator front end without any rendering.
///
/// The display holds the entry being edited; operator keys move it into the
/// pending expression. A shown result is replaced by the next entry.
#[derive(Clone, Debug)]
pub struct Keypad {
    calc: Calculator,
    config: Config,
    display: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
    pending: String,
    preview: String,
    showing_result: bool,
}

impl Keypad {
    pub fn new(calc: Calculator, config: Config) -> Self {
        Self {
            calc,
            config,
            display: IDLE.to_string(),
            cursor: 1,
            pending: String::new(),
            preview: String::new(),
            showing_result: false,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Operator chain entered so far, e.g. `12+`.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Secondary line: live result of the current input, or the expression
    /// a shown result came from.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn is_showing_result(&self) -> bool {
        self.showing_result
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.calc.angle_mode()
    }

    /// Switch the angle mode and re-evaluate the live preview.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.calc.set_angle_mode(mode);
        if !self.showing_result {
            self.refresh_preview();
        }
    }

    /// Press the button with the given label.
    pub fn press_label(&mut self, label: &str) -> Result<(), CalcError> {
        let key = Key::from_label(label)
            .ok_or_else(|| CalcError::invalid(label, "unknown key"))?;
        self.press(key)
    }

    /// Press a key. On error the entry is reset to `0`; memory and last
    /// result are left untouched.
    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        debug!(?key, "key pressed");
        let result = self.dispatch(key);
        if let Err(err) = &result {
            warn!(%err, "keypad error");
            self.clear_all();
        }
        result
    }

    fn dispatch(&mut self, key: Key) -> Result<(), CalcError> {
        match key {
            Key::Digit(d) => self.insert_text(&d.to_string()),
            Key::Point => self.insert_text("."),
            Key::OpenParen => self.insert_text("("),
            Key::CloseParen => self.insert_text(")"),
            Key::Operator(op) => self.handle_operator(op),
            Key::Function(func) => self.insert_function(func),
            Key::Equals => return self.calculate_result(),
            Key::Clear => self.clear_all(),
            Key::ClearEntry => self.clear_entry(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Square => {
                return self.apply_immediate(|v| ops::power(v, 2.0), |v, r| format!("({v})² = {r}"));
            }
            Key::Factorial => {
                return self.apply_immediate(ops::factorial, |v, r| format!("{v}! = {r}"));
            }
            Key::Abs => {
                return self.apply_immediate(|v| Ok(ops::absolute(v)), |v, r| format!("|{v}| = {r}"));
            }
            Key::Pi => self.set_constant(std::f64::consts::PI),
            Key::E => self.set_constant(std::f64::consts::E),
            Key::MemoryClear => self.calc.clear_memory(),
            Key::MemoryRecall => {
                let value = self.calc.recall_memory();
                self.clear_all();
                self.set_display(entry_text(value));
            }
            Key::MemoryStore => self.memory_store(),
            Key::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            Key::CursorRight => self.cursor = (self.cursor + 1).min(self.display_len()),
            Key::AngleMode(mode) => self.set_angle_mode(mode),
        }
        Ok(())
    }

    fn display_len(&self) -> usize {
        self.display.chars().count()
    }

    /// Byte offset of the character position `pos` in the display.
    fn byte_offset(&self, pos: usize) -> usize {
        self.display
            .char_indices()
            .nth(pos)
            .map_or(self.display.len(), |(idx, _)| idx)
    }

    fn set_display(&mut self, text: String) {
        self.display = text;
        self.cursor = self.display_len();
        self.refresh_preview();
    }

    fn start_new_entry_if_showing_result(&mut self) {
        if self.showing_result {
            self.clear_all();
        }
    }

    /// Insert at the cursor; an idle `0` is replaced unless a point follows it.
    fn insert_text(&mut self, text: &str) {
        self.start_new_entry_if_showing_result();

        if self.display == IDLE && text != "." {
            self.set_display(text.to_string());
            return;
        }

        let at = self.byte_offset(self.cursor);
        self.display.insert_str(at, text);
        self.cursor += text.chars().count();
        self.refresh_preview();
    }

    /// Insert `name()` and leave the cursor between the parentheses.
    fn insert_function(&mut self, func: FunctionKey) {
        self.start_new_entry_if_showing_result();

        let name = func.call_name();
        let call = format!("{name}()");
        let inside = name.chars().count() + 1;

        if self.display == IDLE {
            self.display = call;
            self.cursor = inside;
        } else {
            let at = self.byte_offset(self.cursor);
            self.display.insert_str(at, &call);
            self.cursor += inside;
        }
        self.refresh_preview();
    }

    fn handle_operator(&mut self, op: Operator) {
        if self.showing_result {
            self.showing_result = false;
        }

        if self.display == IDLE {
            // Pressing a second operator replaces the one just entered.
            let ends_with_operator = self
                .pending
                .chars()
                .last()
                .is_some_and(|c| "+-*/^".contains(c));
            if ends_with_operator {
                self.pending.pop();
                self.pending.push(op.symbol());
            }
            return;
        }

        self.pending.push_str(&self.display);
        self.pending.push(op.symbol());
        self.display = IDLE.to_string();
        self.cursor = 1;
        self.preview.clear();
    }

    fn current_expression(&self) -> String {
        format!("{}{}", self.pending, self.display)
    }

    fn calculate_result(&mut self) -> Result<(), CalcError> {
        if self.pending.is_empty() && (self.display == IDLE || self.display.is_empty()) {
            return Ok(());
        }

        let expression = self.current_expression();
        let evaluation = self.calc.evaluate(&expression)?;

        self.pending.clear();
        self.display = entry_text(evaluation.value);
        self.cursor = self.display_len();
        self.preview = format!("{expression} =");
        self.showing_result = true;
        Ok(())
    }

    /// Value the immediate keys act on: the last result while one is shown,
    /// otherwise the evaluated entry. `None` when there is nothing to act on.
    fn current_value(&self) -> Result<Option<f64>, CalcError> {
        if self.showing_result {
            return Ok(Some(self.calc.last_result()));
        }
        if self.display == IDLE || self.display.is_empty() {
            return Ok(None);
        }
        evaluate_expression(&self.display, self.calc.angle_mode()).map(|e| Some(e.value))
    }

    fn apply_immediate(
        &mut self,
        op: impl FnOnce(f64) -> Result<f64, CalcError>,
        describe: impl FnOnce(&str, &str) -> String,
    ) -> Result<(), CalcError> {
        let Some(value) = self.current_value()? else {
            return Ok(());
        };
        let result = self.calc.record(op(value)?);

        self.clear_all();
        self.display = entry_text(result);
        self.cursor = self.display_len();
        self.preview = describe(&format_plain(value), &self.config.format_value(result));
        self.showing_result = true;
        Ok(())
    }

    fn set_constant(&mut self, value: f64) {
        self.start_new_entry_if_showing_result();
        self.set_display(value.to_string());
    }

    fn memory_store(&mut self) {
        if self.showing_result {
            self.calc.store_memory(self.calc.last_result());
        } else if is_plain_number(&self.display) {
            if let Ok(value) = self.display.parse::<f64>() {
                self.calc.store_memory(value);
            }
        }
    }

    fn clear_all(&mut self) {
        self.display = IDLE.to_string();
        self.cursor = 1;
        self.pending.clear();
        self.preview.clear();
        self.showing_result = false;
    }

    fn clear_entry(&mut self) {
        if self.showing_result {
            self.clear_all();
            return;
        }
        self.display = IDLE.to_string();
        self.cursor = 1;
        self.preview.clear();
    }

    fn remove_char_at(&mut self, pos: usize) {
        let at = self.byte_offset(pos);
        self.display.remove(at);
        if self.display.is_empty() {
            self.display = IDLE.to_string();
            self.cursor = 1;
        }
    }

    fn backspace(&mut self) {
        if self.showing_result {
            self.clear_all();
            return;
        }
        if self.cursor > 0 && self.cursor <= self.display_len() {
            self.cursor -= 1;
            self.remove_char_at(self.cursor);
        }
        self.refresh_preview();
    }

    fn delete_forward(&mut self) {
        if self.showing_result {
            self.clear_all();
            return;
        }
        if self.cursor < self.display_len() {
            self.remove_char_at(self.cursor);
        }
        self.refresh_preview();
    }

    fn toggle_sign(&mut self) {
        if self.showing_result {
            let value = -self.calc.last_result();
            self.clear_all();
            self.set_display(entry_text(value));
            return;
        }
        if self.display == IDLE {
            return;
        }

        let toggled = if let Some(rest) = self.display.strip_prefix('-') {
            rest.to_string()
        } else if is_plain_number(&self.display) {
            format!("-{}", self.display)
        } else {
            format!("-({})", self.display)
        };
        self.set_display(toggled);
    }

    fn refresh_preview(&mut self) {
        self.preview.clear();
        let current = self.current_expression();
        if !can_evaluate(&current) {
            return;
        }
        if let Ok(evaluation) = evaluate_expression(&current, self.calc.angle_mode()) {
            self.preview = format!("= {}", self.config.format_value(evaluation.value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypad() -> Keypad {
        Keypad::new(Calculator::new(AngleMode::Degrees), Config::default())
    }

    fn press_all(pad: &mut Keypad, labels: &[&str]) {
        for label in labels {
            pad.press_label(label).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let pad = keypad();
        assert_eq!(pad.display(), "0");
        assert_eq!(pad.cursor(), 1);
        assert_eq!(pad.preview(), "");
        assert!(!pad.is_showing_result());
    }

    #[test]
    fn test_digits_replace_idle_zero() {
        let mut pad = keypad();
        press_all(&mut pad, &["1", "2"]);
        assert_eq!(pad.display(), "12");
        assert_eq!(pad.preview(), "= 12");

        let mut pad = keypad();
        press_all(&mut pad, &[".", "5"]);
        assert_eq!(pad.display(), "0.5");
    }

    #[test]
    fn test_operator_chain() {
        let mut pad = keypad();
        press_all(&mut pad, &["1", "2", "+", "3", "×", "2"]);
        assert_eq!(pad.pending(), "12+3*");
        assert_eq!(pad.display(), "2");
        assert_eq!(pad.preview(), "= 18");
        pad.press(Key::Equals).unwrap();
        assert_eq!(pad.display(), "18");
        assert_eq!(pad.preview(), "12+3*2 =");
        assert!(pad.is_showing_result());
        assert_eq!(pad.calculator().last_result(), 18.0);
    }

    #[test]
    fn test_second_operator_replaces_first() {
        let mut pad = keypad();
        press_all(&mut pad, &["5", "+", "-", "2", "="]);
        assert_eq!(pad.display(), "3");
    }

    #[test]
    fn test_result_continues_chain() {
        let mut pad = keypad();
        press_all(&mut pad, &["2", "+", "3", "=", "×", "4", "="]);
        assert_eq!(pad.display(), "20");
    }

    #[test]
    fn test_digit_after_result_starts_over() {
        let mut pad = keypad();
        press_all(&mut pad, &["2", "+", "3", "=", "7"]);
        assert_eq!(pad.display(), "7");
        assert_eq!(pad.pending(), "");
    }

    #[test]
    fn test_function_insertion_places_cursor_inside() {
        let mut pad = keypad();
        press_all(&mut pad, &["sin"]);
        assert_eq!(pad.display(), "sin()");
        assert_eq!(pad.cursor(), 4);
        press_all(&mut pad, &["3", "0"]);
        assert_eq!(pad.display(), "sin(30)");
        assert_eq!(pad.preview(), "= 0.5");
        pad.press(Key::Equals).unwrap();
        let shown: f64 = pad.display().parse().unwrap();
        assert!((shown - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sqrt_glyph_and_nested_functions() {
        let mut pad = keypad();
        press_all(&mut pad, &["√", "2", "5", "="]);
        assert_eq!(pad.display(), "5");

        let mut pad = keypad();
        press_all(&mut pad, &["sin", "cos", "0", "→", "="]);
        // sin(cos(0)) in degrees is sin(1°).
        let shown: f64 = pad.display().parse().unwrap();
        assert!((shown - 1f64.to_radians().sin()).abs() < 1e-15);
    }

    #[test]
    fn test_error_resets_entry_but_keeps_memory() {
        let mut pad = keypad();
        press_all(&mut pad, &["9", "MS", "C", "1", "÷", "0"]);
        assert_eq!(pad.press(Key::Equals), Err(CalcError::DivisionByZero));
        assert_eq!(pad.display(), "0");
        assert_eq!(pad.pending(), "");
        assert_eq!(pad.calculator().memory(), 9.0);
    }

    #[test]
    fn test_immediate_functions() {
        let mut pad = keypad();
        press_all(&mut pad, &["5", "x²"]);
        assert_eq!(pad.display(), "25");
        assert_eq!(pad.preview(), "(5)² = 25");

        let mut pad = keypad();
        press_all(&mut pad, &["5", "!"]);
        assert_eq!(pad.display(), "120");
        assert_eq!(pad.preview(), "5! = 120");

        let mut pad = keypad();
        press_all(&mut pad, &["7", "±", "|x|"]);
        assert_eq!(pad.display(), "7");
    }

    #[test]
    fn test_factorial_limits() {
        let mut pad = keypad();
        press_all(&mut pad, &["1", "7", "1"]);
        assert!(matches!(
            pad.press(Key::Factorial),
            Err(CalcError::Overflow(_))
        ));
        assert_eq!(pad.display(), "0");
    }

    #[test]
    fn test_backspace_and_delete_at_cursor() {
        let mut pad = keypad();
        press_all(&mut pad, &["1", "2", "3", "←", "⌫"]);
        assert_eq!(pad.display(), "13");
        assert_eq!(pad.cursor(), 1);
        pad.press(Key::Delete).unwrap();
        assert_eq!(pad.display(), "1");
        pad.press(Key::Backspace).unwrap();
        assert_eq!(pad.display(), "0");
        assert_eq!(pad.cursor(), 1);
    }

    #[test]
    fn test_multibyte_glyph_editing() {
        let mut pad = keypad();
        press_all(&mut pad, &["√", "9", "⌫", "4"]);
        assert_eq!(pad.display(), "√(4)");
        assert_eq!(pad.preview(), "= 2");
    }

    #[test]
    fn test_clear_entry_keeps_pending() {
        let mut pad = keypad();
        press_all(&mut pad, &["8", "+", "5", "CE"]);
        assert_eq!(pad.display(), "0");
        assert_eq!(pad.pending(), "8+");
        press_all(&mut pad, &["2", "="]);
        assert_eq!(pad.display(), "10");
    }

    #[test]
    fn test_toggle_sign() {
        let mut pad = keypad();
        press_all(&mut pad, &["4", "±"]);
        assert_eq!(pad.display(), "-4");
        pad.press(Key::ToggleSign).unwrap();
        assert_eq!(pad.display(), "4");
        press_all(&mut pad, &["=", "±"]);
        assert_eq!(pad.display(), "-4");
    }

    #[test]
    fn test_constants_and_memory() {
        let mut pad = keypad();
        pad.press(Key::Pi).unwrap();
        assert_eq!(pad.display(), std::f64::consts::PI.to_string());
        press_all(&mut pad, &["=", "MS", "C", "MR"]);
        assert_eq!(pad.display(), std::f64::consts::PI.to_string());
        press_all(&mut pad, &["MC", "MR"]);
        assert_eq!(pad.display(), "0");
    }

    #[test]
    fn test_unknown_label() {
        let mut pad = keypad();
        assert!(matches!(
            pad.press_label("cosh"),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_incomplete_input_has_no_preview() {
        let mut pad = keypad();
        press_all(&mut pad, &["(", "2", "+"]);
        assert_eq!(pad.preview(), "");
    }

    #[test]
    fn test_chaining_keeps_full_precision() {
        let mut pad = keypad();
        press_all(&mut pad, &["1", "÷", "3", "="]);
        assert_eq!(pad.display(), (1.0f64 / 3.0).to_string());
        press_all(&mut pad, &["×", "3", "="]);
        assert_eq!(pad.display(), "1");
    }

    #[test]
    fn test_angle_mode_switch_refreshes_preview() {
        let mut pad = keypad();
        press_all(&mut pad, &["sin", "9", "0"]);
        assert_eq!(pad.preview(), "= 1");

        pad.press_label("Rad").unwrap();
        assert_eq!(pad.angle_mode(), AngleMode::Radians);
        assert_eq!(pad.calculator().angle_mode(), AngleMode::Radians);
        assert_eq!(pad.preview(), format!("= {}", Config::default().format_value(90f64.sin())));

        pad.set_angle_mode(AngleMode::Degrees);
        assert_eq!(pad.preview(), "= 1");
        pad.press(Key::Equals).unwrap();
        assert_eq!(pad.display(), "1");
    }
}

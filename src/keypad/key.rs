//! Keypad buttons and their labels.

use crate::calculator::AngleMode;

/// Functions inserted as `name()` with the cursor between the parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKey {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log,
    Ln,
    Sqrt,
}

impl FunctionKey {
    /// Text inserted before the parentheses.
    pub fn call_name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sqrt => "√",
        }
    }
}

/// Binary operators that move the entry into the pending expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Canonical symbol appended to the pending expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Power => '^',
        }
    }
}

/// A button on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    OpenParen,
    CloseParen,
    Operator(Operator),
    Function(FunctionKey),
    Equals,
    Clear,
    ClearEntry,
    Backspace,
    Delete,
    ToggleSign,
    Square,
    Factorial,
    Abs,
    Pi,
    E,
    MemoryClear,
    MemoryRecall,
    MemoryStore,
    CursorLeft,
    CursorRight,
    /// Degrees/radians selector next to the grid.
    AngleMode(AngleMode),
}

/// Button labels in grid order, five per row.
pub const BUTTON_GRID: [[&str; 5]; 8] = [
    ["sin", "cos", "tan", "log", "ln"],
    ["asin", "acos", "atan", "√", "x²"],
    ["MC", "MR", "MS", "(", ")"],
    ["C", "CE", "⌫", "÷", "x^y"],
    ["7", "8", "9", "×", "!"],
    ["4", "5", "6", "-", "|x|"],
    ["1", "2", "3", "+", "π"],
    ["±", "0", ".", "=", "e"],
];

/// Labels of the angle mode selector.
pub const MODE_SELECTOR: [&str; 2] = ["Deg", "Rad"];

impl Key {
    /// Map a button label (or its keyboard spelling) to a key.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = match label {
            "." => Self::Point,
            "(" => Self::OpenParen,
            ")" => Self::CloseParen,
            "+" => Self::Operator(Operator::Add),
            "-" | "−" => Self::Operator(Operator::Subtract),
            "×" | "*" => Self::Operator(Operator::Multiply),
            "÷" | "/" => Self::Operator(Operator::Divide),
            "x^y" | "^" => Self::Operator(Operator::Power),
            "sin" => Self::Function(FunctionKey::Sin),
            "cos" => Self::Function(FunctionKey::Cos),
            "tan" => Self::Function(FunctionKey::Tan),
            "asin" => Self::Function(FunctionKey::Asin),
            "acos" => Self::Function(FunctionKey::Acos),
            "atan" => Self::Function(FunctionKey::Atan),
            "log" => Self::Function(FunctionKey::Log),
            "ln" => Self::Function(FunctionKey::Ln),
            "√" | "sqrt" => Self::Function(FunctionKey::Sqrt),
            "=" => Self::Equals,
            "C" => Self::Clear,
            "CE" => Self::ClearEntry,
            "⌫" | "BackSpace" => Self::Backspace,
            "Del" | "Delete" => Self::Delete,
            "±" => Self::ToggleSign,
            "x²" => Self::Square,
            "!" => Self::Factorial,
            "|x|" => Self::Abs,
            "π" | "pi" => Self::Pi,
            "e" => Self::E,
            "MC" => Self::MemoryClear,
            "MR" => Self::MemoryRecall,
            "MS" => Self::MemoryStore,
            "←" | "Left" => Self::CursorLeft,
            "→" | "Right" => Self::CursorRight,
            "Deg" | "Degrees" => Self::AngleMode(AngleMode::Degrees),
            "Rad" | "Radians" => Self::AngleMode(AngleMode::Radians),
            digit => {
                let mut chars = digit.chars();
                match (chars.next(), chars.next()) {
                    (Some(c @ '0'..='9'), None) => Self::Digit(c as u8 - b'0'),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_grid_label_maps_to_a_key() {
        for label in BUTTON_GRID.iter().flatten() {
            assert!(Key::from_label(label).is_some(), "unmapped label {label}");
        }
    }

    #[test]
    fn test_mode_selector_labels() {
        assert_eq!(
            MODE_SELECTOR.map(Key::from_label),
            [
                Some(Key::AngleMode(AngleMode::Degrees)),
                Some(Key::AngleMode(AngleMode::Radians)),
            ]
        );
    }

    #[test]
    fn test_digits() {
        assert_eq!(Key::from_label("0"), Some(Key::Digit(0)));
        assert_eq!(Key::from_label("9"), Some(Key::Digit(9)));
        assert_eq!(Key::from_label("10"), None);
        assert_eq!(Key::from_label("x"), None);
    }

    #[test]
    fn test_keyboard_aliases() {
        assert_eq!(
            Key::from_label("*"),
            Some(Key::Operator(Operator::Multiply))
        );
        assert_eq!(Key::from_label("^"), Key::from_label("x^y"));
        assert_eq!(Key::from_label("sqrt"), Key::from_label("√"));
    }
}

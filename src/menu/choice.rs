//! Menu entries and their numbering.

use std::str::FromStr;

/// A numbered entry of the interactive menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    SquareRoot,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    NaturalLog,
    Log10,
    LogBase,
    Factorial,
    Absolute,
    Ceiling,
    Floor,
    Round,
    DegreesToRadians,
    RadiansToDegrees,
    MemoryStore,
    MemoryRecall,
    MemoryClear,
    Expression,
}

/// Menu sections in display order: heading and the entries listed under it.
pub const SECTIONS: &[(&str, &[MenuChoice])] = &[
    (
        "Basic Operations",
        &[
            MenuChoice::Add,
            MenuChoice::Subtract,
            MenuChoice::Multiply,
            MenuChoice::Divide,
            MenuChoice::Power,
            MenuChoice::SquareRoot,
        ],
    ),
    (
        "Trigonometric Functions",
        &[
            MenuChoice::Sin,
            MenuChoice::Cos,
            MenuChoice::Tan,
            MenuChoice::Asin,
            MenuChoice::Acos,
            MenuChoice::Atan,
        ],
    ),
    (
        "Logarithmic Functions",
        &[
            MenuChoice::NaturalLog,
            MenuChoice::Log10,
            MenuChoice::LogBase,
        ],
    ),
    (
        "Other Functions",
        &[
            MenuChoice::Factorial,
            MenuChoice::Absolute,
            MenuChoice::Ceiling,
            MenuChoice::Floor,
            MenuChoice::Round,
            MenuChoice::DegreesToRadians,
            MenuChoice::RadiansToDegrees,
        ],
    ),
    (
        "Memory Functions",
        &[
            MenuChoice::MemoryStore,
            MenuChoice::MemoryRecall,
            MenuChoice::MemoryClear,
        ],
    ),
];

impl MenuChoice {
    /// Highest menu number.
    pub const MAX: u8 = 26;

    pub fn from_number(number: u8) -> Option<Self> {
        Some(match number {
            0 => Self::Exit,
            1 => Self::Add,
            2 => Self::Subtract,
            3 => Self::Multiply,
            4 => Self::Divide,
            5 => Self::Power,
            6 => Self::SquareRoot,
            7 => Self::Sin,
            8 => Self::Cos,
            9 => Self::Tan,
            10 => Self::Asin,
            11 => Self::Acos,
            12 => Self::Atan,
            13 => Self::NaturalLog,
            14 => Self::Log10,
            15 => Self::LogBase,
            16 => Self::Factorial,
            17 => Self::Absolute,
            18 => Self::Ceiling,
            19 => Self::Floor,
            20 => Self::Round,
            21 => Self::DegreesToRadians,
            22 => Self::RadiansToDegrees,
            23 => Self::MemoryStore,
            24 => Self::MemoryRecall,
            25 => Self::MemoryClear,
            26 => Self::Expression,
            _ => return None,
        })
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::Add => 1,
            Self::Subtract => 2,
            Self::Multiply => 3,
            Self::Divide => 4,
            Self::Power => 5,
            Self::SquareRoot => 6,
            Self::Sin => 7,
            Self::Cos => 8,
            Self::Tan => 9,
            Self::Asin => 10,
            Self::Acos => 11,
            Self::Atan => 12,
            Self::NaturalLog => 13,
            Self::Log10 => 14,
            Self::LogBase => 15,
            Self::Factorial => 16,
            Self::Absolute => 17,
            Self::Ceiling => 18,
            Self::Floor => 19,
            Self::Round => 20,
            Self::DegreesToRadians => 21,
            Self::RadiansToDegrees => 22,
            Self::MemoryStore => 23,
            Self::MemoryRecall => 24,
            Self::MemoryClear => 25,
            Self::Expression => 26,
        }
    }

    /// Text shown in the menu listing.
    pub fn label(self) -> &'static str {
        match self {
            Self::Exit => "Exit",
            Self::Add => "Addition (+)",
            Self::Subtract => "Subtraction (-)",
            Self::Multiply => "Multiplication (*)",
            Self::Divide => "Division (/)",
            Self::Power => "Power (^)",
            Self::SquareRoot => "Square Root (sqrt)",
            Self::Sin => "Sine (sin)",
            Self::Cos => "Cosine (cos)",
            Self::Tan => "Tangent (tan)",
            Self::Asin => "Arc Sine (asin)",
            Self::Acos => "Arc Cosine (acos)",
            Self::Atan => "Arc Tangent (atan)",
            Self::NaturalLog => "Natural Log (ln)",
            Self::Log10 => "Base-10 Log (log10)",
            Self::LogBase => "Custom Base Log (log)",
            Self::Factorial => "Factorial (!)",
            Self::Absolute => "Absolute Value (abs)",
            Self::Ceiling => "Ceiling (ceil)",
            Self::Floor => "Floor (floor)",
            Self::Round => "Round (round)",
            Self::DegreesToRadians => "Degrees to Radians",
            Self::RadiansToDegrees => "Radians to Degrees",
            Self::MemoryStore => "Store in Memory (MS)",
            Self::MemoryRecall => "Recall Memory (MR)",
            Self::MemoryClear => "Clear Memory (MC)",
            Self::Expression => "Expression Calculator",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_round_trips() {
        for number in 0..=MenuChoice::MAX {
            let choice = MenuChoice::from_number(number).unwrap();
            assert_eq!(choice.number(), number);
        }
        assert_eq!(MenuChoice::from_number(MenuChoice::MAX + 1), None);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(" 7 ".parse(), Ok(MenuChoice::Sin));
        assert_eq!("0".parse(), Ok(MenuChoice::Exit));
        assert_eq!("27".parse::<MenuChoice>(), Err(()));
        assert_eq!("sin".parse::<MenuChoice>(), Err(()));
        assert_eq!("-1".parse::<MenuChoice>(), Err(()));
    }

    #[test]
    fn test_sections_cover_every_operation_once() {
        let mut numbers: Vec<u8> = SECTIONS
            .iter()
            .flat_map(|(_, choices)| choices.iter().map(|c| c.number()))
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=25).collect::<Vec<u8>>());
    }
}

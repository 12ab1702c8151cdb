//! Interactive menu loop over any line reader and writer.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{debug, warn};

use super::choice::{MenuChoice, SECTIONS};
use crate::calculator::{AngleMode, CalcError, Calculator, format_plain, ops};
use crate::config::Config;

const RULE_WIDTH: usize = 60;

/// Whether the loop keeps going after a step.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

/// Read `Some(value)` or stop the loop at end of input.
macro_rules! read_or_exit {
    ($read:expr) => {
        match $read? {
            Some(value) => value,
            None => return Ok(Step::Exit),
        }
    };
}

/// The numbered-menu front end.
struct MenuSession<'a, R, W> {
    calc: &'a mut Calculator,
    config: &'a Config,
    input: R,
    output: W,
}

/// Run the menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    calc: &mut Calculator,
    config: &Config,
    input: R,
    output: W,
) -> Result<()> {
    MenuSession {
        calc,
        config,
        input,
        output,
    }
    .run()
}

impl<R: BufRead, W: Write> MenuSession<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Advanced Calculator!")?;
        writeln!(
            self.output,
            "This calculator supports basic arithmetic and advanced mathematical functions."
        )?;
        writeln!(self.output, "Angle mode: {}", self.calc.angle_mode())?;

        loop {
            self.print_menu()?;
            let prompt = format!("\nEnter your choice (0-{}): ", MenuChoice::MAX);
            let Some(line) = self.read_line(&prompt)? else {
                writeln!(self.output, "\n\nExiting calculator...")?;
                return Ok(());
            };

            let Ok(choice) = line.parse::<MenuChoice>() else {
                writeln!(
                    self.output,
                    "Invalid choice. Please enter a number between 0 and {}.",
                    MenuChoice::MAX
                )?;
                continue;
            };

            debug!(?choice, "menu choice");
            if self.dispatch(choice)? == Step::Exit {
                if choice != MenuChoice::Exit {
                    writeln!(self.output, "\n\nExiting calculator...")?;
                }
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "         ADVANCED CALCULATOR")?;
        writeln!(self.output, "{rule}")?;
        for (index, (heading, choices)) in SECTIONS.iter().enumerate() {
            if index > 0 {
                writeln!(self.output)?;
            }
            writeln!(self.output, "{heading}:")?;
            for choice in *choices {
                writeln!(self.output, " {:>2}. {}", choice.number(), choice.label())?;
            }
        }
        writeln!(
            self.output,
            "\n {:>2}. {}",
            MenuChoice::Expression.number(),
            MenuChoice::Expression.label()
        )?;
        writeln!(
            self.output,
            " {:>2}. {}",
            MenuChoice::Exit.number(),
            MenuChoice::Exit.label()
        )?;
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    /// Prompt and read one line; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the user enters a finite number.
    fn read_number(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Some(value)),
                _ => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Prompt until the user enters an integer.
    fn read_integer(&mut self, prompt: &str) -> Result<Option<i64>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Please enter a valid integer.")?,
            }
        }
    }

    fn show(&self, value: f64) -> String {
        self.config.format_value(value)
    }

    fn angle_prompt(&self) -> String {
        match self.calc.angle_mode() {
            AngleMode::Degrees => "Enter angle in degrees: ".to_string(),
            AngleMode::Radians => "Enter angle in radians: ".to_string(),
        }
    }

    /// Read two operands and apply a binary operation.
    fn binary(
        &mut self,
        prompts: (&str, &str),
        symbol: &str,
        op: impl FnOnce(f64, f64) -> Result<f64, CalcError>,
    ) -> Result<Option<Result<String, CalcError>>> {
        let Some(a) = self.read_number(prompts.0)? else {
            return Ok(None);
        };
        let Some(b) = self.read_number(prompts.1)? else {
            return Ok(None);
        };
        let outcome = op(a, b).map(|result| self.calc.record(result));
        Ok(Some(outcome.map(|result| {
            format!(
                "{} {symbol} {} = {}",
                format_plain(a),
                format_plain(b),
                self.show(result)
            )
        })))
    }

    /// Read one operand and apply a unary operation; `render` builds the
    /// output line from the operand and the formatted result.
    fn unary(
        &mut self,
        prompt: &str,
        op: impl FnOnce(f64) -> Result<f64, CalcError>,
        render: impl FnOnce(&str, &str) -> String,
    ) -> Result<Option<Result<String, CalcError>>> {
        let Some(a) = self.read_number(prompt)? else {
            return Ok(None);
        };
        let outcome = op(a).map(|result| self.calc.record(result));
        Ok(Some(
            outcome.map(|result| render(&format_plain(a), &self.show(result))),
        ))
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Step> {
        let mode = self.calc.angle_mode();
        let unit = mode.unit_suffix();

        let outcome = match choice {
            MenuChoice::Exit => {
                writeln!(self.output, "Thank you for using the Advanced Calculator!")?;
                return Ok(Step::Exit);
            }
            MenuChoice::Add => read_or_exit!(self.binary(
                ("Enter first number: ", "Enter second number: "),
                "+",
                ops::add,
            )),
            MenuChoice::Subtract => read_or_exit!(self.binary(
                ("Enter first number: ", "Enter second number: "),
                "-",
                ops::subtract,
            )),
            MenuChoice::Multiply => read_or_exit!(self.binary(
                ("Enter first number: ", "Enter second number: "),
                "*",
                ops::multiply,
            )),
            MenuChoice::Divide => read_or_exit!(self.binary(
                ("Enter dividend: ", "Enter divisor: "),
                "/",
                ops::divide,
            )),
            MenuChoice::Power => read_or_exit!(self.binary(
                ("Enter base: ", "Enter exponent: "),
                "^",
                ops::power,
            )),
            MenuChoice::SquareRoot => read_or_exit!(self.unary(
                "Enter number: ",
                ops::square_root,
                |a, r| format!("√{a} = {r}"),
            )),
            MenuChoice::Sin => {
                let prompt = self.angle_prompt();
                read_or_exit!(self.unary(
                    &prompt,
                    |a| Ok(ops::sin(a, mode)),
                    |a, r| format!("sin({a}{unit}) = {r}"),
                ))
            }
            MenuChoice::Cos => {
                let prompt = self.angle_prompt();
                read_or_exit!(self.unary(
                    &prompt,
                    |a| Ok(ops::cos(a, mode)),
                    |a, r| format!("cos({a}{unit}) = {r}"),
                ))
            }
            MenuChoice::Tan => {
                let prompt = self.angle_prompt();
                read_or_exit!(self.unary(
                    &prompt,
                    |a| Ok(ops::tan(a, mode)),
                    |a, r| format!("tan({a}{unit}) = {r}"),
                ))
            }
            MenuChoice::Asin => read_or_exit!(self.unary(
                "Enter value (-1 to 1): ",
                |a| ops::asin(a, mode),
                |a, r| format!("asin({a}) = {r}{unit}"),
            )),
            MenuChoice::Acos => read_or_exit!(self.unary(
                "Enter value (-1 to 1): ",
                |a| ops::acos(a, mode),
                |a, r| format!("acos({a}) = {r}{unit}"),
            )),
            MenuChoice::Atan => read_or_exit!(self.unary(
                "Enter value: ",
                |a| Ok(ops::atan(a, mode)),
                |a, r| format!("atan({a}) = {r}{unit}"),
            )),
            MenuChoice::NaturalLog => read_or_exit!(self.unary(
                "Enter positive number: ",
                ops::ln,
                |a, r| format!("ln({a}) = {r}"),
            )),
            MenuChoice::Log10 => read_or_exit!(self.unary(
                "Enter positive number: ",
                ops::log10,
                |a, r| format!("log10({a}) = {r}"),
            )),
            MenuChoice::LogBase => {
                let a = read_or_exit!(self.read_number("Enter positive number: "));
                let base = read_or_exit!(self.read_number("Enter positive base (≠1): "));
                let outcome = ops::log(a, base).map(|result| self.calc.record(result));
                outcome.map(|result| {
                    format!(
                        "log_{}({}) = {}",
                        format_plain(base),
                        format_plain(a),
                        self.show(result)
                    )
                })
            }
            MenuChoice::Factorial => {
                let n = read_or_exit!(self.read_integer("Enter non-negative integer: "));
                let outcome = ops::factorial(n as f64).map(|result| self.calc.record(result));
                outcome.map(|result| format!("{n}! = {}", self.show(result)))
            }
            MenuChoice::Absolute => read_or_exit!(self.unary(
                "Enter number: ",
                |a| Ok(ops::absolute(a)),
                |a, r| format!("|{a}| = {r}"),
            )),
            MenuChoice::Ceiling => read_or_exit!(self.unary(
                "Enter number: ",
                |a| Ok(ops::ceiling(a)),
                |a, r| format!("ceil({a}) = {r}"),
            )),
            MenuChoice::Floor => read_or_exit!(self.unary(
                "Enter number: ",
                |a| Ok(ops::floor(a)),
                |a, r| format!("floor({a}) = {r}"),
            )),
            MenuChoice::Round => {
                let a = read_or_exit!(self.read_number("Enter number: "));
                let decimals = read_or_exit!(self.read_integer("Enter decimal places: "));
                let decimals = decimals.clamp(-300, 300) as i32;
                let result = self.calc.record(ops::round_to(a, decimals));
                Ok(format!(
                    "round({}, {decimals}) = {}",
                    format_plain(a),
                    self.show(result)
                ))
            }
            MenuChoice::DegreesToRadians => read_or_exit!(self.unary(
                "Enter degrees: ",
                ops::degrees_to_radians,
                |a, r| format!("{a}° = {r} radians"),
            )),
            MenuChoice::RadiansToDegrees => read_or_exit!(self.unary(
                "Enter radians: ",
                ops::radians_to_degrees,
                |a, r| format!("{a} radians = {r}°"),
            )),
            MenuChoice::MemoryStore => {
                let value = read_or_exit!(self.read_number("Enter value to store: "));
                self.calc.store_memory(value);
                Ok(format!("Stored {} in memory", format_plain(value)))
            }
            MenuChoice::MemoryRecall => Ok(format!(
                "Memory contains: {}",
                self.show(self.calc.recall_memory())
            )),
            MenuChoice::MemoryClear => {
                self.calc.clear_memory();
                Ok("Memory cleared".to_string())
            }
            MenuChoice::Expression => {
                writeln!(self.output, "\nExpression Calculator")?;
                writeln!(
                    self.output,
                    "Supported functions: sin, cos, tan, asin, acos, atan, sqrt, ln, log, log10, abs, fact"
                )?;
                writeln!(self.output, "Constants: pi, e")?;
                writeln!(self.output, "Operators: +, -, *, /, ^ (power), ()")?;
                writeln!(self.output, "Example: sin(30) + cos(60) * sqrt(16)")?;
                let expression = read_or_exit!(self.read_line("Enter expression: "));
                self.calc
                    .evaluate(&expression)
                    .map(|evaluation| format!("Result: {}", self.show(evaluation.value)))
            }
        };

        match outcome {
            Ok(line) => writeln!(self.output, "{line}")?,
            Err(err) => {
                warn!(?choice, %err, "calculation failed");
                writeln!(self.output, "Error: {err}")?;
            }
        }
        Ok(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> (String, Calculator) {
        let mut calc = Calculator::new(AngleMode::Degrees);
        let config = Config::default();
        let mut output = Vec::new();
        run_menu(&mut calc, &config, script.as_bytes(), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), calc)
    }

    #[test]
    fn test_exit_immediately() {
        let (output, _) = run_script("0\n");
        assert!(output.contains("ADVANCED CALCULATOR"));
        assert!(output.contains("26. Expression Calculator"));
        assert!(output.contains("Thank you for using the Advanced Calculator!"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (output, _) = run_script("");
        assert!(output.contains("Exiting calculator..."));
        let (output, _) = run_script("1\n2\n");
        assert!(output.contains("Exiting calculator..."));
    }

    #[test]
    fn test_addition_records_last_result() {
        let (output, calc) = run_script("1\n2\n3.5\n0\n");
        assert!(output.contains("2 + 3.5 = 5.5"));
        assert_eq!(calc.last_result(), 5.5);
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (output, _) = run_script("42\nabc\n0\n");
        assert_eq!(
            output
                .matches("Invalid choice. Please enter a number between 0 and 26.")
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_number_reprompts() {
        let (output, _) = run_script("6\nfour\n16\n0\n");
        assert!(output.contains("Please enter a valid number."));
        assert!(output.contains("√16 = 4"));
    }

    #[test]
    fn test_division_by_zero_is_reported() {
        let (output, calc) = run_script("4\n1\n0\n0\n");
        assert!(output.contains("Error: Division by zero is not allowed"));
        assert_eq!(calc.last_result(), 0.0);
    }

    #[test]
    fn test_overflow_is_reported_and_not_recorded() {
        let (output, calc) = run_script("1\n2\n3\n3\n1e308\n10\n22\n1e308\n0\n");
        assert_eq!(output.matches("Error: Overflow").count(), 2);
        assert!(!output.contains("inf"));
        assert_eq!(calc.last_result(), 5.0);
    }

    #[test]
    fn test_long_expression_does_not_abort() {
        let script = format!("26\n{}\n0\n", vec!["1"; 10_000].join("+"));
        let (output, calc) = run_script(&script);
        assert!(output.contains("Result: 10,000"));
        assert_eq!(calc.last_result(), 10_000.0);
    }

    #[test]
    fn test_trig_in_degrees() {
        let (output, _) = run_script("7\n90\n10\n1\n0\n");
        assert!(output.contains("sin(90°) = 1"));
        assert!(output.contains("asin(1) = 90°"));
    }

    #[test]
    fn test_domain_errors() {
        let (output, _) = run_script("10\n2\n13\n-1\n16\n-3\n0\n");
        assert!(output.contains("Error: Math domain error: arc sine input must be between -1 and 1"));
        assert!(output.contains("Error: Math domain error: natural logarithm input must be positive"));
        assert!(output.contains("Error: Math domain error: factorial of negative number"));
    }

    #[test]
    fn test_factorial_and_round() {
        let (output, _) = run_script("16\n10\n20\n3.14159\n2\n0\n");
        assert!(output.contains("10! = 3,628,800"));
        assert!(output.contains("round(3.14159, 2) = 3.14"));
    }

    #[test]
    fn test_custom_base_log() {
        let (output, _) = run_script("15\n8\n2\n0\n");
        assert!(output.contains("log_2(8) = 3"));
    }

    #[test]
    fn test_memory_operations() {
        let (output, calc) = run_script("23\n12.5\n24\n25\n24\n0\n");
        assert!(output.contains("Stored 12.5 in memory"));
        assert!(output.contains("Memory contains: 12.5"));
        assert!(output.contains("Memory cleared"));
        assert!(output.contains("Memory contains: 0"));
        assert_eq!(calc.memory(), 0.0);
    }

    #[test]
    fn test_expression_calculator() {
        let (output, calc) = run_script("26\nsin(30) + cos(60) * sqrt(16)\n26\nsqrt(-1)\n0\n");
        assert!(output.contains("Result: 2.5"));
        assert!(output.contains("Error: Math domain error"));
        assert!((calc.last_result() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_radians_mode_prompts() {
        let mut calc = Calculator::new(AngleMode::Radians);
        let config = Config::default();
        let mut output = Vec::new();
        run_menu(&mut calc, &config, "8\n0\n0\n".as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Enter angle in radians: "));
        assert!(output.contains("cos(0 rad) = 1"));
    }
}

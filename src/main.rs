use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scicalc::calculator::{AngleMode, Calculator};
use scicalc::config::Config;
use scicalc::keypad::Keypad;
use scicalc::menu::run_menu;

#[derive(Parser)]
#[command(
    name = "scicalc",
    version,
    about = "Scientific calculator with an expression evaluator"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Interpret trigonometric angles in radians
    #[arg(long, global = true, conflicts_with = "degrees")]
    radians: bool,

    /// Interpret trigonometric angles in degrees
    #[arg(long, global = true)]
    degrees: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive numbered menu (default)
    Menu,
    /// Evaluate an expression and print the result
    Eval {
        /// Expression; multiple words are joined with spaces
        #[arg(required = true, allow_hyphen_values = true)]
        expr: Vec<String>,
    },
    /// Press keypad buttons by label and print the display
    Keys {
        /// Button labels, e.g. `7 × 6 =`
        #[arg(required = true, allow_hyphen_values = true)]
        labels: Vec<String>,
    },
}

impl Cli {
    fn angle_mode(&self, config: &Config) -> AngleMode {
        if self.radians {
            AngleMode::Radians
        } else if self.degrees {
            AngleMode::Degrees
        } else {
            config.angle_mode
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config_path = Config::locate(cli.config.as_deref());
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    init_logging(&config, cli.verbose);
    match &config_path {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }

    let mode = cli.angle_mode(&config);
    debug!(%mode, "starting");
    let mut calc = Calculator::new(mode);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            run_menu(&mut calc, &config, io::stdin().lock(), io::stdout())?;
        }
        Command::Eval { expr } => {
            let expr = expr.join(" ");
            match calc.evaluate(&expr) {
                Ok(evaluation) => println!("{}", config.format_value(evaluation.value)),
                Err(err) => {
                    eprintln!("Error: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Keys { labels } => {
            let mut keypad = Keypad::new(calc, config);
            for label in &labels {
                if let Err(err) = keypad.press_label(label) {
                    eprintln!("Error: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            }
            println!("{}", keypad.display());
            if !keypad.preview().is_empty() {
                println!("{}", keypad.preview());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies). Environment variables
//! with the `SPIRAL_` prefix override defaults, and explicit flags override
//! both.

use std::env;
use std::fmt;
use std::process;

use spiral_core::{Layout, PackedRgba, SpiralConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
spiral-term: growing spirals drawn with half-block characters

USAGE:
    spiral-term [OPTIONS]

OPTIONS:
    --layout=NAME              'single' (default; also 'one', '1'),
                               'four' (also '4'), or 'empty' (also 'none')
    --fps=N                    Frames per second, 1-1000 (default: 60)
    --seed=N                   Seed the random source for a reproducible run
    --color=RRGGBB             Fixed color for the initial spirals
    --branch-probability=P     Per-frame branch chance, 0-1 (default: 0.001)
    --autostart                Start animating immediately
    --help, -h                 Show this help message
    --version, -V              Show version

KEYS:
    s                 Start
    x / Space         Stop
    q / Esc / Ctrl+C  Quit

ENVIRONMENT VARIABLES:
    SPIRAL_LAYOUT               Override --layout
    SPIRAL_FPS                  Override --fps
    SPIRAL_SEED                 Override --seed
    SPIRAL_COLOR                Override --color
    SPIRAL_BRANCH_PROBABILITY   Override --branch-probability
    SPIRAL_LOG                  tracing filter, e.g. 'spiral_core=debug' (logs go to stderr)
    SPIRAL_DEBUG_TRACE          Set to 1 for per-pixel debug output on stderr";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub layout: Layout,
    pub fps: u32,
    pub seed: Option<u64>,
    pub color: Option<PackedRgba>,
    pub branch_probability: f64,
    pub autostart: bool,
}

impl Default for Opts {
    fn default() -> Self {
        let defaults = SpiralConfig::default();
        Self {
            layout: Layout::SingleSpiral,
            fps: defaults.frames_per_second,
            seed: None,
            color: None,
            branch_probability: defaults.branch_probability,
            autostart: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Rejected argument or environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { name: String, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, value } => write!(f, "invalid {name} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn invalid(name: &str, value: &str) -> CliError {
    CliError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

impl Opts {
    /// Parse the process arguments and environment, exiting on help,
    /// version, or error.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("spiral-term {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit args and an environment lookup.
    pub fn parse_from(
        args: &[String],
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, CliError> {
        let mut opts = Self::default();

        if let Some(val) = env_var("SPIRAL_LAYOUT") {
            opts.set_layout("SPIRAL_LAYOUT", &val)?;
        }
        if let Some(val) = env_var("SPIRAL_FPS") {
            opts.set_fps("SPIRAL_FPS", &val)?;
        }
        if let Some(val) = env_var("SPIRAL_SEED") {
            opts.set_seed("SPIRAL_SEED", &val)?;
        }
        if let Some(val) = env_var("SPIRAL_COLOR") {
            opts.set_color("SPIRAL_COLOR", &val)?;
        }
        if let Some(val) = env_var("SPIRAL_BRANCH_PROBABILITY") {
            opts.set_branch_probability("SPIRAL_BRANCH_PROBABILITY", &val)?;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--autostart" => opts.autostart = true,
                other => {
                    if let Some(val) = other.strip_prefix("--layout=") {
                        opts.set_layout("--layout", val)?;
                    } else if let Some(val) = other.strip_prefix("--fps=") {
                        opts.set_fps("--fps", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.set_seed("--seed", val)?;
                    } else if let Some(val) = other.strip_prefix("--color=") {
                        opts.set_color("--color", val)?;
                    } else if let Some(val) = other.strip_prefix("--branch-probability=") {
                        opts.set_branch_probability("--branch-probability", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }

    fn set_layout(&mut self, name: &str, val: &str) -> Result<(), CliError> {
        self.layout = Layout::from_name(val).ok_or_else(|| invalid(name, val))?;
        Ok(())
    }

    fn set_fps(&mut self, name: &str, val: &str) -> Result<(), CliError> {
        self.fps = val.parse().map_err(|_| invalid(name, val))?;
        Ok(())
    }

    fn set_seed(&mut self, name: &str, val: &str) -> Result<(), CliError> {
        self.seed = Some(val.parse().map_err(|_| invalid(name, val))?);
        Ok(())
    }

    fn set_color(&mut self, name: &str, val: &str) -> Result<(), CliError> {
        self.color = Some(PackedRgba::from_hex(val).ok_or_else(|| invalid(name, val))?);
        Ok(())
    }

    fn set_branch_probability(&mut self, name: &str, val: &str) -> Result<(), CliError> {
        self.branch_probability = val.parse().map_err(|_| invalid(name, val))?;
        Ok(())
    }

    /// Animation config for these options. Range checks happen in
    /// [`SpiralConfig::validate`].
    pub fn config(&self) -> SpiralConfig {
        let mut config = SpiralConfig::default()
            .with_frames_per_second(self.fps)
            .with_branch_probability(self.branch_probability);
        if let Some(color) = self.color {
            config = config.with_initial_color(color);
        }
        config
    }
}

//! Command-line interface for voice-order
//!
//! Provides argument parsing using clap derive macros.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Voice-driven ordering client
#[derive(Parser, Debug)]
#[command(name = "voice-order", version, about = "Voice-driven ordering client")]
pub struct Cli {
    /// Subcommand to execute (default: interactive)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Sign in anonymously
    #[arg(long, global = true, conflicts_with_all = ["email", "password"])]
    pub guest: bool,

    /// Account email
    #[arg(long, global = true, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Backend request timeout. Examples: 500ms, 10s, 1m30s
    #[arg(long, global = true, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

/// The clap command with the build's full version string.
pub fn command() -> clap::Command {
    Cli::command().version(crate::version_string())
}

/// Parse a timeout duration.
///
/// Accepts bare numbers (seconds) or any `humantime` duration of at least
/// one millisecond.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let timeout = match s.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(s).map_err(|e| e.to_string())?,
    };
    if timeout < Duration::from_millis(1) {
        return Err("timeout must be at least 1ms".to_string());
    }
    Ok(timeout)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one order and speak the reply
    Order {
        /// Order text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Capture one voice order, then submit it
    Listen,

    /// Send feedback about the service
    Feedback {
        /// Feedback text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Line-based ordering session
    Interactive,

    /// Create an account (uses --email and --password)
    Signup {
        /// Password confirmation
        #[arg(long, value_name = "PASSWORD")]
        confirm: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

/// A line typed in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    /// Set the input to this text and submit it
    Order(String),
    /// `:send`: submit the input as it stands
    Send,
    /// `:voice`: capture into the input without submitting
    Voice,
    /// `:feedback <text>`
    Feedback(String),
    /// `:voices`
    Voices,
    /// `:logout`
    Logout,
    /// `:quit` or `:q`
    Quit,
    /// `:help`
    Help,
    /// Blank line
    Empty,
    /// Unrecognized `:command`
    Unknown(String),
}

impl InteractiveCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Order(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "send" | "s" => Self::Send,
            "voice" | "v" => Self::Voice,
            "feedback" | "f" => Self::Feedback(arg.to_string()),
            "voices" => Self::Voices,
            "logout" => Self::Logout,
            "quit" | "q" => Self::Quit,
            "help" | "h" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub const INTERACTIVE_HELP: &str = "\
Type an order and press Enter to submit it.
  :voice             capture the order by voice into the input
  :send              submit the input (after :voice)
  :feedback <text>   send feedback
  :voices            list speech voices
  :logout            sign out and exit
  :quit              exit";

//! Command-line surface and startup sequencing.
//!
//! Parses the CLI, routes the lightweight maintenance commands before any
//! logging or setup work, and runs the interview wizard for everything else.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A terminal-based AI mock-interview trainer
#[derive(Parser)]
#[command(name = "intervu")]
#[command(version)]
#[command(about = "Practice interviews out loud: AI questions, spoken answers, instant feedback")]
#[command(
    long_about = "A terminal-based mock-interview trainer.\n\nintervu generates interview questions from a job description, records your\nspoken answers through the microphone, transcribes them, and ends the session\nwith an AI assessment of all your answers.\n\nDEFAULT COMMAND:\n    If no command is specified, 'interview' is used by default.\n    Interview options (-d, -o) can be used without explicitly saying 'interview'.\n\nEXAMPLES:\n    # Start an interview for the configured job description\n    $ intervu\n    \n    # Use a job description from a file and save the assessment\n    $ intervu -d posting.txt -o feedback.txt\n    \n    # Edit configuration file\n    $ intervu config\n    \n    # List audio input devices\n    $ intervu list-devices"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/intervu/intervu.toml\n    Credentials:        OPENAI_API_KEY (and GEMINI_API_KEY for the gemini backend)\n    Logs:               ~/.local/state/intervu/intervu.log.*"
)]
struct Cli {
    /// Read the job description from a file (interview default command)
    #[arg(short, long, value_name = "FILE", global = true)]
    description: Option<PathBuf>,

    /// Write the final analysis to a file (interview default command)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a mock-interview session (default)
    ///
    /// Fetches questions, then for each question: press Space to start
    /// recording, answer out loud, press Space again (or wait for the
    /// countdown) to submit. Finishes with an AI analysis of all answers.
    #[command(visible_alias = "i")]
    Interview {
        /// Read the job description from a file
        #[arg(short, long, value_name = "FILE")]
        description: Option<PathBuf>,

        /// Write the final analysis to a file
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,
    },

    /// Edit the configuration file
    ///
    /// Opens ~/.config/intervu/intervu.toml in $VISUAL or $EDITOR, with a
    /// nano/vi fallback. Interview settings, audio options and provider
    /// selection all live there.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Prints device indices, names and formats; use either the index or the
    /// name as the [audio] device in intervu.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Print the tail of the application log
    ///
    /// Shows the last entries of the most recent log file, for
    /// troubleshooting failed sessions.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   intervu completions bash > intervu.bash
    ///   intervu completions zsh > _intervu
    ///   intervu completions fish > intervu.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parses the command line and dispatches.
///
/// Completions, device listing and log display run before logging or setup is
/// touched; the remaining commands get the full startup sequence (log file,
/// config presence/version check) first.
///
/// # Errors
/// - If logging or setup initialization fails
/// - If the dispatched command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "intervu", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return exit_on_error(commands::handle_list_devices()),
        Some(Commands::Logs) => return exit_on_error(commands::handle_logs()),
        _ => {}
    }

    logging::init_logging()?;

    crate::setup::ensure_current_config().map_err(|e| {
        tracing::error!("Setup failed: {e}");
        e
    })?;

    match cli.command {
        None => commands::handle_interview(cli.description, cli.output).await?,
        Some(Commands::Interview {
            description,
            output,
        }) => commands::handle_interview(description, output).await?,
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

/// Prints the error and exits non-zero, for commands that run before the
/// logging and TUI layers exist.
fn exit_on_error(result: Result<(), anyhow::Error>) -> Result<(), anyhow::Error> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

// mannsum CLI - tally weights in mann and kg
// Reads one amount per line; shares state as a `?text=` query string.

mod exit_codes;
mod input;
mod logger;
mod tui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use mannsum_config::Settings;
use mannsum_core::PersistedState;
use mannsum_engine::{codec, format, Tally};
use mannsum_location::query;

use exit_codes::{
    EXIT_CONFIG, EXIT_EDIT_TERMINAL, EXIT_ENCODING, EXIT_IO, EXIT_OUTPUT, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "mannsum")]
#[command(about = "Sum weights line by line and split the total into mann and kg")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum one amount per line and print the totals
    #[command(after_help = "\
Examples:
  printf '10\\n-5\\n20\\n' | mannsum sum
  mannsum sum weights.txt --json")]
    Sum {
        /// Input file (stdin when omitted or `-`)
        file: Option<PathBuf>,

        /// Print the full tally as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the shareable query string for the given lines
    #[command(after_help = "\
Examples:
  printf '1\\n2\\n3' | mannsum encode        # ?text=1~2~3")]
    Encode {
        /// Input file (stdin when omitted or `-`)
        file: Option<PathBuf>,
    },

    /// Print the lines stored in a query string or URL
    #[command(after_help = "\
Examples:
  mannsum decode '?text=10~-5~20'
  mannsum decode 'https://example.com/?text=40~45' --sum")]
    Decode {
        /// Query string (`?text=...`) or full URL
        query: String,

        /// Print the totals instead of the lines
        #[arg(long)]
        sum: bool,
    },

    /// Edit lines interactively with live totals
    #[command(after_help = "\
Keys:
  Ctrl-Z / Ctrl-Y   back / forward through history
  Esc / Ctrl-Q      quit (the final query string is printed)")]
    Edit {
        /// Starting query string or URL
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Show the settings file path and effective settings
    #[command(after_help = "\
Examples:
  mannsum config            # path and effective settings as JSON
  mannsum config --init     # write the defaults if no file exists")]
    Config {
        /// Write default settings to the settings file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  mannsum-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  mannsum-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(matches!(cli.command, Commands::Edit { .. }));

    let result = match cli.command {
        Commands::Sum { file, json } => cmd_sum(file, json),
        Commands::Encode { file } => cmd_encode(file),
        Commands::Decode { query, sum } => cmd_decode(&query, sum),
        Commands::Edit { query } => cmd_edit(&query),
        Commands::Config { init } => cmd_config(init),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ENCODING, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EDIT_TERMINAL, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

// ============================================================================
// Output helpers
// ============================================================================

fn write_lines(lines: &[String]) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        writeln!(handle, "{}", line).map_err(|e| CliError::output(e.to_string()))?;
    }
    Ok(())
}

fn totals(tally: &Tally, settings: &Settings) -> Vec<String> {
    vec![
        format::total_line(&tally.result, &settings.base_unit),
        format::mann_line(&tally.result, &settings.coarse_unit, &settings.base_unit),
    ]
}

/// JSON shape of `sum --json`.
#[derive(Serialize)]
struct SumReport<'a> {
    #[serde(flatten)]
    tally: &'a Tally,
    valid_lines: usize,
    invalid_lines: usize,
    query: String,
}

// ============================================================================
// sum
// ============================================================================

fn cmd_sum(file: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let text = input::read_text(file.as_deref())?;
    let tally = Tally::from_display(&text);
    log::debug!(
        "summed {} lines ({} invalid)",
        tally.line_count(),
        tally.invalid_count()
    );

    if json {
        let report = SumReport {
            tally: &tally,
            valid_lines: tally.valid_count(),
            invalid_lines: tally.invalid_count(),
            query: query::to_search(&PersistedState::with_text(codec::to_persisted(&text))),
        };
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::output(format!("cannot serialize tally: {}", e)))?;
        return write_lines(&[out]);
    }

    let settings = Settings::load();
    write_lines(&totals(&tally, &settings))
}

// ============================================================================
// encode / decode
// ============================================================================

fn cmd_encode(file: Option<PathBuf>) -> Result<(), CliError> {
    let text = input::read_text(file.as_deref())?;
    let state = PersistedState::with_text(codec::to_persisted(&text));
    write_lines(&[query::to_search(&state)])
}

fn cmd_decode(source: &str, sum: bool) -> Result<(), CliError> {
    let raw = query::query_of(source);
    if raw.is_empty() {
        return Err(CliError::args("query string is empty")
            .with_hint("pass a query such as '?text=10~-5~20' or a full URL"));
    }

    let decoded = query::decode(raw);
    if !decoded.has_text() {
        log::warn!("query has no text parameter; treating it as empty");
    }
    let state = decoded.normalized();
    let tally = Tally::from_persisted(state.text());

    if sum {
        let settings = Settings::load();
        return write_lines(&totals(&tally, &settings));
    }
    write_lines(&[tally.display_text])
}

// ============================================================================
// edit
// ============================================================================

fn cmd_edit(query: &str) -> Result<(), CliError> {
    let settings = Settings::load();
    let search = tui::run(query::query_of(query), settings).map_err(|e| {
        CliError::terminal(e).with_hint("edit needs an interactive terminal; try `mannsum sum`")
    })?;
    write_lines(&[search])
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(init: bool) -> Result<(), CliError> {
    let path = Settings::config_path();

    if init {
        if path.exists() {
            log::info!("settings file already exists, leaving it untouched");
            return write_lines(&[format!("exists: {}", path.display())]);
        }
        Settings::default()
            .save_to(&path)
            .map_err(|e| CliError::config(format!("{} ({})", e, path.display())))?;
        return write_lines(&[format!("created: {}", path.display())]);
    }

    let settings = Settings::load();
    let json = serde_json::to_string_pretty(&settings)
        .map_err(|e| CliError::output(format!("cannot serialize settings: {}", e)))?;
    write_lines(&[format!("path: {}", path.display()), json])
}

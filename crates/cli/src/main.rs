// rowcheck CLI - validate tabular data, review errors, apply corrections

mod exit_codes;

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rowcheck_access::{hash_secret, Credentials};
use rowcheck_cli::edits;
use rowcheck_cli::gate::PreviewGate;
use rowcheck_cli::shell::{self, Shell};
use rowcheck_config::Settings;
use rowcheck_engine::{EngineError, Row, RuleSet, RulesConfig, Session};

use exit_codes::{
    engine_exit_code, load_exit_code, EXIT_ACCESS_DENIED, EXIT_FIELD_NOT_FLAGGED, EXIT_IO,
    EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATION_ISSUES,
};

/// Env var holding the log filter (tracing `EnvFilter` syntax).
const LOG_ENV: &str = "ROWCHECK_LOG";

#[derive(Parser)]
#[command(name = "rowcheck")]
#[command(about = "Validate tabular records, review invalid fields, apply corrections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every row and list the rows with issues
    #[command(after_help = "\
Examples:
  rowcheck validate sales.csv
  rowcheck validate sales.csv --rules rules.toml --json
  rowcheck validate sales.tsv --delimiter '\\t' --output report.json

Exit codes:
  0   all rows passed
  60  at least one row has issues")]
    Validate {
        /// Input file (CSV/TSV with a header row)
        file: PathBuf,

        /// TOML rules file (default: non-negative `sales`, valid `email`)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Field delimiter (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<String>,

        /// Print the JSON report instead of the log
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Apply one correction and re-check the data (nothing is written back)
    #[command(after_help = "\
Examples:
  rowcheck fix sales.csv --row 2 --set sales=5 --set email=ok@example.com
  rowcheck fix sales.csv --row 2 --set sales=5 --only-flagged

Rows are numbered from 1, as in the validation log.")]
    Fix {
        /// Input file (CSV/TSV with a header row)
        file: PathBuf,

        /// Row to correct (1-based)
        #[arg(long)]
        row: usize,

        /// Field edit, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,

        /// Refuse edits to fields the validation run did not flag on that row
        #[arg(long)]
        only_flagged: bool,

        /// TOML rules file
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Field delimiter (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Show the first rows of a file (requires preview credentials)
    #[command(after_help = "\
Credentials are checked against preview.identity / preview.secretSha256 in the
settings file, or ROWCHECK_PREVIEW_ID / ROWCHECK_PREVIEW_SECRET_SHA256.
With nothing configured every attempt is denied.")]
    Preview {
        /// Input file (CSV/TSV with a header row)
        file: PathBuf,

        /// Identity
        #[arg(long)]
        id: String,

        /// Secret (prefer --secret-stdin)
        #[arg(long, conflicts_with = "secret_stdin")]
        secret: Option<String>,

        /// Read the secret from the first line of stdin
        #[arg(long)]
        secret_stdin: bool,

        /// Number of data rows to show
        #[arg(long)]
        rows: Option<usize>,

        /// Field delimiter (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Interactive review session over stdin
    #[command(after_help = "Type 'help' inside the shell for the command list.")]
    Shell {
        /// File to load on start
        file: Option<PathBuf>,

        /// TOML rules file
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Field delimiter (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Print the SHA-256 of a secret read from stdin, for preview.secretSha256
    HashSecret,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file, rules, delimiter, json, output } => {
            cmd_validate(file, rules, delimiter, json, output)
        }
        Commands::Fix { file, row, set, only_flagged, rules, delimiter } => {
            cmd_fix(file, row, set, only_flagged, rules, delimiter)
        }
        Commands::Preview { file, id, secret, secret_stdin, rows, delimiter } => {
            cmd_preview(file, id, secret, secret_stdin, rows, delimiter)
        }
        Commands::Shell { file, rules, delimiter } => cmd_shell(file, rules, delimiter),
        Commands::HashSecret => cmd_hash_secret(),
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

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
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

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Non-zero exit without a message (the command already printed its result).
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn engine(err: EngineError) -> Self {
        let code = engine_exit_code(&err);
        let message = match &err {
            EngineError::IndexOutOfRange { index, len } => shell::out_of_range(*index, *len),
            other => other.to_string(),
        };
        Self { code, message, hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared setup
// ============================================================================

/// `--delimiter` wins over settings; `\t` and `tab` mean a tab.
fn resolve_delimiter(arg: Option<&str>, settings: &Settings) -> Result<Option<u8>, CliError> {
    let Some(raw) = arg else {
        return Ok(settings.delimiter_byte());
    };
    let c = match raw {
        "\\t" | "tab" => '\t',
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(CliError::args(format!("delimiter must be one character, got {raw:?}"))),
            }
        }
    };
    if !c.is_ascii() {
        return Err(CliError::args(format!("delimiter must be ASCII, got {c:?}")));
    }
    Ok(Some(c as u8))
}

/// `--rules`, then `rules.path` from settings, then the built-in set.
fn resolve_rules(arg: Option<PathBuf>, settings: &Settings) -> Result<RuleSet, CliError> {
    let Some(path) = arg.or_else(|| settings.rules_path.clone()) else {
        return Ok(RuleSet::standard());
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::io(format!("{}: {e}", path.display())))?;
    let config = RulesConfig::from_toml(&text).map_err(|e| {
        CliError::engine(e).with_hint(format!("check the [[rule]] entries in {}", path.display()))
    })?;
    log::debug!("loaded {} rules from {}", config.rules.len(), path.display());
    Ok(config.build())
}

fn load_rows(path: &Path, delimiter: Option<u8>) -> Result<Vec<Row>, CliError> {
    rowcheck_io::csv::load(path, delimiter).map_err(|e| CliError {
        code: load_exit_code(&e),
        message: format!("{}: {e}", path.display()),
        hint: None,
    })
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_validate(
    file: PathBuf,
    rules: Option<PathBuf>,
    delimiter: Option<String>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let delimiter = resolve_delimiter(delimiter.as_deref(), &settings)?;
    let rules = resolve_rules(rules, &settings)?;

    let mut session = Session::new(rules);
    session.load(load_rows(&file, delimiter)?);
    let report = session.validate();

    if let Some(out) = &output {
        rowcheck_io::report::export(report, Some(&file), out).map_err(CliError::io)?;
    }

    if json {
        let text = rowcheck_io::report::to_json(report, Some(&file)).map_err(CliError::io)?;
        println!("{text}");
    } else {
        print_lines(&report.display_lines());
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_VALIDATION_ISSUES))
    }
}

fn cmd_fix(
    file: PathBuf,
    row: usize,
    set: Vec<String>,
    only_flagged: bool,
    rules: Option<PathBuf>,
    delimiter: Option<String>,
) -> Result<(), CliError> {
    let request = edits::build_request(row, &set).map_err(CliError::args)?;

    let settings = Settings::load();
    let delimiter = resolve_delimiter(delimiter.as_deref(), &settings)?;
    let rules = resolve_rules(rules, &settings)?;

    let mut session = Session::new(rules);
    session.load(load_rows(&file, delimiter)?);
    session.validate();

    if only_flagged {
        edits::check_flagged(&request, &session).map_err(|msg| CliError {
            code: EXIT_FIELD_NOT_FLAGGED,
            message: msg,
            hint: Some("drop --only-flagged to edit any field".into()),
        })?;
    }

    session.apply_correction(&request).map_err(CliError::engine)?;
    println!("Row {row} updated successfully.");
    if session.is_stale() {
        println!("Error list is stale until the next validation; re-validating.");
    }

    let report = session.validate();
    print_lines(&report.display_lines());

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_VALIDATION_ISSUES))
    }
}

fn cmd_preview(
    file: PathBuf,
    id: String,
    secret: Option<String>,
    secret_stdin: bool,
    rows: Option<usize>,
    delimiter: Option<String>,
) -> Result<(), CliError> {
    let secret = match (secret, secret_stdin) {
        (_, true) => read_secret_line()?,
        (Some(s), false) => s,
        (None, false) => {
            return Err(CliError::args("no secret given")
                .with_hint("pass --secret-stdin and pipe the secret in"))
        }
    };

    let mut settings = Settings::load();
    if let Some(n) = rows {
        settings.preview_row_limit = n;
    }
    let delimiter = resolve_delimiter(delimiter.as_deref(), &settings)?;
    let gate = PreviewGate::from_settings(&settings).map_err(CliError::parse)?;

    let store = rowcheck_engine::RecordStore::new(load_rows(&file, delimiter)?);
    let text = gate.open(&Credentials::new(id, secret), &store).map_err(|e| {
        let hint = if settings.preview_configured() {
            None
        } else {
            Some(format!(
                "no preview credentials configured in {}",
                Settings::config_path_display()
            ))
        };
        CliError { code: EXIT_ACCESS_DENIED, message: e.to_string(), hint }
    })?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_shell(file: Option<PathBuf>, rules: Option<PathBuf>, delimiter: Option<String>) -> Result<(), CliError> {
    let settings = Settings::load();
    let delimiter = resolve_delimiter(delimiter.as_deref(), &settings)?;
    let rules = resolve_rules(rules, &settings)?;
    let gate = PreviewGate::from_settings(&settings).map_err(CliError::parse)?;

    let mut session = Session::new(rules);
    if let Some(path) = &file {
        session.load(load_rows(path, delimiter)?);
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut shell = Shell::new(session, gate, delimiter);
    shell
        .run(stdin.lock(), &mut io::stdout(), prompt)
        .map_err(|e| CliError::io(e.to_string()))
}

fn cmd_hash_secret() -> Result<(), CliError> {
    let secret = read_secret_line()?;
    if secret.is_empty() {
        return Err(CliError::args("empty secret"));
    }
    println!("{}", hash_secret(&secret));
    Ok(())
}

/// First line of stdin without the line ending.
fn read_secret_line() -> Result<String, CliError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::io(format!("reading stdin: {e}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

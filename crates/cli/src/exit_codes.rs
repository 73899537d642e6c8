//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args, missing file) |
//! | 3-4     | Universal  | Input file IO / parse errors             |
//! | 60-69   | validate   | Validation findings, correction targets  |
//! | 70-79   | preview    | Preview access                           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use rowcheck_engine::EngineError;
use rowcheck_io::LoadError;

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file could not be read.
pub const EXIT_IO: u8 = 3;

/// Input file or rules file could not be parsed.
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Validate / fix (60-69)
// =============================================================================

/// Validation found at least one row with issues.
/// Like `diff(1)`, a non-zero exit means "not clean", not "crashed".
pub const EXIT_VALIDATION_ISSUES: u8 = 60;

/// Correction target row does not exist.
pub const EXIT_ROW_OUT_OF_RANGE: u8 = 61;

/// `--only-flagged` correction touched a field the last run did not flag.
pub const EXIT_FIELD_NOT_FLAGGED: u8 = 62;

// =============================================================================
// Preview (70-79)
// =============================================================================

/// Preview credentials rejected (or no credentials configured).
pub const EXIT_ACCESS_DENIED: u8 = 70;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::IndexOutOfRange { .. } => EXIT_ROW_OUT_OF_RANGE,
        EngineError::RulesParse(_) | EngineError::RulesValidation(_) => EXIT_PARSE,
    }
}

/// Map a loader error to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::Io(_) => EXIT_IO,
        LoadError::Csv { .. } => EXIT_PARSE,
    }
}

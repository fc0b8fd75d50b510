//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                        |
//! |------|-----------|----------------------------------------------------|
//! | 0    | Universal | Success                                            |
//! | 2    | Universal | CLI usage error (bad args, bad year list)          |
//! | 60   | recon     | Config could not be read, parsed or validated      |
//! | 61   | recon     | Runtime failure (input file, missing column, write)|
//! | 62   | recon     | Strict run halted on a product it cannot place     |
//! | 63   | recon     | Run produced warnings and `--deny-warnings` is set |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use holdings_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (60-69)
// =============================================================================

/// Config file unreadable, malformed TOML, or failed validation.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 60;

/// Input table unreadable, required column missing, or output not writable.
pub const EXIT_RECON_RUNTIME: u8 = 61;

/// `strict = true` and a product could not be classified, or a configured
/// package matched no catalog rows.
pub const EXIT_RECON_CLASSIFICATION: u8 = 62;

/// Run completed but raised warnings while `--deny-warnings` was given.
pub const EXIT_RECON_WARNINGS: u8 = 63;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::Classification { .. } | ReconError::EmptyMatch { .. } => {
            EXIT_RECON_CLASSIFICATION
        }
        ReconError::MissingColumn { .. } | ReconError::Io(_) => EXIT_RECON_RUNTIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recon_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_USAGE,
            EXIT_RECON_INVALID_CONFIG,
            EXIT_RECON_RUNTIME,
            EXIT_RECON_CLASSIFICATION,
            EXIT_RECON_WARNINGS,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn engine_errors_map_to_registry() {
        assert_eq!(
            recon_exit_code(&ReconError::ConfigValidation("x".into())),
            EXIT_RECON_INVALID_CONFIG
        );
        assert_eq!(
            recon_exit_code(&ReconError::Classification { product: "p".into(), reason: "r".into() }),
            EXIT_RECON_CLASSIFICATION
        );
        assert_eq!(
            recon_exit_code(&ReconError::MissingColumn { table: "client".into(), column: "c".into() }),
            EXIT_RECON_RUNTIME
        );
    }
}

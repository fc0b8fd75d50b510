//! `holdings run` / `holdings validate`: config-driven coverage reconciliation.

use std::path::{Path, PathBuf};

use holdings_recon::{ReconConfig, ReconResult};

use crate::exit_codes::{
    recon_exit_code, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME, EXIT_RECON_WARNINGS,
};
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn engine_err(err: holdings_recon::ReconError) -> CliError {
    recon_err(recon_exit_code(&err), err.to_string())
}

/// Read, parse and validate a config file.
fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        recon_err(
            EXIT_RECON_INVALID_CONFIG,
            format!("cannot read config {}: {e}", config_path.display()),
        )
    })?;
    let config = ReconConfig::from_toml(&config_str).map_err(engine_err)?;
    tracing::debug!(path = %config_path.display(), name = %config.name, "loaded config");
    Ok(config)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "{}: ok ({} packages, strict={})",
        config.name,
        config.products.packages.len(),
        config.strict
    );
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    deny_warnings: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let config = holdings_io::prepare_config(&config);

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let loaded = holdings_io::load_input(&config, base_dir).map_err(|e| {
        let err = engine_err(e);
        if err.code == EXIT_RECON_RUNTIME {
            err.with_hint("input paths in the config resolve against the config file's directory")
        } else {
            err
        }
    })?;

    let result = holdings_recon::run(&config, &loaded.input).map_err(|e| {
        let err = engine_err(e);
        if config.strict {
            err.with_hint("set strict = false to report unplaceable products instead of halting")
        } else {
            err
        }
    })?;

    let written =
        holdings_io::export::write_outputs(&config.output, base_dir, &loaded.catalog, &result)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
    for path in &written {
        eprintln!("wrote {}", path.display());
    }

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&result);

    if deny_warnings && !result.warnings.is_empty() {
        return Err(recon_err(
            EXIT_RECON_WARNINGS,
            format!("{} warnings (--deny-warnings)", result.warnings.len()),
        ));
    }

    Ok(())
}

/// Human summary to stderr
fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} of {} catalog rows covered across {} titles ({} subscriptions, {} packages, {} backfiles)",
        result.meta.config_name,
        s.covered_rows,
        s.catalog_rows,
        s.titles,
        s.subscriptions,
        s.packages,
        s.backfiles,
    );
    if s.invalid_products > 0 {
        eprintln!("invalid products: {}", s.invalid_products);
        for invalid in &result.invalid {
            eprintln!("  {} ({}): {}", invalid.product, invalid.kind, invalid.reason);
        }
    }
    if s.warnings > 0 {
        eprintln!("warnings: {}", s.warnings);
    }
}

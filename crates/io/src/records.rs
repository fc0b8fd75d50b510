// Map loaded tables onto engine records

use std::collections::BTreeSet;
use std::path::Path;

use holdings_recon::config::ReconConfig;
use holdings_recon::model::{CatalogRow, ReconInput, ReconWarning, SubscriptionEntry};
use holdings_recon::years::{Year, YearWindow};
use holdings_recon::ReconError;

use crate::normalize::normalize;
use crate::table::{read_table, Table};

/// Engine input plus the raw catalog table, kept for the annotated export.
#[derive(Debug)]
pub struct LoadedInput {
    pub input: ReconInput,
    pub catalog: Table,
}

/// Ledger entries and the rows dropped while reading them.
#[derive(Debug, Default)]
pub struct Ledger {
    pub entries: Vec<SubscriptionEntry>,
    pub warnings: Vec<ReconWarning>,
}

/// Catalog rows, every (normalized) column header, and the rows dropped.
#[derive(Debug, Default)]
pub struct Catalog {
    pub rows: Vec<CatalogRow>,
    pub columns: BTreeSet<String>,
    pub warnings: Vec<ReconWarning>,
}

/// Copy of `config` with package names in the same form as loaded names.
pub fn prepare_config(config: &ReconConfig) -> ReconConfig {
    let mut prepared = config.clone();
    if config.normalize {
        let mut seen = BTreeSet::new();
        prepared.products.packages = config
            .products
            .packages
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty() && seen.insert(p.clone()))
            .collect();
    }
    prepared
}

/// Parse a year cell: `2005`, `2005.0`, or a date starting with the year (`2005-01-01`).
pub fn parse_year(cell: &str) -> Option<Year> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(year) = cell.parse::<Year>() {
        return Some(year);
    }
    if let Ok(n) = cell.parse::<f64>() {
        if n.fract() == 0.0 && n >= Year::MIN as f64 && n <= Year::MAX as f64 {
            return Some(n as Year);
        }
        return None;
    }
    let bytes = cell.as_bytes();
    if bytes.len() >= 8
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(bytes[4], b'-' | b'/' | b'.')
    {
        return cell[..4].parse().ok();
    }
    None
}

struct Keys {
    normalize: bool,
}

impl Keys {
    fn of(&self, text: &str) -> String {
        if self.normalize {
            normalize(text)
        } else {
            text.trim().to_string()
        }
    }
}

/// Position of the configured column `name` among the lookup-form headers.
fn require(headers: &Table, keys: &Keys, name: &str, which: &str) -> Result<usize, ReconError> {
    headers
        .column(&keys.of(name))
        .ok_or_else(|| ReconError::MissingColumn {
            table: which.to_string(),
            column: name.to_string(),
        })
}

fn optional_cell(row: &[String], col: Option<usize>) -> Option<String> {
    col.and_then(|c| row.get(c))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read the client ledger. Rows without a product name or a parsable year are skipped.
pub fn load_ledger(table: &Table, config: &ReconConfig) -> Result<Ledger, ReconError> {
    let keys = Keys { normalize: config.normalize };
    let headers = normalized_headers(table, &keys);
    let columns = &config.client.columns;
    let product_col = require(&headers, &keys, &columns.product, "client")?;
    let year_col = require(&headers, &keys, &columns.year, "client")?;

    let mut ledger = Ledger::default();
    for (index, row) in table.rows.iter().enumerate() {
        let product = keys.of(&row[product_col]);
        if product.is_empty() {
            ledger.warnings.push(ReconWarning::SkippedLedgerRow {
                row: index,
                reason: "missing product name".into(),
            });
            continue;
        }
        let raw_year = row[year_col].trim();
        let Some(year) = parse_year(raw_year) else {
            let reason = if raw_year.is_empty() {
                "missing year".to_string()
            } else {
                format!("invalid year '{raw_year}'")
            };
            ledger.warnings.push(ReconWarning::SkippedLedgerRow { row: index, reason });
            continue;
        };
        ledger.entries.push(SubscriptionEntry { product, year });
    }

    for warning in &ledger.warnings {
        tracing::warn!("{warning}");
    }
    Ok(ledger)
}

/// Read the master catalog. Rows without a title are skipped; a missing or
/// reversed window leaves `window` empty.
pub fn load_catalog(table: &Table, config: &ReconConfig) -> Result<Catalog, ReconError> {
    let keys = Keys { normalize: config.normalize };
    let headers = normalized_headers(table, &keys);
    let columns = &config.catalog.columns;
    let marker = config.catalog.marker.trim();

    let title_col = require(&headers, &keys, &columns.title, "catalog")?;
    let subject_col = require(&headers, &keys, &columns.subject_collection, "catalog")?;
    let start_col = require(&headers, &keys, &columns.window_start, "catalog")?;
    let end_col = require(&headers, &keys, &columns.window_end, "catalog")?;
    let status_col = headers.column(&keys.of(&columns.status));
    let acronym_col = headers.column(&keys.of(&columns.acronym));
    let issn_col = headers.column(&keys.of(&columns.issn));

    let mut catalog = Catalog {
        columns: headers.headers.iter().filter(|h| !h.is_empty()).cloned().collect(),
        ..Catalog::default()
    };

    for (index, row) in table.rows.iter().enumerate() {
        let title = keys.of(&row[title_col]);
        if title.is_empty() {
            catalog.warnings.push(ReconWarning::SkippedCatalogRow {
                row: index,
                reason: "missing title".into(),
            });
            continue;
        }

        let window = match (parse_year(&row[start_col]), parse_year(&row[end_col])) {
            (Some(start), Some(end)) => YearWindow::new(start, end),
            _ => None,
        };

        let markers = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.trim() == marker)
            .map(|(col, _)| headers.headers[col].clone())
            .filter(|h| !h.is_empty())
            .collect();

        catalog.rows.push(CatalogRow {
            index,
            title,
            subject_collection: keys.of(&row[subject_col]),
            window,
            status: optional_cell(row, status_col),
            acronym: optional_cell(row, acronym_col),
            issn: optional_cell(row, issn_col),
            markers,
        });
    }

    for warning in &catalog.warnings {
        tracing::warn!("{warning}");
    }
    Ok(catalog)
}

/// Header-only copy of `table` with every header in lookup form.
fn normalized_headers(table: &Table, keys: &Keys) -> Table {
    Table::new(table.headers.iter().map(|h| keys.of(h)).collect())
}

/// Load both input files named by `config`. Relative paths resolve against `base_dir`.
pub fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<LoadedInput, ReconError> {
    let client_path = base_dir.join(&config.client.file);
    let catalog_path = base_dir.join(&config.catalog.file);

    let client_table =
        read_table(&client_path, config.client.sheet.as_deref()).map_err(ReconError::Io)?;
    let catalog_table =
        read_table(&catalog_path, config.catalog.sheet.as_deref()).map_err(ReconError::Io)?;

    let ledger = load_ledger(&client_table, config)?;
    let catalog = load_catalog(&catalog_table, config)?;
    tracing::info!(
        ledger_entries = ledger.entries.len(),
        catalog_rows = catalog.rows.len(),
        "loaded inputs"
    );

    let mut load_warnings = ledger.warnings;
    load_warnings.extend(catalog.warnings);

    Ok(LoadedInput {
        input: ReconInput {
            ledger: ledger.entries,
            catalog: catalog.rows,
            catalog_columns: catalog.columns,
            load_warnings,
        },
        catalog: catalog_table,
    })
}

// Report tables built from a reconciliation result

use std::path::{Path, PathBuf};

use holdings_recon::config::OutputConfig;
use holdings_recon::years::join_ranges;
use holdings_recon::ReconResult;

use crate::table::{write_table, Table};

pub const SUBSCRIBE_PERIOD: &str = "Subscribe Period";
pub const PRODUCTS: &str = "Products";

/// Covered catalog rows in their original form, with the coverage columns appended.
pub fn annotated_table(catalog: &Table, result: &ReconResult, separator: &str) -> Table {
    let mut headers = catalog.headers.clone();
    headers.push(SUBSCRIBE_PERIOD.into());
    headers.push(PRODUCTS.into());

    let mut table = Table::new(headers);
    for row in &result.rows {
        let Some(original) = catalog.rows.get(row.index) else {
            continue;
        };
        let mut cells = original.clone();
        cells.push(join_ranges(&row.ranges));
        cells.push(row.products.join(separator));
        table.push_row(cells);
    }
    table
}

/// One row per title.
pub fn merged_table(result: &ReconResult) -> Table {
    let mut table = Table::new(
        ["Status", "Title", "Acronymn", "Platform ISSN", "During", "Product Names"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    );
    for title in &result.titles {
        table.push_row(vec![
            title.status.clone().unwrap_or_default(),
            title.title.clone(),
            title.acronym.clone().unwrap_or_default(),
            title.issn.clone().unwrap_or_default(),
            title.during(),
            title.product_names.clone(),
        ]);
    }
    table
}

pub fn invalid_table(result: &ReconResult) -> Table {
    let mut table = Table::new(vec!["Product Name".into(), "Reason".into()]);
    for invalid in &result.invalid {
        table.push_row(vec![invalid.product.clone(), invalid.reason.clone()]);
    }
    table
}

/// Write every output configured in `[output]`. Returns the paths written.
pub fn write_outputs(
    output: &OutputConfig,
    base_dir: &Path,
    catalog: &Table,
    result: &ReconResult,
) -> Result<Vec<PathBuf>, String> {
    let mut written = Vec::new();

    if let Some(ref file) = output.annotated {
        let path = base_dir.join(file);
        write_table(&annotated_table(catalog, result, &output.product_separator), &path)?;
        written.push(path);
    }
    if let Some(ref file) = output.merged {
        let path = base_dir.join(file);
        write_table(&merged_table(result), &path)?;
        written.push(path);
    }
    if let Some(ref file) = output.invalid {
        let path = base_dir.join(file);
        write_table(&invalid_table(result), &path)?;
        written.push(path);
    }
    if let Some(ref file) = output.json {
        let path = base_dir.join(file);
        crate::json::write_result(result, &path)?;
        written.push(path);
    }

    for path in &written {
        tracing::info!(path = %path.display(), "wrote output");
    }
    Ok(written)
}

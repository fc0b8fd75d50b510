use crate::aggregate::aggregate_by_title;
use crate::classify::{classify_ledger, CatalogIndex};
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{ReconInput, ReconMeta, ReconResult, ReconWarning};
use crate::resolve::resolve_coverage;

/// Run reconciliation per config: classify, resolve, merge, aggregate.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    let _span = tracing::info_span!("recon", name = %config.name).entered();

    let mut warnings: Vec<ReconWarning> = input.load_warnings.clone();

    // Classification
    let index = CatalogIndex::new(&input.catalog, &input.catalog_columns);
    let classification = classify_ledger(&input.ledger, &index, &config.products);
    tracing::info!(
        backfiles = classification.sets.backfiles.len(),
        packages = classification.sets.packages.len(),
        subscriptions = classification.sets.subscriptions.len(),
        invalid = classification.invalid.len(),
        "classified ledger products"
    );

    if let Some(first) = classification.invalid.first() {
        if config.strict {
            return Err(ReconError::Classification {
                product: first.product.clone(),
                reason: first.reason.clone(),
            });
        }
    }
    for invalid in &classification.invalid {
        tracing::warn!(product = %invalid.product, reason = %invalid.reason, "invalid product");
        warnings.push(ReconWarning::InvalidProduct {
            product: invalid.product.clone(),
            reason: invalid.reason.clone(),
        });
    }

    // Per-row coverage
    let resolution = resolve_coverage(&classification.products, &input.catalog, config.strict)?;
    warnings.extend(resolution.warnings);
    tracing::info!(
        catalog_rows = input.catalog.len(),
        covered_rows = resolution.rows.len(),
        "resolved coverage"
    );

    // Per-title merge
    let (titles, title_warnings) =
        aggregate_by_title(&resolution.rows, &config.output.product_separator);
    warnings.extend(title_warnings);

    let summary = compute_summary(
        input.catalog.len(),
        resolution.rows.len(),
        titles.len(),
        &classification.products,
        classification.invalid.len(),
        warnings.len(),
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows: resolution.rows,
        titles,
        invalid: classification.invalid,
        warnings,
    })
}

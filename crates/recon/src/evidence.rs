use crate::model::{ClassifiedProduct, ProductKind, ReconSummary};

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    catalog_rows: usize,
    covered_rows: usize,
    titles: usize,
    products: &[ClassifiedProduct],
    invalid_products: usize,
    warnings: usize,
) -> ReconSummary {
    let mut summary = ReconSummary {
        catalog_rows,
        covered_rows,
        titles,
        invalid_products,
        warnings,
        ..ReconSummary::default()
    };

    for p in products {
        match p.product.kind() {
            ProductKind::Subscription => summary.subscriptions += 1,
            ProductKind::Package => summary.packages += 1,
            ProductKind::Backfile => summary.backfiles += 1,
        }
    }

    summary
}

use crate::error::ReconError;
use crate::matcher::matching_rows;
use crate::model::{
    CatalogRow, ClassifiedProduct, Product, ProductKind, ReconWarning, RowCoverage,
};
use crate::years::{clamp_to_window, compress_to_ranges, YearSet};

/// Coverage gathered for one catalog row before clamping.
#[derive(Debug, Default, Clone)]
struct RowAccumulator {
    subscription_years: YearSet,
    package_years: YearSet,
    backfile_years: YearSet,
    /// (product, kind, years it offered this row), in resolution order.
    contributions: Vec<(String, ProductKind, YearSet)>,
}

impl RowAccumulator {
    fn add(&mut self, product: &Product, years: YearSet) {
        let target = match product.kind() {
            ProductKind::Subscription => &mut self.subscription_years,
            ProductKind::Package => &mut self.package_years,
            ProductKind::Backfile => &mut self.backfile_years,
        };
        target.extend(years.iter().copied());
        self.contributions.push((product.name().to_string(), product.kind(), years));
    }

    fn all_years(&self) -> YearSet {
        self.subscription_years
            .iter()
            .chain(&self.package_years)
            .chain(&self.backfile_years)
            .copied()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Resolution {
    /// Every catalog row with non-empty coverage, catalog order.
    pub rows: Vec<RowCoverage>,
    pub warnings: Vec<ReconWarning>,
}

/// Years a product offers one matched row.
///
/// Backfiles are cut to the row's own window here. Subscriptions and packages
/// hand over their full purchased set; clamping happens once, at merge.
pub fn product_years(product: &Product, row: &CatalogRow) -> YearSet {
    match product {
        Product::Backfile { range, .. } => row
            .window
            .and_then(|w| range.intersect(&w))
            .map(|w| w.years())
            .unwrap_or_default(),
        Product::Subscription { years, .. } | Product::Package { years, .. } => years.clone(),
    }
}

/// Resolve every product against the catalog and merge per row.
///
/// In strict mode a configured package that selects no rows halts the run.
pub fn resolve_coverage(
    products: &[ClassifiedProduct],
    catalog: &[CatalogRow],
    strict: bool,
) -> Result<Resolution, ReconError> {
    let mut acc: Vec<RowAccumulator> = vec![RowAccumulator::default(); catalog.len()];
    let mut warnings = Vec::new();

    for classified in products {
        let product = &classified.product;
        let positions = matching_rows(&classified.rule, catalog);

        if positions.is_empty() {
            if strict && product.kind() == ProductKind::Package {
                return Err(ReconError::EmptyMatch {
                    product: product.name().to_string(),
                    rule: classified.rule.to_string(),
                });
            }
            tracing::warn!(product = product.name(), rule = %classified.rule, "product matched no catalog rows");
            warnings.push(ReconWarning::EmptyMatch {
                product: product.name().to_string(),
                rule: classified.rule.to_string(),
            });
            continue;
        }

        tracing::debug!(product = product.name(), rows = positions.len(), "resolved");
        for pos in positions {
            acc[pos].add(product, product_years(product, &catalog[pos]));
        }
    }

    let mut rows = Vec::new();
    for (row, acc) in catalog.iter().zip(acc) {
        if acc.contributions.is_empty() {
            continue;
        }
        if row.window.is_none() {
            warnings.push(ReconWarning::DegenerateWindow {
                row: row.index,
                title: row.title.clone(),
            });
        }
        if let Some(coverage) = merge_row(row, &acc, &mut warnings) {
            rows.push(coverage);
        }
    }

    Ok(Resolution { rows, warnings })
}

/// Clamp the union of every contribution to the row's window.
/// Returns `None` when nothing survives.
fn merge_row(
    row: &CatalogRow,
    acc: &RowAccumulator,
    warnings: &mut Vec<ReconWarning>,
) -> Option<RowCoverage> {
    let years = clamp_to_window(&acc.all_years(), row.window);
    if years.is_empty() {
        return None;
    }

    let mut products: Vec<String> = Vec::new();
    let mut backfiles: Vec<String> = Vec::new();
    for (name, kind, offered) in &acc.contributions {
        if clamp_to_window(offered, row.window).is_empty() {
            continue;
        }
        if !products.contains(name) {
            products.push(name.clone());
        }
        if *kind == ProductKind::Backfile && !backfiles.contains(name) {
            backfiles.push(name.clone());
        }
    }

    if backfiles.len() > 1 {
        warnings.push(ReconWarning::BackfileOverlap {
            row: row.index,
            title: row.title.clone(),
            products: backfiles.clone(),
        });
    }

    Some(RowCoverage {
        index: row.index,
        title: row.title.clone(),
        subject_collection: row.subject_collection.clone(),
        window: row.window,
        status: row.status.clone(),
        acronym: row.acronym.clone(),
        issn: row.issn.clone(),
        ranges: compress_to_ranges(years.iter().copied()),
        products,
        backfiles,
        years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchRule;
    use crate::years::YearWindow;

    fn row(index: usize, title: &str, window: Option<(i32, i32)>, markers: &[&str]) -> CatalogRow {
        CatalogRow {
            index,
            title: title.into(),
            subject_collection: "Business".into(),
            window: window.and_then(|(s, e)| YearWindow::new(s, e)),
            status: None,
            acronym: None,
            issn: None,
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn years(ys: &[i32]) -> YearSet {
        ys.iter().copied().collect()
    }

    fn subscription(name: &str, ys: &[i32], rule: MatchRule) -> ClassifiedProduct {
        ClassifiedProduct {
            product: Product::Subscription { name: name.into(), years: years(ys) },
            rule,
        }
    }

    fn backfile(name: &str, range: (i32, i32), column: &str) -> ClassifiedProduct {
        ClassifiedProduct {
            product: Product::Backfile {
                name: name.into(),
                range: YearWindow::new(range.0, range.1).unwrap(),
            },
            rule: MatchRule::Marker { column: column.into() },
        }
    }

    #[test]
    fn subscription_clamped_to_row_window() {
        let catalog = vec![row(0, "Management Decision", Some((2004, 2008)), &[])];
        let products = vec![subscription(
            "Management Decision",
            &[2005, 2006, 2010],
            MatchRule::Title("Management Decision".into()),
        )];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows.len(), 1);
        assert_eq!(res.rows[0].ranges, vec!["2005~2006"]);
        assert_eq!(res.rows[0].products, vec!["Management Decision"]);
    }

    #[test]
    fn additions_backfile_cut_to_window() {
        let catalog = vec![row(0, "Kybernetes", Some((2000, 2013)), &["Emerald Backfiles Additions"])];
        let products = vec![backfile(
            "Emerald Backfiles Additions",
            (1994, 2013),
            "Emerald Backfiles Additions",
        )];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows[0].years, (2000..=2013).collect::<YearSet>());
        assert_eq!(res.rows[0].ranges, vec!["2000~2013"]);
        assert_eq!(res.rows[0].backfiles, vec!["Emerald Backfiles Additions"]);
    }

    #[test]
    fn backfiles_union_and_flag_overlap() {
        let catalog = vec![row(
            3,
            "Kybernetes",
            Some((1990, 2020)),
            &["Emerald Backfiles", "Emerald Backfiles Additions"],
        )];
        let products = vec![
            backfile("Emerald Backfiles", (0, 2006), "Emerald Backfiles"),
            backfile("Emerald Backfiles Additions", (1994, 2013), "Emerald Backfiles Additions"),
        ];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows[0].ranges, vec!["1990~2013"]);
        assert!(res.warnings.iter().any(|w| matches!(
            w,
            ReconWarning::BackfileOverlap { row: 3, products, .. } if products.len() == 2
        )));
    }

    #[test]
    fn union_of_kinds_then_clamp() {
        let catalog = vec![row(0, "Kybernetes", Some((2000, 2012)), &["Premier", "Emerald Backfiles"])];
        let products = vec![
            backfile("Emerald Backfiles", (0, 2006), "Emerald Backfiles"),
            ClassifiedProduct {
                product: Product::Package { name: "Premier".into(), years: years(&[2010, 2011, 2015]) },
                rule: MatchRule::Marker { column: "Premier".into() },
            },
            subscription("Business", &[2008], MatchRule::SubjectCollection("Business".into())),
        ];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows[0].ranges, vec!["2000~2006", "2008", "2010~2011"]);
        assert_eq!(res.rows[0].products, vec!["Emerald Backfiles", "Premier", "Business"]);
    }

    #[test]
    fn rows_with_empty_coverage_are_dropped() {
        let catalog = vec![
            row(0, "Old", Some((1980, 1990)), &[]),
            row(1, "Current", Some((2000, 2020)), &[]),
        ];
        let products = vec![subscription(
            "Business",
            &[2005],
            MatchRule::SubjectCollection("Business".into()),
        )];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows.len(), 1);
        assert_eq!(res.rows[0].title, "Current");
    }

    #[test]
    fn missing_window_warns_and_contributes_nothing() {
        let catalog = vec![row(7, "Undated", None, &[])];
        let products = vec![subscription("Undated", &[2005], MatchRule::Title("Undated".into()))];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert!(res.rows.is_empty());
        assert_eq!(
            res.warnings,
            vec![ReconWarning::DegenerateWindow { row: 7, title: "Undated".into() }]
        );
    }

    #[test]
    fn product_outside_window_not_listed() {
        let catalog = vec![row(0, "Kybernetes", Some((2010, 2020)), &["Emerald Backfiles"])];
        let products = vec![
            backfile("Emerald Backfiles", (0, 2006), "Emerald Backfiles"),
            subscription("Kybernetes", &[2012], MatchRule::Title("Kybernetes".into())),
        ];

        let res = resolve_coverage(&products, &catalog, false).unwrap();
        assert_eq!(res.rows[0].products, vec!["Kybernetes"]);
        assert!(res.rows[0].backfiles.is_empty());
    }

    #[test]
    fn empty_match_warns_unless_strict_package() {
        let catalog = vec![row(0, "Kybernetes", Some((2000, 2020)), &[])];
        let package = ClassifiedProduct {
            product: Product::Package { name: "Premier".into(), years: years(&[2010]) },
            rule: MatchRule::Marker { column: "Premier".into() },
        };

        let res = resolve_coverage(std::slice::from_ref(&package), &catalog, false).unwrap();
        assert!(res.rows.is_empty());
        assert!(matches!(res.warnings[0], ReconWarning::EmptyMatch { .. }));

        let err = resolve_coverage(&[package], &catalog, true).unwrap_err();
        assert!(matches!(err, ReconError::EmptyMatch { .. }));
    }
}

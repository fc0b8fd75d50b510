use std::collections::BTreeMap;

use crate::model::{ReconWarning, RowCoverage, TitleCoverage};
use crate::years::{compress_to_ranges, YearSet};

/// Group covered rows by title, merge their years and product names.
///
/// Status, acronym and ISSN come from the first member row; any disagreement
/// inside a group is reported as [`ReconWarning::InconsistentTitle`].
pub fn aggregate_by_title(
    rows: &[RowCoverage],
    separator: &str,
) -> (Vec<TitleCoverage>, Vec<ReconWarning>) {
    let mut groups: BTreeMap<&str, Vec<&RowCoverage>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.title.as_str()).or_default().push(row);
    }

    let mut titles = Vec::with_capacity(groups.len());
    let mut warnings = Vec::new();

    for (title, members) in groups {
        let first = members[0];

        let fields: [(&str, fn(&RowCoverage) -> Option<&String>); 3] = [
            ("status", |r| r.status.as_ref()),
            ("acronym", |r| r.acronym.as_ref()),
            ("issn", |r| r.issn.as_ref()),
        ];
        for (field, get) in fields {
            let mut values: Vec<String> = Vec::new();
            for member in &members {
                let value = get(member).cloned().unwrap_or_default();
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            if values.len() > 1 {
                tracing::warn!(title, field, "descriptive field differs across rows");
                warnings.push(ReconWarning::InconsistentTitle {
                    title: title.to_string(),
                    field: field.to_string(),
                    values,
                });
            }
        }

        let years: YearSet = members.iter().flat_map(|m| m.years.iter().copied()).collect();

        let mut products: Vec<String> = Vec::new();
        for member in &members {
            for name in &member.products {
                if !products.contains(name) {
                    products.push(name.clone());
                }
            }
        }

        titles.push(TitleCoverage {
            title: title.to_string(),
            status: first.status.clone(),
            acronym: first.acronym.clone(),
            issn: first.issn.clone(),
            ranges: compress_to_ranges(years),
            product_names: products.join(separator),
            products,
            rows: members.iter().map(|m| m.index).collect(),
        });
    }

    (titles, warnings)
}

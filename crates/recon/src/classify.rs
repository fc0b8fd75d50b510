use std::collections::{BTreeMap, BTreeSet};

use crate::config::ProductsConfig;
use crate::model::{
    CatalogRow, ClassifiedProduct, InvalidProduct, MatchRule, Product, ProductKind,
    SubscriptionEntry,
};
use crate::years::YearSet;

/// Read-only view of the catalog used to pick a matching rule. Built once per run.
pub struct CatalogIndex<'a> {
    subject_collections: BTreeSet<&'a str>,
    titles: BTreeSet<&'a str>,
    columns: &'a BTreeSet<String>,
}

impl<'a> CatalogIndex<'a> {
    pub fn new(catalog: &'a [CatalogRow], columns: &'a BTreeSet<String>) -> Self {
        Self {
            subject_collections: catalog.iter().map(|r| r.subject_collection.as_str()).collect(),
            titles: catalog.iter().map(|r| r.title.as_str()).collect(),
            columns,
        }
    }

    pub fn has_subject_collection(&self, name: &str) -> bool {
        self.subject_collections.contains(name)
    }

    pub fn has_title(&self, name: &str) -> bool {
        self.titles.contains(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}

/// The three disjoint name sets derived from the distinct ledger product names.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameSets {
    pub backfiles: BTreeSet<String>,
    pub packages: BTreeSet<String>,
    pub subscriptions: BTreeSet<String>,
}

impl NameSets {
    /// Backfile keywords win over the package list; everything else is a subscription.
    pub fn from_names<I, S>(names: I, products: &ProductsConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sets = NameSets::default();
        for name in names {
            let name = name.as_ref();
            if products.is_backfile_name(name) {
                sets.backfiles.insert(name.to_string());
            } else if products.packages.iter().any(|p| p == name) {
                sets.packages.insert(name.to_string());
            } else {
                sets.subscriptions.insert(name.to_string());
            }
        }
        sets
    }

    pub fn kind_of(&self, name: &str) -> Option<ProductKind> {
        if self.backfiles.contains(name) {
            Some(ProductKind::Backfile)
        } else if self.packages.contains(name) {
            Some(ProductKind::Package)
        } else if self.subscriptions.contains(name) {
            Some(ProductKind::Subscription)
        } else {
            None
        }
    }
}

/// Distinct purchased years per product name.
pub fn purchased_years(ledger: &[SubscriptionEntry]) -> BTreeMap<String, YearSet> {
    let mut years: BTreeMap<String, YearSet> = BTreeMap::new();
    for entry in ledger {
        years.entry(entry.product.clone()).or_default().insert(entry.year);
    }
    years
}

/// Pick the product variant and matching rule for one ledger product name.
pub fn classify_product(
    name: &str,
    years: &YearSet,
    sets: &NameSets,
    index: &CatalogIndex<'_>,
    products: &ProductsConfig,
) -> Result<ClassifiedProduct, InvalidProduct> {
    let kind = sets.kind_of(name).unwrap_or(ProductKind::Subscription);
    let invalid = |reason: String| InvalidProduct {
        product: name.to_string(),
        kind,
        reason,
    };

    match kind {
        ProductKind::Backfile => {
            let range = products.backfile.range_for(name).ok_or_else(|| {
                invalid("backfile year range is reversed".into())
            })?;
            let rule = backfile_rule(name, index).ok_or_else(|| {
                invalid("no backfile column or subject collection for this name".into())
            })?;
            Ok(ClassifiedProduct {
                product: Product::Backfile { name: name.to_string(), range },
                rule,
            })
        }
        ProductKind::Package => {
            if !index.has_column(name) {
                return Err(invalid("no catalog column named after this package".into()));
            }
            Ok(ClassifiedProduct {
                product: Product::Package { name: name.to_string(), years: years.clone() },
                rule: MatchRule::Marker { column: name.to_string() },
            })
        }
        ProductKind::Subscription => {
            let rule = if index.has_subject_collection(name) {
                MatchRule::SubjectCollection(name.to_string())
            } else if index.has_title(name) {
                MatchRule::Title(name.to_string())
            } else {
                return Err(invalid("matches no subject collection or title".into()));
            };
            Ok(ClassifiedProduct {
                product: Product::Subscription { name: name.to_string(), years: years.clone() },
                rule,
            })
        }
    }
}

/// Backfile rows: a column named after the product itself, else the
/// `"<Subject Collection> Backfiles"` column, else the subject collection.
fn backfile_rule(name: &str, index: &CatalogIndex<'_>) -> Option<MatchRule> {
    if index.has_column(name) {
        return Some(MatchRule::Marker { column: name.to_string() });
    }

    let (subject, _) = name.rsplit_once(' ')?;
    let subject = subject.trim_end();
    if subject.is_empty() {
        return None;
    }

    let column = format!("{subject} Backfiles");
    if index.has_column(&column) {
        return Some(MatchRule::Marker { column });
    }
    if index.has_subject_collection(subject) {
        return Some(MatchRule::SubjectCollection(subject.to_string()));
    }
    None
}

#[derive(Debug, Default)]
pub struct Classification {
    pub sets: NameSets,
    /// Classified products, ordered by name.
    pub products: Vec<ClassifiedProduct>,
    pub invalid: Vec<InvalidProduct>,
}

/// Classify every distinct product name in the ledger.
pub fn classify_ledger(
    ledger: &[SubscriptionEntry],
    index: &CatalogIndex<'_>,
    products: &ProductsConfig,
) -> Classification {
    let years = purchased_years(ledger);
    let sets = NameSets::from_names(years.keys(), products);

    let mut out = Classification::default();
    for (name, years) in &years {
        match classify_product(name, years, &sets, index, products) {
            Ok(classified) => {
                tracing::debug!(product = %name, kind = %classified.product.kind(), rule = %classified.rule, "classified");
                out.products.push(classified);
            }
            Err(invalid) => {
                tracing::debug!(product = %name, reason = %invalid.reason, "unclassified");
                out.invalid.push(invalid);
            }
        }
    }
    out.sets = sets;
    out
}

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::years::{Year, YearSet, YearWindow};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One title in the master catalog. Text fields are already normalized.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    /// Position in the catalog table (0-based, header excluded).
    pub index: usize,
    pub title: String,
    pub subject_collection: String,
    /// Online-availability window. `None` when missing or reversed.
    pub window: Option<YearWindow>,
    pub status: Option<String>,
    pub acronym: Option<String>,
    pub issn: Option<String>,
    /// Names of marker columns (packages, backfiles) flagged on this row.
    pub markers: BTreeSet<String>,
}

impl CatalogRow {
    pub fn has_marker(&self, column: &str) -> bool {
        self.markers.contains(column)
    }
}

/// One client ledger entry: a product purchased for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub product: String,
    pub year: Year,
}

/// Pre-loaded ledger and catalog.
#[derive(Debug, Default)]
pub struct ReconInput {
    pub ledger: Vec<SubscriptionEntry>,
    pub catalog: Vec<CatalogRow>,
    /// Every catalog column header (normalized). Marker columns are looked up here.
    pub catalog_columns: BTreeSet<String>,
    /// Non-fatal conditions raised while loading.
    pub load_warnings: Vec<ReconWarning>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Backfile,
    Subscription,
    Package,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backfile => write!(f, "backfile"),
            Self::Subscription => write!(f, "subscription"),
            Self::Package => write!(f, "package"),
        }
    }
}

/// A purchased offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Product {
    /// Retroactive access to a fixed range; ledger years are ignored.
    Backfile { name: String, range: YearWindow },
    /// Covers exactly the purchased years.
    Subscription { name: String, years: YearSet },
    /// Covers the purchased years on every row flagged in its marker column.
    Package { name: String, years: YearSet },
}

impl Product {
    pub fn name(&self) -> &str {
        match self {
            Self::Backfile { name, .. }
            | Self::Subscription { name, .. }
            | Self::Package { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ProductKind {
        match self {
            Self::Backfile { .. } => ProductKind::Backfile,
            Self::Subscription { .. } => ProductKind::Subscription,
            Self::Package { .. } => ProductKind::Package,
        }
    }
}

/// How a product selects catalog rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Rows whose `column` carries the marker.
    Marker { column: String },
    /// Rows whose subject collection equals the value.
    SubjectCollection(String),
    /// Rows whose title equals the value.
    Title(String),
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker { column } => write!(f, "marker column '{column}'"),
            Self::SubjectCollection(s) => write!(f, "subject collection '{s}'"),
            Self::Title(t) => write!(f, "title '{t}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedProduct {
    pub product: Product,
    pub rule: MatchRule,
}

/// A ledger product name that no matching strategy accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidProduct {
    pub product: String,
    pub kind: ProductKind,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

/// Resolved coverage for one catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct RowCoverage {
    pub index: usize,
    pub title: String,
    pub subject_collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<YearWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    /// Disjoint ascending range labels after clamping to the window.
    pub ranges: Vec<String>,
    /// Contributing product names, first-seen order, no duplicates.
    pub products: Vec<String>,
    /// Backfile products that contributed, a subset of `products`.
    pub backfiles: Vec<String>,
    #[serde(skip)]
    pub years: YearSet,
}

/// Coverage merged across every row sharing a title.
#[derive(Debug, Clone, Serialize)]
pub struct TitleCoverage {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    pub ranges: Vec<String>,
    pub products: Vec<String>,
    /// `products` joined with the configured separator.
    pub product_names: String,
    /// Catalog indices of the member rows.
    pub rows: Vec<usize>,
}

impl TitleCoverage {
    /// Bracketed range list, e.g. `[2005~2006, 2008]`.
    pub fn during(&self) -> String {
        format!("[{}]", self.ranges.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Non-fatal conditions collected into the side report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconWarning {
    /// Product name fits no matching strategy; it contributes nothing.
    InvalidProduct { product: String, reason: String },
    /// Classified product selected zero catalog rows.
    EmptyMatch { product: String, rule: String },
    /// Matched row has a missing or reversed availability window.
    DegenerateWindow { row: usize, title: String },
    /// Row received more than one backfile product; year sets were unioned.
    BackfileOverlap { row: usize, title: String, products: Vec<String> },
    /// Rows sharing a title disagree on a descriptive field; the first row wins.
    InconsistentTitle { title: String, field: String, values: Vec<String> },
    /// Loader dropped a ledger row.
    SkippedLedgerRow { row: usize, reason: String },
    /// Loader dropped a catalog row.
    SkippedCatalogRow { row: usize, reason: String },
}

impl fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProduct { product, reason } => {
                write!(f, "invalid product '{product}': {reason}")
            }
            Self::EmptyMatch { product, rule } => {
                write!(f, "product '{product}' matched no catalog rows ({rule})")
            }
            Self::DegenerateWindow { row, title } => {
                write!(f, "catalog row {row} '{title}': missing or reversed online window")
            }
            Self::BackfileOverlap { row, title, products } => write!(
                f,
                "catalog row {row} '{title}': {} backfiles overlap ({}), years unioned",
                products.len(),
                products.join(", ")
            ),
            Self::InconsistentTitle { title, field, values } => write!(
                f,
                "title '{title}': {field} differs across rows ({}), using first",
                values.join(" | ")
            ),
            Self::SkippedLedgerRow { row, reason } => write!(f, "ledger row {row} skipped: {reason}"),
            Self::SkippedCatalogRow { row, reason } => {
                write!(f, "catalog row {row} skipped: {reason}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconSummary {
    pub catalog_rows: usize,
    pub covered_rows: usize,
    pub titles: usize,
    pub subscriptions: usize,
    pub packages: usize,
    pub backfiles: usize,
    pub invalid_products: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    /// Covered catalog rows, catalog order.
    pub rows: Vec<RowCoverage>,
    /// Per-title merge, sorted by title.
    pub titles: Vec<TitleCoverage>,
    pub invalid: Vec<InvalidProduct>,
    pub warnings: Vec<ReconWarning>,
}

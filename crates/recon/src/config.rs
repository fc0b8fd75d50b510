use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ReconError;
use crate::years::{Year, YearWindow};

/// Package and portfolio titles sold as bundles. Normalized at load like every other name.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "Management Core",
    "Industry & Public Sector",
    "Community College Collection",
    "Further Education College Collection",
    "Management eJournal Portfolio",
    "Engineering, Computing & Technology eJournal Portfolio",
    "Emerald Full Text + FullText",
    "Emerald Fulltext Plus",
    "Emerald Management 111",
    "Emerald Management 120",
    "Emerald Management 125",
    "Emerald Management 140",
    "Emerald Management 150",
    "Emerald Management 160",
    "Emerald Management 175",
    "Emerald Management 200",
    "Premier",
];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    /// Halt on the first unclassifiable product instead of reporting it.
    #[serde(default)]
    pub strict: bool,
    /// Apply the text normalizer to names and headers at load time.
    #[serde(default = "default_true")]
    pub normalize: bool,
    pub client: ClientConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub products: ProductsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: ClientColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientColumns {
    #[serde(default = "default_product_column")]
    pub product: String,
    #[serde(default = "default_year_column")]
    pub year: String,
}

fn default_product_column() -> String {
    "Product Name".into()
}

fn default_year_column() -> String {
    "Sub Year".into()
}

impl Default for ClientColumns {
    fn default() -> Self {
        Self {
            product: default_product_column(),
            year: default_year_column(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    /// Cell value that flags a row in a marker column.
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub columns: CatalogColumns,
}

fn default_marker() -> String {
    "*".into()
}

/// Catalog column names. `status`, `acronym` and `issn` may be absent from the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    pub title: String,
    pub subject_collection: String,
    pub window_start: String,
    pub window_end: String,
    pub status: String,
    pub acronym: String,
    pub issn: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            title: "Title".into(),
            subject_collection: "Subject Collection".into(),
            window_start: "Online date, start".into(),
            window_end: "Online date, End".into(),
            status: "Status".into(),
            acronym: "Acronymn".into(),
            issn: "Platform ISSN".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Product classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductsConfig {
    pub packages: Vec<String>,
    /// Case-insensitive substrings marking a backfile product.
    pub backfile_keywords: Vec<String>,
    pub backfile: BackfileConfig,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            packages: DEFAULT_PACKAGES.iter().map(|s| s.to_string()).collect(),
            backfile_keywords: vec!["backfile".into()],
            backfile: BackfileConfig::default(),
        }
    }
}

impl ProductsConfig {
    pub fn is_backfile_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.backfile_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

/// Fixed year ranges granted by backfile products.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackfileConfig {
    pub additions_keyword: String,
    pub additions: (Year, Year),
    pub standard: (Year, Year),
}

impl Default for BackfileConfig {
    fn default() -> Self {
        Self {
            additions_keyword: "Additions".into(),
            additions: (1994, 2013),
            standard: (0, 2006),
        }
    }
}

impl BackfileConfig {
    /// Range granted to a backfile product, chosen by name.
    pub fn range_for(&self, name: &str) -> Option<YearWindow> {
        let (start, end) = if name.contains(&self.additions_keyword) {
            self.additions
        } else {
            self.standard
        };
        YearWindow::new(start, end)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Covered catalog rows with their coverage columns appended.
    #[serde(default)]
    pub annotated: Option<String>,
    /// One row per title.
    #[serde(default)]
    pub merged: Option<String>,
    /// Product names that could not be classified.
    #[serde(default)]
    pub invalid: Option<String>,
    /// Full result as JSON.
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default = "default_separator")]
    pub product_separator: String,
}

fn default_separator() -> String {
    " #".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            annotated: None,
            merged: None,
            invalid: None,
            json: None,
            product_separator: default_separator(),
        }
    }
}

const TABLE_EXTENSIONS: &[&str] = &["xlsx", "csv", "json"];

/// Bounds for configured backfile years.
pub const MIN_YEAR: Year = 0;
pub const MAX_YEAR: Year = 9999;

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.client.file.trim().is_empty() || self.catalog.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "client.file and catalog.file are required".into(),
            ));
        }

        let c = &self.client.columns;
        let m = &self.catalog.columns;
        let required = [
            ("client.columns.product", &c.product),
            ("client.columns.year", &c.year),
            ("catalog.columns.title", &m.title),
            ("catalog.columns.subject_collection", &m.subject_collection),
            ("catalog.columns.window_start", &m.window_start),
            ("catalog.columns.window_end", &m.window_end),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        if self.catalog.marker.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "catalog.marker must not be empty".into(),
            ));
        }

        let bf = &self.products.backfile;
        for (key, (start, end)) in [("additions", bf.additions), ("standard", bf.standard)] {
            for year in [start, end] {
                if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                    return Err(ReconError::ConfigValidation(format!(
                        "products.backfile.{key}: year {year} outside {MIN_YEAR}..={MAX_YEAR}"
                    )));
                }
            }
            if start > end {
                return Err(ReconError::ConfigValidation(format!(
                    "products.backfile.{key}: start {start} is after end {end}"
                )));
            }
        }

        if self.products.backfile_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(
                "products.backfile_keywords needs at least one keyword".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for name in &self.products.packages {
            if !seen.insert(name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate package name '{name}'"
                )));
            }
        }

        let out = &self.output;
        for (key, path) in [
            ("annotated", &out.annotated),
            ("merged", &out.merged),
            ("invalid", &out.invalid),
        ] {
            if let Some(path) = path {
                check_extension(key, path, TABLE_EXTENSIONS)?;
            }
        }
        if let Some(ref path) = out.json {
            check_extension("json", path, &["json"])?;
        }

        Ok(())
    }
}

fn check_extension(key: &str, path: &str, allowed: &[&str]) -> Result<(), ReconError> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ReconError::ConfigValidation(format!(
            "output.{key}: unsupported extension '{ext}' (expected one of: {})",
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad range, empty column name, etc.).
    ConfigValidation(String),
    /// Product name fits no matching strategy (strict runs only).
    Classification { product: String, reason: String },
    /// Configured package matched no catalog rows (strict runs only).
    EmptyMatch { product: String, rule: String },
    /// Missing required column in an input table.
    MissingColumn { table: String, column: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Classification { product, reason } => {
                write!(f, "cannot classify product '{product}': {reason}")
            }
            Self::EmptyMatch { product, rule } => {
                write!(f, "product '{product}' matched no catalog rows ({rule})")
            }
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

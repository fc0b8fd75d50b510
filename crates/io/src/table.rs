// Header + rows view over a CSV file or one spreadsheet sheet

use std::path::Path;

/// A rectangular text table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Build from raw records: the first record is the header row.
    /// Short rows are padded, cells beyond the header are dropped, and
    /// fully blank rows are skipped.
    pub fn from_records(records: Vec<Vec<String>>) -> Self {
        let mut records = records.into_iter();
        let headers: Vec<String> = match records.next() {
            Some(h) => h.into_iter().map(|c| c.trim().to_string()).collect(),
            None => return Self::default(),
        };
        let mut table = Self::new(headers);
        for record in records {
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            table.push_row(record);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Position of the first header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Delimited text. `None` sniffs the delimiter on read.
    Delimited(Option<u8>),
    Spreadsheet,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Delimited(None)),
            "tsv" => Ok(Self::Delimited(Some(b'\t'))),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "json" => Ok(Self::Json),
            "" => Err(format!("{}: file has no extension", path.display())),
            other => Err(format!("{}: unsupported file type '.{other}'", path.display())),
        }
    }
}

/// Read a table, choosing the reader by file extension.
/// `sheet` selects a worksheet in spreadsheet files (first sheet when `None`).
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Delimited(None) => crate::csv::read(path)?,
        TableFormat::Delimited(Some(delimiter)) => crate::csv::read_with_delimiter(path, delimiter)?,
        TableFormat::Spreadsheet => crate::xlsx::read(path, sheet)?,
        TableFormat::Json => return Err(format!("{}: JSON is an output-only format", path.display())),
    };
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "read table"
    );
    Ok(table)
}

/// Write a table, choosing the writer by file extension.
pub fn write_table(table: &Table, path: &Path) -> Result<(), String> {
    match TableFormat::from_path(path)? {
        TableFormat::Delimited(delimiter) => crate::csv::write(table, path, delimiter.unwrap_or(b',')),
        TableFormat::Spreadsheet => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if !ext.eq_ignore_ascii_case("xlsx") {
                return Err(format!("{}: only .xlsx spreadsheets can be written", path.display()));
            }
            crate::xlsx::write(table, path, "Sheet1")
        }
        TableFormat::Json => crate::json::write_table(table, path),
    }?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn from_records_pads_and_skips_blank() {
        let table = Table::from_records(vec![
            rec(&[" Title ", "Year"]),
            rec(&["Kybernetes"]),
            rec(&["", "  "]),
            rec(&["Library Hi Tech", "2005", "extra"]),
        ]);
        assert_eq!(table.headers, vec!["Title", "Year"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["Kybernetes", ""]);
        assert_eq!(table.rows[1], vec!["Library Hi Tech", "2005"]);
    }

    #[test]
    fn column_and_cell_lookup() {
        let table = Table::from_records(vec![rec(&["A", "B"]), rec(&["1", "2"])]);
        assert_eq!(table.column("B"), Some(1));
        assert_eq!(table.column("C"), None);
        assert_eq!(table.cell(0, 1), "2");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn empty_records_give_empty_table() {
        let table = Table::from_records(Vec::new());
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")), Ok(TableFormat::Delimited(None)));
        assert_eq!(TableFormat::from_path(Path::new("a.tsv")), Ok(TableFormat::Delimited(Some(b'\t'))));
        assert_eq!(TableFormat::from_path(Path::new("a.xls")), Ok(TableFormat::Spreadsheet));
        assert_eq!(TableFormat::from_path(Path::new("a.json")), Ok(TableFormat::Json));
        assert!(TableFormat::from_path(Path::new("a.pdf")).is_err());
        assert!(TableFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn json_is_not_readable() {
        let err = read_table(Path::new("out.json"), None).unwrap_err();
        assert!(err.contains("output-only"));
    }
}

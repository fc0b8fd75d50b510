// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use holdings_recon::ReconResult;

use crate::table::Table;

/// Export a table as a JSON array of arrays, header row first.
pub fn write_table(table: &Table, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let writer = BufWriter::new(file);

    let mut rows: Vec<&Vec<String>> = Vec::with_capacity(table.len() + 1);
    rows.push(&table.headers);
    rows.extend(table.rows.iter());

    serde_json::to_writer_pretty(writer, &rows).map_err(|e| e.to_string())?;
    Ok(())
}

/// Export the full reconciliation result.
pub fn write_result(result: &ReconResult, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, result).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_table_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");

        let mut table = Table::new(vec!["Product Name".into(), "Reason".into()]);
        table.push_row(vec!["Unknown Journal".into(), "matches nothing".into()]);

        write_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Vec<String>> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], vec!["Product Name", "Reason"]);
        assert_eq!(parsed[1], vec!["Unknown Journal", "matches nothing"]);
    }
}

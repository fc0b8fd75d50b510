// Excel/ODS import via calamine, XLSX export via rust_xlsxwriter

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use crate::table::Table;

/// Excel's 1900 date system counts days from this epoch (after the leap-year bug).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest row count an .xlsx sheet can hold, header included.
const MAX_ROWS: usize = 1_048_576;

/// Read one sheet as a table. `sheet` names the worksheet; the first sheet is used when `None`.
pub fn read(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file {}: {}", path.display(), e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "{}: no sheet named '{}' (sheets: {})",
                    path.display(),
                    wanted,
                    sheet_names.join(", ")
                )
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| format!("{}: Excel file contains no sheets", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", name, e))?;

    let records: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    tracing::debug!(path = %path.display(), sheet = %name, rows = records.len(), "read sheet");
    Ok(Table::from_records(records))
}

/// Render a cell the way it would appear in a CSV export of the sheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// ISO date for an Excel serial day number; falls back to the number itself.
fn serial_to_date(serial: f64) -> String {
    let (y, m, d) = EXCEL_EPOCH;
    if serial >= 0.0 {
        let date = chrono::NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|epoch| epoch.checked_add_days(chrono::Days::new(serial.floor() as u64)));
        if let Some(date) = date {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    format!("{}", serial)
}

/// Write a table to a single-sheet workbook with a bold, frozen, filterable header row.
pub fn write(table: &Table, path: &Path, sheet_name: &str) -> Result<(), String> {
    if table.len() + 1 > MAX_ROWS {
        return Err(format!(
            "{}: {} rows exceed the XLSX sheet limit",
            path.display(),
            table.len()
        ));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", sheet_name, e))?;

    let header = Format::new().set_bold();
    for (col, name) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let target = (r + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let written = match plain_integer(value) {
                Some(n) => worksheet.write_number(target, col as u16, n),
                None => worksheet.write_string(target, col as u16, value),
            };
            written.map_err(|e| format!("Failed to write cell ({}, {}): {}", target, col, e))?;
        }
    }

    if !table.headers.is_empty() {
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| format!("Failed to freeze header: {}", e))?;
        worksheet
            .autofilter(0, 0, table.len() as u32, (table.headers.len() - 1) as u16)
            .map_err(|e| format!("Failed to set autofilter: {}", e))?;
        worksheet.autofit();
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}

/// Whole numbers like years are written as numbers; codes with leading zeros stay text.
fn plain_integer(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty()
        || digits.len() > 15
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    value.parse::<i64>().ok().map(|n| n as f64)
}

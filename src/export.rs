use crate::csv::escape_field;
use crate::record::Record;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

/// Collect the union of field names across a record set, sorted, so every
/// exported row gets the same column layout.
pub fn collect_headers(records: &[Record]) -> Vec<String> {
    let mut headers: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        for key in record.fields.keys() {
            headers.insert(key);
        }
    }
    headers.into_iter().map(String::from).collect()
}

/// Render a record set as delimited text.
///
/// Values containing the delimiter, quotes, or newlines are escaped the
/// same way the import path expects them.
///
/// # Arguments
/// * `headers` - Column order for the output
/// * `records` - The record set; missing fields render empty
/// * `delimiter` - Output field separator
///
/// # Returns
/// * `String` - Header line plus one line per record
pub fn to_csv(headers: &[String], records: &[Record], delimiter: char) -> String {
    let mut out = String::new();

    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(&escape_field(header, delimiter));
    }
    out.push('\n');

    for record in records {
        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            let value = record.get(header).unwrap_or("");
            out.push_str(&escape_field(value, delimiter));
        }
        out.push('\n');
    }

    out
}

/// Write a record set as an XLSX workbook with a bold header row.
///
/// # Arguments
/// * `headers` - Column order for the sheet
/// * `records` - The record set
/// * `path` - Destination `.xlsx` path
pub fn to_xlsx(
    headers: &[String],
    records: &[Record],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, header) in headers.iter().enumerate() {
            let value = record.get(header).unwrap_or("");
            worksheet.write_string((row + 1) as u32, col as u16, value)?;
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

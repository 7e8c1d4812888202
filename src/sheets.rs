use crate::config::SheetsConfig;
use crate::record::Record;
use serde::Deserialize;

/// Shape of a Google Sheets `values` response: the header row followed by
/// the data rows.
#[derive(Debug, Deserialize)]
pub struct ValuesResponse {
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Build the values-range URL for one sheet tab.
///
/// `GET {base}/{spreadsheet_id}/values/{tab}!{range}?key={api_key}`
pub fn values_url(config: &SheetsConfig, tab: &str) -> String {
    format!(
        "{}/{}/values/{}!{}?key={}",
        config.base_url, config.spreadsheet_id, tab, config.range, config.api_key
    )
}

/// Map a values response into records, using the first row as field names.
///
/// The API omits trailing empty cells, so short rows are padded with empty
/// strings; rows longer than the header are truncated to it. An empty
/// response yields an empty set.
pub fn values_to_records(response: ValuesResponse) -> Vec<Record> {
    let mut rows = response.values.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row,
        None => return Vec::new(),
    };

    rows.map(|row| {
        Record::from_pairs(headers.iter().cloned().zip(
            row.into_iter()
                .chain(std::iter::repeat(String::new()))
                .take(headers.len()),
        ))
    })
    .collect()
}

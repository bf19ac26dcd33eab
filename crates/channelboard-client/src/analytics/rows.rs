use std::collections::HashMap;

use tracing::debug;

use crate::{ClientError, ClientResult};

/// One CSV data line keyed by the header row. Columns may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Parses report text with header-row inference.
///
/// Short records simply lack their trailing columns, surplus cells are
/// dropped and records whose cells are all blank are skipped.
pub fn parse_rows(content: &str) -> ClientResult<Vec<RawRow>> {
    if content.trim().is_empty() {
        return Err(ClientError::invalid_report("Report file is empty."));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| ClientError::invalid_report("CSV header row is missing or unreadable."))?
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<String>>();

    if headers.iter().all(|name| name.trim().is_empty()) {
        return Err(ClientError::invalid_report(
            "CSV header row has no column names.",
        ));
    }

    let mut rows = Vec::new();
    let mut skipped = 0_usize;
    for (line_index, result_record) in reader.records().enumerate() {
        let record = result_record.map_err(|_| {
            ClientError::invalid_report(&format!(
                "CSV data row {} is malformed or not UTF-8.",
                line_index + 1
            ))
        })?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            skipped += 1;
            continue;
        }

        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.as_str(), value))
            .collect::<RawRow>();
        rows.push(row);
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        skipped,
        "parsed report rows"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::{RawRow, parse_rows};

    #[test]
    fn header_row_names_the_fields() {
        let parsed = parse_rows(
            "Transaction Type,Transaction Amount\npurchase,\"1,200.50\"\ncancellation,100\n",
        );
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].get("Transaction Type"), Some("purchase"));
            assert_eq!(rows[0].get("Transaction Amount"), Some("1,200.50"));
            assert_eq!(rows[1].get("Transaction Amount"), Some("100"));
        }
    }

    #[test]
    fn blank_rows_are_skipped() {
        let parsed = parse_rows("A,B\n1,2\n,\n  ,  \n\n3,4\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].get("A"), Some("3"));
        }
    }

    #[test]
    fn short_rows_lack_trailing_columns_and_long_rows_drop_extras() {
        let parsed = parse_rows("A,B,C\n1\n1,2,3,4\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows[0].get("A"), Some("1"));
            assert_eq!(rows[0].get("B"), None);
            assert_eq!(rows[1].len(), 3);
        }
    }

    #[test]
    fn byte_order_mark_is_removed_from_first_header() {
        let parsed = parse_rows("\u{feff}Transaction Date,Video Title\n2024-01-02,Intro\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows[0].get("Transaction Date"), Some("2024-01-02"));
        }
    }

    #[test]
    fn header_names_are_case_sensitive() {
        let parsed = parse_rows("transaction type\npurchase\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows[0].get("Transaction Type"), None);
            assert_eq!(rows[0].get("transaction type"), Some("purchase"));
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        let parsed = parse_rows("   \n");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "invalid_report");
        }
    }

    #[test]
    fn header_only_text_yields_no_rows() {
        let parsed = parse_rows("Transaction Type,Transaction Amount\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert!(rows.is_empty());
        }
    }

    #[test]
    fn rows_collect_from_pairs() {
        let row = [("Video Title", "Pilot")].into_iter().collect::<RawRow>();
        assert_eq!(row.get("Video Title"), Some("Pilot"));
        assert!(!row.is_empty());
    }
}

use crate::error::{Result, ShimError};

/// Leading rows dropped from every model reply before records are read.
/// Model output is expected to open with a banner or code fence followed by a header row.
pub const PREAMBLE_ROWS: usize = 2;

/// Parse comma-separated model output into rows of at least `min_columns` fields.
///
/// The first [`PREAMBLE_ROWS`] rows are always skipped, and a blank line counts
/// as a row with no fields. Rows that are too short are dropped without error,
/// and only the first `min_columns` fields of a row are kept, each trimmed of
/// surrounding whitespace. Ragged rows and loose quoting are accepted the way
/// the `csv` reader accepts them.
pub fn parse_records(text: &str, min_columns: usize) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut i = 0;
    for line in split_rows(text) {
        // The csv reader skips empty lines, so they are counted here
        if line.is_empty() {
            i += 1;
            continue;
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        for row in reader.records() {
            let row = row.map_err(|e| ShimError::Parse(format!("row {i}: {e}")))?;
            if i >= PREAMBLE_ROWS && row.len() >= min_columns {
                records.push(
                    row.iter()
                        .take(min_columns)
                        .map(|field| field.trim().to_string())
                        .collect(),
                );
            }
            i += 1;
        }
    }

    Ok(records)
}

/// Split `text` at line breaks that are outside a quoted field.
/// A trailing line break does not start another row.
fn split_rows(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut rows = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;

    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if in_quotes => {
                if bytes.get(pos + 1) == Some(&b'"') {
                    pos += 1;
                } else {
                    in_quotes = false;
                }
            }
            b'"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            b',' if !in_quotes => at_field_start = true,
            b'\n' if !in_quotes => {
                rows.push(text[start..pos].trim_end_matches('\r'));
                start = pos + 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
        pos += 1;
    }
    if start < text.len() {
        rows.push(text[start..].trim_end_matches('\r'));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_preamble_and_short_rows() {
        let text = "H1,H2\nBanner\nfoo,bar,baz\nonly_one_field";
        let records = parse_records(text, 2).unwrap();
        assert_eq!(records, vec![vec!["foo".to_string(), "bar".to_string()]]);
    }

    #[test]
    fn test_preamble_is_skipped_even_when_it_looks_like_data() {
        let text = "GERD,Gastroesophageal reflux disease\nPPI,Proton pump inhibitor\nH2,Histamine blocker";
        let records = parse_records(text, 2).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][0], "H2");
    }

    #[test]
    fn test_fields_are_trimmed_and_quotes_honoured() {
        let text = "```csv\nTerm,Definition\n  GERD ,\"Reflux, chronic\"\n```";
        let records = parse_records(text, 2).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][0], "GERD");
        assert_eq!(records[0][1], "Reflux, chronic");
    }

    #[test]
    fn test_four_column_rows() {
        let text = "Sources\nName,URL,Type,Description\n\
                    Mayo Clinic,https://www.mayoclinic.org,Medical,Clinic reference\n\
                    Partial,https://example.org";
        let records = parse_records(text, 4).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 4);
        assert_eq!(records[0][2], "Medical");
    }

    #[test]
    fn test_blank_lines_count_as_rows() {
        let text = "Term,Definition\n\nGERD,Gastroesophageal reflux disease\nPPI,Proton pump inhibitor";
        let records = parse_records(text, 2).unwrap();
        assert_eq!(
            records,
            vec![
                vec!["GERD".to_string(), "Gastroesophageal reflux disease".to_string()],
                vec!["PPI".to_string(), "Proton pump inhibitor".to_string()],
            ]
        );

        let records = parse_records("\n\nGERD,Reflux\n\nPPI,Inhibitor\n", 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0][0], "GERD");
        assert_eq!(records[1][0], "PPI");
    }

    #[test]
    fn test_quoted_line_break_stays_in_one_row() {
        let text = "Term,Definition\r\nBanner\r\nGERD,\"Reflux\nchronic\"\r\nPPI,\"Says \"\"stop\"\"\"";
        let records = parse_records(text, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0][1], "Reflux\nchronic");
        assert_eq!(records[1][1], "Says \"stop\"");
    }

    #[test]
    fn test_free_text_yields_no_records() {
        let records = parse_records("I could not find any terms.", 2).unwrap();
        assert!(records.is_empty());
        assert!(parse_records("", 2).unwrap().is_empty());
    }
}

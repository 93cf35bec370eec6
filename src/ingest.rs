//! Raw payload ingestion.
//!
//! Operators either paste a block copied from a spreadsheet or hand-write
//! JSON. Both become a list of [`RawRecord`]s with no shape guarantees.

use serde_json::Value;

use crate::error::{ImportError, ImportResult};
use crate::models::RawRecord;

/// Key under which hand-written JSON may nest earning amounts by code.
pub const EARNINGS_DETAILS_KEY: &str = "earnings_details";

/// Key under which hand-written JSON may nest deduction amounts by code.
pub const DEDUCTIONS_DETAILS_KEY: &str = "deductions_details";

const WRAPPER_KEYS: [&str; 3] = ["data", "records", "rows"];

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InvalidInput {
            message: err.to_string(),
        }
    }
}

/// Parses text pasted from a spreadsheet.
///
/// The first non-blank line is the header row. Cells are tab separated when
/// the header contains a tab, otherwise comma separated with double-quote
/// escaping. Blank rows are skipped and blank header cells are named
/// `column_<n>` (1-based).
///
/// # Example
///
/// ```
/// use payroll_import::ingest::parse_pasted_table;
///
/// let records = parse_pasted_table("姓名\t应发合计\n张三\t5,000\n").unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0]["应发合计"], "5,000");
/// ```
pub fn parse_pasted_table(text: &str) -> ImportResult<Vec<RawRecord>> {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or_else(|| ImportError::InvalidInput {
        message: "pasted table is empty".to_string(),
    })?;
    let delimiter = if header_line.contains('\t') { '\t' } else { ',' };
    let headers = header_names(&split_cells(header_line, delimiter));

    let mut records = Vec::new();
    for (index, line) in lines {
        let mut cells = split_cells(line, delimiter);
        while cells.len() > headers.len() && cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        if cells.len() != headers.len() {
            return Err(ImportError::InvalidInput {
                message: format!(
                    "row {} has {} cells but the header has {}; quote amounts that contain commas",
                    index + 1,
                    cells.len(),
                    headers.len()
                ),
            });
        }
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        records.push(
            headers
                .iter()
                .cloned()
                .zip(cells.into_iter().map(Value::String))
                .collect::<RawRecord>(),
        );
    }

    Ok(records)
}

/// Parses hand-written JSON.
///
/// Accepts an array of objects, a single object, or an object wrapping an
/// array under `data`, `records` or `rows`.
pub fn parse_json_records(text: &str) -> ImportResult<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(text)?;
    records_from_value(value)
}

/// Converts an already-parsed JSON value into records.
pub fn records_from_value(value: Value) -> ImportResult<Vec<RawRecord>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(ImportError::InvalidInput {
                    message: format!("item {} is {}, expected an object", i, kind_of(&other)),
                }),
            })
            .collect(),
        Value::Object(mut map) => {
            if let Some(key) = WRAPPER_KEYS
                .iter()
                .find(|key| matches!(map.get(**key), Some(Value::Array(_))))
            {
                if let Some(inner) = map.remove(*key) {
                    return records_from_value(inner);
                }
            }
            Ok(vec![map])
        }
        other => Err(ImportError::InvalidInput {
            message: format!("expected an object or array, found {}", kind_of(&other)),
        }),
    }
}

/// Distinct source column names across all records, in first-seen order.
///
/// Nested detail maps are structural, not columns, and are left out.
pub fn collect_source_fields(records: &[RawRecord]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if key == EARNINGS_DETAILS_KEY || key == DEDUCTIONS_DETAILS_KEY {
                continue;
            }
            if !fields.iter().any(|f| f == key) {
                fields.push(key.clone());
            }
        }
    }
    fields
}

fn header_names(cells: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let base = if cell.is_empty() {
            format!("column_{}", i + 1)
        } else {
            cell.clone()
        };
        let mut name = base.clone();
        let mut n = 2;
        while names.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    if delimiter == '\t' {
        return line.split('\t').map(|c| c.trim().to_string()).collect();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tab_separated_paste() {
        let text = "姓名\t身份证\t应发合计\r\n张三\t11010119900101001X\t5000\r\n\r\n李四\t110101199202020022\t4800\r\n";
        let records = parse_pasted_table(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["姓名"], "张三");
        assert_eq!(records[1]["应发合计"], "4800");
    }

    #[test]
    fn test_parse_csv_with_quoted_thousands() {
        let text = "姓名,应发合计,备注\n张三,\"5,000.00\",\"含\"\"补发\"\"\"\n";
        let records = parse_pasted_table(text).unwrap();

        assert_eq!(records[0]["应发合计"], "5,000.00");
        assert_eq!(records[0]["备注"], "含\"补发\"");
    }

    #[test]
    fn test_blank_and_duplicate_headers_are_named() {
        let text = "姓名\t\t姓名\nA\tB\tC\n";
        let records = parse_pasted_table(text).unwrap();

        let keys: Vec<&String> = records[0].keys().collect();
        assert!(keys.contains(&&"column_2".to_string()));
        assert!(keys.contains(&&"姓名_2".to_string()));
    }

    #[test]
    fn test_empty_paste_is_invalid_input() {
        assert!(matches!(
            parse_pasted_table("\n \n"),
            Err(ImportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rows_of_empty_cells_are_skipped() {
        let records = parse_pasted_table("姓名\t应发合计\n\t\n张三\t1\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_unquoted_thousands_in_comma_row_is_rejected() {
        let text = "工号,姓名,身份证号,应发合计,实发合计\nE1,张三,110101199001010011,5,000,5,000\n";
        let err = parse_pasted_table(text).unwrap_err();

        match err {
            ImportError::InvalidInput { message } => {
                assert!(message.starts_with("row 2 has 7 cells but the header has 5"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_rejected_with_line_number() {
        let text = "姓名\t应发合计\t实发合计\n张三\t5000\t5000\n\n李四\t4800\n";
        let err = parse_pasted_table(text).unwrap_err();
        assert!(err.to_string().contains("row 4 has 2 cells"));
    }

    #[test]
    fn test_trailing_empty_cells_are_tolerated() {
        let records = parse_pasted_table("姓名,应发合计\n张三,5000,,\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["应发合计"], "5000");
    }

    #[test]
    fn test_parse_json_array() {
        let records = parse_json_records(r#"[{"姓名":"张三"},{"姓名":"李四"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_json_single_object() {
        let records = parse_json_records(r#"{"姓名":"张三","应发合计":5000}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["应发合计"], 5000);
    }

    #[test]
    fn test_parse_json_wrapped_array() {
        let records = parse_json_records(r#"{"data":[{"姓名":"张三"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["姓名"], "张三");
    }

    #[test]
    fn test_parse_json_rejects_scalars() {
        assert!(matches!(
            parse_json_records("42"),
            Err(ImportError::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_json_records(r#"[1, 2]"#),
            Err(ImportError::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_json_records("{not json"),
            Err(ImportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_collect_source_fields_first_seen_order() {
        let records = records_from_value(json!([
            {"姓名": "张三", "应发合计": 1},
            {"姓名": "李四", "备注": "x", "earnings_details": {"BASIC": 1}}
        ]))
        .unwrap();

        let fields = collect_source_fields(&records);
        assert_eq!(fields.len(), 3);
        assert!(fields.contains(&"备注".to_string()));
        assert!(!fields.contains(&"earnings_details".to_string()));
    }
}

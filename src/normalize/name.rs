//! Name splitting.
//!
//! The first character of a combined name is taken as the surname and the
//! rest as the given name. Compound surnames (欧阳, 司马, ...) are split
//! wrongly; this is the historical import behaviour and changing it would
//! change past results.

/// Splits a combined name into `(last_name, first_name)`.
///
/// # Example
///
/// ```
/// use payroll_import::normalize::split_full_name;
///
/// assert_eq!(split_full_name("张三丰"), ("张".to_string(), "三丰".to_string()));
/// assert_eq!(split_full_name("王"), ("王".to_string(), String::new()));
/// ```
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(surname) => (surname.to_string(), chars.as_str().trim().to_string()),
        None => (String::new(), String::new()),
    }
}

/// Joins surname and given name the way they are written on payroll slips.
pub fn compose_full_name(last_name: &str, first_name: &str) -> String {
    format!("{}{}", last_name.trim(), first_name.trim())
}

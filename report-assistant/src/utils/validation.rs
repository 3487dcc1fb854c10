// Input validation utilities
//
// Field-level errors are collected into `FieldErrors` (field name -> messages) so the UI can
// render them inline next to the offending control.

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Field-level validation failures for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single failing field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// First message for a field (what gets rendered inline).
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `Ok(value)` when no field failed, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// The local part may not start with '.' or contain "..", checked outside the regex
// (the regex crate has no look-around).
const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";

fn email_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Syntactic email check (no DNS, no delivery).
pub fn is_valid_email(address: &str) -> bool {
    let s = address.trim();
    if s.is_empty() || s.starts_with('.') || s.contains("..") {
        return false;
    }
    email_regex().map(|re| re.is_match(s)).unwrap_or(false)
}

/// Split a comma-separated recipient list and validate every address.
///
/// Returns the trimmed addresses, or the offending entries. A blank list parses to an empty
/// vector; empty entries inside a non-blank list (e.g. a trailing comma) are invalid.
pub fn parse_recipient_list(list: &str) -> std::result::Result<Vec<String>, Vec<String>> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for raw in list.split(',') {
        let address = raw.trim();
        if is_valid_email(address) {
            valid.push(address.to_string());
        } else {
            invalid.push(address.to_string());
        }
    }

    if invalid.is_empty() {
        Ok(valid)
    } else {
        Err(invalid)
    }
}

/// Validate an output file name (no directory components, no reserved characters).
pub fn validate_file_name(name: &str) -> Result<()> {
    let s = name.trim();
    if s.is_empty() {
        return Err(anyhow::anyhow!("File name is required."));
    }

    if s.chars().count() > 200 {
        return Err(anyhow::anyhow!("File name cannot exceed 200 characters."));
    }

    let invalid_chars = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    if s.chars().any(|c| invalid_chars.contains(&c) || c.is_control()) {
        return Err(anyhow::anyhow!("File name contains invalid characters."));
    }

    if s == "." || s == ".." {
        return Err(anyhow::anyhow!("File name is not valid."));
    }

    Ok(())
}

/// Required free-text field: non-blank after trimming.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_collect_per_field_messages() {
        let mut errors = FieldErrors::new();
        errors.add("fileName", "File name is required.");
        errors.add("fileName", "second");
        errors.add("format", "Pick one.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first("fileName"), Some("File name is required."));
        assert_eq!(errors.get("fileName").map(|m| m.len()), Some(2));
        assert!(errors.contains("format"));
        assert!(!errors.contains("recipients"));
        assert_eq!(
            errors.to_string(),
            "fileName: File name is required.; fileName: second; format: Pick one."
        );
    }

    #[test]
    fn into_result_passes_value_through_when_clean() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        assert!(FieldErrors::single("x", "bad").into_result(5).is_err());
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("  operator.one+shift@plant-7.example.org "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(".a@b.com"));
        assert!(!is_valid_email("a..b@c.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn recipient_list_validates_every_entry() {
        assert_eq!(
            parse_recipient_list("a@b.com, c@d.com"),
            Ok(vec!["a@b.com".to_string(), "c@d.com".to_string()])
        );
        assert_eq!(
            parse_recipient_list("a@b.com, not-an-email"),
            Err(vec!["not-an-email".to_string()])
        );
        assert_eq!(parse_recipient_list(""), Ok(Vec::new()));
        assert_eq!(parse_recipient_list("   "), Ok(Vec::new()));
        assert!(parse_recipient_list("a@b.com,").is_err());
    }

    #[test]
    fn file_name_rules() {
        assert!(validate_file_name("test_report").is_ok());
        assert!(validate_file_name("SCADA_Report_2024-01-31").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("a:b").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name(&"x".repeat(201)).is_err());
    }
}

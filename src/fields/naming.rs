//! Field name generation.
//!
//! Labels repeat across tabs (a "Date" tab on every page is common), so
//! every generated name carries a timestamp and a short random token.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Upper bound on generated field names, suffix included.
pub const MAX_NAME_LEN: usize = 60;

const FALLBACK_BASE: &str = "field";
const TOKEN_LEN: usize = 6;

/// Reduce a label to `[A-Za-z0-9_-]`, replacing everything else with `_`.
///
/// Labels are NFKD-normalized first so accented letters keep their base
/// letter (`Café` becomes `Cafe`).
pub fn sanitize(label: &str) -> String {
    label
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Issues unique field names for one conversion.
#[derive(Debug, Default)]
pub struct FieldNamer {
    issued: HashSet<String>,
}

impl FieldNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate `<sanitized base>_<timestamp ms>_<token>`, at most
    /// [`MAX_NAME_LEN`] characters, never repeating a name it issued before.
    pub fn generate(&mut self, base: &str) -> String {
        let mut base = sanitize(base.trim());
        if base.trim_matches('_').is_empty() {
            base = FALLBACK_BASE.to_string();
        }

        loop {
            let token = Uuid::new_v4().simple().to_string();
            let suffix = format!(
                "_{}_{}",
                chrono::Utc::now().timestamp_millis(),
                &token[..TOKEN_LEN]
            );
            // Sanitized names are ASCII, so byte truncation is safe.
            let keep = MAX_NAME_LEN.saturating_sub(suffix.len()).min(base.len());
            let name = format!("{}{}", &base[..keep], suffix);
            if self.issued.insert(name.clone()) {
                return name;
            }
        }
    }

    /// Number of names issued so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Signer 1: Name"), "Signer_1__Name");
        assert_eq!(sanitize("Café"), "Cafe");
        assert_eq!(sanitize("a-b_c"), "a-b_c");
        assert_eq!(sanitize("x.y"), "x_y");
    }

    #[test]
    fn test_same_label_yields_distinct_names() {
        let mut namer = FieldNamer::new();
        let first = namer.generate("Date");
        let second = namer.generate("Date");
        assert_ne!(first, second);
        assert!(first.starts_with("Date_"));
        assert_eq!(namer.issued(), 2);
    }

    #[test]
    fn test_length_is_bounded() {
        let mut namer = FieldNamer::new();
        let name = namer.generate(&"very long label ".repeat(10));
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_empty_base_falls_back() {
        let mut namer = FieldNamer::new();
        assert!(namer.generate("").starts_with("field_"));
        assert!(namer.generate("***").starts_with("field_"));
    }
}

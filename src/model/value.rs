//! Loosely-typed scalar values found in template JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// A scalar that may arrive as a boolean, a number or a string.
///
/// DocuSign exports are inconsistent about `"12"` versus `12` and
/// `"true"` versus `true`; anything else is kept verbatim so a stray
/// object never fails deserialization of the whole template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Outcome of reading a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Key missing, null or an empty string.
    Absent,
    /// A finite number.
    Value(f64),
    /// Present but not a finite number.
    Invalid,
}

impl Numeric {
    /// Resolve a list of alternative keys: the first valid number wins,
    /// then any invalid one, then absent.
    pub fn first_of<'a, I>(candidates: I) -> Numeric
    where
        I: IntoIterator<Item = Option<&'a LooseValue>>,
    {
        let mut saw_invalid = false;
        for candidate in candidates.into_iter().flatten() {
            match candidate.to_numeric() {
                Numeric::Value(v) => return Numeric::Value(v),
                Numeric::Invalid => saw_invalid = true,
                Numeric::Absent => {}
            }
        }
        if saw_invalid {
            Numeric::Invalid
        } else {
            Numeric::Absent
        }
    }

    /// Value with absent treated as zero; `None` when invalid.
    pub fn or_zero(self) -> Option<f64> {
        match self {
            Numeric::Absent => Some(0.0),
            Numeric::Value(v) => Some(v),
            Numeric::Invalid => None,
        }
    }

    /// The number, if one was present and valid.
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_present(self) -> bool {
        !matches!(self, Numeric::Absent)
    }
}

impl LooseValue {
    /// Interpret the value as a number.
    pub fn to_numeric(&self) -> Numeric {
        match self {
            LooseValue::Number(n) if n.is_finite() => Numeric::Value(*n),
            LooseValue::Number(_) => Numeric::Invalid,
            LooseValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Numeric::Absent;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Numeric::Value(n),
                    _ => Numeric::Invalid,
                }
            }
            LooseValue::Other(serde_json::Value::Null) => Numeric::Absent,
            LooseValue::Bool(_) | LooseValue::Other(_) => Numeric::Invalid,
        }
    }

    /// `true` or a case-insensitive `"true"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            LooseValue::Bool(b) => *b,
            LooseValue::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Render scalar values as text; integral numbers lose their fraction.
    pub fn to_text(&self) -> Option<String> {
        match self {
            LooseValue::Text(s) => Some(s.clone()),
            LooseValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            LooseValue::Number(n) => Some(n.to_string()),
            LooseValue::Bool(b) => Some(b.to_string()),
            LooseValue::Other(_) => None,
        }
    }

    /// Text rendering with surrounding whitespace removed, `None` when empty.
    pub fn to_trimmed_text(&self) -> Option<String> {
        self.to_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Deserialize a text key that may also arrive as a number or a bool.
///
/// Values with no text rendering (objects, arrays, null) read as `None`.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LooseValue> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(LooseValue::to_text))
}

/// Deserialize a list where `null` means empty.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<f64> for LooseValue {
    fn from(n: f64) -> Self {
        LooseValue::Number(n)
    }
}

impl From<&str> for LooseValue {
    fn from(s: &str) -> Self {
        LooseValue::Text(s.to_string())
    }
}

impl From<bool> for LooseValue {
    fn from(b: bool) -> Self {
        LooseValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_from_number_and_string() {
        assert_eq!(LooseValue::from(12.5).to_numeric(), Numeric::Value(12.5));
        assert_eq!(LooseValue::from(" 42 ").to_numeric(), Numeric::Value(42.0));
        assert_eq!(LooseValue::from("").to_numeric(), Numeric::Absent);
        assert_eq!(LooseValue::from("abc").to_numeric(), Numeric::Invalid);
        assert_eq!(LooseValue::from("NaN").to_numeric(), Numeric::Invalid);
        assert_eq!(LooseValue::from(true).to_numeric(), Numeric::Invalid);
    }

    #[test]
    fn test_first_of_prefers_valid() {
        let bad = LooseValue::from("x");
        let good = LooseValue::from("7");
        assert_eq!(
            Numeric::first_of([Some(&bad), Some(&good)]),
            Numeric::Value(7.0)
        );
        assert_eq!(Numeric::first_of([Some(&bad), None]), Numeric::Invalid);
        assert_eq!(Numeric::first_of([None, None]), Numeric::Absent);
    }

    #[test]
    fn test_or_zero() {
        assert_eq!(Numeric::Absent.or_zero(), Some(0.0));
        assert_eq!(Numeric::Invalid.or_zero(), None);
    }

    #[test]
    fn test_truthy() {
        assert!(LooseValue::from(true).is_truthy());
        assert!(LooseValue::from("TRUE").is_truthy());
        assert!(!LooseValue::from("false").is_truthy());
        assert!(!LooseValue::from(1.0).is_truthy());
    }

    #[test]
    fn test_to_text() {
        assert_eq!(LooseValue::from(3.0).to_text().as_deref(), Some("3"));
        assert_eq!(LooseValue::from(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(LooseValue::from("  ").to_trimmed_text(), None);
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<LooseValue> =
            serde_json::from_str(r#"[true, 1.5, "two", {"a": 1}, null]"#).unwrap();
        assert_eq!(values[0], LooseValue::Bool(true));
        assert_eq!(values[1], LooseValue::Number(1.5));
        assert_eq!(values[2], LooseValue::Text("two".into()));
        assert!(matches!(values[3], LooseValue::Other(_)));
        assert_eq!(values[4].to_numeric(), Numeric::Absent);
    }
}

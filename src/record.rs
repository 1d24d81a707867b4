//! Student record model
//!
//! One record per student. Every field is free text; fields missing from a
//! stored or imported document, or stored as `null`, deserialize to the
//! empty string.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `null` reads as an empty string
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    /// Opaque unique id, assigned on first save
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// Date of birth as typed by the user
    #[serde(deserialize_with = "null_as_empty")]
    pub dob: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub center: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub teacher: String,
    /// Goals / areas of focus
    #[serde(deserialize_with = "null_as_empty")]
    pub goals: String,
    /// Progress notes
    #[serde(deserialize_with = "null_as_empty")]
    pub progress: String,
    /// RFC 3339 timestamp of the last write
    #[serde(deserialize_with = "null_as_empty")]
    pub updated: String,
}

impl StudentRecord {
    /// Create a new, unsaved record (empty id)
    pub fn new(name: impl Into<String>, center: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center: center.into(),
            ..Default::default()
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Trim surrounding whitespace from the text fields a form submits.
    /// `dob` is kept verbatim.
    pub fn trim_fields(&mut self) {
        for field in [
            &mut self.name,
            &mut self.center,
            &mut self.teacher,
            &mut self.goals,
            &mut self.progress,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    /// Case-insensitive match of an already lowercased needle against name or center
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.center.to_lowercase().contains(needle)
    }

    /// Name for display, falling back to a placeholder
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(no name)"
        } else {
            &self.name
        }
    }
}

/// Current UTC time in the `2026-10-17T09:30:00.123Z` form
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let rec: StudentRecord = serde_json::from_str(r#"{"id":"a1","name":"Alice"}"#).unwrap();
        assert_eq!(rec.id, "a1");
        assert_eq!(rec.name, "Alice");
        assert_eq!(rec.center, "");
        assert_eq!(rec.updated, "");
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let rec: StudentRecord =
            serde_json::from_str(r#"{"id":"a1","name":"Alice","dob":null,"goals":null}"#).unwrap();
        assert_eq!(rec.name, "Alice");
        assert_eq!(rec.dob, "");
        assert_eq!(rec.goals, "");
    }

    #[test]
    fn test_trim_fields_keeps_dob() {
        let mut rec = StudentRecord {
            name: "  Alice ".into(),
            dob: " 2015-03-01 ".into(),
            center: "North\n".into(),
            goals: "\tread more".into(),
            ..Default::default()
        };
        rec.trim_fields();
        assert_eq!(rec.name, "Alice");
        assert_eq!(rec.center, "North");
        assert_eq!(rec.goals, "read more");
        assert_eq!(rec.dob, " 2015-03-01 ");
    }

    #[test]
    fn test_matches_name_or_center() {
        let rec = StudentRecord::new("Alice", "Northside");
        assert!(rec.matches(""));
        assert!(rec.matches("ali"));
        assert!(rec.matches("north"));
        assert!(!rec.matches("bob"));
    }

    #[test]
    fn test_display_name_placeholder() {
        assert_eq!(StudentRecord::default().display_name(), "(no name)");
        assert_eq!(StudentRecord::new("Bob", "").display_name(), "Bob");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-10-17T09:30:00.123Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}

// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Form state types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// One row of the form: a long URL with its optional alias and validity.
///
/// Fields hold the raw text the user typed; nothing is parsed until the
/// entry is shortened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntry {
    pub long_url: String,

    /// Validity in minutes, empty for no expiry.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub validity_period: String,

    /// Custom short code, empty to generate one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shortcode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortened: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl UrlEntry {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            ..Default::default()
        }
    }

    pub fn with_period(mut self, minutes: impl Into<String>) -> Self {
        self.validity_period = minutes.into();
        self
    }

    pub fn with_shortcode(mut self, code: impl Into<String>) -> Self {
        self.shortcode = code.into();
        self
    }

    pub fn is_shortened(&self) -> bool {
        self.shortened.is_some()
    }

    /// Set one editable field. Editing clears any earlier shortening result.
    pub fn set(&mut self, field: UrlField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UrlField::LongUrl => self.long_url = value,
            UrlField::ValidityPeriod => self.validity_period = value,
            UrlField::Shortcode => self.shortcode = value,
        }
        self.shortened = None;
        self.expiry_date = None;
    }
}

/// Editable fields of a [`UrlEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrlField {
    LongUrl,
    ValidityPeriod,
    Shortcode,
}

impl UrlField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongUrl => "longUrl",
            Self::ValidityPeriod => "validityPeriod",
            Self::Shortcode => "shortcode",
        }
    }
}

impl fmt::Display for UrlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "longurl" | "long_url" | "url" => Ok(Self::LongUrl),
            "validityperiod" | "validity_period" | "period" | "validity" => Ok(Self::ValidityPeriod),
            "shortcode" | "code" | "alias" => Ok(Self::Shortcode),
            _ => Err(FormError::UnknownField(s.to_string())),
        }
    }
}

/// Everything the form shows: its rows and the current error line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub urls: Vec<UrlEntry>,
    pub error: String,
}

impl FormState {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_only_filled_fields() {
        let entry = UrlEntry::new("http://a");
        assert_eq!(serde_json::to_value(&entry).unwrap(), json!({"longUrl": "http://a"}));

        let entry = UrlEntry::new("http://a").with_period("30").with_shortcode("abc");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["validityPeriod"], "30");
        assert_eq!(value["shortcode"], "abc");
    }

    #[test]
    fn test_entry_deserializes_with_missing_fields() {
        let entry: UrlEntry = serde_json::from_str(r#"{"longUrl": "http://b"}"#).unwrap();
        assert_eq!(entry, UrlEntry::new("http://b"));
    }

    #[test]
    fn test_set_field_clears_result() {
        let mut entry = UrlEntry::new("http://a");
        entry.shortened = Some("https://sn.ip/abc".to_string());
        entry.expiry_date = Some("Never".to_string());

        entry.set(UrlField::Shortcode, "xyz");
        assert_eq!(entry.shortcode, "xyz");
        assert!(!entry.is_shortened());
        assert!(entry.expiry_date.is_none());
    }

    #[test]
    fn test_field_parse_aliases() {
        assert_eq!("longUrl".parse::<UrlField>().unwrap(), UrlField::LongUrl);
        assert_eq!("url".parse::<UrlField>().unwrap(), UrlField::LongUrl);
        assert_eq!("period".parse::<UrlField>().unwrap(), UrlField::ValidityPeriod);
        assert_eq!("code".parse::<UrlField>().unwrap(), UrlField::Shortcode);
        assert!(matches!(
            "color".parse::<UrlField>(),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_form_state_error_flag() {
        let mut state = FormState::default();
        assert!(!state.has_error());
        state.error = "Please enter a valid URL".to_string();
        assert!(state.has_error());
    }
}

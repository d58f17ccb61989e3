// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Field validation rules.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::FormError;

use super::types::UrlEntry;

static SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("shortcode pattern is valid"));

/// A URL is valid when it parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// A period is valid when empty or a positive whole number of minutes.
pub fn is_valid_period(period: &str) -> bool {
    period.is_empty() || parse_period(period).is_some()
}

/// A shortcode is valid when empty or made of letters, digits, `_` and `-`.
pub fn is_valid_shortcode(code: &str) -> bool {
    code.is_empty() || SHORTCODE.is_match(code)
}

/// Parse a validity period in minutes; `None` unless a positive integer.
///
/// Any numeric spelling of a whole number counts, so `"90"`, `"90.0"` and
/// `"9e1"` are the same period. Values past `u64::MAX` saturate.
pub fn parse_period(period: &str) -> Option<u64> {
    let minutes = period.trim().parse::<f64>().ok()?;
    if !minutes.is_finite() || minutes.fract() != 0.0 || minutes < 1.0 {
        return None;
    }
    Some(minutes as u64)
}

/// Check an entry's fields in display order: URL, period, shortcode.
pub fn validate_entry(entry: &UrlEntry) -> Result<(), FormError> {
    if !is_valid_url(&entry.long_url) {
        return Err(FormError::InvalidUrl);
    }
    if !is_valid_period(&entry.validity_period) {
        return Err(FormError::InvalidPeriod);
    }
    if !is_valid_shortcode(&entry.shortcode) {
        return Err(FormError::InvalidShortcode);
    }
    Ok(())
}

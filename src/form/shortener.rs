// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Local mock shortener.
//!
//! Nothing is registered anywhere: the short URL is just the base URL plus a
//! code, and the expiry is computed from the validity period.

use chrono::{DateTime, Duration, Local};
use uuid::Uuid;

use crate::error::FormError;

use super::types::UrlEntry;
use super::validate::{parse_period, validate_entry};

/// Length of generated short codes.
pub const CODE_LEN: usize = 6;

/// Expiry shown for entries without a validity period.
pub const NEVER: &str = "Never";

const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CODE_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Largest minute count a `chrono::Duration` holds.
const MAX_MINUTES: i64 = i64::MAX / 60_000;

#[derive(Debug, Clone)]
pub struct MockShortener {
    base_url: String,
}

impl MockShortener {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate and shorten an entry as of now.
    pub fn shorten(&self, entry: &UrlEntry) -> Result<UrlEntry, FormError> {
        self.shorten_at(entry, Local::now())
    }

    /// Validate and shorten an entry, computing expiry from `now`.
    pub fn shorten_at(&self, entry: &UrlEntry, now: DateTime<Local>) -> Result<UrlEntry, FormError> {
        validate_entry(entry)?;

        let code = if entry.shortcode.is_empty() {
            random_code()
        } else {
            entry.shortcode.clone()
        };

        let expiry_date = match parse_period(&entry.validity_period).and_then(|m| expiry(now, m)) {
            Some(at) => at.format(EXPIRY_FORMAT).to_string(),
            None => NEVER.to_string(),
        };

        Ok(UrlEntry {
            shortened: Some(format!("{}/{}", self.base_url, code)),
            expiry_date: Some(expiry_date),
            ..entry.clone()
        })
    }
}

/// `now + minutes`, or `None` past the last representable date.
fn expiry(now: DateTime<Local>, minutes: u64) -> Option<DateTime<Local>> {
    let minutes = i64::try_from(minutes).ok().filter(|&m| m <= MAX_MINUTES)?;
    now.checked_add_signed(Duration::minutes(minutes))
}

/// Random code of [`CODE_LEN`] lowercase letters and digits.
pub fn random_code() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        code.push(char::from(CODE_ALPHABET[(bits % 36) as usize]));
        bits /= 36;
    }
    code
}

// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The URL form.
//!
//! Holds up to a configured number of long URLs, each with an optional
//! custom shortcode and validity period, and shortens them locally with a
//! mock generator. State lives in a [`FormStore`] and only changes through
//! the middleware-wrapped actions in [`actions`].

pub mod actions;
mod service;
mod shortener;
mod types;
mod validate;

pub use actions::{FormStore, SetError, SetUrls, ShortenEntry, SET_ERROR, SET_URLS, SHORTEN_URL};
pub use service::{FormOptions, UrlForm, DEFAULT_BASE_URL, DEFAULT_MAX_URLS};
pub use shortener::{random_code, MockShortener, CODE_LEN, NEVER};
pub use types::{FormState, UrlEntry, UrlField};
pub use validate::{is_valid_period, is_valid_shortcode, is_valid_url, parse_period, validate_entry};

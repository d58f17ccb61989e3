// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The form's store and the state mutators that change it.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::FormError;
use crate::middleware::StateMutator;

use super::shortener::MockShortener;
use super::types::{FormState, UrlEntry};

pub const SET_URLS: &str = "SET_URLS";
pub const SET_ERROR: &str = "SET_ERROR";
pub const SHORTEN_URL: &str = "SHORTEN_URL";

/// Shared, in-memory form state.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    state: Arc<RwLock<FormState>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.read().await.clone()
    }

    pub async fn urls(&self) -> Vec<UrlEntry> {
        self.state.read().await.urls.clone()
    }

    pub async fn error(&self) -> String {
        self.state.read().await.error.clone()
    }
}

/// Replaces the list of URL entries.
#[derive(Debug, Clone)]
pub struct SetUrls {
    store: FormStore,
}

impl SetUrls {
    pub fn new(store: FormStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StateMutator for SetUrls {
    type Input = Vec<UrlEntry>;
    type Output = Vec<UrlEntry>;
    type Error = Infallible;

    async fn apply(&self, urls: Vec<UrlEntry>) -> Result<Vec<UrlEntry>, Infallible> {
        self.store.state.write().await.urls = urls.clone();
        Ok(urls)
    }
}

/// Replaces the error line; an empty string clears it.
#[derive(Debug, Clone)]
pub struct SetError {
    store: FormStore,
}

impl SetError {
    pub fn new(store: FormStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StateMutator for SetError {
    type Input = String;
    type Output = String;
    type Error = Infallible;

    async fn apply(&self, message: String) -> Result<String, Infallible> {
        self.store.state.write().await.error = message.clone();
        Ok(message)
    }
}

/// Validates one entry and fills in its short URL and expiry.
///
/// Pure with respect to the store: the caller decides where the result goes.
#[derive(Debug, Clone)]
pub struct ShortenEntry {
    shortener: MockShortener,
}

impl ShortenEntry {
    pub fn new(shortener: MockShortener) -> Self {
        Self { shortener }
    }
}

#[async_trait]
impl StateMutator for ShortenEntry {
    type Input = UrlEntry;
    type Output = UrlEntry;
    type Error = FormError;

    async fn apply(&self, entry: UrlEntry) -> Result<UrlEntry, FormError> {
        self.shortener.shorten(&entry)
    }
}

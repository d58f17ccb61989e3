// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The URL form: user operations built on top of the wrapped actions.

use std::convert::Infallible;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::FormError;
use crate::middleware::{ActionLogger, Instrumented, StateMutator};

use super::actions::{FormStore, SetError, SetUrls, ShortenEntry, SET_ERROR, SET_URLS, SHORTEN_URL};
use super::shortener::MockShortener;
use super::types::{FormState, UrlEntry, UrlField};

/// Default number of rows the form accepts.
pub const DEFAULT_MAX_URLS: usize = 5;

/// Default base for generated short URLs.
pub const DEFAULT_BASE_URL: &str = "https://sn.ip";

/// Knobs for building a [`UrlForm`].
#[derive(Debug, Clone)]
pub struct FormOptions {
    pub max_urls: usize,
    pub base_url: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// The URL form.
///
/// All state changes go through the wrapped `SET_URLS`, `SET_ERROR` and
/// `SHORTEN_URL` actions, so every change shows up in the trace sink.
///
/// Each operation reads the rows, edits a copy and commits it. The `edit`
/// lock is held for that whole sequence so concurrent callers never commit
/// over each other's changes.
pub struct UrlForm {
    store: FormStore,
    edit: Mutex<()>,
    max_urls: usize,
    set_urls: Instrumented<SetUrls>,
    set_error: Instrumented<SetError>,
    shorten_entry: Instrumented<ShortenEntry>,
}

impl UrlForm {
    pub fn new(logger: &ActionLogger, options: FormOptions) -> Self {
        let store = FormStore::new();
        Self {
            set_urls: logger.wrap(SET_URLS, SetUrls::new(store.clone())),
            set_error: logger.wrap(SET_ERROR, SetError::new(store.clone())),
            shorten_entry: logger.wrap(
                SHORTEN_URL,
                ShortenEntry::new(MockShortener::new(options.base_url)),
            ),
            max_urls: options.max_urls,
            edit: Mutex::new(()),
            store,
        }
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    pub async fn snapshot(&self) -> FormState {
        self.store.snapshot().await
    }

    /// Append an empty row and return its index.
    #[instrument(skip(self))]
    pub async fn add_url(&self) -> Result<usize, FormError> {
        let _edit = self.edit.lock().await;
        let mut urls = self.store.urls().await;
        if urls.len() >= self.max_urls {
            let err = FormError::LimitReached(self.max_urls);
            self.show_error(err.to_string()).await;
            return Err(err);
        }

        urls.push(UrlEntry::default());
        let index = urls.len() - 1;
        self.commit_urls(urls).await;
        self.show_error(String::new()).await;
        Ok(index)
    }

    /// Replace one field of one row.
    #[instrument(skip(self, value))]
    pub async fn update_field(
        &self,
        index: usize,
        field: UrlField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let _edit = self.edit.lock().await;
        let mut urls = self.store.urls().await;
        let entry = urls.get_mut(index).ok_or(FormError::NoSuchEntry(index))?;
        entry.set(field, value);
        self.commit_urls(urls).await;
        Ok(())
    }

    /// Validate and shorten one row.
    ///
    /// A validation failure is shown on the error line and also returned.
    #[instrument(skip(self))]
    pub async fn shorten(&self, index: usize) -> Result<UrlEntry, FormError> {
        let _edit = self.edit.lock().await;
        let entry = self
            .store
            .urls()
            .await
            .get(index)
            .cloned()
            .ok_or(FormError::NoSuchEntry(index))?;

        let shortened = match self.shorten_entry.apply(entry).await {
            Ok(shortened) => shortened,
            Err(err) => {
                debug!(error = %err, "Shortening rejected");
                self.show_error(err.to_string()).await;
                return Err(err);
            }
        };

        let mut urls = self.store.urls().await;
        let slot = urls.get_mut(index).ok_or(FormError::NoSuchEntry(index))?;
        *slot = shortened.clone();
        self.commit_urls(urls).await;
        self.show_error(String::new()).await;
        Ok(shortened)
    }

    /// Remove one row and return it.
    #[instrument(skip(self))]
    pub async fn remove_url(&self, index: usize) -> Result<UrlEntry, FormError> {
        let _edit = self.edit.lock().await;
        let mut urls = self.store.urls().await;
        if index >= urls.len() {
            return Err(FormError::NoSuchEntry(index));
        }
        let removed = urls.remove(index);
        self.commit_urls(urls).await;
        Ok(removed)
    }

    async fn commit_urls(&self, urls: Vec<UrlEntry>) {
        infallible(self.set_urls.apply(urls).await);
    }

    async fn show_error(&self, message: String) {
        infallible(self.set_error.apply(message).await);
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

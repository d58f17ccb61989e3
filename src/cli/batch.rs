// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Non-interactive `shorten` command.

use std::io::Write;

use crate::app::App;
use crate::error::FormError;
use crate::form::{UrlEntry, UrlField};

use super::render::{format_error, format_shortened};

/// URLs and shared options for one `snip shorten` run.
#[derive(Debug, Clone, Default)]
pub struct ShortenRequest {
    pub urls: Vec<String>,
    pub period: Option<String>,
    pub shortcode: Option<String>,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub shortened: Vec<UrlEntry>,
    pub failed: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Add, fill and shorten each URL in turn, writing one line per URL.
///
/// Rows go through the same wrapped actions as the REPL, so the form's
/// row limit applies: URLs past the limit are reported as failures.
pub async fn run_shorten<W: Write>(
    app: &App,
    request: &ShortenRequest,
    out: &mut W,
    json: bool,
) -> anyhow::Result<BatchReport> {
    let form = app.form();
    let mut report = BatchReport::default();

    for (position, url) in request.urls.iter().enumerate() {
        let index = match form.add_url().await {
            Ok(index) => index,
            Err(err @ FormError::LimitReached(_)) => {
                report.failed += request.urls.len() - position;
                if !json {
                    writeln!(out, "{}", format_error(&err))?;
                }
                break;
            }
            Err(err) => return Err(err.into()),
        };

        form.update_field(index, UrlField::LongUrl, url.as_str()).await?;
        if let Some(period) = &request.period {
            form.update_field(index, UrlField::ValidityPeriod, period.as_str())
                .await?;
        }
        if let Some(code) = &request.shortcode {
            form.update_field(index, UrlField::Shortcode, code.as_str()).await?;
        }

        match form.shorten(index).await {
            Ok(entry) => {
                if !json {
                    writeln!(out, "{}", format_shortened(&entry))?;
                }
                report.shortened.push(entry);
            }
            Err(err) => {
                report.failed += 1;
                if !json {
                    writeln!(out, "{url}: {}", format_error(&err))?;
                }
            }
        }
    }

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&form.snapshot().await)?)?;
    }

    app.shutdown();
    Ok(report)
}

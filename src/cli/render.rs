// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Text rendering of form state for the terminal.

use colored::Colorize;

use crate::form::{FormState, UrlEntry};

/// Render one row of the form.
pub fn format_entry(index: usize, entry: &UrlEntry) -> String {
    let long_url = if entry.long_url.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        entry.long_url.clone()
    };
    let mut out = format!("{} {}", format!("[{index}]").bold(), long_url);

    let mut options = Vec::new();
    if !entry.validity_period.is_empty() {
        options.push(format!("period: {} min", entry.validity_period));
    }
    if !entry.shortcode.is_empty() {
        options.push(format!("shortcode: {}", entry.shortcode));
    }
    if !options.is_empty() {
        out.push_str(&format!("\n    {}", options.join(" | ")));
    }

    if let Some(short) = &entry.shortened {
        out.push_str(&format!("\n    short: {}", short.green()));
        if let Some(expiry) = &entry.expiry_date {
            out.push_str(&format!(" (expires: {expiry})"));
        }
    }
    out
}

/// Render the whole form, including its error line.
pub fn format_state(state: &FormState, max_urls: usize) -> String {
    let mut out = format!("URLs ({}/{})", state.urls.len(), max_urls);
    if state.urls.is_empty() {
        out.push_str(&format!("\n  {}", "No URLs yet. Type 'add' to create one.".dimmed()));
    }
    for (index, entry) in state.urls.iter().enumerate() {
        out.push('\n');
        out.push_str(&format_entry(index, entry));
    }
    if state.has_error() {
        out.push('\n');
        out.push_str(&format_error(&state.error));
    }
    out
}

/// One line summarizing a shortened entry.
pub fn format_shortened(entry: &UrlEntry) -> String {
    let short = entry.shortened.as_deref().unwrap_or("-");
    let expiry = entry.expiry_date.as_deref().unwrap_or("-");
    format!("{} -> {} (expires: {})", entry.long_url, short.green(), expiry)
}

pub fn format_error(message: impl std::fmt::Display) -> String {
    format!("{} {}", "Error:".red().bold(), message)
}

// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal front end: the interactive REPL and the batch `shorten` command.

mod batch;
mod render;
mod repl;

pub use batch::{run_shorten, BatchReport, ShortenRequest};
pub use render::{format_entry, format_error, format_shortened, format_state};
pub use repl::{execute, run_repl, ReplCommand, HELP};

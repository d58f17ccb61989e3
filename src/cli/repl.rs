// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interactive line-based session over the form.

use std::io::Write;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::app::App;
use crate::error::CliError;
use crate::form::UrlField;

use super::render::{format_entry, format_error, format_shortened, format_state};

const SET_USAGE: &str = "set <index> <field> <value>";
const SHORTEN_USAGE: &str = "shorten <index>";
const REMOVE_USAGE: &str = "remove <index>";

pub const HELP: &str = "\
Commands:
  add                          Add an empty URL row
  set <index> <field> <value>  Set a field (url, period, shortcode)
  shorten <index>              Validate and shorten a row
  remove <index>               Remove a row
  list                         Show all rows
  stats                        Show action metrics
  help                         Show this help
  quit                         Exit";

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Add,
    Set {
        index: usize,
        field: UrlField,
        value: String,
    },
    Shorten(usize),
    Remove(usize),
    List,
    Stats,
    Help,
    Quit,
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, CliError> {
        let (command, rest) = next_word(line);

        match command.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "add" | "new" => Ok(Self::Add),
            "set" => {
                let (index, rest) = next_word(rest);
                let (field, value) = next_word(rest);
                if index.is_empty() || field.is_empty() {
                    return Err(CliError::Usage(SET_USAGE));
                }
                Ok(Self::Set {
                    index: parse_index(index)?,
                    field: field.parse()?,
                    value: value.trim_end().to_string(),
                })
            }
            "shorten" => Ok(Self::Shorten(single_index(rest, SHORTEN_USAGE)?)),
            "remove" | "rm" => Ok(Self::Remove(single_index(rest, REMOVE_USAGE)?)),
            "list" | "ls" => Ok(Self::List),
            "stats" => Ok(Self::Stats),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CliError::UnknownCommand(other.to_string())),
        }
    }
}

fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn parse_index(s: &str) -> Result<usize, CliError> {
    s.parse().map_err(|_| CliError::InvalidIndex(s.to_string()))
}

fn single_index(rest: &str, usage: &'static str) -> Result<usize, CliError> {
    match next_word(rest) {
        ("", _) => Err(CliError::Usage(usage)),
        (index, "") => parse_index(index),
        _ => Err(CliError::Usage(usage)),
    }
}

/// Run commands read from `input` until `quit` or end of input.
///
/// Form output goes to `out`. With `interactive` set, a banner and a
/// prompt are written as well.
pub async fn run_repl<R, W>(app: &App, input: R, out: &mut W, interactive: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if interactive {
        writeln!(
            out,
            "{} up to {} URLs. Type 'help' for commands.",
            "snip:".bold(),
            app.form().max_urls()
        )?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "snip> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ReplCommand::parse(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{}", format_error(&err))?;
                continue;
            }
        };
        debug!(?command, "REPL command");
        execute(app, command, out).await?;
    }

    app.shutdown();
    Ok(())
}

/// Execute one command. Form errors are printed, write errors returned.
pub async fn execute<W: Write>(app: &App, command: ReplCommand, out: &mut W) -> anyhow::Result<()> {
    let form = app.form();

    match command {
        ReplCommand::Add => match form.add_url().await {
            Ok(index) => writeln!(out, "Added URL #{index}")?,
            Err(err) => writeln!(out, "{}", format_error(&err))?,
        },
        ReplCommand::Set {
            index,
            field,
            value,
        } => match form.update_field(index, field, value).await {
            Ok(()) => {
                let state = form.snapshot().await;
                if let Some(entry) = state.urls.get(index) {
                    writeln!(out, "{}", format_entry(index, entry))?;
                }
            }
            Err(err) => writeln!(out, "{}", format_error(&err))?,
        },
        ReplCommand::Shorten(index) => match form.shorten(index).await {
            Ok(entry) => writeln!(out, "{}", format_shortened(&entry))?,
            Err(err) => writeln!(out, "{}", format_error(&err))?,
        },
        ReplCommand::Remove(index) => match form.remove_url(index).await {
            Ok(_) => writeln!(out, "Removed URL #{index}")?,
            Err(err) => writeln!(out, "{}", format_error(&err))?,
        },
        ReplCommand::List => {
            let state = form.snapshot().await;
            writeln!(out, "{}", format_state(&state, form.max_urls()))?;
        }
        ReplCommand::Stats => match app.metrics_report() {
            Some(report) => write!(out, "{report}")?,
            None => writeln!(out, "Metrics are disabled.")?,
        },
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Quit | ReplCommand::Empty => {}
    }
    Ok(())
}

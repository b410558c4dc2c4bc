use std::io::Write;
use std::path::PathBuf;

use chrono::TimeZone;
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::export::{self, ExportFormat};
use crate::model::DateStyle;
use crate::table::{PageSize, ViewState};

pub const HELP: &str = "\
Commands:
  /TERM | search TERM   filter by title (empty clears)
  page N                jump to page N
  next | prev           move one page
  size N                records per page (5, 10, 15, 20)
  export FORMAT         pdf, xlsx, csv or all
  help                  show this text
  quit                  leave
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(usize),
    Next,
    Prev,
    Size(PageSize),
    Export(Vec<ExportFormat>),
    Help,
    Quit,
}

/// `Ok(None)` for a blank line, which just re-renders.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    if let Some(term) = line.trim_start().strip_prefix('/') {
        return Ok(Some(Command::Search(term.to_string())));
    }

    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "page" | "p" => {
            let page: usize = rest
                .parse()
                .map_err(|_| format!("invalid page '{rest}'"))?;
            if page == 0 {
                return Err("pages start at 1".to_string());
            }
            Command::Page(page)
        }
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "size" | "per-page" => Command::Size(PageSize::parse(rest)?),
        "export" | "e" => {
            let formats = export::parse_format_list(rest)?;
            if formats.is_empty() {
                return Err("export needs a format: pdf, xlsx, csv or all".to_string());
            }
            Command::Export(formats)
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(cmd))
}

/// Rejects page jumps to pages that have no control.
pub fn check_command(state: &ViewState, cmd: &Command) -> Result<(), String> {
    if let Command::Page(page) = cmd {
        let total = state.total_pages();
        if !state.page_numbers().contains(page) {
            return Err(format!("no page {page}, there are {total} pages"));
        }
    }
    Ok(())
}

pub fn apply_command(state: ViewState, cmd: &Command, reset_page_on_search: bool) -> ViewState {
    match cmd {
        Command::Search(term) => {
            let next = state.with_search(term.clone());
            if reset_page_on_search {
                next.with_page(1)
            } else {
                next
            }
        }
        Command::Page(page) => state.with_page(*page),
        Command::Next => {
            let page = state.current_page();
            if page < state.total_pages() {
                state.with_page(page + 1)
            } else {
                state
            }
        }
        Command::Prev => {
            let page = state.current_page();
            let total = state.total_pages();
            // stranded past the end: land on the last real page
            if total > 0 && page > total {
                state.with_page(total)
            } else if page > 1 {
                state.with_page(page - 1)
            } else {
                state
            }
        }
        Command::Size(size) => state.with_page_size(*size),
        Command::Export(_) | Command::Help | Command::Quit => state,
    }
}

#[derive(Clone, Debug)]
pub struct SessionOptions<Tz: TimeZone> {
    pub date_style: DateStyle,
    pub tz: Tz,
    pub output_dir: PathBuf,
    pub reset_page_on_search: bool,
}

/// Renders the visible page to every requested format and saves each file.
pub fn export_visible<Tz: TimeZone>(
    state: &ViewState,
    formats: &[ExportFormat],
    options: &SessionOptions<Tz>,
) -> Result<Vec<PathBuf>, export::ExportError> {
    let items = state.current_items();
    let mut saved = Vec::with_capacity(formats.len());
    for format in formats {
        let bytes = export::export_page(*format, &items, &options.date_style, &options.tz)?;
        saved.push(export::save_export(*format, &bytes, &options.output_dir)?);
    }
    Ok(saved)
}

fn write_out<W: Write>(out: &mut W, text: &str) -> Result<(), String> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| format!("failed to write to terminal: {e}"))
}

/// Reads commands line by line until `quit` or end of input, re-rendering
/// after each one. Returns the final state.
pub async fn run_session<R, W, Tz>(
    reader: R,
    out: &mut W,
    mut state: ViewState,
    options: &SessionOptions<Tz>,
) -> Result<ViewState, String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    Tz: TimeZone,
{
    let mut lines = reader.lines();
    write_out(out, HELP)?;
    loop {
        write_out(out, "> ")?;
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read command: {e}")),
        };

        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                write_out(out, &super::render_table(&state, &options.date_style, &options.tz))?;
                continue;
            }
            Err(e) => {
                write_out(out, &format!("{}\n", e.red()))?;
                continue;
            }
        };
        if let Err(e) = check_command(&state, &cmd) {
            write_out(out, &format!("{}\n", e.red()))?;
            continue;
        }
        tracing::debug!(?cmd, "command");

        match &cmd {
            Command::Quit => break,
            Command::Help => {
                write_out(out, HELP)?;
                continue;
            }
            Command::Export(formats) => {
                match export_visible(&state, formats, options) {
                    Ok(paths) => {
                        for path in paths {
                            write_out(out, &format!(":: Saved     : {}\n", path.display()))?;
                        }
                    }
                    Err(e) => write_out(out, &format!("{}\n", e.to_string().red()))?,
                }
                continue;
            }
            _ => {}
        }

        state = apply_command(state, &cmd, options.reset_page_on_search);
        write_out(out, &super::render_table(&state, &options.date_style, &options.tz))?;
    }
    Ok(state)
}

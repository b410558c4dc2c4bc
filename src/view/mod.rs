pub mod interactive;

use chrono::TimeZone;
use colored::Colorize;
use itertools::Itertools;

use crate::model::{DateStyle, Field};
use crate::table::{PageSize, ViewState};

pub const LOADING: &str = "Loading...";

const MAX_WIDTHS: [usize; 6] = [8, 30, 40, 14, 16, 12];

fn truncate(text: &str, max: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn separator(widths: &[usize; 6]) -> String {
    format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(w + 2)).join("+")
    )
}

fn table_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    format!(
        "| {} |",
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .join(" | ")
    )
}

pub fn page_size_selector(current: PageSize) -> String {
    let options = PageSize::ALL
        .iter()
        .map(|size| {
            if *size == current {
                format!("[{size}]").bold().to_string()
            } else {
                size.to_string()
            }
        })
        .join(" ");
    format!("Items per page: {options}")
}

// one control per page, no ellipsis
pub fn page_controls(state: &ViewState) -> String {
    let current = state.current_page();
    let buttons = state
        .page_numbers()
        .map(|page| {
            if page == current {
                format!("[{page}]").bold().cyan().to_string()
            } else {
                page.to_string()
            }
        })
        .join(" ");
    format!("Pages: {buttons}")
}

/// Renders the current page-window view as a text table with its controls.
pub fn render_table<Tz: TimeZone>(state: &ViewState, date_style: &DateStyle, tz: &Tz) -> String {
    if state.is_loading() {
        return format!("{LOADING}\n");
    }

    let filtered = state.filtered().len();
    let items = state.current_items();
    let rows: Vec<[String; 6]> = items
        .iter()
        .map(|record| {
            let mut cells: [String; 6] = Default::default();
            for (i, field) in Field::ALL.iter().enumerate() {
                cells[i] = truncate(&record.cell_text(*field, date_style, tz), MAX_WIDTHS[i]);
            }
            cells
        })
        .collect();

    let header = Field::ALL.map(|f| f.label().to_string());
    let mut widths = [0usize; 6];
    for (i, width) in widths.iter_mut().enumerate() {
        *width = rows
            .iter()
            .map(|r| r[i].chars().count())
            .chain(std::iter::once(header[i].len()))
            .max()
            .unwrap_or(0);
    }

    let mut out = String::new();
    out.push_str(&"Data Table".bold().to_string());
    out.push('\n');
    out.push_str(&format!(
        ":: Search    : {}\n",
        if state.search_term().is_empty() {
            "-".dimmed().to_string()
        } else {
            state.search_term().to_string()
        }
    ));
    out.push_str(&format!(
        ":: Matches   : {} of {} records\n",
        filtered,
        state.records().len()
    ));
    out.push('\n');

    let sep = separator(&widths);
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&table_line(&header, &widths).bold().to_string());
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows.iter() {
        out.push_str(&table_line(row, &widths));
        out.push('\n');
    }
    if !rows.is_empty() {
        out.push_str(&sep);
        out.push('\n');
    }

    if state.is_page_out_of_range() {
        out.push_str(
            &format!(
                "page {} is past the last page ({})\n",
                state.current_page(),
                state.total_pages()
            )
            .yellow()
            .to_string(),
        );
    }

    out.push('\n');
    out.push_str(&page_size_selector(state.page_size()));
    out.push_str("    ");
    out.push_str(&page_controls(state));
    out.push('\n');
    out
}

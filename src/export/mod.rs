pub mod delimited;
pub mod pdf;
pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeZone;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DateStyle, Field, Record};

pub use crate::model::COLUMNS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Xlsx, ExportFormat::Csv];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" | "excel" | "xls" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Pdf => "data.pdf",
            Self::Xlsx => "data.xlsx",
            Self::Csv => "data.csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv;charset=utf-8",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Xlsx => "Excel",
            Self::Csv => "CSV",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<ExportFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".pdf") {
        return Some(ExportFormat::Pdf);
    }
    if lower.ends_with(".xlsx") {
        return Some(ExportFormat::Xlsx);
    }
    if lower.ends_with(".csv") {
        return Some(ExportFormat::Csv);
    }
    None
}

/// Parses `pdf,csv` style lists; `data.csv` style names work too. `all` expands to every format; duplicates are dropped.
pub fn parse_format_list(value: &str) -> Result<Vec<ExportFormat>, String> {
    let mut out: Vec<ExportFormat> = Vec::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if item.eq_ignore_ascii_case("all") {
            for format in ExportFormat::ALL {
                if !out.contains(&format) {
                    out.push(format);
                }
            }
            continue;
        }
        let format = ExportFormat::parse(item)
            .or_else(|| infer_format_from_path(item))
            .ok_or_else(|| format!("unknown export format '{item}', expected pdf, xlsx or csv"))?;
        if !out.contains(&format) {
            out.push(format);
        }
    }
    Ok(out)
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build PDF document: {message}")]
    Pdf { message: String },

    #[error("failed to build spreadsheet: {source}")]
    Xlsx {
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("failed to write CSV row: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush CSV output: {source}")]
    CsvFlush {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One visible record projected onto the six export columns.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRow {
    pub cells: [String; 6],
    // numeric ids stay numeric in the spreadsheet
    pub id_number: Option<f64>,
}

pub fn project_row<Tz: TimeZone>(record: &Record, date_style: &DateStyle, tz: &Tz) -> ExportRow {
    let cells = Field::ALL.map(|field| record.cell_text(field, date_style, tz));
    let id_number = match record.id.as_ref() {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    ExportRow { cells, id_number }
}

pub fn project_rows<Tz: TimeZone>(
    items: &[&Record],
    date_style: &DateStyle,
    tz: &Tz,
) -> Vec<ExportRow> {
    items
        .iter()
        .map(|record| project_row(record, date_style, tz))
        .collect()
}

pub fn render(format: ExportFormat, rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Pdf => pdf::render_pdf(rows),
        ExportFormat::Xlsx => xlsx::render_xlsx(rows),
        ExportFormat::Csv => delimited::render_csv(rows),
    }
}

pub fn export_page<Tz: TimeZone>(
    format: ExportFormat,
    items: &[&Record],
    date_style: &DateStyle,
    tz: &Tz,
) -> Result<Vec<u8>, ExportError> {
    let rows = project_rows(items, date_style, tz);
    render(format, &rows)
}

/// Writes the rendered file as `<dir>/data.<ext>`, replacing any previous export.
pub fn save_export(format: ExportFormat, bytes: &[u8], dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|e| ExportError::Write {
        path: dir.display().to_string(),
        source: e,
    })?;
    let path = dir.join(format.file_name());
    fs::write(&path, bytes).map_err(|e| ExportError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        format = format.label(),
        mime = format.mime_type(),
        "export written"
    );
    Ok(path)
}

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{ExportError, ExportRow, COLUMNS};

pub const SHEET_NAME: &str = "Data";

#[derive(Clone, Debug, PartialEq)]
pub enum SheetCell {
    Header(&'static str),
    Text(String),
    Number(f64),
    Blank,
}

/// The worksheet contents, row by row: the header first, then one row per record.
pub fn sheet_cells(rows: &[ExportRow]) -> Vec<Vec<SheetCell>> {
    let mut grid = Vec::with_capacity(rows.len() + 1);
    grid.push(COLUMNS.iter().map(|label| SheetCell::Header(*label)).collect());
    for row in rows {
        let cells = row
            .cells
            .iter()
            .enumerate()
            .map(|(col, cell)| match (col, row.id_number) {
                (0, Some(id)) => SheetCell::Number(id),
                _ if cell.is_empty() => SheetCell::Blank,
                _ => SheetCell::Text(cell.clone()),
            })
            .collect();
        grid.push(cells);
    }
    grid
}

pub fn build_workbook(rows: &[ExportRow]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (line, cells) in sheet_cells(rows).iter().enumerate() {
        let line = line as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                SheetCell::Header(label) => {
                    worksheet.write_string_with_format(line, col, *label, &bold)?;
                }
                SheetCell::Text(text) => {
                    worksheet.write_string(line, col, text.as_str())?;
                }
                SheetCell::Number(value) => {
                    worksheet.write_number(line, col, *value)?;
                }
                SheetCell::Blank => {}
            }
        }
    }

    worksheet.autofit();
    Ok(workbook)
}

pub fn render_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(rows).map_err(|e| ExportError::Xlsx { source: e })?;
    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Xlsx { source: e })
}

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::{ExportError, ExportRow, COLUMNS};

// A4 landscape
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 14.0;
const LINE_HEIGHT: f32 = 4.2;
const CELL_PADDING: f32 = 2.3;
const HEADER_ROW_HEIGHT: f32 = LINE_HEIGHT + CELL_PADDING;
const FONT_SIZE: f32 = 9.0;
const HEADER_FONT_SIZE: f32 = 10.0;

// Helvetica at 9pt averages a little under 1.7mm per glyph
const MM_PER_CHAR: f32 = 1.7;
const COLUMN_WIDTHS: [f32; 6] = [18.0, 58.0, 92.0, 34.0, 40.0, 27.0];

/// Vertical space left for body rows once the header is drawn.
pub fn body_height() -> f32 {
    PAGE_HEIGHT - 2.0 * MARGIN - HEADER_ROW_HEIGHT
}

fn max_lines_per_page() -> usize {
    (((body_height() - CELL_PADDING) / LINE_HEIGHT).floor() as usize).max(1)
}

/// One table row with every cell wrapped to its column width.
#[derive(Clone, Debug, PartialEq)]
pub struct PdfRow {
    pub lines: [Vec<String>; 6],
}

impl PdfRow {
    pub fn line_count(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    pub fn height(&self) -> f32 {
        self.line_count() as f32 * LINE_HEIGHT + CELL_PADDING
    }

    /// Cuts a row taller than a page into page-sized pieces.
    fn split(self, max_lines: usize) -> Vec<PdfRow> {
        let count = self.line_count();
        if count <= max_lines {
            return vec![self];
        }
        (0..count)
            .step_by(max_lines)
            .map(|start| PdfRow {
                lines: self.lines.clone().map(|cell| {
                    cell.into_iter().skip(start).take(max_lines).collect()
                }),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub header: [String; 6],
    pub body: Vec<PdfRow>,
}

/// Wraps every row and splits them across pages by measured height, repeating
/// the header on each. An empty export still yields one header-only page.
pub fn layout_pages(rows: &[ExportRow]) -> Vec<PageLayout> {
    let header = COLUMNS.map(|c| c.to_string());
    let available = body_height();
    let max_lines = max_lines_per_page();

    let mut pages = Vec::new();
    let mut body: Vec<PdfRow> = Vec::new();
    let mut used = 0.0;
    for row in rows {
        for piece in wrap_row(&row.cells).split(max_lines) {
            let height = piece.height();
            if !body.is_empty() && used + height > available {
                pages.push(PageLayout {
                    header: header.clone(),
                    body: std::mem::take(&mut body),
                });
                used = 0.0;
            }
            used += height;
            body.push(piece);
        }
    }
    if !body.is_empty() || pages.is_empty() {
        pages.push(PageLayout { header, body });
    }
    pages
}

fn wrap_row(cells: &[String; 6]) -> PdfRow {
    let mut lines: [Vec<String>; 6] = Default::default();
    for (i, cell) in cells.iter().enumerate() {
        lines[i] = wrap_text(cell, COLUMN_WIDTHS[i]);
    }
    PdfRow { lines }
}

fn chars_per_line(width_mm: f32) -> usize {
    ((width_mm - 2.0) / MM_PER_CHAR).floor().max(1.0) as usize
}

/// Greedy word wrap. Line breaks in the text are kept, words wider than the
/// column are broken mid-word, nothing is dropped apart from whitespace runs.
pub fn wrap_text(text: &str, width_mm: f32) -> Vec<String> {
    let max_chars = chars_per_line(width_mm);
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            if line_len > 0 && line_len + 1 + word.len() <= max_chars {
                line.push(' ');
                line.extend(word.iter());
                line_len += 1 + word.len();
                continue;
            }
            if line_len > 0 {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            while word.len() > max_chars {
                let rest = word.split_off(max_chars);
                out.push(word.into_iter().collect());
                word = rest;
            }
            line_len = word.len();
            line = word.into_iter().collect();
        }
        out.push(line);
    }
    out
}

pub fn render_pdf(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let pages = layout_pages(rows);

    let (doc, first_page, first_layer) =
        PdfDocument::new("Data", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf {
            message: e.to_string(),
        })?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf {
            message: e.to_string(),
        })?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, &regular, &bold);
    }

    doc.save_to_bytes().map_err(|e| ExportError::Pdf {
        message: e.to_string(),
    })
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &PageLayout,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let top = PAGE_HEIGHT - MARGIN;
    let mut x = MARGIN;
    for (label, width) in page.header.iter().zip(COLUMN_WIDTHS) {
        layer.use_text(label.as_str(), HEADER_FONT_SIZE, Mm(x), Mm(top - LINE_HEIGHT), bold);
        x += width;
    }

    let mut cursor = top - HEADER_ROW_HEIGHT;
    for row in page.body.iter() {
        let mut x = MARGIN;
        for (cell, width) in row.lines.iter().zip(COLUMN_WIDTHS) {
            for (j, line) in cell.iter().enumerate() {
                if !line.is_empty() {
                    let y = cursor - LINE_HEIGHT * (j + 1) as f32;
                    layer.use_text(line.as_str(), FONT_SIZE, Mm(x), Mm(y), regular);
                }
            }
            x += width;
        }
        cursor -= row.height();
    }
}

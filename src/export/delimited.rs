use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportError, ExportRow, COLUMNS};

// fields holding commas, quotes or line breaks get RFC 4180 quoting
pub fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|e| ExportError::Csv { source: e })?;
    for row in rows {
        writer
            .write_record(&row.cells)
            .map_err(|e| ExportError::Csv { source: e })?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::CsvFlush {
            source: e.into_error(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: [&str; 6]) -> ExportRow {
        ExportRow {
            cells: cells.map(|c| c.to_string()),
            id_number: None,
        }
    }

    #[test]
    fn empty_page_is_header_only() {
        let out = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(out, "ID,Title,Description,Status,Category,Date\n");
    }

    #[test]
    fn one_line_per_row() {
        let rows = vec![
            row(["1", "Alpha", "first", "Open", "News", "1/2/2024"]),
            row(["2", "Beta", "", "Closed", "", ""]),
        ];
        let out = String::from_utf8(render_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,Alpha,first,Open,News,1/2/2024");
        assert_eq!(lines[2], "2,Beta,,Closed,,");
    }

    #[test]
    fn embedded_delimiters_are_quoted() {
        let rows = vec![row([
            "3",
            "Hello, world",
            "say \"hi\"",
            "multi\nline",
            "plain",
            "",
        ])];
        let out = String::from_utf8(render_csv(&rows).unwrap()).unwrap();
        assert!(out.ends_with("3,\"Hello, world\",\"say \"\"hi\"\"\",\"multi\nline\",plain,\n"));
    }
}

//! Text preview of the first rows of a CSV file, laid out like a dataframe head.

use crate::error::DiscoveryError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const MISSING: &str = "NaN";

/// Render the header plus up to `rows` data rows of `path` as an aligned table.
///
/// Reading stops as soon as enough records are parsed.
pub fn read_preview(path: &Path, rows: usize) -> Result<String, DiscoveryError> {
    let read_err = |e| DiscoveryError::Read {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_err)?);
    let mut parser = RecordParser::new(rows.saturating_add(1));
    let mut line = Vec::new();
    let mut first = true;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(read_err)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        let mut text: &str = &text;
        if first {
            text = text.strip_prefix('\u{feff}').unwrap_or(text);
            first = false;
        }
        if parser.feed(text) {
            break;
        }
    }

    let records = parser.finish();
    if records.is_empty() {
        return Err(DiscoveryError::EmptyFile(path.to_path_buf()));
    }

    Ok(render_table(&records[0], &records[1..]))
}

/// Incremental CSV record splitter honoring double-quoted fields
struct RecordParser {
    limit: usize,
    records: Vec<Vec<String>>,
    record: Vec<String>,
    field: String,
    in_quotes: bool,
    quoted: bool,
}

impl RecordParser {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            records: Vec::new(),
            record: Vec::new(),
            field: String::new(),
            in_quotes: false,
            quoted: false,
        }
    }

    fn is_full(&self) -> bool {
        self.records.len() >= self.limit
    }

    /// Consume a chunk of text; true once `limit` records are complete
    fn feed(&mut self, text: &str) -> bool {
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if self.is_full() {
                return true;
            }
            match c {
                '"' if self.in_quotes => {
                    if chars.peek() == Some(&'"') {
                        self.field.push('"');
                        chars.next();
                    } else {
                        self.in_quotes = false;
                    }
                }
                '"' if self.field.is_empty() && !self.quoted => {
                    self.in_quotes = true;
                    self.quoted = true;
                }
                ',' if !self.in_quotes => {
                    self.record.push(std::mem::take(&mut self.field));
                    self.quoted = false;
                }
                '\r' if !self.in_quotes => {}
                '\n' if !self.in_quotes => {
                    if self.record.is_empty() && self.field.is_empty() && !self.quoted {
                        continue;
                    }
                    self.end_record();
                }
                _ => self.field.push(c),
            }
        }
        self.is_full()
    }

    fn end_record(&mut self) {
        self.record.push(std::mem::take(&mut self.field));
        self.records.push(std::mem::take(&mut self.record));
        self.quoted = false;
    }

    /// Flush a trailing record without a final newline
    fn finish(mut self) -> Vec<Vec<String>> {
        if !self.is_full()
            && (!self.record.is_empty() || !self.field.is_empty() || self.quoted)
        {
            self.end_record();
        }
        self.records
    }
}

fn display_cell(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value.replace('\n', "\\n")
    }
}

fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let header: Vec<String> = (0..columns)
        .map(|i| header.get(i).map(|h| h.trim().to_string()).unwrap_or_default())
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|i| display_cell(row.get(i).map(String::as_str).unwrap_or("")))
                .collect()
        })
        .collect();

    let index_width = rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let mut line = " ".repeat(index_width);
    for (name, width) in header.iter().zip(&widths) {
        line.push_str(&format!("  {:>width$}", name, width = width));
    }
    lines.push(line);

    for (idx, row) in cells.iter().enumerate() {
        let mut line = format!("{:<width$}", idx, width = index_width);
        for (value, width) in row.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", value, width = width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

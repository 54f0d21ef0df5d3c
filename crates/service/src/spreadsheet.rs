//! Spreadsheet transcoding between the `books` table and workbook files.
//!
//! Export always writes `.xlsx`. Import reads whatever calamine recognises
//! from the file extension (`.xls`, `.xlsx`, `.ods`, ...). Columns are matched
//! by header name, so their order in the sheet does not matter.

use std::collections::HashMap;
use std::path::Path;

use bookshelf_core::{parse_rating, validate_rating, Book, NewBook, EXPORT_SHEET_NAME};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

/// Header row written by export.
pub const EXPORT_COLUMNS: [&str; 5] = ["id", "title", "author", "series", "rating"];

static EMPTY_CELL: Data = Data::Empty;

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("failed to write workbook: {0}")]
    Write(#[from] XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("first sheet has no header row")]
    MissingHeader,
}

/// One data row of an imported sheet, already validated.
#[derive(Debug)]
pub struct ParsedRow {
    /// 1-based row number as shown by spreadsheet programs
    pub row_number: usize,
    pub book: Result<NewBook, String>,
}

/// Write `books` to a fresh workbook at `path`, replacing any existing file.
pub fn write_books(path: &Path, books: &[Book]) -> Result<(), SpreadsheetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in (0u16..).zip(EXPORT_COLUMNS) {
        worksheet.write_string(0, col, name)?;
    }
    for (row, book) in (1u32..).zip(books) {
        worksheet.write_number(row, 0, book.id as f64)?;
        worksheet.write_string(row, 1, book.title.as_str())?;
        worksheet.write_string(row, 2, book.author.as_str())?;
        if let Some(series) = &book.series {
            worksheet.write_string(row, 3, series.as_str())?;
        }
        worksheet.write_number(row, 4, book.rating)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Read and validate every data row of the first sheet at `path`.
///
/// Row-level problems (missing column, blank title, bad rating) are returned
/// per row; only an unreadable file or a missing header fails the whole call.
/// Fully empty rows are dropped.
pub fn read_books(path: &Path) -> Result<Vec<ParsedRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(SpreadsheetError::NoSheets)??;
    let first_row = range.start().map_or(0, |(row, _)| usize::try_from(row).unwrap_or(0));

    let mut rows = range.rows();
    let header = rows.next().ok_or(SpreadsheetError::MissingHeader)?;
    let columns = Columns::from_header(header);
    if columns.is_empty() {
        return Err(SpreadsheetError::MissingHeader);
    }

    Ok(rows
        .enumerate()
        .filter(|(_, cells)| cells.iter().any(|c| cell_text(c).is_some()))
        .map(|(index, cells)| ParsedRow {
            row_number: first_row + index + 2,
            book: columns.parse(cells),
        })
        .collect())
}

/// Header name → column index, names lowercased and trimmed.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_header(header: &[Data]) -> Self {
        Self(
            header
                .iter()
                .enumerate()
                .filter_map(|(idx, cell)| cell_text(cell).map(|name| (name.to_lowercase(), idx)))
                .collect(),
        )
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn cell<'a>(&self, cells: &'a [Data], name: &str) -> Result<&'a Data, String> {
        let idx = self.0.get(name).ok_or_else(|| format!("missing column '{name}'"))?;
        Ok(cells.get(*idx).unwrap_or(&EMPTY_CELL))
    }

    fn parse(&self, cells: &[Data]) -> Result<NewBook, String> {
        let title = cell_text(self.cell(cells, "title")?).unwrap_or_default();
        let author = cell_text(self.cell(cells, "author")?).unwrap_or_default();
        let series = match self.cell(cells, "series") {
            Ok(cell) => cell_text(cell),
            Err(_) => None,
        };
        let rating = cell_rating(self.cell(cells, "rating")?)?;
        NewBook::new(&title, &author, series.as_deref(), rating).map_err(|e| e.to_string())
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_owned(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn cell_rating(cell: &Data) -> Result<f64, String> {
    let value = match cell {
        Data::Float(f) => validate_rating(*f),
        Data::Int(i) => validate_rating(*i as f64),
        Data::String(s) => parse_rating(s),
        Data::Empty => parse_rating(""),
        other => parse_rating(&other.to_string()),
    };
    value.map_err(|e| e.to_string())
}

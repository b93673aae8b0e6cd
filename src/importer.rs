use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader};

use crate::error::{KoboError, Result};
use crate::models::{CellValue, RawRow, Transaction};
use crate::normalizer::{normalize_row, DateOrder, RowSkip};

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub date_order: DateOrder,
}

/// Dropped-row tally, by reason. Rows are dropped silently; the counts are
/// for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub missing_columns: usize,
    pub bad_dates: usize,
    pub bad_amounts: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.missing_columns + self.bad_dates + self.bad_amounts
    }

    fn note(&mut self, skip: RowSkip) {
        match skip {
            RowSkip::MissingColumn => self.missing_columns += 1,
            RowSkip::BadDate => self.bad_dates += 1,
            RowSkip::BadAmount => self.bad_amounts += 1,
        }
    }
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: SkipCounts,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read a statement file from disk and import it. The extension picks the
/// adapter; everything after the read is pure.
pub fn import_path(path: &Path, options: &ImportOptions) -> Result<ImportOutcome> {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let bytes = std::fs::read(path)?;
    import_bytes(filename, &bytes, options)
}

/// Import an in-memory statement payload. An extension no adapter claims is
/// a hard error, distinct from a well-formed file that yields nothing.
pub fn import_bytes(filename: &str, bytes: &[u8], options: &ImportOptions) -> Result<ImportOutcome> {
    let extension = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "csv" => import_csv(bytes, options),
        "xlsx" | "xls" => import_workbook_with(bytes, &KeywordHeaderLocator, options),
        "json" => import_json(bytes, options),
        _ => Err(KoboError::UnsupportedFormat(filename.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Row collection (shared tail of every adapter)
// ---------------------------------------------------------------------------

struct RowCollector {
    date_order: DateOrder,
    next_id: u64,
    transactions: Vec<Transaction>,
    skipped: SkipCounts,
}

impl RowCollector {
    fn new(options: &ImportOptions) -> Self {
        Self {
            date_order: options.date_order,
            next_id: 1,
            transactions: Vec::new(),
            skipped: SkipCounts::default(),
        }
    }

    fn push(&mut self, row: RawRow) {
        match normalize_row(row, self.next_id, self.date_order) {
            Ok(txn) => {
                self.next_id += 1;
                self.transactions.push(txn);
            }
            Err(skip) => self.skipped.note(skip),
        }
    }

    fn skip(&mut self, reason: RowSkip) {
        self.skipped.note(reason);
    }

    fn finish(self) -> ImportOutcome {
        ImportOutcome {
            transactions: self.transactions,
            skipped: self.skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV adapter
// ---------------------------------------------------------------------------

fn import_csv(bytes: &[u8], options: &ImportOptions) -> Result<ImportOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut collector = RowCollector::new(options);
    let mut records = reader.records();

    // The first record is the header row, unconditionally.
    let headers: Vec<String> = match records.next() {
        Some(first) => first?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(collector.finish()),
    };

    for record in records {
        let record = record?;
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = match record.get(i) {
                Some(field) => CellValue::Text(field.to_string()),
                None => CellValue::Empty,
            };
            row.push(header.clone(), value);
        }
        collector.push(row);
    }
    Ok(collector.finish())
}

// ---------------------------------------------------------------------------
// Workbook adapter
// ---------------------------------------------------------------------------

/// Strategy for finding the real header row inside a sheet. Bank exports
/// often stack title and metadata rows above the actual table; a custom
/// locator can handle layouts the default keyword scan does not.
pub trait HeaderLocator {
    fn locate(&self, rows: &[Vec<CellValue>]) -> Option<usize>;
}

/// Default strategy: the first row whose concatenated cell text mentions a
/// date column, a description-ish column, and an amount-ish column.
pub struct KeywordHeaderLocator;

impl HeaderLocator for KeywordHeaderLocator {
    fn locate(&self, rows: &[Vec<CellValue>]) -> Option<usize> {
        rows.iter().position(|cells| {
            let joined = cells
                .iter()
                .map(|c| c.to_text())
                .collect::<Vec<_>>()
                .join("|")
                .to_lowercase();
            joined.contains("date")
                && (joined.contains("narration") || joined.contains("description"))
                && (joined.contains("debit") || joined.contains("credit") || joined.contains("amount"))
        })
    }
}

pub fn import_workbook_with(
    bytes: &[u8],
    locator: &dyn HeaderLocator,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| KoboError::Workbook(format!("failed to open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| KoboError::Workbook("workbook has no sheets".to_string()))?
        .map_err(|e| KoboError::Workbook(format!("failed to read first sheet: {e}")))?;

    // Cells stay in native form; pre-formatting them to strings would send
    // serial dates down the wrong branch.
    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|r| r.iter().map(cell_from_sheet).collect())
        .collect();

    // No header found anywhere: best effort with the sheet's first row.
    let header_index = locator.locate(&rows).unwrap_or(0);
    Ok(assemble_rows(&rows, header_index, options))
}

fn cell_from_sheet(data: &Data) -> CellValue {
    match data {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Empty | Data::Error(_) => CellValue::Empty,
    }
}

/// Turn the header row at `header_index` plus everything beneath it into
/// transactions.
fn assemble_rows(rows: &[Vec<CellValue>], header_index: usize, options: &ImportOptions) -> ImportOutcome {
    let mut collector = RowCollector::new(options);
    let Some(header_cells) = rows.get(header_index) else {
        return collector.finish();
    };
    let headers: Vec<String> = header_cells.iter().map(|c| c.to_text().trim().to_string()).collect();

    for cells in &rows[header_index + 1..] {
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            row.push(header.clone(), cells.get(i).cloned().unwrap_or(CellValue::Empty));
        }
        collector.push(row);
    }
    collector.finish()
}

// ---------------------------------------------------------------------------
// JSON adapter
// ---------------------------------------------------------------------------

fn import_json(bytes: &[u8], options: &ImportOptions) -> Result<ImportOutcome> {
    let payload: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Array(entries) = payload else {
        return Err(KoboError::InvalidPayload(
            "JSON payload must be an array of transactions".to_string(),
        ));
    };

    let mut collector = RowCollector::new(options);
    for entry in entries {
        let serde_json::Value::Object(map) = entry else {
            collector.skip(RowSkip::MissingColumn);
            continue;
        };
        let mut row = RawRow::new();
        for (header, value) in map {
            row.push(header, cell_from_json(&value));
        }
        collector.push(row);
    }
    Ok(collector.finish())
}

fn cell_from_json(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        serde_json::Value::Bool(b) => CellValue::Text(b.to_string()),
        _ => CellValue::Empty,
    }
}

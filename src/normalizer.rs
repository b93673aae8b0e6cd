use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::{CellValue, RawRow, Transaction, TxnType};

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

// Header names seen across bank exports, matched case-insensitively.
const DATE_COLUMNS: &[&str] = &["date", "transaction date", "posting date", "timestamp", "value date"];
const DESCRIPTION_COLUMNS: &[&str] = &[
    "description",
    "desc",
    "details",
    "memo",
    "narration",
    "transaction description",
    "remarks",
];
const AMOUNT_COLUMNS: &[&str] = &["amount", "value", "transaction amount", "transaction amount (ngn)"];
const DEBIT_COLUMNS: &[&str] = &["debit", "dr", "settlement debit", "settlement debit (ngn)"];
const CREDIT_COLUMNS: &[&str] = &["credit", "cr", "settlement credit", "settlement credit (ngn)"];

pub struct ResolvedColumns<'a> {
    pub date: Option<&'a CellValue>,
    pub description: Option<&'a CellValue>,
    pub amount: Option<&'a CellValue>,
    pub debit: Option<&'a CellValue>,
    pub credit: Option<&'a CellValue>,
}

pub fn resolve_columns(row: &RawRow) -> ResolvedColumns<'_> {
    ResolvedColumns {
        date: row.find(DATE_COLUMNS),
        description: row.find(DESCRIPTION_COLUMNS),
        amount: row.find(AMOUNT_COLUMNS),
        debit: row.find(DEBIT_COLUMNS),
        credit: row.find(CREDIT_COLUMNS),
    }
}

// ---------------------------------------------------------------------------
// Date normalization
// ---------------------------------------------------------------------------

/// Which side of an ambiguous `a/b/YYYY` date is the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

const SLASH_DATE_PATTERN: &str = r"^(\d{1,2})/(\d{1,2})/(\d{4})";

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%d %b %Y"];
const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn normalize_date(value: &CellValue, order: DateOrder) -> Option<NaiveDate> {
    match value {
        CellValue::Number(serial) => serial_to_date(*serial),
        CellValue::Text(s) => parse_date_string(s, order),
        CellValue::Empty => None,
    }
}

/// Spreadsheet serial day count. The epoch is 1900-01-01 with a fixed -2 day
/// correction (the historical 1900 leap-year bug convention), so serial 45660
/// lands on 2025-01-03. Fractional time-of-day is discarded.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > 4_000_000.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    epoch.checked_add_signed(Duration::try_days(serial.trunc() as i64 - 2)?)
}

fn parse_date_string(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(caps) = Regex::new(SLASH_DATE_PATTERN).ok()?.captures(s) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let (day, month) = match order {
            DateOrder::DayFirst => (a, b),
            DateOrder::MonthFirst => (b, a),
        };
        // A matched pattern that is not a real calendar date is a failure,
        // not a fallthrough to the generic formats.
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Amount parsing
// ---------------------------------------------------------------------------

/// Debit/credit cells: comma-stripped decimal, zero when blank or unparseable.
fn settlement_value(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.replace(',', "").trim().parse().unwrap_or(0.0),
        CellValue::Empty => 0.0,
    }
}

/// Single amount column: commas stripped, then everything that is not a
/// digit, sign, or decimal point (currency symbols, stray spaces). None when
/// nothing parseable remains.
fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => {
            let cleaned: String = s
                .replace(',', "")
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().ok()
        }
        CellValue::Empty => None,
    }
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Why a row was dropped instead of becoming a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    /// No resolvable date or description column.
    MissingColumn,
    /// Date cell present but not a calendar date.
    BadDate,
    /// Zero on both settlement sides, unparseable single amount, or no
    /// amount column at all.
    BadAmount,
}

pub fn normalize_row(row: RawRow, id: u64, order: DateOrder) -> Result<Transaction, RowSkip> {
    let columns = resolve_columns(&row);
    let (Some(date_cell), Some(desc_cell)) = (columns.date, columns.description) else {
        return Err(RowSkip::MissingColumn);
    };

    let date = normalize_date(date_cell, order).ok_or(RowSkip::BadDate)?;

    let (amount, txn_type) = if let (Some(debit), Some(credit)) = (columns.debit, columns.credit) {
        let credit_value = settlement_value(credit);
        let debit_value = settlement_value(debit);
        if credit_value > 0.0 {
            (credit_value, TxnType::Inflow)
        } else if debit_value > 0.0 {
            (debit_value, TxnType::Expense)
        } else {
            return Err(RowSkip::BadAmount);
        }
    } else if let Some(amount_cell) = columns.amount {
        let value = parse_amount(amount_cell).ok_or(RowSkip::BadAmount)?;
        if value < 0.0 {
            (-value, TxnType::Expense)
        } else {
            // Zero becomes a zero-amount inflow here, while the debit/credit
            // path rejects an all-zero row. Kept asymmetric: see DESIGN.md.
            (value, TxnType::Inflow)
        }
    } else {
        return Err(RowSkip::BadAmount);
    };

    let description = {
        let trimmed = desc_cell.to_text().trim().to_string();
        if trimmed.is_empty() {
            "Unknown".to_string()
        } else {
            trimmed
        }
    };

    Ok(Transaction {
        id,
        date,
        description,
        amount,
        txn_type,
        original: row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> RawRow {
        let mut r = RawRow::new();
        for (header, value) in cells {
            r.push(*header, value.clone());
        }
        r
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn rejects_row_without_date_column() {
        let r = row(&[("Narration", text("POS purchase")), ("Amount", text("100"))]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::MissingColumn)));
    }

    #[test]
    fn rejects_row_without_description_column() {
        let r = row(&[("Date", text("04/01/2025")), ("Amount", text("100"))]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::MissingColumn)));
    }

    #[test]
    fn serial_date_uses_1900_epoch_with_offset() {
        assert_eq!(
            serial_to_date(45660.0),
            NaiveDate::from_ymd_opt(2025, 1, 3)
        );
    }

    #[test]
    fn serial_date_discards_time_fraction() {
        assert_eq!(serial_to_date(45660.73), NaiveDate::from_ymd_opt(2025, 1, 3));
    }

    #[test]
    fn slash_date_is_day_first_by_default() {
        // NOT April 1.
        assert_eq!(
            parse_date_string("04/01/2025", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
    }

    #[test]
    fn slash_date_ignores_time_suffix() {
        assert_eq!(
            parse_date_string("04/01/2025 7:50:49", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
    }

    #[test]
    fn month_first_swaps_the_ambiguous_halves() {
        assert_eq!(
            parse_date_string("04/01/2025", DateOrder::MonthFirst),
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
    }

    #[test]
    fn matched_but_impossible_date_fails_outright() {
        // 31/02 matches the slash pattern; it must not fall through to the
        // generic formats.
        assert_eq!(parse_date_string("31/02/2025", DateOrder::DayFirst), None);
        assert_eq!(parse_date_string("04/13/2025", DateOrder::DayFirst), None);
    }

    #[test]
    fn iso_dates_parse_via_fallback() {
        assert_eq!(
            parse_date_string("2025-06-15", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert_eq!(
            parse_date_string("2025-06-15 09:30:00", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
    }

    #[test]
    fn credit_side_wins_when_positive() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Narration", text("Transfer in")),
            ("Debit", text("0")),
            ("Credit", text("150.00")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Inflow);
        assert_eq!(txn.amount, 150.0);
    }

    #[test]
    fn debit_side_wins_when_credit_is_zero() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Narration", text("POS purchase")),
            ("Debit", text("75.50")),
            ("Credit", text("0")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Expense);
        assert_eq!(txn.amount, 75.5);
    }

    #[test]
    fn all_zero_settlement_row_is_rejected() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Narration", text("Reversal")),
            ("Debit", text("0")),
            ("Credit", text("0")),
        ]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::BadAmount)));
    }

    #[test]
    fn settlement_values_strip_thousands_separators() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Narration", text("Salary")),
            ("Settlement Debit (NGN)", text("")),
            ("Settlement Credit (NGN)", text("1,500.75")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Inflow);
        assert_eq!(txn.amount, 1500.75);
    }

    #[test]
    fn negative_single_amount_becomes_expense() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("Grocery store")),
            ("Amount", text("-2,500.00")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Expense);
        assert_eq!(txn.amount, 2500.0);
    }

    #[test]
    fn positive_single_amount_becomes_inflow() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("Refund")),
            ("Amount", text("1000")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Inflow);
        assert_eq!(txn.amount, 1000.0);
    }

    #[test]
    fn currency_symbols_are_stripped_from_single_amounts() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("Deposit")),
            ("Amount", text("₦3,500.00")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.amount, 3500.0);
    }

    #[test]
    fn unparseable_single_amount_is_rejected() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("???")),
            ("Amount", text("pending")),
        ]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::BadAmount)));
    }

    #[test]
    fn row_without_any_amount_column_is_rejected() {
        let r = row(&[("Date", text("04/01/2025")), ("Description", text("No amounts here"))]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::BadAmount)));
    }

    #[test]
    fn zero_single_amount_is_accepted_as_inflow() {
        // Asymmetric with the all-zero settlement rejection above; kept
        // deliberately (DESIGN.md).
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("Zero adjustment")),
            ("Amount", text("0")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.txn_type, TxnType::Inflow);
        assert_eq!(txn.amount, 0.0);
    }

    #[test]
    fn blank_description_falls_back_to_unknown() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", text("   ")),
            ("Amount", text("500")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.description, "Unknown");
    }

    #[test]
    fn numeric_description_uses_its_text_form() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Description", CellValue::Number(40514.0)),
            ("Amount", text("500")),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.description, "40514");
    }

    #[test]
    fn numeric_date_cell_takes_the_serial_branch() {
        let r = row(&[
            ("Date", CellValue::Number(45660.0)),
            ("Narration", text("POS purchase")),
            ("Debit", CellValue::Number(200.0)),
            ("Credit", CellValue::Empty),
        ]);
        let txn = normalize_row(r, 1, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(txn.txn_type, TxnType::Expense);
    }

    #[test]
    fn original_row_is_retained_for_diagnostics() {
        let r = row(&[
            ("Date", text("04/01/2025")),
            ("Narration", text("POS purchase")),
            ("Amount", text("-120")),
        ]);
        let txn = normalize_row(r, 7, DateOrder::DayFirst).unwrap();
        assert_eq!(txn.id, 7);
        assert_eq!(
            txn.original.find(&["narration"]),
            Some(&CellValue::Text("POS purchase".into()))
        );
    }

    #[test]
    fn unparseable_date_is_rejected_not_defaulted() {
        let r = row(&[
            ("Date", text("sometime last week")),
            ("Description", text("Mystery")),
            ("Amount", text("100")),
        ]);
        assert!(matches!(normalize_row(r, 1, DateOrder::DayFirst), Err(RowSkip::BadDate)));
    }
}

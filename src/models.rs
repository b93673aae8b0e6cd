use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell as read from a source file, before any interpretation.
///
/// Spreadsheet cells keep their native type (dates arrive as serial numbers,
/// not pre-formatted strings); CSV cells are always text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{n}"),
            CellValue::Empty => String::new(),
        }
    }
}

/// An ordered header → cell mapping for one source row.
///
/// Order matters: when several columns qualify for the same role, the first
/// one in declaration order wins.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    /// First cell whose header (case-folded) appears in `candidates`.
    pub fn find(&self, candidates: &[&str]) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(header, _)| candidates.contains(&header.to_lowercase().as_str()))
            .map(|(_, value)| value)
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Inflow,
    Expense,
}

/// Canonical transaction produced by the row normalizer.
///
/// `amount` is always non-negative; direction lives in `txn_type`. The source
/// row is kept for diagnostics.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: u64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub txn_type: TxnType,
    pub original: RawRow,
}

/// A transaction with its spending category attached.
#[derive(Debug, Clone)]
pub struct CategorizedTransaction {
    pub txn: Transaction,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Mobile Data")]
    MobileData,
    Shopping,
    #[serde(rename = "Helping Others")]
    HelpingOthers,
    Gambling,
    #[serde(rename = "Bill Payment")]
    BillPayment,
    Airtime,
    Salary,
    Transfer,
    Food,
    Transport,
    Entertainment,
    Miscellaneous,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::MobileData => "Mobile Data",
            Category::Shopping => "Shopping",
            Category::HelpingOthers => "Helping Others",
            Category::Gambling => "Gambling",
            Category::BillPayment => "Bill Payment",
            Category::Airtime => "Airtime",
            Category::Salary => "Salary",
            Category::Transfer => "Transfer",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Miscellaneous => "Miscellaneous",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

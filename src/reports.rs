use chrono::Datelike;

use crate::models::{CategorizedTransaction, Category, TxnType};

pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const MONTHS_LONG: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// ---------------------------------------------------------------------------
// Summary view-model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct MonthlyTotal {
    pub month: &'static str,
    pub expense: f64,
    pub inflow: f64,
}

#[derive(Debug, Clone)]
pub struct Insights {
    pub top_category: String,
    pub highest_spending_month: String,
    pub net_savings: f64,
    pub savings_rate: f64,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub total_inflow: f64,
    pub total_expense: f64,
    /// Expense totals per category, descending; ties keep first-encountered
    /// order.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Twelve month-of-year buckets. Statements spanning several years
    /// collapse into the same buckets.
    pub monthly: Vec<MonthlyTotal>,
    pub insights: Insights,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Full recompute over the categorized list. Pure; call it again and you get
/// the same summary.
pub fn summarize(transactions: &[CategorizedTransaction]) -> Summary {
    let mut total_inflow = 0.0f64;
    let mut total_expense = 0.0f64;
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut monthly_expense = [0.0f64; 12];
    let mut monthly_inflow = [0.0f64; 12];

    for t in transactions {
        let month = t.txn.date.month0() as usize;
        match t.txn.txn_type {
            TxnType::Inflow => {
                total_inflow += t.txn.amount;
                monthly_inflow[month] += t.txn.amount;
            }
            TxnType::Expense => {
                total_expense += t.txn.amount;
                monthly_expense[month] += t.txn.amount;
                match by_category.iter_mut().find(|c| c.category == t.category) {
                    Some(entry) => entry.total += t.txn.amount,
                    None => by_category.push(CategoryTotal {
                        category: t.category,
                        total: t.txn.amount,
                    }),
                }
            }
        }
    }

    // Stable sort: equal sums keep first-encountered order.
    by_category.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    let top_category = by_category
        .first()
        .map(|c| c.category.name().to_string())
        .unwrap_or_else(|| "None".to_string());

    let mut peak = 0usize;
    for (i, spent) in monthly_expense.iter().enumerate() {
        if *spent > monthly_expense[peak] {
            peak = i;
        }
    }

    let net_savings = total_inflow - total_expense;
    let savings_rate = if total_inflow > 0.0 {
        net_savings / total_inflow * 100.0
    } else {
        0.0
    };

    let monthly = (0..12)
        .map(|i| MonthlyTotal {
            month: MONTHS_SHORT[i],
            expense: monthly_expense[i],
            inflow: monthly_inflow[i],
        })
        .collect();

    Summary {
        total_inflow,
        total_expense,
        expenses_by_category: by_category,
        monthly,
        insights: Insights {
            top_category,
            highest_spending_month: MONTHS_LONG[peak].to_string(),
            net_savings,
            savings_rate,
        },
    }
}

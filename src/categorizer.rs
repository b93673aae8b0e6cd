use std::path::Path;

use serde::Deserialize;

use crate::error::{KoboError, Result};
use crate::models::{CategorizedTransaction, Category, Transaction, TxnType};

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Ordered keyword rules mapping descriptions to spending categories.
///
/// Scan order is declaration order and decides ties ("bet" beats "food"
/// because Gambling is declared before Food). The Salary entry serves the
/// inflow check only; Salary and Miscellaneous are never scanned for
/// expenses.
#[derive(Debug)]
pub struct Categorizer {
    rules: Vec<Rule>,
}

fn rule(category: Category, keywords: &[&str]) -> Rule {
    Rule {
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(vec![
            rule(Category::MobileData, &["data", "mtn", "glo", "airtel", "9mobile", "internet", "wifi", "bundle"]),
            rule(Category::Airtime, &["airtime", "recharge", "topup", "top up", "vtu"]),
            rule(Category::Shopping, &["supermarket", "store", "mall", "shop", "amazon", "jumia", "konga", "market", "buy"]),
            rule(Category::HelpingOthers, &["gift", "charity", "donation", "help", "support", "family", "friend"]),
            rule(Category::Gambling, &["bet", "bwin", "1xbet", "sporty", "lottery", "casino", "stake"]),
            rule(Category::BillPayment, &["bill", "nep", "phcn", "electric", "waste", "lawma", "water", "subscription", "cable", "dstv", "gotv", "netflix"]),
            rule(Category::Food, &["food", "restaurant", "eatery", "burger", "pizza", "chicken", "cafe", "coffee", "drink", "bar"]),
            rule(Category::Transport, &["uber", "bolt", "taxify", "ride", "trip", "fuel", "gas", "station", "transport", "bus", "train", "flight"]),
            rule(Category::Entertainment, &["movie", "cinema", "show", "concert", "game", "playstation", "steam", "spotify", "apple m"]),
            rule(Category::Salary, &["salary", "wage", "payroll", "income", "earning"]),
            rule(Category::Transfer, &["transfer", "trf", "sent to", "received from"]),
        ])
    }
}

impl Categorizer {
    pub fn new(rules: Vec<Rule>) -> Self {
        // Keywords are matched against a case-folded description.
        let rules = rules
            .into_iter()
            .map(|r| Rule {
                category: r.category,
                keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Load a custom rule table (JSON array of `{category, keywords}`),
    /// replacing the default table. File order is scan order.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rules: Vec<Rule> = serde_json::from_str(&content)
            .map_err(|e| KoboError::Rules(format!("{}: {e}", path.display())))?;
        if rules.is_empty() {
            return Err(KoboError::Rules(format!("{}: no rules defined", path.display())));
        }
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    pub fn categorize(&self, txn: &Transaction) -> Category {
        let description = txn.description.to_lowercase();

        if txn.txn_type == TxnType::Inflow {
            let is_salary = self
                .rules
                .iter()
                .find(|r| r.category == Category::Salary)
                .map(|r| r.keywords.iter().any(|k| description.contains(k.as_str())))
                .unwrap_or(false);
            return if is_salary {
                Category::Salary
            } else {
                Category::Miscellaneous
            };
        }

        for rule in &self.rules {
            if matches!(rule.category, Category::Salary | Category::Miscellaneous) {
                continue;
            }
            if rule.keywords.iter().any(|k| description.contains(k.as_str())) {
                return rule.category;
            }
        }
        Category::Miscellaneous
    }

    pub fn process(&self, transactions: Vec<Transaction>) -> Vec<CategorizedTransaction> {
        transactions
            .into_iter()
            .map(|txn| {
                let category = self.categorize(&txn);
                CategorizedTransaction { txn, category }
            })
            .collect()
    }
}

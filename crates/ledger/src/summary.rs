//! Aggregations over a list of transactions.
//!
//! Everything here is a pure function of its input: nothing is cached and the
//! result never depends on the order of the transactions.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::{Money, Transaction, TransactionKind};

/// Totals of a transaction set. The balance is derived on read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_income: Money,
    pub total_expenses: Money,
}

impl FinancialSummary {
    #[must_use]
    pub fn balance(&self) -> Money {
        self.total_income - self.total_expenses
    }
}

/// Income and expenses booked in one calendar month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub income: Money,
    pub expenses: Money,
}

/// Sums every income and every expense.
pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => summary.total_income += tx.amount,
            TransactionKind::Expense => summary.total_expenses += tx.amount,
        }
    }
    summary
}

/// Totals per category, only for transactions of `kind`.
pub fn group_by_category(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        *totals.entry(tx.category.clone()).or_default() += tx.amount;
    }
    totals
}

/// Totals per month of the year, keyed `1..=12`.
///
/// Every month is present, zero when nothing was booked. Transactions from
/// different years that share a month are folded together.
pub fn group_by_month(transactions: &[Transaction]) -> BTreeMap<u32, MonthlyTotals> {
    let mut months: BTreeMap<u32, MonthlyTotals> =
        (1..=12).map(|month| (month, MonthlyTotals::default())).collect();
    for tx in transactions {
        let entry = months.entry(tx.date.month()).or_default();
        match tx.kind {
            TransactionKind::Income => entry.income += tx.amount,
            TransactionKind::Expense => entry.expenses += tx.amount,
        }
    }
    months
}

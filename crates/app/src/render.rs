//! Plain-text rendering of ledger data for the terminal.

use std::collections::BTreeMap;

use chrono::Month;
use ledger::{FinancialSummary, Money, MonthlyTotals, Transaction};

/// Formats an amount as dollars with thousands separators: `$1,234.50`.
/// Decimals beyond the cents are shown, never rounded away.
pub fn money(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.abs().to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{fraction}")
}

pub fn transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions.\n".to_string();
    }
    let desc_width = column_width(
        transactions.iter().map(|tx| tx.description.as_str()),
        "Description",
    );
    let cat_width = column_width(
        transactions.iter().map(|tx| tx.category.as_str()),
        "Category",
    );

    let mut out = format!(
        "{:>5}  {:<10}  {:<desc_width$}  {:>14}  {:<cat_width$}  Type\n",
        "Id", "Date", "Description", "Amount", "Category"
    );
    for tx in transactions {
        out.push_str(&format!(
            "{:>5}  {:<10}  {:<desc_width$}  {:>14}  {:<cat_width$}  {}\n",
            tx.id,
            tx.date.to_string(),
            tx.description,
            money(tx.amount),
            tx.category,
            tx.kind
        ));
    }
    out
}

pub fn transaction(tx: &Transaction) -> String {
    format!(
        "Id:          {}\nDate:        {}\nDescription: {}\nAmount:      {}\nCategory:    {}\nType:        {}\n",
        tx.id,
        tx.date,
        tx.description,
        money(tx.amount),
        tx.category,
        tx.kind
    )
}

pub fn summary(summary: &FinancialSummary) -> String {
    format!(
        "Total income:   {:>14}\nTotal expenses: {:>14}\nBalance:        {:>14}\n",
        money(summary.total_income),
        money(summary.total_expenses),
        money(summary.balance())
    )
}

pub fn categories(totals: &BTreeMap<String, Money>) -> String {
    if totals.is_empty() {
        return "No transactions.\n".to_string();
    }
    let width = column_width(totals.keys().map(String::as_str), "Category");
    totals
        .iter()
        .map(|(category, total)| format!("{category:<width$}  {:>14}\n", money(*total)))
        .collect()
}

pub fn months(months: &BTreeMap<u32, MonthlyTotals>) -> String {
    let mut out = format!("{:<9}  {:>14}  {:>14}\n", "Month", "Income", "Expenses");
    for (number, totals) in months {
        let name = u8::try_from(*number)
            .ok()
            .and_then(|n| Month::try_from(n).ok())
            .map_or("?", |m| m.name());
        out.push_str(&format!(
            "{name:<9}  {:>14}  {:>14}\n",
            money(totals.income),
            money(totals.expenses)
        ));
    }
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

//! Transaction primitives.
//!
//! A [`Transaction`] is one persisted financial event. It is never mutated:
//! an edit is a delete followed by an insert of a fresh [`NewTransaction`].

use std::fmt;

use chrono::NaiveDate;
use sea_orm::{ActiveValue, FromQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money, ResultLedger};

/// Storage format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(LedgerError::Validation(format!(
                "invalid transaction type: {value}"
            ))),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A validated transaction that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub kind: TransactionKind,
}

impl NewTransaction {
    /// Builds a new transaction from trimmed text fields, then
    /// [`validate`](Self::validate)s it.
    pub fn new(
        date: NaiveDate,
        description: &str,
        amount: Money,
        category: &str,
        kind: TransactionKind,
    ) -> ResultLedger<Self> {
        let tx = Self {
            date,
            description: description.trim().to_string(),
            amount,
            category: category.trim().to_string(),
            kind,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Text fields must not be blank. The amount must be strictly positive,
    /// the sign is given by `kind`, and must be stored without loss.
    pub fn validate(&self) -> ResultLedger<()> {
        required_text(&self.description, "description")?;
        required_text(&self.category, "category")?;
        if !self.amount.is_positive() {
            return Err(LedgerError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        self.amount.check_storable()
    }
}

fn required_text(value: &str, label: &str) -> ResultLedger<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{label} must not be empty")));
    }
    Ok(())
}

/// Raw form input, as typed by a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: String,
}

impl TransactionDraft {
    /// Parses and validates every field, reporting the first bad one.
    pub fn parse(&self) -> ResultLedger<NewTransaction> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            LedgerError::Validation(format!("invalid date: {} (expected YYYY-MM-DD)", self.date))
        })?;
        let amount: Money = self.amount.parse()?;
        let kind = TransactionKind::try_from(self.kind.as_str())?;
        NewTransaction::new(date, &self.description, amount, &self.category, kind)
    }
}

/// Pre-fills an edit form from a stored transaction.
impl From<&Transaction> for TransactionDraft {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date.format(DATE_FORMAT).to_string(),
            description: tx.description.clone(),
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            kind: tx.kind.as_str().to_string(),
        }
    }
}

/// A stored transaction. Values handed out by the ledger are snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub kind: TransactionKind,
}

impl Transaction {
    pub(crate) fn from_new(id: i64, tx: NewTransaction) -> Self {
        Self {
            id,
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
            category: tx.category,
            kind: tx.kind,
        }
    }

    /// The fields of this transaction without its id.
    pub fn details(&self) -> NewTransaction {
        NewTransaction {
            date: self.date,
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            kind: self.kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: String,
    pub category: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewTransaction> for ActiveModel {
    fn from(tx: &NewTransaction) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(tx.date.format(DATE_FORMAT).to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            amount: ActiveValue::Set(tx.amount.to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
        }
    }
}

/// Columns selected when reading rows back.
///
/// The `DECIMAL` column has numeric affinity, so SQLite may keep the amount
/// as INTEGER or REAL; it is cast to text and decoded exactly.
pub(crate) const SELECT_ROWS: &str = "SELECT id, date, description, \
     CAST(amount AS TEXT) AS amount, category, type AS kind FROM transactions";

#[derive(Debug, FromQueryResult)]
pub(crate) struct Row {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: String,
}

impl TryFrom<Row> for Transaction {
    type Error = LedgerError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        let corrupted = |what: &str| LedgerError::CorruptedRow(format!("row {}: {what}", row.id));
        let date = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT)
            .map_err(|_| corrupted(&format!("invalid date {}", row.date)))?;
        let amount = Money::from_stored(&row.amount)
            .ok_or_else(|| corrupted(&format!("invalid amount {}", row.amount)))?;
        let kind = TransactionKind::try_from(row.kind.as_str())
            .map_err(|_| corrupted(&format!("invalid type {}", row.kind)))?;
        Ok(Self {
            id: row.id,
            date,
            description: row.description,
            amount,
            category: row.category,
            kind,
        })
    }
}

//! Transaction ledger backed by SQLite.
//!
//! The [`Ledger`] is the single owner of the `transactions` table: it
//! validates and stores transactions, lists them newest first, computes
//! summaries on demand and tells registered [`LedgerObserver`]s about every
//! committed change.
//!
//! ```no_run
//! # async fn run() -> ledger::ResultLedger<()> {
//! use ledger::{Ledger, TransactionDraft};
//!
//! let ledger = Ledger::connect("sqlite:./finance_tracker.sqlite?mode=rwc").await?;
//! let draft = TransactionDraft {
//!     date: "2024-03-01".to_string(),
//!     description: "Salary".to_string(),
//!     amount: "1000.00".to_string(),
//!     category: "Job".to_string(),
//!     kind: "INCOME".to_string(),
//! };
//! ledger.add(draft.parse()?).await?;
//! println!("balance: {}", ledger.summary().await?.balance());
//! ledger.close().await
//! # }
//! ```

pub use error::LedgerError;
pub use money::Money;
pub use notifier::{
    ChangeEvent, ChangeNotifier, LedgerObserver, ObserverError, ObserverFailure, ObserverResult,
    SubscriptionId,
};
pub use ops::{Ledger, LedgerBuilder};
pub use rust_decimal::Decimal;
pub use summary::{
    FinancialSummary, MonthlyTotals, group_by_category, group_by_month, summarize,
};
pub use transactions::{DATE_FORMAT, NewTransaction, Transaction, TransactionDraft, TransactionKind};

mod error;
mod money;
mod notifier;
mod ops;
mod summary;
mod transactions;

pub type ResultLedger<T> = Result<T, LedgerError>;

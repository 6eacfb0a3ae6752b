use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use ledger::{
    Ledger, LedgerError, LedgerObserver, Money, NewTransaction, ObserverResult, Transaction,
    TransactionDraft, TransactionKind,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

fn file_db_url() -> (String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.sqlite", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());
    (url, path)
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn new_tx(
    day: &str,
    description: &str,
    amount: &str,
    category: &str,
    kind: TransactionKind,
) -> NewTransaction {
    NewTransaction::new(
        date(day),
        description,
        amount.parse::<Money>().unwrap(),
        category,
        kind,
    )
    .unwrap()
}

fn salary() -> NewTransaction {
    new_tx("2024-03-01", "Salary", "1000.00", "Job", TransactionKind::Income)
}

fn groceries() -> NewTransaction {
    new_tx("2024-03-02", "Groceries", "250.50", "Food", TransactionKind::Expense)
}

#[derive(Default)]
struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    removed: Arc<Mutex<Vec<Transaction>>>,
}

impl LedgerObserver for Recorder {
    fn on_added(&self, tx: &Transaction) -> ObserverResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:added:{}", self.name, tx.id));
        Ok(())
    }

    fn on_removed(&self, tx: &Transaction) -> ObserverResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:removed:{}", self.name, tx.id));
        self.removed.lock().unwrap().push(tx.clone());
        Ok(())
    }
}

struct Failing;

impl LedgerObserver for Failing {
    fn on_added(&self, _tx: &Transaction) -> ObserverResult {
        Err("view is gone".into())
    }
}

#[tokio::test]
async fn add_then_list_returns_the_transaction() {
    let (ledger, _db) = ledger_with_db().await;

    let id = ledger.add(salary()).await.unwrap();

    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].details(), salary());
    assert_eq!(ledger.get(id).await.unwrap(), Some(listed[0].clone()));
}

#[tokio::test]
async fn salary_and_groceries_summary() {
    let (ledger, _db) = ledger_with_db().await;

    ledger.add(salary()).await.unwrap();
    let after_income = ledger.summary().await.unwrap();
    assert_eq!(after_income.total_income, Money::from_cents(100_000));

    ledger.add(groceries()).await.unwrap();
    let summary = ledger.summary().await.unwrap();
    assert_eq!(summary.total_income.to_string(), "1000.00");
    assert_eq!(summary.total_expenses.to_string(), "250.50");
    assert_eq!(summary.balance().to_string(), "749.50");
}

#[tokio::test]
async fn amounts_survive_the_decimal_column_exactly() {
    let (ledger, _db) = ledger_with_db().await;

    for amount in ["0.10", "0.20", "19.99", "12345678.90"] {
        ledger
            .add(new_tx("2024-01-01", "x", amount, "y", TransactionKind::Expense))
            .await
            .unwrap();
    }

    let mut amounts: Vec<String> = ledger
        .list()
        .await
        .unwrap()
        .iter()
        .map(|tx| tx.amount.to_string())
        .collect();
    amounts.sort();
    assert_eq!(amounts, vec!["0.10", "0.20", "12345678.90", "19.99"]);
    assert_eq!(
        ledger.summary().await.unwrap().total_expenses,
        Money::from_cents(1_234_569_919)
    );
}

#[tokio::test]
async fn list_is_ordered_by_date_descending() {
    let (ledger, _db) = ledger_with_db().await;

    let march = ledger.add(salary()).await.unwrap();
    let january = ledger
        .add(new_tx("2024-01-15", "Rent", "700", "Home", TransactionKind::Expense))
        .await
        .unwrap();
    let december = ledger
        .add(new_tx("2023-12-31", "Party", "80", "Fun", TransactionKind::Expense))
        .await
        .unwrap();
    let same_day = ledger
        .add(new_tx("2024-03-01", "Bonus", "50", "Job", TransactionKind::Income))
        .await
        .unwrap();

    let ids: Vec<i64> = ledger.list().await.unwrap().iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![same_day, march, january, december]);
}

#[tokio::test]
async fn add_then_remove_leaves_an_empty_ledger() {
    let (ledger, _db) = ledger_with_db().await;

    let id = ledger.add(salary()).await.unwrap();
    let removed = ledger.remove(id).await.unwrap().unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(removed.description, "Salary");

    assert!(ledger.list().await.unwrap().is_empty());
    let summary = ledger.summary().await.unwrap();
    assert_eq!(summary.total_income, Money::ZERO);
    assert_eq!(summary.total_expenses, Money::ZERO);
    assert_eq!(summary.balance(), Money::ZERO);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let (ledger, _db) = ledger_with_db().await;

    let keep = ledger.add(groceries()).await.unwrap();
    let id = ledger.add(salary()).await.unwrap();

    assert!(ledger.remove(id).await.unwrap().is_some());
    assert_eq!(ledger.remove(id).await.unwrap(), None);
    assert_eq!(ledger.remove(9_999).await.unwrap(), None);

    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep);
}

#[tokio::test]
async fn ids_are_not_reused_after_removal() {
    let (ledger, _db) = ledger_with_db().await;

    let first = ledger.add(salary()).await.unwrap();
    ledger.remove(first).await.unwrap();
    let second = ledger.add(salary()).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn two_observers_are_notified_once_in_order() {
    let (ledger, _db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second"] {
        ledger.subscribe(Arc::new(Recorder {
            name,
            log: log.clone(),
            ..Default::default()
        }));
    }

    let id = ledger.add(salary()).await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![format!("first:added:{id}"), format!("second:added:{id}")]
    );
}

#[tokio::test]
async fn removal_notification_carries_the_removed_row() {
    let (ledger, _db) = ledger_with_db().await;
    let removed = Arc::new(Mutex::new(Vec::new()));
    ledger.subscribe(Arc::new(Recorder {
        name: "view",
        removed: removed.clone(),
        ..Default::default()
    }));

    let id = ledger.add(groceries()).await.unwrap();
    ledger.remove(id).await.unwrap();
    ledger.remove(id).await.unwrap();

    let removed = removed.lock().unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, id);
    assert_eq!(removed[0].details(), groceries());
}

#[tokio::test]
async fn unsubscribed_observer_stops_receiving() {
    let (ledger, _db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    let subscription = ledger.subscribe(Arc::new(Recorder {
        name: "view",
        log: log.clone(),
        ..Default::default()
    }));

    ledger.add(salary()).await.unwrap();
    assert!(ledger.unsubscribe(subscription));
    ledger.add(groceries()).await.unwrap();

    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failing_observer_does_not_undo_the_add() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let ledger = Ledger::builder()
        .database(db)
        .observer(Arc::new(Failing))
        .observer(Arc::new(Recorder {
            name: "after",
            log: log.clone(),
            ..Default::default()
        }))
        .build()
        .await
        .unwrap();

    let id = ledger.add(salary()).await.unwrap();

    assert_eq!(ledger.list().await.unwrap().len(), 1);
    assert_eq!(*log.lock().unwrap(), vec![format!("after:added:{id}")]);
}

#[tokio::test]
async fn invalid_draft_writes_nothing() {
    let (ledger, _db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    ledger.subscribe(Arc::new(Recorder {
        name: "view",
        log: log.clone(),
        ..Default::default()
    }));

    let draft = TransactionDraft {
        date: "2024-03-01".to_string(),
        description: String::new(),
        amount: "10".to_string(),
        category: "Food".to_string(),
        kind: "EXPENSE".to_string(),
    };
    let err = ledger.add_draft(&draft).await.unwrap_err();

    assert_eq!(
        err,
        LedgerError::Validation("description must not be empty".to_string())
    );
    assert!(ledger.list().await.unwrap().is_empty());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn storage_failure_on_add_returns_no_id_and_notifies_nobody() {
    let (ledger, db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    ledger.subscribe(Arc::new(Recorder {
        name: "view",
        log: log.clone(),
        ..Default::default()
    }));

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE transactions",
    ))
    .await
    .unwrap();

    let err = ledger.add(salary()).await.unwrap_err();
    assert!(err.is_storage());
    assert!(ledger.list().await.unwrap_err().is_storage());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn replace_swaps_the_row_and_notifies_remove_then_add() {
    let (ledger, _db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    let old_id = ledger.add(groceries()).await.unwrap();
    ledger.subscribe(Arc::new(Recorder {
        name: "view",
        log: log.clone(),
        ..Default::default()
    }));

    let stored = ledger.get(old_id).await.unwrap().unwrap();
    let mut draft = TransactionDraft::from(&stored);
    draft.amount = "199.99".to_string();
    let new_id = ledger.replace(old_id, draft.parse().unwrap()).await.unwrap();

    assert_ne!(new_id, old_id);
    assert_eq!(ledger.get(old_id).await.unwrap(), None);
    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Money::from_cents(19_999));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            format!("view:removed:{old_id}"),
            format!("view:added:{new_id}")
        ]
    );
}

#[tokio::test]
async fn replace_of_unknown_id_changes_nothing() {
    let (ledger, _db) = ledger_with_db().await;
    ledger.add(salary()).await.unwrap();

    let err = ledger.replace(42, groceries()).await.unwrap_err();

    assert_eq!(err, LedgerError::KeyNotFound(42));
    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].details(), salary());
}

#[tokio::test]
async fn reports_group_by_category_and_month() {
    let (ledger, _db) = ledger_with_db().await;
    ledger.add(salary()).await.unwrap();
    ledger.add(groceries()).await.unwrap();
    ledger
        .add(new_tx("2024-07-04", "Fireworks", "30", "Fun", TransactionKind::Expense))
        .await
        .unwrap();

    let categories = ledger.category_totals(TransactionKind::Expense).await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories["Food"], Money::from_cents(25_050));
    assert_eq!(categories["Fun"], Money::from_cents(3_000));

    let months = ledger.monthly_totals().await.unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[&3].income, Money::from_cents(100_000));
    assert_eq!(months[&3].expenses, Money::from_cents(25_050));
    assert_eq!(months[&7].expenses, Money::from_cents(3_000));
    assert_eq!(months[&11].income, Money::ZERO);
}

#[tokio::test]
async fn concurrent_adds_are_all_stored() {
    let (ledger, _db) = ledger_with_db().await;
    let ledger = Arc::new(ledger);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..20 {
        let ledger = ledger.clone();
        tasks.spawn(async move {
            let tx = new_tx(
                "2024-02-01",
                &format!("item {i}"),
                "1.25",
                "Misc",
                TransactionKind::Expense,
            );
            ledger.add(tx).await
        });
    }
    let mut ids = Vec::new();
    while let Some(result) = tasks.join_next().await {
        ids.push(result.unwrap().unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 20);
    assert_eq!(
        ledger.summary().await.unwrap().total_expenses,
        Money::from_cents(2_500)
    );
}

#[tokio::test]
async fn file_database_persists_across_reopen() {
    let (url, path) = file_db_url();

    let ledger = Ledger::connect(&url).await.unwrap();
    let id = ledger.add(salary()).await.unwrap();
    ledger.close().await.unwrap();

    let reopened = Ledger::connect(&url).await.unwrap();
    let listed = reopened.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].details(), salary());
    reopened.close().await.unwrap();

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn opens_tables_written_by_older_releases() {
    let (url, path) = file_db_url();
    let db = Database::connect(&url).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount DECIMAL(10,2) NOT NULL,
            category TEXT NOT NULL,
            type TEXT NOT NULL
        )",
    ))
    .await
    .unwrap();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO transactions (date, description, amount, category, type) VALUES (?, ?, ?, ?, ?)",
        vec![
            "2023-11-05".into(),
            "Books".into(),
            42.5f64.into(),
            "Education".into(),
            "EXPENSE".into(),
        ],
    ))
    .await
    .unwrap();

    let ledger = Ledger::builder().database(db).build().await.unwrap();
    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Money::from_cents(4_250));
    assert_eq!(listed[0].kind, TransactionKind::Expense);
    ledger.close().await.unwrap();

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn legacy_amounts_with_more_decimals_are_read_exactly() {
    let (url, path) = file_db_url();
    let db = Database::connect(&url).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount DECIMAL(10,2) NOT NULL,
            category TEXT NOT NULL,
            type TEXT NOT NULL
        )",
    ))
    .await
    .unwrap();
    for amount in ["12.345", "1234567890123456.78"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO transactions (date, description, amount, category, type) VALUES (?, ?, ?, ?, ?)",
            vec![
                "2023-11-05".into(),
                "Fuel".into(),
                amount.into(),
                "Car".into(),
                "EXPENSE".into(),
            ],
        ))
        .await
        .unwrap();
    }

    let ledger = Ledger::builder().database(db).build().await.unwrap();
    let id = ledger.add(salary()).await.unwrap();

    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, id);
    let fuel = ledger.get(1).await.unwrap().unwrap();
    assert_eq!(fuel.amount, Money::from(dec!(12.345)));
    assert_eq!(fuel.amount.to_string(), "12.345");
    assert!(ledger.get(2).await.unwrap().is_some());

    let summary = ledger.summary().await.unwrap();
    assert_eq!(summary.total_income, Money::from_cents(100_000));
    assert!(summary.total_expenses > Money::from(dec!(1234567890123456)));
    ledger.close().await.unwrap();

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn largest_amount_the_column_holds_is_stored_exactly() {
    let (ledger, _db) = ledger_with_db().await;

    let id = ledger
        .add(new_tx("2024-01-01", "House", "99999999.99", "Home", TransactionKind::Expense))
        .await
        .unwrap();

    let stored = ledger.get(id).await.unwrap().unwrap();
    assert_eq!(stored.amount.to_string(), "99999999.99");
    assert_eq!(ledger.list().await.unwrap()[0], stored);
}

#[tokio::test]
async fn amounts_beyond_the_column_are_rejected_before_writing() {
    let (ledger, _db) = ledger_with_db().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    ledger.subscribe(Arc::new(Recorder {
        name: "view",
        log: log.clone(),
        ..Default::default()
    }));

    for amount in ["100000000.00", "12345678901234.56", "1234567890123456.78"] {
        let draft = TransactionDraft {
            date: "2024-01-01".to_string(),
            description: "Lottery".to_string(),
            amount: amount.to_string(),
            category: "Luck".to_string(),
            kind: "INCOME".to_string(),
        };
        let err = ledger.add_draft(&draft).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)), "{amount}: {err}");
    }

    let unchecked = NewTransaction {
        date: date("2024-01-01"),
        description: "Lottery".to_string(),
        amount: "1234567890123456.78".parse().unwrap(),
        category: "Luck".to_string(),
        kind: TransactionKind::Income,
    };
    assert!(matches!(
        ledger.add(unchecked.clone()).await,
        Err(LedgerError::Validation(_))
    ));
    let id = ledger.add(salary()).await.unwrap();
    assert!(matches!(
        ledger.replace(id, unchecked).await,
        Err(LedgerError::Validation(_))
    ));

    let listed = ledger.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].details(), salary());
    assert_eq!(ledger.summary().await.unwrap().total_income, Money::from_cents(100_000));
    assert_eq!(*log.lock().unwrap(), vec![format!("view:added:{id}")]);
}

#[tokio::test]
async fn build_without_database_fails() {
    let err = Ledger::builder().build().await.unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn connect_to_unreachable_path_fails() {
    let missing = std::env::temp_dir()
        .join(format!("missing_{}", Uuid::new_v4()))
        .join("ledger.sqlite");
    let url = format!("sqlite:{}?mode=rwc", missing.display());

    let err = Ledger::connect(&url).await.unwrap_err();
    assert!(err.is_storage());
}

use std::sync::{Arc, PoisonError, RwLock};

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};
use tokio::sync::Mutex;

use crate::{
    ChangeEvent, ChangeNotifier, LedgerObserver, ResultLedger, SubscriptionId, Transaction,
    notifier::deliver,
};

mod read;
mod write;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Durable store of transactions.
///
/// Mutations are serialized by an internal lock and observers are notified
/// after the change is committed, before the lock is released. Reads do not
/// take the lock; every single-row write is atomic in SQLite, so a read never
/// sees half of one.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    notifier: RwLock<ChangeNotifier>,
    writer: Mutex<()>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Opens `url` and builds a ledger on it.
    pub async fn connect(url: &str) -> ResultLedger<Ledger> {
        let database = Database::connect(url).await?;
        Self::builder().database(database).build().await
    }

    pub fn subscribe(&self, observer: Arc<dyn LedgerObserver>) -> SubscriptionId {
        self.notifier
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .unsubscribe(id)
    }

    /// Releases the database connection.
    pub async fn close(self) -> ResultLedger<()> {
        self.database.close().await?;
        tracing::debug!("ledger closed");
        Ok(())
    }

    /// Observers run on a snapshot of the subscriptions, so a callback may
    /// itself subscribe or unsubscribe.
    fn notify(&self, event: ChangeEvent, transaction: &Transaction) {
        let observers = self
            .notifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot();
        for failure in deliver(&observers, event, transaction) {
            tracing::warn!(
                "observer {} failed on transaction {} {event}: {}",
                failure.subscription,
                transaction.id,
                failure.error
            );
        }
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: Option<DatabaseConnection>,
    observers: Vec<Arc<dyn LedgerObserver>>,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = Some(db);
        self
    }

    /// Subscribe an observer before the first mutation.
    pub fn observer(mut self, observer: Arc<dyn LedgerObserver>) -> LedgerBuilder {
        self.observers.push(observer);
        self
    }

    /// Construct `Ledger`, bringing the schema up to date.
    ///
    /// Fails without a database or when the schema cannot be migrated; the
    /// connection is closed in that case.
    pub async fn build(self) -> ResultLedger<Ledger> {
        let database = self
            .database
            .ok_or_else(|| DbErr::Custom("no database configured for the ledger".to_string()))?;

        if let Err(err) = Migrator::up(&database, None).await {
            if let Err(close_err) = database.close().await {
                tracing::debug!("closing database after failed migration: {close_err}");
            }
            return Err(err.into());
        }

        let mut notifier = ChangeNotifier::new();
        for observer in self.observers {
            notifier.subscribe(observer);
        }

        Ok(Ledger {
            database,
            notifier: RwLock::new(notifier),
            writer: Mutex::new(()),
        })
    }
}

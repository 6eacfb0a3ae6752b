use sea_orm::{EntityTrait, TransactionTrait};

use crate::{
    ChangeEvent, LedgerError, NewTransaction, ResultLedger, Transaction, TransactionDraft,
    transactions,
};

use super::{Ledger, read::fetch_one, with_tx};

impl Ledger {
    /// Stores a new transaction and returns its id.
    ///
    /// Observers are notified only once the row is committed; on error
    /// nothing is stored and nobody is notified.
    pub async fn add(&self, transaction: NewTransaction) -> ResultLedger<i64> {
        transaction.validate()?;
        let _guard = self.writer.lock().await;

        let id = transactions::Entity::insert(transactions::ActiveModel::from(&transaction))
            .exec(&self.database)
            .await?
            .last_insert_id;
        let stored = Transaction::from_new(id, transaction);
        tracing::info!(
            "added transaction {id}: {} {} {} ({})",
            stored.date,
            stored.kind,
            stored.amount,
            stored.category
        );

        self.notify(ChangeEvent::Added, &stored);
        Ok(id)
    }

    /// Validates raw form input, then [`add`](Self::add)s it.
    pub async fn add_draft(&self, draft: &TransactionDraft) -> ResultLedger<i64> {
        let transaction = draft.parse()?;
        self.add(transaction).await
    }

    /// Deletes the transaction with `id` and returns it.
    ///
    /// An unknown id is a no-op: `None` is returned and no observer is
    /// notified. Observers receive the row as it was before deletion.
    pub async fn remove(&self, id: i64) -> ResultLedger<Option<Transaction>> {
        let _guard = self.writer.lock().await;

        let Some(existing) = fetch_one(&self.database, id).await? else {
            tracing::debug!("remove: transaction {id} not found");
            return Ok(None);
        };

        let result = transactions::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        tracing::info!("removed transaction {id}");

        self.notify(ChangeEvent::Removed, &existing);
        Ok(Some(existing))
    }

    /// Edits a transaction by deleting it and storing `transaction` in its
    /// place, atomically. Returns the id of the new row.
    ///
    /// Observers get `Removed` for the old row, then `Added` for the new one.
    pub async fn replace(&self, id: i64, transaction: NewTransaction) -> ResultLedger<i64> {
        transaction.validate()?;
        let _guard = self.writer.lock().await;

        let (previous, new_id) = with_tx!(self, |db_tx| {
            async {
                let previous = fetch_one(&db_tx, id)
                    .await?
                    .ok_or(LedgerError::KeyNotFound(id))?;
                transactions::Entity::delete_by_id(id).exec(&db_tx).await?;
                let new_id =
                    transactions::Entity::insert(transactions::ActiveModel::from(&transaction))
                        .exec(&db_tx)
                        .await?
                        .last_insert_id;
                Ok::<_, LedgerError>((previous, new_id))
            }
            .await
        })?;

        let stored = Transaction::from_new(new_id, transaction);
        tracing::info!("replaced transaction {id} with {new_id}");

        self.notify(ChangeEvent::Removed, &previous);
        self.notify(ChangeEvent::Added, &stored);
        Ok(new_id)
    }
}

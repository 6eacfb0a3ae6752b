use ledger::{LedgerObserver, ObserverResult, Transaction};

/// Reports every committed mutation through `tracing`.
pub struct LogObserver;

impl LedgerObserver for LogObserver {
    fn on_added(&self, tx: &Transaction) -> ObserverResult {
        tracing::info!(
            id = tx.id,
            kind = %tx.kind,
            amount = %tx.amount,
            category = %tx.category,
            "transaction recorded"
        );
        Ok(())
    }

    fn on_removed(&self, tx: &Transaction) -> ObserverResult {
        tracing::info!(id = tx.id, description = %tx.description, "transaction deleted");
        Ok(())
    }
}

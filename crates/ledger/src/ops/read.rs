use std::collections::BTreeMap;

use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

use crate::{
    FinancialSummary, Money, MonthlyTotals, ResultLedger, Transaction, TransactionKind,
    group_by_category, group_by_month, summarize,
    transactions::{Row, SELECT_ROWS},
};

use super::Ledger;

impl Ledger {
    /// Every transaction, newest date first; equal dates newest insert first.
    ///
    /// The result is a snapshot read from the database on each call.
    pub async fn list(&self) -> ResultLedger<Vec<Transaction>> {
        let backend = self.database.get_database_backend();
        let rows = Row::find_by_statement(Statement::from_string(
            backend,
            format!("{SELECT_ROWS} ORDER BY date DESC, id DESC"),
        ))
        .all(&self.database)
        .await?;

        let transactions = rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultLedger<Vec<_>>>()?;
        tracing::debug!("listed {} transactions", transactions.len());
        Ok(transactions)
    }

    pub async fn get(&self, id: i64) -> ResultLedger<Option<Transaction>> {
        fetch_one(&self.database, id).await
    }

    /// Totals over the whole ledger.
    pub async fn summary(&self) -> ResultLedger<FinancialSummary> {
        Ok(summarize(&self.list().await?))
    }

    pub async fn category_totals(
        &self,
        kind: TransactionKind,
    ) -> ResultLedger<BTreeMap<String, Money>> {
        Ok(group_by_category(&self.list().await?, kind))
    }

    pub async fn monthly_totals(&self) -> ResultLedger<BTreeMap<u32, MonthlyTotals>> {
        Ok(group_by_month(&self.list().await?))
    }
}

pub(super) async fn fetch_one<C>(conn: &C, id: i64) -> ResultLedger<Option<Transaction>>
where
    C: ConnectionTrait,
{
    let statement = Statement::from_sql_and_values(
        conn.get_database_backend(),
        format!("{SELECT_ROWS} WHERE id = ?"),
        [id.into()],
    );
    Row::find_by_statement(statement)
        .one(conn)
        .await?
        .map(Transaction::try_from)
        .transpose()
}

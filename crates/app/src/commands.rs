use std::io::Write;

use chrono::Local;
use ledger::{DATE_FORMAT, Ledger, LedgerError, Money, TransactionDraft, TransactionKind};
use serde::Serialize;

use crate::{
    cli::{AddArgs, Command, EditArgs, Report},
    error::Result,
    render,
};

/// Amounts are decimal strings, like the `amount` of listed transactions.
#[derive(Serialize)]
struct SummaryOutput {
    total_income: Money,
    total_expenses: Money,
    balance: Money,
}

pub async fn run(ledger: &Ledger, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Add(args) => add(ledger, args, out).await,
        Command::List { json } => {
            let transactions = ledger.list().await?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &transactions)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", render::transactions(&transactions))?;
            }
            Ok(())
        }
        Command::Show { id } => {
            match ledger.get(id).await? {
                Some(tx) => write!(out, "{}", render::transaction(&tx))?,
                None => writeln!(out, "No transaction with id {id}.")?,
            }
            Ok(())
        }
        Command::Remove { id } => {
            match ledger.remove(id).await? {
                Some(tx) => writeln!(out, "Removed transaction {id} ({}).", tx.description)?,
                None => writeln!(out, "No transaction with id {id}; nothing removed.")?,
            }
            Ok(())
        }
        Command::Edit(args) => edit(ledger, args, out).await,
        Command::Summary { json } => {
            let summary = ledger.summary().await?;
            if json {
                let output = SummaryOutput {
                    total_income: summary.total_income,
                    total_expenses: summary.total_expenses,
                    balance: summary.balance(),
                };
                serde_json::to_writer_pretty(&mut *out, &output)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", render::summary(&summary))?;
            }
            Ok(())
        }
        Command::Report(Report::Categories { kind }) => {
            let kind = TransactionKind::try_from(kind.as_str())?;
            let totals = ledger.category_totals(kind).await?;
            write!(out, "{}", render::categories(&totals))?;
            Ok(())
        }
        Command::Report(Report::Months) => {
            let months = ledger.monthly_totals().await?;
            write!(out, "{}", render::months(&months))?;
            Ok(())
        }
    }
}

async fn add(ledger: &Ledger, args: AddArgs, out: &mut impl Write) -> Result<()> {
    let draft = TransactionDraft {
        date: args
            .date
            .unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string()),
        description: args.description,
        amount: args.amount,
        category: args.category,
        kind: args.kind,
    };
    let id = ledger.add_draft(&draft).await?;
    writeln!(out, "Added transaction {id}.")?;
    Ok(())
}

/// Pre-fills a draft from the stored row, applies the given fields and
/// stores the result in place of the old row.
async fn edit(ledger: &Ledger, args: EditArgs, out: &mut impl Write) -> Result<()> {
    let existing = ledger
        .get(args.id)
        .await?
        .ok_or(LedgerError::KeyNotFound(args.id))?;

    let mut draft = TransactionDraft::from(&existing);
    if let Some(date) = args.date {
        draft.date = date;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(amount) = args.amount {
        draft.amount = amount;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }
    if let Some(kind) = args.kind {
        draft.kind = kind;
    }

    let new_id = ledger.replace(args.id, draft.parse()?).await?;
    writeln!(out, "Updated transaction {} (now {new_id}).", args.id)?;
    Ok(())
}

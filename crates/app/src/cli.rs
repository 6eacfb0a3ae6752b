use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "finance_tracker")]
#[command(about = "Track income and expenses in a local SQLite ledger")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the SQLite database file.
    #[arg(long, global = true)]
    pub database: Option<String>,
    /// Use a throwaway in-memory database.
    #[arg(long, global = true, conflicts_with = "database")]
    pub memory: bool,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new transaction.
    Add(AddArgs),
    /// List every transaction, newest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one transaction.
    Show { id: i64 },
    /// Delete a transaction. Unknown ids are ignored.
    Remove { id: i64 },
    /// Change fields of a transaction; it is stored again under a new id.
    Edit(EditArgs),
    /// Total income, total expenses and balance.
    Summary {
        #[arg(long)]
        json: bool,
    },
    #[command(subcommand)]
    Report(Report),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Date as YYYY-MM-DD (default: today).
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub category: String,
    /// INCOME or EXPENSE.
    #[arg(long = "type")]
    pub kind: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: i64,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Report {
    /// Totals per category.
    Categories {
        #[arg(long = "type", default_value = "EXPENSE")]
        kind: String,
    },
    /// Income and expenses for each month of the year.
    Months,
}

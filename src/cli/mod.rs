use std::fs::File;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::application::{
    parse_kind, AppError, BalanceReport, CategoryReport, LedgerService, MonthlyReport,
    TransactionFilter, TransactionInput,
};
use crate::charts::{ChartError, CATEGORY_PIE_FILE, MONTHLY_TREND_FILE};
use crate::domain::{
    format_cents, format_date, parse_date, Transaction, TransactionKind, DEFAULT_CATEGORIES,
};

/// Spendbook - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "spendbook")]
#[command(about = "Track income and expenses in a CSV ledger, with summaries and charts")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, global = true, default_value = "expenses.csv")]
    pub file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger file if it does not exist
    Init,

    /// Record money coming in
    Income(EntryArgs),

    /// Record money going out
    Expense(EntryArgs),

    /// Show total income, total expenses and net balance
    Balance {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Summaries by month or category
    #[command(subcommand)]
    Report(ReportCommands),

    /// Render charts as SVG files
    #[command(subcommand)]
    Chart(ChartCommands),

    /// List recorded transactions
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Only show income or expense entries
        #[arg(long)]
        kind: Option<String>,

        /// Show only the most recent N matches
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export transactions (optionally filtered) to CSV or JSON
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },

    /// Show suggested expense categories
    Categories,
}

/// How reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading
    Table,
    Json,
    Csv,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Ledger layout, readable as a ledger file
    Csv,
    /// Snapshot with version and export time
    Json,
}

#[derive(Args)]
pub struct EntryArgs {
    /// Amount (e.g., "12.50", "12" or "£12.50")
    pub amount: String,

    /// Category (defaults to "Other")
    #[arg(short, long)]
    pub category: Option<String>,

    /// Date (DD/MM/YYYY or YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Free-text note
    #[arg(short, long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Earliest date to include (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date to include (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only include this category (case-insensitive)
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expenses and net per calendar month
    Monthly {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Expense totals per category
    Categories {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Balance, monthly summary and category breakdown together
    Overview,
}

#[derive(Subcommand)]
pub enum ChartCommands {
    /// Pie chart of expenses by category
    Pie {
        /// Output file
        #[arg(short, long, default_value = CATEGORY_PIE_FILE)]
        output: PathBuf,
    },

    /// Line chart of monthly income, expenses and net
    Line {
        /// Output file
        #[arg(short, long, default_value = MONTHLY_TREND_FILE)]
        output: PathBuf,
    },

    /// Render both charts into a directory
    All {
        /// Output directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = LedgerService::open(&self.file);

        match self.command {
            Commands::Init => {
                if service.init()? {
                    println!("Ledger created: {}", self.file.display());
                } else {
                    println!("Ledger already exists: {}", self.file.display());
                }
            }

            Commands::Income(args) => {
                run_entry_command(&service, TransactionKind::Income, args)?;
            }

            Commands::Expense(args) => {
                run_entry_command(&service, TransactionKind::Expense, args)?;
            }

            Commands::Balance { format } => {
                let report = service.get_balance()?;
                print_balance(&report, format)?;
            }

            Commands::Report(report_cmd) => {
                run_report_command(&service, report_cmd)?;
            }

            Commands::Chart(chart_cmd) => {
                run_chart_command(&service, chart_cmd)?;
            }

            Commands::List {
                filter,
                kind,
                limit,
            } => {
                let mut filter = filter.into_filter()?;
                filter.kind = kind.as_deref().map(parse_kind).transpose()?;
                run_list_command(&service, &filter, limit)?;
            }

            Commands::Export {
                filter,
                output,
                format,
            } => {
                let filter = filter.into_filter()?;
                run_export_command(&service, &filter, output.as_deref(), format)?;
            }

            Commands::Categories => {
                println!("Suggested categories:");
                for category in DEFAULT_CATEGORIES {
                    println!("  {}", category);
                }
            }
        }

        Ok(())
    }
}

impl FilterArgs {
    fn into_filter(self) -> Result<TransactionFilter, AppError> {
        Ok(TransactionFilter {
            from_date: parse_optional_date(self.from)?,
            to_date: parse_optional_date(self.to)?,
            category: self.category,
            kind: None,
        })
    }
}

fn parse_optional_date(input: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    input
        .map(|s| parse_date(&s).map_err(|e| AppError::InvalidDate(e.to_string())))
        .transpose()
}

fn run_entry_command(service: &LedgerService, kind: TransactionKind, args: EntryArgs) -> Result<()> {
    let transaction = service.record(TransactionInput {
        kind,
        amount: args.amount,
        date: args.date,
        category: args.category,
        note: args.note,
    })?;

    println!(
        "Saved: {} | {} | {} | {} | {}",
        format_date(transaction.date),
        transaction.kind,
        transaction.category,
        format_cents(transaction.amount_cents),
        transaction.note.as_deref().unwrap_or("")
    );
    Ok(())
}

fn run_report_command(service: &LedgerService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Monthly { format } => {
            let report = service.get_monthly_report()?;
            print_monthly(&report, format)?;
        }

        ReportCommands::Categories { format } => {
            let report = service.get_category_report()?;
            print_categories(&report, format)?;
        }

        ReportCommands::Overview => {
            let balance = service.get_balance()?;
            if balance.transaction_count == 0 {
                println!("No data yet. Add some records first!");
                return Ok(());
            }
            print_balance(&balance, OutputFormat::Table)?;
            println!();
            print_monthly(&service.get_monthly_report()?, OutputFormat::Table)?;
            println!();
            print_categories(&service.get_category_report()?, OutputFormat::Table)?;
        }
    }
    Ok(())
}

fn run_chart_command(service: &LedgerService, cmd: ChartCommands) -> Result<()> {
    match cmd {
        ChartCommands::Pie { output } => {
            service.render_category_pie(&output)?;
            println!("Saved: {}", output.display());
        }

        ChartCommands::Line { output } => {
            service.render_monthly_trend(&output)?;
            println!("Saved: {}", output.display());
        }

        ChartCommands::All { dir } => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create chart directory: {}", dir.display()))?;

            let pie_path = dir.join(CATEGORY_PIE_FILE);
            match service.render_category_pie(&pie_path) {
                Ok(()) => println!("Saved: {}", pie_path.display()),
                Err(AppError::Chart(ChartError::NoData(reason))) => {
                    warn!(reason, "skipping category pie chart");
                    println!("Skipped pie chart: {}", reason);
                }
                Err(e) => return Err(e.into()),
            }

            let trend_path = dir.join(MONTHLY_TREND_FILE);
            service.render_monthly_trend(&trend_path)?;
            println!("Saved: {}", trend_path.display());
        }
    }
    Ok(())
}

fn run_list_command(
    service: &LedgerService,
    filter: &TransactionFilter,
    limit: Option<usize>,
) -> Result<()> {
    let transactions = service.list_transactions(filter, limit)?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:<20} {:>12}  {}",
        "DATE", "TYPE", "CATEGORY", "AMOUNT", "NOTE"
    );
    println!("{}", "-".repeat(72));
    for txn in &transactions {
        print_transaction_row(txn);
    }
    println!("{}", "-".repeat(72));
    println!("{} transaction(s)", transactions.len());
    Ok(())
}

fn print_transaction_row(txn: &Transaction) {
    println!(
        "{:<12} {:<8} {:<20} {:>12}  {}",
        format_date(txn.date),
        txn.kind,
        truncate(&txn.category, 20),
        format_cents(txn.amount_cents),
        txn.note.as_deref().unwrap_or("")
    );
}

fn run_export_command(
    service: &LedgerService,
    filter: &TransactionFilter,
    output: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    use crate::io::Exporter;

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        ExportFormat::Csv => exporter.export_csv(filter, writer)?,
        ExportFormat::Json => exporter.export_json(filter, writer)?.transactions.len(),
    };

    if let Some(path) = output {
        if count == 0 {
            eprintln!("No matching records.");
        } else {
            eprintln!("Exported {} transactions to {}", count, path.display());
        }
    }
    Ok(())
}

fn print_balance(report: &BalanceReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(stdout());
            writer.write_record(["type", "amount"])?;
            writer.write_record(["income", format_cents(report.total_income).as_str()])?;
            writer.write_record(["expense", format_cents(report.total_expense).as_str()])?;
            writer.write_record(["net", format_cents(report.net).as_str()])?;
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Overview");
            println!();
            println!("Total Income:   {:>15}", format_cents(report.total_income));
            println!("Total Expense:  {:>15}", format_cents(report.total_expense));
            println!("{}", "-".repeat(32));
            println!(
                "Net Balance:    {:>15} {}",
                format_cents(report.net),
                if report.is_surplus() {
                    "(surplus)"
                } else {
                    "(deficit)"
                }
            );
        }
    }
    Ok(())
}

fn print_monthly(report: &MonthlyReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(stdout());
            writer.write_record(["month", "income", "expense", "net"])?;
            for month in &report.months {
                writer.write_record([
                    month.month.to_string(),
                    format_cents(month.income),
                    format_cents(month.expense),
                    format_cents(month.net),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Monthly Summary");
            println!();
            if report.months.is_empty() {
                println!("(no data)");
                return Ok(());
            }
            println!(
                "{:<10} {:>12} {:>12} {:>12}",
                "MONTH", "INCOME", "EXPENSE", "NET"
            );
            println!("{}", "-".repeat(49));
            for month in &report.months {
                println!(
                    "{:<10} {:>12} {:>12} {:>12}",
                    month.month.to_string(),
                    format_cents(month.income),
                    format_cents(month.expense),
                    format_cents(month.net)
                );
            }
            println!("{}", "-".repeat(49));
            println!(
                "{:<10} {:>12} {:>12} {:>12}",
                "TOTAL",
                format_cents(report.total_income),
                format_cents(report.total_expense),
                format_cents(report.total_income - report.total_expense)
            );
        }
    }
    Ok(())
}

fn print_categories(report: &CategoryReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(stdout());
            writer.write_record(["category", "total", "count", "percentage"])?;
            for cat in &report.categories {
                writer.write_record([
                    cat.category.clone(),
                    format_cents(cat.total),
                    cat.count.to_string(),
                    format!("{:.2}", cat.percentage),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Expenses by Category");
            println!();
            if report.categories.is_empty() {
                println!("(no expenses yet)");
                return Ok(());
            }
            println!(
                "{:<20} {:>12} {:>8} {:>8}",
                "CATEGORY", "TOTAL", "COUNT", "PERCENT"
            );
            println!("{}", "-".repeat(51));
            for cat in &report.categories {
                println!(
                    "{:<20} {:>12} {:>8} {:>7.1}%",
                    truncate(&cat.category, 20),
                    format_cents(cat.total),
                    cat.count,
                    cat.percentage
                );
            }
            println!("{}", "-".repeat(51));
            println!("{:<20} {:>12}", "TOTAL", format_cents(report.total));
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("A very long category name", 10), "A very ...");
        assert_eq!(truncate("Café crème brûlée", 8), "Café ...");
    }

    #[test]
    fn test_cli_parses_expense() {
        let cli = Cli::try_parse_from([
            "spendbook",
            "--file",
            "ledger.csv",
            "expense",
            "12.50",
            "-c",
            "Groceries",
            "-d",
            "05/11/2025",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("ledger.csv"));
        match cli.command {
            Commands::Expense(args) => {
                assert_eq!(args.amount, "12.50");
                assert_eq!(args.category.as_deref(), Some("Groceries"));
                assert_eq!(args.date.as_deref(), Some("05/11/2025"));
                assert_eq!(args.note, None);
            }
            _ => panic!("expected expense command"),
        }
    }

    #[test]
    fn test_cli_default_file_and_chart_output() {
        let cli = Cli::try_parse_from(["spendbook", "chart", "pie"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("expenses.csv"));
        match cli.command {
            Commands::Chart(ChartCommands::Pie { output }) => {
                assert_eq!(output, PathBuf::from(CATEGORY_PIE_FILE));
            }
            _ => panic!("expected chart pie command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["spendbook", "balance", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["spendbook", "export", "--format", "table"]).is_err());

        let cli = Cli::try_parse_from(["spendbook", "report", "monthly", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Report(ReportCommands::Monthly { format }) => {
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected report monthly command"),
        }
    }

    #[test]
    fn test_filter_args_reject_bad_date() {
        let args = FilterArgs {
            from: Some("not-a-date".into()),
            to: None,
            category: None,
        };
        assert!(matches!(args.into_filter(), Err(AppError::InvalidDate(_))));
    }
}

use chrono::Datelike;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, format_amount, Table, TableColumn};
use crate::cli::registry::CommandEntry;

const MONTHLY_USAGE: &str = "monthly [YEAR MONTH | YYYY-MM]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("balance", "Show the balance summary", "balance", cmd_balance),
        CommandEntry::new(
            "categories",
            "Show income and expenses per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "monthly",
            "Show totals for one calendar month",
            MONTHLY_USAGE,
            cmd_monthly,
        ),
        CommandEntry::new(
            "info",
            "Show where the active user's record is stored",
            "info",
            cmd_info,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.active_ledger()?;
    let summary = ledger.balance_summary();

    output::section(format!("Balance for {}", ledger.user()));
    output::key_values(&[
        ("Total income", format_amount(summary.total_income)),
        ("Total expenses", format_amount(summary.total_expenses)),
        ("Current balance", format_amount(summary.current_balance)),
        ("Transactions", summary.count.to_string()),
    ]);
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.active_ledger()?;
    let summary = ledger.category_summary();

    output::section(format!("Category report for {}", ledger.user()));
    if summary.is_empty() {
        output::info("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Category", 14),
        TableColumn::right("Income", 12),
        TableColumn::right("Expenses", 12),
        TableColumn::right("Net", 12),
        TableColumn::right("Count", 5),
    ]);
    for (category, totals) in &summary {
        table.add_row(vec![
            category.clone(),
            format_amount(totals.income),
            format_amount(totals.expenses),
            format_amount(totals.net()),
            totals.count.to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.clock.today();
    let (year, month) = match args {
        [] => (today.year(), today.month()),
        [period] => {
            let (year, month) = period
                .split_once('-')
                .ok_or_else(|| CommandError::usage(MONTHLY_USAGE))?;
            (parse_number(year)?, parse_number(month)?)
        }
        [year, month] => (parse_number(year)?, parse_number(month)?),
        _ => return Err(CommandError::usage(MONTHLY_USAGE)),
    };

    let ledger = context.active_ledger()?;
    let report = ledger.monthly_summary(year, month)?;

    output::section(format!("Monthly report {} for {}", report.label(), ledger.user()));
    output::key_values(&[
        ("Period", format!("{} to {}", report.start, report.end)),
        ("Income", format_amount(report.income)),
        ("Expenses", format_amount(report.expenses)),
        ("Net", format_amount(report.net)),
        ("Transactions", report.count.to_string()),
    ]);
    Ok(())
}

fn cmd_info(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.active_ledger()?;
    let path = context.storage.record_path(ledger.user());
    let last_updated = match context.storage.read_record(ledger.user()) {
        Ok(Some(record)) => record
            .last_updated
            .unwrap_or_else(|| "unknown".to_string()),
        Ok(None) => "never saved".to_string(),
        Err(err) => format!("unreadable ({err})"),
    };

    output::section(format!("Record for {}", ledger.user()));
    output::key_values(&[
        ("Path", path.display().to_string()),
        ("Last updated", last_updated),
        ("Transactions", ledger.len().to_string()),
        ("Load warnings", ledger.warnings().len().to_string()),
    ]);
    Ok(())
}

fn parse_number<T: std::str::FromStr>(input: &str) -> Result<T, CommandError> {
    input
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{input}` is not a number")))
}

use mtrack_core::{parse_date, TransactionFilter};
use mtrack_domain::TransactionType;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{date_or_today, parse_amount, TransactionDraft, TransactionForm};
use crate::cli::output::{self, format_amount, Table, TableColumn};
use crate::cli::registry::CommandEntry;

const ADD_USAGE: &str = "add <date|today> <description> <amount> <income|expense> [category]";
const LIST_USAGE: &str = "list [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--type income|expense]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record a transaction for the active user",
            ADD_USAGE,
            cmd_add,
        ),
        CommandEntry::new(
            "list",
            "List transactions, newest first",
            LIST_USAGE,
            cmd_list,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.active_ledger()?;

    let draft = if args.is_empty() {
        if !context.is_interactive() {
            return Err(CommandError::usage(ADD_USAGE));
        }
        let form = TransactionForm::new(
            &context.theme,
            context.clock.today(),
            &context.config.categories,
        );
        match form.run()? {
            Some(draft) => draft,
            None => {
                output::info("Transaction discarded.");
                return Ok(());
            }
        }
    } else {
        parse_add_args(context, args)?
    };

    record(context, draft)
}

fn parse_add_args(context: &ShellContext, args: &[&str]) -> Result<TransactionDraft, CommandError> {
    let [date, description, amount, kind, rest @ ..] = args else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    if rest.len() > 1 {
        return Err(CommandError::usage(ADD_USAGE));
    }

    let amount = parse_amount(amount).map_err(CommandError::InvalidArguments)?;
    let transaction_type = kind
        .parse::<TransactionType>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let category = rest.first().map(|name| {
        context
            .canonical_category(name)
            .unwrap_or_else(|| name.trim())
            .to_string()
    });

    Ok(TransactionDraft {
        date: date_or_today(date, context.clock.today()),
        description: description.to_string(),
        amount,
        transaction_type,
        category,
    })
}

fn record(context: &mut ShellContext, draft: TransactionDraft) -> CommandResult {
    let ledger = context.active_ledger_mut()?;
    ledger.add(
        draft.date,
        &draft.description,
        draft.amount,
        draft.transaction_type,
        draft.category.as_deref(),
    )?;
    output::success(format!(
        "Added {} `{}` of {} on {} for {}.",
        draft.transaction_type.as_str().to_lowercase(),
        draft.description.trim(),
        format_amount(draft.amount),
        draft.date,
        ledger.user()
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = parse_filter(args)?;
    let ledger = context.active_ledger()?;
    let transactions = ledger.query(&filter);

    output::section(format!("Transactions for {}", ledger.user()));
    if transactions.is_empty() {
        output::info("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Date", 10),
        TableColumn::left("Description", 24),
        TableColumn::right("Amount", 12),
        TableColumn::left("Type", 8),
        TableColumn::left("Category", 14),
    ]);
    for txn in &transactions {
        table.add_row(vec![
            txn.date().to_string(),
            txn.description().to_string(),
            format_amount(txn.amount()),
            txn.transaction_type().to_string(),
            txn.category().to_string(),
        ]);
    }
    table.print();
    output::info(format!("{} transaction(s).", transactions.len()));
    Ok(())
}

fn parse_filter(args: &[&str]) -> Result<TransactionFilter, CommandError> {
    let mut filter = TransactionFilter::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CommandError::InvalidArguments(format!("`{flag}` needs a value")))?;
        filter = match flag.to_lowercase().as_str() {
            "--from" => filter.from_date(parse_date(value)?),
            "--to" => filter.to_date(parse_date(value)?),
            "--type" => filter.of_type(
                value
                    .parse::<TransactionType>()
                    .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
            ),
            _ => return Err(CommandError::usage(LIST_USAGE)),
        };
    }
    Ok(filter)
}

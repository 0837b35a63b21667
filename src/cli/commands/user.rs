use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, format_amount, Table, TableColumn};
use crate::cli::registry::CommandEntry;

const USER_USAGE: &str = "user <name>";
const ADDUSER_USAGE: &str = "adduser <name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("users", "List users and their balances", "users", cmd_users),
        CommandEntry::new("user", "Select the active user", USER_USAGE, cmd_user),
        CommandEntry::new(
            "adduser",
            "Register a new user and select it",
            ADDUSER_USAGE,
            cmd_adduser,
        ),
    ]
}

fn cmd_users(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.users.is_empty() {
        output::info("No users registered. Use `adduser <name>` to create one.");
        return Ok(());
    }

    let active = context.users.active().map(|ledger| ledger.user());
    output::section("Users");
    let mut table = Table::new(vec![
        TableColumn::left("", 1),
        TableColumn::left("Name", 12),
        TableColumn::right("Transactions", 12),
        TableColumn::right("Balance", 12),
    ]);
    for ledger in context.users.ledgers() {
        let marker = if Some(ledger.user()) == active { "*" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            ledger.user().to_string(),
            ledger.len().to_string(),
            format_amount(ledger.balance_summary().current_balance),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = user_name(args).ok_or_else(|| CommandError::usage(USER_USAGE))?;
    let ledger = context.users.select(&name)?;
    let balance = ledger.balance_summary();
    output::success(format!(
        "Selected user `{}` ({} transactions, balance {}).",
        ledger.user(),
        balance.count,
        format_amount(balance.current_balance)
    ));
    Ok(())
}

fn cmd_adduser(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = user_name(args).ok_or_else(|| CommandError::usage(ADDUSER_USAGE))?;
    let ledger = context.users.register(&name)?;
    let registered = ledger.user().to_string();
    for warning in ledger.warnings() {
        output::warning(format!("{registered}: {warning}"));
    }
    context.users.select(&registered)?;
    output::success(format!("Added user `{registered}` and selected it."));
    Ok(())
}

/// Joins the remaining words so `user Mary Ann` works without quotes.
fn user_name(args: &[&str]) -> Option<String> {
    let name = args.join(" ");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

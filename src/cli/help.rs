use crate::cli::output::{self, Table, TableColumn};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let mut table = Table::new(vec![
        TableColumn::left("Command", 10),
        TableColumn::left("Description", 20),
    ]);
    for entry in registry.list() {
        table.add_row(vec![entry.name, entry.description]);
    }
    table.print();
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::key_values(&[
        ("description", entry.description.to_string()),
        ("usage", entry.usage.to_string()),
    ]);
}

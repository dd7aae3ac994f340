use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for entry in registry.iter() {
        println!("  {:<16} {}", entry.name, entry.description);
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandDefinition) {
    output_section(format!("Help: {}", entry.name));
    println!("  Description: {}", entry.description);
    println!("  Usage: {}", entry.usage);
}

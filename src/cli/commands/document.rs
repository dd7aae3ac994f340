use tracing::debug;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::preview::{build_document, render_text};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "preview",
            "Toggle the invoice preview",
            "preview",
            cmd_preview,
        ),
        CommandDefinition::new(
            "export",
            "Export the previewed invoice to the export directory",
            "export",
            cmd_export,
        ),
    ]
}

fn cmd_preview(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.wizard.can_preview() {
        io::print_warning("Complete at least one section before previewing.");
        return Ok(());
    }
    if !context.wizard.toggle_preview() {
        io::print_info("Preview closed.");
        return Ok(());
    }
    let document = build_document(context.wizard.draft(), context.clock.today());
    println!();
    print!(
        "{}",
        render_text(&document, context.wizard.currency_symbol())
    );
    Ok(())
}

fn cmd_export(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.wizard.is_preview() {
        io::print_warning("Open the preview with `preview` before exporting.");
        return Ok(());
    }
    let today = context.clock.today();
    match context.exporter.export(context.wizard.draft(), today) {
        Ok(path) => {
            context.flush_notifications();
            io::print_info(format!("Saved to {}", path.display()));
        }
        // The exporter queued a notice describing the failure.
        Err(err) => debug!(error = %err, "export did not complete"),
    }
    Ok(())
}

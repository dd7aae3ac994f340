use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{BankForm, CampaignForm, FinancialForm, InfluencerForm};
use crate::cli::{io, output};
use crate::invoice::{coerce_amount, SectionData, SectionKind};
use crate::preview::format_money;
use crate::wizard::{Completion, SubmitOutcome, WizardStep};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "status",
            "Show wizard progress and the running total",
            "status",
            cmd_status,
        ),
        CommandDefinition::new(
            "fill",
            "Fill a section (defaults to the current step)",
            "fill [influencer|campaign|financial|bank] [answers...]",
            cmd_fill,
        ),
        CommandDefinition::new(
            "set-financial",
            "Edit one financial field and recompute the total",
            "set-financial <invoice-number|commercials|reimbursement|tax|tax-id|tax-percentage> <value>",
            cmd_set_financial,
        ),
        CommandDefinition::new("next", "Move to the next step", "next", cmd_next),
        CommandDefinition::new("back", "Move to the previous step", "back", cmd_back),
        CommandDefinition::new(
            "jump",
            "Jump to a step once every earlier section is complete",
            "jump <1-4>",
            cmd_jump,
        ),
        CommandDefinition::new(
            "submit",
            "Submit the invoice when every section is complete",
            "submit",
            cmd_submit,
        ),
        CommandDefinition::new(
            "reset",
            "Discard the draft and start over",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let wizard = &context.wizard;
    output::section("Invoice Wizard");
    output::field("Step", wizard.current_step());
    output::field(
        "Preview",
        if wizard.is_preview() { "open" } else { "closed" },
    );
    let validity = wizard.validity();
    for kind in SectionKind::ALL {
        let mark = if validity.get(kind) { "complete" } else { "pending" };
        output::field(kind.label(), mark);
    }
    output::field(
        "Total",
        format_money(wizard.currency_symbol(), wizard.total_amount()),
    );
    if let Some(at) = wizard.draft().submitted_at {
        output::field("Submitted", at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

fn parse_section(raw: &str) -> Result<SectionKind, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "influencer" | "1" => Ok(SectionKind::Influencer),
        "campaign" | "2" => Ok(SectionKind::Campaign),
        "financial" | "3" => Ok(SectionKind::Financial),
        "bank" | "4" => Ok(SectionKind::Bank),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown section `{}` (use influencer, campaign, financial or bank)",
            other
        ))),
    }
}

fn cmd_fill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, answers) = match args.split_first() {
        Some((first, rest)) => (parse_section(first)?, rest),
        None => (context.wizard.current_step().section(), args),
    };
    if context.mode() == CliMode::Script && answers.is_empty() {
        return Err(CommandError::InvalidArguments(
            "script mode needs the answers on the command line".into(),
        ));
    }

    let draft = context.wizard.draft();
    let collected = match kind {
        SectionKind::Influencer => context
            .collect_form(&InfluencerForm::new(&draft.influencer), answers)
            .map(|data| data.map(SectionData::Influencer)),
        SectionKind::Campaign => context
            .collect_form(&CampaignForm::new(&draft.campaign), answers)
            .map(|data| data.map(SectionData::Campaign)),
        SectionKind::Financial => {
            let flow =
                FinancialForm::new(&draft.financial, context.config.default_tax_percentage);
            context
                .collect_form(&flow, answers)
                .map(|data| data.map(SectionData::Financial))
        }
        SectionKind::Bank => context
            .collect_form(&BankForm::new(&draft.bank, draft.payee_name()), answers)
            .map(|data| data.map(SectionData::Bank)),
    };

    let data = match collected {
        Ok(Some(data)) => data,
        Ok(None) => {
            io::print_warning(format!("{} was not saved.", kind));
            return Ok(());
        }
        Err(errors) => {
            context.print_section_errors(&errors);
            return Ok(());
        }
    };

    match context.wizard.complete_section(data) {
        Ok(Completion::Advanced(step)) => {
            io::print_success(format!("{} saved.", kind));
            io::print_info(step);
        }
        Ok(Completion::Submitted(SubmitOutcome::NotReady)) => {
            io::print_success(format!("{} saved.", kind));
            io::print_warning("Complete every section to submit the invoice.");
        }
        Ok(Completion::Submitted(_)) => {}
        Err(errors) => context.print_section_errors(&errors),
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "off" | "0" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected yes or no, got `{}`",
            other
        ))),
    }
}

fn cmd_set_financial(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [field, value] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: set-financial <field> <value>".into(),
        ));
    };
    let mut details = context.wizard.draft().financial.clone();
    match field.to_ascii_lowercase().as_str() {
        "invoice-number" => details.invoice_number = value.to_string(),
        "commercials" | "fee" => details.commercials = coerce_amount(value),
        "reimbursement" => details.reimbursement = coerce_amount(value),
        "tax" => details.is_tax_applicable = parse_flag(value)?,
        "tax-id" => details.tax_id = value.to_string(),
        "tax-percentage" => details.tax_percentage = parse_percentage(value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown financial field `{}`",
                other
            )))
        }
    }
    let was_valid = context.wizard.validity().financial;
    let total = context.wizard.update_financial(details);
    io::print_info(format!(
        "Total: {}",
        format_money(context.wizard.currency_symbol(), total)
    ));
    if was_valid && !context.wizard.validity().financial {
        io::print_warning("Financial Details need attention before submitting.");
    }
    Ok(())
}

fn parse_percentage(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid tax percentage `{}`", raw)))
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.go_next() {
        io::print_info(context.wizard.current_step());
    } else {
        io::print_warning("Already at the last step.");
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.go_previous() {
        io::print_info(context.wizard.current_step());
    } else {
        io::print_warning("Already at the first step.");
    }
    Ok(())
}

fn cmd_jump(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let number = args
        .first()
        .and_then(|raw| raw.parse::<u8>().ok())
        .filter(|number| WizardStep::from_number(*number).is_some())
        .ok_or_else(|| CommandError::InvalidArguments("usage: jump <1-4>".into()))?;
    if context.wizard.jump_to_step(number) {
        io::print_info(context.wizard.current_step());
    } else {
        io::print_warning("Complete the earlier sections before jumping ahead.");
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.submit() == SubmitOutcome::NotReady {
        io::print_warning("Complete every section to submit the invoice.");
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let confirmed = match context.mode() {
        CliMode::Script => true,
        CliMode::Interactive => io::confirm_action("Discard the current invoice draft?", false)?,
    };
    if confirmed {
        context.wizard.reset();
        io::print_success("Draft discarded.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_parse_by_name_or_number() {
        assert_eq!(parse_section("Bank").unwrap(), SectionKind::Bank);
        assert_eq!(parse_section("2").unwrap(), SectionKind::Campaign);
        assert!(parse_section("payments").is_err());
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("Yes").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("sometimes").is_err());
    }

    #[test]
    fn percentage_must_be_a_finite_number() {
        assert_eq!(parse_percentage("12.5").unwrap(), 12.5);
        assert_eq!(parse_percentage(" 0 ").unwrap(), 0.0);
        assert!(parse_percentage("nan").is_err());
        assert!(parse_percentage("inf").is_err());
        assert!(parse_percentage("-inf").is_err());
        assert!(parse_percentage("eighteen").is_err());
    }
}

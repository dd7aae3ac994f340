use crate::auth::{resolve_home, resolve_route, Dashboard, RouteDecision, User, UserRole};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io, output};
use crate::config::StoredSession;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "login",
            "Sign in with an email and role",
            "login <email> <admin|staff|client>",
            cmd_login,
        ),
        CommandDefinition::new("logout", "Sign out", "logout", cmd_logout),
        CommandDefinition::new(
            "whoami",
            "Show the signed-in user",
            "whoami",
            cmd_whoami,
        ),
        CommandDefinition::new(
            "dashboard",
            "Open a role dashboard (home when omitted)",
            "dashboard [admin|users|staff|client]",
            cmd_dashboard,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [email, role] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: login <email> <role>".into(),
        ));
    };
    if !email.contains('@') {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not an email address",
            email
        )));
    }
    let role: UserRole = role.parse().map_err(CommandError::InvalidArguments)?;
    let user = User::new(*email, role);
    context.config.session = Some(StoredSession {
        email: user.email.clone(),
        role,
    });
    context.session.sign_in(user);
    context.persist_config()?;
    io::print_success(format!("Signed in as {} ({}).", email, role));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.sign_out() {
        Some(user) => {
            context.config.session = None;
            context.persist_config()?;
            io::print_success(format!("Signed out {}.", user.email));
        }
        None => io::print_info("Nobody is signed in."),
    }
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.user() {
        Some(user) => {
            output::section("Session");
            output::field("User", user.display_name());
            output::field("Role", user.role);
            output::field("Home", user.role.home().path());
        }
        None => io::print_info("Not signed in."),
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let decision = match args.first() {
        Some(raw) => {
            let target: Dashboard = raw.parse().map_err(CommandError::InvalidArguments)?;
            resolve_route(&context.session, target)
        }
        None => resolve_home(&context.session),
    };
    match decision {
        RouteDecision::Render(dashboard) => show_dashboard(dashboard),
        RouteDecision::Redirect(dashboard) => {
            io::print_warning(format!("Redirecting to {}.", dashboard));
            show_dashboard(dashboard);
        }
        RouteDecision::Login => {
            io::print_warning("Sign in required. Use `login <email> <role>`.");
        }
    }
    Ok(())
}

fn show_dashboard(dashboard: Dashboard) {
    output::section(dashboard.title());
    output::field("Path", dashboard.path());
}

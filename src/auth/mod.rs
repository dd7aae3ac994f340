//! Signed-in user context and role-gated dashboard routing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
    Client,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
            UserRole::Client => "client",
        }
    }

    /// Dashboard a user of this role lands on.
    pub fn home(self) -> Dashboard {
        match self {
            UserRole::Admin => Dashboard::Admin,
            UserRole::Staff => Dashboard::Staff,
            UserRole::Client => Dashboard::Client,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            "client" => Ok(UserRole::Client),
            other => Err(format!("Unknown role `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
}

impl User {
    /// New pending account with a generated id.
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            first_name: None,
            last_name: None,
            role,
            status: UserStatus::Pending,
        }
    }

    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Explicit session handed down from the application root.
///
/// Created once at startup; `sign_out` tears the user down. The wizard and
/// preview only ever read it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Option<User>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn sign_in(&mut self, user: User) {
        debug!(email = %user.email, role = %user.role, "signed in");
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<User> {
        let previous = self.user.take();
        if let Some(user) = &previous {
            debug!(email = %user.email, "signed out");
        }
        previous
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dashboard {
    Admin,
    UserManagement,
    Staff,
    Client,
}

impl Dashboard {
    pub const ALL: [Dashboard; 4] = [
        Dashboard::Admin,
        Dashboard::UserManagement,
        Dashboard::Staff,
        Dashboard::Client,
    ];

    pub fn required_role(self) -> UserRole {
        match self {
            Dashboard::Admin | Dashboard::UserManagement => UserRole::Admin,
            Dashboard::Staff => UserRole::Staff,
            Dashboard::Client => UserRole::Client,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Dashboard::Admin => "/admin",
            Dashboard::UserManagement => "/admin/users",
            Dashboard::Staff => "/staff",
            Dashboard::Client => "/client",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dashboard::Admin => "Admin Dashboard",
            Dashboard::UserManagement => "User Management",
            Dashboard::Staff => "Staff Dashboard",
            Dashboard::Client => "Client Dashboard",
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Dashboard {
    type Err = String;

    /// Accepts the short name (`admin`, `users`, `staff`, `client`) or the path.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let key = input.trim().trim_start_matches('/').to_ascii_lowercase();
        match key.as_str() {
            "admin" => Ok(Dashboard::Admin),
            "users" | "admin/users" | "user-management" => Ok(Dashboard::UserManagement),
            "staff" => Ok(Dashboard::Staff),
            "client" => Ok(Dashboard::Client),
            _ => Err(format!("Unknown dashboard `{}`", input.trim())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Dashboard),
    Redirect(Dashboard),
    Login,
}

/// Decides what a navigation to `target` shows for the current session.
pub fn resolve_route(session: &SessionContext, target: Dashboard) -> RouteDecision {
    match session.role() {
        None => RouteDecision::Login,
        Some(role) if role == target.required_role() => RouteDecision::Render(target),
        Some(role) => RouteDecision::Redirect(role.home()),
    }
}

/// Landing page for the root path.
pub fn resolve_home(session: &SessionContext) -> RouteDecision {
    match session.role() {
        None => RouteDecision::Login,
        Some(role) => RouteDecision::Redirect(role.home()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_users_go_to_login() {
        let session = SessionContext::new();
        for dashboard in Dashboard::ALL {
            assert_eq!(resolve_route(&session, dashboard), RouteDecision::Login);
        }
        assert_eq!(resolve_home(&session), RouteDecision::Login);
    }

    #[test]
    fn matching_role_renders() {
        let session = SessionContext::with_user(User::new("admin@example.com", UserRole::Admin));
        assert_eq!(
            resolve_route(&session, Dashboard::UserManagement),
            RouteDecision::Render(Dashboard::UserManagement)
        );
    }

    #[test]
    fn wrong_role_redirects_home() {
        let session = SessionContext::with_user(User::new("staff@example.com", UserRole::Staff));
        assert_eq!(
            resolve_route(&session, Dashboard::Admin),
            RouteDecision::Redirect(Dashboard::Staff)
        );
        assert_eq!(
            resolve_route(&session, Dashboard::Client),
            RouteDecision::Redirect(Dashboard::Staff)
        );
    }

    #[test]
    fn sign_out_tears_down_user() {
        let mut session = SessionContext::new();
        session.sign_in(User::new("client@example.com", UserRole::Client));
        assert_eq!(session.role(), Some(UserRole::Client));
        let previous = session.sign_out().unwrap();
        assert_eq!(previous.email, "client@example.com");
        assert!(!session.is_signed_in());
        assert!(session.sign_out().is_none());
    }

    #[test]
    fn parses_roles_and_dashboards() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert!("owner".parse::<UserRole>().is_err());
        assert_eq!("/admin/users".parse::<Dashboard>(), Ok(Dashboard::UserManagement));
        assert_eq!("client".parse::<Dashboard>(), Ok(Dashboard::Client));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user = User::new("asha@example.com", UserRole::Client);
        assert_eq!(user.display_name(), "asha@example.com");
        user.first_name = Some("Asha".into());
        user.last_name = Some("Rao".into());
        assert_eq!(user.display_name(), "Asha Rao");
    }
}

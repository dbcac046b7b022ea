//! Route guard for protected views
//!
//! Nothing protected is admitted until boot-time resolution settles. After
//! that, unauthenticated visitors go to the login page with the requested
//! path attached, and authenticated users without an allowed role are sent
//! to the dashboard instead of an error page.

use crate::context::AuthState;
use banquet_core::config::RouteSettings;
use banquet_core::{Role, User};
use std::collections::HashSet;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Where redirects land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTargets {
    pub login_path: String,
    pub dashboard_path: String,
}

impl Default for RouteTargets {
    fn default() -> Self {
        Self::from(&RouteSettings::default())
    }
}

impl From<&RouteSettings> for RouteTargets {
    fn from(settings: &RouteSettings) -> Self {
        Self {
            login_path: settings.login_path.clone(),
            dashboard_path: settings.dashboard_path.clone(),
        }
    }
}

/// What to show for a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Resolution still running; show only a loading indicator
    Loading,
    /// Navigate to `to`; `from` is where to return after signing in
    Redirect { to: String, from: Option<String> },
    /// Show the protected content unchanged
    Render,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    targets: RouteTargets,
    allowed_roles: HashSet<Role>,
}

impl RouteGuard {
    pub fn new(targets: RouteTargets) -> Self {
        Self {
            targets,
            allowed_roles: HashSet::new(),
        }
    }

    /// Restrict the route to `roles`; with no roles any signed-in user passes
    pub fn allow(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles.extend(roles);
        self
    }

    fn role_allowed(&self, user: Option<&User>) -> bool {
        self.allowed_roles.is_empty()
            || user.is_some_and(|user| self.allowed_roles.contains(&user.role))
    }

    /// Decide what to show for `requested_path` in `state`
    pub fn evaluate(&self, state: &AuthState, requested_path: &str) -> GuardDecision {
        if state.is_loading {
            return GuardDecision::Loading;
        }

        if !state.is_authenticated() {
            debug!(path = requested_path, "Not signed in, redirecting to login");
            return GuardDecision::Redirect {
                to: self.targets.login_path.clone(),
                from: Some(requested_path.to_string()),
            };
        }

        if !self.role_allowed(state.user.as_ref()) {
            debug!(
                path = requested_path,
                role = ?state.user.as_ref().map(|u| u.role),
                "Role not allowed, redirecting to dashboard"
            );
            return GuardDecision::Redirect {
                to: self.targets.dashboard_path.clone(),
                from: None,
            };
        }

        GuardDecision::Render
    }

    /// Wait until the session stops loading, then decide
    pub async fn settle(
        &self,
        state: &mut watch::Receiver<AuthState>,
        requested_path: &str,
    ) -> GuardDecision {
        let settled = match state.wait_for(|s| !s.is_loading).await {
            Ok(settled) => settled.clone(),
            Err(_) => {
                warn!("Session dropped before settling, redirecting to login");
                return GuardDecision::Redirect {
                    to: self.targets.login_path.clone(),
                    from: Some(requested_path.to_string()),
                };
            }
        };
        self.evaluate(&settled, requested_path)
    }
}

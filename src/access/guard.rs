//! Route guard
//!
//! Navigation is gated by a three-state machine: while the session is still
//! being resolved (startup storage read, token check in flight) no verdict
//! exists and nothing may render; once resolved, the guard either authorizes
//! the requested view or names the redirect target. The verdict is computed
//! fresh on every navigation, never cached across route changes.

use crate::models::Role;

use super::policy::{self, DASHBOARD_PATH, LOGIN_PATH};

/// Session resolution state as seen by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Session restore still pending; no verdict may be issued
    Unresolved,
    /// Resolution finished: either an authenticated role or none
    Resolved(Option<Role>),
}

/// Where a denied navigation is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// To the login view, preserving the originally requested path so the
    /// client can return there after authentication
    Login { requested: String },
    /// Silently back to the dashboard index; restricted routes are not
    /// advertised to ineligible roles
    Dashboard,
}

impl Redirect {
    pub fn target(&self) -> &str {
        match self {
            Redirect::Login { .. } => LOGIN_PATH,
            Redirect::Dashboard => DASHBOARD_PATH,
        }
    }
}

/// Guard verdict for a single navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Session still unresolved; render nothing yet
    Pending,
    /// Render the requested view
    Authorized,
    /// Redirect instead of rendering
    Denied(Redirect),
}

/// Evaluate a navigation to `path` under the given session status.
///
/// Unauthenticated access is always sent to login; authenticated but
/// ineligible access is always sent to the dashboard, never to login.
/// Unknown paths are treated as ineligible.
pub fn evaluate(status: &SessionStatus, path: &str) -> Verdict {
    let role = match status {
        SessionStatus::Unresolved => return Verdict::Pending,
        SessionStatus::Resolved(role) => *role,
    };

    if role.is_none() {
        return Verdict::Denied(Redirect::Login {
            requested: path.to_string(),
        });
    }

    let allowed = match policy::route(path) {
        Some(descriptor) => policy::is_allowed(role, descriptor.allowed_roles),
        None => false,
    };

    if allowed {
        Verdict::Authorized
    } else {
        Verdict::Denied(Redirect::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::policy::ROUTES;

    #[test]
    fn unresolved_session_renders_nothing() {
        // No flash of protected content while the session is restoring
        for descriptor in ROUTES {
            assert_eq!(
                evaluate(&SessionStatus::Unresolved, descriptor.path),
                Verdict::Pending
            );
        }
    }

    #[test]
    fn anonymous_is_redirected_to_login_with_requested_path() {
        let status = SessionStatus::Resolved(None);
        for descriptor in ROUTES {
            match evaluate(&status, descriptor.path) {
                Verdict::Denied(Redirect::Login { requested }) => {
                    assert_eq!(requested, descriptor.path)
                }
                other => panic!("expected login redirect for {}, got {:?}", descriptor.path, other),
            }
        }
    }

    #[test]
    fn ineligible_role_is_redirected_to_dashboard_never_login() {
        let status = SessionStatus::Resolved(Some(Role::Client));
        assert_eq!(
            evaluate(&status, "/dashboard/categories"),
            Verdict::Denied(Redirect::Dashboard)
        );
        assert_eq!(
            evaluate(&status, "/dashboard/emprunts"),
            Verdict::Denied(Redirect::Dashboard)
        );
    }

    #[test]
    fn eligible_role_is_authorized() {
        let status = SessionStatus::Resolved(Some(Role::Responsable));
        assert_eq!(evaluate(&status, "/dashboard"), Verdict::Authorized);
        assert_eq!(evaluate(&status, "/dashboard/emprunts"), Verdict::Authorized);
    }

    #[test]
    fn unknown_path_is_denied_not_panicking() {
        assert_eq!(
            evaluate(&SessionStatus::Resolved(Some(Role::Admin)), "/dashboard/nope"),
            Verdict::Denied(Redirect::Dashboard)
        );
        assert!(matches!(
            evaluate(&SessionStatus::Resolved(None), "/dashboard/nope"),
            Verdict::Denied(Redirect::Login { .. })
        ));
    }

    #[test]
    fn verdict_is_recomputed_per_navigation() {
        // Same guard functions, different sessions: no verdict leaks across
        let client = SessionStatus::Resolved(Some(Role::Client));
        let admin = SessionStatus::Resolved(Some(Role::Admin));
        assert_eq!(
            evaluate(&client, "/dashboard/users"),
            Verdict::Denied(Redirect::Dashboard)
        );
        assert_eq!(evaluate(&admin, "/dashboard/users"), Verdict::Authorized);
        assert_eq!(
            evaluate(&client, "/dashboard/users"),
            Verdict::Denied(Redirect::Dashboard)
        );
    }

    #[test]
    fn redirect_targets_match_routes() {
        let login = Redirect::Login {
            requested: "/dashboard/users".to_string(),
        };
        assert_eq!(login.target(), "/login");
        assert_eq!(Redirect::Dashboard.target(), "/dashboard");
    }
}

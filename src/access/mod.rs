//! Role-based access control core
//!
//! Pure, I/O-free decision logic shared by the HTTP layer and the
//! navigation endpoint: the route/role table ([`policy`]), the navigation
//! guard ([`guard`]) and the menu presenter ([`nav`]).

pub mod guard;
pub mod nav;
pub mod policy;

pub use guard::{evaluate, Redirect, SessionStatus, Verdict};
pub use nav::{entries_for, is_active, NavEntry};
pub use policy::{books_view, is_allowed, route, BooksView, RouteDescriptor, ROUTES};

use crate::{error::AppError, models::Role};

/// Authorize an authenticated `role` for the route at `path`, translating
/// the guard verdict into the HTTP error taxonomy: a denial for an
/// authenticated principal is an authorization failure (403), which the
/// dashboard renders as a silent redirect to its index.
pub fn authorize(role: Role, path: &str) -> Result<(), AppError> {
    match evaluate(&SessionStatus::Resolved(Some(role)), path) {
        Verdict::Authorized => Ok(()),
        _ => Err(AppError::Authorization(format!(
            "Role {} may not access {}",
            role, path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_maps_verdicts_to_errors() {
        assert!(authorize(Role::Admin, "/dashboard/users").is_ok());
        assert!(matches!(
            authorize(Role::Client, "/dashboard/users"),
            Err(AppError::Authorization(_))
        ));
    }
}

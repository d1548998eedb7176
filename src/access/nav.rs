//! Navigation presenter
//!
//! Derives the visible menu for a role from the same route table the guard
//! consults, so a view is never listed that the guard would refuse.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Role;

use super::policy::{self, RouteDescriptor, DASHBOARD_PATH, ROUTES};

/// A single menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavEntry {
    pub path: String,
    pub label: String,
}

impl From<&RouteDescriptor> for NavEntry {
    fn from(descriptor: &RouteDescriptor) -> Self {
        Self {
            path: descriptor.path.to_string(),
            label: descriptor.label.to_string(),
        }
    }
}

/// Menu entries visible to `role`, in declaration order. An absent role
/// sees nothing.
pub fn entries_for(role: Option<Role>) -> Vec<NavEntry> {
    ROUTES
        .iter()
        .filter(|descriptor| policy::is_allowed(role, descriptor.allowed_roles))
        .map(NavEntry::from)
        .collect()
}

/// Whether `entry` should be highlighted for the current location: exact
/// match always, prefix match for everything except the dashboard root
/// (which would otherwise be active on every sub-route).
pub fn is_active(current_path: &str, entry: &NavEntry) -> bool {
    current_path == entry.path
        || (entry.path != DASHBOARD_PATH && current_path.starts_with(entry.path.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(role: Option<Role>) -> Vec<String> {
        entries_for(role).into_iter().map(|e| e.path).collect()
    }

    #[test]
    fn client_menu_is_dashboard_books_my_emprunts_in_order() {
        assert_eq!(
            paths(Some(Role::Client)),
            ["/dashboard", "/dashboard/books", "/dashboard/my-emprunts"]
        );
    }

    #[test]
    fn admin_menu_is_dashboard_books_categories_users_in_order() {
        assert_eq!(
            paths(Some(Role::Admin)),
            [
                "/dashboard",
                "/dashboard/books",
                "/dashboard/categories",
                "/dashboard/users"
            ]
        );
    }

    #[test]
    fn responsable_menu_is_dashboard_emprunts_in_order() {
        assert_eq!(
            paths(Some(Role::Responsable)),
            ["/dashboard", "/dashboard/emprunts"]
        );
    }

    #[test]
    fn absent_role_sees_no_menu() {
        assert!(entries_for(None).is_empty());
    }

    #[test]
    fn active_entry_matches_exactly_or_by_prefix() {
        let books = NavEntry {
            path: "/dashboard/books".to_string(),
            label: "Books".to_string(),
        };
        assert!(is_active("/dashboard/books", &books));
        assert!(is_active("/dashboard/books/42", &books));
        assert!(!is_active("/dashboard/categories", &books));
    }

    #[test]
    fn dashboard_root_only_matches_exactly() {
        let dashboard = NavEntry {
            path: "/dashboard".to_string(),
            label: "Dashboard".to_string(),
        };
        assert!(is_active("/dashboard", &dashboard));
        assert!(!is_active("/dashboard/books", &dashboard));
    }
}

//! Role-based access policy
//!
//! Every reachable dashboard view has exactly one descriptor in [`ROUTES`].
//! The table is the single source of truth for authorization: the route
//! guard, the navigation presenter and the HTTP handlers all consult it, so
//! a role rule is defined once. Declaration order is the menu order.

use crate::models::Role;

/// Static description of a guarded dashboard route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub label: &'static str,
    /// Empty means "all authenticated roles"
    pub allowed_roles: &'static [Role],
}

/// Path of the dashboard index, the fallback target for denied navigation
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Path of the login view, the target for unauthenticated navigation
pub const LOGIN_PATH: &str = "/login";

/// The complete route table, in menu order
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: DASHBOARD_PATH,
        label: "Dashboard",
        allowed_roles: &[Role::Admin, Role::Responsable, Role::Client],
    },
    RouteDescriptor {
        path: "/dashboard/books",
        label: "Books",
        allowed_roles: &[Role::Admin, Role::Client],
    },
    RouteDescriptor {
        path: "/dashboard/categories",
        label: "Categories",
        allowed_roles: &[Role::Admin],
    },
    RouteDescriptor {
        path: "/dashboard/users",
        label: "Users",
        allowed_roles: &[Role::Admin],
    },
    RouteDescriptor {
        path: "/dashboard/emprunts",
        label: "All Emprunts",
        allowed_roles: &[Role::Responsable],
    },
    RouteDescriptor {
        path: "/dashboard/my-emprunts",
        label: "My Emprunts",
        allowed_roles: &[Role::Client],
    },
];

/// Look up the descriptor for a path
pub fn route(path: &str) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Core policy check: may `role` reach a route restricted to
/// `allowed_roles`? An empty set means any authenticated role; an absent
/// role is always denied.
pub fn is_allowed(role: Option<Role>, allowed_roles: &[Role]) -> bool {
    match role {
        None => false,
        Some(role) => allowed_roles.is_empty() || allowed_roles.contains(&role),
    }
}

/// The two concrete views behind the books route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooksView {
    /// Catalog management (CRUD)
    Admin,
    /// Browse and borrow
    Client,
}

/// Role-to-view dispatch for the books route. This is a deliberate special
/// case on top of the table: ADMIN and CLIENT land on different views, and
/// RESPONSABLE gets no view at all (redirected to the dashboard).
pub fn books_view(role: Role) -> Option<BooksView> {
    match role {
        Role::Admin => Some(BooksView::Admin),
        Role::Client => Some(BooksView::Client),
        Role::Responsable => None,
    }
}

//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, categories, emprunts, health, navigation, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LibraryMS API",
        version = "0.1.0",
        description = "Role-based library management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::me,
        // Navigation
        navigation::get_navigation,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Categories
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Users
        users::list_users,
        users::get_user,
        // Emprunts
        emprunts::list_emprunts,
        emprunts::list_my_emprunts,
        emprunts::create_emprunt,
        emprunts::validate_emprunt,
        emprunts::close_emprunt,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Navigation
            navigation::NavigationResponse,
            crate::access::NavEntry,
            // Books
            books::BooksResponse,
            crate::models::book::Book,
            crate::models::book::BorrowableBook,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Categories
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Users
            crate::models::role::Role,
            crate::models::user::UserPublic,
            // Emprunts
            crate::models::emprunt::Emprunt,
            crate::models::emprunt::EmpruntStatus,
            crate::models::emprunt::CreateEmprunt,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "navigation", description = "Role-filtered navigation menu"),
        (name = "books", description = "Book catalog management"),
        (name = "categories", description = "Category management"),
        (name = "users", description = "User directory"),
        (name = "emprunts", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

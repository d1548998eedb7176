//! Storage layer
//!
//! All persistence goes through the [`Store`] trait so the backend is
//! swappable: [`postgres::PgStore`] for production, [`memory::MemoryStore`]
//! for tests and the storage-less demo mode. Atomic domain transitions
//! (borrow decrements a book's quantity, close restores it) live here, next
//! to the data they must keep consistent.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook, UpdateBook},
        category::Category,
        emprunt::EmpruntRow,
        role::Role,
        user::User,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// New user record, used by seeding and administration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    // Users (read-mostly; creation exists for seeding)
    async fn users_list(&self) -> AppResult<Vec<User>>;
    async fn users_get(&self, id: Uuid) -> AppResult<User>;
    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn users_create(&self, user: NewUser) -> AppResult<User>;

    // Categories
    async fn categories_list(&self) -> AppResult<Vec<Category>>;
    async fn categories_get(&self, id: Uuid) -> AppResult<Category>;
    async fn categories_name_exists(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    async fn categories_create(&self, name: &str) -> AppResult<Category>;
    async fn categories_update(&self, id: Uuid, name: &str) -> AppResult<Category>;
    async fn categories_delete(&self, id: Uuid) -> AppResult<()>;
    /// Number of books referencing the category
    async fn categories_book_count(&self, id: Uuid) -> AppResult<i64>;

    // Books
    async fn books_list(&self) -> AppResult<Vec<Book>>;
    async fn books_get(&self, id: Uuid) -> AppResult<Book>;
    async fn books_create(&self, book: &CreateBook) -> AppResult<Book>;
    async fn books_update(&self, id: Uuid, book: &UpdateBook) -> AppResult<Book>;
    async fn books_delete(&self, id: Uuid) -> AppResult<()>;
    /// Number of loans referencing the book, returned ones included
    async fn books_loan_count(&self, id: Uuid) -> AppResult<i64>;

    // Emprunts
    async fn emprunts_list(&self) -> AppResult<Vec<EmpruntRow>>;
    async fn emprunts_list_for_user(&self, user_id: Uuid) -> AppResult<Vec<EmpruntRow>>;
    async fn emprunts_get(&self, id: Uuid) -> AppResult<EmpruntRow>;
    /// Borrow a copy: decrements the book's quantity and creates the loan
    /// in one atomic step. Fails with Conflict when no copy is available.
    async fn emprunts_borrow(&self, user_id: Uuid, book_id: Uuid) -> AppResult<EmpruntRow>;
    /// Reset the overdue clock of an active loan. Fails with Conflict when
    /// the loan is already returned.
    async fn emprunts_validate(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow>;
    /// Record the return: sets the return date and restores the book's
    /// quantity atomically. Fails with Conflict when already returned.
    async fn emprunts_close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow>;
}

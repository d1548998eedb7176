//! Book catalog service

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BorrowableBook, CreateBook, UpdateBook},
    repository::Store,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn Store>,
}

impl BooksService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.books_list().await
    }

    /// Catalog as presented to borrowers, with the borrow action gated on
    /// availability
    pub async fn list_borrowable(&self) -> AppResult<Vec<BorrowableBook>> {
        let books = self.store.books_list().await?;
        Ok(books.into_iter().map(BorrowableBook::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.store.books_get(id).await
    }

    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        // Category must exist; the store checks and reports NotFound
        self.store.books_create(&book).await
    }

    pub async fn update(&self, id: Uuid, book: UpdateBook) -> AppResult<Book> {
        self.store.books_update(id, &book).await
    }

    /// Delete a book; refused while loans still reference it, so the loan
    /// history never dangles
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let in_use = self.store.books_loan_count(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Book is referenced by {} loan(s)",
                in_use
            )));
        }
        self.store.books_delete(id).await
    }
}

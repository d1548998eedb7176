//! In-memory store
//!
//! Mirrors the mocked collections the original dashboard held in component
//! state, behind the same [`Store`] contract as Postgres. Used by the test
//! suite and by the demo mode (empty `database.url`). A single RwLock keeps
//! cross-collection transitions (borrow, close) atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        category::Category,
        emprunt::{EmpruntRecord, EmpruntRow},
        user::User,
    },
};

use super::{NewUser, Store};

/// Book as stored: category by reference, resolved on read
#[derive(Debug, Clone)]
struct StoredBook {
    id: Uuid,
    title: String,
    author: String,
    description: String,
    quantity: i32,
    category_id: Uuid,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    books: HashMap<Uuid, StoredBook>,
    emprunts: HashMap<Uuid, EmpruntRecord>,
    /// Insertion order, so listings are stable
    user_order: Vec<Uuid>,
    category_order: Vec<Uuid>,
    book_order: Vec<Uuid>,
    emprunt_order: Vec<Uuid>,
}

impl Inner {
    fn resolve_book(&self, book: &StoredBook) -> AppResult<Book> {
        let category = self
            .categories
            .get(&book.category_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(format!("Book {} references missing category", book.id))
            })?;
        Ok(Book {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            quantity: book.quantity,
            category,
        })
    }

    fn resolve_emprunt(&self, record: &EmpruntRecord) -> AppResult<EmpruntRow> {
        let borrower = self
            .users
            .get(&record.user_id)
            .map(User::to_public)
            .ok_or_else(|| {
                AppError::Internal(format!("Loan {} references missing user", record.id))
            })?;
        let book = self
            .books
            .get(&record.book_id)
            .ok_or_else(|| {
                AppError::Internal(format!("Loan {} references missing book", record.id))
            })
            .and_then(|b| self.resolve_book(b))?;
        Ok(EmpruntRow {
            record: record.clone(),
            borrower,
            book,
        })
    }
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn users_list(&self) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .user_order
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn users_get(&self, id: Uuid) -> AppResult<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn users_create(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "Email {} already registered",
                user.email
            )));
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            password_hash: user.password_hash,
        };
        inner.user_order.push(created.id);
        inner.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn categories_list(&self) -> AppResult<Vec<Category>> {
        let inner = self.inner.read().await;
        Ok(inner
            .category_order
            .iter()
            .filter_map(|id| inner.categories.get(id).cloned())
            .collect())
    }

    async fn categories_get(&self, id: Uuid) -> AppResult<Category> {
        let inner = self.inner.read().await;
        inner
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn categories_name_exists(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .values()
            .any(|c| c.name == name && Some(c.id) != exclude))
    }

    async fn categories_create(&self, name: &str) -> AppResult<Category> {
        let mut inner = self.inner.write().await;
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        inner.category_order.push(category.id);
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn categories_update(&self, id: Uuid, name: &str) -> AppResult<Category> {
        let mut inner = self.inner.write().await;
        let category = inner
            .categories
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        category.name = name.to_string();
        Ok(category.clone())
    }

    async fn categories_delete(&self, id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.categories.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        inner.category_order.retain(|c| *c != id);
        Ok(())
    }

    async fn categories_book_count(&self, id: Uuid) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.books.values().filter(|b| b.category_id == id).count() as i64)
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        inner
            .book_order
            .iter()
            .filter_map(|id| inner.books.get(id))
            .map(|b| inner.resolve_book(b))
            .collect()
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Book> {
        let inner = self.inner.read().await;
        let book = inner
            .books
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        inner.resolve_book(book)
    }

    async fn books_create(&self, book: &CreateBook) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        if !inner.categories.contains_key(&book.category_id) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                book.category_id
            )));
        }
        let stored = StoredBook {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            quantity: book.quantity,
            category_id: book.category_id,
        };
        let resolved = inner.resolve_book(&stored)?;
        inner.book_order.push(stored.id);
        inner.books.insert(stored.id, stored);
        Ok(resolved)
    }

    async fn books_update(&self, id: Uuid, book: &UpdateBook) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        if let Some(category_id) = book.category_id {
            if !inner.categories.contains_key(&category_id) {
                return Err(AppError::NotFound(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }
        let stored = inner
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        if let Some(ref title) = book.title {
            stored.title = title.clone();
        }
        if let Some(ref author) = book.author {
            stored.author = author.clone();
        }
        if let Some(ref description) = book.description {
            stored.description = description.clone();
        }
        if let Some(quantity) = book.quantity {
            stored.quantity = quantity;
        }
        if let Some(category_id) = book.category_id {
            stored.category_id = category_id;
        }
        let stored = stored.clone();
        inner.resolve_book(&stored)
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.books.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        inner.book_order.retain(|b| *b != id);
        Ok(())
    }

    async fn books_loan_count(&self, id: Uuid) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .emprunts
            .values()
            .filter(|record| record.book_id == id)
            .count() as i64)
    }

    async fn emprunts_list(&self) -> AppResult<Vec<EmpruntRow>> {
        let inner = self.inner.read().await;
        inner
            .emprunt_order
            .iter()
            .filter_map(|id| inner.emprunts.get(id))
            .map(|record| inner.resolve_emprunt(record))
            .collect()
    }

    async fn emprunts_list_for_user(&self, user_id: Uuid) -> AppResult<Vec<EmpruntRow>> {
        let inner = self.inner.read().await;
        inner
            .emprunt_order
            .iter()
            .filter_map(|id| inner.emprunts.get(id))
            .filter(|record| record.user_id == user_id)
            .map(|record| inner.resolve_emprunt(record))
            .collect()
    }

    async fn emprunts_get(&self, id: Uuid) -> AppResult<EmpruntRow> {
        let inner = self.inner.read().await;
        let record = inner
            .emprunts
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Emprunt {} not found", id)))?;
        inner.resolve_emprunt(record)
    }

    async fn emprunts_borrow(&self, user_id: Uuid, book_id: Uuid) -> AppResult<EmpruntRow> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        let book = inner
            .books
            .get_mut(&book_id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;
        if book.quantity == 0 {
            return Err(AppError::Conflict("No copies available".to_string()));
        }
        book.quantity -= 1;

        let record = EmpruntRecord {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            borrow_date: Utc::now(),
            validated_date: None,
            returned_date: None,
        };
        inner.emprunt_order.push(record.id);
        inner.emprunts.insert(record.id, record.clone());
        inner.resolve_emprunt(&record)
    }

    async fn emprunts_validate(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow> {
        let mut inner = self.inner.write().await;
        let record = inner
            .emprunts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Emprunt {} not found", id)))?;
        if record.returned_date.is_some() {
            return Err(AppError::Conflict("Emprunt already returned".to_string()));
        }
        record.validated_date = Some(at);
        let record = record.clone();
        inner.resolve_emprunt(&record)
    }

    async fn emprunts_close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow> {
        let mut inner = self.inner.write().await;
        let record = inner
            .emprunts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Emprunt {} not found", id)))?;
        if record.returned_date.is_some() {
            return Err(AppError::Conflict("Emprunt already returned".to_string()));
        }
        record.returned_date = Some(at);
        let record = record.clone();
        // Returned copy goes back on the shelf
        if let Some(book) = inner.books.get_mut(&record.book_id) {
            book.quantity += 1;
        }
        inner.resolve_emprunt(&record)
    }
}

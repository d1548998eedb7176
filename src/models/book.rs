//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::category::Category;

/// Internal row structure for book queries (category joined flat)
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub quantity: i32,
    pub category_id: Uuid,
    pub category_name: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            description: row.description,
            quantity: row.quantity,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}

/// Book with its category, as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Copies currently available for borrowing, never negative
    pub quantity: i32,
    pub category: Category,
}

/// Book as seen by a borrowing client: the borrow action is disabled
/// whenever no copy is available.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowableBook {
    #[serde(flatten)]
    pub book: Book,
    pub can_borrow: bool,
}

impl From<Book> for BorrowableBook {
    fn from(book: Book) -> Self {
        let can_borrow = book.quantity > 0;
        Self { book, can_borrow }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    pub category_id: Uuid,
}

/// Update book request; absent fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub category_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_book_rejects_empty_required_fields() {
        let request = CreateBook {
            title: String::new(),
            author: "Orwell".to_string(),
            description: String::new(),
            quantity: 1,
            category_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_book_rejects_negative_quantity() {
        let request = CreateBook {
            title: "1984".to_string(),
            author: "Orwell".to_string(),
            description: String::new(),
            quantity: -1,
            category_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_quantity_disables_borrowing() {
        let book = Book {
            id: Uuid::new_v4(),
            title: "1984".to_string(),
            author: "Orwell".to_string(),
            description: String::new(),
            quantity: 0,
            category: Category {
                id: Uuid::new_v4(),
                name: "Fiction".to_string(),
            },
        };
        let view = BorrowableBook::from(book);
        assert!(!view.can_borrow);
    }
}

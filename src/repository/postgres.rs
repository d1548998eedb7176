//! Postgres store
//!
//! SQL implementation of the [`Store`] contract. Borrow and close run in a
//! transaction so the loan row and the book quantity can never drift apart;
//! the quantity guard (`quantity > 0`) is enforced in the UPDATE itself, so
//! two concurrent borrows of the last copy cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookRow, CreateBook, UpdateBook},
        category::Category,
        emprunt::{EmpruntRecord, EmpruntRow},
        user::{User, UserRow},
    },
};

use super::{NewUser, Store};

const EMPRUNT_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.book_id, e.borrow_date, e.validated_date, e.returned_date,
           u.email, u.name, u.role,
           b.title, b.author, b.description, b.quantity,
           c.id as category_id, c.name as category_name
    FROM emprunts e
    JOIN users u ON e.user_id = u.id
    JOIN books b ON e.book_id = b.id
    JOIN categories c ON b.category_id = c.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn emprunt_from_row(row: &sqlx::postgres::PgRow) -> AppResult<EmpruntRow> {
        let role: String = row.get("role");
        let role = role
            .parse()
            .map_err(|e: String| AppError::Internal(format!("Corrupt user row: {}", e)))?;
        Ok(EmpruntRow {
            record: EmpruntRecord {
                id: row.get("id"),
                user_id: row.get("user_id"),
                book_id: row.get("book_id"),
                borrow_date: row.get("borrow_date"),
                validated_date: row.get("validated_date"),
                returned_date: row.get("returned_date"),
            },
            borrower: crate::models::UserPublic {
                id: row.get("user_id"),
                email: row.get("email"),
                name: row.get("name"),
                role,
            },
            book: Book {
                id: row.get("book_id"),
                title: row.get("title"),
                author: row.get("author"),
                description: row.get("description"),
                quantity: row.get("quantity"),
                category: Category {
                    id: row.get("category_id"),
                    name: row.get("category_name"),
                },
            },
        })
    }

    async fn emprunt_details(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<EmpruntRow> {
        let row = sqlx::query(&format!("{} WHERE e.id = $1", EMPRUNT_SELECT))
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Self::emprunt_from_row(&row)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn users_list(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, password_hash FROM users ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn users_get(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        User::try_from(row)
    }

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn users_create(&self, user: NewUser) -> AppResult<User> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Email {} already registered",
                user.email
            )));
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, role, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        User::try_from(row)
    }

    async fn categories_list(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn categories_get(&self, id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn categories_name_exists(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE name = $1 AND ($2::uuid IS NULL OR id != $2)",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn categories_create(&self, name: &str) -> AppResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn categories_update(&self, id: Uuid, name: &str) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn categories_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }

    async fn categories_book_count(&self, id: Uuid) -> AppResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT b.id, b.title, b.author, b.description, b.quantity,
                   c.id as category_id, c.name as category_name
            FROM books b
            JOIN categories c ON b.category_id = c.id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT b.id, b.title, b.author, b.description, b.quantity,
                   c.id as category_id, c.name as category_name
            FROM books b
            JOIN categories c ON b.category_id = c.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        Ok(Book::from(row))
    }

    async fn books_create(&self, book: &CreateBook) -> AppResult<Book> {
        self.categories_get(book.category_id).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO books (id, title, author, description, quantity, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.quantity)
        .bind(book.category_id)
        .fetch_one(&self.pool)
        .await?;

        self.books_get(id).await
    }

    async fn books_update(&self, id: Uuid, book: &UpdateBook) -> AppResult<Book> {
        if let Some(category_id) = book.category_id {
            self.categories_get(category_id).await?;
        }

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                quantity = COALESCE($5, quantity),
                category_id = COALESCE($6, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.quantity)
        .bind(book.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.books_get(id).await
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    async fn books_loan_count(&self, id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM emprunts WHERE book_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn emprunts_list(&self) -> AppResult<Vec<EmpruntRow>> {
        let rows = sqlx::query(&format!("{} ORDER BY e.borrow_date DESC", EMPRUNT_SELECT))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::emprunt_from_row).collect()
    }

    async fn emprunts_list_for_user(&self, user_id: Uuid) -> AppResult<Vec<EmpruntRow>> {
        let rows = sqlx::query(&format!(
            "{} WHERE e.user_id = $1 ORDER BY e.borrow_date DESC",
            EMPRUNT_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::emprunt_from_row).collect()
    }

    async fn emprunts_get(&self, id: Uuid) -> AppResult<EmpruntRow> {
        let row = sqlx::query(&format!("{} WHERE e.id = $1", EMPRUNT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Emprunt {} not found", id)))?;
        Self::emprunt_from_row(&row)
    }

    async fn emprunts_borrow(&self, user_id: Uuid, book_id: Uuid) -> AppResult<EmpruntRow> {
        let mut tx = self.pool.begin().await?;

        // Guarded decrement; affects no row when the last copy is gone
        let taken = sqlx::query(
            "UPDATE books SET quantity = quantity - 1 WHERE id = $1 AND quantity > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if taken.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE id = $1")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists == 0 {
                AppError::NotFound(format!("Book {} not found", book_id))
            } else {
                AppError::Conflict("No copies available".to_string())
            });
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO emprunts (id, user_id, book_id, borrow_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let details = Self::emprunt_details(&mut tx, id).await?;
        tx.commit().await?;
        Ok(details)
    }

    async fn emprunts_validate(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE emprunts SET validated_date = $2 WHERE id = $1 AND returned_date IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM emprunts WHERE id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists == 0 {
                AppError::NotFound(format!("Emprunt {} not found", id))
            } else {
                AppError::Conflict("Emprunt already returned".to_string())
            });
        }

        let details = Self::emprunt_details(&mut tx, id).await?;
        tx.commit().await?;
        Ok(details)
    }

    async fn emprunts_close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<EmpruntRow> {
        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE emprunts SET returned_date = $2
            WHERE id = $1 AND returned_date IS NULL
            RETURNING book_id
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        let book_id = match book_id {
            Some(book_id) => book_id,
            None => {
                let exists =
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM emprunts WHERE id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists == 0 {
                    AppError::NotFound(format!("Emprunt {} not found", id))
                } else {
                    AppError::Conflict("Emprunt already returned".to_string())
                });
            }
        };

        // Returned copy goes back on the shelf
        sqlx::query("UPDATE books SET quantity = quantity + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let details = Self::emprunt_details(&mut tx, id).await?;
        tx.commit().await?;
        Ok(details)
    }
}

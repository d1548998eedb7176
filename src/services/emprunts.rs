//! Loan (emprunt) lifecycle service
//!
//! Status is derived here, at the edge of the storage layer: the configured
//! loan period turns stored dates into EN_COURS / EN_RETARD / RETOURNE for
//! every loan served.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::LoansConfig,
    error::AppResult,
    models::emprunt::{Emprunt, EmpruntRow},
    repository::Store,
};

#[derive(Clone)]
pub struct EmpruntsService {
    store: Arc<dyn Store>,
    config: LoansConfig,
}

impl EmpruntsService {
    pub fn new(store: Arc<dyn Store>, config: LoansConfig) -> Self {
        Self { store, config }
    }

    fn period(&self) -> Duration {
        Duration::days(self.config.period_days)
    }

    fn present(&self, row: EmpruntRow) -> Emprunt {
        Emprunt::from_row(row, Utc::now(), self.period())
    }

    /// All loans, for the loan desk
    pub async fn list_all(&self) -> AppResult<Vec<Emprunt>> {
        let rows = self.store.emprunts_list().await?;
        Ok(rows.into_iter().map(|row| self.present(row)).collect())
    }

    /// Loans of one borrower
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Emprunt>> {
        let rows = self.store.emprunts_list_for_user(user_id).await?;
        Ok(rows.into_iter().map(|row| self.present(row)).collect())
    }

    /// Borrow a book for `user_id`; requires an available copy
    pub async fn borrow(&self, user_id: Uuid, book_id: Uuid) -> AppResult<Emprunt> {
        let row = self.store.emprunts_borrow(user_id, book_id).await?;
        tracing::info!(emprunt = %row.record.id, book = %book_id, "book borrowed");
        Ok(self.present(row))
    }

    /// Validate an active loan, resetting its overdue clock
    pub async fn validate(&self, id: Uuid) -> AppResult<Emprunt> {
        let row = self.store.emprunts_validate(id, Utc::now()).await?;
        Ok(self.present(row))
    }

    /// Record the return of a loan and restore the book's quantity
    pub async fn close(&self, id: Uuid) -> AppResult<Emprunt> {
        let row = self.store.emprunts_close(id, Utc::now()).await?;
        tracing::info!(emprunt = %id, "book returned");
        Ok(self.present(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{book::CreateBook, EmpruntStatus, Role},
        repository::{MemoryStore, NewUser},
    };

    async fn setup(quantity: i32) -> (EmpruntsService, Uuid, Uuid, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .users_create(NewUser {
                email: "client@library.com".to_string(),
                name: None,
                role: Role::Client,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let category = store.categories_create("Fiction").await.unwrap();
        let book = store
            .books_create(&CreateBook {
                title: "1984".to_string(),
                author: "Orwell".to_string(),
                description: String::new(),
                quantity,
                category_id: category.id,
            })
            .await
            .unwrap();
        let service = EmpruntsService::new(store.clone(), LoansConfig { period_days: 14 });
        (service, user.id, book.id, store)
    }

    #[tokio::test]
    async fn borrowed_loan_starts_en_cours_with_no_return_date() {
        let (service, user_id, book_id, _) = setup(3).await;
        let loan = service.borrow(user_id, book_id).await.unwrap();
        assert_eq!(loan.status, EmpruntStatus::EnCours);
        assert!(loan.return_date.is_none());
        assert_eq!(loan.book.quantity, 2);
    }

    #[tokio::test]
    async fn last_copy_borrow_then_reject() {
        let (service, user_id, book_id, _) = setup(1).await;
        let loan = service.borrow(user_id, book_id).await.unwrap();
        assert_eq!(loan.book.quantity, 0);

        let err = service.borrow(user_id, book_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn close_sets_return_date_and_restores_the_copy() {
        let (service, user_id, book_id, store) = setup(1).await;
        let loan = service.borrow(user_id, book_id).await.unwrap();

        let closed = service.close(loan.id).await.unwrap();
        assert_eq!(closed.status, EmpruntStatus::Retourne);
        assert!(closed.return_date.is_some());
        assert_eq!(store.books_get(book_id).await.unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn validate_keeps_the_loan_active() {
        let (service, user_id, book_id, _) = setup(1).await;
        let loan = service.borrow(user_id, book_id).await.unwrap();

        let validated = service.validate(loan.id).await.unwrap();
        assert_eq!(validated.status, EmpruntStatus::EnCours);
        assert!(validated.validated_date.is_some());
        assert!(validated.return_date.is_none());
    }

    #[tokio::test]
    async fn my_loans_only_lists_own_loans() {
        let (service, user_id, book_id, store) = setup(5).await;
        let other = store
            .users_create(NewUser {
                email: "other@library.com".to_string(),
                name: None,
                role: Role::Client,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        service.borrow(user_id, book_id).await.unwrap();
        service.borrow(other.id, book_id).await.unwrap();

        let mine = service.list_for_user(user_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].borrower.id, user_id);
        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }
}

//! Category management service

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CreateCategory, UpdateCategory},
    repository::Store,
};

#[derive(Clone)]
pub struct CategoriesService {
    store: Arc<dyn Store>,
}

impl CategoriesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.store.categories_list().await
    }

    pub async fn create(&self, category: CreateCategory) -> AppResult<Category> {
        if self
            .store
            .categories_name_exists(&category.name, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        self.store.categories_create(&category.name).await
    }

    pub async fn update(&self, id: Uuid, category: UpdateCategory) -> AppResult<Category> {
        if self
            .store
            .categories_name_exists(&category.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        self.store.categories_update(id, &category.name).await
    }

    /// Delete a category; refused while books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let in_use = self.store.categories_book_count(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category is referenced by {} book(s)",
                in_use
            )));
        }
        self.store.categories_delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::book::CreateBook,
        repository::MemoryStore,
    };

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        let categories = CategoriesService::new(store);
        categories
            .create(CreateCategory {
                name: "Fiction".to_string(),
            })
            .await
            .unwrap();
        let err = categories
            .create(CreateCategory {
                name: "Fiction".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_is_refused_while_books_reference_the_category() {
        let store = Arc::new(MemoryStore::new());
        let categories = CategoriesService::new(store.clone());
        let fiction = categories
            .create(CreateCategory {
                name: "Fiction".to_string(),
            })
            .await
            .unwrap();
        store
            .books_create(&CreateBook {
                title: "1984".to_string(),
                author: "Orwell".to_string(),
                description: String::new(),
                quantity: 1,
                category_id: fiction.id,
            })
            .await
            .unwrap();

        let err = categories.delete(fiction.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // Category untouched by the refused delete
        assert_eq!(categories.list().await.unwrap().len(), 1);
    }
}

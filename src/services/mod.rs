//! Business logic services

pub mod books;
pub mod categories;
pub mod emprunts;
pub mod sessions;
pub mod users;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, LoansConfig},
    repository::Store,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub sessions: sessions::SessionsService,
    pub books: books::BooksService,
    pub categories: categories::CategoriesService,
    pub users: users::UsersService,
    pub emprunts: emprunts::EmpruntsService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn Store>, auth_config: AuthConfig, loans_config: LoansConfig) -> Self {
        Self {
            sessions: sessions::SessionsService::new(store.clone(), auth_config),
            books: books::BooksService::new(store.clone()),
            categories: categories::CategoriesService::new(store.clone()),
            users: users::UsersService::new(store.clone()),
            emprunts: emprunts::EmpruntsService::new(store, loans_config),
        }
    }
}

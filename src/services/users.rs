//! User directory service (read-only)

use std::sync::Arc;
use uuid::Uuid;

use crate::{error::AppResult, models::user::UserPublic, repository::Store};

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn Store>,
}

impl UsersService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<UserPublic>> {
        let users = self.store.users_list().await?;
        Ok(users.iter().map(|u| u.to_public()).collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<UserPublic> {
        let user = self.store.users_get(id).await?;
        Ok(user.to_public())
    }
}

//! Demo dataset
//!
//! Seeds the catalog the original dashboard shipped as mock state: one
//! account per role and a small set of categorized books. Used by the
//! in-memory demo mode and by the integration tests.

use crate::{
    error::AppResult,
    models::{book::CreateBook, Role},
    repository::{NewUser, Store},
    services::sessions::hash_password,
};

/// Demo account credentials (email, password, role)
pub const DEMO_ACCOUNTS: &[(&str, &str, Role)] = &[
    ("admin@library.com", "admin", Role::Admin),
    ("responsable@library.com", "responsable", Role::Responsable),
    ("client@library.com", "client", Role::Client),
];

/// Seed the demo dataset into an empty store
pub async fn seed(store: &dyn Store) -> AppResult<()> {
    for (email, password, role) in DEMO_ACCOUNTS {
        store
            .users_create(NewUser {
                email: email.to_string(),
                name: Some(display_name(email)),
                role: *role,
                password_hash: hash_password(password)?,
            })
            .await?;
    }

    let fiction = store.categories_create("Fiction").await?;
    let science = store.categories_create("Science").await?;
    let history = store.categories_create("History").await?;
    let technology = store.categories_create("Technology").await?;

    let books = [
        (
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "A novel about the American dream and the roaring twenties.",
            5,
            fiction.id,
        ),
        (
            "A Brief History of Time",
            "Stephen Hawking",
            "Exploring the universe from the Big Bang to black holes.",
            3,
            science.id,
        ),
        (
            "Sapiens",
            "Yuval Noah Harari",
            "A brief history of humankind from the Stone Age to the present.",
            7,
            history.id,
        ),
        (
            "Clean Code",
            "Robert C. Martin",
            "A handbook of agile software craftsmanship.",
            4,
            technology.id,
        ),
        (
            "1984",
            "George Orwell",
            "A dystopian social science fiction novel.",
            6,
            fiction.id,
        ),
        (
            "The Selfish Gene",
            "Richard Dawkins",
            "A book on evolution centered on the gene.",
            2,
            science.id,
        ),
    ];

    for (title, author, description, quantity, category_id) in books {
        store
            .books_create(&CreateBook {
                title: title.to_string(),
                author: author.to_string(),
                description: description.to_string(),
                quantity,
                category_id,
            })
            .await?;
    }

    Ok(())
}

fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => local.to_string(),
    }
}

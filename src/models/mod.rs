//! Data models for LibraryMS

pub mod book;
pub mod category;
pub mod emprunt;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BorrowableBook};
pub use category::Category;
pub use emprunt::{Emprunt, EmpruntStatus};
pub use role::Role;
pub use user::{User, UserPublic};

//! Data models for the catalog

pub mod book;
pub mod book_instance;
pub mod enums;

// Re-export commonly used types
pub use book::Book;
pub use book_instance::{BookInstance, BookInstanceDetails, BookInstanceDraft};
pub use enums::{BookInstanceStatus, StatusChoices};

//! Repository layer for catalog storage

pub mod book_instances;
pub mod books;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        book_instance::{BookInstance, BookInstanceChanges, BookInstanceDetails, NewBookInstance},
    },
};

pub use memory::MemoryStore;

/// Storage operations the catalog services depend on.
///
/// A lookup that finds nothing is `Ok(None)` / `Ok(false)`; `Err` is reserved for
/// infrastructure failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap round-trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;

    /// Books offered by the create form, ordered by title
    async fn books_list(&self) -> AppResult<Vec<Book>>;

    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>>;

    /// Copy with its book reference resolved
    async fn book_instances_find_with_book(&self, id: i32) -> AppResult<Option<BookInstanceDetails>>;

    async fn book_instances_insert(&self, data: &NewBookInstance) -> AppResult<BookInstance>;

    /// Replace imprint, status and due date; `None` when the copy no longer exists
    async fn book_instances_replace(
        &self,
        id: i32,
        data: &BookInstanceChanges,
    ) -> AppResult<Option<BookInstance>>;

    /// `false` when there was nothing to remove
    async fn book_instances_remove(&self, id: i32) -> AppResult<bool>;
}

/// Postgres-backed repository
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.books_list_titles().await
    }

    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>> {
        self.book_instances_list_with_book().await
    }

    async fn book_instances_find_with_book(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        self.book_instances_get_with_book(id).await
    }

    async fn book_instances_insert(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        self.book_instances_create(data).await
    }

    async fn book_instances_replace(
        &self,
        id: i32,
        data: &BookInstanceChanges,
    ) -> AppResult<Option<BookInstance>> {
        self.book_instances_update(id, data).await
    }

    async fn book_instances_remove(&self, id: i32) -> AppResult<bool> {
        self.book_instances_delete(id).await
    }
}

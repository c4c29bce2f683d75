//! Related-record lookups joined before a copy's forms can render

use crate::{error::AppResult, models::book_instance::BookInstanceDetails, repository::CatalogStore};

/// Results of the lookups, one field per task.
///
/// A `None` field is a soft miss; callers decide whether that is an error.
#[derive(Debug)]
pub struct BookInstanceLookup {
    pub book_instance: Option<BookInstanceDetails>,
}

/// Run every lookup concurrently and fail as a whole on the first storage error.
pub async fn fetch_book_instance(store: &dyn CatalogStore, id: i32) -> AppResult<BookInstanceLookup> {
    let (book_instance,) = tokio::try_join!(store.book_instances_find_with_book(id))
        .map_err(|e| {
            tracing::warn!(book_instance_id = id, error = %e, "book instance lookup failed");
            e
        })?;

    if book_instance.is_none() {
        tracing::debug!(book_instance_id = id, "book instance not found");
    }

    Ok(BookInstanceLookup { book_instance })
}

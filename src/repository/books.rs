//! Book reads on Repository

use super::Repository;
use crate::{error::AppResult, models::book::Book};

impl Repository {
    /// All books, id and title only
    pub async fn books_list_titles(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT id, title FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

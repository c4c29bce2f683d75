//! Book instance domain methods on Repository

use chrono::NaiveDate;
use sqlx::FromRow;

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        book::Book,
        book_instance::{BookInstance, BookInstanceChanges, BookInstanceDetails, NewBookInstance},
        enums::BookInstanceStatus,
    },
};

const SELECT_WITH_BOOK: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

/// Copy joined with its book
#[derive(FromRow)]
struct BookInstanceWithBookRow {
    id: i32,
    book_id: i32,
    imprint: String,
    status: BookInstanceStatus,
    due_back: Option<NaiveDate>,
    book_title: String,
}

impl From<BookInstanceWithBookRow> for BookInstanceDetails {
    fn from(row: BookInstanceWithBookRow) -> Self {
        Self {
            id: row.id,
            book: Book {
                id: row.book_id,
                title: row.book_title,
            },
            imprint: row.imprint,
            status: row.status,
            due_back: row.due_back,
        }
    }
}

impl Repository {
    /// List all copies with their book resolved
    pub async fn book_instances_list_with_book(&self) -> AppResult<Vec<BookInstanceDetails>> {
        let query = format!("{} ORDER BY b.title, bi.id", SELECT_WITH_BOOK);
        let rows = sqlx::query_as::<_, BookInstanceWithBookRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookInstanceDetails::from).collect())
    }

    /// Get a copy by ID with its book resolved
    pub async fn book_instances_get_with_book(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_BOOK);
        let row = sqlx::query_as::<_, BookInstanceWithBookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookInstanceDetails::from))
    }

    /// Create a copy; the books foreign key rejects unknown references
    pub async fn book_instances_create(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status)
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the mutable fields of a copy; `due_back` text is cast by the database
    pub async fn book_instances_update(
        &self,
        id: i32,
        data: &BookInstanceChanges,
    ) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET imprint = $2, status = $3, due_back = $4::text::date
            WHERE id = $1
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(id)
        .bind(&data.imprint)
        .bind(data.status)
        .bind(&data.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a copy
    pub async fn book_instances_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! In-process catalog store
//!
//! Same contract as the Postgres repository: unknown book references are rejected on insert and
//! the update path coerces the submitted due date text, failing like the database cast would.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        book_instance::{BookInstance, BookInstanceChanges, BookInstanceDetails, NewBookInstance},
    },
    validation::parse_iso8601,
};

#[derive(Default)]
struct MemoryState {
    books: BTreeMap<i32, Book>,
    book_instances: BTreeMap<i32, BookInstance>,
    last_book_id: i32,
    last_book_instance_id: i32,
}

impl MemoryState {
    // Ids are never handed out twice, even after a removal.
    fn next_book_id(&mut self) -> i32 {
        self.last_book_id += 1;
        self.last_book_id
    }

    fn next_book_instance_id(&mut self) -> i32 {
        self.last_book_instance_id += 1;
        self.last_book_instance_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_book(&self, title: &str) -> Book {
        let mut state = self.state.write().await;
        let book = Book {
            id: state.next_book_id(),
            title: title.to_string(),
        };
        state.books.insert(book.id, book.clone());
        book
    }

    pub async fn book_instances_count(&self) -> usize {
        self.state.read().await.book_instances.len()
    }
}

fn resolve(state: &MemoryState, instance: &BookInstance) -> AppResult<BookInstanceDetails> {
    let book = state.books.get(&instance.book_id).cloned().ok_or_else(|| {
        AppError::Storage(format!(
            "book instance {} references missing book {}",
            instance.id, instance.book_id
        ))
    })?;
    Ok(BookInstanceDetails::from_parts(instance.clone(), book))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>> {
        let state = self.state.read().await;
        let mut list = state
            .book_instances
            .values()
            .map(|instance| resolve(&state, instance))
            .collect::<AppResult<Vec<_>>>()?;
        list.sort_by(|a, b| a.book.title.cmp(&b.book.title).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn book_instances_find_with_book(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        let state = self.state.read().await;
        state
            .book_instances
            .get(&id)
            .map(|instance| resolve(&state, instance))
            .transpose()
    }

    async fn book_instances_insert(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&data.book_id) {
            return Err(AppError::Storage(format!(
                "book {} does not exist",
                data.book_id
            )));
        }

        let instance = BookInstance {
            id: state.next_book_instance_id(),
            book_id: data.book_id,
            imprint: data.imprint.clone(),
            status: data.status,
            due_back: data.due_back,
        };
        state.book_instances.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn book_instances_replace(
        &self,
        id: i32,
        data: &BookInstanceChanges,
    ) -> AppResult<Option<BookInstance>> {
        let due_back = parse_iso8601(&data.due_back).ok_or_else(|| {
            AppError::Storage(format!(
                "invalid input syntax for type date: \"{}\"",
                data.due_back
            ))
        })?;

        let mut state = self.state.write().await;
        let Some(instance) = state.book_instances.get_mut(&id) else {
            return Ok(None);
        };
        instance.imprint = data.imprint.clone();
        instance.status = data.status;
        instance.due_back = Some(due_back);
        Ok(Some(instance.clone()))
    }

    async fn book_instances_remove(&self, id: i32) -> AppResult<bool> {
        Ok(self.state.write().await.book_instances.remove(&id).is_some())
    }
}

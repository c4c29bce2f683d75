//! Book instance (loanable copy) request flows
//!
//! Each flow is a short pipeline: sanitize and validate, then either re-render the form with
//! the submitted values and every error, or persist and redirect. Validation failures are never
//! errors; lookups and writes that fail in the store always are.

use std::sync::Arc;

use validator::Validate;

use super::{
    lookup::fetch_book_instance,
    views::{
        CreateFormContext, DeleteContext, DetailContext, FormRecord, ListContext, Outcome,
        UpdateFormContext, ViewContext, DELETE_TEMPLATE, DETAIL_TEMPLATE, FORM_TEMPLATE,
        LIST_TEMPLATE,
    },
};
use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{
            BookInstanceDetails, BookInstanceDraft, CreateBookInstance, UpdateBookInstance,
            LIST_URL,
        },
        enums::candidate_states,
    },
    repository::CatalogStore,
    validation::{FieldError, ValidationReport},
};

const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update Book Instance";

#[derive(Clone)]
pub struct BookInstanceService {
    store: Arc<dyn CatalogStore>,
}

impl BookInstanceService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All copies with their book resolved
    pub async fn list(&self) -> AppResult<Outcome> {
        let list = self.store.book_instances_list().await?;
        Ok(Outcome::render(
            LIST_TEMPLATE,
            "Book Instance List",
            ViewContext::List(ListContext {
                bookinstance_list: list.into_iter().map(BookInstanceDetails::display).collect(),
            }),
        ))
    }

    pub async fn detail(&self, id: i32) -> AppResult<Outcome> {
        let Some(record) = fetch_book_instance(self.store.as_ref(), id).await?.book_instance else {
            return Err(AppError::NotFound("Book copy not found".to_string()));
        };
        Ok(Outcome::render(
            DETAIL_TEMPLATE,
            format!("Copy: {}", record.book.title),
            ViewContext::Detail(DetailContext {
                bookinstance: record.display(),
            }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        self.render_create_form(None, Vec::new()).await
    }

    pub async fn create(&self, input: CreateBookInstance) -> AppResult<Outcome> {
        let input = input.trimmed();
        let report = ValidationReport::collect(input.validate(), &CreateBookInstance::FIELDS);
        let draft = BookInstanceDraft::for_create(input.sanitized());

        if !report.is_valid() {
            tracing::debug!(errors = report.errors().len(), "book instance create rejected");
            return self
                .render_create_form(Some(draft), report.into_errors())
                .await;
        }

        let record = draft.new_record()?;
        let created = self.store.book_instances_insert(&record).await?;
        tracing::info!(book_instance_id = created.id, book_id = created.book_id, "book instance created");

        Ok(Outcome::redirect(created.url()))
    }

    /// Confirmation page; a copy that is already gone sends the user back to the listing
    pub async fn delete_form(&self, id: i32) -> AppResult<Outcome> {
        let Some(record) = fetch_book_instance(self.store.as_ref(), id).await?.book_instance else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        Ok(Outcome::render(
            DELETE_TEMPLATE,
            "Delete Instance",
            ViewContext::Delete(DeleteContext {
                name: record.book.title,
                id,
            }),
        ))
    }

    /// Deleting a missing copy lands on the listing exactly like a successful delete
    pub async fn delete(&self, id: i32) -> AppResult<Outcome> {
        if fetch_book_instance(self.store.as_ref(), id)
            .await?
            .book_instance
            .is_none()
        {
            return Ok(Outcome::redirect(LIST_URL));
        }

        if self.store.book_instances_remove(id).await? {
            tracing::info!(book_instance_id = id, "book instance deleted");
        } else {
            tracing::debug!(book_instance_id = id, "book instance already removed");
        }
        Ok(Outcome::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: i32) -> AppResult<Outcome> {
        let target = self.require_target(id).await?;
        let choices = candidate_states(target.status.as_str())?;
        let book = target.book.clone();

        Ok(Outcome::render(
            FORM_TEMPLATE,
            UPDATE_TITLE,
            ViewContext::UpdateForm(UpdateFormContext {
                bookinstance: FormRecord::Stored(target.display()),
                book,
                choices,
                errors: Vec::new(),
            }),
        ))
    }

    /// Full replace of imprint, status and due date; the book reference is never touched
    pub async fn update(&self, id: i32, input: UpdateBookInstance) -> AppResult<Outcome> {
        let input = input.trimmed();
        let report = ValidationReport::collect(input.validate(), &UpdateBookInstance::FIELDS);
        let draft = BookInstanceDraft::for_update(id, input.sanitized());

        if !report.is_valid() {
            tracing::debug!(
                book_instance_id = id,
                errors = report.errors().len(),
                "book instance update rejected"
            );
            let target = self.require_target(id).await?;
            let choices = candidate_states(target.status.as_str())?;
            return Ok(Outcome::render(
                FORM_TEMPLATE,
                UPDATE_TITLE,
                ViewContext::UpdateForm(UpdateFormContext {
                    bookinstance: FormRecord::Submitted(draft),
                    book: target.book,
                    choices,
                    errors: report.into_errors(),
                }),
            ));
        }

        let (target_id, changes) = draft.changes()?;
        let updated = self
            .store
            .book_instances_replace(target_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Book Instance not found".to_string()))?;
        tracing::info!(book_instance_id = updated.id, "book instance updated");

        Ok(Outcome::redirect(updated.url()))
    }

    /// The update form cannot render without its record, so a miss is escalated
    async fn require_target(&self, id: i32) -> AppResult<BookInstanceDetails> {
        fetch_book_instance(self.store.as_ref(), id)
            .await?
            .book_instance
            .ok_or_else(|| AppError::NotFound("Book Instance not found".to_string()))
    }

    async fn render_create_form(
        &self,
        draft: Option<BookInstanceDraft>,
        errors: Vec<FieldError>,
    ) -> AppResult<Outcome> {
        let book_list = self.store.books_list().await?;
        Ok(Outcome::render(
            FORM_TEMPLATE,
            CREATE_TITLE,
            ViewContext::CreateForm(CreateFormContext {
                book_list,
                selected_book: draft.as_ref().and_then(|d| d.book.clone()),
                bookinstance: draft,
                errors,
            }),
        ))
    }
}

//! Book instance (copy) endpoints
//!
//! Form posts are url-encoded. Successful writes answer `303 See Other` towards the record or
//! the listing; everything else answers with a JSON view document.

use axum::{
    extract::{Path, State},
    Form,
};

use crate::{
    error::AppResult,
    models::book_instance::{CreateBookInstance, UpdateBookInstance, LIST_URL},
    services::views::Outcome,
    AppState,
};

/// Delete routes treat an id that cannot name a stored copy as already gone.
fn deletable_id(raw: &str) -> Option<i32> {
    let id = raw.parse().ok();
    if id.is_none() {
        tracing::debug!(id = raw, "Delete requested for an id that cannot exist");
    }
    id
}

/// List all copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "bookinstance_list view")
    )
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Outcome> {
    state.services.book_instances.list().await
}

/// Get a copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "bookinstance_detail view"),
        (status = 404, description = "Book copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Outcome> {
    state.services.book_instances.detail(id).await
}

/// Create form with the book selection list
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "bookinstance_form view")
    )
)]
pub async fn create_form(State(state): State<AppState>) -> AppResult<Outcome> {
    state.services.book_instances.create_form().await
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = CreateBookInstance, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to the new copy"),
        (status = 200, description = "bookinstance_form view with the submitted values and errors"),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(input): Form<CreateBookInstance>,
) -> AppResult<Outcome> {
    state.services.book_instances.create(input).await
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "bookinstance_delete view"),
        (status = 303, description = "Copy already gone, redirects to the listing")
    )
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    match deletable_id(&id) {
        Some(id) => state.services.book_instances.delete_form(id).await,
        None => Ok(Outcome::redirect(LIST_URL)),
    }
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 303, description = "Redirects to the listing, whether or not the copy existed")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    match deletable_id(&id) {
        Some(id) => state.services.book_instances.delete(id).await,
        None => Ok(Outcome::redirect(LIST_URL)),
    }
}

/// Update form with the selectable statuses
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "bookinstance_form view"),
        (status = 404, description = "Book Instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Outcome> {
    state.services.book_instances.update_form(id).await
}

/// Update a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    request_body(content = UpdateBookInstance, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirects to the copy"),
        (status = 200, description = "bookinstance_form view with the submitted values and errors"),
        (status = 404, description = "Book Instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(input): Form<UpdateBookInstance>,
) -> AppResult<Outcome> {
    state.services.book_instances.update(id, input).await
}

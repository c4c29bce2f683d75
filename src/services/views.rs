//! Handler outcomes: a redirect or a named view with its context.
//!
//! Views are rendered as JSON documents carrying the template name; markup is left to clients.

use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::{
    models::{
        book::Book,
        book_instance::{BookInstanceDisplay, BookInstanceDraft},
        enums::StatusChoices,
    },
    validation::FieldError,
};

pub const LIST_TEMPLATE: &str = "bookinstance_list";
pub const DETAIL_TEMPLATE: &str = "bookinstance_detail";
pub const FORM_TEMPLATE: &str = "bookinstance_form";
pub const DELETE_TEMPLATE: &str = "bookinstance_delete";

#[derive(Debug)]
pub enum Outcome {
    Redirect(String),
    Render(View),
}

impl Outcome {
    pub fn redirect(to: impl Into<String>) -> Self {
        Outcome::Redirect(to.into())
    }

    pub fn render(template: &'static str, title: impl Into<String>, context: ViewContext) -> Self {
        Outcome::Render(View {
            template,
            title: title.into(),
            context,
        })
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Redirect(to) => Redirect::to(&to).into_response(),
            Outcome::Render(view) => Json(view).into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct View {
    pub template: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub context: ViewContext,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ViewContext {
    List(ListContext),
    Detail(DetailContext),
    CreateForm(CreateFormContext),
    UpdateForm(UpdateFormContext),
    Delete(DeleteContext),
}

#[derive(Debug, Serialize)]
pub struct ListContext {
    pub bookinstance_list: Vec<BookInstanceDisplay>,
}

#[derive(Debug, Serialize)]
pub struct DetailContext {
    pub bookinstance: BookInstanceDisplay,
}

#[derive(Debug, Serialize)]
pub struct CreateFormContext {
    pub book_list: Vec<Book>,
    pub selected_book: Option<String>,
    /// Submitted values when re-rendering after a rejected post
    pub bookinstance: Option<BookInstanceDraft>,
    pub errors: Vec<FieldError>,
}

/// What the update form is filled with
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FormRecord {
    Stored(BookInstanceDisplay),
    Submitted(BookInstanceDraft),
}

#[derive(Debug, Serialize)]
pub struct UpdateFormContext {
    pub bookinstance: FormRecord,
    pub book: Book,
    #[serde(flatten)]
    pub choices: StatusChoices,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct DeleteContext {
    /// Title of the copy's book
    pub name: String,
    pub id: i32,
}

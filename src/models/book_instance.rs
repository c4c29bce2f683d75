//! Book instance (loanable copy) model, input forms and candidate records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{book::Book, enums::BookInstanceStatus};
use crate::{
    error::{AppError, AppResult},
    validation::{clean, parse_iso8601, rule_error},
};

/// Listing view every delete flow lands on
pub const LIST_URL: &str = "/catalog/bookinstances";

pub fn detail_url(id: i32) -> String {
    format!("/catalog/bookinstance/{}", id)
}

/// Stored copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        detail_url(self.id)
    }
}

/// Copy with its book reference resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookInstanceDetails {
    pub id: i32,
    pub book: Book,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceDetails {
    pub fn from_parts(instance: BookInstance, book: Book) -> Self {
        Self {
            id: instance.id,
            book,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
        }
    }

    pub fn url(&self) -> String {
        detail_url(self.id)
    }

    /// e.g. `May 1, 2024`; empty when no due date is set
    pub fn due_back_formatted(&self) -> String {
        self.due_back
            .map(|date| date.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }

    pub fn display(self) -> BookInstanceDisplay {
        BookInstanceDisplay {
            url: self.url(),
            book_url: self.book.url(),
            due_back_formatted: self.due_back_formatted(),
            record: self,
        }
    }
}

/// Read-time view of a copy with its derived fields
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceDisplay {
    #[serde(flatten)]
    pub record: BookInstanceDetails,
    pub url: String,
    pub book_url: String,
    pub due_back_formatted: String,
}

// ---------------------------------------------------------------------------
// Input forms
// ---------------------------------------------------------------------------

fn validate_book_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<i32>().is_ok() {
        return Ok(());
    }
    Err(rule_error(
        "book_reference",
        "Book must reference a catalog entry",
    ))
}

fn validate_status_label(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<BookInstanceStatus>().is_ok() {
        return Ok(());
    }
    Err(rule_error(
        "status",
        "Status must be one of Available, Maintenance, Loaned, Reserved",
    ))
}

fn validate_optional_iso8601(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_iso8601(value).is_some() {
        return Ok(());
    }
    Err(rule_error("iso8601", "Invalid date"))
}

/// Create form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateBookInstance {
    /// Book identifier
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "validate_book_reference")
    )]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    /// Defaults to `Maintenance` when blank
    #[validate(custom(function = "validate_status_label"))]
    pub status: String,
    /// ISO-8601 date, optional
    #[validate(custom(function = "validate_optional_iso8601"))]
    pub due_back: String,
}

impl CreateBookInstance {
    pub const FIELDS: [&'static str; 4] = ["book", "imprint", "status", "due_back"];

    pub fn trimmed(self) -> Self {
        Self {
            book: self.book.trim().to_string(),
            imprint: self.imprint.trim().to_string(),
            status: self.status.trim().to_string(),
            due_back: self.due_back.trim().to_string(),
        }
    }

    pub fn sanitized(&self) -> SanitizedCreate {
        SanitizedCreate {
            book: clean(&self.book),
            imprint: clean(&self.imprint),
            status: clean(&self.status).parse().ok(),
            due_back: parse_iso8601(&self.due_back),
        }
    }
}

/// Update form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateBookInstance {
    #[validate(length(min = 1, message = "Imprint must not be empty."))]
    pub imprint: String,
    #[validate(
        length(min = 1, message = "Status must not be empty."),
        custom(function = "validate_status_label")
    )]
    pub status: String,
    /// Carried as text on this path, never parsed here
    #[validate(length(min = 1, message = "Date must not be empty."))]
    pub due_back: String,
}

impl UpdateBookInstance {
    pub const FIELDS: [&'static str; 3] = ["imprint", "status", "due_back"];

    pub fn trimmed(self) -> Self {
        Self {
            imprint: self.imprint.trim().to_string(),
            status: self.status.trim().to_string(),
            due_back: self.due_back.trim().to_string(),
        }
    }

    pub fn sanitized(&self) -> SanitizedUpdate {
        SanitizedUpdate {
            imprint: clean(&self.imprint),
            status: clean(&self.status).parse().ok(),
            due_back: clean(&self.due_back),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedCreate {
    pub book: String,
    pub imprint: String,
    pub status: Option<BookInstanceStatus>,
    pub due_back: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedUpdate {
    pub imprint: String,
    pub status: Option<BookInstanceStatus>,
    pub due_back: String,
}

// ---------------------------------------------------------------------------
// Candidate records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DueBack {
    Date(NaiveDate),
    Text(String),
}

/// Record assembled from sanitized input, valid or not, so a failed submission can be echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceDraft {
    /// Target record; absent on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Submitted book reference; absent on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    pub imprint: String,
    pub status: Option<BookInstanceStatus>,
    pub due_back: Option<DueBack>,
}

impl BookInstanceDraft {
    pub fn for_create(input: SanitizedCreate) -> Self {
        Self {
            id: None,
            book: Some(input.book),
            imprint: input.imprint,
            status: input.status,
            due_back: input.due_back.map(DueBack::Date),
        }
    }

    /// The target id must be carried here; without it the write would mint a new record.
    pub fn for_update(id: i32, input: SanitizedUpdate) -> Self {
        Self {
            id: Some(id),
            book: None,
            imprint: input.imprint,
            status: input.status,
            due_back: Some(DueBack::Text(input.due_back)),
        }
    }

    /// Insert payload; only meaningful once the create rules passed.
    pub fn new_record(&self) -> AppResult<NewBookInstance> {
        let book_id = self
            .book
            .as_deref()
            .and_then(|book| book.parse::<i32>().ok())
            .ok_or_else(|| AppError::Internal("Draft has no valid book reference".to_string()))?;
        let due_back = match &self.due_back {
            Some(DueBack::Date(date)) => Some(*date),
            _ => None,
        };

        Ok(NewBookInstance {
            book_id,
            imprint: self.imprint.clone(),
            status: self.status.unwrap_or_default(),
            due_back,
        })
    }

    /// Replace payload and its target; only meaningful once the update rules passed.
    pub fn changes(&self) -> AppResult<(i32, BookInstanceChanges)> {
        let id = self
            .id
            .ok_or_else(|| AppError::Internal("Update draft has no target id".to_string()))?;
        let status = self
            .status
            .ok_or_else(|| AppError::Internal("Update draft has no status".to_string()))?;
        let due_back = match &self.due_back {
            Some(DueBack::Text(text)) => text.clone(),
            Some(DueBack::Date(date)) => date.format("%Y-%m-%d").to_string(),
            None => String::new(),
        };

        Ok((
            id,
            BookInstanceChanges {
                imprint: self.imprint.clone(),
                status,
                due_back,
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookInstance {
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Full replace of the mutable fields; `due_back` is coerced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceChanges {
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(book: &str, imprint: &str, status: &str, due_back: &str) -> CreateBookInstance {
        CreateBookInstance {
            book: book.into(),
            imprint: imprint.into(),
            status: status.into(),
            due_back: due_back.into(),
        }
    }

    #[test]
    fn test_create_sanitize() {
        let input = create_form(" 7 ", "  Penguin <Classics> ", " Loaned ", "2024-05-01").trimmed();
        let sanitized = input.sanitized();
        assert_eq!(sanitized.book, "7");
        assert_eq!(sanitized.imprint, "Penguin &lt;Classics&gt;");
        assert_eq!(sanitized.status, Some(BookInstanceStatus::Loaned));
        assert_eq!(sanitized.due_back, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_create_rules() {
        let input = create_form("", "", "Lost", "tomorrow").trimmed();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("book"));
        assert!(fields.contains_key("imprint"));
        assert!(fields.contains_key("status"));
        assert!(fields.contains_key("due_back"));

        assert!(create_form("3", "Penguin", "", "").trimmed().validate().is_ok());
        assert!(create_form("abc", "Penguin", "", "").trimmed().validate().is_err());
        assert!(create_form("3", "   ", "", "").trimmed().validate().is_err());
    }

    #[test]
    fn test_update_rules() {
        let input = UpdateBookInstance::default().trimmed();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);

        let input = UpdateBookInstance {
            imprint: "Vintage".into(),
            status: "Reserved".into(),
            due_back: "not a date".into(),
        };
        // the update path only checks that a date was given
        assert!(input.trimmed().validate().is_ok());
    }

    #[test]
    fn test_create_draft_has_no_id() {
        let draft = BookInstanceDraft::for_create(
            create_form("4", "Penguin", "", "").trimmed().sanitized(),
        );
        assert_eq!(draft.id, None);

        let record = draft.new_record().unwrap();
        assert_eq!(record.book_id, 4);
        assert_eq!(record.status, BookInstanceStatus::Maintenance);
        assert_eq!(record.due_back, None);
    }

    #[test]
    fn test_update_draft_carries_target_id() {
        let input = UpdateBookInstance {
            imprint: " Vintage ".into(),
            status: "Available".into(),
            due_back: "2024-06-01".into(),
        }
        .trimmed();
        let draft = BookInstanceDraft::for_update(12, input.sanitized());
        assert_eq!(draft.id, Some(12));
        assert_eq!(draft.book, None);

        let (id, changes) = draft.changes().unwrap();
        assert_eq!(id, 12);
        assert_eq!(changes.imprint, "Vintage");
        assert_eq!(changes.status, BookInstanceStatus::Available);
        assert_eq!(changes.due_back, "2024-06-01");
    }

    #[test]
    fn test_invalid_draft_still_echoes_input() {
        let draft = BookInstanceDraft::for_create(create_form("", "Penguin", "", "").sanitized());
        assert_eq!(draft.imprint, "Penguin");
        assert!(draft.new_record().is_err());

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["imprint"], "Penguin");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_display_fields() {
        let details = BookInstanceDetails::from_parts(
            BookInstance {
                id: 9,
                book_id: 2,
                imprint: "Penguin".into(),
                status: BookInstanceStatus::Loaned,
                due_back: NaiveDate::from_ymd_opt(2024, 5, 1),
            },
            Book {
                id: 2,
                title: "Dune".into(),
            },
        );
        assert_eq!(details.url(), "/catalog/bookinstance/9");
        assert_eq!(details.due_back_formatted(), "May 1, 2024");

        let display = details.display();
        assert_eq!(display.book_url, "/catalog/book/2");
        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["book"]["title"], "Dune");
        assert_eq!(json["status"], "Loaned");
        assert_eq!(json["url"], "/catalog/bookinstance/9");
    }
}

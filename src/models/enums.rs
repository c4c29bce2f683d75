//! Shared domain enums

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// BookInstanceStatus
// ---------------------------------------------------------------------------

/// Availability of a loanable copy.
///
/// Declaration order is the display order used by the update form. The stable string form is
/// the variant name, which is also the Postgres enum label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "book_instance_status")]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl Default for BookInstanceStatus {
    fn default() -> Self {
        BookInstanceStatus::Maintenance
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown book instance status: {}", s)))
    }
}

/// Status options offered by the update form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusChoices {
    /// Every other status, in declaration order
    pub states: Vec<BookInstanceStatus>,
    /// The record's status, pre-selected in the form
    pub current_status: BookInstanceStatus,
}

/// Split the fixed status list around `current`.
///
/// `current` must be the exact string form of one status; anything else is rejected rather
/// than producing a four-entry list with nothing selected.
pub fn candidate_states(current: &str) -> AppResult<StatusChoices> {
    let current_status = current.parse::<BookInstanceStatus>()?;
    let states = BookInstanceStatus::ALL
        .into_iter()
        .filter(|status| status.as_str() != current)
        .collect();

    Ok(StatusChoices {
        states,
        current_status,
    })
}

//! Book instance (borrowable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Loan status of a copy (stored as a one-character code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl InstanceStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            InstanceStatus::Maintenance => "m",
            InstanceStatus::OnLoan => "o",
            InstanceStatus::Available => "a",
            InstanceStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::OnLoan => "On Loan",
            InstanceStatus::Available => "Available",
            InstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(InstanceStatus::Maintenance),
            "o" => Ok(InstanceStatus::OnLoan),
            "a" => Ok(InstanceStatus::Available),
            "r" => Ok(InstanceStatus::Reserved),
            _ => Err(format!("Invalid instance status code: {}", s)),
        }
    }
}

// SQLx conversion for InstanceStatus
impl sqlx::Type<Postgres> for InstanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for InstanceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for InstanceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Borrowable copy of a book.
///
/// Copies carry a globally unique identifier rather than a sequential id.
/// A copy on loan always has a due-back date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: Option<String>,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Copy with its book title and borrower name, for the renewal form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InstanceDetails {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub imprint: Option<String>,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<String>,
}

/// Row of the borrowed-copy listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowedCopy {
    pub id: Uuid,
    pub title: String,
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<String>,
    /// Whether the due-back date is already past
    pub is_overdue: bool,
}

/// Create copy request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInstance {
    pub imprint: Option<String>,
    /// Defaults to maintenance when omitted
    pub status: Option<InstanceStatus>,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl CreateInstance {
    /// Field-level problems violating the copy invariants: a copy on loan
    /// must carry both a due-back date and a borrower.
    pub fn invariant_errors(&self) -> Vec<(&'static str, &'static str)> {
        let mut errors = Vec::new();
        if self.status == Some(InstanceStatus::OnLoan) {
            if self.due_back.is_none() {
                errors.push(("due_back", "A copy on loan must have a due-back date"));
            }
            if self.borrower_id.is_none() {
                errors.push(("borrower_id", "A copy on loan must have a borrower"));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            InstanceStatus::Maintenance,
            InstanceStatus::OnLoan,
            InstanceStatus::Available,
            InstanceStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<InstanceStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        assert!("x".parse::<InstanceStatus>().is_err());
        assert!("".parse::<InstanceStatus>().is_err());
    }

    #[test]
    fn on_loan_copy_requires_due_back_and_borrower() {
        let create = CreateInstance {
            imprint: Some("Unlikely Imprint, 2016".to_string()),
            status: Some(InstanceStatus::OnLoan),
            due_back: None,
            borrower_id: None,
        };
        let errors = create.invariant_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|(field, _)| *field == "due_back"));
        assert!(errors.iter().any(|(field, _)| *field == "borrower_id"));
    }

    #[test]
    fn maintenance_copy_needs_no_loan_fields() {
        let create = CreateInstance {
            imprint: None,
            status: Some(InstanceStatus::Maintenance),
            due_back: None,
            borrower_id: None,
        };
        assert!(create.invariant_errors().is_empty());
    }
}

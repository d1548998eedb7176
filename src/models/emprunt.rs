//! Emprunt (loan) model and related types
//!
//! Loan state is stored as dates only. EN_RETARD is derived at read time
//! from the configured loan period: an active loan becomes overdue once its
//! reference date (last validation, else the borrow date) is older than the
//! period. A stored overdue flag would go stale the moment the clock moved.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book::Book, user::UserPublic};

/// Loan status as exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EmpruntStatus {
    #[serde(rename = "EN_COURS")]
    EnCours,
    #[serde(rename = "RETOURNE")]
    Retourne,
    #[serde(rename = "EN_RETARD")]
    EnRetard,
}

/// Loan record as persisted; status is intentionally absent
#[derive(Debug, Clone, FromRow)]
pub struct EmpruntRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: DateTime<Utc>,
    pub validated_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
}

impl EmpruntRecord {
    /// Date the loan period is measured from
    pub fn reference_date(&self) -> DateTime<Utc> {
        self.validated_date.unwrap_or(self.borrow_date)
    }

    /// Status of the loan at `now`, given the configured loan period
    pub fn status_at(&self, now: DateTime<Utc>, period: Duration) -> EmpruntStatus {
        if self.returned_date.is_some() {
            EmpruntStatus::Retourne
        } else if now > self.reference_date() + period {
            EmpruntStatus::EnRetard
        } else {
            EmpruntStatus::EnCours
        }
    }
}

/// Loan with borrower and book resolved, before status derivation
#[derive(Debug, Clone)]
pub struct EmpruntRow {
    pub record: EmpruntRecord,
    pub borrower: UserPublic,
    pub book: Book,
}

/// Loan as served to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Emprunt {
    pub id: Uuid,
    pub borrower: UserPublic,
    pub book: Book,
    pub borrow_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: EmpruntStatus,
}

impl Emprunt {
    /// Assemble the wire representation, deriving status at `now`
    pub fn from_row(row: EmpruntRow, now: DateTime<Utc>, period: Duration) -> Self {
        let status = row.record.status_at(now, period);
        Self {
            id: row.record.id,
            borrower: row.borrower,
            book: row.book,
            borrow_date: row.record.borrow_date,
            validated_date: row.record.validated_date,
            return_date: row.record.returned_date,
            status,
        }
    }
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmprunt {
    pub book_id: Uuid,
}

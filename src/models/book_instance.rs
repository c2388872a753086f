//! Book instance (loanable copy) model and status codes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Availability status of a book instance, stored as a one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Available,
    OnLoan,
    Maintenance,
    Reserved,
}

impl InstanceStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "a",
            InstanceStatus::OnLoan => "o",
            InstanceStatus::Maintenance => "m",
            InstanceStatus::Reserved => "r",
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(InstanceStatus::Available),
            "o" => Ok(InstanceStatus::OnLoan),
            "m" => Ok(InstanceStatus::Maintenance),
            "r" => Ok(InstanceStatus::Reserved),
            _ => Err(format!("Invalid instance status code: {}", s)),
        }
    }
}

// SQLx conversion: the status column is a one-letter text code
impl sqlx::Type<Postgres> for InstanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
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

/// Book instance model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub status: InstanceStatus,
    pub borrower_id: Option<i32>,
    pub due_back: Option<NaiveDate>,
}

/// Loaned instance with book title and borrower name, for the borrowed lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanedInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub borrower_id: Option<i32>,
    /// Borrower display name, if known
    pub borrower: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            InstanceStatus::Available,
            InstanceStatus::OnLoan,
            InstanceStatus::Maintenance,
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
}

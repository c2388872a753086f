//! Explicit form parsing and validation
//!
//! The renewal workflow binds user-submitted data to a due-date field and
//! validates it before any mutation happens. Validation produces either the
//! parsed date or a set of field-level errors the handler re-renders.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default renewal proposal offered on the GET form (3 weeks)
pub const PROPOSED_RENEWAL_DAYS: i64 = 21;

/// Latest accepted renewal date, relative to today (4 weeks)
pub const MAX_RENEWAL_DAYS: i64 = 28;

/// A single field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn due_back(message: &str) -> Self {
        Self {
            field: "due_back".to_string(),
            message: message.to_string(),
        }
    }
}

/// Bound renewal form data, as submitted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// Requested due date (YYYY-MM-DD)
    pub due_back: String,
}

impl RenewBookForm {
    /// Pre-populate the form with the proposed renewal date
    pub fn proposed(today: NaiveDate) -> Self {
        Self {
            due_back: (today + Duration::days(PROPOSED_RENEWAL_DAYS)).to_string(),
        }
    }

    /// Validate the submitted due date against `today`.
    ///
    /// Accepted dates satisfy today <= due_back <= today + 4 weeks.
    pub fn validate(&self, today: NaiveDate) -> Result<NaiveDate, Vec<FieldError>> {
        let date = match NaiveDate::parse_from_str(self.due_back.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                return Err(vec![FieldError::due_back(
                    "Enter a valid date (YYYY-MM-DD)",
                )])
            }
        };

        if date < today {
            return Err(vec![FieldError::due_back("Invalid date - renewal in past")]);
        }
        if date > today + Duration::days(MAX_RENEWAL_DAYS) {
            return Err(vec![FieldError::due_back(
                "Invalid date - renewal more than 4 weeks ahead",
            )]);
        }

        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn proposed_date_is_three_weeks_out() {
        let form = RenewBookForm::proposed(today());
        assert_eq!(form.due_back, "2024-04-05");
    }

    #[test]
    fn accepts_date_within_window() {
        let form = RenewBookForm {
            due_back: "2024-03-29".to_string(),
        };
        assert_eq!(
            form.validate(today()),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 29).unwrap())
        );
    }

    #[test]
    fn accepts_today_and_window_boundary() {
        let form = RenewBookForm {
            due_back: "2024-03-15".to_string(),
        };
        assert!(form.validate(today()).is_ok());

        let form = RenewBookForm {
            due_back: "2024-04-12".to_string(),
        };
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn rejects_past_date() {
        let form = RenewBookForm {
            due_back: "2024-03-14".to_string(),
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "due_back");
        assert_eq!(errors[0].message, "Invalid date - renewal in past");
    }

    #[test]
    fn rejects_date_beyond_four_weeks() {
        let form = RenewBookForm {
            due_back: "2024-04-13".to_string(),
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(
            errors[0].message,
            "Invalid date - renewal more than 4 weeks ahead"
        );
    }

    #[test]
    fn rejects_unparseable_date() {
        let form = RenewBookForm {
            due_back: "not-a-date".to_string(),
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors[0].field, "due_back");
        assert_eq!(errors[0].message, "Enter a valid date (YYYY-MM-DD)");
    }
}

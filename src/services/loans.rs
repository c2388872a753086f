//! Loan views and the renewal workflow

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, LoanedInstance},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Instances currently on loan to the given user, soonest-due first
    pub async fn loaned_to_user(
        &self,
        user_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedInstance>, i64)> {
        self.repository
            .instances
            .loaned_to_borrower(user_id, page, per_page)
            .await
    }

    /// All instances currently on loan, soonest-due first
    pub async fn loaned_all(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedInstance>, i64)> {
        self.repository.instances.loaned_all(page, per_page).await
    }

    /// Resolve the renewal candidate by its UUID
    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }

    /// Commit a validated renewal: writes due_back and nothing else.
    /// The instance must have been resolved first; a vanished row still
    /// surfaces as not-found.
    pub async fn renew(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.repository.instances.update_due_back(id, due_back).await
    }
}

//! Book instances repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, InstanceStatus, LoanedInstance},
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by UUID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, status, borrower_id, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Count all instances
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count available instances (status "a")
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::Available)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// All instances of a book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, status, borrower_id, due_back
            FROM book_instances
            WHERE book_id = $1
            ORDER BY due_back NULLS LAST, id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    /// Instances on loan to the given borrower, soonest-due first
    pub async fn loaned_to_borrower(
        &self,
        borrower_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedInstance>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE status = $1 AND borrower_id = $2",
        )
        .bind(InstanceStatus::OnLoan)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title, bi.borrower_id, bi.due_back,
                   u.last_name || ', ' || u.first_name AS borrower
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.status = $1 AND bi.borrower_id = $2
            ORDER BY bi.due_back
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(InstanceStatus::OnLoan)
        .bind(borrower_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((Self::collect_loaned(rows), total))
    }

    /// All instances on loan, soonest-due first, regardless of borrower
    pub async fn loaned_all(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedInstance>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::OnLoan)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title, bi.borrower_id, bi.due_back,
                   u.last_name || ', ' || u.first_name AS borrower
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.status = $1
            ORDER BY bi.due_back
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(InstanceStatus::OnLoan)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((Self::collect_loaned(rows), total))
    }

    /// Persist a new due date. The sole first-party mutation of an instance:
    /// status and borrower are never touched here.
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    fn collect_loaned(rows: Vec<sqlx::postgres::PgRow>) -> Vec<LoanedInstance> {
        let today = Utc::now().date_naive();

        rows.into_iter()
            .map(|row| {
                let due_back: Option<NaiveDate> = row.get("due_back");
                LoanedInstance {
                    id: row.get("id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    borrower_id: row.get("borrower_id"),
                    borrower: row.get("borrower"),
                    due_back,
                    is_overdue: due_back.map(|d| d < today).unwrap_or(false),
                }
            })
            .collect()
    }
}

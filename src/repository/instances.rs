//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{
        BookInstance, BorrowedCopy, CreateInstance, InstanceDetails, InstanceStatus,
    },
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a copy with its book title and borrower name
    pub async fn get_details(&self, id: Uuid) -> AppResult<InstanceDetails> {
        sqlx::query_as::<_, InstanceDetails>(
            r#"
            SELECT bi.id, bi.book_id, b.title, bi.imprint, bi.status, bi.due_back,
                   u.username AS borrower
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book copy {} not found", id)))
    }

    /// List the copies of a book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    /// Create a copy of a book, assigning its unique identifier server-side
    pub async fn create(&self, book_id: i32, instance: &CreateInstance) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        let status = instance.status.unwrap_or(InstanceStatus::Maintenance);

        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(status)
        .bind(instance.due_back)
        .bind(instance.borrower_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Set the due-back date of a copy.
    ///
    /// A single row-scoped UPDATE, so concurrent renewals of the same copy
    /// cannot produce a lost update. Borrower and status are untouched.
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book copy {} not found", id)));
        }
        Ok(())
    }

    /// Copies on loan to a given borrower, ordered by due-back date
    pub async fn borrowed_by_user(
        &self,
        borrower_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<BorrowedCopy>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE borrower_id = $1 AND status = 'o'",
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let copies = sqlx::query_as::<_, BorrowedCopy>(
            r#"
            SELECT bi.id, b.title, bi.imprint, bi.due_back, u.username AS borrower,
                   COALESCE(bi.due_back < CURRENT_DATE, FALSE) AS is_overdue
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.borrower_id = $1 AND bi.status = 'o'
            ORDER BY bi.due_back, bi.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(borrower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((copies, total))
    }

    /// All copies on loan, any borrower, ordered by due-back date
    pub async fn borrowed_all(&self, limit: i64, offset: i64) -> AppResult<(Vec<BorrowedCopy>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = 'o'")
                .fetch_one(&self.pool)
                .await?;

        let copies = sqlx::query_as::<_, BorrowedCopy>(
            r#"
            SELECT bi.id, b.title, bi.imprint, bi.due_back, u.username AS borrower,
                   COALESCE(bi.due_back < CURRENT_DATE, FALSE) AS is_overdue
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.status = 'o'
            ORDER BY bi.due_back, bi.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((copies, total))
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies with a given status
    pub async fn count_by_status(&self, status: InstanceStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

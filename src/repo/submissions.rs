use sqlx::SqliteExecutor;

use crate::domain::{ClientIp, SubmittedEmail};

/// Submission about to be stored
#[derive(Debug)]
pub struct NewSubmission {
    pub email: SubmittedEmail,
    pub ip: ClientIp,
    /// Acceptance time, in unix epoch seconds
    pub date: i64,
}

/// Repository for the `submissions` table
pub struct SubmissionRepo;

impl SubmissionRepo {
    #[tracing::instrument(name = "Count recent submissions from an address", skip(executor))]
    pub async fn count_by_ip_since<'con>(
        executor: impl SqliteExecutor<'con>,
        ip: &ClientIp,
        since: i64,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("select count(*) from submissions where ip = ? and date >= ?")
            .bind(ip.as_ref())
            .bind(since)
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Count submissions of an email", skip(executor))]
    pub async fn count_by_email<'con>(
        executor: impl SqliteExecutor<'con>,
        email: &SubmittedEmail,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("select count(*) from submissions where email = ?")
            .bind(email.as_ref())
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Insert submission", skip(executor))]
    pub async fn insert<'con>(
        executor: impl SqliteExecutor<'con>,
        new_submission: &NewSubmission,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query("insert into submissions(email, ip, date) values (?, ?, ?)")
            .bind(new_submission.email.as_ref())
            .bind(new_submission.ip.as_ref())
            .bind(new_submission.date)
            .execute(executor)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

/// Whether a store error is a violated `unique` constraint
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Stored submission record
#[cfg(test)]
#[derive(Debug, sqlx::FromRow)]
pub struct Submission {
    pub id: i64,
    pub email: String,
    pub ip: String,
    pub date: i64,
}

/// Inspection helpers for tests, the app itself never reads records back
#[cfg(test)]
impl SubmissionRepo {
    pub async fn count<'con>(executor: impl SqliteExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar("select count(*) from submissions")
            .fetch_one(executor)
            .await
    }

    pub async fn fetch_all<'con>(
        executor: impl SqliteExecutor<'con>,
    ) -> sqlx::Result<Vec<Submission>> {
        sqlx::query_as("select id, email, ip, date from submissions order by id")
            .fetch_all(executor)
            .await
    }
}

use sqlx::SqlitePool;

use thiserror::Error;

use crate::domain::{ClientIp, SubmittedEmail};
use crate::repo::{is_unique_violation, NewSubmission, SubmissionRepo};

/// Reason a submission was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Email or address was empty
    MissingField,
    /// The address already reached its quota for the throttling window
    TooManyFromIp,
    /// The email is already stored
    DuplicateEmail,
}

/// Outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// Store failures met while evaluating a submission
#[derive(Debug, Error)]
pub enum GatekeeperError {
    #[error("Failed to count submissions from {ip} since {since}")]
    ThrottleQuery {
        ip: ClientIp,
        since: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to count submissions of {email}")]
    UniquenessQuery {
        email: SubmittedEmail,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to insert submission of {email}")]
    Insert {
        email: SubmittedEmail,
        #[source]
        source: sqlx::Error,
    },
}

/// Decides whether a submitted email is stored.
///
/// Counts are read from the store on every call, so the gatekeeper holds no
/// state of its own and can be shared between workers.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    /// Length of the throttling window, in seconds
    delay_seconds: u64,
    /// Submissions accepted per address within a window
    max_submissions: u32,
}

impl Gatekeeper {
    pub fn new(delay_seconds: u64, max_submissions: u32) -> Self {
        Self {
            delay_seconds,
            max_submissions,
        }
    }

    /// Start of the throttling window ending at `now`, inclusive.
    /// Saturates instead of overflowing for very long windows.
    fn window_start(&self, now: i64) -> i64 {
        let delay = i64::try_from(self.delay_seconds).unwrap_or(i64::MAX);
        now.saturating_sub(delay)
    }

    /// Evaluate a submission made at `now` (unix epoch seconds).
    ///
    /// The address quota is checked before uniqueness, then the record is
    /// inserted. Rejections never write to the store.
    #[tracing::instrument(name = "Evaluate a submission", skip(self, pool))]
    pub async fn evaluate(
        &self,
        pool: &SqlitePool,
        email: &str,
        ip: &str,
        now: i64,
    ) -> Result<Verdict, GatekeeperError> {
        let (email, ip) = match (email.parse::<SubmittedEmail>(), ip.parse::<ClientIp>()) {
            (Ok(email), Ok(ip)) => (email, ip),
            (Err(e), _) | (_, Err(e)) => {
                tracing::info!("Rejected submission: {}", e);
                return Ok(Verdict::Rejected(Rejection::MissingField));
            }
        };

        let since = self.window_start(now);
        let recent = SubmissionRepo::count_by_ip_since(pool, &ip, since)
            .await
            .map_err(|source| GatekeeperError::ThrottleQuery {
                ip: ip.clone(),
                since,
                source,
            })?;
        tracing::debug!(
            "{} submissions stored for {} during the last {} seconds",
            recent,
            ip,
            self.delay_seconds
        );
        if recent >= i64::from(self.max_submissions) {
            tracing::info!(
                "Too many submissions from {} during the last {} seconds",
                ip,
                self.delay_seconds
            );
            return Ok(Verdict::Rejected(Rejection::TooManyFromIp));
        }

        let existing = SubmissionRepo::count_by_email(pool, &email)
            .await
            .map_err(|source| GatekeeperError::UniquenessQuery {
                email: email.clone(),
                source,
            })?;
        if existing > 0 {
            tracing::info!("Email address {} already stored", email);
            return Ok(Verdict::Rejected(Rejection::DuplicateEmail));
        }

        let new_submission = NewSubmission {
            email,
            ip,
            date: now,
        };
        match SubmissionRepo::insert(pool, &new_submission).await {
            Ok(id) => {
                tracing::info!("Stored submission {}", id);
                Ok(Verdict::Accepted)
            }
            // A concurrent submission stored the same email after our check
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(
                    "Email address {} stored concurrently: {}",
                    new_submission.email,
                    e
                );
                Ok(Verdict::Rejected(Rejection::DuplicateEmail))
            }
            Err(source) => Err(GatekeeperError::Insert {
                email: new_submission.email,
                source,
            }),
        }
    }
}

//! # Retry Policy
//!
//! Bounded retry for database reads and writes.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Retry Decision                                   │
//! │                                                                         │
//! │  attempt ──► Ok ───────────────────────────────► return value          │
//! │     │                                                                   │
//! │     ├── Err, transient, attempts left ──► wait delay ──► attempt again │
//! │     │      (busy database, pool exhausted, dropped connection)         │
//! │     │                                                                   │
//! │     ├── Err, transient, attempts spent ──► return error                │
//! │     │                                                                   │
//! │     └── Err, permanent ──────────────────► return error immediately    │
//! │            (not found, constraint violation, bad SQL)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only failures where a second attempt can plausibly succeed are retried;
//! the split lives in [`caja_db::DbError::is_transient`]. A foreign-key
//! violation fails the same way every time, so repeating it would only delay
//! the 4xx the client needs to see.

use std::future::Future;
use std::time::Duration;

use caja_db::DbResult;

/// Retry policy applied around repository calls.
///
/// Cheap to clone; carried inside the shared application state.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt ceiling and inter-attempt delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            // Zero attempts would skip the operation entirely
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `f`, retrying transient failures up to the attempt ceiling.
    ///
    /// ## Returns
    /// The first `Ok`, or the error from the final attempt. Permanent errors
    /// are returned from whichever attempt produced them with no further
    /// tries.
    pub async fn run<T, F, Fut>(&self, operation: &str, f: F) -> DbResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        let mut attempt: u32 = 1;

        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "operation recovered after retry");
                    }
                    return Ok(value);
                }

                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "transient database failure, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }

                Err(err) => {
                    if err.is_transient() {
                        tracing::error!(
                            operation,
                            attempts = self.max_attempts,
                            error = %err,
                            "transient failure persisted through all attempts"
                        );
                    } else {
                        tracing::debug!(operation, error = %err, "permanent failure, not retrying");
                    }
                    return Err(err);
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

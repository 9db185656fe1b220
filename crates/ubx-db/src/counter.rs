//! Receipt counter store.
//!
//! A single row in `receipt_counters` is the only source of receipt sequence
//! values. Allocation takes a row lock (`for update`) inside the caller's
//! transaction, so concurrent intakes serialize at the database and a value
//! only becomes spent when the enclosing transaction commits. A rollback
//! (explicit or via `Drop`) hands the same value to the next allocator.
//!
//! The counter is never reset automatically. `last_reset_date` is part of the
//! schema but allocation neither reads nor writes it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, Postgres, Row, Transaction};
use thiserror::Error;
use tracing::error;

/// Key of the singleton counter row seeded by the initial migration.
pub const DEFAULT_COUNTER_KEY: i32 = 1;

#[derive(Debug, Error)]
pub enum CounterUnavailable {
    #[error("receipt counter row {key} is missing")]
    Missing { key: i32 },

    #[error("receipt counter read failed")]
    Read(#[source] sqlx::Error),

    #[error("receipt counter update failed")]
    Write(#[source] sqlx::Error),
}

/// Handle on one counter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptCounter {
    key: i32,
}

impl Default for ReceiptCounter {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER_KEY)
    }
}

/// Read-only view of the counter row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub key: i32,
    pub current_counter: i64,
    pub last_reset_date: DateTime<Utc>,
}

impl ReceiptCounter {
    pub fn new(key: i32) -> Self {
        Self { key }
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    /// Lock the counter row, advance it by one and return the new value.
    ///
    /// Takes a transaction rather than a connection: the row lock and the
    /// increment are only meaningful if they live and die with the caller's
    /// order insert.
    pub async fn allocate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, CounterUnavailable> {
        let row = sqlx::query(
            r#"
            select current_counter
            from receipt_counters
            where id = $1
            for update
            "#,
        )
        .bind(self.key)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            error!(key = self.key, error = %e, "receipt counter read failed");
            CounterUnavailable::Read(e)
        })?;

        let Some(row) = row else {
            error!(key = self.key, "receipt counter row missing");
            return Err(CounterUnavailable::Missing { key: self.key });
        };
        let current: i64 = row.try_get("current_counter").map_err(CounterUnavailable::Read)?;
        let next = current + 1;

        let res = sqlx::query(
            r#"
            update receipt_counters
            set current_counter = $2
            where id = $1
            "#,
        )
        .bind(self.key)
        .bind(next)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            error!(key = self.key, error = %e, "receipt counter update failed");
            CounterUnavailable::Write(e)
        })?;

        if res.rows_affected() != 1 {
            return Err(CounterUnavailable::Missing { key: self.key });
        }

        Ok(next)
    }

    /// Current state of the counter row, without locking it.
    pub async fn snapshot<'e, E>(&self, executor: E) -> Result<CounterSnapshot, CounterUnavailable>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query(
            r#"
            select id, current_counter, last_reset_date
            from receipt_counters
            where id = $1
            "#,
        )
        .bind(self.key)
        .fetch_optional(executor)
        .await
        .map_err(CounterUnavailable::Read)?
        .ok_or(CounterUnavailable::Missing { key: self.key })?;

        Ok(CounterSnapshot {
            key: row.try_get("id").map_err(CounterUnavailable::Read)?,
            current_counter: row
                .try_get("current_counter")
                .map_err(CounterUnavailable::Read)?,
            last_reset_date: row
                .try_get("last_reset_date")
                .map_err(CounterUnavailable::Read)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_counter_uses_seeded_row() {
        assert_eq!(ReceiptCounter::default().key(), DEFAULT_COUNTER_KEY);
        assert_eq!(ReceiptCounter::new(7).key(), 7);
    }

    #[test]
    fn missing_row_message_names_key() {
        let e = CounterUnavailable::Missing { key: 3 };
        assert_eq!(e.to_string(), "receipt counter row 3 is missing");
    }
}

//! SQLite-backed obligation store.
//!
//! Owns the relational schema: an `obligations` table holding the
//! recurring schedule and an `obligation_transactions` table holding
//! materialized occurrences. `materialize` is the single transactional
//! operation the worker triggers: one inserted transaction plus one
//! due-date advance, committed together or not at all.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Frequency, ObligationTransaction, RecurringObligation};
use crate::error::{RecurdError, Result};
use crate::store::DueStore;

/// SQLite store for obligations and their materialized transactions.
pub struct ObligationStore {
    db: Connection,
}

impl ObligationStore {
    /// Open or create a store at the given database path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let db = Connection::open(path)?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    /// Open an in-memory store. Useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS obligations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                frequency TEXT NOT NULL,
                start_date TEXT NOT NULL,
                next_due_date TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_obligations_due
                ON obligations(is_active, next_due_date);

            CREATE TABLE IF NOT EXISTS obligation_transactions (
                id INTEGER PRIMARY KEY,
                obligation_id INTEGER NOT NULL REFERENCES obligations(id),
                amount REAL NOT NULL,
                posted_on TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_obligation
                ON obligation_transactions(obligation_id);
            "#,
        )?;
        Ok(())
    }

    /// Insert a new obligation. The first occurrence is due on
    /// `start_date`; the row starts active.
    pub fn insert(
        &self,
        description: &str,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Result<i64> {
        self.db.execute(
            r#"
            INSERT INTO obligations (description, amount, frequency, start_date, next_due_date, is_active)
            VALUES (?1, ?2, ?3, ?4, ?4, 1)
            "#,
            params![description, amount, frequency.as_str(), start_date],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// Fetch an obligation by id.
    pub fn get(&self, id: i64) -> Result<Option<RecurringObligation>> {
        let row = self
            .db
            .query_row(
                r#"
                SELECT id, description, amount, frequency, start_date, next_due_date, is_active
                FROM obligations WHERE id = ?1
                "#,
                [id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, NaiveDate>(4)?,
                        row.get::<_, NaiveDate>(5)?,
                        row.get::<_, bool>(6)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, description, amount, frequency, start_date, next_due_date, is_active)) => {
                let frequency = Frequency::from_str(&frequency)?;
                Ok(Some(RecurringObligation {
                    id,
                    description,
                    amount,
                    frequency,
                    start_date,
                    next_due_date,
                    is_active,
                }))
            }
        }
    }

    /// Activate or deactivate an obligation.
    pub fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let changed = self.db.execute(
            "UPDATE obligations SET is_active = ?2 WHERE id = ?1",
            params![id, active],
        )?;
        if changed == 0 {
            return Err(RecurdError::ObligationNotFound(id));
        }
        Ok(())
    }

    /// Count materialized transactions for an obligation.
    pub fn transaction_count(&self, obligation_id: i64) -> Result<i64> {
        let count = self.db.query_row(
            "SELECT COUNT(*) FROM obligation_transactions WHERE obligation_id = ?1",
            [obligation_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// List materialized transactions for an obligation, oldest first.
    pub fn list_transactions(&self, obligation_id: i64) -> Result<Vec<ObligationTransaction>> {
        let mut stmt = self.db.prepare(
            r#"
            SELECT id, obligation_id, amount, posted_on
            FROM obligation_transactions WHERE obligation_id = ?1 ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([obligation_id], |row| {
            Ok(ObligationTransaction {
                id: row.get(0)?,
                obligation_id: row.get(1)?,
                amount: row.get(2)?,
                posted_on: row.get(3)?,
            })
        })?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?);
        }
        Ok(transactions)
    }
}

impl DueStore for ObligationStore {
    fn select_due(&self, today: NaiveDate) -> Result<Vec<i64>> {
        let mut stmt = self.db.prepare(
            r#"
            SELECT id FROM obligations
            WHERE is_active = 1 AND next_due_date <= ?1
            "#,
        )?;
        let rows = stmt.query_map([today], |row| row.get(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    fn materialize(&mut self, obligation_id: i64) -> Result<()> {
        let tx = self.db.transaction()?;

        let row = tx
            .query_row(
                r#"
                SELECT amount, frequency, next_due_date, is_active
                FROM obligations WHERE id = ?1
                "#,
                [obligation_id],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, NaiveDate>(2)?,
                        row.get::<_, bool>(3)?,
                    ))
                },
            )
            .optional()?;

        let (amount, frequency, due_date, is_active) = match row {
            Some(row) => row,
            None => return Err(RecurdError::ObligationNotFound(obligation_id)),
        };
        if !is_active {
            return Err(RecurdError::InvalidState(format!(
                "obligation {obligation_id} is inactive"
            )));
        }
        let frequency = Frequency::from_str(&frequency)?;

        tx.execute(
            r#"
            INSERT INTO obligation_transactions (obligation_id, amount, posted_on)
            VALUES (?1, ?2, ?3)
            "#,
            params![obligation_id, amount, due_date],
        )?;
        tx.execute(
            "UPDATE obligations SET next_due_date = ?2 WHERE id = ?1",
            params![obligation_id, frequency.next_after(due_date)],
        )?;

        tx.commit()?;
        Ok(())
    }
}

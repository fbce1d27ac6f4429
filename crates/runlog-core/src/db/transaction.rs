//! Explicit begin/commit/rollback around a unit of work.

use log::{debug, warn};
use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

/// Brackets the statements of one logical write.
///
/// `begin` is a no-op while a transaction is already active, and also when the
/// connection is already inside a transaction opened by an enclosing unit of
/// work (the inner coordinator then neither commits nor rolls back).
/// `commit` is a no-op when nothing is active. Rollback failures are logged
/// and swallowed so the connection stays usable.
///
/// Dropping a coordinator with an active transaction rolls it back, which
/// covers early returns through `?` and unwinding panics alike.
///
/// ```rust
/// use rusqlite::Connection;
/// use runlog_core::db::TransactionCoordinator;
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
///
/// let mut tx = TransactionCoordinator::new(&conn);
/// tx.begin().unwrap();
/// conn.execute("INSERT INTO t VALUES (1)", []).unwrap();
/// tx.rollback();
///
/// let count: i64 = conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap();
/// assert_eq!(count, 0);
/// ```
pub struct TransactionCoordinator<'conn> {
    connection: &'conn Connection,
    active: bool,
}

impl<'conn> TransactionCoordinator<'conn> {
    /// Creates an idle coordinator for the given connection.
    pub fn new(connection: &'conn Connection) -> Self {
        Self {
            connection,
            active: false,
        }
    }

    /// Whether this coordinator currently owns an open transaction.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts a write transaction, taking the write lock up front.
    pub fn begin(&mut self) -> Result<()> {
        if self.active {
            debug!("begin() while a transaction is active; ignoring");
            return Ok(());
        }
        if !self.connection.is_autocommit() {
            debug!("joining enclosing transaction");
            return Ok(());
        }
        self.connection
            .execute_batch("BEGIN IMMEDIATE")
            .db_context("Failed to begin transaction")?;
        self.active = true;
        Ok(())
    }

    /// Commits the active transaction.
    ///
    /// If the commit itself fails the transaction is rolled back before the
    /// error is returned.
    pub fn commit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        match self.connection.execute_batch("COMMIT") {
            Ok(()) => {
                self.active = false;
                Ok(())
            }
            Err(e) => {
                self.rollback();
                Err(e).db_context("Failed to commit transaction")
            }
        }
    }

    /// Rolls back the active transaction, logging (not returning) failures.
    pub fn rollback(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.connection.execute_batch("ROLLBACK") {
            // A failed statement may already have ended the transaction.
            if self.connection.is_autocommit() {
                debug!("rollback after automatic rollback: {e}");
            } else {
                warn!("Failed to roll back transaction: {e}");
            }
        }
    }
}

impl Drop for TransactionCoordinator<'_> {
    fn drop(&mut self) {
        if self.active {
            debug!("rolling back unfinished transaction");
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory database");
        conn.execute_batch("CREATE TABLE t (x INTEGER NOT NULL)")
            .expect("create table");
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .expect("count rows")
    }

    #[test]
    fn test_commit_persists() {
        let conn = table();
        let mut tx = TransactionCoordinator::new(&conn);
        tx.begin().expect("begin");
        assert!(tx.is_active());
        conn.execute("INSERT INTO t VALUES (1)", []).expect("insert");
        tx.commit().expect("commit");
        assert!(!tx.is_active());
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_begin_twice_is_noop() {
        let conn = table();
        let mut tx = TransactionCoordinator::new(&conn);
        tx.begin().expect("begin");
        tx.begin().expect("second begin");
        assert!(tx.is_active());
        tx.commit().expect("commit");
    }

    #[test]
    fn test_commit_without_begin_is_noop() {
        let conn = table();
        let mut tx = TransactionCoordinator::new(&conn);
        tx.commit().expect("commit with nothing active");
        tx.rollback();
        assert!(!tx.is_active());
    }

    #[test]
    fn test_drop_rolls_back() {
        let conn = table();
        {
            let mut tx = TransactionCoordinator::new(&conn);
            tx.begin().expect("begin");
            conn.execute("INSERT INTO t VALUES (1)", []).expect("insert");
        }
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn test_failed_statement_mid_write_leaves_nothing() {
        let conn = table();
        let outcome: Result<()> = (|| {
            let mut tx = TransactionCoordinator::new(&conn);
            tx.begin()?;
            conn.execute("INSERT INTO t VALUES (1)", [])
                .db_context("first insert")?;
            conn.execute("INSERT INTO t VALUES (NULL)", [])
                .db_context("second insert")?;
            tx.commit()
        })();

        assert!(outcome.is_err());
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn test_inner_coordinator_joins_outer() {
        let conn = table();
        let mut outer = TransactionCoordinator::new(&conn);
        outer.begin().expect("outer begin");
        {
            let mut inner = TransactionCoordinator::new(&conn);
            inner.begin().expect("inner begin");
            assert!(!inner.is_active());
            conn.execute("INSERT INTO t VALUES (1)", []).expect("insert");
            inner.commit().expect("inner commit is a no-op");
        }
        assert!(!conn.is_autocommit());
        outer.rollback();
        assert_eq!(count(&conn), 0);
    }
}

//! Database connection management
//!
//! Provides the store configuration and the r2d2 connection pool. Every
//! operation checks out a `PooledConnection`; r2d2 hands it back to the pool
//! when the guard is dropped, on success and error paths alike.

#![allow(clippy::result_large_err)]

use crate::errors::{invalid_config, io_error, pool_error, Result};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::time::Duration;

/// Default on-disk location, relative to the working directory
pub const DEFAULT_DB_PATH: &str = ".bookshelf/store.db";
pub const DEFAULT_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file (WAL journal)
    File(PathBuf),
    /// Private in-memory database shared by every connection of one pool
    Memory,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Number of connections the pool opens and keeps open
    pub pool_size: usize,
    /// SQLite busy timeout, also used as the pool checkout timeout
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// File-backed store at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// In-memory store (for tests and throwaway runs)
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.pool_size == 0 || u32::try_from(self.pool_size).is_err() {
            return Err(invalid_config("pool_size must be between 1 and u32::MAX"));
        }
        if self.busy_timeout.is_zero() {
            return Err(invalid_config("busy_timeout must be non-zero"));
        }
        if let StoreLocation::File(path) = &self.location {
            if path.as_os_str().is_empty() {
                return Err(invalid_config("database path must not be empty"));
            }
        }
        Ok(())
    }
}

/// Per-connection setup: foreign keys on, busy timeout, WAL for files
pub fn configure(conn: &Connection, file_backed: bool, busy_timeout: Duration) -> rusqlite::Result<()> {
    // Referential integrity is off by default in SQLite
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    conn.busy_timeout(busy_timeout)?;

    if file_backed {
        // journal_mode answers with a row, so it must be read back
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    }

    Ok(())
}

fn manager_for(config: &StoreConfig) -> SqliteConnectionManager {
    let manager = match &config.location {
        StoreLocation::File(path) => SqliteConnectionManager::file(path),
        // A named shared-cache database lives as long as one connection to
        // it; the pool never retires idle connections, so it lives with
        // the pool
        StoreLocation::Memory => SqliteConnectionManager::file(format!(
            "file:bookshelf-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        ))
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
    };

    let file_backed = matches!(config.location, StoreLocation::File(_));
    let busy_timeout = config.busy_timeout;
    manager.with_init(move |conn| configure(conn, file_backed, busy_timeout))
}

/// A connection checked out of a `StorePool`
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Fixed-size pool of configured connections
pub struct StorePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl StorePool {
    /// Open `config.pool_size` connections and configure each one
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        if let StoreLocation::File(path) = &config.location {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| io_error("create_store_dir", e))?;
            }
        }

        let size = u32::try_from(config.pool_size)
            .map_err(|_| invalid_config("pool_size must be between 1 and u32::MAX"))?;
        let pool = r2d2::Pool::builder()
            .max_size(size)
            .min_idle(Some(size))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(config.busy_timeout)
            .build(manager_for(config))
            .map_err(|e| pool_error("pool_open", e))?;

        tracing::debug!(
            component = module_path!(),
            pool_size = config.pool_size,
            location = ?config.location,
            "store pool opened"
        );

        Ok(Self { pool })
    }

    /// Borrow a connection, waiting up to the checkout timeout
    pub fn acquire(&self) -> Result<PooledConnection> {
        self.pool.get().map_err(|e| pool_error("pool_acquire", e))
    }

    /// Total number of connections owned by the pool
    pub fn size(&self) -> usize {
        self.pool.max_size() as usize
    }

    /// Connections currently checked in
    pub fn idle_count(&self) -> usize {
        self.pool.state().idle_connections as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::ExErrorKind;

    #[test]
    fn test_zero_pool_size_rejected() {
        let err = StorePool::open(&StoreConfig::in_memory().with_pool_size(0))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_zero_busy_timeout_rejected() {
        let config = StoreConfig::in_memory().with_busy_timeout(Duration::ZERO);
        assert!(StorePool::open(&config).is_err());
    }

    #[test]
    fn test_guard_returns_connection() {
        let pool = StorePool::open(&StoreConfig::in_memory().with_pool_size(2)).unwrap();
        assert_eq!(pool.size(), 2);
        assert_eq!(pool.idle_count(), 2);
        {
            let _a = pool.acquire().unwrap();
            let _b = pool.acquire().unwrap();
            assert_eq!(pool.idle_count(), 0);
        }
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn test_exhausted_pool_times_out() {
        let config = StoreConfig::in_memory()
            .with_pool_size(1)
            .with_busy_timeout(Duration::from_millis(50));
        let pool = StorePool::open(&config).unwrap();
        let _held = pool.acquire().unwrap();

        let err = pool.acquire().err().unwrap();
        assert_eq!(err.kind(), ExErrorKind::StoreUnavailable);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_connection_survives_panicking_holder() {
        let pool = StorePool::open(&StoreConfig::in_memory().with_pool_size(1)).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _conn = pool.acquire().unwrap();
            panic!("holder failed");
        }));
        assert!(result.is_err());

        assert_eq!(pool.idle_count(), 1);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn test_memory_connections_share_one_database() {
        let pool = StorePool::open(&StoreConfig::in_memory().with_pool_size(2)).unwrap();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        a.execute_batch("CREATE TABLE shared_check (x INTEGER)").unwrap();
        let n: i64 = b
            .query_row("SELECT COUNT(*) FROM shared_check", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_every_connection_configured() {
        let pool = StorePool::open(&StoreConfig::in_memory().with_pool_size(2)).unwrap();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        for conn in [&a, &b] {
            let on: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert_eq!(on, 1);
        }
    }

    #[test]
    fn test_file_store_uses_wal() {
        let dir = tempfile::TempDir::new().unwrap();
        let pool =
            StorePool::open(&StoreConfig::file(dir.path().join("a").join("store.db"))).unwrap();
        let conn = pool.acquire().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}

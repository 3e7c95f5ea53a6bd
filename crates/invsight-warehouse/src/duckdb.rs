//! `DuckDB` connection pool.
//!
//! The in-memory database is opened once; pooled connections are clones of
//! that root handle so every connection sees the same catalog and committed
//! data.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use ::duckdb::Connection;

/// Access mode for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

#[derive(Default)]
struct PoolState {
    read_only: Vec<Connection>,
    read_write: Vec<Connection>,
}

impl PoolState {
    fn slot(&mut self, mode: AccessMode) -> &mut Vec<Connection> {
        match mode {
            AccessMode::ReadOnly => &mut self.read_only,
            AccessMode::ReadWrite => &mut self.read_write,
        }
    }
}

struct PoolInner {
    max_pool_size: usize,
    root: Mutex<Connection>,
    state: Mutex<PoolState>,
}

/// Pool of `DuckDB` connections, split by access mode.
#[derive(Clone)]
pub struct DuckDbConnectionManager {
    inner: Arc<PoolInner>,
}

impl DuckDbConnectionManager {
    /// Open a fresh in-memory database and create an empty pool.
    ///
    /// At most `max_pool_size` idle connections are kept per access mode.
    /// The database lives until the manager and every pooled connection
    /// are dropped.
    pub fn open_in_memory(max_pool_size: usize) -> Result<Self, ::duckdb::Error> {
        let root = Connection::open_in_memory()?;
        configure_connection(&root)?;

        Ok(Self {
            inner: Arc::new(PoolInner {
                max_pool_size: max_pool_size.max(1),
                root: Mutex::new(root),
                state: Mutex::new(PoolState::default()),
            }),
        })
    }

    pub fn acquire(&self, mode: AccessMode) -> Result<PooledConnection, ::duckdb::Error> {
        let idle = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slot(mode)
            .pop();

        let connection = match idle {
            Some(connection) => connection,
            None => self.new_connection()?,
        };

        Ok(PooledConnection {
            mode,
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    /// Idle connections currently held for `mode`.
    pub fn idle_count(&self, mode: AccessMode) -> usize {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slot(mode)
            .len()
    }

    fn new_connection(&self) -> Result<Connection, ::duckdb::Error> {
        let root = self.inner.root.lock().unwrap_or_else(PoisonError::into_inner);
        let connection = root.try_clone()?;
        configure_connection(&connection)?;
        Ok(connection)
    }
}

/// A pooled connection that returns to the pool when dropped.
pub struct PooledConnection {
    mode: AccessMode,
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl PooledConnection {
    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the connection out.
        self.connection
            .as_ref()
            .expect("pooled connection present until drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("pooled connection present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let mut state = self.pool.state.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = state.slot(self.mode);
        if idle.len() < self.pool.max_pool_size {
            idle.push(connection);
        }
    }
}

fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    // DuckDB accepts `access_mode` only at startup, so read-only semantics for
    // pooled connections are enforced by the query layer.
    connection.execute_batch("PRAGMA disable_progress_bar;")
}

//! SQLite quote store.
//!
//! # Responsibilities
//! - Open a fresh connection per operation
//! - Create the `cotacao` table idempotently
//! - Insert one row under a deadline, aborting the statement on expiry
//!
//! # Design Decisions
//! - SQLite calls block, so they run on Tokio's blocking pool
//! - `busy_timeout` is capped to the remaining budget so lock waits end in time
//! - The connection's interrupt handle is the cancellation path: SQLite rolls
//!   back an interrupted statement, so a timed-out insert leaves no row

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::StoreConfig;
use crate::quote::Quote;
use crate::resilience::Deadline;
use crate::store::types::{QuoteStore, StoreError, StoreResult};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cotacao (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT,
    codein TEXT,
    name TEXT,
    high TEXT,
    low TEXT,
    varBid TEXT,
    pctChange TEXT,
    bid TEXT,
    ask TEXT,
    timestamp TEXT,
    create_date TEXT
)";

const INSERT_QUOTE: &str = "INSERT INTO cotacao
    (code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

/// Quote store backed by a SQLite database file.
pub struct SqliteQuoteStore {
    path: PathBuf,
    schema_ready: OnceCell<()>,
}

impl SqliteQuoteStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::at(&config.dsn)
    }

    /// Store at an explicit database path.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema_ready: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of persisted quotes.
    pub async fn count(&self) -> StoreResult<u64> {
        let path = self.path.clone();
        run_blocking(move || {
            let conn = Connection::open(&path).map_err(StoreError::Connection)?;
            conn.query_row("SELECT COUNT(*) FROM cotacao", [], |row| row.get::<_, i64>(0))
                .map(|n| n as u64)
                .map_err(StoreError::Query)
        })
        .await
    }

    async fn connect(&self, busy: Duration) -> StoreResult<Connection> {
        let path = self.path.clone();
        run_blocking(move || {
            let conn = Connection::open(&path).map_err(StoreError::Connection)?;
            conn.busy_timeout(busy).map_err(StoreError::Connection)?;
            Ok(conn)
        })
        .await
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn initialize(&self) -> StoreResult<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                self.ensure_schema().await?;
                tracing::info!(path = %self.path.display(), "Quote table ready");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        let path = self.path.clone();
        run_blocking(move || {
            let conn = Connection::open(&path).map_err(StoreError::Connection)?;
            conn.execute_batch(CREATE_TABLE).map_err(StoreError::Schema)
        })
        .await
    }

    async fn insert(&self, quote: &Quote, deadline: Deadline) -> StoreResult<i64> {
        let conn = self.connect(deadline.remaining()).await?;
        let interrupt = conn.get_interrupt_handle();
        let quote = quote.clone();

        let mut task = tokio::task::spawn_blocking(move || insert_row(&conn, &quote, deadline));

        let outcome = deadline.run(&mut task).await;
        let joined = match outcome {
            Ok(joined) => joined,
            Err(_) => {
                interrupt.interrupt();
                tracing::debug!(
                    budget_ms = deadline.budget().as_millis() as u64,
                    "Insert deadline reached, interrupting statement"
                );
                match task.await {
                    // Committed right at the deadline; the row exists, so report it.
                    Ok(Ok(id)) => Ok(Ok(id)),
                    _ => {
                        return Err(StoreError::exec_deadline_exceeded(
                            deadline.budget().as_millis(),
                        ))
                    }
                }
            }
        };

        joined.map_err(|e| StoreError::Worker(e.to_string()))?
    }
}

fn insert_row(conn: &Connection, quote: &Quote, deadline: Deadline) -> StoreResult<i64> {
    let mut statement = conn
        .prepare(INSERT_QUOTE)
        .map_err(StoreError::PreparedStatement)?;

    if deadline.is_expired() {
        return Err(StoreError::exec_deadline_exceeded(
            deadline.budget().as_millis(),
        ));
    }

    statement
        .execute(params![
            quote.code,
            quote.codein,
            quote.name,
            quote.high,
            quote.low,
            quote.var_bid,
            quote.pct_change,
            quote.bid,
            quote.ask,
            quote.timestamp,
            quote.create_date,
        ])
        .map_err(|e| exec_error(e, &deadline))?;

    Ok(conn.last_insert_rowid())
}

fn exec_error(err: rusqlite::Error, deadline: &Deadline) -> StoreError {
    let deadline_exceeded = match err.sqlite_error_code() {
        Some(ErrorCode::OperationInterrupted) => true,
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => deadline.is_expired(),
        _ => false,
    };
    StoreError::PersistenceExec {
        deadline_exceeded,
        detail: err.to_string(),
    }
}

async fn run_blocking<T, F>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
}

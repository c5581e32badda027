//! Query backend for medicair-mcp.
//!
//! This crate owns the DuckDB/MotherDuck connection and executes SQL on
//! behalf of the protocol layer. Every query produces a dual result: a
//! formatted text transcript and the raw column/row data, which the
//! bridge serializes through [`values`] into protocol-safe JSON.

pub mod format;
pub mod values;

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use duckdb::{AccessMode, Config, Connection};
use tokio::sync::Mutex;

pub use duckdb::types::Value as CellValue;

/// Connection settings for the query backend.
///
/// All fields are opaque pass-through as far as the protocol layer is
/// concerned; they only matter at connect time.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub db_path: String,
    pub motherduck_token: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub saas_mode: bool,
    pub read_only: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            motherduck_token: None,
            home_dir: None,
            saas_mode: false,
            read_only: false,
        }
    }

    #[must_use]
    pub fn with_motherduck_token(mut self, token: impl Into<String>) -> Self {
        self.motherduck_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    #[must_use]
    pub const fn with_saas_mode(mut self, saas_mode: bool) -> Self {
        self.saas_mode = saas_mode;
        self
    }

    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn is_motherduck(&self) -> bool {
        self.db_path.starts_with("md:")
    }

    fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }

    /// Resolves the DSN handed to DuckDB. MotherDuck paths carry the
    /// token and SaaS-mode flag as query parameters.
    fn resolved_dsn(&self) -> String {
        if !self.is_motherduck() {
            return self.db_path.clone();
        }
        let mut dsn = self.db_path.clone();
        let mut separator = if dsn.contains('?') { '&' } else { '?' };
        if let Some(token) = &self.motherduck_token {
            dsn.push(separator);
            dsn.push_str("motherduck_token=");
            dsn.push_str(token);
            separator = '&';
        }
        if self.saas_mode {
            dsn.push(separator);
            dsn.push_str("saas_mode=true");
        }
        dsn
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    Connect { db_path: String, message: String },
    Execute(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { db_path, message } => {
                write!(f, "failed to open database {db_path}: {message}")
            }
            Self::Execute(message) => write!(f, "query failed: {message}"),
        }
    }
}

impl Error for DatabaseError {}

fn map_execute_error(err: impl fmt::Display) -> DatabaseError {
    DatabaseError::Execute(err.to_string())
}

/// One query's worth of results. Request-scoped, never persisted.
#[derive(Debug)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub formatted: String,
}

impl QueryOutput {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Shared handle to the backing DuckDB connection.
///
/// DuckDB connections are not `Sync`, so concurrent requests serialize
/// on the mutex; the bridge imposes no further discipline of its own.
#[derive(Clone)]
pub struct DatabaseClient {
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseClient {
    /// Opens a connection according to `config`.
    ///
    /// # Errors
    /// Returns [`DatabaseError::Connect`] when the database cannot be
    /// opened or the post-connect settings fail. The token never
    /// appears in the error message.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let map_connect_error = |err: duckdb::Error| DatabaseError::Connect {
            db_path: config.db_path.clone(),
            message: err.to_string(),
        };

        let mut settings = Config::default();
        if config.read_only && !config.is_motherduck() && !config.is_in_memory() {
            settings = settings
                .access_mode(AccessMode::ReadOnly)
                .map_err(map_connect_error)?;
        }

        let conn = if config.is_in_memory() {
            Connection::open_in_memory_with_flags(settings)
        } else {
            Connection::open_with_flags(config.resolved_dsn(), settings)
        }
        .map_err(map_connect_error)?;

        if let Some(home_dir) = &config.home_dir {
            let quoted = home_dir.display().to_string().replace('\'', "''");
            conn.execute_batch(&format!("SET home_directory = '{quoted}';"))
                .map_err(map_connect_error)?;
        }

        tracing::info!(db_path = %config.db_path, read_only = config.read_only, "database connection open");
        Ok(Self::from_connection(conn))
    }

    /// Wraps an existing connection, mainly for tests.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Executes one SQL statement and collects the full result set.
    ///
    /// # Errors
    /// Returns [`DatabaseError::Execute`] wrapping whatever DuckDB
    /// reports; failures are terminal for this request only and are
    /// never classified or retried here.
    pub async fn execute(&self, sql: &str) -> Result<QueryOutput, DatabaseError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(sql).map_err(map_execute_error)?;

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut result_rows = stmt.query([]).map_err(map_execute_error)?;
        while let Some(row) = result_rows.next().map_err(map_execute_error)? {
            let column_count = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(column_count);
            for index in 0..column_count {
                cells.push(row.get::<_, CellValue>(index).map_err(map_execute_error)?);
            }
            rows.push(cells);
        }
        drop(result_rows);

        let columns: Vec<String> = stmt.column_names().into_iter().map(Into::into).collect();
        let text_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(values::cell_text).collect())
            .collect();
        let formatted = format::render_table(&columns, &text_rows);

        Ok(QueryOutput {
            columns,
            rows,
            formatted,
        })
    }
}

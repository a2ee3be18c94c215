//! SurrealDB Connection Management
//!
//! Supports embedded (in-memory) and client-server modes.
//!
//! ## Modes
//!
//! - **Embedded (Memory)**: `kv-mem` - In-memory, no persistence (testing/development)
//! - **Client (WebSocket)**: `protocol-ws` - Remote server connection (production)
//!
//! ## Usage
//!
//! ```ignore
//! use makoto_persistence::surreal::{SurrealConnection, ConnectionMode};
//!
//! // Embedded in-memory (default, for testing)
//! let conn = SurrealConnection::new(ConnectionMode::Memory).await?;
//!
//! // Remote server (production)
//! let conn = SurrealConnection::new(ConnectionMode::Remote {
//!     url: "ws://localhost:8000".into(),
//!     username: "root".into(),
//!     password: "secret".into(),
//! }).await?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use surrealdb::engine::local::{Db as LocalDb, Mem};
use surrealdb::engine::remote::ws::{Client as WsClient, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Backend label used in storage errors
pub(crate) const BACKEND: &str = "SurrealDB";

/// Default namespace
pub const DEFAULT_NAMESPACE: &str = "makoto-club";

/// Default database
pub const DEFAULT_DATABASE: &str = "main";

/// Named query parameters
pub type Bindings = BTreeMap<String, Value>;

/// Connection mode for SurrealDB
#[derive(Debug, Clone, Default)]
pub enum ConnectionMode {
    /// In-memory database (no persistence, fast, for testing/development)
    #[default]
    Memory,
    /// Remote server connection via WebSocket (production)
    Remote {
        url: String,
        username: String,
        password: String,
    },
}

/// SurrealDB connection errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to SurrealDB: {0}")]
    Connection(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Database selection failed: {0}")]
    DatabaseSelection(String),
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),
}

impl From<ConnectionError> for PersistenceError {
    fn from(err: ConnectionError) -> Self {
        PersistenceError::Connection(err.to_string())
    }
}

/// Unified database client that works with both embedded and remote modes
pub enum DatabaseClient {
    /// Embedded local database
    Local(Surreal<LocalDb>),
    /// Remote WebSocket client
    Remote(Surreal<WsClient>),
}

/// SurrealDB connection wrapper
///
/// Manages connection lifecycle and provides unified access to database operations.
pub struct SurrealConnection {
    client: DatabaseClient,
    mode: ConnectionMode,
    namespace: String,
    database: String,
}

impl SurrealConnection {
    /// Create a new SurrealDB connection with the specified mode
    ///
    /// Default namespace: "makoto-club"
    /// Default database: "main"
    pub async fn new(mode: ConnectionMode) -> Result<Self, ConnectionError> {
        Self::with_names(mode, DEFAULT_NAMESPACE, DEFAULT_DATABASE).await
    }

    /// Create a new SurrealDB connection with custom namespace and database
    pub async fn with_names(
        mode: ConnectionMode,
        namespace: &str,
        database: &str,
    ) -> Result<Self, ConnectionError> {
        let client = match &mode {
            ConnectionMode::Memory => {
                info!("Connecting to SurrealDB in-memory mode");
                let db = Surreal::new::<Mem>(())
                    .await
                    .map_err(|e| ConnectionError::Connection(e.to_string()))?;
                DatabaseClient::Local(db)
            }

            ConnectionMode::Remote { url, username, password } => {
                info!("Connecting to SurrealDB remote at {}", url);
                let db = Surreal::new::<Ws>(url.as_str())
                    .await
                    .map_err(|e| ConnectionError::Connection(e.to_string()))?;

                db.signin(Root {
                    username: username.as_str(),
                    password: password.as_str(),
                })
                .await
                .map_err(|e| ConnectionError::Authentication(e.to_string()))?;

                DatabaseClient::Remote(db)
            }
        };

        match &client {
            DatabaseClient::Local(db) => {
                db.use_ns(namespace).use_db(database).await
                    .map_err(|e| ConnectionError::DatabaseSelection(e.to_string()))?;
            }
            DatabaseClient::Remote(db) => {
                db.use_ns(namespace).use_db(database).await
                    .map_err(|e| ConnectionError::DatabaseSelection(e.to_string()))?;
            }
        }

        debug!("Connected to SurrealDB namespace={} database={}", namespace, database);

        Ok(Self {
            client,
            mode,
            namespace: namespace.to_string(),
            database: database.to_string(),
        })
    }

    /// Get the connection mode
    pub fn mode(&self) -> &ConnectionMode {
        &self.mode
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get the underlying database client
    pub fn client(&self) -> &DatabaseClient {
        &self.client
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.mode, ConnectionMode::Memory)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.mode, ConnectionMode::Remote { .. })
    }

    /// Run one parameterised statement batch; any failed statement fails the call
    pub async fn query(&self, sql: String, bindings: Bindings) -> Result<Response, PersistenceError> {
        let response = match &self.client {
            DatabaseClient::Local(db) => db.query(sql).bind(bindings).await,
            DatabaseClient::Remote(db) => db.query(sql).bind(bindings).await,
        };
        response
            .and_then(Response::check)
            .map_err(|e| PersistenceError::database(BACKEND, e.to_string()))
    }
}

/// Shared connection for SurrealDB
///
/// Thread-safe wrapper for sharing a connection across repositories.
pub type SharedConnection = Arc<SurrealConnection>;

/// Create a shared connection
pub async fn create_shared_connection(mode: ConnectionMode) -> Result<SharedConnection, ConnectionError> {
    Ok(Arc::new(SurrealConnection::new(mode).await?))
}

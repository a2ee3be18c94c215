//! SurrealDB Repository Implementations
//!
//! Persistence backend using SurrealDB. Documents are written with the same
//! shape as the in-memory backend and queried through the shared pipelines
//! rendered to SurrealQL.
//!
//! ## Usage
//!
//! ```ignore
//! use makoto_persistence::surreal::{
//!     create_shared_connection, ConnectionMode, SurrealStoreRepository, SurrealSurveyRepository,
//! };
//!
//! let conn = create_shared_connection(ConnectionMode::Memory).await?;
//! let stores = SurrealStoreRepository::new(conn.clone());
//! let surveys = SurrealSurveyRepository::new(conn);
//! ```

pub mod connection;
pub mod store_repository;
pub mod surql;
pub mod survey_repository;

pub use connection::{
    create_shared_connection, Bindings, ConnectionError, ConnectionMode, DatabaseClient,
    SharedConnection, SurrealConnection, DEFAULT_DATABASE, DEFAULT_NAMESPACE,
};
pub use store_repository::SurrealStoreRepository;
pub use survey_repository::SurrealSurveyRepository;

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    document::decode,
    error::PersistenceError,
    query::{Filter, Pipeline},
};
use connection::BACKEND;

#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

/// Run a read pipeline and decode every row
async fn select<T: DeserializeOwned>(
    conn: &SurrealConnection,
    table: &str,
    pipeline: &Pipeline,
) -> Result<Vec<T>, PersistenceError> {
    let stmt = surql::select(table, pipeline);
    let mut response = conn.query(stmt.sql, stmt.bindings).await?;
    let rows: Vec<Value> = response
        .take(0)
        .map_err(|e| PersistenceError::database(BACKEND, e.to_string()))?;
    rows.into_iter().map(|row| decode(table, row)).collect()
}

async fn count(conn: &SurrealConnection, table: &str, filter: &Filter) -> Result<u64, PersistenceError> {
    let stmt = surql::count(table, filter);
    let mut response = conn.query(stmt.sql, stmt.bindings).await?;
    let rows: Vec<CountRow> = response
        .take(0)
        .map_err(|e| PersistenceError::database(BACKEND, e.to_string()))?;
    // GROUP ALL over no rows yields no rows
    Ok(rows.first().map_or(0, |row| row.total))
}

async fn upsert(conn: &SurrealConnection, table: &str, id: &str, doc: Value) -> Result<(), PersistenceError> {
    let stmt = surql::upsert(table, id, doc);
    conn.query(stmt.sql, stmt.bindings).await?;
    Ok(())
}

async fn remove(conn: &SurrealConnection, table: &str, id: &str) -> Result<(), PersistenceError> {
    let stmt = surql::delete(table, id);
    conn.query(stmt.sql, stmt.bindings).await?;
    Ok(())
}

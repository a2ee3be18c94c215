//! Makoto Club Persistence Layer
//!
//! Infrastructure layer providing repository implementations for the store and
//! survey aggregates. This crate implements the repository interfaces defined
//! in `makoto-domain`.
//!
//! ## Features
//!
//! - **In-Memory Repositories**: JSON documents in a shared in-process store, for testing and development
//! - **SurrealDB Repositories**: Persistent storage with a SurrealDB backend (`surrealdb-backend`)
//!
//! Both backends write the same documents and answer reads through the same
//! query pipeline, so they return identical results.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Infrastructure Layer                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  memory/                    │  surreal/                          │
//! │  ─────────                  │  ────────                          │
//! │  InMemoryStoreRepository    │  SurrealStoreRepository            │
//! │  InMemorySurveyRepository   │  SurrealSurveyRepository           │
//! │  InMemoryDocumentStore      │  surql (pipeline → SurrealQL)      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  document/ (stored shapes)  │  query/ (Match, Lookup, Sort, ...) │
//! └─────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ implements
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                               │
//! │             StoreRepository, SurveyRepository                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use makoto_persistence::{memory, CollectionNames};
//!
//! let (stores, surveys) = memory::repositories(CollectionNames::default());
//! ```

pub mod document;
pub mod error;
pub mod id;
pub mod memory;
pub mod query;

// SurrealDB backend for persistent storage
#[cfg(feature = "surrealdb-backend")]
pub mod surreal;

pub use document::CollectionNames;
pub use error::PersistenceError;
pub use id::ObjectId;

pub use memory::{InMemoryDocumentStore, InMemoryStoreRepository, InMemorySurveyRepository};

#[cfg(feature = "surrealdb-backend")]
pub use surreal::{
    create_shared_connection, ConnectionError, ConnectionMode, SharedConnection,
    SurrealConnection, SurrealStoreRepository, SurrealSurveyRepository,
};

//! In-Memory Repository Implementations
//!
//! Repositories backed by [`InMemoryDocumentStore`]. Aggregates are stored as
//! the same JSON documents the database backend writes, and reads run the
//! same query pipelines. Suitable for testing and development.
//!
//! A store repository and a survey repository must share one document store
//! for the search join to see the surveys.

mod document_store;
mod store_repository;
mod survey_repository;

pub use document_store::InMemoryDocumentStore;
pub use store_repository::InMemoryStoreRepository;
pub use survey_repository::InMemorySurveyRepository;

use std::sync::Arc;

use crate::document::CollectionNames;

/// Repositories over one shared document store
pub fn repositories(
    collections: CollectionNames,
) -> (InMemoryStoreRepository, InMemorySurveyRepository) {
    let docs = Arc::new(InMemoryDocumentStore::new());
    (
        InMemoryStoreRepository::with_collections(Arc::clone(&docs), collections.clone()),
        InMemorySurveyRepository::with_collections(docs, collections),
    )
}

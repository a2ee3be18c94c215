//! Makoto Club service wiring
//!
//! Builds the application services from an [`AppConfig`]. The in-memory
//! backend is always available; the SurrealDB backend needs the
//! `surrealdb-backend` feature.

use std::sync::Arc;

use makoto_application::{RequestContext, StoreService, SurveyNotifier, SurveyService};
use makoto_config::{AppConfig, DatabaseConfig, ServiceConfig};
use makoto_persistence::{memory, CollectionNames, InMemoryStoreRepository, InMemorySurveyRepository};

pub use makoto_application as application;
pub use makoto_config as config;
pub use makoto_domain as domain;
pub use makoto_persistence as persistence;

pub type MemoryStoreService = StoreService<InMemoryStoreRepository>;
pub type MemorySurveyService<N> = SurveyService<InMemorySurveyRepository, InMemoryStoreRepository, N>;

/// Collection names from the database section
pub fn collection_names(config: &DatabaseConfig) -> CollectionNames {
    CollectionNames::new(&config.store_collection, &config.survey_collection)
}

/// A fresh request context carrying the configured deadline
pub fn request_context(config: &ServiceConfig) -> RequestContext {
    RequestContext::with_timeout(config.request_timeout())
}

/// Services over one shared in-memory document store
///
/// `database.mode` is not consulted.
pub fn memory_services<N>(config: &AppConfig, notifier: Arc<N>) -> (MemoryStoreService, MemorySurveyService<N>)
where
    N: SurveyNotifier + 'static,
{
    let (stores, surveys) = memory::repositories(collection_names(&config.database));
    let stores = Arc::new(stores);
    let survey_service = SurveyService::new(Arc::new(surveys), Arc::clone(&stores), notifier)
        .with_notify_timeout(config.service.notify_timeout());
    (StoreService::new(stores), survey_service)
}

#[cfg(feature = "surrealdb-backend")]
pub mod surreal {
    //! SurrealDB wiring

    use std::sync::Arc;

    use makoto_application::{StoreService, SurveyNotifier, SurveyService};
    use makoto_config::{AppConfig, DatabaseConfig, DatabaseMode};
    use makoto_persistence::{
        ConnectionError, ConnectionMode, SurrealConnection, SurrealStoreRepository,
        SurrealSurveyRepository,
    };

    use super::collection_names;

    pub type SurrealStoreService = StoreService<SurrealStoreRepository>;
    pub type SurrealSurveyService<N> = SurveyService<SurrealSurveyRepository, SurrealStoreRepository, N>;

    pub fn connection_mode(config: &DatabaseConfig) -> ConnectionMode {
        match config.mode {
            DatabaseMode::Memory => ConnectionMode::Memory,
            DatabaseMode::Remote => ConnectionMode::Remote {
                url: config.url.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
            },
        }
    }

    /// Connect and build services over one shared connection
    pub async fn services<N>(
        config: &AppConfig,
        notifier: Arc<N>,
    ) -> Result<(SurrealStoreService, SurrealSurveyService<N>), ConnectionError>
    where
        N: SurveyNotifier + 'static,
    {
        let db = &config.database;
        let connection = Arc::new(
            SurrealConnection::with_names(connection_mode(db), &db.namespace, &db.database).await?,
        );
        let collections = collection_names(db);
        let stores = Arc::new(SurrealStoreRepository::with_collections(
            Arc::clone(&connection),
            collections.clone(),
        ));
        let surveys = SurrealSurveyRepository::with_collections(connection, collections);
        let survey_service = SurveyService::new(Arc::new(surveys), Arc::clone(&stores), notifier)
            .with_notify_timeout(config.service.notify_timeout());
        Ok((StoreService::new(stores), survey_service))
    }
}

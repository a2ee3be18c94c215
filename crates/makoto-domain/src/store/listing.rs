use super::Store;

/// Figures derived at query time from a store's live surveys
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StoreStats {
    /// Number of non-deleted surveys
    pub survey_count: u64,
    /// Sum of the surveys' helpful counters
    pub helpful_count: u64,
    /// Mean of the surveys' average earning; 0 without surveys
    pub average_earning: f64,
}

/// One row of a store search result
#[derive(Debug, Clone, PartialEq)]
pub struct StoreListing {
    pub store: Store,
    pub stats: StoreStats,
}

impl StoreListing {
    pub fn new(store: Store, stats: StoreStats) -> Self {
        Self { store, stats }
    }
}

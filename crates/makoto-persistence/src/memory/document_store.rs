//! In-process JSON document store
//!
//! Holds documents as `serde_json::Value` keyed by collection and `_id`, and
//! executes [`Pipeline`]s the same way the database backend does.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::query::{Filter, LookupStats, Pipeline, Stage};

type Collection = BTreeMap<String, Value>;

/// Thread-safe document store shared by the in-memory repositories
///
/// Reads take a shared lock for the whole pipeline so a join never observes a
/// half-applied write.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the document stored under `id`
    pub fn upsert(&self, collection: &str, id: &str, doc: Value) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Remove a document; returns whether it existed
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        self.collections
            .write()
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some())
    }

    /// Number of documents matching `filter`
    pub fn count(&self, collection: &str, filter: &Filter) -> u64 {
        let collections = self.collections.read();
        collections.get(collection).map_or(0, |docs| {
            docs.values().filter(|doc| filter.matches(doc)).count() as u64
        })
    }

    /// Number of documents in a collection, deleted ones included
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Collection::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Drop every document in a collection
    pub fn clear(&self, collection: &str) {
        self.collections.write().remove(collection);
    }

    /// Run `pipeline` over `collection`
    pub fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Vec<Value> {
        let collections = self.collections.read();
        let mut rows: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();

        for stage in pipeline.stages() {
            match stage {
                Stage::Match(filter) => rows.retain(|doc| filter.matches(doc)),
                Stage::LookupStats(lookup) => {
                    let foreign = collections.get(&lookup.from);
                    for row in &mut rows {
                        attach_stats(row, lookup, foreign);
                    }
                }
                // stable, so ties keep collection order
                Stage::Sort(spec) => rows.sort_by(|a, b| spec.compare(a, b)),
                Stage::Skip(n) => {
                    let n = usize::try_from(*n).unwrap_or(usize::MAX).min(rows.len());
                    rows.drain(..n);
                }
                Stage::Limit(n) => rows.truncate(usize::try_from(*n).unwrap_or(usize::MAX)),
            }
        }
        rows
    }
}

fn attach_stats(row: &mut Value, lookup: &LookupStats, foreign: Option<&Collection>) {
    let key = row.get(lookup.local_field).cloned();

    let mut count = 0u64;
    let mut sum = 0u64;
    let mut mean_total = 0f64;
    if let (Some(key), Some(docs)) = (key, foreign) {
        for doc in docs.values() {
            if doc.get(lookup.foreign_field) != Some(&key) || !lookup.foreign_filter.matches(doc) {
                continue;
            }
            count += 1;
            sum += doc.get(lookup.sum_field).and_then(Value::as_u64).unwrap_or(0);
            mean_total += doc.get(lookup.mean_field).and_then(Value::as_f64).unwrap_or(0.0);
        }
    }
    let mean = if count == 0 { 0.0 } else { mean_total / count as f64 };

    if let Value::Object(fields) = row {
        insert(fields, lookup.count_as, Value::from(count));
        insert(fields, lookup.sum_as, Value::from(sum));
        insert(fields, lookup.mean_as, Value::from(mean));
    }
}

fn insert(fields: &mut Map<String, Value>, key: &str, value: Value) {
    fields.insert(key.to_string(), value);
}

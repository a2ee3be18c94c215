//! Rendering of [`Pipeline`]s to SurrealQL
//!
//! Values never appear in the statement text; every literal is bound as a
//! `$pN` parameter and tables are addressed through `type::table`.
//!
//! A pipeline with a stats lookup renders as two nested selects: the inner one
//! attaches the joined rows as `surveys`, the outer one reduces them to the
//! computed fields and applies ordering and paging.

use serde_json::Value;

use super::connection::Bindings;
use crate::query::{Condition, Direction, Filter, LookupStats, Pipeline, SortSpec, Stage};

/// Alias of the joined rows inside a lookup
const JOINED: &str = "joined";

/// A statement plus its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub bindings: Bindings,
}

#[derive(Default)]
struct Binder {
    bindings: Bindings,
}

impl Binder {
    fn bind(&mut self, value: impl Into<Value>) -> String {
        let name = format!("p{}", self.bindings.len());
        self.bindings.insert(name.clone(), value.into());
        format!("${name}")
    }

    fn bind_named(&mut self, name: &str, value: impl Into<Value>) -> String {
        self.bindings.insert(name.to_string(), value.into());
        format!("${name}")
    }
}

fn ident(field: &str) -> String {
    format!("`{field}`")
}

fn render_condition(condition: &Condition, binder: &mut Binder) -> String {
    match condition {
        Condition::Eq { field, value } => {
            format!("{} = {}", ident(field), binder.bind(value.clone()))
        }
        Condition::Missing { field } => format!("{} IS NONE", ident(field)),
        Condition::ContainsIgnoreCase { fields, needle } => {
            let needle = binder.bind(needle.as_str());
            let any: Vec<String> = fields
                .iter()
                .map(|f| format!("string::lowercase({} ?? '') CONTAINS {}", ident(f), needle))
                .collect();
            format!("({})", any.join(" OR "))
        }
    }
}

fn render_where(filter: &Filter, binder: &mut Binder) -> String {
    if filter.conditions().is_empty() {
        return String::new();
    }
    let clauses: Vec<String> = filter
        .conditions()
        .iter()
        .map(|c| render_condition(c, binder))
        .collect();
    format!(" WHERE {}", clauses.join(" AND "))
}

fn render_order(spec: &SortSpec) -> String {
    if spec.keys().is_empty() {
        return String::new();
    }
    let keys: Vec<String> = spec
        .keys()
        .iter()
        .map(|(field, direction)| {
            let dir = match direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            format!("{} {}", ident(field), dir)
        })
        .collect();
    format!(" ORDER BY {}", keys.join(", "))
}

fn render_joined(lookup: &LookupStats, binder: &mut Binder) -> String {
    let from = binder.bind_named("from", lookup.from.as_str());
    let mut clauses = vec![format!(
        "{} = $parent.{}",
        ident(lookup.foreign_field),
        ident(lookup.local_field)
    )];
    clauses.extend(
        lookup
            .foreign_filter
            .conditions()
            .iter()
            .map(|c| render_condition(c, binder)),
    );
    format!(
        "(SELECT {sum} ?? 0 AS {sum}, {mean} ?? 0 AS {mean} FROM type::table({from}) WHERE {clauses}) AS {JOINED}",
        sum = ident(lookup.sum_field),
        mean = ident(lookup.mean_field),
        clauses = clauses.join(" AND "),
    )
}

fn render_stats(lookup: &LookupStats) -> String {
    format!(
        "array::len({JOINED}) AS {count}, math::sum({JOINED}.{sum_in}) AS {sum}, \
         (IF array::len({JOINED}) > 0 THEN math::mean({JOINED}.{mean_in}) ELSE 0 END) AS {mean}",
        count = ident(lookup.count_as),
        sum_in = ident(lookup.sum_field),
        sum = ident(lookup.sum_as),
        mean_in = ident(lookup.mean_field),
        mean = ident(lookup.mean_as),
    )
}

/// Render a read pipeline over `table`
pub fn select(table: &str, pipeline: &Pipeline) -> Statement {
    let mut binder = Binder::default();
    let tb = binder.bind_named("tb", table);

    let mut filter = Filter::all();
    let mut lookup = None;
    let mut order = String::new();
    let mut skip = None;
    let mut limit = None;
    for stage in pipeline.stages() {
        match stage {
            Stage::Match(f) => filter = f.clone(),
            Stage::LookupStats(l) => lookup = Some(l),
            Stage::Sort(spec) => order = render_order(spec),
            Stage::Skip(n) => skip = Some(*n),
            Stage::Limit(n) => limit = Some(*n),
        }
    }

    let conditions = render_where(&filter, &mut binder);
    let mut sql = match lookup {
        None => format!("SELECT * OMIT id FROM type::table({tb}){conditions}"),
        Some(lookup) => {
            let joined = render_joined(lookup, &mut binder);
            let stats = render_stats(lookup);
            format!(
                "SELECT *, {stats} OMIT {JOINED} FROM \
                 (SELECT *, {joined} OMIT id FROM type::table({tb}){conditions})"
            )
        }
    };
    sql.push_str(&order);
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }
    if let Some(n) = skip {
        sql.push_str(&format!(" START {n}"));
    }

    Statement {
        sql,
        bindings: binder.bindings,
    }
}

/// Render a count of the rows matching `filter`
pub fn count(table: &str, filter: &Filter) -> Statement {
    let mut binder = Binder::default();
    let tb = binder.bind_named("tb", table);
    let conditions = render_where(filter, &mut binder);
    Statement {
        sql: format!("SELECT count() AS total FROM type::table({tb}){conditions} GROUP ALL"),
        bindings: binder.bindings,
    }
}

/// Render a full-document upsert keyed by `id`
pub fn upsert(table: &str, id: &str, doc: Value) -> Statement {
    let mut binder = Binder::default();
    let tb = binder.bind_named("tb", table);
    let id = binder.bind_named("id", id);
    let doc = binder.bind_named("doc", doc);
    Statement {
        sql: format!("UPSERT type::thing({tb}, {id}) CONTENT {doc} RETURN NONE"),
        bindings: binder.bindings,
    }
}

pub fn delete(table: &str, id: &str) -> Statement {
    let mut binder = Binder::default();
    let tb = binder.bind_named("tb", table);
    let id = binder.bind_named("id", id);
    Statement {
        sql: format!("DELETE type::thing({tb}, {id}) RETURN NONE"),
        bindings: binder.bindings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{self, survey_stats_lookup};
    use makoto_domain::{
        store::StoreSearchFilter,
        value_objects::{Pagination, Prefecture, SortKey},
    };
    use serde_json::json;

    #[test]
    fn test_plain_select_binds_values() {
        let stmt = select("stores", &query::by_id("65a1b2c3d4e5f60718293a4b"));
        assert_eq!(
            stmt.sql,
            "SELECT * OMIT id FROM type::table($tb) WHERE `deletedAt` IS NONE AND `_id` = $p1 LIMIT 1"
        );
        assert_eq!(stmt.bindings["tb"], json!("stores"));
        assert_eq!(stmt.bindings["p1"], json!("65a1b2c3d4e5f60718293a4b"));
    }

    #[test]
    fn test_keyword_renders_case_insensitive_or() {
        let filter = query::store_filter(&StoreSearchFilter::new().with_keyword("Club"));
        let stmt = count("stores", &filter);
        assert!(stmt.sql.contains(
            "(string::lowercase(`name` ?? '') CONTAINS $p1 OR string::lowercase(`branchName` ?? '') CONTAINS $p1)"
        ));
        assert!(stmt.sql.ends_with("GROUP ALL"));
        assert_eq!(stmt.bindings["p1"], json!("club"));
    }

    #[test]
    fn test_search_renders_join_sort_and_paging() {
        let pipeline = query::store_search_pipeline(
            &StoreSearchFilter::new().with_prefecture(Prefecture::TOKYO),
            SortKey::EARNING,
            Pagination::new(2, 10),
            "surveys",
        );
        let stmt = select("stores", &pipeline);

        assert!(stmt.sql.starts_with("SELECT *, array::len(joined) AS `surveyCount`"));
        assert!(stmt.sql.contains("FROM type::table($from) WHERE `storeId` = $parent.`_id` AND `deletedAt` IS NONE"));
        assert!(stmt.sql.ends_with("ORDER BY `averageEarningAgg` DESC, `updatedAt` DESC LIMIT 10 START 10"));
        assert_eq!(stmt.bindings["from"], json!("surveys"));
        assert_eq!(stmt.bindings["p1"], json!("東京都"));
    }

    #[test]
    fn test_lookup_without_match_still_binds_table() {
        let pipeline = Pipeline::default().lookup_stats(survey_stats_lookup("reviews"));
        let stmt = select("shops", &pipeline);
        assert_eq!(stmt.bindings["tb"], json!("shops"));
        assert_eq!(stmt.bindings["from"], json!("reviews"));
        assert!(!stmt.sql.contains("LIMIT"));
    }

    #[test]
    fn test_write_statements() {
        let stmt = upsert("stores", "abc", json!({"_id": "abc"}));
        assert_eq!(stmt.sql, "UPSERT type::thing($tb, $id) CONTENT $doc RETURN NONE");
        assert_eq!(stmt.bindings["doc"], json!({"_id": "abc"}));

        let stmt = delete("stores", "abc");
        assert_eq!(stmt.sql, "DELETE type::thing($tb, $id) RETURN NONE");
    }
}

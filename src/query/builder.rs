use super::condition::build_condition;
use super::join::{join_clause, JoinConditions};
use crate::client::SolrClient;
use crate::error::SolrError;
use crate::types::{Clause, ConditionValue, Connector, Operator, ReturnMode};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Block-join selector for root documents of a nested tree.
pub const PARENT_SELECTOR: &str = "{!parent which='*:* -_nest_path_:*' score=max}";

/// Result of a read: a decoded response, or the reason there is none.
///
/// `Failed` is kept apart from an empty `Found` so callers can tell
/// "no matches" from "Solr unreachable".
#[derive(Debug)]
pub enum QueryOutcome {
    Found(Value),
    Failed(SolrError),
}

impl QueryOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, QueryOutcome::Found(_))
    }

    pub fn error(&self) -> Option<&SolrError> {
        match self {
            QueryOutcome::Failed(e) => Some(e),
            QueryOutcome::Found(_) => None,
        }
    }

    /// Documents under `response.docs`; empty on failure.
    pub fn docs(&self) -> Vec<Value> {
        match self {
            QueryOutcome::Found(v) => v
                .pointer("/response/docs")
                .and_then(|d| d.as_array())
                .cloned()
                .unwrap_or_default(),
            QueryOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn num_found(&self) -> u64 {
        match self {
            QueryOutcome::Found(v) => v
                .pointer("/response/numFound")
                .and_then(|n| n.as_u64())
                .unwrap_or(0),
            QueryOutcome::Failed(_) => 0,
        }
    }

    /// Fail-soft view: the response body, or an empty object on failure.
    pub fn into_value(self) -> Value {
        match self {
            QueryOutcome::Found(v) => v,
            QueryOutcome::Failed(_) => Value::Object(Map::new()),
        }
    }

    pub fn into_result(self) -> crate::Result<Value> {
        match self {
            QueryOutcome::Found(v) => Ok(v),
            QueryOutcome::Failed(e) => Err(e),
        }
    }
}

/// Documents plus `facet_counts.facet_fields`, both empty on failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetedResults {
    pub results: Vec<Value>,
    pub facets: Map<String, Value>,
}

/// Fluent builder for one `/select` request against a single core.
///
/// Filter clauses go to `fq`, search clauses to `q`. Both keep insertion
/// order; the connector of the first clause is never emitted.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    client: SolrClient,
    core: String,
    search_clauses: Vec<Clause>,
    filter_clauses: Vec<Clause>,
    sort: String,
    query_operator: Connector,
    facet: bool,
    facet_fields: Vec<String>,
    start: u64,
    rows: u64,
    fields: String,
    return_mode: ReturnMode,
}

impl QueryBuilder {
    pub fn new(client: SolrClient, core: impl Into<String>) -> Self {
        Self {
            client,
            core: core.into(),
            search_clauses: Vec::new(),
            filter_clauses: Vec::new(),
            sort: String::new(),
            query_operator: Connector::And,
            facet: false,
            facet_fields: Vec::new(),
            start: 0,
            rows: 10,
            fields: "*".to_string(),
            return_mode: ReturnMode::Unset,
        }
    }

    pub fn core(&self) -> &str {
        &self.core
    }

    pub fn return_mode(&self) -> ReturnMode {
        self.return_mode
    }

    pub fn filter_clauses(&self) -> &[Clause] {
        &self.filter_clauses
    }

    pub fn search_clauses(&self) -> &[Clause] {
        &self.search_clauses
    }

    // ── filter query (fq) ──────────────────────────────────────────────

    pub fn and_where(
        mut self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        let condition = build_condition(field, &operator.into(), &value.into(), boost);
        self.filter_clauses.push(Clause::and(condition));
        self
    }

    pub fn or_where(
        mut self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        let condition = build_condition(field, &operator.into(), &value.into(), boost);
        self.filter_clauses.push(Clause::or(condition));
        self
    }

    pub fn filter(
        self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        self.and_where(field, operator, value, None)
    }

    pub fn where_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.and_where(field, Operator::In, ConditionValue::Many(values), None)
    }

    /// Condition followed by a bare parent selector, as two AND-ed clauses.
    pub fn where_parent(
        mut self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        let condition = build_condition(field, &operator.into(), &value.into(), boost);
        self.filter_clauses.push(Clause::and(condition));
        self.filter_clauses.push(Clause::and(PARENT_SELECTOR));
        self
    }

    /// Parents whose children match the condition.
    pub fn where_child(
        mut self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        let condition = build_condition(field, &operator.into(), &value.into(), boost);
        self.filter_clauses
            .push(Clause::and(format!("{}{}", PARENT_SELECTOR, condition)));
        self
    }

    /// Cross-core join; the closure adds the conditions evaluated on `from_index`.
    pub fn where_join<F>(
        mut self,
        from_index: &str,
        from_field: &str,
        to_field: &str,
        build: F,
    ) -> Self
    where
        F: FnOnce(&mut JoinConditions),
    {
        let mut conditions = JoinConditions::default();
        build(&mut conditions);
        self.filter_clauses.push(Clause::and(join_clause(
            from_index,
            from_field,
            to_field,
            &conditions.render(),
        )));
        self
    }

    // ── main query (q) ─────────────────────────────────────────────────

    pub fn search(
        mut self,
        field: &str,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        let condition = build_condition(field, &operator.into(), &value.into(), boost);
        self.search_clauses.push(Clause::and(condition));
        self
    }

    pub fn or_search(mut self, field: &str, value: impl Into<ConditionValue>, boost: Option<f64>) -> Self {
        let condition = build_condition(field, &Operator::Eq, &value.into(), boost);
        self.search_clauses.push(Clause::or(condition));
        self
    }

    // ── paging, projection, faceting ───────────────────────────────────

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    pub fn rows(mut self, rows: u64) -> Self {
        self.rows = rows;
        self
    }

    pub fn fl<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fields = fields
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self
    }

    pub fn query_operator(mut self, operator: Connector) -> Self {
        self.query_operator = operator;
        self
    }

    pub fn facet(mut self, enable: bool) -> Self {
        self.facet = enable;
        self
    }

    pub fn facet_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn return_only_parent(mut self) -> Self {
        self.return_mode = ReturnMode::Parent;
        self
    }

    pub fn return_only_child(mut self) -> Self {
        self.return_mode = ReturnMode::Child;
        self
    }

    pub fn return_both_parent_and_child(mut self) -> Self {
        self.return_mode = ReturnMode::Both;
        self.fields = "*,[child]".to_string();
        self
    }

    // ── assembly ───────────────────────────────────────────────────────

    /// `fq` value, or `None` when no filter clause was added.
    pub fn filter_query_string(&self) -> Option<String> {
        if self.filter_clauses.is_empty() {
            return None;
        }
        Some(join_clauses(&self.filter_clauses))
    }

    /// `q` value for the current search clauses (ignores the return mode).
    pub fn main_query_string(&self) -> String {
        main_query(&self.search_clauses)
    }

    /// Full `/select` parameter map, in the order it is sent.
    pub fn build_params(&self) -> IndexMap<String, String> {
        let mut params = IndexMap::new();
        params.insert("q.op".to_string(), self.query_operator.to_string());
        if !self.sort.is_empty() {
            params.insert("sort".to_string(), self.sort.clone());
        }
        params.insert("start".to_string(), self.start.to_string());
        params.insert("rows".to_string(), self.rows.to_string());

        let mut fields = self.fields.clone();
        let mut search = self.search_clauses.clone();
        match self.return_mode {
            ReturnMode::Parent | ReturnMode::Both => search.push(Clause::and(PARENT_SELECTOR)),
            ReturnMode::Child => fields.push_str(",[child]"),
            ReturnMode::Unset => {}
        }
        params.insert("fl".to_string(), fields);
        params.insert("q".to_string(), main_query(&search));

        if let Some(fq) = self.filter_query_string() {
            params.insert("fq".to_string(), fq);
        }

        if self.facet {
            params.insert("facet".to_string(), "true".to_string());
            params.insert("facet.field".to_string(), self.facet_fields.join(","));
        }

        params
    }

    // ── execution ──────────────────────────────────────────────────────

    /// Run the query against `<core>/select`.
    pub async fn get(&self) -> QueryOutcome {
        let params = self.build_params();
        match self
            .client
            .get_json(&format!("{}/select", self.core), &params)
            .await
        {
            Ok(value) => QueryOutcome::Found(value),
            Err(e) => {
                tracing::error!(core = %self.core, error = %e, "Solr select failed");
                QueryOutcome::Failed(e)
            }
        }
    }

    /// Run the query with faceting forced on and split docs from facet counts.
    pub async fn get_with_facets(&self) -> FacetedResults {
        let outcome = self.clone().facet(true).get().await;
        let facets = match &outcome {
            QueryOutcome::Found(v) => v
                .pointer("/facet_counts/facet_fields")
                .and_then(|f| f.as_object())
                .cloned()
                .unwrap_or_default(),
            QueryOutcome::Failed(_) => Map::new(),
        };
        FacetedResults {
            results: outcome.docs(),
            facets,
        }
    }

    /// Run the query, then fetch documents of `core` whose `to_id` matches the
    /// `from_id` of each hit and attach them under the key `core`.
    ///
    /// Returns `None` if either request fails.
    pub async fn get_with_joined_documents(
        &self,
        core: &str,
        from_id: &str,
        to_id: &str,
    ) -> Option<Vec<Value>> {
        let docs = match self.get().await {
            QueryOutcome::Found(v) => v.pointer("/response/docs")?.as_array()?.clone(),
            QueryOutcome::Failed(_) => return None,
        };

        let mut ids: Vec<String> = Vec::new();
        for doc in &docs {
            if let Some(id) = doc.get(from_id).and_then(id_string) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        if ids.is_empty() {
            return Some(docs);
        }

        let joined_query = [
            ("q", format!("{}:({})", to_id, ids.join(" "))),
            ("rows", ids.len().to_string()),
        ];
        let joined = match self
            .client
            .get_json(&format!("{}/select", core), &joined_query)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(core = %core, error = %e, "Solr joined select failed");
                return None;
            }
        };

        let mut by_id: HashMap<String, Value> = HashMap::new();
        for doc in joined.pointer("/response/docs")?.as_array()? {
            if let Some(id) = doc.get(to_id).and_then(id_string) {
                by_id.insert(id, doc.clone());
            }
        }

        let combined = docs
            .into_iter()
            .map(|mut doc| {
                let attached = doc
                    .get(from_id)
                    .and_then(id_string)
                    .and_then(|id| by_id.get(&id).cloned())
                    .unwrap_or(Value::Null);
                if let Value::Object(map) = &mut doc {
                    map.insert(core.to_string(), attached);
                }
                doc
            })
            .collect();
        Some(combined)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn join_clauses(clauses: &[Clause]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(clauses.len() * 2);
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            parts.push(clause.connector.as_str());
        }
        parts.push(&clause.condition);
    }
    parts.join(" ")
}

fn main_query(clauses: &[Clause]) -> String {
    if clauses.is_empty() {
        return "*:*".to_string();
    }
    format!("({})", join_clauses(clauses))
}

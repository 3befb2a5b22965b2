use super::condition::Condition;
use crate::types::{ConditionValue, Operator};

/// Collects the conditions of a cross-core `{!join}` filter.
///
/// Handed to the closure passed to
/// [`QueryBuilder::where_join`](super::QueryBuilder::where_join).
#[derive(Debug, Default, Clone)]
pub struct JoinConditions {
    conditions: Vec<Condition>,
}

impl JoinConditions {
    pub fn and_where(
        &mut self,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> &mut Self {
        self.conditions
            .push(Condition::new(field, operator, value, boost));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Rendered conditions joined with ` AND `.
    pub fn render(&self) -> String {
        self.conditions
            .iter()
            .map(Condition::render)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// `{!join from=<from_field> fromIndex=<from_index> to=<to_field> v='(<conditions>)'}`
pub fn join_clause(from_index: &str, from_field: &str, to_field: &str, conditions: &str) -> String {
    format!(
        "{{!join from={} fromIndex={} to={} v='({})'}}",
        from_field, from_index, to_field, conditions
    )
}

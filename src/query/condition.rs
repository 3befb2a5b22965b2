//! Rendering of `(field, operator, value, boost)` into Solr field-query syntax.
//!
//! | operator | fragment |
//! |---|---|
//! | `=` | `"v"` |
//! | `!=` | `[* TO *] -"v"` |
//! | `<`, `<=` | `[* TO v]` |
//! | `>`, `>=` | `[v TO *]` |
//! | `like` | `*v*` |
//! | `in` | `("a" OR "b")` |
//!
//! Unknown operators render like `=`. `<=`/`>=` share the brackets of `<`/`>`;
//! existing indexes and fixtures depend on that output, so it is kept as is.

use crate::types::{ConditionValue, Operator};

/// Backslash-escape `\`, `"`, `'` and NUL so the value can sit inside a
/// quoted query term.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_value(value))
}

/// A list value used with a scalar operator collapses to its items joined by
/// spaces.
fn scalar(value: &ConditionValue) -> String {
    match value {
        ConditionValue::Single(s) => s.clone(),
        ConditionValue::Many(items) => items.join(" "),
    }
}

/// Right-hand side of `field:<...>` without the field or boost.
pub fn format_condition(operator: &Operator, value: &ConditionValue) -> String {
    match operator {
        Operator::NotEq => format!("[* TO *] -{}", quoted(&scalar(value))),
        Operator::Lt | Operator::Lte => format!("[* TO {}]", escape_value(&scalar(value))),
        Operator::Gt | Operator::Gte => format!("[{} TO *]", escape_value(&scalar(value))),
        Operator::Like => format!("*{}*", escape_value(&scalar(value))),
        Operator::In => match value {
            ConditionValue::Many(items) => {
                let parts: Vec<String> = items.iter().map(|v| quoted(v)).collect();
                format!("({})", parts.join(" OR "))
            }
            ConditionValue::Single(s) => quoted(s),
        },
        Operator::Eq | Operator::Other(_) => quoted(&scalar(value)),
    }
}

/// `field:<fragment>` plus `^boost` when a boost is given.
pub fn build_condition(
    field: &str,
    operator: &Operator,
    value: &ConditionValue,
    boost: Option<f64>,
) -> String {
    let mut condition = format!("{}:{}", field, format_condition(operator, value));
    if let Some(boost) = boost {
        condition.push('^');
        condition.push_str(&boost.to_string());
    }
    condition
}

/// An unrendered condition, as collected by join callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
    pub boost: Option<f64>,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<ConditionValue>,
        boost: Option<f64>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            boost,
        }
    }

    pub fn render(&self) -> String {
        build_condition(&self.field, &self.operator, &self.value, self.boost)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a single query condition.
///
/// Parsed from the loose strings callers pass around (`"="`, `"like"`, ...).
/// Anything unrecognised becomes [`Operator::Other`], which renders like `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
    In,
    Other(String),
}

impl Operator {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Lte,
            ">=" => Operator::Gte,
            "like" => Operator::Like,
            "in" => Operator::In,
            _ => Operator::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::Other(s) => s,
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        Operator::parse(raw)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition: one value or a list (for `in`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Single(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Single(s)
    }
}

impl From<&String> for ConditionValue {
    fn from(s: &String) -> Self {
        ConditionValue::Single(s.clone())
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Single(n.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Single(n.to_string())
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(v: Vec<String>) -> Self {
        ConditionValue::Many(v)
    }
}

impl From<Vec<&str>> for ConditionValue {
    fn from(v: Vec<&str>) -> Self {
        ConditionValue::Many(v.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for ConditionValue {
    fn from(v: &[&str]) -> Self {
        ConditionValue::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Boolean connector placed in front of every clause except the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered condition and the connector that joins it to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub condition: String,
    pub connector: Connector,
}

impl Clause {
    pub fn and(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            connector: Connector::And,
        }
    }

    pub fn or(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            connector: Connector::Or,
        }
    }
}

/// Which side of a nested (block-join) document tree a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMode {
    #[default]
    Unset,
    Parent,
    Child,
    Both,
}

/// `responseHeader` block present on every Solr JSON response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub status: i64,
    #[serde(rename = "QTime", default)]
    pub qtime: Option<i64>,
}

/// `error` block Solr attaches to failed requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolrErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Envelope used to inspect the status of any admin or schema response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolrEnvelope {
    #[serde(rename = "responseHeader", default)]
    pub response_header: Option<ResponseHeader>,
    #[serde(default)]
    pub error: Option<SolrErrorBody>,
}

impl SolrEnvelope {
    pub fn is_ok(&self) -> bool {
        self.response_header
            .as_ref()
            .is_some_and(|h| h.status == 0)
    }

    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.msg.clone())
            .unwrap_or_else(|| "Unknown error occurred.".to_string())
    }
}

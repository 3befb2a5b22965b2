use crate::error::{Result, SolrError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn default_field_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

/// One Solr schema field, in the shape the Schema API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub indexed: bool,
    #[serde(default = "default_true")]
    pub stored: bool,
    #[serde(rename = "multiValued", default)]
    pub multi_valued: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
            indexed: true,
            stored: true,
            multi_valued: false,
        }
    }

    /// Body of an `add-field` / `replace-field` command.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "type": self.field_type,
            "stored": self.stored,
            "indexed": self.indexed,
            "required": self.required,
            "multiValued": self.multi_valued,
        })
    }

    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(payload.clone())?)
    }
}

/// Parses `name:type[:flag,flag...]`.
///
/// Flags: `required`, `indexed`, `stored`, `multivalued`, and `!indexed`,
/// `!stored` to switch the defaults off. `type` may be omitted (`name`) and
/// defaults to `string`.
impl FromStr for FieldSpec {
    type Err = SolrError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(SolrError::Config(format!("Field spec '{}' has no name", s)));
        }

        let field_type = parts
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("string");
        let mut spec = FieldSpec::new(name, field_type);

        if let Some(flags) = parts.next() {
            for flag in flags.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match flag.to_ascii_lowercase().as_str() {
                    "required" => spec.required = true,
                    "indexed" => spec.indexed = true,
                    "stored" => spec.stored = true,
                    "multivalued" => spec.multi_valued = true,
                    "!indexed" => spec.indexed = false,
                    "!stored" => spec.stored = false,
                    other => {
                        return Err(SolrError::Config(format!(
                            "Unknown flag '{}' in field spec '{}'",
                            other, s
                        )))
                    }
                }
            }
        }

        Ok(spec)
    }
}

/// Fluent collector of [`FieldSpec`]s.
///
/// Every `name` call starts a new field; the setters that follow apply to it.
/// Setters called before the first `name` have nothing to apply to and are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        SchemaBuilder { fields: Vec::new() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldSpec::new(name, default_field_type()));
        self
    }

    pub fn field_type(self, field_type: impl Into<String>) -> Self {
        let field_type = field_type.into();
        self.with_current(|f| f.field_type = field_type)
    }

    pub fn required(self, required: bool) -> Self {
        self.with_current(|f| f.required = required)
    }

    pub fn indexed(self, indexed: bool) -> Self {
        self.with_current(|f| f.indexed = indexed)
    }

    pub fn stored(self, stored: bool) -> Self {
        self.with_current(|f| f.stored = stored)
    }

    pub fn multi_valued(self, multi_valued: bool) -> Self {
        self.with_current(|f| f.multi_valued = multi_valued)
    }

    /// Append a fully built field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldSpec> {
        self.fields
    }

    fn with_current(mut self, apply: impl FnOnce(&mut FieldSpec)) -> Self {
        if let Some(current) = self.fields.last_mut() {
            apply(current);
        }
        self
    }
}

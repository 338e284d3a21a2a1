use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::schema::validator::{is_truthy, validate_schema, Validation};

/// Fields the model has no slot for are kept in `extra` on every level, so
/// an imported schema is exported with everything it came in with.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Schema {
    pub databases: Vec<DatabaseSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DatabaseSchema {
    pub name: String,
    pub tables: Vec<TableSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flags read from JSON follow the validator's truthiness, so `1` or `"yes"`
/// load as `true`. `isNullable` only counts when it is a real boolean.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, deserialize_with = "truthy_flag", skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(default, deserialize_with = "truthy_flag", skip_serializing_if = "Option::is_none")]
    pub is_foreign_key: Option<bool>,
    #[serde(default, deserialize_with = "reference_text", skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(default, deserialize_with = "strict_flag", skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn truthy_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| is_truthy(Some(&v))))
}

fn strict_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_bool()))
}

fn reference_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        other if is_truthy(Some(&other)) => Some(other.to_string()),
        _ => None,
    }))
}

/// A table located by its database, as listed in the schema browser.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TableName {
    pub database: String,
    pub table: String,
    pub full_name: String,
}

impl Schema {
    pub fn new(databases: Vec<DatabaseSchema>) -> Self {
        Self {
            databases,
            ..Default::default()
        }
    }

    /// Runs the validator rules against this value.
    pub fn validate(&self) -> Validation {
        match serde_json::to_value(self) {
            Ok(value) => validate_schema(&value),
            Err(e) => Validation::invalid(e.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().valid
    }
}

impl DatabaseSchema {
    pub fn new(name: &str, tables: Vec<TableSchema>) -> Self {
        Self {
            name: name.to_string(),
            tables,
            ..Default::default()
        }
    }
}

impl TableSchema {
    pub fn new(name: &str, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            ..Default::default()
        }
    }
}

impl ColumnSchema {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            ..Default::default()
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = Some(true);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.is_nullable = Some(nullable);
        self
    }

    pub fn foreign_key(mut self, references: &str) -> Self {
        self.is_foreign_key = Some(true);
        self.references = Some(references.to_string());
        self
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary.unwrap_or(false)
    }

    pub fn is_foreign_key(&self) -> bool {
        self.is_foreign_key.unwrap_or(false)
    }

    /// Table named by `references`, i.e. the text before `(` in `users(id)`.
    pub fn referenced_table(&self) -> Option<&str> {
        if !self.is_foreign_key() {
            return None;
        }
        self.references
            .as_deref()
            .filter(|r| !r.is_empty())
            .and_then(|r| r.split('(').next())
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, WorkbenchError};

/// Outcome of a validation run. `message` names the first broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        Err(WorkbenchError::Validation(
            self.message.unwrap_or_else(|| "Invalid schema".to_string()),
        ))
    }
}

type Check = std::result::Result<(), String>;

/// Validates an untyped JSON candidate against the schema rules.
///
/// Rules run database by database, then table by table, then column by
/// column, and the first failure is reported. Within one entry the order is
/// shape, name, uniqueness, then the required children or values.
pub fn validate_schema(candidate: &Value) -> Validation {
    match check_schema(candidate) {
        Ok(()) => Validation::ok(),
        Err(message) => Validation::invalid(message),
    }
}

fn check_schema(candidate: &Value) -> Check {
    if !is_object(candidate) {
        return Err("Schema must be an object".to_string());
    }

    let databases = candidate
        .get("databases")
        .and_then(Value::as_array)
        .ok_or_else(|| "Schema must have databases[]".to_string())?;

    let mut seen = HashSet::new();
    for database in databases {
        check_database(database, &mut seen)?;
    }

    Ok(())
}

fn check_database<'a>(database: &'a Value, seen: &mut HashSet<&'a str>) -> Check {
    if !is_object(database) {
        return Err("Invalid database entry".to_string());
    }

    let db = entry_name(database).ok_or_else(|| "Database name is required".to_string())?;
    if !seen.insert(db) {
        return Err(format!("Duplicate database name: {}", db));
    }

    let tables = database
        .get("tables")
        .and_then(Value::as_array)
        .ok_or_else(|| format!("Database {} must have tables[]", db))?;

    let mut table_names = HashSet::new();
    for table in tables {
        check_table(db, table, &mut table_names)?;
    }

    Ok(())
}

fn check_table<'a>(db: &str, table: &'a Value, seen: &mut HashSet<&'a str>) -> Check {
    if !is_object(table) {
        return Err("Invalid table entry".to_string());
    }

    let name = entry_name(table).ok_or_else(|| "Table name is required".to_string())?;
    if !seen.insert(name) {
        return Err(format!("Duplicate table name in {}: {}", db, name));
    }

    let columns = table
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| format!("Table {}.{} must have columns[]", db, name))?;

    let qualified = format!("{}.{}", db, name);
    let mut column_names = HashSet::new();
    for column in columns {
        check_column(&qualified, column, &mut column_names)?;
    }

    Ok(())
}

fn check_column<'a>(table: &str, column: &'a Value, seen: &mut HashSet<&'a str>) -> Check {
    if !is_object(column) {
        return Err("Invalid column entry".to_string());
    }

    let name = entry_name(column).ok_or_else(|| format!("Column name required in {}", table))?;
    if !seen.insert(name) {
        return Err(format!("Duplicate column name in {}: {}", table, name));
    }

    let has_type = column
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());
    if !has_type {
        return Err(format!("Column type required for {}.{}", table, name));
    }

    if is_truthy(column.get("isForeignKey")) && !is_truthy(column.get("references")) {
        return Err(format!(
            "Foreign key requires references for {}.{}",
            table, name
        ));
    }

    Ok(())
}

/// Non-empty string `name` of an entry.
fn entry_name(entry: &Value) -> Option<&str> {
    entry
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

// Arrays count as objects here; they fail later on their missing name.
fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// JavaScript truthiness, used for the foreign key flags.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One executed SQL editor query.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryHistoryItem {
    pub id: i64,
    pub query: String,
    pub query_id: String,
    pub tab_name: Option<String>,
    pub timestamp: String,
    pub execution_time: String,
    pub row_count: usize,
}

/// Outcome details attached to a natural query entry, either when it is
/// added or later through an update.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NaturalQueryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NaturalQueryItem {
    pub id: String,
    pub question: String,
    #[serde(rename = "generatedSQL")]
    pub generated_sql: String,
    pub timestamp: String,
    #[serde(rename = "timestampISO")]
    pub timestamp_iso: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub metadata: NaturalQueryMetadata,
}

impl NaturalQueryMetadata {
    pub fn succeeded() -> Self {
        Self {
            success: Some(true),
            ..Default::default()
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: Some(false),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Overlays the fields set in `updates`; unset fields keep their value.
    pub fn merge(&mut self, updates: NaturalQueryMetadata) {
        if updates.success.is_some() {
            self.success = updates.success;
        }
        if updates.execution_time.is_some() {
            self.execution_time = updates.execution_time;
        }
        if updates.error.is_some() {
            self.error = updates.error;
        }
        self.extra.extend(updates.extra);
    }
}

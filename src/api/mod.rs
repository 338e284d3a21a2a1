use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

pub mod client;

pub use client::NaturalSqlClient;

/// Status reported for a request that exceeded the client timeout.
pub const TIMEOUT_STATUS: u16 = 408;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateSqlRequest {
    pub db_schema: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerateSqlResponse {
    #[serde(default)]
    pub sql_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(rename = "rowCount", default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A service that turns a question plus DDL context into SQL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlGenerator {
    async fn health(&self) -> Result<Value>;
    async fn service_info(&self) -> Result<Value>;
    async fn generate_sql(&self, db_schema: &str, question: &str) -> Result<GenerateSqlResponse>;
}

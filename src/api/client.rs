use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use serde_json::{json, Value};

use super::{GenerateSqlRequest, GenerateSqlResponse, SqlGenerator, TIMEOUT_STATUS};
use crate::{
    config::Config,
    errors::{Result, WorkbenchError},
};

/// HTTP client for the natural-language-to-SQL service.
pub struct NaturalSqlClient {
    client: Client,
    base_url: String,
    debug: bool,
}

impl NaturalSqlClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.api_timeout)
            .build()
            .map_err(|e| WorkbenchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            debug: config.api_debug,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn is_backend_reachable(&self) -> bool {
        self.health().await.is_ok()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn trace(&self, message: &str, detail: &str) {
        if self.debug {
            info!("[API Debug] {} {}", message, detail);
        } else {
            debug!("{} {}", message, detail);
        }
    }

    async fn get_json(&self, path: &str, failure: &str) -> Result<Value> {
        let url = self.url(path);
        self.trace("GET", &url);

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let response = ensure_success(response, failure).await?;
        let data: Value = response.json().await.map_err(map_send_error)?;

        self.trace("received", &data.to_string());
        Ok(data)
    }
}

#[async_trait]
impl SqlGenerator for NaturalSqlClient {
    async fn health(&self) -> Result<Value> {
        self.get_json("/health", "Health check failed").await
    }

    async fn service_info(&self) -> Result<Value> {
        self.get_json("/", "Failed to fetch service info").await
    }

    async fn generate_sql(&self, db_schema: &str, question: &str) -> Result<GenerateSqlResponse> {
        if db_schema.is_empty() || question.is_empty() {
            return Err(WorkbenchError::Api {
                status: 400,
                message: "Missing required parameters".to_string(),
                data: json!({ "message": "Both dbSchema and question are required" }),
            });
        }

        let preview: String = db_schema.chars().take(100).collect();
        self.trace("Generating SQL...", &format!("{:?} for {:?}", preview, question));

        let body = GenerateSqlRequest {
            db_schema: db_schema.to_string(),
            question: question.to_string(),
        };

        let response = self
            .client
            .post(self.url("/generate-sql"))
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response, "Failed to generate SQL").await?;
        let data: Value = response.json().await.map_err(map_send_error)?;

        // The service reports model failures in a 200 body.
        let service_error = data
            .get("error")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if let Some(message) = service_error {
            return Err(WorkbenchError::Api {
                status: 200,
                message,
                data,
            });
        }

        let generated: GenerateSqlResponse = serde_json::from_value(data)?;
        self.trace("SQL generated", &format!("{} rows", generated.row_count.unwrap_or(0)));
        Ok(generated)
    }
}

async fn ensure_success(response: Response, failure: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let data = response.json::<Value>().await.unwrap_or_else(|_| json!({}));
    Err(WorkbenchError::Api {
        status: status.as_u16(),
        message: failure.to_string(),
        data,
    })
}

fn map_send_error(e: reqwest::Error) -> WorkbenchError {
    if e.is_timeout() {
        return WorkbenchError::Api {
            status: TIMEOUT_STATUS,
            message: "Request timeout".to_string(),
            data: json!({ "originalError": e.to_string() }),
        };
    }
    WorkbenchError::Http(e)
}

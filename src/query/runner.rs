use std::{ops::RangeInclusive, sync::Arc, time::Duration};

use chrono::{Local, Utc};
use log::{debug, info};
use rand::Rng;
use serde_json::Value;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    errors::{Result, WorkbenchError},
    models::history::QueryHistoryItem,
};

/// Simulated execution time bounds, in milliseconds.
pub const DEFAULT_DELAY_MS: RangeInclusive<u64> = 200..=999;

#[derive(Debug, Default)]
struct QueryState {
    results: Option<Vec<Value>>,
    loading: bool,
    error: Option<String>,
    execution_time: Option<String>,
    history: Vec<QueryHistoryItem>,
}

/// Runs editor queries against a simulated backend.
///
/// Execution waits for a random delay and yields an empty result set. Every
/// completed run is recorded in the history, newest first.
#[derive(Clone)]
pub struct QueryRunner {
    state: Arc<Mutex<QueryState>>,
    delay_ms: RangeInclusive<u64>,
}

impl Default for QueryRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRunner {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY_MS)
    }

    pub fn with_delay(delay_ms: RangeInclusive<u64>) -> Self {
        QueryRunner {
            state: Arc::new(Mutex::new(QueryState::default())),
            delay_ms,
        }
    }

    pub async fn execute_query(
        &self,
        query: &str,
        query_id: &str,
        tab_name: Option<&str>,
    ) -> Result<Vec<Value>> {
        {
            let mut state = self.state.lock().await;
            state.error = None;

            let rejection = if query.trim().is_empty() {
                Some("Query cannot be empty")
            } else if query_id.is_empty() {
                Some("Query ID is required")
            } else {
                None
            };
            if let Some(message) = rejection {
                state.error = Some(message.to_string());
                return Err(WorkbenchError::Query(message.to_string()));
            }

            state.loading = true;
        }

        let delay = self.pick_delay();
        debug!("executing {} for {}ms", query_id, delay.as_millis());
        tokio::time::sleep(delay).await;

        let results: Vec<Value> = Vec::new();
        let execution_time = format!("{:.3}s", delay.as_secs_f64());

        let item = QueryHistoryItem {
            id: Utc::now().timestamp_millis(),
            query: query.to_string(),
            query_id: query_id.to_string(),
            tab_name: tab_name.map(str::to_string),
            timestamp: Local::now().format("%I:%M:%S %p").to_string(),
            execution_time: execution_time.clone(),
            row_count: results.len(),
        };

        let mut state = self.state.lock().await;
        state.results = Some(results.clone());
        state.execution_time = Some(execution_time);
        state.history.insert(0, item);
        state.loading = false;
        info!("query {} finished with {} rows", query_id, results.len());

        Ok(results)
    }

    /// Starts a query in the background. The returned handle can cancel the
    /// pending run before its timer fires.
    pub fn spawn_query(
        &self,
        query: String,
        query_id: String,
        tab_name: Option<String>,
    ) -> QueryHandle {
        let runner = self.clone();
        let handle = tokio::spawn(async move {
            runner
                .execute_query(&query, &query_id, tab_name.as_deref())
                .await
        });

        QueryHandle {
            handle,
            state: self.state.clone(),
        }
    }

    /// Runs a history entry again.
    pub async fn select_from_history(&self, item: &QueryHistoryItem) -> Result<Vec<Value>> {
        self.execute_query(&item.query, &item.query_id, item.tab_name.as_deref())
            .await
    }

    pub async fn history(&self) -> Vec<QueryHistoryItem> {
        self.state.lock().await.history.clone()
    }

    pub async fn clear_history(&self) {
        self.state.lock().await.history.clear();
    }

    pub async fn results(&self) -> Option<Vec<Value>> {
        self.state.lock().await.results.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn execution_time(&self) -> Option<String> {
        self.state.lock().await.execution_time.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn clear_results(&self) {
        let mut state = self.state.lock().await;
        state.results = None;
        state.execution_time = None;
        state.error = None;
    }

    fn pick_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.delay_ms.clone());
        Duration::from_millis(ms)
    }
}

pub struct QueryHandle {
    handle: JoinHandle<Result<Vec<Value>>>,
    state: Arc<Mutex<QueryState>>,
}

impl QueryHandle {
    pub async fn cancel(&self) {
        self.handle.abort();
        self.state.lock().await.loading = false;
    }

    pub async fn join(self) -> Result<Vec<Value>> {
        self.handle
            .await
            .map_err(|e| WorkbenchError::Query(e.to_string()))?
    }
}

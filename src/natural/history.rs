use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::history::{NaturalQueryItem, NaturalQueryMetadata};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalQueryStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage rounded to one decimal, 0 when there is no history.
    pub success_rate: f64,
}

/// Generated-SQL history, kept apart from the editor query history.
#[derive(Debug, Default, Clone)]
pub struct NaturalQueryHistory {
    items: Vec<NaturalQueryItem>,
}

impl NaturalQueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[NaturalQueryItem] {
        &self.items
    }

    pub fn add(
        &mut self,
        question: &str,
        generated_sql: &str,
        metadata: NaturalQueryMetadata,
    ) -> NaturalQueryItem {
        let suffix = Uuid::new_v4().simple().to_string();
        let item = NaturalQueryItem {
            id: format!("nq_{}_{}", Utc::now().timestamp_millis(), &suffix[..9]),
            question: question.to_string(),
            generated_sql: generated_sql.to_string(),
            timestamp: Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            timestamp_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            kind: "natural".to_string(),
            metadata,
        };

        self.items.insert(0, item.clone());
        item
    }

    /// Merges `updates` into the entry with `id`. Returns false if none exists.
    pub fn update(&mut self, id: &str, updates: NaturalQueryMetadata) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.metadata.merge(updates);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drops every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub fn search(&self, term: &str) -> Vec<&NaturalQueryItem> {
        if term.trim().is_empty() {
            return self.items.iter().collect();
        }

        let term = term.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.question.to_lowercase().contains(&term)
                    || item.generated_sql.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn stats(&self) -> NaturalQueryStats {
        let total = self.items.len();
        let successful = self
            .items
            .iter()
            .filter(|item| item.metadata.success == Some(true))
            .count();
        let failed = self
            .items
            .iter()
            .filter(|item| item.metadata.success == Some(false))
            .count();

        let success_rate = if total > 0 {
            (successful as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        NaturalQueryStats {
            total,
            successful,
            failed,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_prepends_with_generated_id() {
        let mut history = NaturalQueryHistory::new();
        let first = history.add("how many users?", "SELECT COUNT(*) FROM users", Default::default());
        let second = history.add("list orders", "SELECT * FROM orders", Default::default());

        assert_eq!(history.items()[0].id, second.id);
        assert_eq!(history.items()[1].id, first.id);
        assert!(first.id.starts_with("nq_"));
        assert_eq!(first.id.rsplit('_').next().unwrap().len(), 9);
        assert_eq!(first.kind, "natural");
        assert!(first.timestamp_iso.ends_with('Z'));
    }

    #[test]
    fn test_update_and_remove() {
        let mut history = NaturalQueryHistory::new();
        let item = history.add("q", "SELECT 1", Default::default());

        assert!(history.update(
            &item.id,
            NaturalQueryMetadata {
                execution_time: Some("0.412s".to_string()),
                ..NaturalQueryMetadata::succeeded()
            }
        ));
        assert_eq!(history.items()[0].metadata.success, Some(true));
        assert_eq!(history.items()[0].metadata.execution_time.as_deref(), Some("0.412s"));

        assert!(!history.update("nq_missing", NaturalQueryMetadata::succeeded()));
        assert!(history.remove(&item.id));
        assert!(!history.remove(&item.id));
        assert!(history.items().is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut history = NaturalQueryHistory::new();
        history.add("Top customers", "SELECT * FROM users", Default::default());
        history.add("monthly revenue", "SELECT SUM(total_sales) FROM monthly_sales", Default::default());

        assert_eq!(history.search("CUSTOMERS").len(), 1);
        assert_eq!(history.search("select").len(), 2);
        assert_eq!(history.search("sum(").len(), 1);
        assert_eq!(history.search(" ").len(), 2);
        assert!(history.search("campaign").is_empty());
    }

    #[test]
    fn test_stats() {
        let mut history = NaturalQueryHistory::new();
        assert_eq!(history.stats().success_rate, 0.0);

        history.add("a", "SELECT 1", NaturalQueryMetadata::succeeded());
        history.add("b", "SELECT 2", NaturalQueryMetadata::succeeded());
        history.add("c", "", NaturalQueryMetadata::failed("timeout"));
        history.add("d", "SELECT 4", Default::default());

        let stats = history.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.success_rate, 50.0);

        history.add("e", "SELECT 5", NaturalQueryMetadata::succeeded());
        assert_eq!(history.stats().success_rate, 60.0);

        assert_eq!(history.clear(), 5);
        assert_eq!(history.stats().total, 0);
    }
}

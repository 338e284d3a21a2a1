use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data row keyed by header name, in header order.
pub type Record = IndexMap<String, String>;

/// Parsed CSV content: ordered header names plus one record per data row.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

/// A dataset kept in the dataset store after an import.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportedDataset {
    pub id: i64,
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl ImportedDataset {
    pub fn new(id: i64, name: &str, dataset: Dataset) -> Self {
        Self {
            id,
            name: name.to_string(),
            columns: dataset.columns,
            rows: dataset.rows,
        }
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }
}

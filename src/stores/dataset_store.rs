use std::{fs, path::Path};

use chrono::Utc;
use log::{info, warn};

use crate::{
    delimited::parse_csv,
    errors::{Result, WorkbenchError},
    models::dataset::ImportedDataset,
    storage::KeyValueStore,
};

pub const DATASETS_KEY: &str = "dashwiz.csv.datasets.v1";

/// Imported CSV datasets, newest first, persisted under [`DATASETS_KEY`].
pub struct DatasetStore<S: KeyValueStore> {
    storage: S,
    datasets: Vec<ImportedDataset>,
}

impl<S: KeyValueStore> DatasetStore<S> {
    pub fn open(storage: S) -> Self {
        let datasets: Vec<ImportedDataset> = match storage.get(DATASETS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("ignoring persisted datasets: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("could not read persisted datasets: {}", e);
                Vec::new()
            }
        };

        Self { storage, datasets }
    }

    pub fn datasets(&self) -> &[ImportedDataset] {
        &self.datasets
    }

    pub fn find(&self, name: &str) -> Option<&ImportedDataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Parses `text` and stores it as the newest dataset, named after
    /// `file_name` without its extension.
    pub fn import_csv(&mut self, file_name: &str, text: &str) -> &ImportedDataset {
        let dataset = parse_csv(text);
        let name = dataset_name(file_name);
        info!(
            "imported {} ({} columns, {} rows)",
            name,
            dataset.columns.len(),
            dataset.rows.len()
        );

        let imported = ImportedDataset::new(Utc::now().timestamp_millis(), name, dataset);
        self.datasets.insert(0, imported);
        self.persist();
        &self.datasets[0]
    }

    pub fn import_csv_file(&mut self, path: &Path) -> Result<&ImportedDataset> {
        let text = fs::read_to_string(path)
            .map_err(|e| WorkbenchError::Import(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.import_csv(&file_name, &text))
    }

    pub fn clear_datasets(&mut self) {
        self.datasets.clear();
        self.persist();
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.datasets) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not serialize datasets: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(DATASETS_KEY, &raw) {
            warn!("could not persist datasets: {}", e);
        }
    }
}

/// `sales.2024.csv` -> `sales.2024`. Names without a usable extension are kept.
fn dataset_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) if i + 1 < file_name.len() => &file_name[..i],
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_dataset_name() {
        assert_eq!(dataset_name("users.csv"), "users");
        assert_eq!(dataset_name("sales.2024.csv"), "sales.2024");
        assert_eq!(dataset_name("notes"), "notes");
        assert_eq!(dataset_name("trailing."), "trailing.");
    }

    #[test]
    fn test_import_is_newest_first_and_persisted() {
        let mut store = DatasetStore::open(MemoryStore::new());
        store.import_csv("first.csv", "a\n1\n");
        store.import_csv("second.csv", "b\n2\n");

        let names: Vec<&str> = store.datasets().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);

        let reopened = DatasetStore::open(store.storage().clone());
        assert_eq!(reopened.datasets(), store.datasets());
        assert_eq!(reopened.find("first").unwrap().rows[0]["a"], "1");
    }

    #[test]
    fn test_clear() {
        let mut store = DatasetStore::open(MemoryStore::new());
        store.import_csv("data.csv", "x,y\n1,2");
        store.clear_datasets();
        assert!(store.datasets().is_empty());
        assert_eq!(
            store.storage().get(DATASETS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_corrupt_slot_opens_empty() {
        let mut storage = MemoryStore::new();
        storage.set(DATASETS_KEY, "{").unwrap();
        assert!(DatasetStore::open(storage).datasets().is_empty());
    }
}

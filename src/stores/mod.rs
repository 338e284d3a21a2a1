pub mod dataset_store;
pub mod schema_store;

pub use dataset_store::{DatasetStore, DATASETS_KEY};
pub use schema_store::{parse_schema, SchemaStore, SCHEMA_KEY};

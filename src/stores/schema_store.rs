use log::{info, warn};
use serde_json::Value;

use crate::{
    errors::Result,
    models::schema::Schema,
    schema::validator::validate_schema,
    storage::KeyValueStore,
};

pub const SCHEMA_KEY: &str = "dashwiz.schema.v1";

/// Parses JSON text into a schema, accepting it only when it validates.
pub fn parse_schema(json: &str) -> Result<Schema> {
    let value: Value = serde_json::from_str(json)?;
    validate_schema(&value).into_result()?;
    Ok(serde_json::from_value(value)?)
}

/// The active schema, persisted under [`SCHEMA_KEY`].
///
/// Every change goes through [`SchemaStore::set_schema`]: the new value is
/// validated first and only then replaces the current one, so a rejected
/// edit leaves both the in-memory and persisted schema untouched.
pub struct SchemaStore<S: KeyValueStore> {
    storage: S,
    schema: Schema,
    last_good: Schema,
}

impl<S: KeyValueStore> SchemaStore<S> {
    /// Loads the persisted schema, or the starter example when the slot is
    /// empty, unreadable or invalid.
    pub fn open(storage: S) -> Self {
        let schema = read_persisted(&storage).unwrap_or_else(Schema::example);
        Self {
            storage,
            last_good: schema.clone(),
            schema,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn last_good(&self) -> &Schema {
        &self.last_good
    }

    pub fn is_valid(&self) -> bool {
        self.schema.is_valid()
    }

    pub fn set_schema(&mut self, next: Schema) -> Result<()> {
        next.validate().into_result()?;
        self.last_good = next.clone();
        self.schema = next;
        self.persist();
        Ok(())
    }

    pub fn reset_schema(&mut self) -> Result<()> {
        info!("resetting schema to the starter example");
        self.set_schema(Schema::example())
    }

    pub fn import_schema(&mut self, json: &str) -> Result<()> {
        let schema = parse_schema(json)?;
        self.set_schema(schema)
    }

    /// Pretty printed (2-space) JSON of the current schema.
    pub fn export_schema(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.schema)?)
    }

    /// Re-reads storage, replacing the current schema only with a valid value.
    pub fn load_from_storage(&mut self) -> bool {
        match read_persisted(&self.storage) {
            Some(schema) => {
                self.last_good = schema.clone();
                self.schema = schema;
                true
            }
            None => false,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.schema) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not serialize schema: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(SCHEMA_KEY, &raw) {
            warn!("could not persist schema: {}", e);
        }
    }
}

fn read_persisted<S: KeyValueStore>(storage: &S) -> Option<Schema> {
    let raw = match storage.get(SCHEMA_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("could not read persisted schema: {}", e);
            return None;
        }
    };

    match parse_schema(&raw) {
        Ok(schema) => Some(schema),
        Err(e) => {
            warn!("ignoring persisted schema: {}", e);
            None
        }
    }
}

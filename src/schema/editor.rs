use crate::{
    errors::{Result, WorkbenchError},
    models::schema::{ColumnSchema, DatabaseSchema, Schema, TableName, TableSchema},
    storage::KeyValueStore,
    stores::{parse_schema, SchemaStore},
};

pub const DEFAULT_COLUMN_TYPE: &str = "VARCHAR(255)";

/// A single column attribute change.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnField {
    Name(String),
    Type(String),
    Primary(bool),
    ForeignKey(bool),
    References(Option<String>),
    Nullable(Option<bool>),
}

/// Draft copy of a schema being edited.
///
/// Each edit builds a complete new schema from the current draft and swaps
/// it in. The draft may be invalid in between (a freshly added database has
/// no name yet); it only reaches the store through [`SchemaEditor::save`],
/// which validates it.
#[derive(Debug, Clone)]
pub struct SchemaEditor {
    working: Schema,
}

impl SchemaEditor {
    pub fn new(schema: &Schema) -> Self {
        Self {
            working: schema.clone(),
        }
    }

    pub fn from_store<S: KeyValueStore>(store: &SchemaStore<S>) -> Self {
        Self::new(store.schema())
    }

    pub fn working(&self) -> &Schema {
        &self.working
    }

    pub fn json_draft(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.working)?)
    }

    fn apply<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Schema) -> Result<()>,
    {
        let mut next = self.working.clone();
        edit(&mut next)?;
        self.working = next;
        Ok(())
    }

    pub fn add_database(&mut self) -> Result<usize> {
        self.apply(|schema| {
            schema.databases.push(DatabaseSchema::default());
            Ok(())
        })?;
        Ok(self.working.databases.len() - 1)
    }

    pub fn remove_database(&mut self, db: usize) -> Result<()> {
        self.apply(|schema| {
            database_mut(schema, db)?;
            schema.databases.remove(db);
            Ok(())
        })
    }

    pub fn rename_database(&mut self, db: usize, name: &str) -> Result<()> {
        self.apply(|schema| {
            database_mut(schema, db)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn add_table(&mut self, db: usize) -> Result<usize> {
        let mut index = 0;
        self.apply(|schema| {
            let database = database_mut(schema, db)?;
            database.tables.push(TableSchema::default());
            index = database.tables.len() - 1;
            Ok(())
        })?;
        Ok(index)
    }

    pub fn remove_table(&mut self, db: usize, table: usize) -> Result<()> {
        self.apply(|schema| {
            table_mut(schema, db, table)?;
            database_mut(schema, db)?.tables.remove(table);
            Ok(())
        })
    }

    pub fn rename_table(&mut self, db: usize, table: usize, name: &str) -> Result<()> {
        self.apply(|schema| {
            table_mut(schema, db, table)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn add_column(&mut self, db: usize, table: usize) -> Result<usize> {
        let mut index = 0;
        self.apply(|schema| {
            let table = table_mut(schema, db, table)?;
            table.columns.push(ColumnSchema::new("", DEFAULT_COLUMN_TYPE));
            index = table.columns.len() - 1;
            Ok(())
        })?;
        Ok(index)
    }

    pub fn remove_column(&mut self, db: usize, table: usize, column: usize) -> Result<()> {
        self.apply(|schema| {
            column_mut(schema, db, table, column)?;
            table_mut(schema, db, table)?.columns.remove(column);
            Ok(())
        })
    }

    pub fn update_column(
        &mut self,
        db: usize,
        table: usize,
        column: usize,
        field: ColumnField,
    ) -> Result<()> {
        self.apply(|schema| {
            let column = column_mut(schema, db, table, column)?;
            match field {
                ColumnField::Name(name) => column.name = name,
                ColumnField::Type(data_type) => column.data_type = data_type,
                ColumnField::Primary(flag) => column.is_primary = Some(flag),
                ColumnField::ForeignKey(flag) => column.is_foreign_key = Some(flag),
                ColumnField::References(references) => column.references = references,
                ColumnField::Nullable(nullable) => column.is_nullable = nullable,
            }
            Ok(())
        })
    }

    /// Replaces the draft with JSON text, but only when it is a valid schema.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.working = parse_schema(json)?;
        Ok(())
    }

    /// Commits the draft to the store. An invalid draft is reported and the
    /// store keeps its previous schema.
    pub fn save<S: KeyValueStore>(&self, store: &mut SchemaStore<S>) -> Result<()> {
        store.set_schema(self.working.clone())
    }

    /// Discards the draft in favour of the store's current schema.
    pub fn sync<S: KeyValueStore>(&mut self, store: &SchemaStore<S>) {
        self.working = store.schema().clone();
    }

    /// Tables whose database, table or column names contain `filter`,
    /// case-insensitively. A blank filter matches everything.
    pub fn filter_tables(&self, filter: &str) -> Vec<TableName> {
        let needle = filter.trim().to_lowercase();
        let matches = |name: &str| needle.is_empty() || name.to_lowercase().contains(&needle);

        self.working
            .databases
            .iter()
            .flat_map(|database| {
                database
                    .tables
                    .iter()
                    .filter(move |table| {
                        matches(&database.name)
                            || matches(&table.name)
                            || table.columns.iter().any(|c| matches(&c.name))
                    })
                    .map(move |table| TableName {
                        database: database.name.clone(),
                        table: table.name.clone(),
                        full_name: format!("{}.{}", database.name, table.name),
                    })
            })
            .collect()
    }
}

fn database_mut(schema: &mut Schema, db: usize) -> Result<&mut DatabaseSchema> {
    schema
        .databases
        .get_mut(db)
        .ok_or_else(|| WorkbenchError::NotFound(format!("database #{}", db)))
}

fn table_mut(schema: &mut Schema, db: usize, table: usize) -> Result<&mut TableSchema> {
    database_mut(schema, db)?
        .tables
        .get_mut(table)
        .ok_or_else(|| WorkbenchError::NotFound(format!("table #{} in database #{}", table, db)))
}

fn column_mut(
    schema: &mut Schema,
    db: usize,
    table: usize,
    column: usize,
) -> Result<&mut ColumnSchema> {
    table_mut(schema, db, table)?
        .columns
        .get_mut(column)
        .ok_or_else(|| {
            WorkbenchError::NotFound(format!(
                "column #{} in table #{} of database #{}",
                column, table, db
            ))
        })
}

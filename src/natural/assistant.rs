use std::time::Instant;

use log::warn;

use super::history::NaturalQueryHistory;
use crate::{
    api::SqlGenerator,
    errors::Result,
    models::{
        history::{NaturalQueryItem, NaturalQueryMetadata},
        schema::Schema,
    },
    schema::ddl::{extract_table_schema, schema_to_sql},
};

/// DDL sent as model context: the focus table with its references when it
/// exists, the whole schema otherwise.
pub fn schema_context(schema: &Schema, focus_table: Option<&str>) -> String {
    if let Some(table) = focus_table {
        let related = extract_table_schema(schema, table);
        if !related.is_empty() {
            return related;
        }
    }
    schema_to_sql(schema)
}

/// Asks a [`SqlGenerator`] for SQL and keeps every attempt in a history.
pub struct NaturalQuery<G: SqlGenerator> {
    generator: G,
    history: NaturalQueryHistory,
}

impl<G: SqlGenerator> NaturalQuery<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            history: NaturalQueryHistory::new(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn history(&self) -> &NaturalQueryHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut NaturalQueryHistory {
        &mut self.history
    }

    pub async fn ask(
        &mut self,
        schema: &Schema,
        question: &str,
        focus_table: Option<&str>,
    ) -> Result<NaturalQueryItem> {
        let context = schema_context(schema, focus_table);
        let started = Instant::now();

        let outcome = self.generator.generate_sql(&context, question).await;
        let execution_time = format!("{:.3}s", started.elapsed().as_secs_f64());

        match outcome {
            Ok(response) => {
                let mut metadata = NaturalQueryMetadata {
                    execution_time: Some(execution_time),
                    ..NaturalQueryMetadata::succeeded()
                };
                if let Some(rows) = response.row_count {
                    metadata.extra.insert("rowCount".to_string(), rows.into());
                }
                Ok(self.history.add(question, &response.sql_query, metadata))
            }
            Err(e) => {
                warn!("SQL generation failed: {}", e);
                let metadata = NaturalQueryMetadata {
                    execution_time: Some(execution_time),
                    ..NaturalQueryMetadata::failed(&e.to_string())
                };
                self.history.add(question, "", metadata);
                Err(e)
            }
        }
    }
}

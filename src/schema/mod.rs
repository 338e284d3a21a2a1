pub mod ddl;
pub mod editor;
pub mod validator;

pub use ddl::{
    all_table_names, column_to_sql, compact_schema_to_sql, extract_table_schema, schema_to_sql,
    schema_with_data_hints, table_to_sql,
};
pub use editor::{ColumnField, SchemaEditor};
pub use validator::{validate_schema, Validation};

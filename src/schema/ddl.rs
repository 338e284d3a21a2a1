//! SQL DDL renderings of a schema, used as display text and as model context.
//! They are never executed. Inputs are expected to have passed validation.

use std::collections::HashSet;

use crate::models::schema::{ColumnSchema, Schema, TableName, TableSchema};

pub fn column_to_sql(column: &ColumnSchema) -> String {
    let mut definition = format!("  {} {}", column.name, column.data_type);

    if column.is_primary() {
        definition.push_str(" PRIMARY KEY");
    } else if column.is_nullable == Some(false) {
        definition.push_str(" NOT NULL");
    }

    if column.is_foreign_key() {
        if let Some(references) = column.references.as_deref().filter(|r| !r.is_empty()) {
            definition.push_str(&format!(" REFERENCES {}", references));
        }
    }

    definition
}

/// `CREATE TABLE` statement, qualified with `database` when given.
pub fn table_to_sql(table: &TableSchema, database: Option<&str>) -> String {
    let prefix = database.map(|db| format!("{}.", db)).unwrap_or_default();
    let columns: Vec<String> = table.columns.iter().map(column_to_sql).collect();

    format!(
        "CREATE TABLE {}{} (\n{}\n);",
        prefix,
        table.name,
        columns.join(",\n")
    )
}

pub fn schema_to_sql(schema: &Schema) -> String {
    let mut lines = Vec::new();

    for database in &schema.databases {
        lines.push(format!("-- Database: {}", database.name));
        lines.push(String::new());

        for table in &database.tables {
            lines.push(table_to_sql(table, Some(&database.name)));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// One comment line per table listing its columns, with `[PK]`/`[FK]` markers.
pub fn compact_schema_to_sql(schema: &Schema) -> String {
    let mut lines = Vec::new();

    for database in &schema.databases {
        lines.push(format!("-- Database: {}", database.name));

        for table in &database.tables {
            let columns: Vec<String> = table
                .columns
                .iter()
                .map(|column| {
                    let mut def = column.name.clone();
                    if column.is_primary() {
                        def.push_str(" [PK]");
                    }
                    if column.is_foreign_key() {
                        def.push_str(" [FK]");
                    }
                    def
                })
                .collect();

            lines.push(format!(
                "-- {}.{}: {}",
                database.name,
                table.name,
                columns.join(", ")
            ));
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

/// DDL for `table_name` and the tables its foreign keys point at.
///
/// Returns an empty string when no database holds a table of that name.
/// Related tables keep schema order and are qualified with the database
/// of the target table.
pub fn extract_table_schema(schema: &Schema, table_name: &str) -> String {
    let mut related: HashSet<&str> = HashSet::new();
    let mut target_database = None;

    for database in &schema.databases {
        for table in database.tables.iter().filter(|t| t.name == table_name) {
            target_database = Some(database.name.as_str());
            related.insert(table.name.as_str());
            related.extend(table.columns.iter().filter_map(ColumnSchema::referenced_table));
        }
    }

    let Some(target_database) = target_database else {
        return String::new();
    };

    let mut lines = vec![
        format!("-- Table: {} and related tables", table_name),
        String::new(),
    ];

    for database in &schema.databases {
        for table in &database.tables {
            if related.contains(table.name.as_str()) {
                lines.push(table_to_sql(table, Some(target_database)));
                lines.push(String::new());
            }
        }
    }

    lines.join("\n")
}

pub fn all_table_names(schema: &Schema) -> Vec<TableName> {
    schema
        .databases
        .iter()
        .flat_map(|database| {
            database.tables.iter().map(move |table| TableName {
                database: database.name.clone(),
                table: table.name.clone(),
                full_name: format!("{}.{}", database.name, table.name),
            })
        })
        .collect()
}

fn data_hint(table_name: &str) -> Option<&'static str> {
    let name = table_name.to_lowercase();
    if name.contains("user") {
        Some("-- Contains user account information")
    } else if name.contains("order") {
        Some("-- Contains order/transaction records")
    } else if name.contains("product") {
        Some("-- Contains product catalog information")
    } else {
        None
    }
}

/// Full DDL with a comment after each table hinting at the data it holds.
pub fn schema_with_data_hints(schema: &Schema) -> String {
    let mut lines = Vec::new();

    for database in &schema.databases {
        lines.push(format!("-- Database: {}", database.name));
        lines.push(String::new());

        for table in &database.tables {
            lines.push(table_to_sql(table, Some(&database.name)));
            if let Some(hint) = data_hint(&table.name) {
                lines.push(hint.to_string());
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::DatabaseSchema;

    fn shop() -> Schema {
        Schema::new(vec![DatabaseSchema::new(
            "shop",
            vec![
                TableSchema::new(
                    "users",
                    vec![
                        ColumnSchema::new("id", "INTEGER").primary().nullable(false),
                        ColumnSchema::new("email", "TEXT").nullable(false),
                    ],
                ),
                TableSchema::new("audit", vec![ColumnSchema::new("note", "TEXT").nullable(true)]),
                TableSchema::new(
                    "orders",
                    vec![
                        ColumnSchema::new("id", "INTEGER").primary(),
                        ColumnSchema::new("user_id", "INTEGER").foreign_key("users(id)"),
                    ],
                ),
            ],
        )])
    }

    #[test]
    fn test_column_rendering() {
        let pk = ColumnSchema::new("id", "INTEGER").primary().nullable(false);
        assert_eq!(column_to_sql(&pk), "  id INTEGER PRIMARY KEY");

        let required = ColumnSchema::new("email", "TEXT").nullable(false);
        assert_eq!(column_to_sql(&required), "  email TEXT NOT NULL");

        let fk = ColumnSchema::new("user_id", "INTEGER")
            .nullable(false)
            .foreign_key("users(id)");
        assert_eq!(
            column_to_sql(&fk),
            "  user_id INTEGER NOT NULL REFERENCES users(id)"
        );

        let dangling = ColumnSchema {
            is_foreign_key: Some(true),
            ..ColumnSchema::new("org_id", "INTEGER")
        };
        assert_eq!(column_to_sql(&dangling), "  org_id INTEGER");
    }

    #[test]
    fn test_table_rendering() {
        let schema = shop();
        assert_eq!(
            table_to_sql(&schema.databases[0].tables[2], Some("shop")),
            "CREATE TABLE shop.orders (\n  id INTEGER PRIMARY KEY,\n  user_id INTEGER REFERENCES users(id)\n);"
        );
        assert!(table_to_sql(&schema.databases[0].tables[1], None).starts_with("CREATE TABLE audit ("));
    }

    #[test]
    fn test_schema_rendering_keeps_input_order() {
        let schema = shop();
        let sql = schema_to_sql(&schema);

        assert!(sql.starts_with("-- Database: shop\n\nCREATE TABLE shop.users ("));
        let users = sql.find("shop.users").unwrap();
        let audit = sql.find("shop.audit").unwrap();
        let orders = sql.find("shop.orders").unwrap();
        assert!(users < audit && audit < orders);
        assert!(sql.ends_with(");\n"));
        assert_eq!(sql, schema_to_sql(&schema));
    }

    #[test]
    fn test_empty_schema_renders_empty() {
        assert_eq!(schema_to_sql(&Schema::default()), "");
        assert_eq!(compact_schema_to_sql(&Schema::default()), "");
    }

    #[test]
    fn test_compact_rendering() {
        let sql = compact_schema_to_sql(&shop());
        assert_eq!(
            sql,
            "-- Database: shop\n\
             -- shop.users: id [PK], email\n\
             -- shop.audit: note\n\
             -- shop.orders: id [PK], user_id [FK]\n"
        );
    }

    #[test]
    fn test_extract_related_tables() {
        let sql = extract_table_schema(&shop(), "orders");
        assert!(sql.starts_with("-- Table: orders and related tables\n\n"));
        assert!(sql.contains("CREATE TABLE shop.orders ("));
        assert!(sql.contains("CREATE TABLE shop.users ("));
        assert!(!sql.contains("audit"));
        // Schema order, not discovery order.
        assert!(sql.find("shop.users").unwrap() < sql.find("shop.orders").unwrap());
    }

    #[test]
    fn test_extract_unknown_table() {
        assert_eq!(extract_table_schema(&shop(), "doesNotExist"), "");
    }

    #[test]
    fn test_all_table_names() {
        let names = all_table_names(&Schema::example());
        assert_eq!(names.len(), 7);
        assert_eq!(names[0].full_name, "sales_db.users");
        assert_eq!(names[6].database, "marketing_db");
        assert_eq!(names[6].table, "leads");
    }

    #[test]
    fn test_data_hints() {
        let sql = schema_with_data_hints(&shop());
        assert!(sql.contains(");\n-- Contains user account information\n"));
        assert!(sql.contains(");\n-- Contains order/transaction records\n"));
        assert!(!sql.contains("product catalog"));
    }
}

use super::schema::{ColumnSchema, DatabaseSchema, Schema, TableSchema};

fn table(name: &str, columns: Vec<ColumnSchema>) -> TableSchema {
    TableSchema::new(name, columns)
}

fn col(name: &str, data_type: &str) -> ColumnSchema {
    ColumnSchema::new(name, data_type)
}

impl Schema {
    /// Starter schema used on first launch and by reset.
    pub fn example() -> Self {
        let sales_db = DatabaseSchema::new(
            "sales_db",
            vec![
                table(
                    "users",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("username", "VARCHAR(50)").nullable(false),
                        col("email", "VARCHAR(100)").nullable(false),
                        col("first_name", "VARCHAR(50)").nullable(true),
                        col("last_name", "VARCHAR(50)").nullable(true),
                        col("created_at", "TIMESTAMP").nullable(false),
                        col("last_login", "TIMESTAMP").nullable(true),
                    ],
                ),
                table(
                    "products",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("name", "VARCHAR(100)").nullable(false),
                        col("category", "VARCHAR(50)").nullable(false),
                        col("price", "DECIMAL(10,2)").nullable(false),
                        col("stock", "INTEGER").nullable(false),
                        col("description", "TEXT").nullable(true),
                        col("created_at", "TIMESTAMP").nullable(false),
                    ],
                ),
                table(
                    "orders",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("user_id", "INTEGER").foreign_key("users(id)"),
                        col("total_amount", "DECIMAL(10,2)").nullable(false),
                        col("status", "VARCHAR(20)").nullable(false),
                        col("created_at", "TIMESTAMP").nullable(false),
                        col("updated_at", "TIMESTAMP").nullable(true),
                    ],
                ),
                table(
                    "order_items",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("order_id", "INTEGER").foreign_key("orders(id)"),
                        col("product_id", "INTEGER").foreign_key("products(id)"),
                        col("quantity", "INTEGER").nullable(false),
                        col("price", "DECIMAL(10,2)").nullable(false),
                    ],
                ),
                table(
                    "monthly_sales",
                    vec![
                        col("month", "VARCHAR(20)").primary(),
                        col("year", "INTEGER").primary(),
                        col("total_sales", "DECIMAL(15,2)").nullable(false),
                        col("total_orders", "INTEGER").nullable(false),
                        col("avg_order_value", "DECIMAL(10,2)").nullable(false),
                    ],
                ),
            ],
        );

        let marketing_db = DatabaseSchema::new(
            "marketing_db",
            vec![
                table(
                    "campaigns",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("name", "VARCHAR(100)").nullable(false),
                        col("start_date", "DATE").nullable(false),
                        col("end_date", "DATE").nullable(true),
                        col("budget", "DECIMAL(12,2)").nullable(false),
                        col("status", "VARCHAR(20)").nullable(false),
                    ],
                ),
                table(
                    "leads",
                    vec![
                        col("id", "INTEGER").primary(),
                        col("campaign_id", "INTEGER").foreign_key("campaigns(id)"),
                        col("email", "VARCHAR(100)").nullable(false),
                        col("phone", "VARCHAR(20)").nullable(true),
                        col("status", "VARCHAR(20)").nullable(false),
                        col("created_at", "TIMESTAMP").nullable(false),
                    ],
                ),
            ],
        );

        Schema::new(vec![sales_db, marketing_db])
    }
}

use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use dashwiz::{
    api::SqlGenerator,
    config::Config,
    delimited::{export_to_csv, to_csv_string},
    errors::WorkbenchError,
    schema::{
        all_table_names, compact_schema_to_sql, extract_table_schema, schema_with_data_hints,
        validate_schema,
    },
    schema_to_sql, Workbench,
};

#[derive(Parser)]
#[command(name = "dashwiz", about = "SQL workbench: schemas, CSV datasets and natural queries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Imported CSV datasets
    Csv {
        #[command(subcommand)]
        command: CsvCommand,
    },
    /// The active schema
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
    /// Simulated query execution
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
    /// Ask the natural query service for SQL
    Ask {
        question: String,
        /// Send only this table and the tables it references as context
        #[arg(long)]
        table: Option<String>,
    },
    /// Check that the natural query service is up
    Health,
}

#[derive(Subcommand)]
enum CsvCommand {
    Import { file: PathBuf },
    List,
    Export {
        name: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Clear,
}

#[derive(Subcommand)]
enum SchemaCommand {
    Show,
    Validate { file: PathBuf },
    Import { file: PathBuf },
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Reset,
    Ddl {
        #[arg(long, conflicts_with_all = ["hints", "table"])]
        compact: bool,
        #[arg(long, conflicts_with = "table")]
        hints: bool,
        #[arg(long)]
        table: Option<String>,
    },
    Tables,
}

#[derive(Subcommand)]
enum QueryCommand {
    Run {
        sql: String,
        #[arg(long, default_value = "adhoc")]
        id: String,
        #[arg(long)]
        tab: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let mut workbench = Workbench::open(Config::from_env())?;

    match cli.command {
        Command::Csv { command } => run_csv(&mut workbench, command)?,
        Command::Schema { command } => run_schema(&mut workbench, command)?,
        Command::Query {
            command: QueryCommand::Run { sql, id, tab },
        } => {
            let rows = workbench
                .queries
                .execute_query(&sql, &id, tab.as_deref())
                .await?;
            let time = workbench.queries.execution_time().await.unwrap_or_default();
            println!("{} rows in {}", rows.len(), time);
        }
        Command::Ask { question, table } => {
            let schema = workbench.schema.schema().clone();
            let item = workbench
                .natural
                .ask(&schema, &question, table.as_deref())
                .await?;
            println!("{}", item.generated_sql);
        }
        Command::Health => {
            let status = workbench.natural.generator().health().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

fn run_csv(workbench: &mut Workbench, command: CsvCommand) -> Result<(), WorkbenchError> {
    match command {
        CsvCommand::Import { file } => {
            let imported = workbench.datasets.import_csv_file(&file)?;
            println!(
                "{}: {} columns, {} rows",
                imported.name,
                imported.columns.len(),
                imported.rows.len()
            );
        }
        CsvCommand::List => {
            for dataset in workbench.datasets.datasets() {
                println!(
                    "{}\t{}\t{} rows",
                    dataset.name,
                    dataset.columns.join(","),
                    dataset.rows.len()
                );
            }
        }
        CsvCommand::Export { name, output } => {
            let dataset = workbench
                .datasets
                .find(&name)
                .ok_or_else(|| WorkbenchError::NotFound(format!("dataset {}", name)))?
                .dataset();
            match output {
                Some(path) => export_to_csv(&dataset, &path)?,
                None => print!("{}", to_csv_string(&dataset)?),
            }
        }
        CsvCommand::Clear => workbench.datasets.clear_datasets(),
    }
    Ok(())
}

fn run_schema(workbench: &mut Workbench, command: SchemaCommand) -> Result<(), WorkbenchError> {
    let store = &mut workbench.schema;
    match command {
        SchemaCommand::Show => println!("{}", store.export_schema()?),
        SchemaCommand::Validate { file } => {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(file)?)?;
            let validation = validate_schema(&value);
            match validation.message {
                Some(message) => println!("invalid: {}", message),
                None => println!("valid"),
            }
        }
        SchemaCommand::Import { file } => {
            store.import_schema(&fs::read_to_string(file)?)?;
            println!("schema imported");
        }
        SchemaCommand::Export { output } => {
            let json = store.export_schema()?;
            match output {
                Some(path) => fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        SchemaCommand::Reset => store.reset_schema()?,
        SchemaCommand::Ddl {
            compact,
            hints,
            table,
        } => {
            let schema = store.schema();
            let sql = match (compact, hints, table) {
                (true, _, _) => compact_schema_to_sql(schema),
                (_, true, _) => schema_with_data_hints(schema),
                (_, _, Some(table)) => {
                    let sql = extract_table_schema(schema, &table);
                    if sql.is_empty() {
                        return Err(WorkbenchError::NotFound(format!("table {}", table)));
                    }
                    sql
                }
                _ => schema_to_sql(schema),
            };
            print!("{}", sql);
        }
        SchemaCommand::Tables => {
            for name in all_table_names(store.schema()) {
                println!("{}", name.full_name);
            }
        }
    }
    Ok(())
}

use api::NaturalSqlClient;
use config::Config;
use errors::Result;
use natural::NaturalQuery;
use query::QueryRunner;
use storage::FileStore;
use stores::{DatasetStore, SchemaStore};

pub mod api;
pub mod config;
pub mod delimited;
pub mod errors;
pub mod models;
pub mod natural;
pub mod query;
pub mod schema;
pub mod storage;
pub mod stores;

pub use delimited::parse_csv;
pub use errors::WorkbenchError;
pub use schema::{schema_to_sql, validate_schema};

/// Everything a front end needs, wired to file-backed storage.
pub struct Workbench {
    pub config: Config,
    pub schema: SchemaStore<FileStore>,
    pub datasets: DatasetStore<FileStore>,
    pub queries: QueryRunner,
    pub natural: NaturalQuery<NaturalSqlClient>,
}

impl Workbench {
    pub fn open(config: Config) -> Result<Self> {
        let storage = FileStore::new(config.data_dir.clone());
        let client = NaturalSqlClient::new(&config)?;

        Ok(Workbench {
            schema: SchemaStore::open(storage.clone()),
            datasets: DatasetStore::open(storage),
            queries: QueryRunner::new(),
            natural: NaturalQuery::new(client),
            config,
        })
    }
}

pub mod export;
pub mod parser;

pub use export::{export_to_csv, to_csv_string, write_csv};
pub use parser::parse_csv;

pub mod dataset;
pub mod example;
pub mod history;
pub mod schema;

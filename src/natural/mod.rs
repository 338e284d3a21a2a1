pub mod assistant;
pub mod history;

pub use assistant::{schema_context, NaturalQuery};
pub use history::{NaturalQueryHistory, NaturalQueryStats};

pub mod runner;

pub use runner::{QueryHandle, QueryRunner};

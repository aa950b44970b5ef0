//! A small in-memory relational database engine: a regex-driven SQL
//! parser, a B-tree index, a process-wide table catalog, and an
//! executor tying them together behind a single [`Engine::execute`]
//! entry point.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod executor;
pub mod index;
pub mod parser;
pub mod schema;
pub mod value;

pub use engine::Engine;
pub use error::{EngineError, Result};
pub use executor::ResultRecord;
pub use value::Value;

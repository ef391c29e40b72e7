//! mealdb-vector
//!
//! Vector-index backends for meal search: a read-only LanceDB adapter over
//! the ingested meal table, and an exact in-memory index.
pub mod memory;
pub mod schema;
pub mod search;
pub mod table;

pub use memory::MemoryIndex;
pub use search::LanceMealIndex;

//! mealdb-cli
//!
//! Terminal front end for meal search: outcome rendering and the
//! interactive read-search-print loop behind the `meal-search` binary.
pub mod display;
pub mod repl;

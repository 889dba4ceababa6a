//! Quiz parsing and data structures module
//!
//! This module turns the generator's free-text answer into a structured,
//! ordered list of questions.

pub mod models;
pub mod parser;
pub mod parsing;
pub mod query;

pub use models::*;
pub use parser::parse;
pub use parsing::classify::{LineKind, classify_line};
pub use query::*;

//! Line-level parsing utilities
//!
//! This module contains the classifier that tags each line of generator
//! output and the answer-token extraction it relies on.

pub(crate) mod answer;
pub mod classify;

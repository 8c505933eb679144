//! Score sheet handling
//!
//! This module covers the tabular half of an evaluation round: writing the
//! CSV template an evaluator fills in, parsing the filled sheet back in
//! (tolerating the column-name variants that show up in the wild), and
//! joining rows onto a batch by sequence number or normalized filename.

pub mod join;
pub mod parser;
pub mod types;

// Re-export main public API
pub use join::normalize_key;
pub use parser::{load_scores, parse_scores, write_merged, write_template};
pub use types::{Evaluation, ScoreSheet};

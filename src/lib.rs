//! # photograde
//!
//! A Rust library for the image evaluation round-trip: batch in, review
//! material out, scores back, scored export.
//!
//! ## Features
//!
//! - **Batch ingest**: load an ordered image batch from files or a folder
//! - **Score sheets**: write the CSV template, parse filled sheets back in
//!   (tolerant of header variants), join rows to images by sequence number
//!   or normalized filename
//! - **Contact sheet**: paginated PDF thumbnail grid with captions and
//!   instruction text for the evaluator
//! - **Scored export**: ZIP of the original images renamed to embed their
//!   scores and a sanitized comment
//!
//! ## Example - template and merge
//!
//! ```rust,ignore
//! use photograde::batch::ImageBatch;
//! use photograde::scores::{load_scores, write_template};
//!
//! let batch = ImageBatch::from_dir("shots".as_ref())?;
//! write_template(std::fs::File::create("scores.csv")?, &batch)?;
//! // ... evaluator fills the sheet in ...
//! let sheet = load_scores("scores.csv".as_ref())?;
//! let ranked = sheet.ranked(&batch);
//! ```
//!
//! ## Example - contact sheet
//!
//! ```rust,ignore
//! use photograde::sheet::{SheetOptions, render_contact_sheet};
//!
//! let pdf = render_contact_sheet(&batch, Some(&sheet), &SheetOptions::default())?;
//! std::fs::write("review.pdf", pdf)?;
//! ```

pub mod batch;
pub mod error;
pub mod export;
pub mod scores;
pub mod sheet;

// Re-export commonly used items
pub use batch::{ImageBatch, ImageRecord};
pub use error::{Error, Result};
pub use export::{scored_file_name, write_archive, write_archive_file};
pub use scores::{Evaluation, ScoreSheet, load_scores, parse_scores, write_merged, write_template};
pub use sheet::{SheetOptions, render_contact_sheet};

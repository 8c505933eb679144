//! Contact sheet generation
//!
//! Renders a batch as a paginated PDF grid of thumbnails for the external
//! evaluator: a header band with title, page numbers, and optional
//! instruction text, then a fixed-column grid where each cell holds an
//! aspect-fit thumbnail and a caption (sequence name, plus the score
//! summary when a sheet is attached).

pub mod layout;
pub mod pdf;

use std::path::PathBuf;

pub use layout::{A4_PORTRAIT, GridLayout, GridOptions, PageSize, Rect, fit_rect};
pub use pdf::{render_contact_sheet, render_contact_sheet_file};

/// Options for one contact sheet render.
#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Title shown in every page header.
    pub title: String,
    /// Instruction text for the evaluator, printed on the first page.
    pub notes: Option<String>,
    pub grid: GridOptions,
    /// External TTF for captions that need more than the builtin font's
    /// repertoire. Without it captions degrade to ASCII.
    pub font: Option<PathBuf>,
    /// Longest thumbnail side embedded in the PDF, in pixels. Source
    /// images are downscaled to this bound before embedding.
    pub max_thumb_px: u32,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            title: "Image evaluation sheet".to_string(),
            notes: None,
            grid: GridOptions::default(),
            font: None,
            max_thumb_px: 640,
        }
    }
}

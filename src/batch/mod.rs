//! Image batch ingest
//!
//! A batch is the ordered set of images one evaluation round works on.
//! Records keep the raw upload bytes; decoding happens on demand so the
//! ZIP export can pass payloads through untouched.
//!
//! Ordering is the identity of a record: the zero-based position assigns
//! the sequence name (`No1.png`, `No2.png`, ...) that score sheets key on.

pub mod thumbnail;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// File extensions accepted by directory ingest.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One image in a batch: positional index, source bytes, optional
/// original filename.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Zero-based position within the batch.
    pub index: usize,
    /// Filename the image arrived with, if it came from disk.
    pub file_name: Option<String>,
    /// Raw file bytes, exactly as read.
    pub bytes: Vec<u8>,
}

impl ImageRecord {
    /// Canonical per-position name used as the score-sheet join key.
    pub fn sequence_name(&self) -> String {
        format!("No{}.png", self.index + 1)
    }

    /// Name shown to the user: the original filename when known,
    /// otherwise the sequence name.
    pub fn display_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| self.sequence_name())
    }

    /// Decode the record's bytes into pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        let img = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()?
            .decode()?;
        Ok(img)
    }

    /// Extension for exported copies, sniffed from the payload rather
    /// than the filename. Unknown payloads fall back to `png`.
    pub fn export_extension(&self) -> &'static str {
        match image::guess_format(&self.bytes) {
            Ok(ImageFormat::Jpeg) => "jpg",
            _ => "png",
        }
    }
}

/// Ordered collection of image records for one evaluation round.
#[derive(Debug, Clone, Default)]
pub struct ImageBatch {
    records: Vec<ImageRecord>,
}

impl ImageBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a batch from explicit file paths, in the order given.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut batch = Self::new();
        for path in paths {
            let path = path.as_ref();
            if !has_supported_extension(path) {
                return Err(Error::NotAnImage {
                    path: path.to_path_buf(),
                });
            }
            let bytes = fs::read(path)?;
            batch.push_bytes(file_name_of(path), bytes);
        }
        Ok(batch)
    }

    /// Load every supported image directly inside `dir`, sorted by
    /// filename so batch order is deterministic across runs.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_supported_extension(p))
            .collect();
        paths.sort_by_key(|p| file_name_of(p).unwrap_or_default());

        let mut batch = Self::new();
        for path in &paths {
            let bytes = fs::read(path)?;
            batch.push_bytes(file_name_of(path), bytes);
        }
        Ok(batch)
    }

    /// Append a record; the batch assigns its position.
    pub fn push_bytes(&mut self, file_name: Option<String>, bytes: Vec<u8>) {
        let index = self.records.len();
        self.records.push(ImageRecord {
            index,
            file_name,
            bytes,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

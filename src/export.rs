//! Scored ZIP export.
//!
//! Re-packages a batch with the scores folded into the entry names:
//! `No3_9_8_7_6_strong_colors.png`. Entries carry the original payload
//! bytes; only the name changes. The sequence prefix keeps every entry
//! name unique, so the archive always holds exactly one entry per image.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::batch::ImageBatch;
use crate::error::{Error, Result};
use crate::scores::{Evaluation, ScoreSheet};

/// Character budget for the comment slot of an entry name, counted in
/// characters rather than bytes so multi-byte text truncates cleanly.
pub const DEFAULT_COMMENT_LEN: usize = 30;

/// Replace path-unsafe characters with their full-width counterparts,
/// spaces with underscores, and strip line breaks. The result is safe as
/// a single archive entry name on every platform.
pub fn sanitize_component(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '/' => Some('／'),
            '\\' => Some('＼'),
            ':' => Some('：'),
            '*' => Some('＊'),
            '?' => Some('？'),
            '"' => Some('”'),
            '<' => Some('＜'),
            '>' => Some('＞'),
            '|' => Some('｜'),
            ' ' => Some('_'),
            '\n' | '\r' => None,
            other => Some(other),
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Entry name for one image: sequence number, the four score slots, and
/// the truncated comment, joined by underscores. Unscored images keep
/// empty slots (`No2_____.png`), matching how blank cells come back from
/// the sheet.
pub fn scored_file_name(
    record: &crate::batch::ImageRecord,
    eval: Option<&Evaluation>,
    max_comment: usize,
) -> String {
    let blank = Evaluation::default();
    let eval = eval.unwrap_or(&blank);
    format!(
        "No{}_{}_{}_{}_{}_{}.{}",
        record.index + 1,
        sanitize_component(&eval.total),
        sanitize_component(&eval.buzz),
        sanitize_component(&eval.still),
        sanitize_component(&eval.video),
        truncate_chars(&sanitize_component(&eval.reason), max_comment),
        record.export_extension()
    )
}

/// Write the scored archive to any seekable sink.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    batch: &ImageBatch,
    sheet: Option<&ScoreSheet>,
    max_comment: usize,
) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let attached = sheet.map(|s| s.attach(batch));
    let mut zip = ZipWriter::new(writer);
    // Image payloads are already compressed containers.
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);

    for record in batch.iter() {
        let eval = attached
            .as_ref()
            .and_then(|slots| slots[record.index]);
        let name = scored_file_name(record, eval, max_comment);
        zip.start_file(name, options)?;
        zip.write_all(&record.bytes)?;
    }
    zip.finish()?;
    Ok(())
}

/// Write the scored archive to a file path.
pub fn write_archive_file(
    path: &Path,
    batch: &ImageBatch,
    sheet: Option<&ScoreSheet>,
    max_comment: usize,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_archive(file, batch, sheet, max_comment)
}

//! CSV reading and writing for score sheets.
//!
//! The read path is tolerant: headers may use any of the accepted aliases
//! (see [`Evaluation`]), fields are whitespace-trimmed, unknown columns are
//! ignored, and fully blank rows are skipped. A sheet with no key column at
//! all is rejected outright rather than matched best-effort.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use tracing::warn;

use crate::batch::ImageBatch;
use crate::error::{Error, Result};
use crate::scores::types::{Evaluation, ScoreSheet};

/// Normalized header spellings that can serve as a join key.
const KEY_HEADERS: &[&str] = &["no", "index", "#", "number", "filename", "file", "name", "image"];

/// Parse a score sheet from CSV.
///
/// Returns an error when the CSV structure is unreadable or when no key
/// column is present; rows that merely lack a key are kept (with a
/// warning) and dropped later by the join.
pub fn parse_scores<R: Read>(reader: R) -> Result<ScoreSheet> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    ensure_key_column(rdr.headers()?)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<Evaluation>().enumerate() {
        let row = result?;
        if row == Evaluation::default() {
            continue;
        }
        if !row.has_key() {
            // Line 1 is the header, so data row i lives on line i + 2.
            warn!(line = i + 2, "score row has no join key and will match no image");
        }
        rows.push(row);
    }
    Ok(ScoreSheet::new(rows))
}

/// Parse a score sheet from a file on disk.
pub fn load_scores(path: &Path) -> Result<ScoreSheet> {
    parse_scores(File::open(path)?)
}

/// Write the empty template for a batch: one row per image, sequence
/// number and sequence name filled in, score fields blank.
pub fn write_template<W: Write>(writer: W, batch: &ImageBatch) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let mut wtr = Writer::from_writer(writer);
    for record in batch.iter() {
        wtr.serialize(Evaluation {
            no: Some(record.index + 1),
            file_name: Some(record.sequence_name()),
            ..Default::default()
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the normalized merge of a sheet onto a batch: canonical columns,
/// one row per image in batch order, scores filled where a row matched.
/// The output is itself a valid [`parse_scores`] input.
pub fn write_merged<W: Write>(writer: W, batch: &ImageBatch, sheet: &ScoreSheet) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let attached = sheet.attach(batch);
    let mut wtr = Writer::from_writer(writer);
    for record in batch.iter() {
        let mut row = match attached[record.index] {
            Some(eval) => eval.clone(),
            None => Evaluation::default(),
        };
        row.no = Some(record.index + 1);
        row.file_name = Some(record.sequence_name());
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn ensure_key_column(headers: &StringRecord) -> Result<()> {
    let found = headers
        .iter()
        .any(|h| KEY_HEADERS.contains(&normalize_header(h).as_str()));
    if found { Ok(()) } else { Err(Error::MissingKeyColumn) }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_headers() {
        let csv = "No,FileName,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n\
                   1,No1.png,9,8,7,6,strong colors\n";
        let sheet = parse_scores(csv.as_bytes()).unwrap();
        assert_eq!(sheet.len(), 1);
        let row = &sheet.rows()[0];
        assert_eq!(row.no, Some(1));
        assert_eq!(row.file_name.as_deref(), Some("No1.png"));
        assert_eq!(row.total, "9");
        assert_eq!(row.reason, "strong colors");
    }

    #[test]
    fn test_parse_alias_headers() {
        let csv = "Index,Total,Comment\n2,7.5,fine\n";
        let sheet = parse_scores(csv.as_bytes()).unwrap();
        let row = &sheet.rows()[0];
        assert_eq!(row.no, Some(2));
        assert_eq!(row.total, "7.5");
        assert_eq!(row.reason, "fine");
        assert_eq!(row.buzz, "", "missing columns default to empty");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let csv = "FileName,TotalScore\n  No1.png  ,  9 \n";
        let sheet = parse_scores(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows()[0].file_name.as_deref(), Some("No1.png"));
        assert_eq!(sheet.rows()[0].total, "9");
    }

    #[test]
    fn test_missing_key_column_is_rejected() {
        let csv = "TotalScore,Reason\n9,ok\n";
        let err = parse_scores(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingKeyColumn));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let csv = "No,TotalScore\n1,9\n,\n2,8\n";
        let sheet = parse_scores(csv.as_bytes()).unwrap();
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let csv = "No,FileName,TotalScore\n1,No1.png,9,extra,fields\n";
        assert!(parse_scores(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_non_numeric_total_is_kept_raw() {
        let csv = "No,TotalScore\n1,n/a\n";
        let sheet = parse_scores(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows()[0].total, "n/a");
        assert_eq!(sheet.rows()[0].total_score(), None);
    }
}

//! Joining score rows onto an image batch.
//!
//! A row resolves through its explicit sequence number when present,
//! otherwise through a normalized filename match against the image's
//! sequence name or original filename. Every row lands on at most one
//! image; rows that resolve nowhere are dropped with a warning.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use crate::batch::ImageBatch;
use crate::scores::types::{Evaluation, ScoreSheet};

/// Normalize a filename for key comparison: lowercase, all whitespace
/// removed. `" No1.PNG "` and `"no1.png"` are the same key.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl ScoreSheet {
    /// Resolve every row against the batch, producing a per-image slot.
    /// When several rows land on the same image the later row wins.
    pub fn attach<'a>(&'a self, batch: &ImageBatch) -> Vec<Option<&'a Evaluation>> {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        // Sequence names first so an original file that happens to be
        // called "No2.png" cannot shadow position 2.
        for record in batch.iter() {
            by_name.insert(normalize_key(&record.sequence_name()), record.index);
        }
        for record in batch.iter() {
            if let Some(name) = &record.file_name {
                by_name.entry(normalize_key(name)).or_insert(record.index);
            }
        }

        let mut attached: Vec<Option<&Evaluation>> = vec![None; batch.len()];
        for row in self.iter() {
            let index = match row.no {
                Some(no) if no >= 1 && no <= batch.len() => Some(no - 1),
                Some(no) => {
                    warn!(no, batch = batch.len(), "sequence number outside batch; row dropped");
                    None
                }
                None => row
                    .file_name
                    .as_deref()
                    .and_then(|name| by_name.get(&normalize_key(name)).copied()),
            };

            match index {
                Some(i) => {
                    if attached[i].is_some() {
                        warn!(image = i + 1, "duplicate score row; keeping the later one");
                    }
                    attached[i] = Some(row);
                }
                None => {
                    let key = row.file_name.as_deref().unwrap_or("<none>");
                    warn!(key, "score row matched no image; row dropped");
                }
            }
        }
        attached
    }

    /// Matched (image index, evaluation) pairs ordered by descending
    /// numeric total. Rows without a numeric total come last; batch order
    /// is preserved among equals.
    pub fn ranked<'a>(&'a self, batch: &ImageBatch) -> Vec<(usize, &'a Evaluation)> {
        let mut pairs: Vec<(usize, &Evaluation)> = self
            .attach(batch)
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|eval| (i, eval)))
            .collect();

        pairs.sort_by(|a, b| match (a.1.total_score(), b.1.total_score()) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        pairs
    }
}

use serde::{Deserialize, Serialize};

/// One evaluator row: an optional explicit sequence number, an optional
/// filename key, four score axes, and a free-text reason.
///
/// Scores stay raw strings: the sheet is external input and a value like
/// `"9?"` must survive to display and export unchanged. Ranking parses
/// numbers on demand via [`Evaluation::total_score`].
///
/// The serde attributes double as the column-variant table: `rename` is
/// the canonical header this tool writes, `alias` covers the spellings
/// accepted on the way back in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    #[serde(rename = "No", alias = "no", alias = "Index", alias = "index", alias = "#")]
    pub no: Option<usize>,

    #[serde(
        rename = "FileName",
        alias = "filename",
        alias = "File",
        alias = "file",
        alias = "Name",
        alias = "name",
        alias = "Image",
        alias = "image"
    )]
    pub file_name: Option<String>,

    #[serde(rename = "TotalScore", alias = "Total", alias = "total")]
    pub total: String,

    #[serde(rename = "BuzzScore", alias = "Buzz", alias = "buzz")]
    pub buzz: String,

    #[serde(rename = "StillScore", alias = "Still", alias = "still")]
    pub still: String,

    #[serde(rename = "VideoScore", alias = "Video", alias = "video")]
    pub video: String,

    #[serde(rename = "Reason", alias = "reason", alias = "Comment", alias = "comment")]
    pub reason: String,
}

impl Evaluation {
    /// Numeric total for ranking. Unparseable or NaN totals return None
    /// and sort after every numeric row.
    pub fn total_score(&self) -> Option<f64> {
        self.total
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
    }

    pub fn has_key(&self) -> bool {
        self.no.is_some() || self.file_name.is_some()
    }

    /// Whether any score or reason field carries a value.
    pub fn is_scored(&self) -> bool {
        !(self.total.is_empty()
            && self.buzz.is_empty()
            && self.still.is_empty()
            && self.video.is_empty()
            && self.reason.is_empty())
    }

    /// Compact one-line score summary for captions: `T:9 B:8 S:7 V:6`.
    /// Empty axes show as `-`.
    pub fn score_line(&self) -> String {
        let slot = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
        format!(
            "T:{} B:{} S:{} V:{}",
            slot(&self.total),
            slot(&self.buzz),
            slot(&self.still),
            slot(&self.video)
        )
    }
}

/// An ordered score sheet as parsed from CSV.
#[derive(Debug, Clone, Default)]
pub struct ScoreSheet {
    rows: Vec<Evaluation>,
}

impl ScoreSheet {
    pub fn new(rows: Vec<Evaluation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Evaluation] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Evaluation> {
        self.rows.iter()
    }
}

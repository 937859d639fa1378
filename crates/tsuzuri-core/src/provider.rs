//! The candidate provider seam and the request options that travel with
//! every conversion call.

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, ConversionResult};
use crate::composing::ComposingBuffer;
use crate::piece::InputStyle;

/// One user dictionary entry, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDictEntry {
    pub word: String,
    pub reading: String,
    #[serde(default)]
    pub score: f64,
}

/// A dynamic dictionary entry whose surface is a formatted date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateShortcut {
    /// strftime-style format for the surface form.
    pub format: String,
    /// Katakana reading that triggers the shortcut.
    pub reading: String,
    /// Offset from today, in days. `None` means the template is not
    /// day-based (month/year forms).
    pub day_delta: Option<i64>,
    pub score: f64,
}

/// The built-in date shortcut table.
pub fn date_shortcuts() -> Vec<DateShortcut> {
    fn day(format: &str, reading: &str, delta: i64, score: f64) -> DateShortcut {
        DateShortcut {
            format: format.to_owned(),
            reading: reading.to_owned(),
            day_delta: Some(delta),
            score,
        }
    }
    fn fixed(format: &str, reading: &str, score: f64) -> DateShortcut {
        DateShortcut {
            format: format.to_owned(),
            reading: reading.to_owned(),
            day_delta: None,
            score,
        }
    }
    vec![
        day("%m/%d", "オトトイ", -2, -10.0),
        day("%m/%d", "キノウ", -1, -10.0),
        day("%m/%d", "キョウ", 0, -10.0),
        day("%Y/%m/%d", "キョウ", 0, -10.5),
        day("%Y年%m月%d日", "キョウ", 0, -11.0),
        day("%m/%d", "アシタ", 1, -10.0),
        day("%m/%d", "アサッテ", 2, -10.0),
        fixed("%m月", "コンゲツ", -10.0),
        fixed("%Y年", "コトシ", -10.0),
    ]
}

/// Per-request knobs passed to [`CandidateProvider::request`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Text immediately left of the insertion point, already cleaned.
    pub left_context: String,
    /// Request the full candidate list rather than just the best row.
    pub rich_candidates: bool,
    /// Learning weight in `0.0..=1.0`; zero disables personalization.
    pub personalization: f32,
    pub user_dictionary: Vec<UserDictEntry>,
    pub date_shortcuts: Vec<DateShortcut>,
    pub input_style: InputStyle,
}

/// Conversion backend. The engine drives it with the current buffer
/// prefix and consumes the candidate lists it returns.
pub trait CandidateProvider {
    fn request(&mut self, prefix: &ComposingBuffer, options: &ConvertOptions) -> ConversionResult;

    /// The user committed this candidate; fold it into adaptation data.
    fn commit_learning(&mut self, candidate: &Candidate);

    /// The user asked to forget this candidate's adaptation data.
    fn forget(&mut self, candidate: &Candidate);

    /// Composition ended; flush any per-composition state.
    fn stop_composition(&mut self);
}

/// Source of the text to the left of the caret in the host application.
pub trait LeftContextSource {
    fn left_context(&self, max_chars: usize) -> Option<String>;
}

/// Always-empty context, for hosts that expose no surrounding text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

impl LeftContextSource for NoContext {
    fn left_context(&self, _max_chars: usize) -> Option<String> {
        None
    }
}

/// Reduce raw surrounding text to the portion usable as left context:
/// the final line, with leading whitespace stripped.
pub fn clean_left_context(raw: &str) -> String {
    let last_line = raw.rsplit(['\n', '\r']).next().unwrap_or("");
    last_line.trim_start().to_owned()
}

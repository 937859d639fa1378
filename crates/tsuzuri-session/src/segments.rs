//! Composition buffer management: candidate bookkeeping, clause
//! editing, marked text, and the candidate window model.

use tracing::debug;

use tsuzuri_core::candidate::{Candidate, ComposingExtent, ConversionResult};
use tsuzuri_core::composing::ComposingBuffer;
use tsuzuri_core::config::Config;
use tsuzuri_core::host::{Focus, MarkedSegment, MarkedText};
use tsuzuri_core::piece::{InputPiece, InputStyle};
use tsuzuri_core::provider::{date_shortcuts, CandidateProvider, ConvertOptions, UserDictEntry};
use tsuzuri_core::transform;

use crate::state::InputState;

const DEBUG_LOG_CAP: usize = 100;

/// Wrap `current + delta` around a list of `len` rows.
pub(crate) fn cyclic_index(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    let next = (current as i64 + delta as i64).rem_euclid(len);
    next as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastOperation {
    Insert,
    Delete,
    EditSegment,
    Other,
}

/// What the candidate window should display.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateWindow {
    Hidden,
    /// Best row pinned while composing without live conversion.
    Inline {
        candidates: Vec<Candidate>,
        selection: usize,
    },
    /// Full list during explicit selection.
    List {
        candidates: Vec<Candidate>,
        selection: usize,
    },
}

pub struct SegmentManager<P> {
    provider: P,
    config: Config,
    buffer: ComposingBuffer,
    input_style: InputStyle,
    user_dictionary: Vec<UserDictEntry>,

    raw_candidates: Option<ConversionResult>,
    /// Candidates injected by reconversion; they shadow raw results.
    reconversion_candidates: Option<Vec<Candidate>>,

    selection_index: Option<usize>,
    did_edit_segment: bool,
    last_operation: LastOperation,
    show_candidate_window: bool,

    debug_window_enabled: bool,
    debug_candidates: Vec<Candidate>,

    replace_suggestions: Vec<Candidate>,
    suggestion_index: Option<usize>,
}

impl<P: CandidateProvider> SegmentManager<P> {
    pub fn new(provider: P, config: Config) -> Self {
        SegmentManager {
            provider,
            config,
            buffer: ComposingBuffer::new(),
            input_style: InputStyle::default(),
            user_dictionary: Vec::new(),
            raw_candidates: None,
            reconversion_candidates: None,
            selection_index: None,
            did_edit_segment: false,
            last_operation: LastOperation::Other,
            show_candidate_window: false,
            debug_window_enabled: false,
            debug_candidates: Vec::new(),
            replace_suggestions: Vec::new(),
            suggestion_index: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn set_input_style(&mut self, style: InputStyle) {
        self.input_style = style;
    }

    pub fn set_user_dictionary(&mut self, entries: Vec<UserDictEntry>) {
        self.user_dictionary = entries;
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn convert_target(&self) -> String {
        self.buffer.convert_target()
    }

    pub fn append_debug_message(&mut self, message: &str) {
        debug!("{message}");
        self.debug_candidates.insert(
            0,
            Candidate::plain(
                message.replace('\n', "\\n"),
                0.0,
                ComposingExtent::Chars(0),
            ),
        );
        self.debug_candidates.truncate(DEBUG_LOG_CAP);
    }

    fn options(&self, left_context: Option<&str>, rich: bool) -> ConvertOptions {
        ConvertOptions {
            left_context: left_context.unwrap_or("").to_owned(),
            rich_candidates: rich,
            personalization: self.config.personalization,
            user_dictionary: self.user_dictionary.clone(),
            date_shortcuts: date_shortcuts(),
            input_style: self.input_style.clone(),
        }
    }

    fn update_raw_candidates(&mut self, rich: bool, left_context: Option<&str>) {
        if self.buffer.is_empty() {
            self.raw_candidates = None;
            self.reconversion_candidates = None;
            self.provider.stop_composition();
            return;
        }
        let prefix = self.buffer.prefix_to_cursor();
        let options = self.options(left_context, rich);
        self.raw_candidates = Some(self.provider.request(&prefix, &options));
    }

    /// Refresh candidates and reveal the window.
    pub fn update(&mut self, rich: bool, left_context: Option<&str>) {
        self.update_raw_candidates(rich, left_context);
        self.show_candidate_window = true;
    }

    pub fn insert(&mut self, pieces: Vec<InputPiece>, left_context: Option<&str>) {
        self.buffer.insert_at_cursor(pieces);
        self.last_operation = LastOperation::Insert;
        // Without live conversion the window opens as soon as typing starts.
        self.show_candidate_window = !self.config.live_conversion;
        self.update_raw_candidates(false, left_context);
    }

    /// Mark a conversion boundary at the end of the buffer.
    pub fn insert_separator(&mut self, skip_update: bool, left_context: Option<&str>) {
        if matches!(self.buffer.last_piece(), Some(p) if p.is_separator()) {
            return;
        }
        self.buffer.insert_at_cursor(vec![InputPiece::Separator]);
        self.last_operation = LastOperation::Insert;
        if !skip_update {
            self.update_raw_candidates(false, left_context);
        }
    }

    pub fn delete_backward(&mut self, count: usize, left_context: Option<&str>) {
        if !self.buffer.is_at_end() {
            self.buffer.move_cursor_to_end();
            self.did_edit_segment = false;
        }
        self.buffer.delete_backward(count);
        self.last_operation = LastOperation::Delete;
        self.show_candidate_window = !self.config.live_conversion;
        self.update_raw_candidates(false, left_context);
    }

    pub fn edit_segment(&mut self, count: i32, left_context: Option<&str>) {
        // Snap the cursor to the committed prefix of the selected row
        // before widening or narrowing.
        if let Some(selected) = self.selected_candidate() {
            let mut probe = self.buffer.clone();
            probe.prefix_complete(selected.extent);
            let prefix_chars = self.buffer.char_len() - probe.char_len();
            let cursor = self.buffer.cursor() as i32;
            self.buffer.move_cursor(prefix_chars as i32 - cursor);
        }
        if count > 0 && self.buffer.is_at_end() && !self.did_edit_segment {
            // From the right edge, restart at `count` chars from the left.
            let cursor = self.buffer.cursor() as i32;
            self.buffer.move_cursor(count - cursor);
        } else {
            self.buffer.move_cursor(count);
        }
        if self.buffer.is_at_start() {
            self.buffer.move_cursor(1);
        }
        self.last_operation = LastOperation::EditSegment;
        self.did_edit_segment = true;
        self.show_candidate_window = true;
        self.selection_index = None;
        self.update_raw_candidates(false, left_context);
    }

    /// The candidate list currently in effect. Reconversion results
    /// shadow conversion results; before any clause editing the first
    /// clause rows are merged in ahead of full-buffer rows.
    pub fn effective_candidates(&self) -> Option<Vec<Candidate>> {
        if let Some(recon) = &self.reconversion_candidates {
            return Some(recon.clone());
        }
        let raw = self.raw_candidates.as_ref()?;
        if self.did_edit_segment {
            return Some(raw.main_results.clone());
        }
        if raw
            .first_clause_results
            .iter()
            .any(|c| self.buffer.is_whole(c.extent))
        {
            // A first-clause row already spans the whole buffer; the
            // merged list would only duplicate it.
            return Some(raw.main_results.clone());
        }
        let mut merged = raw.first_clause_results.clone();
        merged.extend(
            raw.main_results
                .iter()
                .filter(|c| !raw.first_clause_results.iter().any(|f| f.text == c.text))
                .cloned(),
        );
        Some(merged)
    }

    pub fn selected_candidate(&self) -> Option<Candidate> {
        let index = self.selection_index?;
        self.effective_candidates()?.get(index).cloned()
    }

    pub fn select_next_candidate(&mut self) {
        self.selection_index = Some(match self.selection_index {
            Some(i) => i + 1,
            None => 0,
        });
    }

    pub fn select_prev_candidate(&mut self) {
        self.selection_index = Some(match self.selection_index {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
    }

    pub fn select_row(&mut self, index: usize) {
        self.selection_index = Some(index);
    }

    pub fn reset_selection(&mut self) {
        self.selection_index = None;
    }

    pub fn forget_selected(&mut self) {
        if let Some(candidate) = self.selected_candidate() {
            self.provider.forget(&candidate);
            let words: Vec<&str> = candidate.entries.iter().map(|e| e.word.as_str()).collect();
            self.append_debug_message(&format!("forget {words:?}"));
        }
    }

    pub fn set_candidate_window_visible(&mut self, visible: bool) {
        self.show_candidate_window = visible;
    }

    pub fn set_debug_window(&mut self, enabled: bool) {
        self.debug_window_enabled = enabled;
    }

    // Suggestions

    pub fn set_replace_suggestions(&mut self, candidates: Vec<Candidate>) {
        self.replace_suggestions = candidates;
        self.suggestion_index = None;
    }

    pub fn clear_replace_suggestions(&mut self) {
        self.replace_suggestions.clear();
        self.suggestion_index = None;
    }

    pub fn select_next_suggestion(&mut self) {
        if self.replace_suggestions.is_empty() {
            return;
        }
        self.suggestion_index = Some(match self.suggestion_index {
            Some(i) => cyclic_index(i, 1, self.replace_suggestions.len()),
            None => 0,
        });
    }

    pub fn select_prev_suggestion(&mut self) {
        if self.replace_suggestions.is_empty() {
            return;
        }
        self.suggestion_index = Some(match self.suggestion_index {
            Some(i) => cyclic_index(i, -1, self.replace_suggestions.len()),
            None => self.replace_suggestions.len() - 1,
        });
    }

    pub fn current_suggestion(&self) -> Option<Candidate> {
        let index = self.suggestion_index?;
        self.replace_suggestions.get(index).cloned()
    }

    // Reconversion

    pub fn set_reconversion_candidates(&mut self, candidates: Vec<Candidate>) {
        let count = candidates.len();
        self.reconversion_candidates = Some(candidates);
        self.show_candidate_window = true;
        self.append_debug_message(&format!("reconversion: {count} candidates"));
    }

    /// Conversion rows for already-committed text: the original form,
    /// script variants, and kanji readings from the provider.
    pub fn build_reconversion_candidates(&mut self, text: &str) -> Vec<Candidate> {
        let extent = ComposingExtent::Chars(text.chars().count());
        let hiragana = transform::to_hiragana(text);
        let katakana = transform::to_katakana(&hiragana);

        let mut results = vec![Candidate::with_word(text, hiragana.clone(), extent)];
        if hiragana != text {
            let mut c = Candidate::with_word(hiragana.clone(), hiragana.clone(), extent);
            c.score = -1.0;
            results.push(c);
        }
        for mut candidate in self.kanji_candidates(&hiragana) {
            candidate.extent = extent;
            results.push(candidate);
        }
        for (variant, score) in [
            (katakana.clone(), -2.0),
            (transform::katakana_to_halfwidth(&katakana), -3.0),
            (transform::to_fullwidth_roman(text), -4.0),
            (transform::to_halfwidth_roman(text), -5.0),
        ] {
            if variant != text && !results.iter().any(|c| c.text == variant) {
                let mut c = Candidate::with_word(variant, hiragana.clone(), extent);
                c.score = score;
                results.push(c);
            }
        }
        results
    }

    fn kanji_candidates(&mut self, hiragana: &str) -> Vec<Candidate> {
        if hiragana.is_empty() {
            return Vec::new();
        }
        let mut temp = ComposingBuffer::new();
        temp.insert_at_cursor(hiragana.chars().map(InputPiece::Character).collect());
        let options = self.options(Some(""), false);
        let result = self.provider.request(&temp, &options);
        result
            .main_results
            .into_iter()
            .filter(|c| c.text != hiragana && !c.text.is_empty())
            .collect()
    }

    // Committing

    /// A committed prefix: feed learning, drop the consumed pieces, and
    /// reconvert the remainder with the committed text as context.
    pub fn prefix_candidate_committed(&mut self, candidate: &Candidate, left_context: &str) {
        self.provider.commit_learning(candidate);
        self.buffer.prefix_complete(candidate.extent);
        if !self.buffer.is_empty() {
            self.buffer.move_cursor_to_end();
            self.did_edit_segment = false;
            self.show_candidate_window = true;
            self.selection_index = None;
            let forced = format!("{left_context}{}", candidate.text);
            self.update_raw_candidates(true, Some(&forced));
            self.show_candidate_window = true;
        }
    }

    /// Commit everything currently displayed, returning the text.
    pub fn commit_marked_text(&mut self, state: &InputState) -> String {
        let marked = self.current_marked_text(state);
        let text = marked.concatenated();
        let committed = self
            .effective_candidates()
            .and_then(|cs| cs.into_iter().find(|c| c.text == text));
        if let Some(candidate) = committed {
            self.prefix_candidate_committed(&candidate, "");
        }
        self.stop_composition();
        text
    }

    /// Candidate covering the whole buffer under a ruby transform,
    /// for fixed-form commits. In selection the transform applies to
    /// the reading of the selected row.
    pub fn modified_ruby_candidate(
        &self,
        state: &InputState,
        transform: impl Fn(&str) -> String,
    ) -> Candidate {
        let (ruby, extent) = match state {
            InputState::Selecting => {
                match self.selected_candidate().and_then(|c| c.joined_ruby()) {
                    Some(ruby) => {
                        let extent = ComposingExtent::Chars(ruby.chars().count());
                        (ruby, extent)
                    }
                    None => (
                        self.buffer.convert_target(),
                        ComposingExtent::Units(self.buffer.unit_count()),
                    ),
                }
            }
            _ => (
                self.buffer.convert_target(),
                ComposingExtent::Units(self.buffer.unit_count()),
            ),
        };
        Candidate::with_word(transform(&ruby), ruby, extent)
    }

    /// Candidate built from the raw keystrokes rather than the kana
    /// reading, for the roman fixed-form commits.
    pub fn modified_roman_candidate(&self, transform: impl Fn(&str) -> String) -> Candidate {
        let raw = self.buffer.raw_input();
        Candidate::with_word(
            transform(&raw),
            raw.clone(),
            ComposingExtent::Units(self.buffer.unit_count()),
        )
    }

    // Display

    pub fn current_marked_text(&mut self, state: &InputState) -> MarkedText {
        match state {
            InputState::Inactive | InputState::AttachDiacritic(_) => MarkedText::default(),
            InputState::Composing => {
                let text = if self.last_operation == LastOperation::Delete {
                    // After deletion always show raw kana.
                    self.buffer.convert_target()
                } else if self.config.live_conversion && self.buffer.char_len() > 1 {
                    match self
                        .raw_candidates
                        .as_ref()
                        .and_then(|r| r.main_results.first())
                    {
                        Some(first) => first.text.clone(),
                        None => self.buffer.convert_target(),
                    }
                } else {
                    self.buffer.convert_target()
                };
                MarkedText::plain(text)
            }
            InputState::Previewing => {
                let whole = self
                    .raw_candidates
                    .as_ref()
                    .and_then(|r| r.main_results.first())
                    .filter(|c| self.buffer.is_whole(c.extent));
                match whole {
                    Some(first) => MarkedText::plain(first.text.clone()),
                    None => MarkedText::plain(self.buffer.convert_target()),
                }
            }
            InputState::Selecting => {
                let candidates = match self.effective_candidates() {
                    Some(cs) if !cs.is_empty() => cs,
                    _ => return MarkedText::plain(self.buffer.convert_target()),
                };
                let index = self
                    .selection_index
                    .unwrap_or(0)
                    .min(candidates.len() - 1);
                self.selection_index = Some(index);
                let selected = &candidates[index];
                let mut rest = self.buffer.clone();
                rest.prefix_complete(selected.extent);
                MarkedText {
                    segments: vec![
                        MarkedSegment {
                            content: selected.text.clone(),
                            focus: Focus::Focused,
                        },
                        MarkedSegment {
                            content: rest.convert_target(),
                            focus: Focus::Unfocused,
                        },
                    ],
                    selection_offset: Some(selected.text.chars().count()),
                }
            }
            InputState::ReplaceSuggestion => match self.current_suggestion() {
                Some(suggestion) => MarkedText {
                    segments: vec![MarkedSegment {
                        content: suggestion.text.clone(),
                        focus: Focus::Focused,
                    }],
                    selection_offset: Some(suggestion.text.chars().count()),
                },
                None => MarkedText::plain(self.buffer.convert_target()),
            },
        }
    }

    pub fn candidate_window(&mut self, state: &InputState) -> CandidateWindow {
        match state {
            InputState::Inactive
            | InputState::Previewing
            | InputState::ReplaceSuggestion
            | InputState::AttachDiacritic(_) => CandidateWindow::Hidden,
            InputState::Composing => {
                if self.config.live_conversion {
                    return CandidateWindow::Hidden;
                }
                match self
                    .raw_candidates
                    .as_ref()
                    .and_then(|r| r.main_results.first())
                {
                    Some(first) => CandidateWindow::Inline {
                        candidates: vec![first.clone()],
                        selection: 0,
                    },
                    None => CandidateWindow::Hidden,
                }
            }
            InputState::Selecting => {
                if self.debug_window_enabled {
                    let selection = self
                        .selection_index
                        .unwrap_or(0)
                        .min(self.debug_candidates.len().saturating_sub(1));
                    self.selection_index = Some(selection);
                    return CandidateWindow::List {
                        candidates: self.debug_candidates.clone(),
                        selection,
                    };
                }
                let candidates = match self.effective_candidates() {
                    Some(cs) if self.show_candidate_window && !cs.is_empty() => cs,
                    _ => return CandidateWindow::Hidden,
                };
                let selection = self.selection_index.unwrap_or(0).min(candidates.len() - 1);
                self.selection_index = Some(selection);
                CandidateWindow::List {
                    candidates,
                    selection,
                }
            }
        }
    }

    // Lifecycle

    pub fn activate(&mut self) {
        self.show_candidate_window = false;
    }

    pub fn deactivate(&mut self) {
        self.provider.stop_composition();
        self.buffer.stop_composition();
        self.raw_candidates = None;
        self.reconversion_candidates = None;
        self.did_edit_segment = false;
        self.last_operation = LastOperation::Other;
        self.show_candidate_window = false;
        self.selection_index = None;
    }

    /// Abandon the current composition.
    pub fn stop_composition(&mut self) {
        self.buffer.stop_composition();
        self.provider.stop_composition();
        self.raw_candidates = None;
        self.reconversion_candidates = None;
        self.did_edit_segment = false;
        self.last_operation = LastOperation::Other;
        self.show_candidate_window = false;
        self.selection_index = None;
    }

    /// Leave Japanese input without touching the host buffer.
    pub fn stop_japanese_input(&mut self) {
        self.raw_candidates = None;
        self.reconversion_candidates = None;
        self.did_edit_segment = false;
        self.last_operation = LastOperation::Other;
        self.show_candidate_window = false;
        self.selection_index = None;
    }
}

//! Stateful kana-kanji input session: key classification, the input
//! state machine, and command execution over a host client.
//!
//! `InputSession` owns the current editing state and processes each
//! keystroke, driving marked text and candidate window updates through
//! the [`HostClient`] the embedder supplies.

pub mod action;
pub mod classify;
pub mod command;
pub mod segments;
pub mod state;
pub mod suggest;

#[cfg(test)]
mod tests;

use tracing::debug_span;

use tsuzuri_core::candidate::{Candidate, ComposingExtent};
use tsuzuri_core::config::{Config, InputTable};
use tsuzuri_core::host::HostClient;
use tsuzuri_core::piece::{InputPiece, InputStyle};
use tsuzuri_core::provider::{clean_left_context, CandidateProvider, LeftContextSource};
use tsuzuri_core::transform;

use action::{EventModifiers, InputLanguage, UserAction};
use classify::{classify, RawKeyEvent};
use command::{Command, Directive, FixedTransform};
use segments::{CandidateWindow, SegmentManager};
use state::InputState;
use suggest::SuggestionRequest;

pub use tsuzuri_core::host::MarkedText;

const JAPANESE_MODE_ID: &str = "com.tsuzuri.inputmethod.Japanese";
const ROMAN_MODE_ID: &str = "com.tsuzuri.inputmethod.Roman";

const LEFT_CONTEXT_CHARS: usize = 30;
const SUGGESTION_PROMPT_CHARS: usize = 100;

/// What one key event produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Whether the session consumed the event. When false the host
    /// should process the keystroke itself.
    pub handled: bool,
    /// A suggestion request for the embedder to fulfill, if any.
    pub suggestion_request: Option<SuggestionRequest>,
}

impl EventOutcome {
    fn handled() -> Self {
        EventOutcome {
            handled: true,
            suggestion_request: None,
        }
    }
}

fn input_style_for(table: &InputTable) -> InputStyle {
    let name = match table {
        InputTable::RomanToKana => "roman_to_kana",
        InputTable::Azik => "azik",
        InputTable::KanaUs => "kana_us",
        InputTable::KanaJis => "kana_jis",
        InputTable::Custom(name) => name.as_str(),
    };
    InputStyle::Mapped(name.to_owned())
}

/// Stateful input session encapsulating all composition logic.
pub struct InputSession<P> {
    state: InputState,
    language: InputLanguage,
    segments: SegmentManager<P>,
    context: Box<dyn LeftContextSource>,

    suggestion_generation: u64,
    suggestion_panel_visible: bool,
}

impl<P: CandidateProvider> InputSession<P> {
    pub fn new(provider: P, config: Config, context: Box<dyn LeftContextSource>) -> Self {
        let style = input_style_for(&config.input_table);
        let mut segments = SegmentManager::new(provider, config);
        segments.set_input_style(style);
        InputSession {
            state: InputState::Inactive,
            language: InputLanguage::Japanese,
            segments,
            context,
            suggestion_generation: 0,
            suggestion_panel_visible: false,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn language(&self) -> InputLanguage {
        self.language
    }

    pub fn is_composing(&self) -> bool {
        !matches!(self.state, InputState::Inactive | InputState::AttachDiacritic(_))
    }

    pub fn segments(&mut self) -> &mut SegmentManager<P> {
        &mut self.segments
    }

    pub fn suggestion_panel_visible(&self) -> bool {
        self.suggestion_panel_visible
    }

    pub fn set_config(&mut self, config: Config) {
        let style = input_style_for(&config.input_table);
        self.segments.set_config(config);
        self.segments.set_input_style(style);
    }

    pub fn marked_text(&mut self) -> MarkedText {
        let state = self.state.clone();
        self.segments.current_marked_text(&state)
    }

    pub fn candidate_window(&mut self) -> CandidateWindow {
        let state = self.state.clone();
        self.segments.candidate_window(&state)
    }

    fn left_context(&self, max_chars: usize) -> Option<String> {
        self.context
            .left_context(max_chars)
            .map(|raw| clean_left_context(&raw))
    }

    /// Process one raw key event end to end.
    pub fn handle_event(&mut self, event: &RawKeyEvent, host: &mut dyn HostClient) -> EventOutcome {
        let action = classify(event, self.language, self.segments.config());
        self.handle_action(&action, event.modifiers, host)
    }

    /// Process an already-classified action.
    pub fn handle_action(
        &mut self,
        action: &UserAction,
        modifiers: EventModifiers,
        host: &mut dyn HostClient,
    ) -> EventOutcome {
        let _span = debug_span!("handle_action", ?action).entered();

        if let Some(outcome) = self.try_reconversion(action, host) {
            return outcome;
        }

        let (command, directive) = {
            let config = self.segments.config().clone();
            self.state
                .transition(action, modifiers, self.language, &config)
        };
        if command == Command::Passthrough {
            return EventOutcome::default();
        }

        let suggestion_request = self.apply(command, host);
        self.apply_directive(directive, host);
        self.refresh_marked_text(host);

        EventOutcome {
            handled: true,
            suggestion_request,
        }
    }

    /// Reconvert-style actions act on the host selection before the
    /// state machine sees them.
    fn try_reconversion(
        &mut self,
        action: &UserAction,
        host: &mut dyn HostClient,
    ) -> Option<EventOutcome> {
        let selected = || -> Option<String> {
            let range = host.selected_range().filter(|r| r.length > 0)?;
            host.string_in_range(range).filter(|t| !t.is_empty())
        };
        match action {
            UserAction::Reconvert => {
                if let Some(text) = selected() {
                    self.start_reconversion(&text, host);
                } else {
                    self.segments.append_debug_message("reconvert: no selection");
                }
                Some(EventOutcome::handled())
            }
            UserAction::ToJapanese => {
                // Kana key doubles as reconversion when text is selected.
                if let Some(text) = selected() {
                    self.start_reconversion(&text, host);
                    return Some(EventOutcome::handled());
                }
                None
            }
            _ => None,
        }
    }

    fn start_reconversion(&mut self, text: &str, host: &mut dyn HostClient) {
        let candidates = self.segments.build_reconversion_candidates(text);
        if candidates.is_empty() {
            self.segments
                .append_debug_message("reconversion: no candidates");
            return;
        }
        self.segments.set_reconversion_candidates(candidates);
        self.state = InputState::Selecting;
        self.refresh_marked_text(host);
    }

    fn apply(&mut self, command: Command, host: &mut dyn HostClient) -> Option<SuggestionRequest> {
        let left = self.left_context(LEFT_CONTEXT_CHARS);
        let left = left.as_deref();
        match command {
            Command::Consume | Command::Passthrough => {}
            Command::ShowCandidateWindow => self.segments.set_candidate_window_visible(true),
            Command::HideCandidateWindow => self.segments.set_candidate_window_visible(false),
            Command::EnterPreview => {
                self.segments.insert_separator(false, left);
                self.segments.set_candidate_window_visible(false);
            }
            Command::EnterSelection => {
                self.segments.insert_separator(true, left);
                self.segments.update(true, left);
            }
            Command::AppendToBuffer(pieces) => self.segments.insert(pieces, left),
            Command::InsertDirect(text) => host.insert_text(&text),
            Command::RemoveLastFromBuffer => {
                self.segments.delete_backward(1, left);
                self.segments.reset_selection();
            }
            Command::CommitBuffer => {
                self.commit_current(host);
            }
            Command::EditSegment(count) => self.segments.edit_segment(count, left),
            Command::SubmitSelectedCandidate => self.submit_selected_candidate(host),
            Command::SelectNextCandidate => self.segments.select_next_candidate(),
            Command::SelectPrevCandidate => self.segments.select_prev_candidate(),
            Command::SelectNumberedCandidate(index) => {
                self.segments.select_row(index);
                self.submit_selected_candidate(host);
            }
            Command::SelectLanguage(language) => {
                self.language = language;
                self.switch_language(host);
            }
            Command::CommitAndSelectLanguage(language) => {
                self.commit_current(host);
                self.language = language;
                self.switch_language(host);
            }
            Command::CommitAndAppend(pieces) => {
                self.commit_current(host);
                self.segments.insert(pieces, left);
            }
            Command::EnableDebugWindow => self.segments.set_debug_window(true),
            Command::DisableDebugWindow => self.segments.set_debug_window(false),
            Command::ForgetMemory => self.segments.forget_selected(),
            Command::SubmitTransform(kind) => {
                let candidate = self.transformed_candidate(kind);
                self.submit_candidate(candidate, host);
            }
            Command::RequestPredictiveSuggestion => {
                // Seed the buffer with a continuation reading so the
                // backend produces a follow-on phrase.
                let pieces = "つづき".chars().map(InputPiece::Character).collect();
                self.segments.insert(pieces, left);
                return Some(self.build_suggestion_request());
            }
            Command::RequestReplaceSuggestion => {
                return Some(self.build_suggestion_request());
            }
            Command::SelectNextSuggestion => self.segments.select_next_suggestion(),
            Command::SelectPrevSuggestion => self.segments.select_prev_suggestion(),
            Command::SubmitSuggestion => {
                if let Some(candidate) = self.segments.current_suggestion() {
                    host.insert_text(&candidate.text);
                    self.suggestion_panel_visible = false;
                    self.segments.stop_composition();
                }
            }
            Command::HideSuggestionWindow => self.suggestion_panel_visible = false,
            Command::StopComposition => self.segments.stop_composition(),
        }
        None
    }

    fn apply_directive(&mut self, directive: Directive, host: &mut dyn HostClient) {
        match directive {
            Directive::Stay => {}
            Directive::Transition(next) => {
                if next != InputState::ReplaceSuggestion {
                    self.suggestion_panel_visible = false;
                }
                if next == InputState::Inactive {
                    self.switch_language(host);
                }
                self.state = next;
            }
            Directive::IfEmptyElse {
                if_empty,
                if_not_empty,
            } => {
                self.state = if self.segments.is_empty() {
                    if_empty
                } else {
                    if_not_empty
                };
            }
        }
    }

    fn transformed_candidate(&self, kind: FixedTransform) -> Candidate {
        match kind {
            FixedTransform::Hiragana => self
                .segments
                .modified_ruby_candidate(&self.state, transform::to_hiragana),
            FixedTransform::Katakana => self
                .segments
                .modified_ruby_candidate(&self.state, transform::to_katakana),
            FixedTransform::HalfwidthKatakana => {
                self.segments.modified_ruby_candidate(&self.state, |s| {
                    transform::katakana_to_halfwidth(&transform::to_katakana(s))
                })
            }
            FixedTransform::FullwidthRoman => self
                .segments
                .modified_roman_candidate(transform::to_fullwidth_roman),
            FixedTransform::HalfwidthRoman => self
                .segments
                .modified_roman_candidate(transform::to_halfwidth_roman),
        }
    }

    fn submit_selected_candidate(&mut self, host: &mut dyn HostClient) {
        if let Some(candidate) = self.segments.selected_candidate() {
            self.submit_candidate(candidate, host);
            self.segments.reset_selection();
        }
    }

    fn submit_candidate(&mut self, candidate: Candidate, host: &mut dyn HostClient) {
        // Capture context before the insert shifts the caret.
        let left = self.left_context(LEFT_CONTEXT_CHARS).unwrap_or_default();
        host.insert_text(&candidate.text);
        self.segments.prefix_candidate_committed(&candidate, &left);
    }

    fn commit_current(&mut self, host: &mut dyn HostClient) -> String {
        let state = self.state.clone();
        let text = self.segments.commit_marked_text(&state);
        host.insert_text(&text);
        text
    }

    fn build_suggestion_request(&mut self) -> SuggestionRequest {
        self.segments.clear_replace_suggestions();
        self.suggestion_generation += 1;
        SuggestionRequest {
            prompt: self.left_context(SUGGESTION_PROMPT_CHARS).unwrap_or_default(),
            target: self.segments.convert_target(),
            generation: self.suggestion_generation,
        }
    }

    /// Feed back suggestion results. Returns whether they were taken;
    /// stale generations and wrong states are dropped.
    pub fn receive_suggestions(&mut self, generation: u64, suggestions: Vec<String>) -> bool {
        if generation != self.suggestion_generation
            || self.state != InputState::ReplaceSuggestion
            || suggestions.is_empty()
        {
            return false;
        }
        let extent = ComposingExtent::Chars(self.segments.convert_target().chars().count());
        let candidates = suggestions
            .into_iter()
            .map(|text| Candidate::plain(text, 0.0, extent))
            .collect();
        self.segments.set_replace_suggestions(candidates);
        self.suggestion_panel_visible = true;
        true
    }

    fn switch_language(&mut self, host: &mut dyn HostClient) {
        let layout = self.segments.config().keyboard_layout_id.clone();
        if !layout.is_empty() {
            host.override_layout(&layout);
        }
        match self.language {
            InputLanguage::English => {
                host.select_mode(ROMAN_MODE_ID);
                self.segments.stop_japanese_input();
            }
            InputLanguage::Japanese => host.select_mode(JAPANESE_MODE_ID),
        }
    }

    fn refresh_marked_text(&mut self, host: &mut dyn HostClient) {
        let state = self.state.clone();
        let marked = self.segments.current_marked_text(&state);
        host.set_marked_text(&marked);
    }

    // Lifecycle

    pub fn activate(&mut self) {
        self.segments.activate();
    }

    pub fn deactivate(&mut self) {
        self.segments.deactivate();
        self.state = InputState::Inactive;
        self.suggestion_panel_visible = false;
    }

    /// Commit whatever is composing, as hosts request on focus loss.
    pub fn commit_composition(&mut self, host: &mut dyn HostClient) {
        if self.is_composing() {
            self.commit_current(host);
            self.state = InputState::Inactive;
            self.refresh_marked_text(host);
        }
    }
}

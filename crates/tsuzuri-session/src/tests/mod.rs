mod segments;
mod suggest;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tsuzuri_core::candidate::{Candidate, ComposingExtent, ConversionResult};
use tsuzuri_core::composing::ComposingBuffer;
use tsuzuri_core::config::Config;
use tsuzuri_core::host::{CharRange, HostClient, MarkedText};
use tsuzuri_core::provider::{CandidateProvider, ConvertOptions, LeftContextSource};

use super::action::EventModifiers;
use super::classify::RawKeyEvent;
use super::InputSession;

/// Deterministic conversion backend: an exact-reading dictionary plus
/// an optional first-clause table, with call recording.
pub(super) struct MockProvider {
    dict: HashMap<String, Vec<String>>,
    /// reading -> (surface, chars of the reading it consumes)
    first_clause: HashMap<String, (String, usize)>,
    pub requests: Vec<String>,
    pub learned: Vec<String>,
    pub forgotten: Vec<String>,
    pub stop_count: usize,
}

impl MockProvider {
    pub fn new() -> Self {
        let mut dict = HashMap::new();
        dict.insert("kyou".to_owned(), vec!["今日".to_owned(), "京".to_owned()]);
        dict.insert("kyouha".to_owned(), vec!["今日は".to_owned()]);
        dict.insert("ha".to_owned(), vec!["は".to_owned(), "歯".to_owned()]);
        dict.insert("tenki".to_owned(), vec!["天気".to_owned()]);
        dict.insert("きょう".to_owned(), vec!["今日".to_owned()]);

        let mut first_clause = HashMap::new();
        first_clause.insert("kyouha".to_owned(), ("今日".to_owned(), 4));

        MockProvider {
            dict,
            first_clause,
            requests: Vec::new(),
            learned: Vec::new(),
            forgotten: Vec::new(),
            stop_count: 0,
        }
    }
}

impl CandidateProvider for MockProvider {
    fn request(&mut self, prefix: &ComposingBuffer, _options: &ConvertOptions) -> ConversionResult {
        let target = prefix.convert_target();
        self.requests.push(target.clone());
        let extent = ComposingExtent::Chars(target.chars().count());

        let mut main_results: Vec<Candidate> = self
            .dict
            .get(&target)
            .into_iter()
            .flatten()
            .map(|surface| Candidate::with_word(surface.clone(), target.clone(), extent))
            .collect();
        // The reading itself always converts to itself.
        main_results.push(Candidate::with_word(target.clone(), target.clone(), extent));

        let first_clause_results = self
            .first_clause
            .get(&target)
            .map(|(surface, chars)| {
                let ruby: String = target.chars().take(*chars).collect();
                vec![Candidate::with_word(
                    surface.clone(),
                    ruby,
                    ComposingExtent::Chars(*chars),
                )]
            })
            .unwrap_or_default();

        ConversionResult {
            main_results,
            first_clause_results,
        }
    }

    fn commit_learning(&mut self, candidate: &Candidate) {
        self.learned.push(candidate.text.clone());
    }

    fn forget(&mut self, candidate: &Candidate) {
        self.forgotten.push(candidate.text.clone());
    }

    fn stop_composition(&mut self) {
        self.stop_count += 1;
    }
}

/// Records everything the session asks the host to do.
#[derive(Default)]
pub(super) struct MockHost {
    pub inserted: Vec<String>,
    pub marked: Vec<MarkedText>,
    pub selection: Option<(CharRange, String)>,
    pub layouts: Vec<String>,
    pub modes: Vec<String>,
}

impl MockHost {
    pub fn committed(&self) -> String {
        self.inserted.concat()
    }

    pub fn current_marked(&self) -> MarkedText {
        self.marked.last().cloned().unwrap_or_default()
    }
}

impl HostClient for MockHost {
    fn insert_text(&mut self, text: &str) {
        self.inserted.push(text.to_owned());
    }

    fn set_marked_text(&mut self, marked: &MarkedText) {
        self.marked.push(marked.clone());
    }

    fn selected_range(&self) -> Option<CharRange> {
        self.selection.as_ref().map(|(range, _)| *range)
    }

    fn string_in_range(&self, range: CharRange) -> Option<String> {
        self.selection
            .as_ref()
            .filter(|(stored, _)| stored.location == range.location)
            .map(|(_, text)| text.clone())
    }

    fn override_layout(&mut self, layout_id: &str) {
        self.layouts.push(layout_id.to_owned());
    }

    fn select_mode(&mut self, mode_id: &str) {
        self.modes.push(mode_id.to_owned());
    }
}

/// Fixed left-side context, shareable with the test body.
pub(super) struct FixedContext(pub Rc<RefCell<String>>);

impl LeftContextSource for FixedContext {
    fn left_context(&self, max_chars: usize) -> Option<String> {
        let text = self.0.borrow();
        if text.is_empty() {
            return None;
        }
        let chars: Vec<char> = text.chars().collect();
        let start = chars.len().saturating_sub(max_chars);
        Some(chars[start..].iter().collect())
    }
}

pub(super) fn make_session(config: Config) -> InputSession<MockProvider> {
    InputSession::new(
        MockProvider::new(),
        config,
        Box::new(FixedContext(Rc::new(RefCell::new(String::new())))),
    )
}

pub(super) fn key(key_code: u16, characters: &str) -> RawKeyEvent {
    RawKeyEvent {
        key_code,
        characters: Some(characters.to_owned()),
        modifiers: EventModifiers::NONE,
    }
}

pub(super) fn key_with(key_code: u16, characters: &str, modifiers: EventModifiers) -> RawKeyEvent {
    RawKeyEvent {
        key_code,
        characters: Some(characters.to_owned()),
        modifiers,
    }
}

/// Feed each character of `text` as its own key event.
pub(super) fn type_text(
    session: &mut InputSession<MockProvider>,
    host: &mut MockHost,
    text: &str,
) {
    for c in text.chars() {
        session.handle_event(&key(0, &c.to_string()), host);
    }
}

pub(super) const SPACE: u16 = 49;
pub(super) const ENTER: u16 = 0x24;
pub(super) const BACKSPACE: u16 = 51;
pub(super) const ESCAPE: u16 = 53;
pub(super) const DOWN: u16 = 125;
pub(super) const EISU: u16 = 102;
pub(super) const KANA: u16 = 104;
pub(super) const F7: u16 = 98;

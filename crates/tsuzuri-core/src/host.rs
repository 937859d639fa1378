//! Host editor abstraction: marked text, ranges, and the client calls
//! the engine issues while composing.

/// Highlight role of one marked-text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The segment under selection; hosts underline it thick.
    Focused,
    /// Composing text outside the selection; thin underline.
    Unfocused,
    /// No underline at all.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedSegment {
    pub content: String,
    pub focus: Focus,
}

/// The full inline composition string, split into styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedText {
    pub segments: Vec<MarkedSegment>,
    /// Caret position within the concatenated text, in characters.
    /// `None` leaves the caret at the end.
    pub selection_offset: Option<usize>,
}

impl MarkedText {
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.is_empty() {
            return MarkedText::default();
        }
        MarkedText {
            segments: vec![MarkedSegment {
                content,
                focus: Focus::Plain,
            }],
            selection_offset: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.content.is_empty())
    }

    pub fn concatenated(&self) -> String {
        self.segments.iter().map(|s| s.content.as_str()).collect()
    }
}

/// A character range in the host's text storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub location: usize,
    pub length: usize,
}

/// Everything the engine needs from the editor it is typing into.
pub trait HostClient {
    fn insert_text(&mut self, text: &str);
    fn set_marked_text(&mut self, marked: &MarkedText);
    /// Current selection, if the host reports one.
    fn selected_range(&self) -> Option<CharRange>;
    /// Text at the given range, for reconversion.
    fn string_in_range(&self, range: CharRange) -> Option<String>;
    /// Ask the host to switch to the given keyboard layout.
    fn override_layout(&mut self, layout_id: &str);
    /// Ask the host to switch input modes (host-defined mode ids).
    fn select_mode(&mut self, mode_id: &str);
}

//! Commands emitted by the state machine and the directive describing
//! the follow-up state change.

use tsuzuri_core::piece::InputPiece;

use crate::action::InputLanguage;
use crate::state::InputState;

/// Fixed script transform bound to the function-key shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedTransform {
    Hiragana,
    Katakana,
    HalfwidthKatakana,
    FullwidthRoman,
    HalfwidthRoman,
}

/// What the executor should do in response to one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Swallow the event with no other effect.
    Consume,
    /// Hand the event back to the host unmodified.
    Passthrough,
    ShowCandidateWindow,
    HideCandidateWindow,
    AppendToBuffer(Vec<InputPiece>),
    /// Insert text directly into the host, outside composition.
    InsertDirect(String),
    RemoveLastFromBuffer,
    /// Commit the whole buffer as currently displayed.
    CommitBuffer,
    /// Move the active clause boundary.
    EditSegment(i32),
    /// Start preview: freeze the first candidate inline.
    EnterPreview,
    /// Open the candidate list for explicit selection.
    EnterSelection,
    SubmitSelectedCandidate,
    SelectNextCandidate,
    SelectPrevCandidate,
    SelectNumberedCandidate(usize),
    /// Commit then switch to the given input language.
    CommitAndSelectLanguage(InputLanguage),
    /// Switch input language without composing text.
    SelectLanguage(InputLanguage),
    /// Commit the selection, then start composing the given pieces.
    CommitAndAppend(Vec<InputPiece>),
    EnableDebugWindow,
    DisableDebugWindow,
    ForgetMemory,
    /// Commit the buffer under the given fixed transform.
    SubmitTransform(FixedTransform),
    RequestPredictiveSuggestion,
    RequestReplaceSuggestion,
    SelectNextSuggestion,
    SelectPrevSuggestion,
    SubmitSuggestion,
    HideSuggestionWindow,
    /// End composition, discarding any uncommitted state.
    StopComposition,
}

/// Where the machine goes after the command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Stay,
    Transition(InputState),
    /// Branch on whether the composing buffer is empty once the
    /// command has been applied.
    IfEmptyElse {
        if_empty: InputState,
        if_not_empty: InputState,
    },
}

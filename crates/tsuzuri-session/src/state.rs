//! The six-state input state machine. Pure: one user action in, one
//! command plus a follow-up directive out, no side effects.

use tsuzuri_core::config::Config;
use tsuzuri_core::diacritic;
use tsuzuri_core::piece::pieces_to_string;

use crate::action::{Direction, EventModifiers, FunctionKey, InputLanguage, UserAction};
use crate::command::{Command, Directive, FixedTransform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputState {
    /// Not composing.
    Inactive,
    /// Latin entry waiting for the base letter of a dead-key mark.
    AttachDiacritic(String),
    /// Raw kana in the buffer, before any explicit conversion request.
    Composing,
    /// Best candidate frozen inline, list hidden.
    Previewing,
    /// Candidate list open, user walking it.
    Selecting,
    /// Suggestion panel open.
    ReplaceSuggestion,
}

impl FunctionKey {
    fn transform(self) -> FixedTransform {
        match self {
            FunctionKey::Six => FixedTransform::Hiragana,
            FunctionKey::Seven => FixedTransform::Katakana,
            FunctionKey::Eight => FixedTransform::HalfwidthKatakana,
            FunctionKey::Nine => FixedTransform::FullwidthRoman,
            FunctionKey::Ten => FixedTransform::HalfwidthRoman,
        }
    }
}

fn stay(command: Command) -> (Command, Directive) {
    (command, Directive::Stay)
}

fn to(command: Command, state: InputState) -> (Command, Directive) {
    (command, Directive::Transition(state))
}

fn branch(command: Command, if_empty: InputState, if_not_empty: InputState) -> (Command, Directive) {
    (
        command,
        Directive::IfEmptyElse {
            if_empty,
            if_not_empty,
        },
    )
}

impl InputState {
    /// Decide what one user action does in this state.
    pub fn transition(
        &self,
        action: &UserAction,
        modifiers: EventModifiers,
        language: InputLanguage,
        config: &Config,
    ) -> (Command, Directive) {
        // Command shortcuts always belong to the host.
        if modifiers.command {
            return stay(Command::Passthrough);
        }
        // Option only participates in text entry and dead keys.
        if modifiers.option && !matches!(action, UserAction::Input(_) | UserAction::DeadKey(_)) {
            return stay(Command::Passthrough);
        }
        match self {
            InputState::Inactive => self.on_inactive(action, language, config),
            InputState::AttachDiacritic(mark) => self.on_attach_diacritic(mark, action, modifiers),
            InputState::Composing => self.on_composing(action, modifiers, config),
            InputState::Previewing => self.on_previewing(action, modifiers),
            InputState::Selecting => self.on_selecting(action, modifiers, config),
            InputState::ReplaceSuggestion => self.on_replace_suggestion(action),
        }
    }

    fn on_inactive(
        &self,
        action: &UserAction,
        language: InputLanguage,
        config: &Config,
    ) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => match language {
                InputLanguage::Japanese => to(
                    Command::AppendToBuffer(pieces.clone()),
                    InputState::Composing,
                ),
                InputLanguage::English => {
                    stay(Command::InsertDirect(pieces_to_string(pieces)))
                }
            },
            UserAction::DeadKey(mark) => {
                if language == InputLanguage::English {
                    to(Command::Consume, InputState::AttachDiacritic(mark.clone()))
                } else {
                    stay(Command::Passthrough)
                }
            }
            UserAction::Number(number) => match language {
                InputLanguage::Japanese => to(
                    Command::AppendToBuffer(vec![number.piece()]),
                    InputState::Composing,
                ),
                InputLanguage::English => {
                    stay(Command::InsertDirect(pieces_to_string(&[number.piece()])))
                }
            },
            UserAction::ToJapanese => stay(Command::SelectLanguage(InputLanguage::Japanese)),
            UserAction::ToEnglish => stay(Command::SelectLanguage(InputLanguage::English)),
            UserAction::Space { prefers_full_width } => {
                if language == InputLanguage::Japanese && *prefers_full_width {
                    stay(Command::InsertDirect("　".to_owned()))
                } else {
                    stay(Command::InsertDirect(" ".to_owned()))
                }
            }
            UserAction::Suggest => {
                if config.suggestions_enabled {
                    to(
                        Command::RequestPredictiveSuggestion,
                        InputState::ReplaceSuggestion,
                    )
                } else {
                    stay(Command::Passthrough)
                }
            }
            UserAction::Unknown
            | UserAction::Navigation(_)
            | UserAction::Backspace
            | UserAction::Enter
            | UserAction::Escape
            | UserAction::Function(_)
            | UserAction::EditSegment(_)
            | UserAction::Tab
            | UserAction::Forget
            | UserAction::TransformSelection
            | UserAction::Reconvert => stay(Command::Passthrough),
        }
    }

    fn on_attach_diacritic(
        &self,
        mark: &str,
        action: &UserAction,
        modifiers: EventModifiers,
    ) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => {
                let text = pieces_to_string(pieces);
                match diacritic::attach(mark, &text, modifiers.shift) {
                    Some(composed) => to(Command::InsertDirect(composed), InputState::Inactive),
                    None => to(
                        Command::InsertDirect(format!("{mark}{text}")),
                        InputState::Inactive,
                    ),
                }
            }
            UserAction::DeadKey(next) => to(
                Command::InsertDirect(mark.to_owned()),
                InputState::AttachDiacritic(next.clone()),
            ),
            UserAction::Number(number) => to(
                Command::InsertDirect(format!("{mark}{}", pieces_to_string(&[number.piece()]))),
                InputState::Inactive,
            ),
            UserAction::Backspace | UserAction::Escape => {
                to(Command::StopComposition, InputState::Inactive)
            }
            UserAction::ToJapanese => {
                to(Command::SelectLanguage(InputLanguage::Japanese), InputState::Inactive)
            }
            UserAction::Function(_) => stay(Command::Consume),
            UserAction::TransformSelection => stay(Command::Passthrough),
            UserAction::Enter => to(
                Command::InsertDirect(format!("{mark}\n")),
                InputState::Inactive,
            ),
            UserAction::Tab => to(
                Command::InsertDirect(format!("{mark}\t")),
                InputState::Inactive,
            ),
            UserAction::Unknown
            | UserAction::Space { .. }
            | UserAction::ToEnglish
            | UserAction::Navigation(_)
            | UserAction::EditSegment(_)
            | UserAction::Suggest
            | UserAction::Forget
            | UserAction::Reconvert => to(Command::InsertDirect(mark.to_owned()), InputState::Inactive),
        }
    }

    fn on_composing(
        &self,
        action: &UserAction,
        modifiers: EventModifiers,
        config: &Config,
    ) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => stay(Command::AppendToBuffer(pieces.clone())),
            UserAction::Number(number) => stay(Command::AppendToBuffer(vec![number.piece()])),
            UserAction::Backspace => branch(
                Command::RemoveLastFromBuffer,
                InputState::Inactive,
                InputState::Composing,
            ),
            UserAction::Enter => to(Command::CommitBuffer, InputState::Inactive),
            UserAction::Escape => to(Command::StopComposition, InputState::Inactive),
            UserAction::Space { .. } => {
                if config.live_conversion {
                    to(Command::EnterSelection, InputState::Selecting)
                } else {
                    to(Command::EnterPreview, InputState::Previewing)
                }
            }
            UserAction::Function(function) => to(
                Command::SubmitTransform(function.transform()),
                InputState::Inactive,
            ),
            UserAction::ToJapanese | UserAction::Forget | UserAction::Tab => stay(Command::Consume),
            UserAction::ToEnglish => {
                to(Command::CommitAndSelectLanguage(InputLanguage::English), InputState::Inactive)
            }
            UserAction::Navigation(direction) => match direction {
                Direction::Down => to(Command::EnterSelection, InputState::Selecting),
                Direction::Right if modifiers.shift => {
                    to(Command::EditSegment(1), InputState::Selecting)
                }
                Direction::Left if modifiers.shift => {
                    to(Command::EditSegment(-1), InputState::Selecting)
                }
                _ => stay(Command::Consume),
            },
            UserAction::EditSegment(count) => {
                to(Command::EditSegment(*count), InputState::Selecting)
            }
            UserAction::Suggest => {
                if config.suggestions_enabled {
                    to(
                        Command::RequestReplaceSuggestion,
                        InputState::ReplaceSuggestion,
                    )
                } else {
                    stay(Command::Passthrough)
                }
            }
            UserAction::Unknown
            | UserAction::DeadKey(_)
            | UserAction::TransformSelection
            | UserAction::Reconvert => stay(Command::Passthrough),
        }
    }

    fn on_previewing(&self, action: &UserAction, modifiers: EventModifiers) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => to(
                Command::CommitAndAppend(pieces.clone()),
                InputState::Composing,
            ),
            UserAction::Number(number) => to(
                Command::CommitAndAppend(vec![number.piece()]),
                InputState::Composing,
            ),
            UserAction::Backspace => to(Command::RemoveLastFromBuffer, InputState::Composing),
            UserAction::Enter => to(Command::CommitBuffer, InputState::Inactive),
            UserAction::Space { .. } => to(Command::EnterSelection, InputState::Selecting),
            UserAction::Escape => to(Command::HideCandidateWindow, InputState::Composing),
            UserAction::Function(function) => to(
                Command::SubmitTransform(function.transform()),
                InputState::Inactive,
            ),
            UserAction::ToJapanese | UserAction::Forget | UserAction::Tab => stay(Command::Consume),
            UserAction::ToEnglish => {
                to(Command::CommitAndSelectLanguage(InputLanguage::English), InputState::Inactive)
            }
            UserAction::Navigation(direction) => match direction {
                Direction::Down => to(Command::EnterSelection, InputState::Selecting),
                Direction::Right if modifiers.shift => {
                    to(Command::EditSegment(1), InputState::Selecting)
                }
                Direction::Left if modifiers.shift => {
                    to(Command::EditSegment(-1), InputState::Selecting)
                }
                _ => stay(Command::Consume),
            },
            UserAction::EditSegment(count) => {
                to(Command::EditSegment(*count), InputState::Selecting)
            }
            UserAction::Unknown
            | UserAction::Suggest
            | UserAction::DeadKey(_)
            | UserAction::TransformSelection
            | UserAction::Reconvert => stay(Command::Passthrough),
        }
    }

    fn on_selecting(
        &self,
        action: &UserAction,
        modifiers: EventModifiers,
        config: &Config,
    ) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => {
                let text = pieces_to_string(pieces);
                if text == "d" && config.debug_window {
                    return stay(Command::EnableDebugWindow);
                } else if text == "D" && config.debug_window {
                    return stay(Command::DisableDebugWindow);
                }
                to(Command::CommitAndAppend(pieces.clone()), InputState::Composing)
            }
            UserAction::Enter => branch(
                Command::SubmitSelectedCandidate,
                InputState::Inactive,
                InputState::Previewing,
            ),
            UserAction::Backspace => branch(
                Command::RemoveLastFromBuffer,
                InputState::Inactive,
                InputState::Composing,
            ),
            UserAction::Escape => {
                if config.live_conversion {
                    to(Command::HideCandidateWindow, InputState::Composing)
                } else {
                    to(Command::EnterPreview, InputState::Previewing)
                }
            }
            UserAction::Space { .. } => {
                if modifiers.shift {
                    stay(Command::SelectPrevCandidate)
                } else {
                    stay(Command::SelectNextCandidate)
                }
            }
            UserAction::Navigation(direction) => match direction {
                Direction::Right if modifiers.shift => stay(Command::EditSegment(1)),
                Direction::Right => branch(
                    Command::SubmitSelectedCandidate,
                    InputState::Inactive,
                    InputState::Selecting,
                ),
                Direction::Left if modifiers.shift => stay(Command::EditSegment(-1)),
                Direction::Down => stay(Command::SelectNextCandidate),
                Direction::Up => stay(Command::SelectPrevCandidate),
                Direction::Left => stay(Command::Consume),
            },
            UserAction::Function(function) => branch(
                Command::SubmitTransform(function.transform()),
                InputState::Inactive,
                InputState::Selecting,
            ),
            UserAction::Number(number) => match number.selection_index() {
                Some(index) => branch(
                    Command::SelectNumberedCandidate(index),
                    InputState::Inactive,
                    InputState::Previewing,
                ),
                None => to(
                    Command::CommitAndAppend(vec![number.piece()]),
                    InputState::Composing,
                ),
            },
            UserAction::EditSegment(count) => {
                to(Command::EditSegment(*count), InputState::Selecting)
            }
            UserAction::Forget => stay(Command::ForgetMemory),
            UserAction::ToJapanese | UserAction::Tab => stay(Command::Consume),
            UserAction::ToEnglish => {
                to(Command::CommitAndSelectLanguage(InputLanguage::English), InputState::Inactive)
            }
            UserAction::Unknown
            | UserAction::Suggest
            | UserAction::TransformSelection
            | UserAction::Reconvert
            | UserAction::DeadKey(_) => stay(Command::Passthrough),
        }
    }

    fn on_replace_suggestion(&self, action: &UserAction) -> (Command, Directive) {
        match action {
            UserAction::Input(pieces) => to(
                Command::AppendToBuffer(pieces.clone()),
                InputState::Composing,
            ),
            UserAction::Space { .. } => stay(Command::SelectNextSuggestion),
            UserAction::Navigation(direction) => match direction {
                Direction::Down => stay(Command::SelectNextSuggestion),
                Direction::Up => stay(Command::SelectPrevSuggestion),
                _ => stay(Command::Consume),
            },
            UserAction::Suggest => stay(Command::RequestReplaceSuggestion),
            UserAction::Enter | UserAction::ToEnglish => {
                to(Command::SubmitSuggestion, InputState::Inactive)
            }
            UserAction::Backspace | UserAction::Escape => {
                to(Command::HideSuggestionWindow, InputState::Composing)
            }
            UserAction::ToJapanese | UserAction::Forget | UserAction::Tab => stay(Command::Consume),
            UserAction::Unknown
            | UserAction::Function(_)
            | UserAction::Number(_)
            | UserAction::EditSegment(_)
            | UserAction::DeadKey(_)
            | UserAction::TransformSelection
            | UserAction::Reconvert => stay(Command::Passthrough),
        }
    }
}

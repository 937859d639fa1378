//! Semantic user actions, produced by the key classifier and consumed
//! by the state machine.

use tsuzuri_core::piece::{InputPiece, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Function-key commit shortcuts F6 through F10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKey {
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

/// Number row keys usable for direct candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKey {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Zero,
    /// Shift+0, which commits and keeps typing instead of selecting.
    ShiftZero,
}

impl NumberKey {
    /// Candidate row this key selects, if it selects one.
    pub fn selection_index(self) -> Option<usize> {
        match self {
            NumberKey::One => Some(0),
            NumberKey::Two => Some(1),
            NumberKey::Three => Some(2),
            NumberKey::Four => Some(3),
            NumberKey::Five => Some(4),
            NumberKey::Six => Some(5),
            NumberKey::Seven => Some(6),
            NumberKey::Eight => Some(7),
            NumberKey::Nine => Some(8),
            NumberKey::Zero | NumberKey::ShiftZero => None,
        }
    }

    /// The piece this key types when not selecting. Shift+0 stays a
    /// keyed `0` so the input table decides its surface form.
    pub fn piece(self) -> InputPiece {
        let c = match self {
            NumberKey::One => '1',
            NumberKey::Two => '2',
            NumberKey::Three => '3',
            NumberKey::Four => '4',
            NumberKey::Five => '5',
            NumberKey::Six => '6',
            NumberKey::Seven => '7',
            NumberKey::Eight => '8',
            NumberKey::Nine => '9',
            NumberKey::Zero | NumberKey::ShiftZero => '0',
        };
        if self == NumberKey::ShiftZero {
            return InputPiece::Key {
                intention: None,
                input: c,
                modifiers: KeyModifiers::SHIFT,
            };
        }
        InputPiece::Character(c)
    }
}

/// What the user meant by a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Input(Vec<InputPiece>),
    Backspace,
    Enter,
    Space { prefers_full_width: bool },
    Escape,
    Tab,
    ToJapanese,
    ToEnglish,
    Navigation(Direction),
    Function(FunctionKey),
    Number(NumberKey),
    /// Move the clause boundary left (negative) or right (positive).
    EditSegment(i32),
    /// Request a predictive suggestion.
    Suggest,
    /// Forget adaptation data for the selected candidate.
    Forget,
    /// Apply a script transform to the host's current selection. The
    /// host menu performs the edit; the session never consumes it.
    TransformSelection,
    Reconvert,
    /// A dead key producing a pending diacritic mark.
    DeadKey(String),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLanguage {
    Japanese,
    English,
}

/// Modifier flags on the raw event, as the host reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventModifiers {
    pub command: bool,
    pub option: bool,
    pub control: bool,
    pub shift: bool,
}

impl EventModifiers {
    pub const NONE: EventModifiers = EventModifiers {
        command: false,
        option: false,
        control: false,
        shift: false,
    };

    pub fn key_modifiers(self) -> KeyModifiers {
        KeyModifiers { shift: self.shift }
    }
}

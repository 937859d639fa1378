//! Raw key event classification: macOS-style key codes plus character
//! payloads in, semantic [`UserAction`]s out.

use tsuzuri_core::config::{Config, YenKey};
use tsuzuri_core::diacritic;
use tsuzuri_core::piece::{InputPiece, KeyModifiers};
use tsuzuri_core::unicode::is_printable;

use crate::action::{Direction, EventModifiers, FunctionKey, InputLanguage, NumberKey, UserAction};

/// A key event as the host delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key_code: u16,
    /// The characters the key produces under the active layout.
    pub characters: Option<String>,
    pub modifiers: EventModifiers,
}

/// Japanese intention for a directly typed ASCII character, if the
/// character has a fullwidth reading in kana entry.
fn japanese_intention(c: char, comma_period_ascii: bool) -> Option<char> {
    match c {
        ',' => Some(if comma_period_ascii { '，' } else { '、' }),
        '.' => Some(if comma_period_ascii { '．' } else { '。' }),
        '/' => Some('・'),
        '[' => Some('「'),
        ']' => Some('」'),
        '-' => Some('ー'),
        '~' => Some('〜'),
        _ => None,
    }
}

fn map_text(text: &str, language: InputLanguage, config: &Config) -> Vec<InputPiece> {
    match language {
        InputLanguage::English => text.chars().map(InputPiece::Character).collect(),
        InputLanguage::Japanese => text
            .chars()
            .map(|c| InputPiece::Key {
                intention: japanese_intention(c, config.comma_period_fullwidth_ascii),
                input: c,
                modifiers: KeyModifiers::NONE,
            })
            .collect(),
    }
}

fn input_or_unknown(
    event: &RawKeyEvent,
    language: InputLanguage,
    config: &Config,
) -> UserAction {
    match &event.characters {
        Some(text) if is_printable(text) => UserAction::Input(map_text(text, language, config)),
        _ => UserAction::Unknown,
    }
}

/// Ctrl bindings that shadow a plain letter key.
fn control_binding(key_code: u16) -> Option<UserAction> {
    let action = match key_code {
        0x04 => UserAction::Backspace,                    // ctrl+h
        0x23 => UserAction::Navigation(Direction::Up),    // ctrl+p
        0x2E => UserAction::Enter,                        // ctrl+m
        0x2D => UserAction::Navigation(Direction::Down),  // ctrl+n
        0x03 => UserAction::Navigation(Direction::Right), // ctrl+f
        0x22 => UserAction::EditSegment(-1),              // ctrl+i
        0x1F => UserAction::EditSegment(1),               // ctrl+o
        0x25 => UserAction::Function(FunctionKey::Nine),  // ctrl+l
        0x26 => UserAction::Function(FunctionKey::Six),   // ctrl+j
        0x28 => UserAction::Function(FunctionKey::Seven), // ctrl+k
        0x27 => UserAction::Function(FunctionKey::Ten),   // ctrl+:
        0x29 => UserAction::Function(FunctionKey::Eight), // ctrl+;
        0x01 => UserAction::Suggest,                      // ctrl+s
        _ => return None,
    };
    Some(action)
}

const DIGIT_CODES: [(u16, NumberKey); 10] = [
    (18, NumberKey::One),
    (19, NumberKey::Two),
    (20, NumberKey::Three),
    (21, NumberKey::Four),
    (23, NumberKey::Five),
    (22, NumberKey::Six),
    (26, NumberKey::Seven),
    (28, NumberKey::Eight),
    (25, NumberKey::Nine),
    (29, NumberKey::Zero),
];

/// Classify one raw key event into a semantic action.
pub fn classify(event: &RawKeyEvent, language: InputLanguage, config: &Config) -> UserAction {
    let mods = event.modifiers;

    // Dead keys claim option-modified codes before anything else.
    if mods.option && !mods.command && !mods.control {
        if let Some(mark) = diacritic::dead_key_for(event.key_code) {
            if mods.shift {
                // Shift+option types the bare mark.
                return match &event.characters {
                    Some(text) => {
                        UserAction::Input(text.chars().map(InputPiece::Character).collect())
                    }
                    None => UserAction::Unknown,
                };
            }
            return UserAction::DeadKey(mark.to_owned());
        }
    }

    if let Some(action) = control_binding(event.key_code) {
        if mods.control {
            return action;
        }
        return input_or_unknown(event, language, config);
    }

    match event.key_code {
        0x24 | 0x4C => UserAction::Enter,
        48 => UserAction::Tab,
        49 => UserAction::Space {
            // Shift inverts the configured space width.
            prefers_full_width: config.prefer_half_space == mods.shift,
        },
        51 => {
            if mods.control {
                UserAction::Forget
            } else {
                UserAction::Backspace
            }
        }
        53 => UserAction::Escape,
        93 => {
            // JIS yen key: output depends on config, shift, and option.
            let text = match (config.yen_key, mods.shift, mods.option) {
                (_, true, _) => "|",
                (YenKey::Backslash, false, false) | (YenKey::Yen, false, true) => "\\",
                (YenKey::Backslash, false, true) | (YenKey::Yen, false, false) => "¥",
            };
            UserAction::Input(map_text(text, language, config))
        }
        43 if !mods.shift => UserAction::Input(map_text(",", language, config)),
        47 if !mods.shift => UserAction::Input(map_text(".", language, config)),
        97 => UserAction::Function(FunctionKey::Six),
        98 => UserAction::Function(FunctionKey::Seven),
        100 => UserAction::Function(FunctionKey::Eight),
        101 => UserAction::Function(FunctionKey::Nine),
        109 => UserAction::Function(FunctionKey::Ten),
        102 => UserAction::ToEnglish,
        104 => UserAction::ToJapanese,
        123 => UserAction::Navigation(Direction::Left),
        124 => UserAction::Navigation(Direction::Right),
        125 => UserAction::Navigation(Direction::Down),
        126 => UserAction::Navigation(Direction::Up),
        0x4B => UserAction::Input(vec![InputPiece::Character('/')]),
        0x5F => UserAction::Input(vec![InputPiece::Character(',')]),
        0x41 => UserAction::Input(vec![InputPiece::Character('.')]),
        // Numpad navigation/editing keys we deliberately swallow.
        0x73 | 0x77 | 0x74 | 0x79 | 0x75 | 0x47 => UserAction::Unknown,
        code => {
            if let Some(&(_, number)) = DIGIT_CODES.iter().find(|(c, _)| *c == code) {
                if !mods.shift && !mods.option {
                    return UserAction::Number(number);
                }
                // Shift+0 on JIS keyboards reports "0" and gets the
                // tilde-append treatment.
                if code == 29 && mods.shift && event.characters.as_deref() == Some("0") {
                    return UserAction::Number(NumberKey::ShiftZero);
                }
            }
            input_or_unknown(event, language, config)
        }
    }
}

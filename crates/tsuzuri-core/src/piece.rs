//! Input pieces: the atoms the composing buffer is made of.
//!
//! A piece is either a plain character, a keyed character that distinguishes
//! the linguistically intended glyph from the raw key output (e.g. `,` typed
//! on a layout whose intention is `、`), or a zero-width separator that forces
//! a conversion break without contributing to the convert target.

/// Modifier set carried by a keyed piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub shift: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers { shift: false };
    pub const SHIFT: KeyModifiers = KeyModifiers { shift: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPiece {
    /// A literal character, inserted as-is.
    Character(char),
    /// A keyed unit: `intention` is the glyph the user means, `input` is what
    /// the key physically produced. `intention == None` means "same as input".
    Key {
        intention: Option<char>,
        input: char,
        modifiers: KeyModifiers,
    },
    /// Zero-width conversion boundary. Contributes nothing to the convert
    /// target but blocks clause merging across it.
    Separator,
}

impl InputPiece {
    pub fn key(intention: char, input: char) -> Self {
        InputPiece::Key {
            intention: Some(intention),
            input,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// The character this piece contributes to the convert target, if any.
    pub fn intended_char(&self) -> Option<char> {
        match *self {
            InputPiece::Character(c) => Some(c),
            InputPiece::Key {
                intention, input, ..
            } => Some(intention.unwrap_or(input)),
            InputPiece::Separator => None,
        }
    }

    /// The raw keyboard character behind this piece, if any.
    pub fn raw_char(&self) -> Option<char> {
        match *self {
            InputPiece::Character(c) => Some(c),
            InputPiece::Key { input, .. } => Some(input),
            InputPiece::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, InputPiece::Separator)
    }
}

/// Project a piece sequence onto its intended text, skipping separators.
pub fn pieces_to_string(pieces: &[InputPiece]) -> String {
    pieces.iter().filter_map(InputPiece::intended_char).collect()
}

/// How inserted pieces should be interpreted by the conversion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputStyle {
    /// Pieces are taken literally.
    Direct,
    /// Pieces go through the named transliteration table (romaji-to-kana
    /// variants, kana layouts, or a user-supplied table).
    Mapped(String),
}

impl Default for InputStyle {
    fn default() -> Self {
        InputStyle::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intended_char_prefers_intention() {
        let p = InputPiece::key('、', ',');
        assert_eq!(p.intended_char(), Some('、'));
        assert_eq!(p.raw_char(), Some(','));
    }

    #[test]
    fn test_key_without_intention_falls_back_to_input() {
        let p = InputPiece::Key {
            intention: None,
            input: 'a',
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(p.intended_char(), Some('a'));
    }

    #[test]
    fn test_pieces_to_string_skips_separators() {
        let pieces = vec![
            InputPiece::Character('か'),
            InputPiece::Separator,
            InputPiece::key('。', '.'),
        ];
        assert_eq!(pieces_to_string(&pieces), "か。");
    }
}

//! Small character classification helpers.

pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}')
}

pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}')
}

pub fn is_kanji(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{3005}' | '\u{3007}')
}

/// Text that is worth committing or composing: non-empty with no
/// control or whitespace characters.
pub fn is_printable(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| !c.is_control() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(is_katakana('ｱ'));
        assert!(is_kanji('漢'));
        assert!(is_kanji('々'));
        assert!(!is_kanji('a'));
    }

    #[test]
    fn test_is_printable() {
        assert!(is_printable("a"));
        assert!(is_printable("漢字"));
        assert!(!is_printable(""));
        assert!(!is_printable(" "));
        assert!(!is_printable("\u{1b}"));
        assert!(!is_printable("a b"));
    }
}

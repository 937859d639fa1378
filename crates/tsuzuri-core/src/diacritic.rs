//! Dead-key diacritic composition for Latin text entry.

/// Combining mark produced by a dead key, if the key code is one.
pub fn dead_key_for(key_code: u16) -> Option<&'static str> {
    match key_code {
        14 => Some("´"),  // option+e
        50 => Some("`"),  // option+grave
        34 => Some("ˆ"),  // option+i
        45 => Some("˜"),  // option+n
        32 => Some("¨"),  // option+u
        _ => None,
    }
}

/// Attach a pending diacritic mark to a following base letter. Returns
/// the precomposed character, or `None` when the pair has no
/// composition (callers then flush mark and letter separately).
pub fn attach(mark: &str, text: &str, shift: bool) -> Option<String> {
    let mut chars = text.chars();
    let base = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let base = base.to_ascii_lowercase();
    let composed = match (mark, base) {
        ("´", 'a') => 'á',
        ("´", 'e') => 'é',
        ("´", 'i') => 'í',
        ("´", 'o') => 'ó',
        ("´", 'u') => 'ú',
        ("`", 'a') => 'à',
        ("`", 'e') => 'è',
        ("`", 'i') => 'ì',
        ("`", 'o') => 'ò',
        ("`", 'u') => 'ù',
        ("ˆ", 'a') => 'â',
        ("ˆ", 'e') => 'ê',
        ("ˆ", 'i') => 'î',
        ("ˆ", 'o') => 'ô',
        ("ˆ", 'u') => 'û',
        ("˜", 'a') => 'ã',
        ("˜", 'n') => 'ñ',
        ("˜", 'o') => 'õ',
        ("¨", 'a') => 'ä',
        ("¨", 'e') => 'ë',
        ("¨", 'i') => 'ï',
        ("¨", 'o') => 'ö',
        ("¨", 'u') => 'ü',
        _ => return None,
    };
    let composed = if shift {
        composed.to_uppercase().collect()
    } else {
        composed.to_string()
    };
    Some(composed)
}

//! Fixed script transforms used by the function-key commit shortcuts
//! and by reconversion candidates.

/// Hiragana to katakana, character by character.
pub fn to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Katakana to hiragana. Katakana without a hiragana counterpart
/// (ヴ has one; ヷ..ヺ do not) pass through unchanged.
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ァ'..='ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// ASCII printables to their fullwidth forms; space becomes U+3000.
pub fn to_fullwidth_roman(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' => '　',
            '!'..='~' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Fullwidth forms back to ASCII; U+3000 becomes a plain space.
pub fn to_halfwidth_roman(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '　' => ' ',
            '！'..='～' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Fullwidth katakana to halfwidth katakana. Voiced and semi-voiced
/// kana decompose into base plus mark.
pub fn katakana_to_halfwidth(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match halfwidth_kana(c) {
            Some(s) => out.push_str(s),
            None => out.push(c),
        }
    }
    out
}

fn halfwidth_kana(c: char) -> Option<&'static str> {
    let s = match c {
        'ア' => "ｱ", 'イ' => "ｲ", 'ウ' => "ｳ", 'エ' => "ｴ", 'オ' => "ｵ",
        'カ' => "ｶ", 'キ' => "ｷ", 'ク' => "ｸ", 'ケ' => "ｹ", 'コ' => "ｺ",
        'サ' => "ｻ", 'シ' => "ｼ", 'ス' => "ｽ", 'セ' => "ｾ", 'ソ' => "ｿ",
        'タ' => "ﾀ", 'チ' => "ﾁ", 'ツ' => "ﾂ", 'テ' => "ﾃ", 'ト' => "ﾄ",
        'ナ' => "ﾅ", 'ニ' => "ﾆ", 'ヌ' => "ﾇ", 'ネ' => "ﾈ", 'ノ' => "ﾉ",
        'ハ' => "ﾊ", 'ヒ' => "ﾋ", 'フ' => "ﾌ", 'ヘ' => "ﾍ", 'ホ' => "ﾎ",
        'マ' => "ﾏ", 'ミ' => "ﾐ", 'ム' => "ﾑ", 'メ' => "ﾒ", 'モ' => "ﾓ",
        'ヤ' => "ﾔ", 'ユ' => "ﾕ", 'ヨ' => "ﾖ",
        'ラ' => "ﾗ", 'リ' => "ﾘ", 'ル' => "ﾙ", 'レ' => "ﾚ", 'ロ' => "ﾛ",
        'ワ' => "ﾜ", 'ヲ' => "ｦ", 'ン' => "ﾝ",
        'ァ' => "ｧ", 'ィ' => "ｨ", 'ゥ' => "ｩ", 'ェ' => "ｪ", 'ォ' => "ｫ",
        'ッ' => "ｯ", 'ャ' => "ｬ", 'ュ' => "ｭ", 'ョ' => "ｮ",
        'ガ' => "ｶﾞ", 'ギ' => "ｷﾞ", 'グ' => "ｸﾞ", 'ゲ' => "ｹﾞ", 'ゴ' => "ｺﾞ",
        'ザ' => "ｻﾞ", 'ジ' => "ｼﾞ", 'ズ' => "ｽﾞ", 'ゼ' => "ｾﾞ", 'ゾ' => "ｿﾞ",
        'ダ' => "ﾀﾞ", 'ヂ' => "ﾁﾞ", 'ヅ' => "ﾂﾞ", 'デ' => "ﾃﾞ", 'ド' => "ﾄﾞ",
        'バ' => "ﾊﾞ", 'ビ' => "ﾋﾞ", 'ブ' => "ﾌﾞ", 'ベ' => "ﾍﾞ", 'ボ' => "ﾎﾞ",
        'パ' => "ﾊﾟ", 'ピ' => "ﾋﾟ", 'プ' => "ﾌﾟ", 'ペ' => "ﾍﾟ", 'ポ' => "ﾎﾟ",
        'ヴ' => "ｳﾞ",
        'ー' => "ｰ", '、' => "､", '。' => "｡", '「' => "｢", '」' => "｣", '・' => "･",
        _ => return None,
    };
    Some(s)
}

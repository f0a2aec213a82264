//! Hiragana/Katakana folding for script-insensitive keyword search.
//!
//! The two kana syllabaries are parallel Unicode blocks offset by 0x60, so
//! folding is a per-character code-point shift. Characters outside the kana
//! blocks pass through unchanged, which makes both functions safe to apply
//! to mixed Japanese/ASCII text.

const KANA_OFFSET: u32 = 0x60;

const HIRAGANA_FIRST: u32 = 0x3041; // ぁ
const HIRAGANA_LAST: u32 = 0x3093; // ん
const KATAKANA_FIRST: u32 = 0x30A1; // ァ
const KATAKANA_LAST: u32 = 0x30F6; // ヶ

/// Converts every Hiragana character in `input` to its Katakana equivalent.
///
/// Non-Hiragana characters (including Katakana, kanji, ASCII) are unchanged.
#[must_use]
pub fn to_katakana(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let code = u32::from(c);
            if (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&code) {
                // The shifted code point stays inside the Katakana block,
                // which contains no surrogate range, so the conversion
                // cannot fail.
                char::from_u32(code + KANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Converts every Katakana character in `input` to its Hiragana equivalent.
///
/// Non-Katakana characters are unchanged.
#[must_use]
pub fn to_hiragana(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let code = u32::from(c);
            if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&code) {
                char::from_u32(code - KANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

// OCR text cleanup applied before tokenizing.
// Chinese OCR models emit full-width forms for digits and punctuation that the
// token grammars expect in ASCII.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref FULL_WIDTH_PUNCTUATION: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('／', '/');
        m.insert('．', '.');
        m.insert('：', ':');
        m.insert('，', ',');
        m.insert('（', '(');
        m.insert('）', ')');
        m.insert('\u{3000}', ' ');
        m
    };
}

fn normalize_char(c: char) -> char {
    if let Some(mapped) = FULL_WIDTH_PUNCTUATION.get(&c) {
        return *mapped;
    }
    match c {
        // Full-width digits and Latin letters sit at a fixed offset from ASCII
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

/// Maps full-width forms to ASCII and drops control characters other than
/// newline and tab. Line structure is preserved.
pub fn normalize_ocr_text(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .map(normalize_char)
        .collect()
}

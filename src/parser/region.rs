use std::fmt;

/// Binary script-presence tag for a review.
///
/// `Oriental` means the text contains at least one CJK, Hangul, Kana or
/// Cyrillic codepoint; everything else is `Occidental`. It says nothing about
/// where the reviewer lives or which language the review is written in, and
/// it is computed independently of language detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Oriental,
    Occidental,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Oriental => "oriental",
            Region::Occidental => "occidental",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching codepoint wins; empty text is occidental.
pub fn classify_region(text: &str) -> Region {
    if text.chars().any(is_oriental_char) {
        Region::Oriental
    } else {
        Region::Occidental
    }
}

fn is_oriental_char(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
            | '\u{3400}'..='\u{4DBF}' // CJK Extension A
            | '\u{1100}'..='\u{11FF}' // Hangul Jamo
            | '\u{3130}'..='\u{318F}' // Hangul Compatibility Jamo
            | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
            | '\u{3040}'..='\u{309F}' // Hiragana
            | '\u{30A0}'..='\u{30FF}' // Katakana
            | '\u{0400}'..='\u{04FF}' // Cyrillic
    )
}

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").unwrap());

const MIN_SCORE: usize = 3;
const DIACRITIC_BONUS: usize = 2;
const ASCII_FALLBACK_TOKENS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
    Portuguese,
    French,
    German,
    Italian,
    Undetermined,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
            Language::Portuguese => "pt",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Undetermined => "und",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

struct Profile {
    language: Language,
    stop_words: &'static [&'static str],
    diacritics: &'static str,
}

// Order matters: on equal scores the earlier profile wins.
static PROFILES: &[Profile] = &[
    Profile {
        language: Language::Spanish,
        stop_words: &[
            "de", "la", "que", "el", "en", "y", "a", "los", "se", "del", "las", "por", "un", "para",
            "con", "no", "una", "su", "al", "lo",
        ],
        diacritics: "áéíóúñ",
    },
    Profile {
        language: Language::English,
        stop_words: &[
            "the", "and", "to", "of", "a", "in", "that", "is", "for", "it", "on", "as", "with",
            "was", "are", "this", "by", "be", "or", "from",
        ],
        diacritics: "",
    },
    Profile {
        language: Language::Portuguese,
        stop_words: &[
            "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "com", "não", "uma", "os",
            "no", "se", "na", "por", "mais", "as",
        ],
        diacritics: "áéíóúãõç",
    },
    Profile {
        language: Language::French,
        stop_words: &[
            "de", "la", "et", "le", "à", "les", "des", "en", "du", "que", "pour", "est", "dans",
            "une", "un", "sur", "pas", "plus", "au", "par",
        ],
        diacritics: "àâçéèêëîïôùûüœ",
    },
    Profile {
        language: Language::German,
        stop_words: &[
            "und", "die", "der", "in", "zu", "den", "das", "nicht", "von", "sie", "ist", "des",
            "sich", "mit", "dem", "dass", "ein", "im", "für", "an",
        ],
        diacritics: "äöüß",
    },
    Profile {
        language: Language::Italian,
        stop_words: &[
            "di", "e", "che", "la", "il", "a", "per", "in", "un", "è", "del", "si", "dei", "con",
            "le", "della", "dal", "al", "ma", "più",
        ],
        diacritics: "àèéìòóù",
    },
];

static STOP_SETS: LazyLock<Vec<HashSet<&'static str>>> = LazyLock::new(|| {
    PROFILES
        .iter()
        .map(|p| p.stop_words.iter().copied().collect())
        .collect()
});

/// Guess the review language from stop words and diacritics.
///
/// Each candidate scores one point per stop-word token plus a flat bonus
/// when any of its diacritics shows up. The best score must reach 3; ties
/// go to the earlier candidate in `es, en, pt, fr, de, it` order, which is
/// arbitrary but stable. Short ASCII text falls back to English when it has
/// an English stop word or at least five words.
pub fn detect_language(text: &str) -> Language {
    if text.trim().is_empty() {
        return Language::Undetermined;
    }

    let lower = text.to_lowercase();
    let tokens: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();

    let mut best: Option<(Language, usize)> = None;
    let mut english_hits = 0;

    for (profile, stop_set) in PROFILES.iter().zip(STOP_SETS.iter()) {
        let hits = tokens.iter().filter(|t| stop_set.contains(*t)).count();
        let bonus = if profile.diacritics.chars().any(|c| lower.contains(c)) {
            DIACRITIC_BONUS
        } else {
            0
        };
        let score = hits + bonus;

        if profile.language == Language::English {
            english_hits = hits;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((profile.language, score));
        }
    }

    if let Some((language, score)) = best {
        if score >= MIN_SCORE {
            return language;
        }
    }

    if lower.is_ascii() && (english_hits >= 1 || tokens.len() >= ASCII_FALLBACK_TOKENS) {
        return Language::English;
    }

    Language::Undetermined
}

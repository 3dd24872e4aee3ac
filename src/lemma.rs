//! Noun-form lemmatization.
//!
//! Reduces tokens to their dictionary base form using an irregular-form
//! table followed by ordered suffix-detachment rules, the part-of-speech-
//! agnostic default-noun reduction applied by [`crate::normalize`]. Tokens
//! that are not wholly lowercase ASCII letters pass through unchanged, the
//! same observable behavior a dictionary-backed lemmatizer shows on a
//! lookup miss.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plural nouns that no suffix rule can reduce correctly.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("calves", "calf"),
    ("thieves", "thief"),
    ("scarves", "scarf"),
    ("elves", "elf"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("hypotheses", "hypothesis"),
    ("diagnoses", "diagnosis"),
    ("phenomena", "phenomenon"),
    ("criteria", "criterion"),
    ("buses", "bus"),
    ("viruses", "virus"),
    ("statuses", "status"),
    ("bonuses", "bonus"),
    ("campuses", "campus"),
];

/// Suffix detachment rules, tried in order on tokens of length >= 5.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("ies", "y"),
    ("men", "man"),
];

static IRREGULAR_NOUNS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_FORMS.iter().copied().collect());

/// Reduce a token to its noun base form.
///
/// # Examples
///
/// ```
/// use msg2user::lemma::lemmatize;
///
/// assert_eq!(lemmatize("cities"), "city");
/// assert_eq!(lemmatize("children"), "child");
/// assert_eq!(lemmatize("meeting"), "meeting");
/// ```
pub fn lemmatize(token: &str) -> String {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_lowercase()) {
        return token.to_string();
    }

    if let Some(lemma) = IRREGULAR_NOUNS.get(token) {
        return (*lemma).to_string();
    }

    if token.len() >= 5 {
        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                return format!("{stem}{replacement}");
            }
        }
    }

    // Plain plural "s", guarded against -ss/-us/-is endings where the
    // trailing "s" is part of the base form.
    if token.len() >= 4
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}

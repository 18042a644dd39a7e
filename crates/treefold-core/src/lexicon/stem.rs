//! Morphological base-form candidates (detachment rules plus irregular forms).
//!
//! Candidates are unchecked: the lexicon keeps only those present in its
//! lemma index.

use super::types::PartOfSpeech;

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

const EXCEPTIONS: &[(&str, &str, PartOfSpeech)] = &[
    ("children", "child", PartOfSpeech::Noun),
    ("feet", "foot", PartOfSpeech::Noun),
    ("geese", "goose", PartOfSpeech::Noun),
    ("mice", "mouse", PartOfSpeech::Noun),
    ("oxen", "ox", PartOfSpeech::Noun),
    ("people", "person", PartOfSpeech::Noun),
    ("teeth", "tooth", PartOfSpeech::Noun),
    ("wolves", "wolf", PartOfSpeech::Noun),
    ("women", "woman", PartOfSpeech::Noun),
    ("ate", "eat", PartOfSpeech::Verb),
    ("began", "begin", PartOfSpeech::Verb),
    ("been", "be", PartOfSpeech::Verb),
    ("caught", "catch", PartOfSpeech::Verb),
    ("did", "do", PartOfSpeech::Verb),
    ("gone", "go", PartOfSpeech::Verb),
    ("ran", "run", PartOfSpeech::Verb),
    ("saw", "see", PartOfSpeech::Verb),
    ("taught", "teach", PartOfSpeech::Verb),
    ("thought", "think", PartOfSpeech::Verb),
    ("was", "be", PartOfSpeech::Verb),
    ("went", "go", PartOfSpeech::Verb),
    ("were", "be", PartOfSpeech::Verb),
    ("best", "good", PartOfSpeech::Adjective),
    ("better", "good", PartOfSpeech::Adjective),
    ("worse", "bad", PartOfSpeech::Adjective),
    ("worst", "bad", PartOfSpeech::Adjective),
];

fn rules_for(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => NOUN_RULES,
        PartOfSpeech::Verb => VERB_RULES,
        PartOfSpeech::Adjective => ADJECTIVE_RULES,
        PartOfSpeech::Adverb => &[],
    }
}

/// Returns candidate base forms of `word`, irregular forms first, without
/// duplicates. With no part of speech every rule set is tried.
#[must_use]
pub fn candidate_stems(word: &str, pos: Option<PartOfSpeech>) -> Vec<String> {
    let word = word.trim().to_lowercase();
    let parts: Vec<PartOfSpeech> = match pos {
        Some(p) => vec![p],
        None => vec![
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::Adverb,
        ],
    };

    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && candidate != word && !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    for (form, base, form_pos) in EXCEPTIONS {
        if *form == word && parts.contains(form_pos) {
            push((*base).to_string());
        }
    }
    for part in &parts {
        for (suffix, replacement) in rules_for(*part) {
            if let Some(stem) = word.strip_suffix(suffix) {
                push(format!("{stem}{replacement}"));
            }
        }
    }
    out
}

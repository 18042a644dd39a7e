//! Lexicon data types and the lookup capability the walker consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::relation::RelationKind;

/// Part of speech of a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Noun.
    #[serde(alias = "n")]
    Noun,
    /// Verb.
    #[serde(alias = "v")]
    Verb,
    /// Adjective (satellites included).
    #[serde(alias = "a", alias = "s", alias = "adj")]
    Adjective,
    /// Adverb.
    #[serde(alias = "r", alias = "adv")]
    Adverb,
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "noun" => Ok(PartOfSpeech::Noun),
            "v" | "verb" => Ok(PartOfSpeech::Verb),
            "a" | "s" | "adj" | "adjective" => Ok(PartOfSpeech::Adjective),
            "r" | "adv" | "adverb" => Ok(PartOfSpeech::Adverb),
            other => Err(format!("unknown part of speech '{other}'")),
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
        };
        f.write_str(name)
    }
}

/// A word sense belonging to a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member id (sense key).
    pub id: String,
    /// Written form.
    pub lemma: String,
    /// Opaque content (usage examples, frames), passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Member {
    /// Creates a member without content.
    #[must_use]
    pub fn new(id: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lemma: lemma.into(),
            content: None,
        }
    }

    /// Sets the content (builder pattern).
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A set of synonymous members sharing a gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Unique concept id.
    pub id: String,
    /// Part of speech, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<PartOfSpeech>,
    /// Definition text, passed through verbatim.
    #[serde(default)]
    pub gloss: String,
    /// Ordered member ids.
    #[serde(default)]
    pub members: Vec<String>,
}

impl Concept {
    /// Creates a concept with a gloss and no members.
    #[must_use]
    pub fn new(id: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pos: None,
            gloss: gloss.into(),
            members: Vec::new(),
        }
    }

    /// Sets the part of speech (builder pattern).
    #[must_use]
    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = Some(pos);
        self
    }
}

/// Concept and relation lookups backing a walk.
///
/// Every lookup is synchronous and may miss; the walker treats a miss as a
/// pruned branch.
pub trait Lexicon {
    /// Returns the concept with the given id.
    fn lookup_concept(&self, id: &str) -> Option<Concept>;

    /// Returns the resolvable members of a concept, in order.
    fn lookup_members(&self, concept: &Concept) -> Vec<Member>;

    /// Returns the ids of concepts linked from `concept` by `kind`, in order.
    fn lookup_relations(&self, concept: &Concept, kind: RelationKind) -> Vec<String>;

    /// Returns the ids of concepts having `word` as a member.
    fn lookup_senses(&self, word: &str, pos: Option<PartOfSpeech>) -> Vec<String>;

    /// Returns base forms of `text` known to the lexicon.
    fn find_stems(&self, text: &str, pos: Option<PartOfSpeech>) -> Vec<String>;
}

//! In-memory lexicon (no disk access).
//!
//! Reference [`Lexicon`] provider: concepts, members and typed adjacency held
//! in hash maps, plus a lemma index for word lookups. Relation targets are
//! not required to exist, so dangling links behave like real lookup misses.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};

use super::relation::RelationKind;
use super::stem::candidate_stems;
use super::types::{Concept, Lexicon, Member, PartOfSpeech};

/// Lowercases a lemma and folds underscores to spaces.
fn normalize_lemma(lemma: &str) -> String {
    lemma.trim().replace('_', " ").to_lowercase()
}

/// In-memory storage for concepts, members and relations.
///
/// # Example
///
/// ```rust
/// use treefold_core::lexicon::{Concept, InMemoryLexicon, Lexicon, Member, RelationKind};
///
/// let mut lexicon = InMemoryLexicon::new();
/// lexicon.add_concept(Concept::new("dog.n.01", "a domesticated canine")).unwrap();
/// lexicon.add_concept(Concept::new("canine.n.02", "a carnivore")).unwrap();
/// lexicon.add_member("dog.n.01", Member::new("dog%1", "dog")).unwrap();
/// lexicon.add_relation("dog.n.01", RelationKind::Hypernym, "canine.n.02").unwrap();
///
/// let dog = lexicon.lookup_concept("dog.n.01").unwrap();
/// assert_eq!(lexicon.lookup_relations(&dog, RelationKind::Hypernym), vec!["canine.n.02"]);
/// assert_eq!(lexicon.lookup_senses("Dog", None), vec!["dog.n.01"]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLexicon {
    /// All concepts indexed by id.
    concepts: HashMap<String, Concept>,
    /// All members indexed by id.
    members: HashMap<String, Member>,
    /// Typed adjacency: (source concept, kind) -> ordered target ids.
    relations: HashMap<(String, RelationKind), Vec<String>>,
    /// Normalized lemma -> concept ids, in insertion order.
    senses: HashMap<String, Vec<String>>,
}

impl InMemoryLexicon {
    /// Creates an empty lexicon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lexicon with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(expected_concepts: usize) -> Self {
        Self {
            concepts: HashMap::with_capacity(expected_concepts),
            members: HashMap::with_capacity(expected_concepts.saturating_mul(2)),
            relations: HashMap::with_capacity(expected_concepts.saturating_mul(2)),
            senses: HashMap::with_capacity(expected_concepts.saturating_mul(2)),
        }
    }

    // ── Concepts ───────────────────────────────────────────────────────

    /// Adds a concept. Member ids already listed on it must be added with
    /// [`InMemoryLexicon::add_member`] to become resolvable.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConceptExists` if the id is taken.
    pub fn add_concept(&mut self, concept: Concept) -> Result<()> {
        if self.concepts.contains_key(&concept.id) {
            return Err(Error::ConceptExists(concept.id));
        }
        self.concepts.insert(concept.id.clone(), concept);
        Ok(())
    }

    /// Returns true if a concept with the given id exists.
    #[must_use]
    pub fn has_concept(&self, id: &str) -> bool {
        self.concepts.contains_key(id)
    }

    /// Returns the number of concepts.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    // ── Members ────────────────────────────────────────────────────────

    /// Adds a member to a concept and indexes its lemma.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownConcept` if the concept does not exist, or
    /// `Error::MemberExists` if the member id is taken.
    pub fn add_member(&mut self, concept_id: &str, member: Member) -> Result<()> {
        let concept = self
            .concepts
            .get_mut(concept_id)
            .ok_or_else(|| Error::UnknownConcept(concept_id.to_string()))?;
        if self.members.contains_key(&member.id) {
            return Err(Error::MemberExists(member.id));
        }

        if !concept.members.contains(&member.id) {
            concept.members.push(member.id.clone());
        }
        let ids = self.senses.entry(normalize_lemma(&member.lemma)).or_default();
        if !ids.iter().any(|id| id == concept_id) {
            ids.push(concept_id.to_string());
        }
        self.members.insert(member.id.clone(), member);
        Ok(())
    }

    /// Returns the number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // ── Relations ──────────────────────────────────────────────────────

    /// Adds a typed link. The target may be unknown.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownConcept` if the source does not exist.
    pub fn add_relation(&mut self, from: &str, kind: RelationKind, to: &str) -> Result<()> {
        if !self.concepts.contains_key(from) {
            return Err(Error::UnknownConcept(from.to_string()));
        }
        self.relations
            .entry((from.to_string(), kind))
            .or_default()
            .push(to.to_string());
        Ok(())
    }

    /// Returns the total number of links.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.values().map(Vec::len).sum()
    }

    fn pos_matches(&self, concept_id: &str, pos: Option<PartOfSpeech>) -> bool {
        match pos {
            None => true,
            Some(wanted) => self
                .concepts
                .get(concept_id)
                .is_some_and(|c| c.pos.is_none_or(|p| p == wanted)),
        }
    }
}

impl Lexicon for InMemoryLexicon {
    fn lookup_concept(&self, id: &str) -> Option<Concept> {
        self.concepts.get(id).cloned()
    }

    fn lookup_members(&self, concept: &Concept) -> Vec<Member> {
        concept
            .members
            .iter()
            .filter_map(|id| {
                let member = self.members.get(id).cloned();
                if member.is_none() {
                    debug!(concept = %concept.id, member = %id, "Member not found");
                }
                member
            })
            .collect()
    }

    fn lookup_relations(&self, concept: &Concept, kind: RelationKind) -> Vec<String> {
        self.relations
            .get(&(concept.id.clone(), kind))
            .cloned()
            .unwrap_or_default()
    }

    fn lookup_senses(&self, word: &str, pos: Option<PartOfSpeech>) -> Vec<String> {
        self.senses
            .get(&normalize_lemma(word))
            .map(|ids| {
                ids.iter()
                    .filter(|id| self.pos_matches(id, pos))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_stems(&self, text: &str, pos: Option<PartOfSpeech>) -> Vec<String> {
        candidate_stems(&normalize_lemma(text), pos)
            .into_iter()
            .filter(|stem| !self.lookup_senses(stem, pos).is_empty())
            .collect()
    }
}

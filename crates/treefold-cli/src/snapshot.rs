//! JSON lexicon snapshots.
//!
//! A snapshot lists concepts with their members and outgoing relations keyed
//! by relation symbol:
//!
//! ```json
//! { "concepts": [ { "id": "dog.n.01", "pos": "noun", "gloss": "...",
//!                   "members": [ { "id": "dog%1", "lemma": "dog" } ],
//!                   "relations": { "@": ["canine.n.02"] } } ] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use treefold_core::lexicon::{Concept, InMemoryLexicon, Member, PartOfSpeech, RelationKind};

#[derive(Debug, Deserialize)]
struct Snapshot {
    concepts: Vec<SnapshotConcept>,
}

#[derive(Debug, Deserialize)]
struct SnapshotConcept {
    id: String,
    #[serde(default)]
    pos: Option<PartOfSpeech>,
    #[serde(default)]
    gloss: String,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    relations: BTreeMap<String, Vec<String>>,
}

/// Reads a snapshot file into an in-memory lexicon.
pub fn load(path: &Path) -> Result<InMemoryLexicon> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lexicon snapshot {}", path.display()))?;
    let lexicon = parse(&text)
        .with_context(|| format!("Invalid lexicon snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        concepts = lexicon.concept_count(),
        members = lexicon.member_count(),
        relations = lexicon.relation_count(),
        "Lexicon snapshot loaded"
    );
    Ok(lexicon)
}

/// Parses snapshot text. Concepts are registered before any relation so
/// links may point forward.
pub fn parse(text: &str) -> Result<InMemoryLexicon> {
    let snapshot: Snapshot = serde_json::from_str(text).context("Malformed snapshot JSON")?;
    let mut lexicon = InMemoryLexicon::with_capacity(snapshot.concepts.len());

    for entry in &snapshot.concepts {
        let mut concept = Concept::new(entry.id.clone(), entry.gloss.clone());
        concept.pos = entry.pos;
        lexicon.add_concept(concept)?;
        for member in &entry.members {
            lexicon.add_member(&entry.id, member.clone())?;
        }
    }

    for entry in &snapshot.concepts {
        for (symbol, targets) in &entry.relations {
            let kind = RelationKind::from_symbol(symbol)
                .with_context(|| format!("Concept '{}'", entry.id))?;
            for target in targets {
                lexicon.add_relation(&entry.id, kind, target)?;
            }
        }
    }
    Ok(lexicon)
}

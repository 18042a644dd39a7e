//! Relation kinds and their descriptor registry.
//!
//! Each [`RelationKind`] maps to one static [`RelationDescriptor`] holding its
//! stable symbol, label, icon, edge style and whether traversal continues
//! across it. Symbols resolve through a map built once on first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::{Color, EdgeDecor, EdgeStyle, NodeStyle, Stroke, Terminator};

/// Typed, directed relation between concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// More general concept.
    Hypernym,
    /// Class of which the concept is an instance.
    InstanceHypernym,
    /// More specific concept.
    Hyponym,
    /// Instance of the concept.
    InstanceHyponym,
    /// Group the concept is a member of.
    MemberHolonym,
    /// Whole the concept is a substance of.
    SubstanceHolonym,
    /// Whole the concept is a part of.
    PartHolonym,
    /// Members of the concept.
    MemberMeronym,
    /// Substances of the concept.
    SubstanceMeronym,
    /// Parts of the concept.
    PartMeronym,
    /// Attribute values.
    Attribute,
    /// Morphologically derived forms.
    Derivation,
    /// Topic domain.
    DomainTopic,
    /// Region domain.
    DomainRegion,
    /// Usage domain.
    DomainUsage,
    /// Members of a topic domain.
    MemberTopic,
    /// Members of a region domain.
    MemberRegion,
    /// Members of a usage domain.
    MemberUsage,
    /// Verb entailment.
    Entails,
    /// Verb cause.
    Causes,
    /// See also.
    Also,
    /// Verb group.
    VerbGroup,
    /// Similar adjective.
    Similar,
    /// Participle of a verb.
    Participle,
    /// Pertains to noun.
    Pertainym,
    /// Opposite.
    Antonym,
}

impl RelationKind {
    /// Every kind, in registry order.
    pub const ALL: [RelationKind; 26] = [
        RelationKind::Hypernym,
        RelationKind::InstanceHypernym,
        RelationKind::Hyponym,
        RelationKind::InstanceHyponym,
        RelationKind::MemberHolonym,
        RelationKind::SubstanceHolonym,
        RelationKind::PartHolonym,
        RelationKind::MemberMeronym,
        RelationKind::SubstanceMeronym,
        RelationKind::PartMeronym,
        RelationKind::Attribute,
        RelationKind::Derivation,
        RelationKind::DomainTopic,
        RelationKind::DomainRegion,
        RelationKind::DomainUsage,
        RelationKind::MemberTopic,
        RelationKind::MemberRegion,
        RelationKind::MemberUsage,
        RelationKind::Entails,
        RelationKind::Causes,
        RelationKind::Also,
        RelationKind::VerbGroup,
        RelationKind::Similar,
        RelationKind::Participle,
        RelationKind::Pertainym,
        RelationKind::Antonym,
    ];

    /// Position in [`RelationKind::ALL`] and in the descriptor table.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the static descriptor for this kind.
    #[must_use]
    pub fn descriptor(self) -> &'static RelationDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// Returns the stable symbol (e.g. `@` for hypernym).
    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.descriptor().symbol
    }

    /// Returns the human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Returns whether traversal continues across edges of this kind.
    #[must_use]
    pub fn recurses(self) -> bool {
        self.descriptor().recurses
    }

    /// Resolves a symbol through the registry.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        registry()
            .by_symbol(symbol)
            .map(|d| d.kind)
            .ok_or_else(|| Error::UnknownRelation(symbol.to_string()))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static metadata for one relation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    /// The kind described.
    pub kind: RelationKind,
    /// Stable symbol.
    pub symbol: &'static str,
    /// Human label.
    pub label: &'static str,
    /// Icon reference.
    pub icon: &'static str,
    /// Whether traversal continues across edges of this kind.
    pub recurses: bool,
    /// Edge style for edges of this kind.
    pub edge: EdgeStyle,
    /// Edge and relation node color.
    pub color: Color,
}

impl RelationDescriptor {
    /// Builds the incoming edge decoration for nodes reached through this kind.
    #[must_use]
    pub fn edge_decor(&self) -> EdgeDecor {
        EdgeDecor::new(self.edge)
            .with_color(self.color)
            .with_icon(self.icon)
    }

    /// Builds the style of relation nodes of this kind.
    #[must_use]
    pub fn node_style(&self) -> NodeStyle {
        NodeStyle {
            fore_color: Some(self.color),
            back_color: None,
            icon: Some(self.icon.to_string()),
            edge: Some(self.edge_decor()),
        }
    }
}

const TAXONOMY: EdgeStyle = EdgeStyle::new(Stroke::Solid).with_to(Terminator::Triangle, true);
const PARTONOMY: EdgeStyle = EdgeStyle::new(Stroke::Solid).with_to(Terminator::Diamond, false);
const LEXICAL: EdgeStyle = EdgeStyle::new(Stroke::Dashed).with_to(Terminator::Arrow, false);
const DOMAIN: EdgeStyle = EdgeStyle::new(Stroke::Dotted).with_to(Terminator::Circle, false);
const VERBAL: EdgeStyle = EdgeStyle::new(Stroke::Solid).with_to(Terminator::Arrow, true);
const OPPOSITE: EdgeStyle = EdgeStyle::new(Stroke::Dashed)
    .with_from(Terminator::Arrow, false)
    .with_to(Terminator::Arrow, false);

const fn descriptor(
    kind: RelationKind,
    symbol: &'static str,
    label: &'static str,
    icon: &'static str,
    recurses: bool,
    edge: EdgeStyle,
    color: Color,
) -> RelationDescriptor {
    RelationDescriptor {
        kind,
        symbol,
        label,
        icon,
        recurses,
        edge,
        color,
    }
}

/// Descriptor table, indexed by [`RelationKind::index`].
#[rustfmt::skip]
static DESCRIPTORS: [RelationDescriptor; 26] = [
    descriptor(RelationKind::Hypernym, "@", "hypernym", "hypernym.png", true, TAXONOMY, Color::rgb(0x34, 0x65, 0xa4)),
    descriptor(RelationKind::InstanceHypernym, "@i", "instance hypernym", "instance_hypernym.png", true, TAXONOMY, Color::rgb(0x34, 0x65, 0xa4)),
    descriptor(RelationKind::Hyponym, "~", "hyponym", "hyponym.png", true, TAXONOMY, Color::rgb(0x72, 0x9f, 0xcf)),
    descriptor(RelationKind::InstanceHyponym, "~i", "instance hyponym", "instance_hyponym.png", true, TAXONOMY, Color::rgb(0x72, 0x9f, 0xcf)),
    descriptor(RelationKind::MemberHolonym, "#m", "member holonym", "holonym.png", true, PARTONOMY, Color::rgb(0x4e, 0x9a, 0x06)),
    descriptor(RelationKind::SubstanceHolonym, "#s", "substance holonym", "holonym.png", true, PARTONOMY, Color::rgb(0x4e, 0x9a, 0x06)),
    descriptor(RelationKind::PartHolonym, "#p", "part holonym", "holonym.png", true, PARTONOMY, Color::rgb(0x4e, 0x9a, 0x06)),
    descriptor(RelationKind::MemberMeronym, "%m", "member meronym", "meronym.png", true, PARTONOMY, Color::rgb(0x8a, 0xe2, 0x34)),
    descriptor(RelationKind::SubstanceMeronym, "%s", "substance meronym", "meronym.png", true, PARTONOMY, Color::rgb(0x8a, 0xe2, 0x34)),
    descriptor(RelationKind::PartMeronym, "%p", "part meronym", "meronym.png", true, PARTONOMY, Color::rgb(0x8a, 0xe2, 0x34)),
    descriptor(RelationKind::Attribute, "=", "attribute", "attribute.png", false, LEXICAL, Color::rgb(0xc4, 0xa0, 0x00)),
    descriptor(RelationKind::Derivation, "+", "derivation", "derivation.png", false, LEXICAL, Color::rgb(0xc4, 0xa0, 0x00)),
    descriptor(RelationKind::DomainTopic, ";c", "topic domain", "domain.png", false, DOMAIN, Color::rgb(0x75, 0x50, 0x7b)),
    descriptor(RelationKind::DomainRegion, ";r", "region domain", "domain.png", false, DOMAIN, Color::rgb(0x75, 0x50, 0x7b)),
    descriptor(RelationKind::DomainUsage, ";u", "usage domain", "domain.png", false, DOMAIN, Color::rgb(0x75, 0x50, 0x7b)),
    descriptor(RelationKind::MemberTopic, "-c", "topic member", "domain_member.png", false, DOMAIN, Color::rgb(0xad, 0x7f, 0xa8)),
    descriptor(RelationKind::MemberRegion, "-r", "region member", "domain_member.png", false, DOMAIN, Color::rgb(0xad, 0x7f, 0xa8)),
    descriptor(RelationKind::MemberUsage, "-u", "usage member", "domain_member.png", false, DOMAIN, Color::rgb(0xad, 0x7f, 0xa8)),
    descriptor(RelationKind::Entails, "*", "entails", "entails.png", true, VERBAL, Color::rgb(0xce, 0x5c, 0x00)),
    descriptor(RelationKind::Causes, ">", "causes", "causes.png", true, VERBAL, Color::rgb(0xce, 0x5c, 0x00)),
    descriptor(RelationKind::Also, "^", "see also", "also.png", false, LEXICAL, Color::rgb(0x55, 0x57, 0x53)),
    descriptor(RelationKind::VerbGroup, "$", "verb group", "verb_group.png", false, LEXICAL, Color::rgb(0xf5, 0x79, 0x00)),
    descriptor(RelationKind::Similar, "&", "similar", "similar.png", false, LEXICAL, Color::rgb(0x55, 0x57, 0x53)),
    descriptor(RelationKind::Participle, "<", "participle", "participle.png", false, LEXICAL, Color::rgb(0x55, 0x57, 0x53)),
    descriptor(RelationKind::Pertainym, "\\", "pertainym", "pertainym.png", false, LEXICAL, Color::rgb(0x55, 0x57, 0x53)),
    descriptor(RelationKind::Antonym, "!", "antonym", "antonym.png", false, OPPOSITE, Color::rgb(0xcc, 0x00, 0x00)),
];

/// Symbol lookup over the descriptor table.
#[derive(Debug)]
pub struct RelationRegistry {
    by_symbol: HashMap<&'static str, &'static RelationDescriptor>,
}

impl RelationRegistry {
    fn build() -> Self {
        let by_symbol = DESCRIPTORS.iter().map(|d| (d.symbol, d)).collect();
        Self { by_symbol }
    }

    /// Resolves a symbol to its descriptor.
    #[must_use]
    pub fn by_symbol(&self, symbol: &str) -> Option<&'static RelationDescriptor> {
        self.by_symbol.get(symbol).copied()
    }

    /// Returns all descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &'static RelationDescriptor> {
        DESCRIPTORS.iter()
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    /// Returns true if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

/// Returns the process-wide relation registry.
pub fn registry() -> &'static RelationRegistry {
    static REGISTRY: OnceLock<RelationRegistry> = OnceLock::new();
    REGISTRY.get_or_init(RelationRegistry::build)
}

bitflags! {
    /// Inclusion bitmask over relation kinds.
    ///
    /// Bit `n` stands for `RelationKind::ALL[n]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RelationSet: u64 {
        /// `@`
        const HYPERNYM = 1 << 0;
        /// `@i`
        const INSTANCE_HYPERNYM = 1 << 1;
        /// `~`
        const HYPONYM = 1 << 2;
        /// `~i`
        const INSTANCE_HYPONYM = 1 << 3;
        /// `#m`
        const MEMBER_HOLONYM = 1 << 4;
        /// `#s`
        const SUBSTANCE_HOLONYM = 1 << 5;
        /// `#p`
        const PART_HOLONYM = 1 << 6;
        /// `%m`
        const MEMBER_MERONYM = 1 << 7;
        /// `%s`
        const SUBSTANCE_MERONYM = 1 << 8;
        /// `%p`
        const PART_MERONYM = 1 << 9;
        /// `=`
        const ATTRIBUTE = 1 << 10;
        /// `+`
        const DERIVATION = 1 << 11;
        /// `;c`
        const DOMAIN_TOPIC = 1 << 12;
        /// `;r`
        const DOMAIN_REGION = 1 << 13;
        /// `;u`
        const DOMAIN_USAGE = 1 << 14;
        /// `-c`
        const MEMBER_TOPIC = 1 << 15;
        /// `-r`
        const MEMBER_REGION = 1 << 16;
        /// `-u`
        const MEMBER_USAGE = 1 << 17;
        /// `*`
        const ENTAILS = 1 << 18;
        /// `>`
        const CAUSES = 1 << 19;
        /// `^`
        const ALSO = 1 << 20;
        /// `$`
        const VERB_GROUP = 1 << 21;
        /// `&`
        const SIMILAR = 1 << 22;
        /// `<`
        const PARTICIPLE = 1 << 23;
        /// `\`
        const PERTAINYM = 1 << 24;
        /// `!`
        const ANTONYM = 1 << 25;
    }
}

impl RelationSet {
    /// Adds a kind (builder pattern).
    #[must_use]
    pub fn with(self, kind: RelationKind) -> Self {
        self | Self::from(kind)
    }

    /// Returns true if the kind is included.
    #[must_use]
    pub fn includes(self, kind: RelationKind) -> bool {
        self.contains(Self::from(kind))
    }

    /// Builds a set from relation symbols. An empty list means every kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRelation` for the first unknown symbol.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self> {
        if symbols.is_empty() {
            return Ok(Self::all());
        }
        symbols
            .iter()
            .map(|s| RelationKind::from_symbol(s.as_ref().trim()))
            .collect()
    }

    /// Iterates over included kinds in registry order.
    pub fn kinds(self) -> impl Iterator<Item = RelationKind> {
        RelationKind::ALL
            .into_iter()
            .filter(move |kind| self.includes(*kind))
    }
}

impl From<RelationKind> for RelationSet {
    fn from(kind: RelationKind) -> Self {
        Self::from_bits_retain(1 << kind.index())
    }
}

impl FromIterator<RelationKind> for RelationSet {
    fn from_iter<I: IntoIterator<Item = RelationKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), RelationSet::with)
    }
}

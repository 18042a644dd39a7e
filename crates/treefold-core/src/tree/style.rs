//! Edge and node decoration carried through to the renderer.
//!
//! None of these values are interpreted by the walker; they are chosen from
//! relation descriptors or configured styles and copied onto produced nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    /// Creates a color from its red, green and blue components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parses `#rrggbb` or `rrggbb`.
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }

    /// Returns the packed `0xRRGGBB` value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Line kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stroke {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
}

/// Marker drawn at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminator {
    /// No marker.
    #[default]
    None,
    /// Triangle arrow head.
    Triangle,
    /// Circle.
    Circle,
    /// Diamond.
    Diamond,
    /// Open arrow.
    Arrow,
    /// Hook.
    Hook,
}

impl Terminator {
    const ALL: [Terminator; 6] = [
        Terminator::None,
        Terminator::Triangle,
        Terminator::Circle,
        Terminator::Diamond,
        Terminator::Arrow,
        Terminator::Hook,
    ];

    fn code(self) -> u32 {
        match self {
            Terminator::None => 0,
            Terminator::Triangle => 1,
            Terminator::Circle => 2,
            Terminator::Diamond => 3,
            Terminator::Arrow => 4,
            Terminator::Hook => 5,
        }
    }

    fn from_code(code: u32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .unwrap_or_default()
    }
}

// Packed layout, used only when talking to renderers that expect one integer:
//   bits 0-1  stroke
//   bits 2-4  from terminator, bit 5 from fill
//   bits 6-8  to terminator,   bit 9 to fill
//   bit  10   hidden
const STROKE_MASK: u32 = 0b11;
const TERMINATOR_MASK: u32 = 0b111;
const FROM_SHIFT: u32 = 2;
const FROM_FILL: u32 = 1 << 5;
const TO_SHIFT: u32 = 6;
const TO_FILL: u32 = 1 << 9;
const HIDDEN: u32 = 1 << 10;

/// Visual style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    /// Line kind.
    pub stroke: Stroke,
    /// Marker at the source end.
    pub from_terminator: Terminator,
    /// Whether the source marker is filled.
    pub from_fill: bool,
    /// Marker at the target end.
    pub to_terminator: Terminator,
    /// Whether the target marker is filled.
    pub to_fill: bool,
    /// Edge is present but not drawn.
    pub hidden: bool,
}

impl EdgeStyle {
    /// Creates a style with the given stroke and no markers.
    #[must_use]
    pub const fn new(stroke: Stroke) -> Self {
        Self {
            stroke,
            from_terminator: Terminator::None,
            from_fill: false,
            to_terminator: Terminator::None,
            to_fill: false,
            hidden: false,
        }
    }

    /// Sets the target marker (builder pattern).
    #[must_use]
    pub const fn with_to(mut self, terminator: Terminator, fill: bool) -> Self {
        self.to_terminator = terminator;
        self.to_fill = fill;
        self
    }

    /// Sets the source marker (builder pattern).
    #[must_use]
    pub const fn with_from(mut self, terminator: Terminator, fill: bool) -> Self {
        self.from_terminator = terminator;
        self.from_fill = fill;
        self
    }

    /// Marks the edge hidden (builder pattern).
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Folds the style into its packed integer form.
    #[must_use]
    pub fn to_packed(&self) -> u32 {
        let stroke = match self.stroke {
            Stroke::Solid => 0,
            Stroke::Dashed => 1,
            Stroke::Dotted => 2,
        };
        let mut packed = stroke;
        packed |= self.from_terminator.code() << FROM_SHIFT;
        packed |= self.to_terminator.code() << TO_SHIFT;
        if self.from_fill {
            packed |= FROM_FILL;
        }
        if self.to_fill {
            packed |= TO_FILL;
        }
        if self.hidden {
            packed |= HIDDEN;
        }
        packed
    }

    /// Unfolds a packed integer. Unknown codes fall back to the defaults.
    #[must_use]
    pub fn from_packed(packed: u32) -> Self {
        let stroke = match packed & STROKE_MASK {
            1 => Stroke::Dashed,
            2 => Stroke::Dotted,
            _ => Stroke::Solid,
        };
        Self {
            stroke,
            from_terminator: Terminator::from_code((packed >> FROM_SHIFT) & TERMINATOR_MASK),
            from_fill: packed & FROM_FILL != 0,
            to_terminator: Terminator::from_code((packed >> TO_SHIFT) & TERMINATOR_MASK),
            to_fill: packed & TO_FILL != 0,
            hidden: packed & HIDDEN != 0,
        }
    }
}

/// Metadata for the edge leading into a node (or a cross edge).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDecor {
    /// Text drawn along the edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Line and marker style.
    pub style: EdgeStyle,
    /// Line color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Icon reference drawn on the edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl EdgeDecor {
    /// Creates a decoration with the given style.
    #[must_use]
    pub fn new(style: EdgeStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Sets the edge label (builder pattern).
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the edge color (builder pattern).
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the edge icon (builder pattern).
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Styling applied to a whole category of nodes (groups, etc nodes, sections).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fore_color: Option<Color>,
    /// Background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_color: Option<Color>,
    /// Icon reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Decoration of the edge leading into the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeDecor>,
}

impl NodeStyle {
    /// Creates a style with the given colors.
    #[must_use]
    pub fn colored(fore: Color, back: Color) -> Self {
        Self {
            fore_color: Some(fore),
            back_color: Some(back),
            ..Self::default()
        }
    }

    /// Sets the icon (builder pattern).
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the incoming edge decoration (builder pattern).
    #[must_use]
    pub fn with_edge(mut self, edge: EdgeDecor) -> Self {
        self.edge = Some(edge);
        self
    }
}

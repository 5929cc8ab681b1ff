//! Element kinds recognized by the traversal.
//!
//! Every type tag stored in the `elements` registry maps onto exactly one
//! [`ElementKind`]: a container that is traced to its owner, a terminal kind
//! that becomes a result, or [`ElementKind::Unclassified`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block-like records that are never reported themselves, only their owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKind {
    SuperTableBlock,
    MatrixBlock,
}

impl ContainerKind {
    /// Resolution order inside the normalizer.
    pub const PRIORITY: [Self; 2] = [Self::SuperTableBlock, Self::MatrixBlock];

    /// Type tag as stored in `elements.type`.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::SuperTableBlock => "SuperTable_Block",
            Self::MatrixBlock => "MatrixBlock",
        }
    }

    /// Unprefixed name of the ownership table (`id`, `ownerId`).
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::SuperTableBlock => "supertableblocks",
            Self::MatrixBlock => "matrixblocks",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::SuperTableBlock => 0,
            Self::MatrixBlock => 1,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Element kinds that appear in the final map.
///
/// Serializes to the lowercase result type consumed by the editor panel
/// (`entry`, `globalset`, `category`, `tag`, `asset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    Entry,
    GlobalSet,
    Category,
    Tag,
    Asset,
}

impl TerminalKind {
    /// Resolution order inside the normalizer.
    pub const PRIORITY: [Self; 5] = [
        Self::Entry,
        Self::GlobalSet,
        Self::Category,
        Self::Tag,
        Self::Asset,
    ];

    /// Type tag as stored in `elements.type`.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::GlobalSet => "GlobalSet",
            Self::Category => "Category",
            Self::Tag => "Tag",
            Self::Asset => "Asset",
        }
    }

    /// Result type string written into [`crate::ResultItem::kind`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::GlobalSet => "globalset",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Asset => "asset",
        }
    }

    /// Control panel icon name the editor panel shows next to a result.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Entry => "section",
            Self::GlobalSet => "globe",
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::Asset => "assets",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Entry => 0,
            Self::GlobalSet => 1,
            Self::Category => 2,
            Self::Tag => 3,
            Self::Asset => 4,
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon used for result types the panel has no dedicated icon for.
pub const DEFAULT_ICON: &str = "world";

/// Icon for a raw result type string, falling back to [`DEFAULT_ICON`].
#[must_use]
pub fn icon_for_type(result_type: &str) -> &'static str {
    TerminalKind::PRIORITY
        .into_iter()
        .find(|kind| kind.as_str() == result_type)
        .map_or(DEFAULT_ICON, TerminalKind::icon)
}

/// Classification of a stored element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Container(ContainerKind),
    Terminal(TerminalKind),
    Unclassified,
}

impl ElementKind {
    /// Map an `elements.type` tag onto a kind. Total: unknown tags are
    /// [`ElementKind::Unclassified`].
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Self {
        ContainerKind::PRIORITY
            .into_iter()
            .find(|kind| kind.type_tag() == tag)
            .map(Self::Container)
            .or_else(|| {
                TerminalKind::PRIORITY
                    .into_iter()
                    .find(|kind| kind.type_tag() == tag)
                    .map(Self::Terminal)
            })
            .unwrap_or(Self::Unclassified)
    }

    /// Returns `true` for kinds the normalizer drains.
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(kind) => f.write_str(kind.type_tag()),
            Self::Terminal(kind) => f.write_str(kind.type_tag()),
            Self::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// An element id paired with its registered type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub id: i64,
    pub type_tag: String,
}

impl ElementRef {
    pub fn new(id: i64, type_tag: impl Into<String>) -> Self {
        Self {
            id,
            type_tag: type_tag.into(),
        }
    }

    /// Classified kind of this element's type tag.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        ElementKind::from_type_tag(&self.type_tag)
    }
}

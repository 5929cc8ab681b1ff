//! Element map traversal.
//!
//! [`ElementMapper`] answers one question for one element: what references
//! it, and what do it and its blocks reference?
//!
//! - **Incoming**: relations whose target is the element, with any block
//!   sources traced back up to their owning elements.
//! - **Outgoing**: relations whose source is the element or one of its
//!   blocks. Blocks are expanded two levels, in both nesting orders:
//!   element → matrix → supertable and element → supertable → matrix.
//!
//! Each direction runs through its own [`GroupContainer`]; results are not
//! de-duplicated across directions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::{MapConfig, SiteConfig};
use crate::db::{Direction, RelationStore};
use crate::error::MapError;
use crate::groups::GroupContainer;
use crate::kind::{ContainerKind, ElementRef, TerminalKind};
use crate::links::LinkBuilder;
use crate::normalize::{DEFAULT_ROUND_LIMIT, NormalizeContext, normalize};

/// One resolved element, as rendered by the editor panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TerminalKind,
    pub title: String,
    pub url: String,
}

/// Incoming and outgoing relationships of one element.
///
/// Serializes as `{"from": [...], "to": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMap {
    /// Elements that reference the target (incoming).
    pub from: Vec<ResultItem>,
    /// Elements the target or its blocks reference (outgoing).
    pub to: Vec<ResultItem>,
}

/// Resolves element maps against a [`RelationStore`].
#[derive(Debug)]
pub struct ElementMapper<'s, S: ?Sized> {
    store: &'s S,
    locale: String,
    links: LinkBuilder,
    round_limit: usize,
}

impl<'s, S: RelationStore + ?Sized> ElementMapper<'s, S> {
    /// Mapper resolving relations and titles in `site.locale`.
    #[must_use]
    pub fn new(store: &'s S, site: &SiteConfig) -> Self {
        Self {
            store,
            locale: site.locale.clone(),
            links: LinkBuilder::new(site),
            round_limit: DEFAULT_ROUND_LIMIT,
        }
    }

    /// Mapper configured from the full config (site plus traversal limits).
    #[must_use]
    pub fn from_config(store: &'s S, config: &MapConfig) -> Self {
        Self::new(store, &config.site).with_round_limit(config.traversal.round_limit)
    }

    #[must_use]
    pub const fn with_round_limit(mut self, round_limit: usize) -> Self {
        self.round_limit = round_limit;
        self
    }

    fn context(&self) -> NormalizeContext<'_> {
        NormalizeContext {
            locale: &self.locale,
            links: &self.links,
            round_limit: self.round_limit,
        }
    }

    /// Incoming and outgoing relationships of `target_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidId`] for non-positive ids, and store or
    /// round-limit errors from either direction. No partial map is returned.
    pub fn element_map(&self, target_id: i64) -> Result<ElementMap, MapError> {
        if target_id <= 0 {
            return Err(MapError::InvalidId(target_id.to_string()));
        }

        let from = self.incoming(target_id)?;
        let to = self.outgoing(target_id)?;
        debug!(
            target_id,
            incoming = from.len(),
            outgoing = to.len(),
            "element map resolved"
        );
        Ok(ElementMap { from, to })
    }

    /// Elements referencing `target_id`, with blocks traced to their owners.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if a lookup fails or normalization does not converge.
    pub fn incoming(&self, target_id: i64) -> Result<Vec<ResultItem>, MapError> {
        let related = self.store.fetch_related(
            &BTreeSet::from([target_id]),
            Direction::AsTarget,
            &self.locale,
        )?;
        self.resolve(&related)
    }

    /// Elements referenced by `target_id` or any block it owns.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if a lookup fails or normalization does not converge.
    pub fn outgoing(&self, target_id: i64) -> Result<Vec<ResultItem>, MapError> {
        let sources = self.outgoing_node_set(target_id)?;
        let related = self
            .store
            .fetch_related(&sources, Direction::AsSource, &self.locale)?;
        self.resolve(&related)
    }

    /// The target plus the blocks it owns, two levels deep in both nesting
    /// orders.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Store`] if a block lookup fails.
    pub fn outgoing_node_set(&self, target_id: i64) -> Result<BTreeSet<i64>, MapError> {
        let root = BTreeSet::from([target_id]);

        let matrix = self.owned(ContainerKind::MatrixBlock, &root)?;
        let matrix_supertable = self.owned(ContainerKind::SuperTableBlock, &matrix)?;
        let supertable = self.owned(ContainerKind::SuperTableBlock, &root)?;
        let supertable_matrix = self.owned(ContainerKind::MatrixBlock, &supertable)?;

        let mut nodes = root;
        nodes.extend(matrix);
        nodes.extend(matrix_supertable);
        nodes.extend(supertable);
        nodes.extend(supertable_matrix);
        Ok(nodes)
    }

    fn owned(
        &self,
        kind: ContainerKind,
        owners: &BTreeSet<i64>,
    ) -> Result<BTreeSet<i64>, MapError> {
        if owners.is_empty() {
            return Ok(BTreeSet::new());
        }
        Ok(self
            .store
            .fetch_container_ids_by_owners(kind, owners)?
            .into_iter()
            .collect())
    }

    fn resolve(&self, related: &[ElementRef]) -> Result<Vec<ResultItem>, MapError> {
        let mut groups = GroupContainer::from_refs(related);
        normalize(self.store, &mut groups, &self.context())?;
        Ok(groups.into_results())
    }
}

/// Parse a raw request id. Only positive base-10 integers are accepted.
///
/// # Errors
///
/// Returns [`MapError::InvalidId`] for empty, non-numeric, or non-positive input.
pub fn parse_element_id(raw: &str) -> Result<i64, MapError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MapError::InvalidId(raw.to_string())),
    }
}

/// Resolve the map of `target_id` with default traversal limits.
///
/// # Errors
///
/// See [`ElementMapper::element_map`].
pub fn get_element_map<S: RelationStore + ?Sized>(
    store: &S,
    target_id: i64,
    site: &SiteConfig,
) -> Result<ElementMap, MapError> {
    ElementMapper::new(store, site).element_map(target_id)
}

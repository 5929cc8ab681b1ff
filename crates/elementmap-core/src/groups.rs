//! Per-direction grouping of element ids by kind.
//!
//! A [`GroupContainer`] is created fresh for each traversal direction. Ids
//! are classified into one bucket per recognized kind (or the unclassified
//! bucket), buckets are drained by the normalizer, and resolved result items
//! accumulate in order.

use std::collections::BTreeSet;

use crate::kind::{ContainerKind, ElementKind, ElementRef, TerminalKind};
use crate::map::ResultItem;

/// Buckets of pending ids plus the accumulated results for one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupContainer {
    containers: [Vec<i64>; 2],
    terminals: [Vec<i64>; 5],
    unclassified: Vec<i64>,
    results: Vec<ResultItem>,
}

impl GroupContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container seeded with `items`.
    #[must_use]
    pub fn from_refs<'a>(items: impl IntoIterator<Item = &'a ElementRef>) -> Self {
        let mut groups = Self::new();
        groups.classify(items);
        groups
    }

    /// Append each id to the bucket of its kind, in input order.
    ///
    /// Unknown type tags land in the unclassified bucket. Duplicates are kept.
    pub fn classify<'a>(&mut self, items: impl IntoIterator<Item = &'a ElementRef>) {
        for item in items {
            self.bucket_mut(item.kind()).push(item.id);
        }
    }

    fn bucket_mut(&mut self, kind: ElementKind) -> &mut Vec<i64> {
        match kind {
            ElementKind::Container(kind) => &mut self.containers[kind.index()],
            ElementKind::Terminal(kind) => &mut self.terminals[kind.index()],
            ElementKind::Unclassified => &mut self.unclassified,
        }
    }

    /// Ids currently waiting in the bucket for `kind`.
    #[must_use]
    pub fn bucket(&self, kind: ElementKind) -> &[i64] {
        match kind {
            ElementKind::Container(kind) => &self.containers[kind.index()],
            ElementKind::Terminal(kind) => &self.terminals[kind.index()],
            ElementKind::Unclassified => &self.unclassified,
        }
    }

    /// Highest-priority recognized kind with pending ids: containers first
    /// (SuperTable before Matrix), then terminals (Entry, GlobalSet,
    /// Category, Tag, Asset).
    #[must_use]
    pub fn next_pending(&self) -> Option<ElementKind> {
        ContainerKind::PRIORITY
            .into_iter()
            .map(ElementKind::Container)
            .chain(TerminalKind::PRIORITY.into_iter().map(ElementKind::Terminal))
            .find(|kind| !self.bucket(*kind).is_empty())
    }

    /// Returns `true` once every recognized bucket is empty.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.next_pending().is_none()
    }

    /// Empty a recognized bucket and return its distinct ids.
    ///
    /// The unclassified bucket is never drained; asking for it returns an
    /// empty set.
    pub fn drain(&mut self, kind: ElementKind) -> BTreeSet<i64> {
        if !kind.is_recognized() {
            return BTreeSet::new();
        }
        std::mem::take(self.bucket_mut(kind)).into_iter().collect()
    }

    pub fn extend_results(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.results.extend(items);
    }

    #[must_use]
    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    #[must_use]
    pub fn into_results(self) -> Vec<ResultItem> {
        self.results
    }

    /// Ids whose type tag is not recognized. These never become results.
    #[must_use]
    pub fn unclassified(&self) -> &[i64] {
        &self.unclassified
    }
}

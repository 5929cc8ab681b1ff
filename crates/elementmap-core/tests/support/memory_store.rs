//! In-memory [`RelationStore`] that records every lookup it serves.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use elementmap_core::db::{Direction, DisplayRecord, EditTarget, RelationStore};
use elementmap_core::{ContainerKind, ElementRef, StoreError, TerminalKind};

/// One lookup issued against the store, with the size of its id set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Related(Direction, usize),
    Owners(ContainerKind, usize),
    OwnedBy(ContainerKind, usize),
    Display(TerminalKind, usize),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    elements: BTreeMap<i64, String>,
    relations: Vec<(i64, i64, Option<String>)>,
    blocks: BTreeMap<i64, (ContainerKind, i64)>,
    titles: BTreeMap<i64, String>,
    calls: RefCell<Vec<Call>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element with any type tag (recognized or not).
    pub fn element(&mut self, id: i64, type_tag: &str) -> &mut Self {
        self.elements.insert(id, type_tag.to_string());
        self
    }

    /// Register a terminal element with a title.
    pub fn terminal(&mut self, id: i64, kind: TerminalKind, title: &str) -> &mut Self {
        self.elements.insert(id, kind.type_tag().to_string());
        self.titles.insert(id, title.to_string());
        self
    }

    /// Register a container element owned by `owner`.
    pub fn block(&mut self, kind: ContainerKind, id: i64, owner: i64) -> &mut Self {
        self.elements.insert(id, kind.type_tag().to_string());
        self.blocks.insert(id, (kind, owner));
        self
    }

    pub fn relation(&mut self, source: i64, target: i64) -> &mut Self {
        self.relations.push((source, target, None));
        self
    }

    pub fn localized_relation(&mut self, source: i64, target: i64, locale: &str) -> &mut Self {
        self.relations.push((source, target, Some(locale.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn element_ref(&self, id: i64) -> Option<ElementRef> {
        self.elements
            .get(&id)
            .map(|tag| ElementRef::new(id, tag.clone()))
    }
}

impl RelationStore for MemoryStore {
    fn fetch_related(
        &self,
        ids: &BTreeSet<i64>,
        direction: Direction,
        locale: &str,
    ) -> Result<Vec<ElementRef>, StoreError> {
        self.record(Call::Related(direction, ids.len()));
        Ok(self
            .relations
            .iter()
            .filter(|(_, _, source_locale)| {
                source_locale.as_deref().is_none_or(|l| l == locale)
            })
            .filter_map(|(source, target, _)| match direction {
                Direction::AsTarget if ids.contains(target) => Some(*source),
                Direction::AsSource if ids.contains(source) => Some(*target),
                _ => None,
            })
            .filter_map(|id| self.element_ref(id))
            .collect())
    }

    fn fetch_container_owners(
        &self,
        kind: ContainerKind,
        container_ids: &BTreeSet<i64>,
    ) -> Result<Vec<ElementRef>, StoreError> {
        self.record(Call::Owners(kind, container_ids.len()));
        Ok(container_ids
            .iter()
            .filter_map(|id| self.blocks.get(id))
            .filter(|(block_kind, _)| *block_kind == kind)
            .filter_map(|(_, owner)| self.element_ref(*owner))
            .collect())
    }

    fn fetch_container_ids_by_owners(
        &self,
        kind: ContainerKind,
        owner_ids: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, StoreError> {
        self.record(Call::OwnedBy(kind, owner_ids.len()));
        Ok(self
            .blocks
            .iter()
            .filter(|(_, (block_kind, owner))| *block_kind == kind && owner_ids.contains(owner))
            .map(|(id, _)| *id)
            .collect())
    }

    fn fetch_display_records(
        &self,
        kind: TerminalKind,
        ids: &BTreeSet<i64>,
        _locale: &str,
    ) -> Result<Vec<DisplayRecord>, StoreError> {
        self.record(Call::Display(kind, ids.len()));
        Ok(ids
            .iter()
            .filter(|id| self.elements.get(*id).map(String::as_str) == Some(kind.type_tag()))
            .map(|id| DisplayRecord {
                id: *id,
                kind,
                title: self.titles.get(id).cloned(),
                target: match kind {
                    TerminalKind::Entry => EditTarget::Entry {
                        section: "pages".to_string(),
                        slug: None,
                    },
                    TerminalKind::Category => EditTarget::Category {
                        group: "topics".to_string(),
                        slug: None,
                    },
                    TerminalKind::GlobalSet => EditTarget::GlobalSet {
                        handle: format!("set{id}"),
                    },
                    TerminalKind::Tag => EditTarget::Tag { group_id: 1 },
                    TerminalKind::Asset => EditTarget::Asset { url: None },
                },
            })
            .collect())
    }
}

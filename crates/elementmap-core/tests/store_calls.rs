//! Lookup-shape tests: which store calls a traversal issues, and with what.

use elementmap_core::config::SiteConfig;
use elementmap_core::db::Direction;
use elementmap_core::{ContainerKind, ElementMapper, TerminalKind};

#[path = "support/memory_store.rs"]
#[allow(dead_code)]
mod memory_store;
use memory_store::{Call, MemoryStore};

#[test]
fn isolated_element_issues_only_initial_lookups() {
    let mut store = MemoryStore::new();
    store.terminal(1, TerminalKind::Entry, "Alone");

    let map = ElementMapper::new(&store, &SiteConfig::default())
        .element_map(1)
        .expect("map");
    assert!(map.from.is_empty());
    assert!(map.to.is_empty());
    assert_eq!(
        store.calls(),
        vec![
            Call::Related(Direction::AsTarget, 1),
            Call::OwnedBy(ContainerKind::MatrixBlock, 1),
            Call::OwnedBy(ContainerKind::SuperTableBlock, 1),
            Call::Related(Direction::AsSource, 1),
        ]
    );
}

#[test]
fn second_level_lookups_run_only_for_found_blocks() {
    let mut store = MemoryStore::new();
    store
        .terminal(100, TerminalKind::Entry, "Home")
        .block(ContainerKind::MatrixBlock, 300, 100)
        .block(ContainerKind::SuperTableBlock, 301, 300);

    let nodes = ElementMapper::new(&store, &SiteConfig::default())
        .outgoing_node_set(100)
        .expect("node set");
    assert_eq!(nodes.into_iter().collect::<Vec<_>>(), vec![100, 300, 301]);
    assert_eq!(
        store.calls(),
        vec![
            Call::OwnedBy(ContainerKind::MatrixBlock, 1),
            Call::OwnedBy(ContainerKind::SuperTableBlock, 1),
            Call::OwnedBy(ContainerKind::SuperTableBlock, 1),
        ]
    );
}

#[test]
fn owner_reached_twice_is_fetched_once() {
    let mut store = MemoryStore::new();
    store
        .terminal(5, TerminalKind::Tag, "rust")
        .terminal(100, TerminalKind::Entry, "Home")
        .block(ContainerKind::MatrixBlock, 300, 100)
        .relation(100, 5)
        .relation(300, 5);

    let from = ElementMapper::new(&store, &SiteConfig::default())
        .incoming(5)
        .expect("incoming");
    assert_eq!(from.len(), 1);
    assert_eq!(from[0].id, 100);

    let calls = store.calls();
    assert!(calls.contains(&Call::Owners(ContainerKind::MatrixBlock, 1)));
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, Call::Display(TerminalKind::Entry, _)))
            .collect::<Vec<_>>(),
        vec![&Call::Display(TerminalKind::Entry, 1)]
    );
}

#[test]
fn unrecognized_sources_never_reach_display_lookups() {
    let mut store = MemoryStore::new();
    store
        .terminal(1, TerminalKind::Entry, "Home")
        .element(9, "User")
        .element(10, "Neo_Block")
        .relation(9, 1)
        .relation(10, 1);

    let from = ElementMapper::new(&store, &SiteConfig::default())
        .incoming(1)
        .expect("incoming");
    assert!(from.is_empty());
    assert!(
        !store
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Display(..) | Call::Owners(..)))
    );
}

#[test]
fn locale_scoped_relations_are_filtered() {
    let mut store = MemoryStore::new();
    store
        .terminal(1, TerminalKind::Entry, "Home")
        .terminal(2, TerminalKind::Asset, "Logo")
        .terminal(3, TerminalKind::Asset, "Logo (de)")
        .relation(1, 2)
        .localized_relation(1, 3, "de");

    let english = ElementMapper::new(&store, &SiteConfig::default())
        .outgoing(1)
        .expect("outgoing");
    assert_eq!(english.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

    let site = SiteConfig {
        locale: "de".to_string(),
        ..SiteConfig::default()
    };
    let german = ElementMapper::new(&store, &site)
        .outgoing(1)
        .expect("outgoing");
    assert_eq!(german.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
}

use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::BTreeSet;

use elementmap_core::config::SiteConfig;
use elementmap_core::groups::GroupContainer;
use elementmap_core::links::LinkBuilder;
use elementmap_core::normalize::{NormalizeContext, normalize};
use elementmap_core::{ContainerKind, ElementRef, TerminalKind};

#[path = "support/memory_store.rs"]
#[allow(dead_code)]
mod memory_store;
use memory_store::MemoryStore;

/// Generated element: a kind code plus an owner pick for containers.
///
/// Codes 0..5 are terminal kinds, 5 and 6 are Matrix and SuperTable blocks,
/// 7 is an unrecognized type. Containers own only earlier elements, so
/// ownership chains are acyclic.
#[derive(Debug, Clone)]
enum Node {
    Terminal(TerminalKind),
    Container(ContainerKind, i64),
    Unknown,
}

fn arb_site() -> impl Strategy<Value = Vec<(u8, Index)>> {
    prop::collection::vec((0u8..8, any::<Index>()), 1..40)
}

fn arb_refs() -> impl Strategy<Value = Vec<Index>> {
    prop::collection::vec(any::<Index>(), 0..30)
}

fn build(site: &[(u8, Index)]) -> (MemoryStore, Vec<Node>) {
    let mut store = MemoryStore::new();
    let mut nodes = Vec::with_capacity(site.len());
    for (pos, (code, owner)) in site.iter().enumerate() {
        let id = i64::try_from(pos).expect("small") + 1;
        let owner_id = || i64::try_from(owner.index(pos)).expect("small") + 1;
        let node = match *code {
            5 if pos > 0 => Node::Container(ContainerKind::MatrixBlock, owner_id()),
            6 if pos > 0 => Node::Container(ContainerKind::SuperTableBlock, owner_id()),
            7 => Node::Unknown,
            c => Node::Terminal(TerminalKind::PRIORITY[usize::from(c) % 5]),
        };
        match &node {
            Node::Terminal(kind) => {
                store.terminal(id, *kind, &format!("element {id}"));
            }
            Node::Container(kind, owner) => {
                store.block(*kind, id, *owner);
            }
            Node::Unknown => {
                store.element(id, "User");
            }
        }
        nodes.push(node);
    }
    (store, nodes)
}

fn refs_for(nodes: &[Node], picks: &[Index]) -> Vec<ElementRef> {
    picks
        .iter()
        .map(|pick| {
            let pos = pick.index(nodes.len());
            let id = i64::try_from(pos).expect("small") + 1;
            let tag = match &nodes[pos] {
                Node::Terminal(kind) => kind.type_tag(),
                Node::Container(kind, _) => kind.type_tag(),
                Node::Unknown => "User",
            };
            ElementRef::new(id, tag)
        })
        .collect()
}

/// Follow ownership from `id` to the first non-container element.
fn resolve_owner(nodes: &[Node], mut id: i64) -> (i64, &Node) {
    loop {
        let node = &nodes[usize::try_from(id - 1).expect("positive")];
        match node {
            Node::Container(_, owner) => id = *owner,
            other => return (id, other),
        }
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn classification_is_idempotent(site in arb_site(), picks in arb_refs()) {
        let (_, nodes) = build(&site);
        let refs = refs_for(&nodes, &picks);
        prop_assert_eq!(GroupContainer::from_refs(&refs), GroupContainer::from_refs(&refs));
    }

    #[test]
    fn normalization_terminates_and_is_complete(site in arb_site(), picks in arb_refs()) {
        let (store, nodes) = build(&site);
        let refs = refs_for(&nodes, &picks);

        let links = LinkBuilder::new(&SiteConfig::default());
        let ctx = NormalizeContext { locale: "en_us", links: &links, round_limit: 10_000 };
        let mut groups = GroupContainer::from_refs(&refs);
        normalize(&store, &mut groups, &ctx).expect("acyclic stores always converge");

        prop_assert!(groups.is_resolved());

        let mut expected_results = BTreeSet::new();
        let mut expected_unclassified = BTreeSet::new();
        for item in &refs {
            match resolve_owner(&nodes, item.id) {
                (id, Node::Terminal(_)) => { expected_results.insert(id); }
                (id, _) => { expected_unclassified.insert(id); }
            }
        }

        let results: BTreeSet<i64> = groups.results().iter().map(|r| r.id).collect();
        let unclassified: BTreeSet<i64> = groups.unclassified().iter().copied().collect();
        prop_assert_eq!(results.len(), groups.results().len(), "a result was emitted twice");
        prop_assert_eq!(&results, &expected_results);
        prop_assert_eq!(&unclassified, &expected_unclassified);
        prop_assert!(results.is_disjoint(&unclassified));
    }
}

//! End-to-end traversal over SQLite fixture stores.
//!
//! The fixture models one site:
//!   - Entry 100 "Home" owns MatrixBlock 300, which owns SuperTable block 301
//!   - Entry 200 "Launch" owns MatrixBlock 310, which references Entry 100
//!   - Entry 100 and its blocks reference a tag, a global set, a category,
//!     an asset, and Entry 200
//!   - a User element (900) references Entry 100 and must never surface

use elementmap_core::config::SiteConfig;
use elementmap_core::db::{SqliteStore, schema};
use elementmap_core::{ElementMap, ElementMapper, MapError, ResultItem, TerminalKind};
use rusqlite::Connection;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

const SITE: &str = "
    INSERT INTO sections (id, name, handle) VALUES (1, 'Pages', 'pages'), (2, 'News', 'news');
    INSERT INTO categorygroups (id, name, handle) VALUES (1, 'Topics', 'topics');
    INSERT INTO taggroups (id, name, handle) VALUES (3, 'Keywords', 'keywords');
    INSERT INTO assetsources (id, name, url) VALUES (1, 'Uploads', '/uploads');
    INSERT INTO assetfolders (id, sourceId, name, path) VALUES (1, 1, 'Images', 'images/');

    INSERT INTO elements (id, type) VALUES
        (100, 'Entry'), (200, 'Entry'), (800, 'Entry'),
        (300, 'MatrixBlock'), (301, 'SuperTable_Block'), (310, 'MatrixBlock'),
        (400, 'Asset'), (500, 'Category'), (600, 'Tag'), (601, 'Tag'),
        (700, 'GlobalSet'), (900, 'User');

    INSERT INTO entries (id, sectionId) VALUES (100, 1), (200, 2), (800, 1);
    INSERT INTO categories (id, groupId) VALUES (500, 1);
    INSERT INTO tags (id, groupId) VALUES (600, 3), (601, 3);
    INSERT INTO globalsets (id, name, handle) VALUES (700, 'Footer', 'footer');
    INSERT INTO assetfiles (id, sourceId, folderId, filename) VALUES (400, 1, 1, 'hero.jpg');

    INSERT INTO matrixblocks (id, ownerId) VALUES (300, 100), (310, 200);
    INSERT INTO supertableblocks (id, ownerId) VALUES (301, 300);

    INSERT INTO content (elementId, locale, title) VALUES
        (100, 'en_us', 'Home'), (200, 'en_us', 'Launch'), (200, 'de', 'Start'),
        (800, 'en_us', 'Orphan'), (400, 'en_us', 'Hero'), (500, 'en_us', 'Travel'),
        (600, 'en_us', 'rust'), (601, 'de', 'altlast');
    INSERT INTO elements_i18n (elementId, locale, slug) VALUES
        (100, 'en_us', 'home'), (200, 'en_us', 'launch'), (200, 'de', 'start'),
        (800, 'en_us', 'orphan'), (500, 'en_us', 'travel');

    INSERT INTO relations (sourceId, targetId, sourceLocale) VALUES
        (301, 400, NULL),
        (300, 500, NULL),
        (100, 600, NULL),
        (100, 700, NULL),
        (310, 100, NULL),
        (100, 200, NULL),
        (900, 100, NULL),
        (100, 601, 'de');
";

fn fixture_store() -> SqliteStore {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    schema::install(&conn, "").expect("install schema");
    conn.execute_batch(SITE).expect("seed fixture");
    SqliteStore::new(conn)
}

fn german_site() -> SiteConfig {
    SiteConfig {
        locale: "de".to_string(),
        primary_locale: Some("en_us".to_string()),
        ..SiteConfig::default()
    }
}

fn item(id: i64, kind: TerminalKind, title: &str, url: &str) -> ResultItem {
    ResultItem {
        id,
        kind,
        title: title.to_string(),
        url: url.to_string(),
    }
}

fn ids(items: &[ResultItem]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn direct_terminal_relation() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    let map = mapper.element_map(600).expect("map");
    assert_eq!(
        map.from,
        vec![item(100, TerminalKind::Entry, "Home", "/admin/entries/pages/100-home")]
    );
    assert!(map.to.is_empty());
}

#[test]
fn nested_blocks_resolve_to_owning_entry() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    // 400 is referenced only by SuperTable block 301 inside MatrixBlock 300.
    let map = mapper.element_map(400).expect("map");
    assert_eq!(ids(&map.from), vec![100]);
    assert!(map.from.iter().all(|r| ![300, 301].contains(&r.id)));
}

#[test]
fn incoming_traces_blocks_and_drops_unrecognized_sources() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    let from = mapper.incoming(100).expect("incoming");
    assert_eq!(
        from,
        vec![item(200, TerminalKind::Entry, "Launch", "/admin/entries/news/200-launch")]
    );
}

#[test]
fn outgoing_expansion_covers_owned_blocks() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    let nodes = mapper.outgoing_node_set(100).expect("node set");
    assert_eq!(nodes.into_iter().collect::<Vec<_>>(), vec![100, 300, 301]);
}

#[test]
fn outgoing_results_follow_kind_priority() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    let to = mapper.outgoing(100).expect("outgoing");
    assert_eq!(
        to,
        vec![
            item(200, TerminalKind::Entry, "Launch", "/admin/entries/news/200-launch"),
            item(700, TerminalKind::GlobalSet, "Footer", "/admin/globals/footer"),
            item(500, TerminalKind::Category, "Travel", "/admin/categories/topics/500-travel"),
            item(600, TerminalKind::Tag, "rust", "/admin/settings/tags/3"),
            item(400, TerminalKind::Asset, "Hero", "/uploads/images/hero.jpg"),
        ]
    );
}

#[test]
fn same_element_may_appear_in_both_directions() {
    let store = fixture_store();
    let mapper = ElementMapper::new(&store, &SiteConfig::default());

    let map = mapper.element_map(100).expect("map");
    assert!(ids(&map.from).contains(&200));
    assert!(ids(&map.to).contains(&200));
}

#[test]
fn locale_scoped_relations_follow_active_locale() {
    let store = fixture_store();

    let english = ElementMapper::new(&store, &SiteConfig::default())
        .outgoing(100)
        .expect("outgoing en");
    assert!(!ids(&english).contains(&601));

    let german = ElementMapper::new(&store, &german_site())
        .outgoing(100)
        .expect("outgoing de");
    let tags: Vec<i64> = german
        .iter()
        .filter(|r| r.kind == TerminalKind::Tag)
        .map(|r| r.id)
        .collect();
    assert_eq!(tags, vec![600, 601]);
}

#[test]
fn non_primary_locale_localizes_titles_and_links() {
    let store = fixture_store();
    let to = ElementMapper::new(&store, &german_site())
        .outgoing(100)
        .expect("outgoing de");

    let find = |id: i64| to.iter().find(|r| r.id == id).cloned().expect("present");
    assert_eq!(
        find(200),
        item(200, TerminalKind::Entry, "Start", "/admin/entries/news/200-start/de")
    );
    // No German content row: title and slug fall back to the stored locale.
    assert_eq!(
        find(500),
        item(500, TerminalKind::Category, "Travel", "/admin/categories/topics/500-travel/de")
    );
    assert_eq!(find(700).url, "/admin/globals/de/footer");
    assert_eq!(find(601).title, "altlast");
}

#[test]
fn isolated_element_has_empty_map() {
    let store = fixture_store();
    let map = ElementMapper::new(&store, &SiteConfig::default())
        .element_map(800)
        .expect("map");
    assert_eq!(map, ElementMap::default());
    assert_eq!(
        serde_json::to_string(&map).expect("serialize"),
        r#"{"from":[],"to":[]}"#
    );
}

#[test]
fn missing_tables_surface_as_store_errors() {
    let store = SqliteStore::new(Connection::open_in_memory().expect("open"));
    let err = ElementMapper::new(&store, &SiteConfig::default())
        .element_map(100)
        .expect_err("no schema");
    assert!(matches!(err, MapError::Store(_)));
}

#[test]
fn prefixed_store_file_opens_read_only_and_maps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("craft.db");
    {
        let conn = Connection::open(&path).expect("create db");
        schema::install(&conn, "craft_").expect("install schema");
        conn.execute_batch(
            "INSERT INTO craft_sections (id, name, handle) VALUES (1, 'Blog', 'blog');
             INSERT INTO craft_elements (id, type) VALUES (1, 'Entry'), (2, 'Entry');
             INSERT INTO craft_entries (id, sectionId) VALUES (1, 1), (2, 1);
             INSERT INTO craft_content (elementId, locale, title) VALUES (1, 'en_us', 'One'), (2, 'en_us', 'Two');
             INSERT INTO craft_relations (sourceId, targetId) VALUES (2, 1);",
        )
        .expect("seed");
    }

    let store = SqliteStore::open(&path, "craft_").expect("open store");
    let map = ElementMapper::new(&store, &SiteConfig::default())
        .element_map(1)
        .expect("map");
    assert_eq!(
        map.from,
        vec![item(2, TerminalKind::Entry, "Two", "/admin/entries/blog/2")]
    );
}

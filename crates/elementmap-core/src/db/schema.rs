//! Craft-shaped relational schema the resolver reads from.
//!
//! The resolver never writes; this DDL documents the tables and columns it
//! depends on and builds fixture stores for tests and local experiments:
//! - `elements` is the polymorphic registry (`id`, `type`)
//! - `relations` holds directed, locale-scoped edges
//! - `matrixblocks` / `supertableblocks` map block records to their owners
//! - the remaining tables carry display data for each terminal kind
//!
//! Column names follow Craft's camelCase convention so a copy of a real
//! install can be opened as-is (with `table_prefix = "craft_"`).

use rusqlite::Connection;

/// Tables the traversal and display lookups query, unprefixed.
pub const REQUIRED_TABLES: &[&str] = &[
    "elements",
    "elements_i18n",
    "content",
    "relations",
    "matrixblocks",
    "supertableblocks",
    "sections",
    "entries",
    "categorygroups",
    "categories",
    "globalsets",
    "taggroups",
    "tags",
    "assetsources",
    "assetfolders",
    "assetfiles",
];

/// DDL template; `{p}` is replaced with the table prefix.
const STORE_SCHEMA_TEMPLATE: &str = r#"
CREATE TABLE IF NOT EXISTS {p}elements (
    id INTEGER PRIMARY KEY,
    type TEXT NOT NULL,
    enabled INTEGER NOT NULL DEFAULT 1 CHECK (enabled IN (0, 1)),
    archived INTEGER NOT NULL DEFAULT 0 CHECK (archived IN (0, 1))
);

CREATE TABLE IF NOT EXISTS {p}elements_i18n (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    elementId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    locale TEXT NOT NULL,
    slug TEXT,
    uri TEXT,
    UNIQUE (elementId, locale)
);

CREATE TABLE IF NOT EXISTS {p}content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    elementId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    locale TEXT NOT NULL,
    title TEXT,
    UNIQUE (elementId, locale)
);

CREATE TABLE IF NOT EXISTS {p}relations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fieldId INTEGER NOT NULL DEFAULT 0,
    sourceId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    sourceLocale TEXT,
    targetId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    sortOrder INTEGER
);

CREATE TABLE IF NOT EXISTS {p}matrixblocks (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    ownerId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    fieldId INTEGER NOT NULL DEFAULT 0,
    typeId INTEGER NOT NULL DEFAULT 0,
    sortOrder INTEGER,
    ownerLocale TEXT
);

CREATE TABLE IF NOT EXISTS {p}supertableblocks (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    ownerId INTEGER NOT NULL REFERENCES {p}elements(id) ON DELETE CASCADE,
    fieldId INTEGER NOT NULL DEFAULT 0,
    typeId INTEGER NOT NULL DEFAULT 0,
    sortOrder INTEGER,
    ownerLocale TEXT
);

CREATE TABLE IF NOT EXISTS {p}sections (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    handle TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {p}entries (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    sectionId INTEGER NOT NULL REFERENCES {p}sections(id) ON DELETE CASCADE,
    typeId INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS {p}categorygroups (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    handle TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {p}categories (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    groupId INTEGER NOT NULL REFERENCES {p}categorygroups(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS {p}globalsets (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    handle TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {p}taggroups (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    handle TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {p}tags (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    groupId INTEGER NOT NULL REFERENCES {p}taggroups(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS {p}assetsources (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    url TEXT
);

CREATE TABLE IF NOT EXISTS {p}assetfolders (
    id INTEGER PRIMARY KEY,
    sourceId INTEGER REFERENCES {p}assetsources(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    path TEXT
);

CREATE TABLE IF NOT EXISTS {p}assetfiles (
    id INTEGER PRIMARY KEY REFERENCES {p}elements(id) ON DELETE CASCADE,
    sourceId INTEGER REFERENCES {p}assetsources(id) ON DELETE CASCADE,
    folderId INTEGER NOT NULL REFERENCES {p}assetfolders(id) ON DELETE CASCADE,
    filename TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS {p}idx_relations_source ON {p}relations(sourceId, sourceLocale);
CREATE INDEX IF NOT EXISTS {p}idx_relations_target ON {p}relations(targetId);
CREATE INDEX IF NOT EXISTS {p}idx_matrixblocks_owner ON {p}matrixblocks(ownerId);
CREATE INDEX IF NOT EXISTS {p}idx_supertableblocks_owner ON {p}supertableblocks(ownerId);
"#;

/// Render the schema DDL for a table prefix.
#[must_use]
pub fn store_schema_sql(prefix: &str) -> String {
    STORE_SCHEMA_TEMPLATE.replace("{p}", prefix)
}

/// Create every table in [`REQUIRED_TABLES`] (idempotent).
///
/// # Errors
///
/// Returns an error if executing the DDL fails.
pub fn install(conn: &Connection, prefix: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&store_schema_sql(prefix))
}

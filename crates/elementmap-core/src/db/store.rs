//! Relation store adapter.
//!
//! [`RelationStore`] is the only surface the traversal depends on: four
//! batch lookups keyed by id sets. [`SqliteStore`] implements it over the
//! schema in [`super::schema`].
//!
//! Every lookup short-circuits on an empty id set without touching the
//! database, and splits large sets into chunks of [`MAX_IDS_PER_QUERY`] so
//! `IN (...)` lists stay under SQLite's bind limit.

use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;
use crate::kind::{ContainerKind, ElementRef, TerminalKind};

/// Largest id batch bound into a single query.
pub const MAX_IDS_PER_QUERY: usize = 500;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which side of a relation the queried ids sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ids are relation targets; the sources are returned.
    AsTarget,
    /// Ids are relation sources; the targets are returned.
    AsSource,
}

impl Direction {
    /// `(matched column, returned column)` in the relations table.
    const fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::AsTarget => ("targetId", "sourceId"),
            Self::AsSource => ("sourceId", "targetId"),
        }
    }
}

/// Data needed to link a terminal element into the control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Entry {
        section: String,
        slug: Option<String>,
    },
    Category {
        group: String,
        slug: Option<String>,
    },
    GlobalSet {
        handle: String,
    },
    Tag {
        group_id: i64,
    },
    /// Public file URL; `None` when the source is not publicly served.
    Asset {
        url: Option<String>,
    },
}

/// Display data for one terminal element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: i64,
    pub kind: TerminalKind,
    /// Title in the requested locale, or the global set name.
    pub title: Option<String>,
    pub target: EditTarget,
}

/// Element count for one stored type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub type_tag: String,
    pub count: usize,
}

/// Aggregate counts reported by `elementmap check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub element_types: Vec<TypeCount>,
    pub relations: usize,
    pub matrix_blocks: usize,
    pub supertable_blocks: usize,
}

// ---------------------------------------------------------------------------
// Adapter trait
// ---------------------------------------------------------------------------

/// Read-only batch lookups over elements, relations, and block ownership.
pub trait RelationStore {
    /// Opposite-side element of every relation whose `direction` side is in
    /// `ids` and whose source locale is NULL or `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn fetch_related(
        &self,
        ids: &BTreeSet<i64>,
        direction: Direction,
        locale: &str,
    ) -> Result<Vec<ElementRef>, StoreError>;

    /// Owner element of each container in `container_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn fetch_container_owners(
        &self,
        kind: ContainerKind,
        container_ids: &BTreeSet<i64>,
    ) -> Result<Vec<ElementRef>, StoreError>;

    /// Ids of containers of `kind` owned by any of `owner_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn fetch_container_ids_by_owners(
        &self,
        kind: ContainerKind,
        owner_ids: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, StoreError>;

    /// Display records for terminal elements of one kind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn fetch_display_records(
        &self,
        kind: TerminalKind,
        ids: &BTreeSet<i64>,
        locale: &str,
    ) -> Result<Vec<DisplayRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// [`RelationStore`] over a SQLite connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    prefix: String,
}

impl SqliteStore {
    /// Wrap a connection whose tables carry no prefix.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            prefix: String::new(),
        }
    }

    /// Wrap a connection whose tables are named `{prefix}{table}`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPrefix`] if the prefix contains anything
    /// other than ASCII letters, digits, and underscores.
    pub fn with_prefix(conn: Connection, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let prefix = prefix.into();
        super::validate_prefix(&prefix)?;
        Ok(Self { conn, prefix })
    }

    /// Open a store file read-only and verify its schema.
    ///
    /// # Errors
    ///
    /// See [`super::open_store`].
    pub fn open(path: &Path, prefix: &str) -> Result<Self, StoreError> {
        let conn = super::open_store(path, prefix)?;
        Self::with_prefix(conn, prefix)
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Title for `e.id` in locale `?1`, falling back to the first stored locale.
    fn title_expr(&self) -> String {
        let content = self.table("content");
        format!(
            "COALESCE(\
             (SELECT c.title FROM {content} c WHERE c.elementId = e.id AND c.locale = ?1), \
             (SELECT c.title FROM {content} c WHERE c.elementId = e.id ORDER BY c.id LIMIT 1))"
        )
    }

    /// Slug for `e.id` in locale `?1`, falling back to the first stored locale.
    fn slug_expr(&self) -> String {
        let i18n = self.table("elements_i18n");
        format!(
            "COALESCE(\
             (SELECT i.slug FROM {i18n} i WHERE i.elementId = e.id AND i.locale = ?1), \
             (SELECT i.slug FROM {i18n} i WHERE i.elementId = e.id ORDER BY i.id LIMIT 1))"
        )
    }

    /// Run `build_sql(placeholders)` once per id chunk and concatenate rows.
    ///
    /// `leading` binds to `?1..?k`; chunk ids bind to `?k+1..`.
    fn query_chunked<T, F>(
        &self,
        operation: &'static str,
        ids: &BTreeSet<i64>,
        leading: &[Value],
        build_sql: impl Fn(&str) -> String,
        mut map_row: F,
    ) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().copied().collect();
        let mut out = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let sql = build_sql(&placeholders(leading.len() + 1, chunk.len()));
            let mut stmt = self
                .conn
                .prepare_cached(&sql)
                .map_err(StoreError::query(operation))?;

            let values = leading
                .iter()
                .cloned()
                .chain(chunk.iter().map(|id| Value::Integer(*id)));
            let rows = stmt
                .query_map(params_from_iter(values), &mut map_row)
                .map_err(StoreError::query(operation))?;
            for row in rows {
                out.push(row.map_err(StoreError::query(operation))?);
            }
        }

        debug!(operation, ids = ids.len(), rows = out.len(), "store lookup");
        Ok(out)
    }

    /// Element counts grouped by type tag, plus relation and block totals.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an aggregate query fails.
    pub fn summary(&self) -> Result<StoreSummary, StoreError> {
        let sql = format!(
            "SELECT type, COUNT(*) FROM {} GROUP BY type ORDER BY type",
            self.table("elements")
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(StoreError::query("summary elements"))?;
        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(TypeCount {
                    type_tag: row.get(0)?,
                    count: usize::try_from(count).unwrap_or(usize::MAX),
                })
            })
            .map_err(StoreError::query("summary elements"))?;

        let mut element_types = Vec::new();
        for row in rows {
            element_types.push(row.map_err(StoreError::query("summary elements"))?);
        }

        Ok(StoreSummary {
            element_types,
            relations: self.count_rows("relations")?,
            matrix_blocks: self.count_rows(ContainerKind::MatrixBlock.table())?,
            supertable_blocks: self.count_rows(ContainerKind::SuperTableBlock.table())?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table(table));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(StoreError::query("summary count"))?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }
}

impl RelationStore for SqliteStore {
    fn fetch_related(
        &self,
        ids: &BTreeSet<i64>,
        direction: Direction,
        locale: &str,
    ) -> Result<Vec<ElementRef>, StoreError> {
        let (from, to) = direction.columns();
        let relations = self.table("relations");
        let elements = self.table("elements");

        self.query_chunked(
            "fetch related",
            ids,
            &[Value::Text(locale.to_string())],
            |ph| {
                format!(
                    "SELECT r.{to}, e.type \
                     FROM {relations} r \
                     INNER JOIN {elements} e ON e.id = r.{to} \
                     WHERE r.{from} IN ({ph}) \
                     AND (r.sourceLocale IS NULL OR r.sourceLocale = ?1) \
                     ORDER BY r.id"
                )
            },
            |row| Ok(ElementRef::new(row.get(0)?, row.get::<_, String>(1)?)),
        )
    }

    fn fetch_container_owners(
        &self,
        kind: ContainerKind,
        container_ids: &BTreeSet<i64>,
    ) -> Result<Vec<ElementRef>, StoreError> {
        let blocks = self.table(kind.table());
        let elements = self.table("elements");

        self.query_chunked(
            "fetch container owners",
            container_ids,
            &[],
            |ph| {
                format!(
                    "SELECT e.id, e.type \
                     FROM {blocks} b \
                     INNER JOIN {elements} e ON e.id = b.ownerId \
                     WHERE b.id IN ({ph}) \
                     ORDER BY b.id"
                )
            },
            |row| Ok(ElementRef::new(row.get(0)?, row.get::<_, String>(1)?)),
        )
    }

    fn fetch_container_ids_by_owners(
        &self,
        kind: ContainerKind,
        owner_ids: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, StoreError> {
        let blocks = self.table(kind.table());

        self.query_chunked(
            "fetch containers by owner",
            owner_ids,
            &[],
            |ph| format!("SELECT b.id FROM {blocks} b WHERE b.ownerId IN ({ph}) ORDER BY b.id"),
            |row| row.get(0),
        )
    }

    fn fetch_display_records(
        &self,
        kind: TerminalKind,
        ids: &BTreeSet<i64>,
        locale: &str,
    ) -> Result<Vec<DisplayRecord>, StoreError> {
        let elements = self.table("elements");
        let title = self.title_expr();
        let slug = self.slug_expr();
        let locale = [Value::Text(locale.to_string())];

        let records = match kind {
            TerminalKind::Entry => {
                let entries = self.table("entries");
                let sections = self.table("sections");
                self.query_chunked(
                    "fetch entries",
                    ids,
                    &locale,
                    |ph| {
                        format!(
                            "SELECT e.id, {title}, s.handle, {slug} \
                             FROM {elements} e \
                             INNER JOIN {entries} x ON x.id = e.id \
                             INNER JOIN {sections} s ON s.id = x.sectionId \
                             WHERE e.id IN ({ph}) ORDER BY e.id"
                        )
                    },
                    |row| {
                        Ok(DisplayRecord {
                            id: row.get(0)?,
                            kind,
                            title: row.get(1)?,
                            target: EditTarget::Entry {
                                section: row.get(2)?,
                                slug: row.get(3)?,
                            },
                        })
                    },
                )?
            }
            TerminalKind::Category => {
                let categories = self.table("categories");
                let groups = self.table("categorygroups");
                self.query_chunked(
                    "fetch categories",
                    ids,
                    &locale,
                    |ph| {
                        format!(
                            "SELECT e.id, {title}, g.handle, {slug} \
                             FROM {elements} e \
                             INNER JOIN {categories} x ON x.id = e.id \
                             INNER JOIN {groups} g ON g.id = x.groupId \
                             WHERE e.id IN ({ph}) ORDER BY e.id"
                        )
                    },
                    |row| {
                        Ok(DisplayRecord {
                            id: row.get(0)?,
                            kind,
                            title: row.get(1)?,
                            target: EditTarget::Category {
                                group: row.get(2)?,
                                slug: row.get(3)?,
                            },
                        })
                    },
                )?
            }
            TerminalKind::GlobalSet => {
                let globalsets = self.table("globalsets");
                self.query_chunked(
                    "fetch global sets",
                    ids,
                    &[],
                    |ph| {
                        format!(
                            "SELECT e.id, g.name, g.handle \
                             FROM {elements} e \
                             INNER JOIN {globalsets} g ON g.id = e.id \
                             WHERE e.id IN ({ph}) ORDER BY e.id"
                        )
                    },
                    |row| {
                        Ok(DisplayRecord {
                            id: row.get(0)?,
                            kind,
                            title: row.get(1)?,
                            target: EditTarget::GlobalSet {
                                handle: row.get(2)?,
                            },
                        })
                    },
                )?
            }
            TerminalKind::Tag => {
                let tags = self.table("tags");
                self.query_chunked(
                    "fetch tags",
                    ids,
                    &locale,
                    |ph| {
                        format!(
                            "SELECT e.id, {title}, t.groupId \
                             FROM {elements} e \
                             INNER JOIN {tags} t ON t.id = e.id \
                             WHERE e.id IN ({ph}) ORDER BY e.id"
                        )
                    },
                    |row| {
                        Ok(DisplayRecord {
                            id: row.get(0)?,
                            kind,
                            title: row.get(1)?,
                            target: EditTarget::Tag {
                                group_id: row.get(2)?,
                            },
                        })
                    },
                )?
            }
            TerminalKind::Asset => {
                let files = self.table("assetfiles");
                let folders = self.table("assetfolders");
                let sources = self.table("assetsources");
                self.query_chunked(
                    "fetch assets",
                    ids,
                    &locale,
                    |ph| {
                        format!(
                            "SELECT e.id, {title}, src.url, fo.path, f.filename \
                             FROM {elements} e \
                             INNER JOIN {files} f ON f.id = e.id \
                             INNER JOIN {folders} fo ON fo.id = f.folderId \
                             LEFT JOIN {sources} src ON src.id = COALESCE(f.sourceId, fo.sourceId) \
                             WHERE e.id IN ({ph}) ORDER BY e.id"
                        )
                    },
                    |row| {
                        let source_url: Option<String> = row.get(2)?;
                        let folder_path: Option<String> = row.get(3)?;
                        let filename: String = row.get(4)?;
                        Ok(DisplayRecord {
                            id: row.get(0)?,
                            kind,
                            title: row.get(1)?,
                            target: EditTarget::Asset {
                                url: asset_url(
                                    source_url.as_deref(),
                                    folder_path.as_deref(),
                                    &filename,
                                ),
                            },
                        })
                    },
                )?
            }
        };

        if records.len() < ids.len() {
            debug!(
                kind = %kind,
                requested = ids.len(),
                found = records.len(),
                "terminal elements without display rows were skipped"
            );
        }
        Ok(records)
    }
}

/// `?start, ?start+1, ...` for `count` parameters.
fn placeholders(start: usize, count: usize) -> String {
    let mut out = String::with_capacity(count * 5);
    for n in start..start + count {
        if n > start {
            out.push_str(", ");
        }
        let _ = write!(out, "?{n}");
    }
    out
}

/// Public URL for an asset file: `{source}/{folder path}/{filename}`.
fn asset_url(source_url: Option<&str>, folder_path: Option<&str>, filename: &str) -> Option<String> {
    let base = source_url.filter(|url| !url.is_empty())?;
    let mut url = base.trim_end_matches('/').to_string();
    url.push('/');
    if let Some(path) = folder_path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        url.push_str(path);
        url.push('/');
    }
    url.push_str(filename);
    Some(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Bucket-draining normalizer.
//!
//! Each round drains the highest-priority non-empty bucket of a
//! [`GroupContainer`]:
//!
//! - a container bucket is replaced by the owners of its blocks, which are
//!   classified back into the same container;
//! - a terminal bucket is replaced by result items built from its display
//!   records.
//!
//! Containers always outrank terminals and terminals never produce new ids,
//! so every container is traced to a terminal (or unclassified) owner before
//! the first display lookup runs. The loop stops once every recognized
//! bucket is empty. The unclassified bucket is left as-is.

use tracing::{debug, warn};

use crate::db::RelationStore;
use crate::error::MapError;
use crate::groups::GroupContainer;
use crate::kind::ElementKind;
use crate::links::LinkBuilder;
use crate::map::ResultItem;

/// Default cap on drain rounds per direction.
pub const DEFAULT_ROUND_LIMIT: usize = 64;

/// Per-request inputs shared by every round.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub locale: &'a str,
    pub links: &'a LinkBuilder,
    pub round_limit: usize,
}

/// Drain `groups` until no recognized bucket has pending ids.
///
/// Returns the number of rounds run.
///
/// # Errors
///
/// Returns [`MapError::Store`] if a lookup fails, and
/// [`MapError::RoundLimit`] if the store keeps producing container ids past
/// `ctx.round_limit` rounds (cyclic block ownership).
pub fn normalize<S: RelationStore + ?Sized>(
    store: &S,
    groups: &mut GroupContainer,
    ctx: &NormalizeContext<'_>,
) -> Result<usize, MapError> {
    let mut rounds = 0;

    while let Some(kind) = groups.next_pending() {
        if rounds >= ctx.round_limit {
            warn!(rounds, pending = %kind, "normalization round limit reached");
            return Err(MapError::RoundLimit { rounds });
        }
        rounds += 1;

        let ids = groups.drain(kind);
        match kind {
            ElementKind::Container(container) => {
                let owners = store.fetch_container_owners(container, &ids)?;
                debug!(
                    round = rounds,
                    kind = %container,
                    blocks = ids.len(),
                    owners = owners.len(),
                    "resolved block owners"
                );
                groups.classify(&owners);
            }
            ElementKind::Terminal(terminal) => {
                let records = store.fetch_display_records(terminal, &ids, ctx.locale)?;
                debug!(
                    round = rounds,
                    kind = %terminal,
                    ids = ids.len(),
                    records = records.len(),
                    "resolved display records"
                );
                groups.extend_results(records.iter().map(|record| ResultItem {
                    id: record.id,
                    kind: record.kind,
                    title: record.title.clone().unwrap_or_default(),
                    url: ctx.links.link(record),
                }));
            }
            ElementKind::Unclassified => {}
        }
    }

    if !groups.unclassified().is_empty() {
        debug!(
            count = groups.unclassified().len(),
            "ids with unrecognized element types were excluded"
        );
    }
    Ok(rounds)
}

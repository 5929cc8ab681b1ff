//! elementmap-core library.
//!
//! Resolves the relationship map of a single content element: every element
//! that references it (incoming) and every element reachable through the
//! records it owns (outgoing). Intermediate block records are traced back to
//! their owning elements before anything is reported.
//!
//! # Conventions
//!
//! - **Errors**: store access returns [`error::StoreError`], traversal returns
//!   [`error::MapError`]; configuration loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Locale**: the active locale is passed explicitly into every store call.

pub mod config;
pub mod db;
pub mod error;
pub mod groups;
pub mod kind;
pub mod links;
pub mod map;
pub mod normalize;

pub use error::{ErrorCode, MapError, StoreError};
pub use kind::{ContainerKind, ElementKind, ElementRef, TerminalKind};
pub use map::{ElementMap, ElementMapper, ResultItem, get_element_map, parse_element_id};

pub mod check;
pub mod map;
pub mod serve;

use std::path::Path;

use elementmap_core::config::MapConfig;
use elementmap_core::db::SqliteStore;

use crate::output::{CliError, OutputMode, render_error};

/// Open the configured content store, rendering a structured error on failure.
pub fn open_store(
    config: &MapConfig,
    project_root: &Path,
    output: OutputMode,
) -> anyhow::Result<SqliteStore> {
    let path = config.store_path(project_root);
    match SqliteStore::open(&path, &config.store.table_prefix) {
        Ok(store) => Ok(store),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Err(anyhow::Error::new(err)
                .context(format!("failed to open content store {}", path.display())))
        }
    }
}

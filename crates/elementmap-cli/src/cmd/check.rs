//! `elementmap check`: verify the content store and report what it holds.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use elementmap_core::ElementKind;
use elementmap_core::config::MapConfig;
use serde::Serialize;

use crate::cmd::open_store;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `elementmap check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct TypeRow {
    #[serde(rename = "type")]
    type_tag: String,
    count: usize,
    recognized: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    store: String,
    table_prefix: String,
    locale: String,
    schema_ok: bool,
    element_types: Vec<TypeRow>,
    relations: usize,
    matrix_blocks: usize,
    supertable_blocks: usize,
}

/// Execute `elementmap check`.
pub fn run_check(
    _args: &CheckArgs,
    config: &MapConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = open_store(config, project_root, output)?;
    let summary = match store.summary() {
        Ok(summary) => summary,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    let payload = CheckOutput {
        store: config.store_path(project_root).display().to_string(),
        table_prefix: config.store.table_prefix.clone(),
        locale: config.site.locale.clone(),
        schema_ok: true,
        element_types: summary
            .element_types
            .into_iter()
            .map(|row| TypeRow {
                recognized: ElementKind::from_type_tag(&row.type_tag).is_recognized(),
                type_tag: row.type_tag,
                count: row.count,
            })
            .collect(),
        relations: summary.relations,
        matrix_blocks: summary.matrix_blocks,
        supertable_blocks: summary.supertable_blocks,
    };

    render_mode(output, &payload, render_check_text, render_check_pretty)
}

fn render_check_text(report: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "store\t{}", report.store)?;
    writeln!(w, "schema\tok")?;
    writeln!(w, "relations\t{}", report.relations)?;
    writeln!(w, "matrix_blocks\t{}", report.matrix_blocks)?;
    writeln!(w, "supertable_blocks\t{}", report.supertable_blocks)?;
    for row in &report.element_types {
        writeln!(w, "type\t{}\t{}", row.type_tag, row.count)?;
    }
    Ok(())
}

fn render_check_pretty(report: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Content store")?;
    pretty_kv(w, "path", &report.store)?;
    pretty_kv(
        w,
        "prefix",
        if report.table_prefix.is_empty() {
            "(none)"
        } else {
            report.table_prefix.as_str()
        },
    )?;
    pretty_kv(w, "locale", &report.locale)?;
    pretty_kv(w, "schema", "✓ all required tables present")?;
    writeln!(w)?;

    pretty_section(w, "Contents")?;
    pretty_kv(w, "relations", report.relations.to_string())?;
    pretty_kv(w, "matrix", report.matrix_blocks.to_string())?;
    pretty_kv(w, "supertable", report.supertable_blocks.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Element types")?;
    if report.element_types.is_empty() {
        return writeln!(w, "  (no elements)");
    }
    for row in &report.element_types {
        let marker = if row.recognized { "✓" } else { "·" };
        writeln!(w, "  {marker} {:<20} {:>8}", row.type_tag, row.count)?;
    }
    let skipped = report.element_types.iter().filter(|r| !r.recognized).count();
    if skipped > 0 {
        writeln!(w)?;
        writeln!(w, "  · types marked with a dot are never reported in element maps")?;
    }
    Ok(())
}

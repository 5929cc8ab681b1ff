//! `elementmap map`: print the relationship map of one element.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use elementmap_core::config::MapConfig;
use elementmap_core::{ElementMap, ElementMapper, ResultItem};
use tracing::info;

use crate::cmd::open_store;
use crate::output::{CliError, OutputMode, pretty_rule, pretty_section, render_error, render_mode};
use crate::validate;

/// Arguments for `elementmap map`.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Element id to map.
    pub id: String,
}

/// Execute `elementmap map`.
pub fn run_map(
    args: &MapArgs,
    config: &MapConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let id = match validate::validate_element_id(&args.id) {
        Ok(id) => id,
        Err(e) => {
            render_error(output, &e.to_cli_error())?;
            anyhow::bail!("{}", e.reason);
        }
    };

    let store = open_store(config, project_root, output)?;
    let map = match ElementMapper::from_config(&store, config).element_map(id) {
        Ok(map) => map,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(anyhow::Error::new(err).context(format!("failed to map element {id}")));
        }
    };
    info!(
        id,
        incoming = map.from.len(),
        outgoing = map.to.len(),
        "element map resolved"
    );

    render_mode(output, &map, render_map_text, |map, w| render_map_pretty(id, map, w))
}

/// One tab-separated row per item: `direction id type title url`.
fn render_map_text(map: &ElementMap, w: &mut dyn Write) -> io::Result<()> {
    for (direction, items) in [("from", &map.from), ("to", &map.to)] {
        for item in items {
            writeln!(
                w,
                "{direction}\t{}\t{}\t{}\t{}",
                item.id,
                item.kind.as_str(),
                item.title,
                item.url
            )?;
        }
    }
    Ok(())
}

fn render_map_pretty(id: i64, map: &ElementMap, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "Element map for #{id}")?;
    pretty_rule(w)?;
    writeln!(w)?;
    render_section_pretty(w, "Incoming", &map.from)?;
    writeln!(w)?;
    render_section_pretty(w, "Outgoing", &map.to)
}

fn render_section_pretty(w: &mut dyn Write, heading: &str, items: &[ResultItem]) -> io::Result<()> {
    pretty_section(w, &format!("{heading} ({})", items.len()))?;
    if items.is_empty() {
        return writeln!(w, "  (none)");
    }
    for item in items {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            item.title.as_str()
        };
        writeln!(w, "  [{:<10}] {title}  #{}", item.kind.icon(), item.id)?;
        if !item.url.is_empty() {
            writeln!(w, "  {:<12} {}", "", item.url)?;
        }
    }
    Ok(())
}

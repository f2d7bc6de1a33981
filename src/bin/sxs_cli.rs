//! CLI tool for sxsview - renders a comparison as two text grids side by side
//!
//! Usage:
//!   sxs_cli <compare.json> <left.json> <right.json>
//!   sxs_cli <compare.json> <left.json> <right.json> --rows 30 --cols 6
//!   sxs_cli ... --select 4,2 --only-changes --find total
//!   sxs_cli ... --select C5
//!
//! `left.json`/`right.json` are sheet data bodies as served by the
//! comparison service (`{"rows": R, "cols": C, "data": [[...], ...]}`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use sxsview::cell_ref::{format_cell_ref, parse_cell_ref};
use sxsview::config::ViewerConfig;
use sxsview::remote::decode_snapshot;
use sxsview::render::{RenderBackend, TextRenderer};
use sxsview::search::SearchOptions;
use sxsview::viewer::{SidePaint, SxsViewer};
use sxsview::{CellCoord, CompareInput, Side};

/// Render a spreadsheet comparison as two text grids side by side.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Comparison result (`files` + `data.changes`).
    compare: PathBuf,

    /// Sheet data for the left (original) file.
    left: PathBuf,

    /// Sheet data for the right (modified) file.
    right: PathBuf,

    /// Visible rows per grid.
    #[arg(long, default_value_t = 20)]
    rows: u32,

    /// Visible columns per grid.
    #[arg(long, default_value_t = 5)]
    cols: u32,

    /// Cell to select: `ROW,COL` (0-based) or an A1 reference.
    #[arg(long, value_name = "CELL", value_parser = parse_selection)]
    select: Option<CellCoord>,

    /// Collapse rows without changes.
    #[arg(long)]
    only_changes: bool,

    /// Select the first left-grid cell containing TEXT.
    #[arg(long, value_name = "TEXT")]
    find: Option<String>,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail(&format!("Error reading {}: {e}", path.display())),
    }
}

fn main() {
    let Args {
        compare,
        left,
        right,
        rows,
        cols,
        select,
        only_changes,
        find,
    } = Args::parse();

    let input = match CompareInput::from_json(&read(&compare)) {
        Ok(input) => input,
        Err(e) => fail(&format!("Error decoding {}: {e}", compare.display())),
    };
    let config = ViewerConfig {
        log_level: "warn".to_string(),
        ..ViewerConfig::default()
    };
    sxsview::logging::init(config.log_level_filter());
    let mut viewer = SxsViewer::new(input, config);

    // Local files stand in for the service: one sheet per side.
    let grids = [read(&left), read(&right)];
    for request in viewer.start() {
        let Some(load) = viewer.on_catalog(&request, Ok(vec!["Sheet1".to_string()])) else {
            continue;
        };
        let body = &grids[load.side.index()];
        viewer.on_sheet_loaded(&load, decode_snapshot(body));
    }

    let cfg = viewer.config().clone();
    let width = cfg.row_header_width + cfg.col_width * cols as f32;
    let height = cfg.col_header_height + cfg.row_height * rows as f32;
    for side in Side::BOTH {
        viewer.resize(side, width, height);
    }
    viewer.set_only_changes(only_changes);

    if let Some(coord) = select {
        viewer.select(coord.row, coord.col);
    }
    if let Some(query) = find {
        match viewer.find_next(Side::Left, &query, &SearchOptions::default()) {
            Some(hit) => eprintln!("found '{query}' at {}", format_cell_ref(hit)),
            None => eprintln!("'{query}' not found on the left grid"),
        }
    }
    // Scroll both grids so the cursor is visible.
    if let Some(coord) = viewer.cursor().get() {
        for side in Side::BOTH {
            if let Some(offset) = viewer.reveal_offset(side, coord) {
                viewer.on_scroll(side, offset);
                viewer.on_scroll_quiescence();
            }
        }
    }

    let panes: Vec<String> = Side::BOTH
        .iter()
        .map(|&side| {
            let mut renderer = TextRenderer::default();
            let result = match viewer.paint(side) {
                SidePaint::Grid(frame) => renderer.render(&frame),
                SidePaint::Message(message) => renderer.render_message(&message),
            };
            if let Err(e) = result {
                fail(&format!("Error rendering {}: {e}", side.label()));
            }
            renderer.into_output()
        })
        .collect();

    print!("{}", side_by_side(&panes[0], &panes[1]));

    match serde_json::to_string_pretty(&viewer.summary()) {
        Ok(json) => eprintln!("{json}"),
        Err(e) => fail(&format!("Error serializing summary: {e}")),
    }
}

/// `"4,2"` (0-based row, column) or `"C5"`.
fn parse_selection(value: &str) -> Result<CellCoord, String> {
    if let Some((r, c)) = value.split_once(',') {
        let row = r.trim().parse().map_err(|e| format!("row: {e}"))?;
        let col = c.trim().parse().map_err(|e| format!("column: {e}"))?;
        return Ok(CellCoord::new(row, col));
    }
    parse_cell_ref(value).ok_or_else(|| format!("'{value}' is neither ROW,COL nor an A1 reference"))
}

/// Join two blocks of lines column-wise with a separator.
fn side_by_side(left: &str, right: &str) -> String {
    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.lines().collect();
    let pad = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or("");
        let r = right.get(i).copied().unwrap_or("");
        let fill = pad - l.chars().count();
        out.push_str(&format!("{l}{} | {r}\n", " ".repeat(fill)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn select_accepts_pairs_and_a1() {
        let args = Args::try_parse_from(["sxs_cli", "c.json", "l.json", "r.json", "--select", "4, 2"]).unwrap();
        assert_eq!(args.select, Some(CellCoord::new(4, 2)));
        let args = Args::try_parse_from(["sxs_cli", "c.json", "l.json", "r.json", "--select", "C5"]).unwrap();
        assert_eq!(args.select, Some(CellCoord::new(4, 2)));
        assert!(Args::try_parse_from(["sxs_cli", "c.json", "l.json", "r.json", "--select", "5C"]).is_err());
    }

    #[test]
    fn defaults_and_flags() {
        let args = Args::try_parse_from(["sxs_cli", "c.json", "l.json", "r.json", "--only-changes"]).unwrap();
        assert_eq!((args.rows, args.cols), (20, 5));
        assert!(args.only_changes);
        assert_eq!(args.find, None);
    }
}

//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use domtree::{DomTree, Item, NodeId};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    for line in table_lines(headers, rows) {
        println!("{line}");
    }
}

fn table_lines(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    // Column widths are the max of header and all row values
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut lines = vec![format_row(&widths, headers.iter().copied())];
    for row in rows {
        lines.push(format_row(
            &widths,
            row.iter().take(col_count).map(String::as_str),
        ));
    }
    lines
}

fn format_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    cells
        .enumerate()
        .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Renders a subtree as an indented outline.
///
/// Nodes end with `/`, properties and attached values show `name = json`.
pub fn outline(tree: &DomTree, id: NodeId, props_only: bool) -> domtree::Result<Vec<String>> {
    let mut lines = vec![format!("{}/", tree.name(id)?)];
    outline_into(tree, id, props_only, 1, &mut lines)?;
    Ok(lines)
}

fn outline_into(
    tree: &DomTree,
    id: NodeId,
    props_only: bool,
    depth: usize,
    lines: &mut Vec<String>,
) -> domtree::Result<()> {
    let indent = "  ".repeat(depth);
    let mapping = tree.to_mapping(id, None, true)?;
    for (name, value) in &mapping {
        lines.push(format!("{indent}{name} = {value}"));
    }
    if props_only {
        return Ok(());
    }

    for name in tree.children(id)? {
        if !tree.flags(id)?.is_readable(name)? {
            continue;
        }
        match tree.get_item(id, name)? {
            Item::Node(child) => {
                lines.push(format!("{indent}{name}/"));
                outline_into(tree, child, props_only, depth + 1, lines)?;
            }
            Item::Value(value) => lines.push(format!("{indent}{name} = {}", value.to_json())),
        }
    }
    Ok(())
}

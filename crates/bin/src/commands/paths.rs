//! Paths command - lists every node with its kind and flags.

use domtree::{DomTree, Item, NodeId, constants::SELF};
use serde::Serialize;

use crate::cli::PathsArgs;
use crate::output::{OutputFormat, print_table};

/// One node in the listing
#[derive(Debug, Serialize, PartialEq)]
pub struct PathRow {
    pub path: String,
    pub kind: &'static str,
    pub flags: u8,
    pub children: usize,
    pub properties: usize,
}

/// Collects a row for `id` and every node below it, depth first.
pub fn collect_rows(tree: &DomTree, id: NodeId) -> domtree::Result<Vec<PathRow>> {
    let mut rows = Vec::new();
    let mut pending = vec![id];
    while let Some(current) = pending.pop() {
        rows.push(PathRow {
            path: tree.path(current)?,
            kind: tree.kind(current)?.as_str(),
            flags: tree.flags(current)?.get_flag(SELF)?.bits(),
            children: tree.children(current)?.len(),
            properties: tree.properties(current)?.len(),
        });

        let mut nodes = Vec::new();
        for name in tree.children(current)? {
            if let Item::Node(child) = tree.get_item(current, name)? {
                nodes.push(child);
            }
        }
        pending.extend(nodes.into_iter().rev());
    }
    Ok(rows)
}

/// Run the paths command
pub fn run(args: &PathsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tree = super::load_tree(&args.input.schema, &args.input.root)?;
    let rows = collect_rows(&tree, tree.root())?;

    match args.format {
        OutputFormat::Human => {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.path.clone(),
                        row.kind.to_string(),
                        format!("{:08b}", row.flags),
                        row.children.to_string(),
                        row.properties.to_string(),
                    ]
                })
                .collect();
            print_table(&["PATH", "KIND", "FLAGS", "CHILDREN", "PROPS"], &table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&rows)?);
        }
    }

    Ok(())
}

//! Build command - materializes a schema and prints the tree.

use crate::cli::{BuildArgs, TreeFormat};
use crate::output::outline;

/// Run the build command
pub fn run(args: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tree = super::load_tree(&args.input.schema, &args.input.root)?;
    let root = tree.root();
    let target = match &args.context {
        Some(context) => tree.get_context(root, context)?,
        None => root,
    };

    match args.format {
        TreeFormat::Json => println!("{}", tree.to_json(target, None, args.props_only)?),
        TreeFormat::Pretty => println!("{}", tree.to_json_pretty(target, None, args.props_only)?),
        TreeFormat::Human => {
            for line in outline(&tree, target, args.props_only)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

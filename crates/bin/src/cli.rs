//! CLI argument definitions for the domtree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// How `build` prints the resulting tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
    /// Indented outline with one entry per line
    Human,
}

/// Build and inspect permission-gated trees from schema files
#[derive(Parser, Debug)]
#[command(name = "domtree")]
#[command(about = "domtree: materialize schema files into permission-gated trees")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize a schema and print the resulting tree
    Build(BuildArgs),
    /// List every node path with its kind and flags
    Paths(PathsArgs),
}

/// Schema input shared by all commands
#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Path to a JSON schema file
    #[arg(short, long, env = "DOMTREE_SCHEMA")]
    pub schema: PathBuf,

    /// Name of the root node
    #[arg(long, default_value = "root", env = "DOMTREE_ROOT")]
    pub root: String,
}

/// Arguments for the build command
#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: SchemaArgs,

    /// Dotted path of the node to print instead of the root
    #[arg(short, long)]
    pub context: Option<String>,

    /// Print only properties, leaving out children
    #[arg(long)]
    pub props_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", env = "DOMTREE_FORMAT")]
    pub format: TreeFormat,
}

/// Arguments for the paths command
#[derive(clap::Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub input: SchemaArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", env = "DOMTREE_FORMAT")]
    pub format: OutputFormat,
}

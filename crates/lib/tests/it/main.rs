/*! Integration tests for domtree.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - flags: Tests for FlagSet and the lock/unlock state machine
 * - tree: Tests for node structure, properties, navigation and reparenting
 * - map_node: Tests for map nodes and their mapping operations
 * - schema: Tests for schema parsing and SchemaBuilder
 * - export: Tests for mapping export and reconstruction
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("domtree=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod flags;
mod helpers;
mod map_node;
mod tree;

//! Shared test utilities for the resource-index workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Pre-filled indexes for the model/run/field/offset scenario and the NWP layout
//! - Generators for offset series and cross products of variables
//! - Temporary image trees for the inspector
//! - Assertion macros for variable lists and search results
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_variable_ids, scenario::Scenario};
//! ```

pub mod fixtures;
pub mod generators;
pub mod tree;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use tree::*;

/// Assert that a list of variables has exactly the given ids, in order.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_variable_ids;
///
/// let models = index.available_variables(&"models".into(), &[]);
/// assert_variable_ids!(models, ["ECMWF", "GFS"]);
/// ```
#[macro_export]
macro_rules! assert_variable_ids {
    ($variables:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<String> = $variables.iter().map(|v| v.id().to_string()).collect();
        let expected: Vec<String> = vec![$($id.to_string()),*];
        assert_eq!(actual, expected, "variable ids differ");
    }};
}

/// Assert that a search result is the node of the named collection.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_node_collection;
///
/// assert_node_collection!(index, index.top_most_node_with_all_variables(&[]), "models");
/// ```
#[macro_export]
macro_rules! assert_node_collection {
    ($index:expr, $node:expr, $collection:expr) => {{
        let node = $node.expect("search returned no node");
        let found = $index
            .node(node)
            .map(|n| n.collection().id().as_str().to_string());
        assert_eq!(found.as_deref(), Some($collection), "unexpected node {}", node);
    }};
}

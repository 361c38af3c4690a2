//! Prefix maps, JSON-LD contexts and CURIE resolution for SSSOM mapping sets.
//!
//! This crate owns the *namespace* side of a mapping set:
//!
//! - [`context`]: the embedded built-in and external JSON-LD contexts;
//! - [`prefix_map`]: the [`PrefixMap`] type and a conflict-reporting merge;
//! - [`registry`]: reconciliation against the built-in prefixes and pruning
//!   to the prefixes a table actually uses;
//! - [`curie`]: expansion and contraction of compact identifiers.
//!
//! Row-level operations live in `sssom-mappings`.

pub mod context;
pub mod curie;
pub mod error;
pub mod prefix_map;
pub mod registry;

pub use context::{is_built_in_prefix, SSSOM_BUILT_IN_PREFIXES};
pub use curie::{contract, expand, expand_or_passthrough, is_curie, prefix_of};
pub use error::ContextError;
pub use prefix_map::{merge_prefix_maps, Precedence, PrefixConflict, PrefixMap};
pub use registry::{
    built_in_prefix_map, default_extended_prefix_map, prune_to_used, reconcile,
    reconcile_with_report,
};

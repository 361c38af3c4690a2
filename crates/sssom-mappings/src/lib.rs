//! Mapping-set tables and the operations defined over them.
//!
//! A [`MappingSetTable`] binds rows of [`Mapping`]s to a prefix map and
//! set-level metadata. The operations:
//!
//! - prefix filtering and unmatched-row removal ([`filter`]);
//! - inversion with a predicate inverse table ([`invert`]);
//! - predicate-agnostic comparison ([`diff`]);
//! - metadata injection ([`metadata`]);
//! - merging with redundancy and negation reconciliation ([`reconcile`]);
//! - splitting by prefix ([`split`]) and into cliques ([`cliques`]);
//! - triple collapsing and probability tables ([`ptable`]);
//! - predicate-list resolution ([`predicates`]).
//!
//! Row-producing operations return new values; only
//! [`MappingSetTable::clean_prefix_map`] and
//! [`MappingSetTable::remove_mappings`] mutate a table in place.

pub mod cliques;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod invert;
pub mod mapping;
pub mod metadata;
pub mod predicates;
pub mod ptable;
pub mod reconcile;
pub mod schema;
pub mod split;
pub mod table;

pub use cliques::split_into_cliques;
pub use config::MappingSetConfig;
pub use diff::{compare, DiffRow, DiffSide, EntityPair, MappingSetDiff};
pub use error::MappingSetError;
pub use filter::{filter_out_prefixes, filter_prefixes, remove_unmatched, DEFAULT_FILTER_COLUMNS};
pub use invert::{invert_mapping, invert_mappings, InversePredicates};
pub use mapping::{Mapping, Record, SlotValue};
pub use metadata::inject_metadata;
pub use predicates::extract_iris;
pub use ptable::{collapse, to_ptable, PTableRow, PredicateClass, DEFAULT_INVERSE_FACTOR};
pub use reconcile::{deal_with_negation, filter_redundant_rows, merge, merge_with_config};
pub use schema::MappingSchema;
pub use split::{
    split_by_prefix, split_by_prefix_selected, split_by_prefix_with_config, SplitSelection,
};
pub use table::{default_metadata, used_prefixes, MappingSetTable, Metadata};

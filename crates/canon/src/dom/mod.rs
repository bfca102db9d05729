// ABOUTME: DOM-level passes run between the parse and the final serialization.
// ABOUTME: Pruning mutates per the cleaning rules; ordering makes serialization deterministic.

//! Document tree passes.
//!
//! Everything here operates on a parsed [`dom_query::Document`] owned by one
//! pipeline invocation. Match sets are always materialized before mutation so
//! removing one element never perturbs iteration over the rest.

pub mod order;
pub mod prune;
pub(crate) mod walk;

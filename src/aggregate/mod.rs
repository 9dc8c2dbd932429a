//! Reusable aggregation primitives.
//!
//! - [`accumulate`]: cursor pagination with an item limit and resume cursor
//! - [`merge`]: declared-order merge of per-operation fragments under a
//!   field-ownership table
//!
//! Fan-out itself lives on [`Upstreams::execute_all`](crate::clients::Upstreams::execute_all);
//! this module only decides what to do with the replies.

mod merge;
mod pagination;

pub use merge::{
    merge, FieldRule, Fragment, MergeError, MergedRecord, OwnershipTable, TerminalStatus,
    WriteMode,
};
pub use pagination::{
    accumulate, Accumulation, CursorPolicy, Page, PageInfo, PageLimit, PagedEdge,
};

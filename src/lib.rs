//! Runtime reflection for Rust types.
//!
//! This crate re-exports the workspace members:
//!
//! - [`reflect`]: classes, type descriptors, type-erased values.
//! - [`utils`]: hashing and the `TypeId` keyed map used by `reflect`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use stx_reflect as reflect;
pub use stx_utils as utils;

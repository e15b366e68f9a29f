//! Error types and the invariant violation path.
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`PropertyError`]: recoverable failures while reading or writing a
//!   property through type-erased handles. Returned as `Result`.
//! - [`InvariantError`]: programming errors in class declarations or type
//!   descriptions. They are never returned; every one of them goes through
//!   [`invariant_violation`], which logs the error and panics.

use thiserror::Error;

use crate::ty::Type;

// -----------------------------------------------------------------------------
// InvariantError

/// A broken declaration or description invariant.
///
/// See [`invariant_violation`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantError {
    /// A class declared two properties with the same name.
    #[error("class `{class}` declares property `{property}` more than once")]
    DuplicateProperty {
        class: &'static str,
        property: &'static str,
    },
    /// A class declared itself as one of its base classes.
    #[error("class `{class}` cannot be a base class of itself")]
    SelfBase { class: &'static str },
    /// A class was requested while its own declaration was still running,
    /// for example through mutually declared base classes.
    #[error("class `{class}` was requested while its declaration was running")]
    RecursiveDeclaration { class: &'static str },
    /// A pointer level was added on top of an array extent.
    #[error("cannot describe a pointer to a rank-{rank} array of `{class}`")]
    PointerToArray { class: &'static str, rank: usize },
    /// More pointer levels than a descriptor can record.
    #[error("type over `{class}` exceeds {max} levels of indirection")]
    IndirectionOverflow { class: &'static str, max: usize },
}

/// The single reporting path for [`InvariantError`]s.
///
/// Logs the error at `error` level, then panics with the same message.
#[cold]
#[track_caller]
pub fn invariant_violation(error: InvariantError) -> ! {
    log::error!("invariant violation: {error}");
    panic!("invariant violation: {error}")
}

// -----------------------------------------------------------------------------
// PropertyError

/// Failure of [`Property::read`](crate::property::Property::read) or
/// [`Property::write`](crate::property::Property::write).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PropertyError {
    /// The property has no write accessor.
    #[error("property `{class}::{property}` is read-only")]
    ReadOnly {
        class: &'static str,
        property: &'static str,
    },
    /// The instance is not (and does not derive from) the declaring class.
    #[error("property `{class}::{property}` cannot be accessed on `{found}`")]
    InstanceMismatch {
        class: &'static str,
        property: &'static str,
        found: &'static Type,
    },
    /// The written value is not convertible to the property type.
    #[error("property `{class}::{property}` expects `{expected}`, found `{found}`")]
    ValueMismatch {
        class: &'static str,
        property: &'static str,
        expected: &'static Type,
        found: &'static Type,
    },
}

// -----------------------------------------------------------------------------
// Tests

//! Type-erased values.
//!
//! - [`AnyValue`] owns one value of any clonable [`TypeShape`](crate::TypeShape) type, or nothing.
//! - [`ErasedRef`] and [`ErasedMut`] borrow one, remembering its [`Type`](crate::Type).
//!
//! Extraction is checked with
//! [`Type::is_convertible_to`](crate::Type::is_convertible_to): a value can
//! be seen as its own type or, for plain classes, as any declared base class.

// -----------------------------------------------------------------------------
// Modules

mod any_value;
mod erased;

// -----------------------------------------------------------------------------
// Exports

pub use any_value::AnyValue;
pub use erased::{ErasedMut, ErasedRef};

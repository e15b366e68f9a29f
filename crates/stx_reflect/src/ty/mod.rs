//! Type descriptors.
//!
//! A [`Type`] describes a *decorated* type: a plain class plus pointer
//! levels, per-level qualifiers, an optional reference and array extents.
//! Descriptors are interned, so every distinct decoration of every class
//! has exactly one `&'static Type` for the lifetime of the process and
//! identity comparison is meaningful.
//!
//! Rust types map onto decorations through [`TypeShape`]:
//!
//! | Rust type    | decoration                                          |
//! |--------------|-----------------------------------------------------|
//! | `T`          | plain class of `T`                                  |
//! | `*mut P`     | one pointer level over `P`                          |
//! | `*const P`   | one pointer level over `P`, pointee const           |
//! | `&mut P`     | lvalue reference to `P`                             |
//! | `&P`         | lvalue reference to `P`, referenced position const  |
//! | `[P; N]`     | extent `N` in front of the extents of `P`           |
//!
//! A borrow nested inside another decoration (`*const &T`, `[&T; 2]`) is
//! recorded as one more pointer level. Volatile qualifiers and rvalue
//! references have no Rust spelling and can only be built explicitly with
//! [`Shape`].
//!
//! Descriptors reached through [`Type::of`] are cached per type, see
//! [`TypeCell`].
//!
//! ## Positions
//!
//! Qualifiers are tracked per *position*: position `0` is the innermost
//! pointee (the class itself) and position `indirection_level` is the
//! outermost value. `*const *mut T` has level 2, with position 1 const.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod convert;
mod decorations;
mod descriptor;
mod qualifiers;
mod shape;

// -----------------------------------------------------------------------------
// Exports

pub use cell::TypeCell;
pub use descriptor::Type;
pub use qualifiers::{Qualifiers, Reference};
pub use shape::{MAX_INDIRECTION, PlainType, Shape, TypeShape};

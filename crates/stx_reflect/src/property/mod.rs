//! Named, typed, readable and optionally writable attributes of a class.
//!
//! A [`Property`] is declared with an [`Accessor`], which knows how to read
//! (and maybe write) one value of type `F` on an instance of `T`. The
//! property erases both types, so callers work with [`ErasedRef`],
//! [`ErasedMut`] and [`AnyValue`].
//!
//! Instances of derived classes are accepted wherever their base class is:
//! a property declared on `Shape` reads `Square` values too.
//!
//! [`ErasedRef`]: crate::value::ErasedRef
//! [`ErasedMut`]: crate::value::ErasedMut
//! [`AnyValue`]: crate::AnyValue

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::Accessor;
pub use descriptor::Property;

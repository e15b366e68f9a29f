//! Capability objects attached to classes.
//!
//! An interface is any `Send + Sync + 'static` value. A class holds at most
//! one interface per interface type, keyed by that type:
//!
//! ```
//! use stx_reflect::{Class, ClassBuilder, ClassDeclaration, impl_type_shape};
//!
//! struct Units(&'static str);
//!
//! #[derive(Clone)]
//! struct Distance(f64);
//!
//! impl ClassDeclaration for Distance {
//!     const NAME: &'static str = "Distance";
//!
//!     fn declare(class: &mut ClassBuilder<'_, Self>) {
//!         class.add_interface(Units("m"));
//!     }
//! }
//!
//! impl_type_shape!(Distance);
//!
//! # fn main() {
//! let class = Class::of::<Distance>();
//! assert_eq!(class.get_interface::<Units>().unwrap().0, "m");
//! # }
//! ```
//!
//! Two capabilities are provided: [`Constructible`] and [`Enumeration`].

use core::any::Any;

// -----------------------------------------------------------------------------
// Modules

mod constructible;
mod enumeration;

// -----------------------------------------------------------------------------
// Exports

pub use constructible::Constructible;
pub use enumeration::Enumeration;

// -----------------------------------------------------------------------------
// Interface

/// A value that can be attached to a [`Class`](crate::Class).
///
/// Implemented for every `Send + Sync + 'static` type.
pub trait Interface: Any + Send + Sync + 'static {}

impl<T: Any + Send + Sync> Interface for T {}

impl dyn Interface {
    /// Returns `true` if the interface is a `T`.
    #[inline]
    pub fn is<T: Interface>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// The interface as a `T`, if it is one.
    #[inline]
    pub fn downcast_ref<T: Interface>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

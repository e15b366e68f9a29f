//! Classes: the per-type reflection record.
//!
//! Every type implementing [`ClassDeclaration`] owns exactly one sealed
//! [`Class`], created on first use by running [`ClassDeclaration::declare`]
//! against a fresh [`ClassBuilder`]. After that the class never changes.
//!
//! ## Lookup
//!
//! - [`Class::of`] / [`class_of`]: by Rust type.
//! - [`Class::find`]: by default name or alias, among sealed classes.
//! - [`Class::by_id`]: by [`TypeId`](core::any::TypeId), among sealed classes.
//!
//! ## auto_register
//!
//! Classes are normally sealed lazily. With the `auto_register` feature,
//! [`auto_register`] seals every class declared through
//! [`impl_class!`](crate::impl_class) or
//! [`impl_type_shape!`](crate::impl_type_shape) up front, which makes name
//! lookup see them before their first use.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod declaration;
mod meta;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ClassBuilder;
pub use declaration::{ClassDeclaration, Upcast};
pub use meta::{BaseClass, Class, class_of};
pub use registry::{auto_register, registered_classes};

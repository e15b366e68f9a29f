//! Runtime reflection for Rust types.
//!
//! A type opts in by implementing [`ClassDeclaration`] (usually through
//! [`impl_class!`] or [`impl_type_shape!`]). From then on the process holds
//! exactly one sealed [`Class`] for it, created on first use, which records:
//!
//! - a default name and any number of name aliases,
//! - base classes (types it embeds and can [`Upcast`] to),
//! - named [properties](property::Property) backed by fields or accessors,
//! - [interfaces](interface): capability objects keyed by their own type,
//!   such as [`Constructible`](interface::Constructible) and
//!   [`Enumeration`](interface::Enumeration).
//!
//! Decorated types (`*const T`, `&mut T`, `[T; N]` ...) are described by an
//! interned [`Type`] descriptor that answers convertibility queries, and
//! values of any describable, clonable type can be carried in an
//! [`AnyValue`] and extracted again with those same convertibility rules.
//!
//! ## Menu
//!
//! - [`ty`]: [`Type`], [`Shape`](ty::Shape), [`TypeShape`], qualifiers.
//! - [`value`]: [`AnyValue`], [`ErasedRef`](value::ErasedRef), [`ErasedMut`](value::ErasedMut).
//! - [`class`]: [`Class`], [`ClassBuilder`], [`ClassDeclaration`], [`Upcast`], the registry.
//! - [`property`]: [`Property`](property::Property), [`Accessor`](property::Accessor).
//! - [`interface`]: [`Interface`](interface::Interface) and the builtin capabilities.
//! - [`error`]: error types and the invariant violation path.
//! - [`impls`]: class declarations for primitives and strings.
//!
//! ## Example
//!
//! ```
//! use stx_reflect::{AnyValue, Class, ClassBuilder, ClassDeclaration, impl_type_shape};
//! use stx_reflect::property::Accessor;
//!
//! #[derive(Clone, Default, PartialEq, Debug)]
//! struct Point {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl ClassDeclaration for Point {
//!     const NAME: &'static str = "Point";
//!
//!     fn declare(class: &mut ClassBuilder<'_, Self>) {
//!         class
//!             .default_constructible()
//!             .add_property("x", Accessor::field(|p: &Point| &p.x, |p| &mut p.x))
//!             .add_property("y", Accessor::field(|p: &Point| &p.y, |p| &mut p.y));
//!     }
//! }
//!
//! impl_type_shape!(Point);
//!
//! # fn main() {
//! let class = Class::of::<Point>();
//! let mut point = AnyValue::new(Point { x: 1.0, y: 2.0 });
//!
//! let y = class.get_property("y").unwrap();
//! y.write(point.as_erased_mut().unwrap(), AnyValue::new(5.0_f32)).unwrap();
//!
//! assert_eq!(point.downcast_ref::<Point>(), Some(&Point { x: 1.0, y: 5.0 }));
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    /// Expands its input only when extra descriptor checks are enabled.
    #[doc(hidden)]
    #[macro_export]
    #[cfg(all(debug_assertions, feature = "debug"))]
    macro_rules! __debug {
        ($($tt:tt)*) => { $($tt)* };
    }

    /// Expands its input only when extra descriptor checks are enabled.
    #[doc(hidden)]
    #[macro_export]
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    macro_rules! __debug {
        ($($tt:tt)*) => {};
    }

    pub use crate::__debug as debug;
}

// -----------------------------------------------------------------------------
// Extern Self

// Macros expand to `$crate` paths, but doc tests name the crate directly.
extern crate self as stx_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod macros;

pub mod class;
pub mod error;
pub mod impls;
pub mod interface;
pub mod property;
pub mod ty;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use class::{Class, ClassBuilder, ClassDeclaration, Upcast, class_of};
pub use ty::{Type, TypeShape};
pub use value::AnyValue;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde_json::{Map, Value, json};

    use crate::interface::{Constructible, Enumeration};
    use crate::property::Accessor;
    use crate::value::ErasedRef;
    use crate::{AnyValue, Class, ClassBuilder, ClassDeclaration, impl_type_shape, impl_upcast};

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Suit {
        Hearts,
        Spades,
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Entity {
        id: u64,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Card {
        entity: Entity,
        suit: Suit,
        rank: u8,
        label: String,
    }

    impl ClassDeclaration for Suit {
        const NAME: &'static str = "tests::Suit";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class.add_interface(Enumeration::new([
                ("hearts", Suit::Hearts),
                ("spades", Suit::Spades),
            ]));
        }
    }

    impl ClassDeclaration for Entity {
        const NAME: &'static str = "tests::Entity";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .default_constructible()
                .add_property("id", Accessor::field_ref(|e: &Entity| &e.id));
        }
    }

    impl ClassDeclaration for Card {
        const NAME: &'static str = "tests::Card";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_name_alias("tests::PlayingCard")
                .add_base_class::<Entity>()
                .add_property("suit", Accessor::field(|c: &Card| &c.suit, |c| &mut c.suit))
                .add_property("rank", Accessor::field(|c: &Card| &c.rank, |c| &mut c.rank))
                .add_property("label", Accessor::getter(|c: &Card| c.label.clone()))
                .add_interface(Constructible::new(|(suit, rank): (Suit, u8)| Card {
                    entity: Entity { id: u64::from(rank) },
                    suit,
                    rank,
                    label: String::new(),
                }));
        }
    }

    impl_type_shape!(Suit);
    impl_type_shape!(Entity);
    impl_type_shape!(Card);
    impl_upcast!(Card => Entity: entity);

    /// A consumer that only knows the reflection API.
    fn to_json(value: ErasedRef<'_>) -> Value {
        let class = value.ty().class();

        if let Some(variants) = class.find_interface::<Enumeration>() {
            return variants.name_of(value).map_or(Value::Null, Value::from);
        }
        if let Some(v) = value.downcast_ref::<u8>() {
            return json!(v);
        }
        if let Some(v) = value.downcast_ref::<u64>() {
            return json!(v);
        }
        if let Some(v) = value.downcast_ref::<String>() {
            return json!(v);
        }

        let mut object = Map::new();
        for property in class.all_properties() {
            let field = property.read(value).unwrap_or_default();
            let json = field.as_erased().map_or(Value::Null, to_json);
            object.insert(String::from(property.name()), json);
        }
        Value::Object(object)
    }

    #[test]
    fn serialize_through_reflection() {
        let class = Class::of::<Card>();
        assert!(core::ptr::eq(Class::find("tests::PlayingCard").unwrap(), class));

        let card = class
            .get_interface::<Constructible<(Suit, u8)>>()
            .unwrap()
            .instantiate((Suit::Spades, 12));

        assert_eq!(
            to_json(card.as_erased().unwrap()),
            json!({ "suit": "spades", "rank": 12, "label": "", "id": 12 })
        );
    }

    #[test]
    fn walk_hierarchy() {
        let card = Class::of::<Card>();
        let entity = Class::of::<Entity>();

        assert!(card.is_a(entity));
        assert!(!entity.is_a(card));
        assert!(card.has_name("tests::PlayingCard"));
        assert!(core::ptr::eq(card.base_classes()[0].class(), entity));

        assert!(!card.has_interface::<Constructible>());
        assert!(card.find_interface::<Constructible>().is_some());

        let mut value = AnyValue::new(Card {
            entity: Entity { id: 1 },
            suit: Suit::Hearts,
            rank: 1,
            label: String::from("ace"),
        });
        let names: Vec<_> = card.all_properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["suit", "rank", "label", "id"]);

        card.get_property("rank")
            .unwrap()
            .write(value.as_erased_mut().unwrap(), AnyValue::new(13u8))
            .unwrap();
        assert_eq!(value.get::<Card>().rank, 13);
        assert_eq!(value.get::<Entity>(), &Entity { id: 1 });
    }
}

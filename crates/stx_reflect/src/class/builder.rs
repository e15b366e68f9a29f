use alloc::boxed::Box;
use core::any::TypeId;
use core::marker::PhantomData;

use crate::class::{BaseClass, Class, ClassDeclaration, Upcast};
use crate::error::{InvariantError, invariant_violation};
use crate::interface::{Constructible, Interface};
use crate::property::{Accessor, Property};
use crate::ty::TypeShape;

/// Populates the [`Class`] of `T` while its declaration runs.
///
/// Handed to [`ClassDeclaration::declare`]; never available afterwards.
pub struct ClassBuilder<'a, T: ?Sized> {
    class: &'a mut Class,
    _marker: PhantomData<fn(&T)>,
}

impl<'a, T: ClassDeclaration + ?Sized> ClassBuilder<'a, T> {
    #[inline]
    pub(crate) fn new(class: &'a mut Class) -> Self {
        Self {
            class,
            _marker: PhantomData,
        }
    }

    /// The class as populated so far.
    #[inline]
    pub fn class(&self) -> &Class {
        self.class
    }

    /// Adds an alternative name. Repeated names are ignored.
    pub fn add_name_alias(&mut self, name: &'static str) -> &mut Self {
        self.class.push_alias(name);
        self
    }

    /// Declares `B` as a base class. Seals `B` first if needed.
    ///
    /// Repeated bases are ignored.
    ///
    /// # Panics
    ///
    /// Declaring `T` as its own base is an invariant violation.
    pub fn add_base_class<B: ClassDeclaration>(&mut self) -> &mut Self
    where
        T: Upcast<B> + Sized,
    {
        if TypeId::of::<B>() == TypeId::of::<T>() {
            invariant_violation(InvariantError::SelfBase { class: T::NAME });
        }
        self.class.push_base(BaseClass::new::<T, B>());
        self
    }

    /// Declares the property `name`, read and written through `accessor`.
    ///
    /// # Panics
    ///
    /// Declaring two properties with the same name is an invariant violation.
    pub fn add_property<F>(&mut self, name: &'static str, accessor: Accessor<T, F>) -> &mut Self
    where
        T: TypeShape + Sized,
        F: Clone + TypeShape + 'static,
    {
        if self.class.get_property(name).is_some() {
            invariant_violation(InvariantError::DuplicateProperty {
                class: T::NAME,
                property: name,
            });
        }
        self.class.push_property(Property::new(T::NAME, name, accessor));
        self
    }

    /// Attaches `interface`, keyed by its type.
    ///
    /// A second interface of the same type replaces the first.
    pub fn add_interface<I: Interface>(&mut self, interface: I) -> &mut Self {
        if self
            .class
            .insert_interface(TypeId::of::<I>(), Box::new(interface))
            .is_some()
        {
            log::warn!(
                "class `{}` replaced its interface `{}`",
                T::NAME,
                core::any::type_name::<I>(),
            );
        }
        self
    }

    /// Attaches a [`Constructible`] producing `T::default()`.
    #[inline]
    pub fn default_constructible(&mut self) -> &mut Self
    where
        T: Default + Clone + TypeShape + Sized,
    {
        self.add_interface(Constructible::<()>::of_default::<T>())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::class::{Class, ClassBuilder, ClassDeclaration, Upcast};
    use crate::interface::Constructible;
    use crate::{impl_class, impl_type_shape, impl_upcast};

    struct Label(&'static str);

    #[derive(Clone)]
    struct Node;

    #[derive(Clone)]
    struct Leaf {
        node: Node,
    }

    impl ClassDeclaration for Node {
        const NAME: &'static str = "builder::Node";
        const ABSTRACT: bool = true;

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_interface(Label("first"))
                .add_interface(Label("second"));
        }
    }

    impl ClassDeclaration for Leaf {
        const NAME: &'static str = "builder::Leaf";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_name_alias("builder::Tip")
                .add_name_alias("builder::Tip")
                .add_name_alias("builder::Leaf")
                .add_base_class::<Node>()
                .add_base_class::<Node>();
            assert_eq!(class.class().base_classes().len(), 1);
        }
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Spool(u16);

    impl_class!(Spool as "builder::Spool");

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Bobbin(u16);

    impl_class!(Bobbin as "builder::Bobbin" (default));

    impl_type_shape!(Node);
    impl_type_shape!(Leaf);
    impl_upcast!(Leaf => Node: node);

    #[test]
    fn aliases_and_bases_are_deduplicated() {
        let leaf = Class::of::<Leaf>();
        assert_eq!(leaf.name_aliases(), ["builder::Tip"]);
        assert_eq!(leaf.names().count(), 2);
        assert_eq!(leaf.base_classes().len(), 1);
        assert!(leaf.base_classes()[0].class().is::<Node>());
    }

    #[test]
    fn last_interface_wins() {
        let node = Class::of::<Node>();
        assert_eq!(node.interface_count(), 1);
        assert_eq!(node.get_interface::<Label>().unwrap().0, "second");
        assert!(node.get_interface::<Constructible>().is_none());
    }

    #[test]
    fn lookups_are_local_unless_find() {
        let leaf = Class::of::<Leaf>();
        assert!(leaf.get_interface::<Label>().is_none());
        assert!(!leaf.has_interface::<Label>());
        assert_eq!(leaf.find_interface::<Label>().unwrap().0, "second");
    }

    #[test]
    fn default_constructor_is_opt_in() {
        assert!(!Class::of::<Spool>().has_interface::<Constructible>());

        let bobbin = Class::of::<Bobbin>();
        let made = bobbin.get_interface::<Constructible>().unwrap().instantiate(());
        assert_eq!(made.get::<Bobbin>(), &Bobbin(0));
    }

    #[test]
    fn abstract_flag() {
        assert!(Class::of::<Node>().is_abstract());
        assert!(!Class::of::<Leaf>().is_abstract());
    }

    #[derive(Clone)]
    struct Narcissus;

    impl Upcast<Narcissus> for Narcissus {
        fn upcast_ref(&self) -> &Narcissus {
            self
        }

        fn upcast_mut(&mut self) -> &mut Narcissus {
            self
        }
    }

    impl ClassDeclaration for Narcissus {
        const NAME: &'static str = "builder::Narcissus";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class.add_base_class::<Narcissus>();
        }
    }

    #[test]
    #[should_panic(expected = "cannot be a base class of itself")]
    fn self_base_is_fatal() {
        let _ = Class::of::<Narcissus>();
    }
}

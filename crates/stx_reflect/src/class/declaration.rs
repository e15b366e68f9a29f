use crate::class::ClassBuilder;

/// A type with a reflected [`Class`](crate::Class).
///
/// Usually implemented through [`impl_class!`](crate::impl_class). Implement
/// it by hand when the class needs base classes or properties, and pair it
/// with [`impl_type_shape!`](crate::impl_type_shape).
///
/// `declare` runs exactly once per process, when the class is first
/// requested. It must not request its own class, directly or through a
/// base class.
///
/// # Default constructor
///
/// A class only gets a [`Constructible`](crate::interface::Constructible)
/// with no arguments when its declaration asks for one, through
/// [`ClassBuilder::default_constructible`] or the `default` option of
/// [`impl_class!`](crate::impl_class). Implementing [`Default`] alone does not
/// attach it.
///
/// # Examples
///
/// ```
/// use stx_reflect::{Class, ClassBuilder, ClassDeclaration, impl_type_shape};
/// use stx_reflect::interface::Constructible;
///
/// #[derive(Clone, Default)]
/// struct Meters(f64);
///
/// impl ClassDeclaration for Meters {
///     const NAME: &'static str = "Meters";
///
///     fn declare(class: &mut ClassBuilder<'_, Self>) {
///         class.add_name_alias("m").default_constructible();
///     }
/// }
///
/// impl_type_shape!(Meters);
///
/// # fn main() {
/// let class = Class::of::<Meters>();
/// assert!(class.has_name("m"));
/// assert!(class.has_interface::<Constructible>());
/// assert!(std::ptr::eq(Class::find("Meters").unwrap(), class));
/// # }
/// ```
pub trait ClassDeclaration: 'static {
    /// The default name of the class.
    const NAME: &'static str;

    /// Whether instances of this exact type cannot exist on their own.
    const ABSTRACT: bool = false;

    /// Fills in aliases, bases, properties and interfaces.
    fn declare(_class: &mut ClassBuilder<'_, Self>) {}
}

/// Access to an embedded base value.
///
/// Implementing `Upcast<B>` for `D` is what allows
/// [`ClassBuilder::add_base_class::<B>`](ClassBuilder::add_base_class) in the
/// declaration of `D`. See [`impl_upcast!`](crate::impl_upcast) for the
/// usual field-based implementation.
pub trait Upcast<B: ?Sized> {
    fn upcast_ref(&self) -> &B;

    fn upcast_mut(&mut self) -> &mut B;
}

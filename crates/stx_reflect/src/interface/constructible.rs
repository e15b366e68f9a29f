use alloc::boxed::Box;

use crate::ty::{Type, TypeShape};
use crate::value::AnyValue;

/// Creates new instances of a class from `Args`.
///
/// The created instance is returned inside an [`AnyValue`], which owns it.
///
/// # Examples
///
/// ```
/// use stx_reflect::{Class, ClassBuilder, ClassDeclaration, impl_type_shape};
/// use stx_reflect::interface::Constructible;
///
/// #[derive(Clone, Default, Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
///
/// impl ClassDeclaration for Rgb {
///     const NAME: &'static str = "Rgb";
///
///     fn declare(class: &mut ClassBuilder<'_, Self>) {
///         class
///             .default_constructible()
///             .add_interface(Constructible::new(|(r, g, b): (u8, u8, u8)| Rgb(r, g, b)));
///     }
/// }
///
/// impl_type_shape!(Rgb);
///
/// # fn main() {
/// let class = Class::of::<Rgb>();
///
/// let black = class.get_interface::<Constructible>().unwrap().instantiate(());
/// assert_eq!(black.get::<Rgb>(), &Rgb(0, 0, 0));
///
/// let from_parts = class.get_interface::<Constructible<(u8, u8, u8)>>().unwrap();
/// assert_eq!(from_parts.instantiate((1, 2, 3)).get::<Rgb>(), &Rgb(1, 2, 3));
/// # }
/// ```
pub struct Constructible<Args = ()> {
    product: fn() -> &'static Type,
    construct: Box<dyn Fn(Args) -> AnyValue + Send + Sync>,
}

impl<Args: 'static> Constructible<Args> {
    /// Constructs instances with `construct`.
    pub fn new<T, F>(construct: F) -> Self
    where
        T: Clone + TypeShape + 'static,
        F: Fn(Args) -> T + Send + Sync + 'static,
    {
        Self {
            product: Type::of::<T>,
            construct: Box::new(move |args: Args| AnyValue::new(construct(args))),
        }
    }

    /// A new instance, owned by the returned value.
    #[inline]
    pub fn instantiate(&self, args: Args) -> AnyValue {
        (self.construct)(args)
    }

    /// The descriptor of the constructed type.
    #[inline]
    pub fn product(&self) -> &'static Type {
        (self.product)()
    }
}

impl Constructible<()> {
    /// Constructs instances with [`Default::default`].
    pub fn of_default<T: Default + Clone + TypeShape + 'static>() -> Self {
        Self::new(|()| T::default())
    }
}

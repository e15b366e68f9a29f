/// Implements [`TypeShape`](crate::TypeShape) for a plain class type.
///
/// With the `auto_register` feature, also submits the class to
/// [`auto_register`](crate::class::auto_register), so use it only for
/// types whose declaration cannot fail.
///
/// # Examples
///
/// ```
/// use stx_reflect::{ClassDeclaration, Type, impl_type_shape};
///
/// struct Token;
///
/// impl ClassDeclaration for Token {
///     const NAME: &'static str = "Token";
/// }
///
/// impl_type_shape!(Token);
///
/// # fn main() {
/// assert_eq!(Type::of::<*const Token>().to_string(), "*const Token");
/// # }
/// ```
#[macro_export]
macro_rules! impl_type_shape {
    ($ty:ty) => {
        impl $crate::ty::TypeShape for $ty {
            type Plain = Self;

            #[inline]
            fn shape() -> $crate::ty::Shape {
                $crate::ty::Shape::new::<Self>()
            }

            #[inline]
            fn descriptor() -> &'static $crate::Type {
                static CELL: $crate::ty::TypeCell = $crate::ty::TypeCell::new();
                CELL.get_or_intern::<Self>()
            }
        }

        $crate::__submit_class!($ty);
    };
}

/// Declares a class without bases or properties and implements
/// [`TypeShape`](crate::TypeShape) for it.
///
/// Options, in parentheses after the name:
///
/// - `default`: attach a default [`Constructible`](crate::interface::Constructible).
/// - `alias = "name"`: add a name alias. May repeat.
///
/// # Examples
///
/// ```
/// use stx_reflect::{Class, impl_class};
/// use stx_reflect::interface::Constructible;
///
/// #[derive(Clone, Default)]
/// struct Kelvin(f64);
///
/// impl_class!(Kelvin as "Kelvin" (default, alias = "K"));
///
/// # fn main() {
/// let class = Class::of::<Kelvin>();
/// assert_eq!(class.name_aliases(), ["K"]);
/// assert!(class.has_interface::<Constructible>());
/// # }
/// ```
#[macro_export]
macro_rules! impl_class {
    ($ty:ty as $name:literal) => {
        $crate::impl_class!($ty as $name ());
    };
    ($ty:ty as $name:literal ()) => {
        impl $crate::class::ClassDeclaration for $ty {
            const NAME: &'static str = $name;
        }

        $crate::impl_type_shape!($ty);
    };
    ($ty:ty as $name:literal ($($options:tt)+)) => {
        impl $crate::class::ClassDeclaration for $ty {
            const NAME: &'static str = $name;

            fn declare(class: &mut $crate::class::ClassBuilder<'_, Self>) {
                $crate::__class_options!(class; $($options)+);
            }
        }

        $crate::impl_type_shape!($ty);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __class_options {
    ($class:ident;) => {};
    ($class:ident; default $(, $($rest:tt)*)?) => {
        $class.default_constructible();
        $crate::__class_options!($class; $($($rest)*)?);
    };
    ($class:ident; alias = $alias:literal $(, $($rest:tt)*)?) => {
        $class.add_name_alias($alias);
        $crate::__class_options!($class; $($($rest)*)?);
    };
}

/// Implements [`Upcast`](crate::Upcast) through an embedded field.
///
/// `impl_upcast!(Derived => Base: field)` lets `Derived` declare `Base` as
/// a base class, reaching it through `self.field`.
///
/// # Examples
///
/// ```
/// use stx_reflect::{Class, ClassBuilder, ClassDeclaration, impl_class, impl_type_shape, impl_upcast};
///
/// #[derive(Clone)]
/// struct Animal;
///
/// #[derive(Clone)]
/// struct Dog {
///     animal: Animal,
/// }
///
/// impl_class!(Animal as "Animal");
///
/// impl ClassDeclaration for Dog {
///     const NAME: &'static str = "Dog";
///
///     fn declare(class: &mut ClassBuilder<'_, Self>) {
///         class.add_base_class::<Animal>();
///     }
/// }
///
/// impl_type_shape!(Dog);
/// impl_upcast!(Dog => Animal: animal);
///
/// # fn main() {
/// assert!(Class::of::<Dog>().is_a(Class::of::<Animal>()));
/// # }
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($derived:ty => $base:ty : $field:ident) => {
        impl $crate::class::Upcast<$base> for $derived {
            #[inline]
            fn upcast_ref(&self) -> &$base {
                &self.$field
            }

            #[inline]
            fn upcast_mut(&mut self) -> &mut $base {
                &mut self.$field
            }
        }
    };
}

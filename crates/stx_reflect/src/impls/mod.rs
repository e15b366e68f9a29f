//! Classes of primitive and string types.
//!
//! Every class here is named after its Rust spelling. `()` also answers to
//! `"void"`, and every type with a [`Default`] implementation carries a
//! default [`Constructible`](crate::interface::Constructible).

use alloc::string::String;

use crate::impl_class;

impl_class!(() as "()" (default, alias = "void"));
impl_class!(bool as "bool" (default));
impl_class!(char as "char" (default));

impl_class!(i8 as "i8" (default));
impl_class!(i16 as "i16" (default));
impl_class!(i32 as "i32" (default));
impl_class!(i64 as "i64" (default));
impl_class!(i128 as "i128" (default));
impl_class!(isize as "isize" (default));

impl_class!(u8 as "u8" (default));
impl_class!(u16 as "u16" (default));
impl_class!(u32 as "u32" (default));
impl_class!(u64 as "u64" (default));
impl_class!(u128 as "u128" (default));
impl_class!(usize as "usize" (default));

impl_class!(f32 as "f32" (default));
impl_class!(f64 as "f64" (default));

impl_class!(str as "str");
impl_class!(String as "String" (default));

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::ptr;

    use crate::interface::Constructible;
    use crate::{AnyValue, Class, Type, class_of};

    #[test]
    fn void() {
        let void = Class::of::<()>();
        assert_eq!(void.name(), "()");
        assert!(void.has_name("void"));
        assert!(ptr::eq(Type::void().class(), void));
    }

    #[test]
    fn names_match_rust_spelling() {
        assert_eq!(Class::of::<u64>().name(), "u64");
        assert_eq!(Class::of::<String>().name(), "String");
        assert_eq!(Class::of::<str>().type_path(), "str");
        assert!(ptr::eq(class_of::<&'static str>(), Class::of::<str>()));
    }

    #[test]
    fn defaults() {
        for class in [Class::of::<bool>(), Class::of::<f64>(), Class::of::<char>()] {
            let ctor = class.get_interface::<Constructible>().unwrap();
            assert!(ptr::eq(ctor.product().class(), class));
        }
        let zero: AnyValue = Class::of::<u128>()
            .get_interface::<Constructible>()
            .unwrap()
            .instantiate(());
        assert_eq!(*zero.get::<u128>(), 0);
    }

    #[test]
    fn string_slices_are_shared_references() {
        let value = AnyValue::new("text");
        assert!(value.ty().is_lvalue_reference());
        assert!(value.ty().is_const());
        assert_eq!(*value.get::<&str>(), "text");
        assert!(value.downcast_ref::<String>().is_none());
    }
}

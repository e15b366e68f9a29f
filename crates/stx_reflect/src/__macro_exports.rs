//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::class::Class;

    /// A class to seal during [`auto_register`](crate::class::auto_register).
    pub struct ClassRegistration(pub fn() -> &'static Class);

    inventory::collect!(ClassRegistration);

    /// Sealed only when collection works on this platform.
    pub struct AvailFlag;

    impl crate::class::ClassDeclaration for AvailFlag {
        const NAME: &'static str = "stx_reflect::AvailFlag";
    }

    inventory::submit! { ClassRegistration(Class::of::<AvailFlag>) }
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_class {
    ($ty:ty) => {
        $crate::__macro_exports::auto_register::inventory::submit! {
            $crate::__macro_exports::auto_register::ClassRegistration(
                <$crate::class::Class>::of::<$ty>
            )
        }
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit_class {
    ($ty:ty) => {};
}

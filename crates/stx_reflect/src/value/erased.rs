use core::any::Any;
use core::fmt;

use crate::ty::{Type, TypeShape};

// -----------------------------------------------------------------------------
// ErasedRef

/// A shared borrow of a value whose [`Type`] is known at runtime.
#[derive(Clone, Copy)]
pub struct ErasedRef<'a> {
    value: &'a dyn Any,
    ty: &'static Type,
}

impl<'a> ErasedRef<'a> {
    /// Borrows `value`.
    #[inline]
    pub fn new<T: TypeShape + 'static>(value: &'a T) -> Self {
        Self {
            value,
            ty: Type::of::<T>(),
        }
    }

    #[inline(always)]
    pub(crate) const fn from_parts(value: &'a dyn Any, ty: &'static Type) -> Self {
        Self { value, ty }
    }

    /// The descriptor of the borrowed value.
    #[inline(always)]
    pub const fn ty(&self) -> &'static Type {
        self.ty
    }

    /// Views the value as a `T`.
    ///
    /// Succeeds if the value's type is convertible to `T`: either it is a
    /// `T`, or both are plain and `T` is a base class of the value's class.
    /// A `*const Derived` converts to `*const Base` but holds no such
    /// pointer, so that view is `None`.
    pub fn downcast_ref<T: TypeShape + 'static>(self) -> Option<&'a T> {
        let target = Type::of::<T>();
        if !self.ty.is_convertible_to(target) {
            return None;
        }
        if let Some(value) = self.value.downcast_ref::<T>() {
            return Some(value);
        }
        if !(self.ty.is_plain() && target.is_plain()) {
            return None;
        }
        self.ty
            .class()
            .upcast_ref(self.value, target.class_id())?
            .downcast_ref::<T>()
    }
}

impl fmt::Debug for ErasedRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErasedRef").field(self.ty).finish()
    }
}

// -----------------------------------------------------------------------------
// ErasedMut

/// An exclusive borrow of a value whose [`Type`] is known at runtime.
pub struct ErasedMut<'a> {
    value: &'a mut dyn Any,
    ty: &'static Type,
}

impl<'a> ErasedMut<'a> {
    /// Borrows `value`.
    #[inline]
    pub fn new<T: TypeShape + 'static>(value: &'a mut T) -> Self {
        Self {
            value,
            ty: Type::of::<T>(),
        }
    }

    #[inline(always)]
    pub(crate) const fn from_parts(value: &'a mut dyn Any, ty: &'static Type) -> Self {
        Self { value, ty }
    }

    /// The descriptor of the borrowed value.
    #[inline(always)]
    pub const fn ty(&self) -> &'static Type {
        self.ty
    }

    /// A shorter exclusive borrow of the same value.
    #[inline]
    pub fn reborrow(&mut self) -> ErasedMut<'_> {
        ErasedMut {
            value: &mut *self.value,
            ty: self.ty,
        }
    }

    /// A shared borrow of the same value.
    #[inline]
    pub fn as_shared(&self) -> ErasedRef<'_> {
        ErasedRef {
            value: &*self.value,
            ty: self.ty,
        }
    }

    /// Mutable counterpart of [`ErasedRef::downcast_ref`].
    pub fn downcast_mut<T: TypeShape + 'static>(self) -> Option<&'a mut T> {
        let target = Type::of::<T>();
        if !self.ty.is_convertible_to(target) {
            return None;
        }
        if self.value.is::<T>() {
            return self.value.downcast_mut::<T>();
        }
        if !(self.ty.is_plain() && target.is_plain()) {
            return None;
        }
        self.ty
            .class()
            .upcast_mut(self.value, target.class_id())?
            .downcast_mut::<T>()
    }
}

impl fmt::Debug for ErasedMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErasedMut").field(self.ty).finish()
    }
}

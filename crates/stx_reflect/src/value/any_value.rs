use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::ty::{Type, TypeShape};
use crate::value::{ErasedMut, ErasedRef};

// -----------------------------------------------------------------------------
// Payload

/// The object-safe face of a stored value.
trait Payload: Any {
    fn clone_payload(&self) -> Box<dyn Payload>;

    fn ty(&self) -> &'static Type;

    fn type_name(&self) -> &'static str;

    /// Moves the value into `slot` if `slot` is an `Option<Self>`,
    /// otherwise hands the payload back.
    fn move_into(self: Box<Self>, slot: &mut dyn Any) -> Option<Box<dyn Payload>>;
}

impl<V: Clone + TypeShape + 'static> Payload for V {
    #[inline]
    fn clone_payload(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    #[inline]
    fn ty(&self) -> &'static Type {
        Type::of::<V>()
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<V>()
    }

    fn move_into(self: Box<Self>, slot: &mut dyn Any) -> Option<Box<dyn Payload>> {
        match slot.downcast_mut::<Option<V>>() {
            Some(slot) => {
                *slot = Some(*self);
                None
            }
            None => Some(self),
        }
    }
}

// -----------------------------------------------------------------------------
// AnyValue

/// An owned value of any describable type, or nothing.
///
/// Any `Clone + TypeShape + 'static` type can be stored, including raw
/// pointers, so `AnyValue` is neither `Send` nor `Sync`. Cloning an
/// `AnyValue` clones the stored value; moving one (for example with
/// [`core::mem::take`]) leaves nothing behind.
///
/// Extraction follows [`Type::is_convertible_to`]: a stored `Square` can be
/// read as a `Shape` if `Square` declares `Shape` as a base class.
///
/// # Examples
///
/// ```
/// use stx_reflect::{AnyValue, Type};
///
/// let mut value = AnyValue::new(String::from("hello"));
/// assert!(value.has_value());
/// assert_eq!(value.ty(), Type::of::<String>());
///
/// value.downcast_mut::<String>().unwrap().push('!');
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "hello!");
/// assert!(value.downcast_ref::<i32>().is_none());
///
/// let copy = value.clone();
/// value.reset();
/// assert!(!value.has_value());
/// assert!(value.ty().is_void());
///
/// assert_eq!(copy.take::<String>().unwrap(), "hello!");
/// ```
#[derive(Default)]
pub struct AnyValue(Option<Box<dyn Payload>>);

impl AnyValue {
    /// An `AnyValue` holding nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Stores `value`.
    #[inline]
    pub fn new<V: Clone + TypeShape + 'static>(value: V) -> Self {
        Self(Some(Box::new(value)))
    }

    /// Replaces the content with the result of `init` and returns it.
    ///
    /// The previous content is dropped before `init` runs.
    pub fn emplace<V, F>(&mut self, init: F) -> &mut V
    where
        V: Clone + TypeShape + 'static,
        F: FnOnce() -> V,
    {
        self.0 = None;
        let payload: &mut dyn Payload = &mut **self.0.insert(Box::new(init()));
        let any: &mut dyn Any = payload;
        match any.downcast_mut::<V>() {
            Some(value) => value,
            None => unreachable!("payload was just stored as `{}`", core::any::type_name::<V>()),
        }
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    /// Drops the content.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = None;
    }

    /// The descriptor of the content, or [`Type::void`] when empty.
    #[inline]
    pub fn ty(&self) -> &'static Type {
        match &self.0 {
            Some(payload) => payload.ty(),
            None => Type::void(),
        }
    }

    /// The [`TypeId`] of the content, or of `()` when empty.
    pub fn value_type_id(&self) -> TypeId {
        match self.0.as_deref() {
            Some(payload) => {
                let any: &dyn Any = payload;
                any.type_id()
            }
            None => TypeId::of::<()>(),
        }
    }

    /// The Rust name of the content type, or `"()"` when empty.
    pub fn type_name(&self) -> &'static str {
        match &self.0 {
            Some(payload) => payload.type_name(),
            None => core::any::type_name::<()>(),
        }
    }

    /// Returns `true` if the content is exactly a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.has_value() && self.value_type_id() == TypeId::of::<T>()
    }

    /// Borrows the content.
    pub fn as_erased(&self) -> Option<ErasedRef<'_>> {
        let payload = self.0.as_deref()?;
        let ty = payload.ty();
        Some(ErasedRef::from_parts(payload, ty))
    }

    /// Borrows the content mutably.
    pub fn as_erased_mut(&mut self) -> Option<ErasedMut<'_>> {
        let payload = self.0.as_deref_mut()?;
        let ty = payload.ty();
        Some(ErasedMut::from_parts(payload, ty))
    }

    /// Views the content as a `T`. See [`ErasedRef::downcast_ref`].
    #[inline]
    pub fn downcast_ref<T: TypeShape + 'static>(&self) -> Option<&T> {
        self.as_erased()?.downcast_ref::<T>()
    }

    /// Views the content as a mutable `T`. See [`ErasedMut::downcast_mut`].
    #[inline]
    pub fn downcast_mut<T: TypeShape + 'static>(&mut self) -> Option<&mut T> {
        self.as_erased_mut()?.downcast_mut::<T>()
    }

    /// Like [`AnyValue::downcast_ref`], for callers that know the type.
    ///
    /// # Panics
    ///
    /// Panics if the content is not convertible to `T`.
    #[track_caller]
    pub fn get<T: TypeShape + 'static>(&self) -> &T {
        match self.downcast_ref::<T>() {
            Some(value) => value,
            None => panic!(
                "`AnyValue` holding `{}` cannot be viewed as `{}`",
                self.ty(),
                Type::of::<T>(),
            ),
        }
    }

    /// Like [`AnyValue::downcast_mut`], for callers that know the type.
    ///
    /// # Panics
    ///
    /// Panics if the content is not convertible to `T`.
    #[track_caller]
    pub fn get_mut<T: TypeShape + 'static>(&mut self) -> &mut T {
        let ty = self.ty();
        match self.downcast_mut::<T>() {
            Some(value) => value,
            None => panic!(
                "`AnyValue` holding `{ty}` cannot be viewed as `{}`",
                Type::of::<T>(),
            ),
        }
    }

    /// Extracts the content as a `T`.
    ///
    /// The content is moved out if it is exactly a `T`, and cloned from
    /// its base part if `T` is a base class. Returns `self` unchanged if
    /// the content is not convertible to `T`.
    pub fn take<T: Clone + TypeShape + 'static>(self) -> Result<T, Self> {
        if !self.ty().is_convertible_to(Type::of::<T>()) {
            return Err(self);
        }
        let Some(payload) = self.0 else {
            return Err(Self::empty());
        };

        let mut slot: Option<T> = None;
        let rest = payload.move_into(&mut slot);
        if let Some(value) = slot {
            return Ok(value);
        }

        let this = Self(rest);
        match this.downcast_ref::<T>() {
            Some(base) => Ok(base.clone()),
            None => Err(this),
        }
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self(self.0.as_ref().map(|payload| payload.clone_payload()))
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(payload) => f.debug_tuple("AnyValue").field(payload.ty()).finish(),
            None => f.write_str("AnyValue(<empty>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

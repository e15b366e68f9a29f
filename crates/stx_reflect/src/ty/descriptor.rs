use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr;
use std::sync::{PoisonError, RwLock};

use stx_utils::hash::{FixedHashState, HashMap};

use crate::class::Class;
use crate::ty::{Qualifiers, Reference, Shape, TypeShape};

// -----------------------------------------------------------------------------
// Interner

static TYPES: RwLock<HashMap<Shape, &'static Type>> =
    RwLock::new(HashMap::with_hasher(FixedHashState));

// -----------------------------------------------------------------------------
// Type

/// An interned, immutable description of a decorated type.
///
/// Obtain one with [`Type::of`] or [`Type::intern`]; both always return the
/// same reference for the same decoration, so `==` is identity.
///
/// # Examples
///
/// ```
/// use stx_reflect::Type;
///
/// let ty = Type::of::<&[*const u8; 4]>();
/// assert!(ty.is_lvalue_reference());
/// assert_eq!(ty.array_rank(), 1);
/// assert_eq!(ty.array_size(0), 4);
/// assert_eq!(ty.indirection_level(), 1);
/// assert_eq!(ty.to_string(), "&[*const u8; 4]");
///
/// assert!(core::ptr::eq(ty, Type::of::<&[*const u8; 4]>()));
/// ```
pub struct Type {
    shape: Shape,
}

impl Type {
    /// The descriptor of `T`.
    #[inline]
    pub fn of<T: TypeShape + ?Sized>() -> &'static Type {
        T::descriptor()
    }

    /// The descriptor of `()`, used for the absence of a value.
    #[inline]
    pub fn void() -> &'static Type {
        Self::of::<()>()
    }

    /// Returns the unique descriptor for `shape`, creating it if needed.
    pub fn intern(shape: Shape) -> &'static Type {
        if let Some(ty) = TYPES
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&shape)
            .copied()
        {
            return ty;
        }

        let mut types = TYPES.write().unwrap_or_else(PoisonError::into_inner);
        *types.entry(shape).or_insert_with_key(|shape| {
            crate::cfg::debug! {
                assert!(shape.is_consistent(), "inconsistent shape {shape:?}");
            }
            let ty: &'static Type = Box::leak(Box::new(Type {
                shape: shape.clone(),
            }));
            log::debug!("interned type descriptor `{ty}`");
            ty
        })
    }

    /// The shape this descriptor was interned from.
    #[inline(always)]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The sealed class of the undecorated type.
    #[inline]
    pub fn class(&self) -> &'static Class {
        self.shape.plain().class()
    }

    /// The [`TypeId`] of the undecorated type.
    #[inline]
    pub const fn class_id(&self) -> TypeId {
        self.shape.plain().id()
    }

    /// The default name of the undecorated class.
    #[inline]
    pub const fn class_name(&self) -> &'static str {
        self.shape.plain().name()
    }

    /// Returns `true` for the descriptor of `()`.
    #[inline]
    pub fn is_void(&self) -> bool {
        ptr::eq(self, Self::void())
    }

    /// No pointer levels, reference or extents.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.shape.level() == 0 && !self.is_reference() && !self.is_array()
    }

    /// Number of pointer levels.
    #[inline]
    pub const fn indirection_level(&self) -> usize {
        self.shape.level()
    }

    #[inline]
    pub const fn is_pointer(&self) -> bool {
        self.shape.level() > 0
    }

    /// Qualifiers of the outermost position.
    ///
    /// For references that is the referenced position.
    #[inline]
    pub fn qualifiers(&self) -> Qualifiers {
        self.shape.qualifiers_at(self.shape.level())
    }

    /// Qualifiers of `position`, `0` being the innermost pointee.
    #[inline]
    pub fn qualifiers_at(&self, position: usize) -> Qualifiers {
        self.shape.qualifiers_at(position)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.qualifiers().contains(Qualifiers::CONST)
    }

    #[inline]
    pub fn is_volatile(&self) -> bool {
        self.qualifiers().contains(Qualifiers::VOLATILE)
    }

    #[inline]
    pub const fn reference(&self) -> Reference {
        self.shape.reference()
    }

    #[inline]
    pub const fn is_reference(&self) -> bool {
        self.shape.reference().is_some()
    }

    #[inline]
    pub const fn is_lvalue_reference(&self) -> bool {
        matches!(self.shape.reference(), Reference::LValue)
    }

    #[inline]
    pub const fn is_rvalue_reference(&self) -> bool {
        matches!(self.shape.reference(), Reference::RValue)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        !self.shape.extents().is_empty()
    }

    /// Number of array dimensions.
    #[inline]
    pub fn array_rank(&self) -> usize {
        self.shape.extents().len()
    }

    /// Extent of dimension `dim`, `0` being the outermost.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= self.array_rank()`.
    #[inline]
    pub fn array_size(&self, dim: usize) -> usize {
        self.shape.extents()[dim]
    }

    /// All extents, outermost dimension first.
    #[inline]
    pub fn extents(&self) -> &[usize] {
        self.shape.extents()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self, state);
    }
}

impl fmt::Display for Type {
    /// Renders Rust-like syntax. Lowered borrows print as raw pointers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = &self.shape;
        let level = shape.level();
        let top = shape.qualifiers_at(level);

        if self.is_reference() {
            write!(f, "{}", shape.reference())?;
            if !top.contains(Qualifiers::CONST) {
                f.write_str("mut ")?;
            }
            if top.contains(Qualifiers::VOLATILE) {
                f.write_str("volatile ")?;
            }
        } else {
            if top.contains(Qualifiers::CONST) {
                f.write_str("const ")?;
            }
            if top.contains(Qualifiers::VOLATILE) {
                f.write_str("volatile ")?;
            }
        }

        for _ in shape.extents() {
            f.write_str("[")?;
        }
        for position in (0..level).rev() {
            let pointee = shape.qualifiers_at(position);
            if pointee.contains(Qualifiers::CONST) {
                f.write_str("*const ")?;
            } else {
                f.write_str("*mut ")?;
            }
            if pointee.contains(Qualifiers::VOLATILE) {
                f.write_str("volatile ")?;
            }
        }
        f.write_str(self.class_name())?;
        for len in shape.extents().iter().rev() {
            write!(f, "; {len}]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use std::thread;

    use super::*;

    #[test]
    fn one_descriptor_per_decoration() {
        assert!(ptr::eq(Type::of::<*const i32>(), Type::of::<*const i32>()));
        assert!(ptr::eq(
            Type::of::<*const i32>(),
            Type::intern(Shape::new::<i32>().const_pointer())
        ));
        assert_ne!(Type::of::<*const i32>(), Type::of::<*mut i32>());
        assert_ne!(Type::of::<i32>(), Type::of::<u32>());
    }

    #[test]
    fn concurrent_first_use_agrees() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| Type::of::<[[*const u16; 3]; 5]>() as *const Type as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn attribute_queries() {
        let ty = Type::of::<*mut *const u8>();
        assert!(ty.is_pointer());
        assert_eq!(ty.indirection_level(), 2);
        assert!(!ty.is_const());
        assert!(ty.qualifiers_at(0).contains(Qualifiers::CONST));
        assert!(!ty.is_reference());
        assert!(!ty.is_plain());

        let ty = Type::of::<&u8>();
        assert!(ty.is_lvalue_reference());
        assert!(!ty.is_rvalue_reference());
        assert!(ty.is_const());
        assert!(!ty.is_pointer());

        let ty = Type::of::<[[u8; 3]; 2]>();
        assert_eq!(ty.array_rank(), 2);
        assert_eq!(ty.array_size(0), 2);
        assert_eq!(ty.array_size(1), 3);

        assert!(Type::of::<u8>().is_plain());
        assert!(Type::void().is_void());
        assert!(!Type::of::<u8>().is_void());
    }

    #[test]
    fn classes_are_shared_across_decorations() {
        assert!(ptr::eq(Type::of::<u8>().class(), Type::of::<&[*mut u8; 2]>().class()));
        assert_eq!(Type::of::<&mut u8>().class_id(), TypeId::of::<u8>());
    }

    #[test]
    fn display() {
        assert_eq!(Type::of::<i32>().to_string(), "i32");
        assert_eq!(Type::of::<*mut *const i32>().to_string(), "*mut *const i32");
        assert_eq!(Type::of::<&mut [u8; 2]>().to_string(), "&mut [u8; 2]");
        assert_eq!(Type::of::<[[u8; 3]; 2]>().to_string(), "[[u8; 3]; 2]");
        assert_eq!(Type::of::<*const &u8>().to_string(), "*const *const u8");

        let shape = Shape::new::<u8>().volatile().pointer().rvalue_ref();
        assert_eq!(Type::intern(shape).to_string(), "&&mut *mut volatile u8");
    }
}

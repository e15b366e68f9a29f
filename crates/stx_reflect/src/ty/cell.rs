//! Static storage for descriptors.
//!
//! [`Type::intern`] hashes a whole [`Shape`] under a global lock. The cells
//! here let [`TypeShape::descriptor`] skip that after the first call:
//!
//! - [`TypeCell`]: one descriptor per non-generic plain type, held in a
//!   [`OnceLock`]. Used by [`impl_type_shape!`](crate::impl_type_shape).
//! - [`decorate`]: descriptors of pointers, references and arrays, keyed by
//!   the descriptor they wrap and the decoration applied. A `TypeId` is not
//!   available there, since `&'a P` is not `'static`.

use core::ptr;
use std::sync::{OnceLock, PoisonError, RwLock};

use stx_utils::hash::{FixedHashState, HashMap};

use crate::ty::{Shape, Type, TypeShape};

// -----------------------------------------------------------------------------
// TypeCell

/// A lazily interned descriptor for one non-generic type.
///
/// # Examples
///
/// ```
/// use stx_reflect::ty::{Shape, TypeCell, TypeShape};
/// use stx_reflect::{ClassDeclaration, Type};
///
/// struct Gauge;
///
/// impl ClassDeclaration for Gauge {
///     const NAME: &'static str = "Gauge";
/// }
///
/// impl TypeShape for Gauge {
///     type Plain = Self;
///
///     fn shape() -> Shape {
///         Shape::new::<Self>()
///     }
///
///     fn descriptor() -> &'static Type {
///         static CELL: TypeCell = TypeCell::new();
///         CELL.get_or_intern::<Self>()
///     }
/// }
///
/// assert!(core::ptr::eq(Type::of::<Gauge>(), Type::intern(Shape::new::<Gauge>())));
/// ```
pub struct TypeCell(OnceLock<&'static Type>);

impl TypeCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// The descriptor of `T`, interned on first call.
    ///
    /// A cell must only ever be used with one `T`.
    #[inline]
    pub fn get_or_intern<T: TypeShape + ?Sized>(&self) -> &'static Type {
        self.0.get_or_init(|| Type::intern(T::shape()))
    }
}

impl Default for TypeCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Decorations

/// One decoration applied on top of an existing descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Decoration {
    ConstPointer,
    Pointer,
    SharedRef,
    MutRef,
    Array(usize),
}

impl Decoration {
    fn apply(self, shape: Shape) -> Shape {
        match self {
            Decoration::ConstPointer => shape.const_pointer(),
            Decoration::Pointer => shape.pointer(),
            Decoration::SharedRef => shape.shared_ref(),
            Decoration::MutRef => shape.mut_ref(),
            Decoration::Array(len) => shape.array(len),
        }
    }
}

static DECORATED: RwLock<HashMap<(usize, Decoration), &'static Type>> =
    RwLock::new(HashMap::with_hasher(FixedHashState));

/// The descriptor of `inner` wrapped in `decoration`.
pub(crate) fn decorate(inner: &'static Type, decoration: Decoration) -> &'static Type {
    let key = (ptr::from_ref(inner).addr(), decoration);
    if let Some(ty) = DECORATED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied()
    {
        return ty;
    }

    let ty = Type::intern(decoration.apply(inner.shape().clone()));
    DECORATED
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, ty);
    ty
}

// -----------------------------------------------------------------------------
// Tests

use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::class::{Class, ClassDeclaration};
use crate::error::{InvariantError, invariant_violation};
use crate::ty::{Qualifiers, Reference, Type};

/// The deepest pointer nesting a [`Shape`] can record.
///
/// Qualifier masks have one bit per position, and a shape of level `n`
/// has `n + 1` positions.
pub const MAX_INDIRECTION: usize = 31;

// -----------------------------------------------------------------------------
// PlainType

/// The undecorated class at the bottom of a [`Shape`].
///
/// Holds the class lazily, so describing `*const T` inside the declaration
/// of `T` does not recurse into `T`'s own class construction.
#[derive(Clone, Copy)]
pub struct PlainType {
    id: TypeId,
    name: &'static str,
    class: fn() -> &'static Class,
}

impl PlainType {
    /// The plain type of class `T`.
    #[inline]
    pub fn of<T: ClassDeclaration + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            class: Class::of::<T>,
        }
    }

    /// The [`TypeId`] of the class type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The default name of the class, available without sealing it.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The sealed class. Constructs it on first use.
    #[inline]
    pub fn class(&self) -> &'static Class {
        (self.class)()
    }
}

impl PartialEq for PlainType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlainType {}

impl Hash for PlainType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PlainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// A Rust type with a [`Shape`].
///
/// Plain classes get their implementation from [`impl_type_shape!`] or
/// [`impl_class!`]. Raw pointers, references and arrays over a `TypeShape`
/// are implemented here.
///
/// [`impl_type_shape!`]: crate::impl_type_shape
/// [`impl_class!`]: crate::impl_class
pub trait TypeShape {
    /// The class with every decoration stripped.
    type Plain: ClassDeclaration + ?Sized;

    /// Describes `Self` as a decorated [`Self::Plain`].
    fn shape() -> Shape;

    /// The interned descriptor of `Self`.
    ///
    /// The default interns [`Self::shape`] on every call. Implementations
    /// from [`impl_type_shape!`] and the decorated types cache it.
    #[inline]
    fn descriptor() -> &'static Type {
        Type::intern(Self::shape())
    }
}

// -----------------------------------------------------------------------------
// Shape

/// The uninterned form of a [`Type`](crate::Type).
///
/// Every builder method wraps the current shape in one more decoration.
/// A reference below a new decoration is lowered to one pointer level.
///
/// # Panics
///
/// Adding a pointer level on top of an array extent, or exceeding
/// [`MAX_INDIRECTION`], is an [invariant violation](invariant_violation).
///
/// # Examples
///
/// ```
/// use stx_reflect::Type;
/// use stx_reflect::ty::Shape;
///
/// let shape = Shape::new::<i32>().const_pointer().pointer();
/// assert_eq!(Type::intern(shape), Type::of::<*mut *const i32>());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    plain: PlainType,
    level: u8,
    const_mask: u32,
    volatile_mask: u32,
    reference: Reference,
    extents: Vec<usize>,
}

impl Shape {
    /// The undecorated class `T`.
    #[inline]
    pub fn new<T: ClassDeclaration + ?Sized>() -> Self {
        Self::from_plain(PlainType::of::<T>())
    }

    /// The undecorated class of `plain`.
    #[inline]
    pub const fn from_plain(plain: PlainType) -> Self {
        Self {
            plain,
            level: 0,
            const_mask: 0,
            volatile_mask: 0,
            reference: Reference::None,
            extents: Vec::new(),
        }
    }

    /// Adds `qualifiers` to the outermost position.
    ///
    /// On a reference this qualifies the referenced position.
    #[must_use]
    pub fn qualify(mut self, qualifiers: Qualifiers) -> Self {
        let bit = 1u32 << self.level;
        if qualifiers.contains(Qualifiers::CONST) {
            self.const_mask |= bit;
        }
        if qualifiers.contains(Qualifiers::VOLATILE) {
            self.volatile_mask |= bit;
        }
        self
    }

    /// Makes the outermost position const.
    #[inline]
    #[must_use]
    pub fn constant(self) -> Self {
        self.qualify(Qualifiers::CONST)
    }

    /// Makes the outermost position volatile.
    #[inline]
    #[must_use]
    pub fn volatile(self) -> Self {
        self.qualify(Qualifiers::VOLATILE)
    }

    /// A pointer to `self` whose pointee carries `qualifiers`.
    #[must_use]
    pub fn pointer_to(self, qualifiers: Qualifiers) -> Self {
        let mut this = self.lowered().qualify(qualifiers);
        this.push_level();
        this
    }

    /// `*mut Self`.
    #[inline]
    #[must_use]
    pub fn pointer(self) -> Self {
        self.pointer_to(Qualifiers::empty())
    }

    /// `*const Self`.
    #[inline]
    #[must_use]
    pub fn const_pointer(self) -> Self {
        self.pointer_to(Qualifiers::CONST)
    }

    /// `&mut Self`: an lvalue reference.
    #[must_use]
    pub fn mut_ref(self) -> Self {
        let mut this = self.lowered();
        this.reference = Reference::LValue;
        this
    }

    /// `&Self`: an lvalue reference to a const position.
    #[inline]
    #[must_use]
    pub fn shared_ref(self) -> Self {
        self.mut_ref().constant()
    }

    /// An rvalue reference to `self`.
    #[must_use]
    pub fn rvalue_ref(self) -> Self {
        let mut this = self.lowered();
        this.reference = Reference::RValue;
        this
    }

    /// `[Self; len]`. The new extent becomes the outermost dimension.
    #[must_use]
    pub fn array(self, len: usize) -> Self {
        let mut this = self.lowered();
        this.extents.insert(0, len);
        this
    }

    /// Replaces a reference by one pointer level.
    fn lowered(mut self) -> Self {
        if self.reference.is_some() {
            self.reference = Reference::None;
            self.push_level();
        }
        self
    }

    fn push_level(&mut self) {
        if !self.extents.is_empty() {
            invariant_violation(InvariantError::PointerToArray {
                class: self.plain.name(),
                rank: self.extents.len(),
            });
        }
        if usize::from(self.level) >= MAX_INDIRECTION {
            invariant_violation(InvariantError::IndirectionOverflow {
                class: self.plain.name(),
                max: MAX_INDIRECTION,
            });
        }
        self.level += 1;
    }

    /// The undecorated class.
    #[inline(always)]
    pub const fn plain(&self) -> PlainType {
        self.plain
    }

    /// Number of pointer levels.
    #[inline(always)]
    pub const fn level(&self) -> usize {
        self.level as usize
    }

    /// Const bits, one per position, bit `0` innermost.
    #[inline(always)]
    pub const fn const_mask(&self) -> u32 {
        self.const_mask
    }

    /// Volatile bits, one per position, bit `0` innermost.
    #[inline(always)]
    pub const fn volatile_mask(&self) -> u32 {
        self.volatile_mask
    }

    /// Qualifiers of `position`. Positions past the outermost are unqualified.
    pub fn qualifiers_at(&self, position: usize) -> Qualifiers {
        let mut qualifiers = Qualifiers::empty();
        if position > self.level() {
            return qualifiers;
        }
        if self.const_mask & (1 << position) != 0 {
            qualifiers |= Qualifiers::CONST;
        }
        if self.volatile_mask & (1 << position) != 0 {
            qualifiers |= Qualifiers::VOLATILE;
        }
        qualifiers
    }

    #[inline(always)]
    pub const fn reference(&self) -> Reference {
        self.reference
    }

    /// Array extents, outermost dimension first.
    #[inline(always)]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// No qualifier bit lies past the outermost position.
    pub(crate) fn is_consistent(&self) -> bool {
        let positions = (1u64 << (self.level + 1)) - 1;
        u64::from(self.const_mask | self.volatile_mask) & !positions == 0
            && self.level() <= MAX_INDIRECTION
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("plain", &self.plain)
            .field("level", &self.level)
            .field("const_mask", &format_args!("{:#b}", self.const_mask))
            .field("volatile_mask", &format_args!("{:#b}", self.volatile_mask))
            .field("reference", &self.reference)
            .field("extents", &self.extents)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_levels_and_positions() {
        let shape = Shape::new::<u8>().const_pointer().pointer();
        assert_eq!(shape.level(), 2);
        assert_eq!(shape.qualifiers_at(0), Qualifiers::CONST);
        assert_eq!(shape.qualifiers_at(1), Qualifiers::empty());
        assert_eq!(shape.qualifiers_at(2), Qualifiers::empty());
        assert!(shape.is_consistent());
    }

    #[test]
    fn nested_borrow_becomes_pointer_level() {
        // `*const &u8`
        let shape = Shape::new::<u8>().shared_ref().const_pointer();
        assert_eq!(shape.reference(), Reference::None);
        assert_eq!(shape.level(), 2);
        assert_eq!(shape.const_mask(), 0b11);
    }

    #[test]
    fn array_extents_are_outermost_first() {
        // `[[u8; 3]; 2]`
        let shape = Shape::new::<u8>().array(3).array(2);
        assert_eq!(shape.extents(), &[2, 3]);
        assert_eq!(shape.level(), 0);
    }

    #[test]
    fn volatile_only_through_builder() {
        let shape = Shape::new::<u8>().volatile().pointer().rvalue_ref();
        assert_eq!(shape.reference(), Reference::RValue);
        assert_eq!(shape.qualifiers_at(0), Qualifiers::VOLATILE);
    }

    #[test]
    #[should_panic(expected = "pointer to a rank-1 array")]
    fn pointer_to_array_is_rejected() {
        let _ = Shape::new::<u8>().array(4).pointer();
    }

    #[test]
    #[should_panic(expected = "levels of indirection")]
    fn indirection_overflow_is_rejected() {
        let mut shape = Shape::new::<u8>();
        for _ in 0..=MAX_INDIRECTION {
            shape = shape.pointer();
        }
    }
}

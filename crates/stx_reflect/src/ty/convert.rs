use core::ptr;

use crate::ty::{Shape, Type};

impl Type {
    /// Returns `true` if a value described by `self` may be viewed as a
    /// value described by `target`.
    ///
    /// A reference counts as one more level of indirection: the referenced
    /// position is the outermost pointee. The rules:
    ///
    /// 1. Reference kind, array extents and pointer levels must be equal.
    /// 2. At every pointee position, `target` carries at least the
    ///    qualifiers of `self`.
    /// 3. If `target` adds a qualifier at some pointee position, every
    ///    position above it, up to and including the outermost pointee,
    ///    must be const in `target`.
    /// 4. Qualifiers of a non-reference outermost value are ignored, since
    ///    the value is copied.
    /// 5. With at most one level of indirection and no array extents, the
    ///    class of `self` must be the class of `target` or derive from it.
    ///    Otherwise the classes must be identical.
    ///
    /// The relation is reflexive and requires no class to be sealed when
    /// rules 1 to 4 already decide it.
    ///
    /// # Examples
    ///
    /// ```
    /// use stx_reflect::Type;
    ///
    /// let mut_ptr = Type::of::<*mut u8>();
    /// let const_ptr = Type::of::<*const u8>();
    ///
    /// assert!(mut_ptr.is_convertible_to(const_ptr));
    /// assert!(!const_ptr.is_convertible_to(mut_ptr));
    ///
    /// assert!(Type::of::<*mut *mut u8>().is_convertible_to(Type::of::<*const *const u8>()));
    /// assert!(!Type::of::<*mut *mut u8>().is_convertible_to(Type::of::<*mut *const u8>()));
    /// assert!(!Type::of::<&mut *mut u8>().is_convertible_to(Type::of::<&mut *const u8>()));
    /// ```
    pub fn is_convertible_to(&self, target: &Type) -> bool {
        if ptr::eq(self, target) {
            return true;
        }

        let (from, to) = (self.shape(), target.shape());
        if from.reference() != to.reference()
            || from.extents() != to.extents()
            || from.level() != to.level()
        {
            return false;
        }

        let depth = from.level() + usize::from(from.reference().is_some());
        if !pointee_qualifiers_convert(from, to, depth) {
            return false;
        }

        if depth <= 1 && from.extents().is_empty() {
            self.class_id() == target.class_id() || self.class().is_a(target.class())
        } else {
            self.class_id() == target.class_id()
        }
    }
}

/// Checks rules 2 and 3 over the `depth` innermost positions.
fn pointee_qualifiers_convert(from: &Shape, to: &Shape, depth: usize) -> bool {
    let pointees = match depth {
        0 => 0,
        depth => u32::MAX >> (32 - depth),
    };

    let lost = (from.const_mask() & !to.const_mask()) | (from.volatile_mask() & !to.volatile_mask());
    if lost & pointees != 0 {
        return false;
    }

    let added = ((to.const_mask() & !from.const_mask())
        | (to.volatile_mask() & !from.volatile_mask()))
        & pointees;
    if added == 0 {
        return true;
    }

    // Positions strictly above the innermost addition.
    let lowest = added.trailing_zeros();
    let above = pointees & u32::MAX.checked_shl(lowest + 1).unwrap_or(0);
    to.const_mask() & above == above
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::ty::Shape;
    use crate::{ClassBuilder, ClassDeclaration, Type, impl_type_shape, impl_upcast};

    #[derive(Clone)]
    struct Shape2d;

    #[derive(Clone)]
    struct Square {
        shape: Shape2d,
    }

    impl ClassDeclaration for Shape2d {
        const NAME: &'static str = "convert::Shape2d";
    }

    impl ClassDeclaration for Square {
        const NAME: &'static str = "convert::Square";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class.add_base_class::<Shape2d>();
        }
    }

    impl_type_shape!(Shape2d);
    impl_type_shape!(Square);
    impl_upcast!(Square => Shape2d: shape);

    fn convertible<A: crate::TypeShape + ?Sized, B: crate::TypeShape + ?Sized>() -> bool {
        Type::of::<A>().is_convertible_to(Type::of::<B>())
    }

    #[test]
    fn reflexive() {
        assert!(convertible::<Square, Square>());
        assert!(convertible::<*const *mut Square, *const *mut Square>());
        assert!(convertible::<&[u8; 3], &[u8; 3]>());
    }

    #[test]
    fn shape_must_match() {
        assert!(!convertible::<u8, *mut u8>());
        assert!(!convertible::<*mut u8, *mut *mut u8>());
        assert!(!convertible::<[u8; 3], [u8; 4]>());
        assert!(!convertible::<[u8; 3], u8>());
        assert!(!convertible::<&mut u8, u8>());
        assert!(!convertible::<u8, &u8>());
    }

    #[test]
    fn qualifiers_may_only_be_added() {
        assert!(convertible::<*mut u8, *const u8>());
        assert!(!convertible::<*const u8, *mut u8>());
        assert!(convertible::<&mut u8, &u8>());
        assert!(!convertible::<&u8, &mut u8>());

        let volatile = Type::intern(Shape::new::<u8>().volatile().pointer());
        assert!(Type::of::<*mut u8>().is_convertible_to(volatile));
        assert!(!volatile.is_convertible_to(Type::of::<*mut u8>()));
    }

    #[test]
    fn multi_level_needs_const_above_addition() {
        assert!(convertible::<*mut *mut u8, *const *const u8>());
        assert!(convertible::<*mut *mut u8, *const *mut u8>());
        assert!(!convertible::<*mut *mut u8, *mut *const u8>());
        assert!(convertible::<*mut *mut *mut u8, *const *const *const u8>());
        assert!(!convertible::<*mut *mut *mut u8, *mut *const *const u8>());
    }

    #[test]
    fn top_level_value_qualifiers_are_ignored() {
        let const_value = Type::intern(Shape::new::<u8>().constant());
        assert!(const_value.is_convertible_to(Type::of::<u8>()));
        assert!(Type::of::<u8>().is_convertible_to(const_value));
    }

    #[test]
    fn derived_to_base() {
        assert!(convertible::<Square, Shape2d>());
        assert!(convertible::<*mut Square, *const Shape2d>());
        assert!(convertible::<&Square, &Shape2d>());
        assert!(!convertible::<Shape2d, Square>());
        assert!(!convertible::<*const Square, *mut Shape2d>());
    }

    #[test]
    fn no_upcast_below_two_levels() {
        assert!(!convertible::<*mut *mut Square, *mut *mut Shape2d>());
        assert!(!convertible::<*mut *mut Square, *const *const Shape2d>());
        assert!(convertible::<*mut *mut Square, *const *const Square>());
    }

    #[test]
    fn reference_is_one_more_level() {
        assert!(convertible::<&mut *mut u8, &*mut u8>());
        assert!(convertible::<&*mut u8, &*const u8>());
        assert!(!convertible::<&mut *mut u8, &mut *const u8>());

        assert!(convertible::<&mut *mut u8, &*const u8>());
        assert!(!convertible::<&mut *mut *mut u8, &*mut *const u8>());
        assert!(convertible::<&mut *mut *mut u8, &*const *const u8>());
    }

    #[test]
    fn no_upcast_through_a_referenced_pointer() {
        assert!(convertible::<&mut Square, &mut Shape2d>());
        assert!(!convertible::<&mut *mut Square, &mut *mut Shape2d>());
        assert!(!convertible::<&*const Square, &*const Shape2d>());
        assert!(convertible::<&mut *mut Square, &*const Square>());
    }

    #[test]
    fn no_upcast_of_array_elements() {
        assert!(!convertible::<[Square; 2], [Shape2d; 2]>());
        assert!(!convertible::<&[Square; 2], &[Shape2d; 2]>());
        assert!(convertible::<&mut [Square; 2], &[Square; 2]>());
    }

    #[test]
    fn unrelated_classes() {
        assert!(!convertible::<u8, i8>());
        assert!(!convertible::<&u32, &Shape2d>());
    }
}

use crate::ty::cell::{Decoration, decorate};
use crate::ty::{Shape, Type, TypeShape};

impl<P: TypeShape + ?Sized> TypeShape for *const P {
    type Plain = P::Plain;

    #[inline]
    fn shape() -> Shape {
        P::shape().const_pointer()
    }

    #[inline]
    fn descriptor() -> &'static Type {
        decorate(P::descriptor(), Decoration::ConstPointer)
    }
}

impl<P: TypeShape + ?Sized> TypeShape for *mut P {
    type Plain = P::Plain;

    #[inline]
    fn shape() -> Shape {
        P::shape().pointer()
    }

    #[inline]
    fn descriptor() -> &'static Type {
        decorate(P::descriptor(), Decoration::Pointer)
    }
}

impl<P: TypeShape + ?Sized> TypeShape for &P {
    type Plain = P::Plain;

    #[inline]
    fn shape() -> Shape {
        P::shape().shared_ref()
    }

    #[inline]
    fn descriptor() -> &'static Type {
        decorate(P::descriptor(), Decoration::SharedRef)
    }
}

impl<P: TypeShape + ?Sized> TypeShape for &mut P {
    type Plain = P::Plain;

    #[inline]
    fn shape() -> Shape {
        P::shape().mut_ref()
    }

    #[inline]
    fn descriptor() -> &'static Type {
        decorate(P::descriptor(), Decoration::MutRef)
    }
}

impl<P: TypeShape, const N: usize> TypeShape for [P; N] {
    type Plain = P::Plain;

    #[inline]
    fn shape() -> Shape {
        P::shape().array(N)
    }

    #[inline]
    fn descriptor() -> &'static Type {
        decorate(P::descriptor(), Decoration::Array(N))
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use crate::ty::{Qualifiers, Reference, Shape, TypeShape};

    fn plain_of<T: TypeShape + ?Sized>() -> TypeId {
        TypeId::of::<T::Plain>()
    }

    #[test]
    fn plain_is_stripped() {
        assert_eq!(plain_of::<*const &mut [u16; 2]>(), TypeId::of::<u16>());
        assert_eq!(plain_of::<&str>(), TypeId::of::<str>());
    }

    #[test]
    fn rust_spellings() {
        assert_eq!(<*const u8>::shape(), Shape::new::<u8>().const_pointer());
        assert_eq!(<&mut u8>::shape().reference(), Reference::LValue);
        assert_eq!(<&u8>::shape().qualifiers_at(0), Qualifiers::CONST);
        assert_eq!(<[&u8; 2]>::shape(), Shape::new::<u8>().constant().pointer().array(2));
    }
}

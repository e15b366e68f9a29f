use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::ty::{Type, TypeShape};
use crate::value::{AnyValue, ErasedRef};

trait EnumTable: Send + Sync {
    fn len(&self) -> usize;

    fn name(&self, index: usize) -> Option<&'static str>;

    fn value(&self, index: usize) -> Option<AnyValue>;

    fn position_of(&self, value: ErasedRef<'_>) -> Option<usize>;
}

struct Table<T>(Vec<(&'static str, T)>);

impl<T> EnumTable for Table<T>
where
    T: PartialEq + Clone + TypeShape + Send + Sync + 'static,
{
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn name(&self, index: usize) -> Option<&'static str> {
        self.0.get(index).map(|(name, _)| *name)
    }

    #[inline]
    fn value(&self, index: usize) -> Option<AnyValue> {
        self.0.get(index).map(|(_, value)| AnyValue::new(value.clone()))
    }

    fn position_of(&self, value: ErasedRef<'_>) -> Option<usize> {
        let value = value.downcast_ref::<T>()?;
        self.0.iter().position(|(_, v)| v == value)
    }
}

/// An ordered table of named values of one type.
///
/// Usually attached to the class of a fieldless `enum`, but any comparable
/// value type works. Lookups return the first matching entry.
///
/// # Examples
///
/// ```
/// use stx_reflect::{Class, ClassBuilder, ClassDeclaration, impl_type_shape};
/// use stx_reflect::interface::Enumeration;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// impl ClassDeclaration for Level {
///     const NAME: &'static str = "Level";
///
///     fn declare(class: &mut ClassBuilder<'_, Self>) {
///         class.add_interface(Enumeration::new([("Low", Level::Low), ("High", Level::High)]));
///     }
/// }
///
/// impl_type_shape!(Level);
///
/// # fn main() {
/// let levels = Class::of::<Level>().get_interface::<Enumeration>().unwrap();
/// assert_eq!(levels.name_of_value(&Level::High), Some("High"));
/// assert_eq!(levels.value_of("Low").unwrap().get::<Level>(), &Level::Low);
/// assert_eq!(levels.names().collect::<Vec<_>>(), ["Low", "High"]);
/// # }
/// ```
pub struct Enumeration {
    value_ty: fn() -> &'static Type,
    table: Box<dyn EnumTable>,
}

impl Enumeration {
    /// An enumeration of `entries`, in iteration order.
    pub fn new<T>(entries: impl IntoIterator<Item = (&'static str, T)>) -> Self
    where
        T: PartialEq + Clone + TypeShape + Send + Sync + 'static,
    {
        Self {
            value_ty: Type::of::<T>,
            table: Box::new(Table(entries.into_iter().collect())),
        }
    }

    /// The descriptor of the enumerated values.
    #[inline]
    pub fn value_type(&self) -> &'static Type {
        (self.value_ty)()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Entry names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        (0..self.table.len()).filter_map(|index| self.table.name(index))
    }

    /// Entries in order, each value copied into an [`AnyValue`].
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, AnyValue)> + '_ {
        (0..self.table.len())
            .filter_map(|index| Some((self.table.name(index)?, self.table.value(index)?)))
    }

    /// The value named `name`.
    pub fn value_of(&self, name: &str) -> Option<AnyValue> {
        let index = self.names().position(|n| n == name)?;
        self.table.value(index)
    }

    /// The name of `value`, if it is convertible to the value type and listed.
    pub fn name_of(&self, value: ErasedRef<'_>) -> Option<&'static str> {
        let index = self.table.position_of(value)?;
        self.table.name(index)
    }

    /// [`Enumeration::name_of`] on a typed value.
    #[inline]
    pub fn name_of_value<T: TypeShape + 'static>(&self, value: &T) -> Option<&'static str> {
        self.name_of(ErasedRef::new(value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::Enumeration;
    use crate::Type;

    fn primes() -> Enumeration {
        Enumeration::new([("two", 2u32), ("three", 3), ("five", 5), ("also_two", 2)])
    }

    #[test]
    fn ordered_lookup() {
        let primes = primes();
        assert_eq!(primes.len(), 4);
        assert!(!primes.is_empty());
        assert_eq!(primes.value_type(), Type::of::<u32>());
        assert_eq!(
            primes.names().collect::<Vec<_>>(),
            ["two", "three", "five", "also_two"]
        );
        assert_eq!(*primes.value_of("five").unwrap().get::<u32>(), 5);
        assert!(primes.value_of("four").is_none());
    }

    #[test]
    fn first_name_wins() {
        let primes = primes();
        assert_eq!(primes.name_of_value(&2u32), Some("two"));
        assert_eq!(primes.name_of_value(&4u32), None);
        assert_eq!(primes.name_of_value(&2u64), None);
    }

    #[test]
    fn entries_copy_values() {
        let sum: u32 = primes().entries().map(|(_, v)| *v.get::<u32>()).sum();
        assert_eq!(sum, 12);
        assert!(Enumeration::new::<u8>([]).is_empty());
    }
}

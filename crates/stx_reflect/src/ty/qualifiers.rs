use core::fmt;

bitflags::bitflags! {
    /// Qualifiers of one position of a decorated type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        /// Immutable through this path.
        const CONST = 1;
        /// Every access is observable.
        const VOLATILE = 1 << 1;
    }
}

/// The reference kind of a decorated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reference {
    /// Not a reference.
    #[default]
    None,
    /// A borrow of a place, `&T` and `&mut T`.
    LValue,
    /// A reference to a value that may be moved from.
    RValue,
}

impl Reference {
    /// Returns `true` unless this is [`Reference::None`].
    #[inline]
    pub const fn is_some(self) -> bool {
        !matches!(self, Reference::None)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::None => Ok(()),
            Reference::LValue => f.write_str("&"),
            Reference::RValue => f.write_str("&&"),
        }
    }
}

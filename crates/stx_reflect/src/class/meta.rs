use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use stx_utils::TypeIdMap;

use crate::class::{ClassDeclaration, Upcast, registry};
use crate::interface::Interface;
use crate::property::Property;
use crate::ty::{PlainType, Shape, Type, TypeShape};

// -----------------------------------------------------------------------------
// BaseClass

/// A declared base of a [`Class`], with the upcast from the derived type.
pub struct BaseClass {
    class: &'static Class,
    upcast_ref: fn(&dyn Any) -> Option<&dyn Any>,
    upcast_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

fn upcast_ref<D: Upcast<B> + 'static, B: 'static>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<D>()
        .map(|derived| derived.upcast_ref() as &dyn Any)
}

fn upcast_mut<D: Upcast<B> + 'static, B: 'static>(value: &mut dyn Any) -> Option<&mut dyn Any> {
    value
        .downcast_mut::<D>()
        .map(|derived| derived.upcast_mut() as &mut dyn Any)
}

impl BaseClass {
    pub(crate) fn new<D, B>() -> Self
    where
        D: Upcast<B> + 'static,
        B: ClassDeclaration,
    {
        Self {
            class: Class::of::<B>(),
            upcast_ref: upcast_ref::<D, B>,
            upcast_mut: upcast_mut::<D, B>,
        }
    }

    #[inline(always)]
    pub fn class(&self) -> &'static Class {
        self.class
    }
}

// -----------------------------------------------------------------------------
// Class

/// The sealed reflection record of one type.
///
/// There is exactly one `Class` per [`ClassDeclaration`] type, obtained
/// through [`Class::of`], and it is immutable once returned.
///
/// Property and interface lookups come in two flavors:
///
/// - `get_*`: only what this class declared itself.
/// - `find_*`: this class first, then its base classes depth-first in
///   declaration order.
pub struct Class {
    plain: PlainType,
    type_path: &'static str,
    is_abstract: bool,
    aliases: Vec<&'static str>,
    bases: Vec<BaseClass>,
    properties: Vec<Property>,
    interfaces: TypeIdMap<Box<dyn Interface>>,
}

/// The class of the undecorated `T`.
///
/// `class_of::<&[*const Foo; 3]>()` is `Class::of::<Foo>()`.
#[inline]
pub fn class_of<T: TypeShape + ?Sized>() -> &'static Class {
    Class::of::<T::Plain>()
}

impl Class {
    /// The sealed class of `T`. Runs `T::declare` on first use.
    ///
    /// The declaration runs exactly once. Concurrent first uses block until
    /// the thread running it has sealed the class.
    ///
    /// # Panics
    ///
    /// Panics through [`invariant_violation`](crate::error::invariant_violation)
    /// if the declaration is invalid or requests `T`'s own class.
    #[inline]
    pub fn of<T: ClassDeclaration + ?Sized>() -> &'static Class {
        registry::get_or_register::<T>()
    }

    /// A sealed class whose default name or alias is `name`.
    ///
    /// Returns `None` for unknown and for [ambiguous](Self::is_ambiguous) names.
    #[inline]
    pub fn find(name: &str) -> Option<&'static Class> {
        registry::find(name)
    }

    /// The sealed class for the type `type_id`, if any.
    #[inline]
    pub fn by_id(type_id: TypeId) -> Option<&'static Class> {
        registry::by_id(type_id)
    }

    /// Returns `true` if several sealed classes answer to `name`.
    #[inline]
    pub fn is_ambiguous(name: &str) -> bool {
        registry::is_ambiguous(name)
    }

    pub(crate) fn new<T: ClassDeclaration + ?Sized>() -> Self {
        Self {
            plain: PlainType::of::<T>(),
            type_path: core::any::type_name::<T>(),
            is_abstract: T::ABSTRACT,
            aliases: Vec::new(),
            bases: Vec::new(),
            properties: Vec::new(),
            interfaces: TypeIdMap::new(),
        }
    }

    /// The default name.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.plain.name()
    }

    /// The full Rust path of the type, as in [`core::any::type_name`].
    #[inline(always)]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.plain.id()
    }

    /// Returns `true` if this is the class of `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.plain.id() == TypeId::of::<T>()
    }

    /// The undecorated descriptor of the class type.
    #[inline]
    pub fn ty(&self) -> &'static Type {
        Type::intern(Shape::from_plain(self.plain))
    }

    #[inline(always)]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Aliases in declaration order, without the default name.
    #[inline]
    pub fn name_aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    /// The default name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        core::iter::once(self.name()).chain(self.aliases.iter().copied())
    }

    /// Returns `true` if `name` is the default name or an alias.
    pub fn has_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Direct base classes in declaration order.
    #[inline]
    pub fn base_classes(&self) -> &[BaseClass] {
        &self.bases
    }

    /// Returns `true` if `self` is `other` or derives from it.
    pub fn is_a(&self, other: &Class) -> bool {
        self.is_a_id(other.type_id())
    }

    pub(crate) fn is_a_id(&self, type_id: TypeId) -> bool {
        self.type_id() == type_id || self.bases.iter().any(|b| b.class.is_a_id(type_id))
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Properties declared by this class, in declaration order.
    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The property `name` declared by this class.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// The property `name` of this class or, failing that, of a base class.
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.get_property(name)
            .or_else(|| self.bases.iter().find_map(|b| b.class.find_property(name)))
    }

    /// Own properties followed by inherited ones not shadowed by name.
    pub fn all_properties(&self) -> Vec<&Property> {
        let mut properties = Vec::new();
        self.collect_properties(&mut properties);
        properties
    }

    fn collect_properties<'a>(&'a self, out: &mut Vec<&'a Property>) {
        for property in &self.properties {
            if !out.iter().any(|p| p.name() == property.name()) {
                out.push(property);
            }
        }
        for base in &self.bases {
            base.class.collect_properties(out);
        }
    }

    // -------------------------------------------------------------------------
    // Interfaces

    /// The interface `I` attached to this class.
    pub fn get_interface<I: Interface>(&self) -> Option<&I> {
        self.interfaces
            .get_type::<I>()
            .and_then(|interface| interface.downcast_ref::<I>())
    }

    /// The interface `I` of this class or, failing that, of a base class.
    pub fn find_interface<I: Interface>(&self) -> Option<&I> {
        self.get_interface::<I>()
            .or_else(|| self.bases.iter().find_map(|b| b.class.find_interface::<I>()))
    }

    /// Returns `true` if this class itself carries interface `I`.
    #[inline]
    pub fn has_interface<I: Interface>(&self) -> bool {
        self.interfaces.contains_type::<I>()
    }

    /// Number of interfaces attached to this class itself.
    #[inline]
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    // -------------------------------------------------------------------------
    // Population

    pub(crate) fn push_alias(&mut self, name: &'static str) {
        if !self.has_name(name) {
            self.aliases.push(name);
        }
    }

    pub(crate) fn push_base(&mut self, base: BaseClass) {
        if !self.bases.iter().any(|b| b.class.type_id() == base.class.type_id()) {
            self.bases.push(base);
        }
    }

    pub(crate) fn push_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub(crate) fn insert_interface(
        &mut self,
        type_id: TypeId,
        interface: Box<dyn Interface>,
    ) -> Option<Box<dyn Interface>> {
        self.interfaces.insert(type_id, interface)
    }

    // -------------------------------------------------------------------------
    // Upcasting

    /// Views `value`, an instance of this class, as the class `target`.
    pub(crate) fn upcast_ref<'a>(&self, value: &'a dyn Any, target: TypeId) -> Option<&'a dyn Any> {
        if self.type_id() == target {
            return Some(value);
        }
        let base = self.bases.iter().find(|b| b.class.is_a_id(target))?;
        base.class.upcast_ref((base.upcast_ref)(value)?, target)
    }

    /// Mutable counterpart of [`Class::upcast_ref`].
    pub(crate) fn upcast_mut<'a>(
        &self,
        value: &'a mut dyn Any,
        target: TypeId,
    ) -> Option<&'a mut dyn Any> {
        if self.type_id() == target {
            return Some(value);
        }
        let base = self.bases.iter().find(|b| b.class.is_a_id(target))?;
        base.class.upcast_mut((base.upcast_mut)(value)?, target)
    }
}

impl PartialEq for Class {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name())
            .field("aliases", &self.aliases)
            .field(
                "bases",
                &self.bases.iter().map(|b| b.class.name()).collect::<Vec<_>>(),
            )
            .field(
                "properties",
                &self.properties.iter().map(Property::name).collect::<Vec<_>>(),
            )
            .field("interfaces", &self.interfaces.len())
            .field("abstract", &self.is_abstract)
            .finish()
    }
}

impl fmt::Debug for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseClass").field(&self.class.name()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

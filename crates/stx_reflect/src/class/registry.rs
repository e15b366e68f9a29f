use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::cell::RefCell;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};

use stx_utils::TypeIdMap;
use stx_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::class::{Class, ClassBuilder, ClassDeclaration};
use crate::error::{InvariantError, invariant_violation};

// -----------------------------------------------------------------------------
// ClassRegistry

/// Every sealed class, with a name index.
struct ClassRegistry {
    classes: TypeIdMap<&'static Class>,
    names: HashMap<&'static str, &'static Class>,
    ambiguous_names: HashSet<&'static str>,
}

static REGISTRY: RwLock<ClassRegistry> = RwLock::new(ClassRegistry {
    classes: TypeIdMap::new(),
    names: HashMap::with_hasher(FixedHashState),
    ambiguous_names: HashSet::with_hasher(FixedHashState),
});

#[inline]
fn read() -> RwLockReadGuard<'static, ClassRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write() -> RwLockWriteGuard<'static, ClassRegistry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

impl ClassRegistry {
    /// Seals `class`. Only the thread holding its [`Claim`] calls this.
    fn insert(&mut self, class: Class) -> &'static Class {
        let class: &'static Class = Box::leak(Box::new(class));
        self.classes.insert(class.type_id(), class);
        for name in class.names() {
            self.index_name(name, class);
        }

        log::debug!(
            "sealed class `{}`: {} base(s), {} propert(ies), {} interface(s)",
            class.name(),
            class.base_classes().len(),
            class.properties().len(),
            class.interface_count(),
        );
        class
    }

    fn index_name(&mut self, name: &'static str, class: &'static Class) {
        if self.ambiguous_names.contains(name) {
            return;
        }
        match self.names.get(name) {
            Some(other) if other.type_id() != class.type_id() => {
                log::warn!(
                    "class name `{name}` is shared by `{}` and `{}`",
                    other.type_path(),
                    class.type_path(),
                );
                self.names.remove(name);
                self.ambiguous_names.insert(name);
            }
            Some(_) => {}
            None => {
                self.names.insert(name, class);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Population

std::thread_local! {
    static POPULATING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Marks a declaration as running on this thread until dropped.
struct PopulateGuard;

impl PopulateGuard {
    fn enter<T: ClassDeclaration + ?Sized>() -> Self {
        let type_id = TypeId::of::<T>();
        let reentered = POPULATING.with_borrow_mut(|running| {
            if running.contains(&type_id) {
                true
            } else {
                running.push(type_id);
                false
            }
        });
        if reentered {
            invariant_violation(InvariantError::RecursiveDeclaration { class: T::NAME });
        }
        PopulateGuard
    }
}

impl Drop for PopulateGuard {
    fn drop(&mut self) {
        POPULATING.with_borrow_mut(|running| running.pop());
    }
}

// -----------------------------------------------------------------------------
// Claims

/// Classes being populated, by owning thread, and what each blocked thread
/// waits for.
struct Sealing {
    owners: TypeIdMap<ThreadId>,
    waiting: HashMap<ThreadId, TypeId>,
}

static SEALING: Mutex<Sealing> = Mutex::new(Sealing {
    owners: TypeIdMap::new(),
    waiting: HashMap::with_hasher(FixedHashState),
});

static SEALED: Condvar = Condvar::new();

#[inline]
fn sealing() -> MutexGuard<'static, Sealing> {
    SEALING.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Sealing {
    /// Returns `true` if the owner of `type_id` is, transitively, waiting
    /// for a class owned by `me`.
    fn waits_on(&self, mut type_id: TypeId, me: ThreadId) -> bool {
        while let Some(&owner) = self.owners.get(&type_id) {
            if owner == me {
                return true;
            }
            match self.waiting.get(&owner) {
                Some(&next) => type_id = next,
                None => return false,
            }
        }
        false
    }
}

/// The right to populate one class. Dropping it wakes every waiter, also
/// when the declaration panicked.
struct Claim(TypeId);

impl Claim {
    /// Claims `T`, or waits until its owner sealed it.
    fn acquire<T: ClassDeclaration + ?Sized>() -> Result<Self, &'static Class> {
        let type_id = TypeId::of::<T>();
        let me = thread::current().id();
        let mut state = sealing();
        loop {
            if let Some(class) = by_id(type_id) {
                return Err(class);
            }
            if state.owners.get(&type_id).is_none() {
                state.owners.insert(type_id, me);
                return Ok(Claim(type_id));
            }
            if state.waits_on(type_id, me) {
                drop(state);
                invariant_violation(InvariantError::RecursiveDeclaration { class: T::NAME });
            }
            log::trace!("waiting for class `{}` sealed by another thread", T::NAME);
            state.waiting.insert(me, type_id);
            state = SEALED.wait(state).unwrap_or_else(PoisonError::into_inner);
            state.waiting.remove(&me);
        }
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        sealing().owners.remove(&self.0);
        SEALED.notify_all();
    }
}

pub(crate) fn get_or_register<T: ClassDeclaration + ?Sized>() -> &'static Class {
    if let Some(class) = by_id(TypeId::of::<T>()) {
        return class;
    }

    let _guard = PopulateGuard::enter::<T>();
    let claim = match Claim::acquire::<T>() {
        Ok(claim) => claim,
        Err(class) => return class,
    };

    // Declarations run without the registry lock held: they seal base classes.
    let mut class = Class::new::<T>();
    T::declare(&mut ClassBuilder::new(&mut class));
    let sealed = write().insert(class);
    drop(claim);
    sealed
}

pub(crate) fn find(name: &str) -> Option<&'static Class> {
    read().names.get(name).copied()
}

pub(crate) fn by_id(type_id: TypeId) -> Option<&'static Class> {
    read().classes.get(&type_id).copied()
}

pub(crate) fn is_ambiguous(name: &str) -> bool {
    read().ambiguous_names.contains(name)
}

/// A snapshot of every sealed class, in no particular order.
pub fn registered_classes() -> Vec<&'static Class> {
    read().classes.values().copied().collect()
}

// -----------------------------------------------------------------------------
// auto_register

/// Seals every class declared through [`impl_class!`](crate::impl_class) or
/// [`impl_type_shape!`](crate::impl_type_shape) for a non-generic type.
///
/// Repeated calls are cheap.
///
/// ## Return Value
///
/// Returns `true` if automatic registration works on the current platform.
///
/// ## Feature Dependency
///
/// Requires the `auto_register` feature. When disabled, does nothing and
/// returns `false`.
///
/// ## Platform Support
///
/// Supported platforms include Linux, macOS, Windows, iOS, Android, and Web,
/// enabled by the `inventory` crate. On unsupported platforms, this
/// function is a no-op.
///
/// # Examples
///
/// ```no_run
/// use stx_reflect::class::auto_register;
/// use stx_reflect::{Class, impl_class};
///
/// #[derive(Clone, Default)]
/// struct Celsius(f32);
///
/// impl_class!(Celsius as "Celsius" (default));
///
/// # fn main() {
/// assert!(auto_register());
/// assert!(Class::find("Celsius").is_some());
/// # }
/// ```
#[cfg_attr(not(feature = "auto_register"), inline(always))]
pub fn auto_register() -> bool {
    #[cfg(feature = "auto_register")]
    {
        use crate::__macro_exports::auto_register::{AvailFlag, ClassRegistration};

        if by_id(TypeId::of::<AvailFlag>()).is_some() {
            return true;
        }
        for registration in inventory::iter::<ClassRegistration> {
            (registration.0)();
        }
        by_id(TypeId::of::<AvailFlag>()).is_some()
    }
    #[cfg(not(feature = "auto_register"))]
    {
        false
    }
}

// -----------------------------------------------------------------------------
// Tests

use alloc::boxed::Box;

pub(crate) type Getter<T, F> = Box<dyn Fn(&T) -> F + Send + Sync>;
pub(crate) type Setter<T, F> = Box<dyn Fn(&mut T, F) + Send + Sync>;

/// How to read and optionally write a value of type `F` on a `T`.
///
/// # Examples
///
/// ```
/// use stx_reflect::property::Accessor;
///
/// struct Account {
///     id: u64,
///     balance: i64,
/// }
///
/// impl Account {
///     fn balance(&self) -> i64 { self.balance }
///     fn set_balance(&mut self, value: i64) { self.balance = value.max(0) }
/// }
///
/// // A field, readable and writable.
/// let balance = Accessor::field(|a: &Account| &a.balance, |a| &mut a.balance);
/// assert!(balance.is_writable());
///
/// // A field exposed read-only.
/// let id = Accessor::field_ref(|a: &Account| &a.id);
/// assert!(!id.is_writable());
///
/// // A getter, later paired with a setter.
/// let checked = Accessor::getter(Account::balance).with_setter(Account::set_balance);
/// assert!(checked.is_writable());
/// ```
pub struct Accessor<T, F> {
    pub(crate) get: Getter<T, F>,
    pub(crate) set: Option<Setter<T, F>>,
}

impl<T: 'static, F: 'static> Accessor<T, F> {
    /// A field reached through `get` and `get_mut`. Reads clone the field.
    pub fn field(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: Clone,
    {
        Self {
            get: Box::new(move |this: &T| get(this).clone()),
            set: Some(Box::new(move |this: &mut T, value: F| *get_mut(this) = value)),
        }
    }

    /// A field that can only be read.
    pub fn field_ref(get: fn(&T) -> &F) -> Self
    where
        F: Clone,
    {
        Self {
            get: Box::new(move |this: &T| get(this).clone()),
            set: None,
        }
    }

    /// A computed value. Read-only until [`with_setter`](Self::with_setter).
    pub fn getter(get: impl Fn(&T) -> F + Send + Sync + 'static) -> Self {
        Self {
            get: Box::new(get),
            set: None,
        }
    }

    /// Replaces the write path by `set`.
    #[must_use]
    pub fn with_setter(mut self, set: impl Fn(&mut T, F) + Send + Sync + 'static) -> Self {
        self.set = Some(Box::new(set));
        self
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

use alloc::sync::Arc;

use crate::any::{erase, unerase, AnyArc};

/// `Self` can be used where an `I` is expected.
///
/// Every type implements it for itself. For a concrete type and the contracts it implements use [`implements!`](crate::implements),
/// for a contract and its supertraits write the impl by hand (the body is just `self`).
pub trait Implements<I: ?Sized> {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: ?Sized> Implements<T> for T {
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Converts an erased `Arc<K>` into an erased `Arc<B>`, `None` if the value isn't an `Arc<K>`.
pub(crate) type Caster = fn(&AnyArc) -> Option<AnyArc>;

pub(crate) fn upcast_erased<K, B>(value: &AnyArc) -> Option<AnyArc>
where
    K: ?Sized + Implements<B> + Send + Sync + 'static,
    B: ?Sized + Send + Sync + 'static,
{
    unerase::<K>(value).map(|value| erase(K::upcast(value)))
}

/// Implements [`Implements`] for a concrete type and each listed contract.
///
/// # Syntax
/// ```text
/// implements!(Type: dyn Contract [, dyn OtherContract ...]);
/// ```
///
/// # Examples
/// ```rust
/// use sillon::{implements, Implements};
/// use std::sync::Arc;
///
/// trait UserRepo: Send + Sync {}
/// trait Health: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
/// impl Health for PostgresUserRepo {}
///
/// implements!(PostgresUserRepo: dyn UserRepo, dyn Health);
///
/// let repo: Arc<dyn UserRepo> = Arc::new(PostgresUserRepo).upcast();
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty : $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $concrete {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}

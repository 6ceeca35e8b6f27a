use alloc::{collections::BTreeMap, sync::Arc};
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
};

/// Runtime handle of a type: its canonical name and its [`TypeId`].
///
/// Equality, ordering and hashing only look at the id, the name is kept for lookup by name and for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }
}

pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Map = BTreeMap<TypeInfo, AnyArc>;

/// Wraps a shared value so it can be stored behind `dyn Any`, whatever `T` is (trait objects included).
#[inline]
#[must_use]
pub(crate) fn erase<T>(value: Arc<T>) -> AnyArc
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

#[inline]
#[must_use]
pub(crate) fn unerase<T>(value: &AnyArc) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    value.downcast_ref::<Arc<T>>().cloned()
}

/// A type-erased shared instance together with the type it was stored for.
///
/// Two handles pointing to the same cached instance are [`Instance::ptr_eq`].
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    value: AnyArc,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            value: erase(value),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn from_parts(type_info: TypeInfo, value: AnyArc) -> Self {
        Self { type_info, value }
    }

    #[inline]
    #[must_use]
    pub(crate) fn into_parts(self) -> (TypeInfo, AnyArc) {
        (self.type_info, self.value)
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Returns the shared value if it was stored for `T`.
    #[inline]
    #[must_use]
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        unerase(&self.value)
    }

    /// Returns `true` if both handles share the same erased value, as the handles of one cached instance do.
    ///
    /// Each [`Instance::new`] erases its `Arc` again, so two handles built from clones of the same `Arc<T>` aren't `ptr_eq`,
    /// compare the downcast values with [`Arc::ptr_eq`] instead.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type", &self.type_info.name).finish_non_exhaustive()
    }
}

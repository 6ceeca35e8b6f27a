use crate::any::TypeInfo;

/// One constructor parameter of a constructor plan.
///
/// `optional` parameters are passed as `None` when the dependency isn't registered,
/// required ones fail the construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Dependency {
    pub type_info: TypeInfo,
    pub optional: bool,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub fn required<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            optional: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn optional<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            optional: true,
        }
    }
}

use super::{dependency_resolver::ResolveErrorKind, plan::PlanErrorKind};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("The {what} to register is absent")]
    NullInput { what: &'static str },
    #[error("Instance of {} can't be registered for {}", actual.name, expected.name)]
    TypeMismatch { expected: TypeInfo, actual: TypeInfo },
    #[error("There is already an instance registered for {}", key.name)]
    DuplicateInstance { key: TypeInfo },
    #[error("There is already a factory registered for {}", key.name)]
    DuplicateFactory { key: TypeInfo },
    #[error("There is already a class registered for {}: {}, requested: {}", key.name, existing.name, requested.name)]
    DuplicateMapping {
        key: TypeInfo,
        existing: TypeInfo,
        requested: TypeInfo,
    },
    #[error(transparent)]
    Plan(#[from] PlanErrorKind),
    /// Raised when an eager registration fails to create its instance
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
}

impl RegisterErrorKind {
    /// Returns `true` for every flavour of duplicate registration: instance, factory or conflicting mapping.
    #[inline]
    #[must_use]
    pub const fn is_duplicate_registration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateInstance { .. } | Self::DuplicateFactory { .. } | Self::DuplicateMapping { .. }
        )
    }
}

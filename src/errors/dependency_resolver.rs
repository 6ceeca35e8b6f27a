use core::any::TypeId;

use super::plan::PlanErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Required dependency {} of {} is not registered", dependency.name, required_by.name)]
    MissingDependency { dependency: TypeInfo, required_by: TypeInfo },
    #[error("Incorrect provided type. Actual: {actual:?}, expected: {}", expected.name)]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error(transparent)]
    Plan(#[from] PlanErrorKind),
    /// Error returned by a fallible factory
    #[error(transparent)]
    Factory(anyhow::Error),
}

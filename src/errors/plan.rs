use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanErrorKind {
    #[error("No public constructor found in {}", concrete.name)]
    NoPublicConstructor { concrete: TypeInfo },
    #[error("{count} public constructors found in {}, expected exactly one", concrete.name)]
    AmbiguousConstructor { concrete: TypeInfo, count: usize },
}

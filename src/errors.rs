mod dependency_resolver;
mod plan;
mod register;

pub use dependency_resolver::ResolveErrorKind;
pub use plan::PlanErrorKind;
pub use register::RegisterErrorKind;

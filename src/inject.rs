use alloc::{sync::Arc, vec::Vec};
use tracing::error;

use crate::{any::TypeInfo, dependency::Dependency, dependency_resolver::DependencyResolver, Container, ResolveErrorKind};

/// Required dependency: resolution fails with [`ResolveErrorKind::MissingDependency`] if `Dep` isn't registered.
pub struct Inject<Dep: ?Sized>(pub Arc<Dep>);

impl<Dep: ?Sized> Clone for Inject<Dep> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Dep: ?Sized + Send + Sync + 'static> DependencyResolver for Inject<Dep> {
    fn resolve(container: &Container, required_by: TypeInfo) -> Result<Self, ResolveErrorKind> {
        match container.get::<Dep>()? {
            Some(dependency) => Ok(Self(dependency)),
            None => {
                let err = ResolveErrorKind::MissingDependency {
                    dependency: TypeInfo::of::<Dep>(),
                    required_by,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn collect_dependencies(dependencies: &mut Vec<Dependency>) {
        dependencies.push(Dependency::required::<Dep>());
    }
}

/// Optional dependency: `None` if `Dep` isn't registered, the construction goes on.
impl<Dep: ?Sized + Send + Sync + 'static> DependencyResolver for Option<Inject<Dep>> {
    fn resolve(container: &Container, _required_by: TypeInfo) -> Result<Self, ResolveErrorKind> {
        container.get::<Dep>().map(|dependency| dependency.map(Inject))
    }

    fn collect_dependencies(dependencies: &mut Vec<Dependency>) {
        dependencies.push(Dependency::optional::<Dep>());
    }
}

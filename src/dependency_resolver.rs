use alloc::vec::Vec;

use super::errors::ResolveErrorKind;
use crate::{any::TypeInfo, dependency::Dependency, Container};

/// A constructor parameter that knows how to obtain itself from a container.
pub trait DependencyResolver: Sized {
    /// Resolves the parameter, `required_by` is the concrete type being constructed.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind`] if a required dependency is missing or if its own construction failed.
    fn resolve(container: &Container, required_by: TypeInfo) -> Result<Self, ResolveErrorKind>;

    /// Appends the parameter types, in declared order.
    fn collect_dependencies(dependencies: &mut Vec<Dependency>);

    #[inline]
    #[must_use]
    fn dependencies() -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        Self::collect_dependencies(&mut dependencies);
        dependencies
    }
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            #[inline]
            #[allow(unused_variables)]
            fn resolve(container: &Container, required_by: TypeInfo) -> Result<Self, ResolveErrorKind> {
                Ok(($($ty::resolve(container, required_by)?,)*))
            }

            #[inline]
            #[allow(unused_variables)]
            fn collect_dependencies(dependencies: &mut Vec<Dependency>) {
                $( $ty::collect_dependencies(dependencies); )*
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

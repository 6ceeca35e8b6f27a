use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::any::Any;
use tracing::{debug, error, warn};

use super::{dependency_resolver::DependencyResolver, errors::PlanErrorKind};
use crate::{
    any::TypeInfo,
    config::ConstructorSelection,
    dependency::Dependency,
    errors::ResolveErrorKind,
    Container,
};

pub trait Constructor<Deps>: Clone + Send + Sync + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;

    fn construct(&mut self, dependencies: Deps) -> Self::Provides;
}

macro_rules! impl_constructor {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, $($ty,)*> Constructor<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Response + Clone + Send + Sync + 'static,
            Response: 'static,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;

            fn construct(&mut self, ($($ty,)*): ($($ty,)*)) -> Self::Provides {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_constructor);

/// A concrete type that the container can build by injecting its constructor parameters.
///
/// # Examples
/// ```rust
/// use sillon::{Constructors, Inject, Injectable};
/// use std::sync::Arc;
///
/// struct Database;
///
/// impl Injectable for Database {
///     fn constructors() -> Constructors<Self> {
///         Constructors::new().public(|| Database)
///     }
/// }
///
/// struct UserRepo {
///     database: Arc<Database>,
/// }
///
/// impl Injectable for UserRepo {
///     fn constructors() -> Constructors<Self> {
///         Constructors::new().public(|Inject(database): Inject<Database>| UserRepo { database })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Constructors of the type, in declaration order
    fn constructors() -> Constructors<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

type BoxedConstructor<T> = Arc<dyn Fn(&Container, TypeInfo) -> Result<T, ResolveErrorKind> + Send + Sync>;

pub(crate) type BoxedErasedConstructor = Arc<dyn Fn(&Container) -> Result<Box<dyn Any + Send>, ResolveErrorKind> + Send + Sync>;

struct ConstructorInfo<T> {
    visibility: Visibility,
    parameters: Box<[Dependency]>,
    constructor: BoxedConstructor<T>,
}

/// Ordered set of constructors of `T`
pub struct Constructors<T> {
    entries: Vec<ConstructorInfo<T>>,
}

impl<T: 'static> Default for Constructors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Constructors<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn public<C, Deps>(self, constructor: C) -> Self
    where
        C: Constructor<Deps, Provides = T>,
        Deps: DependencyResolver,
    {
        self.push(Visibility::Public, constructor)
    }

    /// Declares a constructor the container isn't allowed to call.
    #[inline]
    #[must_use]
    pub fn private<C, Deps>(self, constructor: C) -> Self
    where
        C: Constructor<Deps, Provides = T>,
        Deps: DependencyResolver,
    {
        self.push(Visibility::Private, constructor)
    }

    fn push<C, Deps>(mut self, visibility: Visibility, constructor: C) -> Self
    where
        C: Constructor<Deps, Provides = T>,
        Deps: DependencyResolver,
    {
        self.entries.push(ConstructorInfo {
            visibility,
            parameters: Deps::dependencies().into_boxed_slice(),
            constructor: boxed_constructor(constructor),
        });
        self
    }
}

#[must_use]
fn boxed_constructor<C, Deps>(constructor: C) -> BoxedConstructor<C::Provides>
where
    C: Constructor<Deps>,
    Deps: DependencyResolver,
{
    Arc::new(move |container: &Container, required_by: TypeInfo| {
        let dependencies = Deps::resolve(container, required_by)?;
        let provides = constructor.clone().construct(dependencies);

        debug!("Constructed");

        Ok(provides)
    })
}

/// Selected constructor of a concrete type with its parameter types.
#[derive(Clone)]
pub(crate) struct ConstructorPlan {
    pub(crate) concrete: TypeInfo,
    pub(crate) parameters: Box<[Dependency]>,
    pub(crate) constructor: BoxedErasedConstructor,
}

impl ConstructorPlan {
    /// Plans the construction of `C`.
    ///
    /// # Errors
    /// - [`PlanErrorKind::NoPublicConstructor`] if `C` declares no public constructor.
    /// - [`PlanErrorKind::AmbiguousConstructor`] if `C` declares several and the selection requires a unique one.
    pub(crate) fn of<C: Injectable>(selection: ConstructorSelection) -> Result<Self, PlanErrorKind> {
        let concrete = TypeInfo::of::<C>();

        let mut public = C::constructors()
            .entries
            .into_iter()
            .filter(|info| info.visibility == Visibility::Public);
        let Some(ConstructorInfo {
            parameters, constructor, ..
        }) = public.next()
        else {
            let err = PlanErrorKind::NoPublicConstructor { concrete };
            error!("{}", err);
            return Err(err);
        };

        let count = public.count() + 1;
        if count > 1 {
            match selection {
                ConstructorSelection::FirstDeclared => {
                    warn!(concrete = concrete.name, count, "Several public constructors, the first declared is used");
                }
                ConstructorSelection::RequireUnique => {
                    let err = PlanErrorKind::AmbiguousConstructor { concrete, count };
                    error!("{}", err);
                    return Err(err);
                }
            }
        }

        debug!(concrete = concrete.name, parameters = parameters.len(), "Planned");

        Ok(Self {
            concrete,
            parameters,
            constructor: Arc::new(move |container: &Container| {
                constructor(container, concrete).map(|provides| Box::new(provides) as Box<dyn Any + Send>)
            }),
        })
    }

    /// Resolves the parameters and calls the constructor, the result isn't cached.
    pub(crate) fn construct<C: Injectable>(&self, container: &Container) -> Result<C, ResolveErrorKind> {
        let provides = (self.constructor)(container)?;
        match provides.downcast::<C>() {
            Ok(provides) => Ok(*provides),
            Err(_) => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: TypeInfo::of::<C>(),
                    actual: self.concrete.id,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

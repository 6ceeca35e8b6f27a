use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::{
    any::type_name,
    cell::RefCell,
    mem,
};
use parking_lot::ReentrantMutex;
use tracing::{debug, error, info_span};

use super::cache::Cache;
use crate::{
    any::{erase, unerase, AnyArc, Instance, TypeInfo},
    cast::{upcast_erased, Caster, Implements},
    config::Config,
    constructor::{ConstructorPlan, Injectable},
    dependency::Dependency,
    errors::{PlanErrorKind, RegisterErrorKind, ResolveErrorKind},
    registry::{Binding, BoxedFactory, Registry},
};

/// Factory of the type-erased registration API, see [`Container::register_factory_erased`].
pub type ErasedFactory = Arc<dyn Fn() -> Result<Instance, anyhow::Error> + Send + Sync>;

#[derive(Default)]
pub(crate) struct State {
    registry: Registry,
    cache: Cache,
}

pub(crate) struct ContainerInner {
    state: ReentrantMutex<RefCell<State>>,
    config: Config,
}

/// Registry of bindings from a type (usually a `dyn Contract`) to an instance, a factory or a concrete [`Injectable`] type.
///
/// Every key resolves to at most one instance, created on first request (or at registration when asked) and reused afterwards.
/// The container is a cheap handle: clones share the same bindings and instances.
///
/// # Concurrency
/// All operations are serialized by one reentrant lock per container, so factories and constructors may
/// resolve and register through the same container while they run.
/// A slow factory blocks other threads using the container until it returns.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                state: ReentrantMutex::new(RefCell::new(State::default())),
                config,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }
}

impl Container {
    /// Registers an already created instance for `T`. It's cached right away, no factory is involved.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::DuplicateInstance`] if an instance is already stored for `T`.
    pub fn register_instance<T>(&self, instance: Arc<T>) -> Result<&Self, RegisterErrorKind>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register_instance_erased(Some(Instance::new(instance)), TypeInfo::of::<T>())
    }

    /// Type-erased version of [`Self::register_instance`].
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::NullInput`] if `instance` is `None`.
    /// - Returns [`RegisterErrorKind::TypeMismatch`] if `instance` wasn't created for `declared`
    ///   nor for a type declared with `declared` as base, see [`Self::declare_base`].
    /// - Returns [`RegisterErrorKind::DuplicateInstance`] if an instance is already stored for `declared`.
    pub fn register_instance_erased(&self, instance: Option<Instance>, declared: TypeInfo) -> Result<&Self, RegisterErrorKind> {
        let span = info_span!("register_instance", dependency = declared.name);
        let _guard = span.enter();

        let Some(instance) = instance else {
            let err = RegisterErrorKind::NullInput { what: "instance" };
            error!("{}", err);
            return Err(err);
        };
        let (actual, value) = instance.into_parts();

        let guard = self.inner.state.lock();
        let value = if actual == declared {
            value
        } else {
            let caster = guard.borrow().registry.caster(&actual, &declared);
            match caster.and_then(|caster| caster(&value)) {
                Some(value) => value,
                None => {
                    let err = RegisterErrorKind::TypeMismatch { expected: declared, actual };
                    error!("{}", err);
                    return Err(err);
                }
            }
        };

        let mut state = guard.borrow_mut();
        if state.cache.contains(&declared) {
            let err = RegisterErrorKind::DuplicateInstance { key: declared };
            error!("{}", err);
            return Err(err);
        }
        state.registry.ensure_binding(declared, Binding::SelfBound);
        let _ = state.cache.insert_first(declared, value);

        debug!("Registered");
        Ok(self)
    }

    /// Registers a factory for `T`, called once on first resolution.
    /// With `create_immediately` the instance is created before returning.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::DuplicateFactory`] if a factory is already registered for `T`.
    pub fn register_factory<T, F>(&self, factory: F, create_immediately: bool) -> Result<&Self, RegisterErrorKind>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.add_factory(
            TypeInfo::of::<T>(),
            Arc::new(move |_: &Container| Ok::<_, ResolveErrorKind>(erase(factory()))),
            create_immediately,
        )
    }

    /// Same as [`Self::register_factory`] for a factory that can fail.
    /// Its error is returned by the resolution as [`ResolveErrorKind::Factory`] and nothing is cached.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::DuplicateFactory`] if a factory is already registered for `T`.
    pub fn register_try_factory<T, F, E>(&self, factory: F, create_immediately: bool) -> Result<&Self, RegisterErrorKind>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        self.add_factory(
            TypeInfo::of::<T>(),
            Arc::new(move |_: &Container| match factory() {
                Ok(value) => Ok(erase(value)),
                Err(err) => {
                    let err = ResolveErrorKind::Factory(err.into());
                    error!("{}", err);
                    Err(err)
                }
            }),
            create_immediately,
        )
    }

    /// Type-erased version of [`Self::register_try_factory`].
    /// An instance produced for another type than `declared` fails the resolution with [`ResolveErrorKind::IncorrectType`].
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::NullInput`] if `factory` is `None`.
    /// - Returns [`RegisterErrorKind::DuplicateFactory`] if a factory is already registered for `declared`.
    pub fn register_factory_erased(
        &self,
        declared: TypeInfo,
        factory: Option<ErasedFactory>,
        create_immediately: bool,
    ) -> Result<&Self, RegisterErrorKind> {
        let Some(factory) = factory else {
            let err = RegisterErrorKind::NullInput { what: "factory" };
            error!(dependency = declared.name, "{}", err);
            return Err(err);
        };

        self.add_factory(
            declared,
            Arc::new(move |_: &Container| {
                let (actual, value) = match factory() {
                    Ok(instance) => instance.into_parts(),
                    Err(err) => {
                        let err = ResolveErrorKind::Factory(err);
                        error!("{}", err);
                        return Err(err);
                    }
                };
                if actual != declared {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: declared,
                        actual: actual.id,
                    };
                    error!("{}", err);
                    return Err(err);
                }
                Ok(value)
            }),
            create_immediately,
        )
    }

    /// Binds `I` to the concrete type `C`, built by constructor injection on first resolution.
    /// Registering the same mapping again is a no-op.
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::DuplicateMapping`] if `I` is already bound to something else.
    /// - Returns [`RegisterErrorKind::Plan`] if no constructor of `C` can be used.
    /// - Returns [`RegisterErrorKind::Resolve`] if `create_immediately` is set and the creation fails.
    pub fn register_type<I, C>(&self, create_immediately: bool) -> Result<&Self, RegisterErrorKind>
    where
        I: ?Sized + Send + Sync + 'static,
        C: Injectable + Implements<I>,
    {
        let key = TypeInfo::of::<I>();
        let concrete = TypeInfo::of::<C>();

        let span = info_span!("register_type", dependency = key.name, concrete = concrete.name);
        let _span_guard = span.enter();

        let guard = self.inner.state.lock();
        let has_plan = {
            let state = guard.borrow();
            match state.registry.binding(&key) {
                Some(Binding::Mapped(existing)) if existing == concrete => {
                    debug!("Already registered");
                    return Ok(self);
                }
                Some(binding) => {
                    let err = RegisterErrorKind::DuplicateMapping {
                        key,
                        existing: binding.resolves_to(key),
                        requested: concrete,
                    };
                    error!("{}", err);
                    return Err(err);
                }
                None => state.registry.contains_plan(&concrete),
            }
        };
        let plan = if has_plan {
            None
        } else {
            Some(ConstructorPlan::of::<C>(self.inner.config.constructor_selection)?)
        };

        {
            let mut state = guard.borrow_mut();
            if let Some(plan) = plan {
                state.registry.insert_plan(plan);
            }
            state.registry.ensure_binding(key, Binding::Mapped(concrete));
            state
                .registry
                .insert_factory(key, Arc::new(|container: &Container| container.construct_mapped::<I, C>()));
        }
        debug!("Registered");

        if create_immediately {
            let _ = self.resolve(key)?;
        }
        Ok(self)
    }

    /// Binds the concrete type `C` to itself, see [`Self::register_type`].
    ///
    /// # Errors
    /// Same as [`Self::register_type`].
    #[inline]
    pub fn register_self<C: Injectable>(&self, create_immediately: bool) -> Result<&Self, RegisterErrorKind> {
        self.register_type::<C, C>(create_immediately)
    }

    /// Declares that instances bound to `K` are also `B`, for [`Self::get_all_on_base`].
    /// Every key is its own base without declaration.
    pub fn declare_base<K, B>(&self) -> &Self
    where
        K: ?Sized + Implements<B> + Send + Sync + 'static,
        B: ?Sized + Send + Sync + 'static,
    {
        let key = TypeInfo::of::<K>();
        let base = TypeInfo::of::<B>();
        if key == base {
            return self;
        }

        let guard = self.inner.state.lock();
        guard
            .borrow_mut()
            .registry
            .insert_base(key, base, upcast_erased::<K, B> as Caster);

        debug!(dependency = key.name, base = base.name, "Base declared");
        self
    }

    /// Removes the binding of `T` with its instance, factory, declared bases and the plan of its concrete type.
    /// Removing an unregistered type does nothing.
    #[inline]
    pub fn unregister<T: ?Sized + 'static>(&self) {
        self.unregister_erased(&TypeInfo::of::<T>());
    }

    pub fn unregister_erased(&self, key: &TypeInfo) {
        let guard = self.inner.state.lock();
        let removed = {
            let mut state = guard.borrow_mut();
            (state.cache.remove(key), state.registry.remove(key))
        };
        drop(removed);

        debug!(dependency = key.name, "Unregistered");
    }

    /// Removes every binding, instance, factory and constructor plan.
    pub fn reset(&self) {
        let guard = self.inner.state.lock();
        let removed = {
            let mut state = guard.borrow_mut();
            (mem::take(&mut state.registry), state.cache.take())
        };
        drop(removed);

        debug!("Reset");
    }

    fn add_factory(&self, key: TypeInfo, factory: BoxedFactory, create_immediately: bool) -> Result<&Self, RegisterErrorKind> {
        let span = info_span!("register_factory", dependency = key.name);
        let _span_guard = span.enter();

        let guard = self.inner.state.lock();
        {
            let mut state = guard.borrow_mut();
            if state.registry.contains_factory(&key) {
                let err = RegisterErrorKind::DuplicateFactory { key };
                error!("{}", err);
                return Err(err);
            }
            state.registry.ensure_binding(key, Binding::SelfBound);
            state.registry.insert_factory(key, factory);
        }
        debug!("Registered");

        if create_immediately {
            let _ = self.resolve(key)?;
        }
        Ok(self)
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.is_registered_erased(&TypeInfo::of::<T>())
    }

    #[must_use]
    pub fn is_registered_erased(&self, key: &TypeInfo) -> bool {
        self.inner.state.lock().borrow().registry.contains(key)
    }

    /// Returns `true` if the instance of `T` is already created
    #[inline]
    #[must_use]
    pub fn contains_created<T: ?Sized + 'static>(&self) -> bool {
        self.contains_created_erased(&TypeInfo::of::<T>())
    }

    #[must_use]
    pub fn contains_created_erased(&self, key: &TypeInfo) -> bool {
        self.inner.state.lock().borrow().cache.contains(key)
    }

    /// Count of registered keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.lock().borrow().registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameters of the memoized constructor plan of `C`, `None` if `C` isn't planned
    #[must_use]
    pub fn constructor_plan<C: 'static>(&self) -> Option<Box<[Dependency]>> {
        self.inner
            .state
            .lock()
            .borrow()
            .registry
            .plan(&TypeInfo::of::<C>())
            .map(|plan| plan.parameters)
    }
}

impl Container {
    /// Gets the instance of `T`, creating it on first request.
    /// Returns `Ok(None)` if `T` isn't registered.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind`] if the creation of the instance or one of its required dependencies fails.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        let key = TypeInfo::of::<T>();
        let Some(instance) = self.resolve(key)? else {
            return Ok(None);
        };

        match unerase::<T>(&instance) {
            Some(instance) => Ok(Some(instance)),
            None => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: key,
                    actual: (*instance).type_id(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Type-erased version of [`Self::get`].
    ///
    /// # Errors
    /// Same as [`Self::get`].
    pub fn get_erased(&self, key: &TypeInfo) -> Result<Option<Instance>, ResolveErrorKind> {
        Ok(self.resolve(*key)?.map(|value| Instance::from_parts(*key, value)))
    }

    /// Gets the instance of the registered type whose name is exactly `name`, see [`core::any::type_name`].
    ///
    /// # Errors
    /// Same as [`Self::get`].
    pub fn get_by_name(&self, name: &str) -> Result<Option<Instance>, ResolveErrorKind> {
        let guard = self.inner.state.lock();
        let key = guard.borrow().registry.key_by_name(name);
        match key {
            Some(key) => self.get_erased(&key),
            None => {
                debug!(name, "No registered type with this name");
                Ok(None)
            }
        }
    }

    /// Builds a new `C` with its constructor parameters resolved from the container.
    /// Neither `C` nor its instance is stored, every call constructs again.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::Plan`] if no constructor of `C` can be used.
    /// - Returns [`ResolveErrorKind`] if a required dependency is missing or fails.
    pub fn get_without_registering<C: Injectable>(&self) -> Result<C, ResolveErrorKind> {
        let span = info_span!("get_without_registering", dependency = type_name::<C>());
        let _span_guard = span.enter();

        let guard = self.inner.state.lock();
        let plan = guard.borrow().registry.plan(&TypeInfo::of::<C>());
        let plan = match plan {
            Some(plan) => plan,
            None => ConstructorPlan::of::<C>(self.inner.config.constructor_selection)?,
        };
        plan.construct(self)
    }

    /// Gets the instances of all registered types, in registration order, creating those not created yet.
    ///
    /// # Errors
    /// Returns the first [`ResolveErrorKind`] of a failed creation.
    pub fn get_all(&self) -> Result<Vec<Instance>, ResolveErrorKind> {
        let guard = self.inner.state.lock();
        let keys = guard.borrow().registry.keys();

        let mut instances = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.resolve(key)? {
                instances.push(Instance::from_parts(key, value));
            }
        }
        Ok(instances)
    }

    /// Gets the instances of all registered types that are `B`: `B` itself and the keys declared with [`Self::declare_base`].
    /// Instances not created yet are created.
    ///
    /// # Errors
    /// Returns the first [`ResolveErrorKind`] of a failed creation.
    pub fn get_all_on_base<B: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<B>>, ResolveErrorKind> {
        let base = TypeInfo::of::<B>();

        let guard = self.inner.state.lock();
        let candidates: Vec<(TypeInfo, Option<Caster>)> = {
            let state = guard.borrow();
            state
                .registry
                .keys()
                .into_iter()
                .filter_map(|key| {
                    if key == base {
                        Some((key, None))
                    } else {
                        state.registry.caster(&key, &base).map(|caster| (key, Some(caster)))
                    }
                })
                .collect()
        };

        let mut instances = Vec::with_capacity(candidates.len());
        for (key, caster) in candidates {
            let Some(value) = self.resolve(key)? else {
                continue;
            };
            let value = match caster {
                Some(caster) => caster(&value),
                None => Some(value),
            };
            match value.as_ref().and_then(unerase::<B>) {
                Some(instance) => instances.push(instance),
                None => {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: base,
                        actual: key.id,
                    };
                    error!("{}", err);
                    return Err(err);
                }
            }
        }
        Ok(instances)
    }
}

impl Container {
    /// Cache hit, else the factory of the key, the produced instance is cached if that factory is still the one bound to the key.
    fn resolve(&self, key: TypeInfo) -> Result<Option<AnyArc>, ResolveErrorKind> {
        let span = info_span!("get", dependency = key.name);
        let _span_guard = span.enter();

        let guard = self.inner.state.lock();
        let factory: Option<BoxedFactory> = {
            let state = guard.borrow();
            if let Some(instance) = state.cache.get(&key) {
                debug!("Found in cache");
                return Ok(Some(instance));
            }
            if !state.registry.contains(&key) {
                debug!("Not registered");
                return Ok(None);
            }
            state.registry.factory(&key)
        };
        debug!("Not found in cache");

        let Some(factory) = factory else {
            debug!("No factory");
            return Ok(None);
        };
        let instance = factory(self)?;

        let stored = {
            let mut state = guard.borrow_mut();
            let still_bound = state
                .registry
                .factory(&key)
                .is_some_and(|current| Arc::ptr_eq(&current, &factory));
            if !still_bound {
                debug!("Binding changed during creation, not cached");
                return Ok(Some(instance));
            }
            state.cache.insert_first(key, instance.clone())
        };
        debug!("Cached");

        Ok(Some(stored))
    }

    /// Factory installed by [`Self::register_type`]
    fn construct_mapped<I, C>(&self) -> Result<AnyArc, ResolveErrorKind>
    where
        I: ?Sized + Send + Sync + 'static,
        C: Injectable + Implements<I>,
    {
        let plan = self.plan::<C>()?;
        let concrete = plan.construct::<C>(self)?;
        Ok(erase(<C as Implements<I>>::upcast(Arc::new(concrete))))
    }

    /// Memoized plan of `C`, planned again if it was removed with another binding to `C`.
    fn plan<C: Injectable>(&self) -> Result<ConstructorPlan, PlanErrorKind> {
        let concrete = TypeInfo::of::<C>();

        let guard = self.inner.state.lock();
        let plan = guard.borrow().registry.plan(&concrete);
        if let Some(plan) = plan {
            return Ok(plan);
        }

        let plan = ConstructorPlan::of::<C>(self.inner.config.constructor_selection)?;
        guard.borrow_mut().registry.insert_plan(plan.clone());
        Ok(plan)
    }
}

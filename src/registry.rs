use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};
use indexmap::IndexMap;

use crate::{
    any::{AnyArc, TypeInfo},
    cast::Caster,
    constructor::ConstructorPlan,
    errors::ResolveErrorKind,
    Container,
};

pub(crate) type BoxedFactory = Arc<dyn Fn(&Container) -> Result<AnyArc, ResolveErrorKind> + Send + Sync>;

/// What a registered key resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binding {
    /// Registered through an instance or a factory
    SelfBound,
    /// Registered through a type mapping to a concrete type
    Mapped(TypeInfo),
}

impl Binding {
    #[inline]
    #[must_use]
    pub(crate) const fn resolves_to(self, key: TypeInfo) -> TypeInfo {
        match self {
            Self::SelfBound => key,
            Self::Mapped(concrete) => concrete,
        }
    }
}

/// Binding table with the factories, constructor plans and declared bases of the keys.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: IndexMap<TypeInfo, Binding>,
    names: BTreeMap<&'static str, TypeInfo>,
    factories: BTreeMap<TypeInfo, BoxedFactory>,
    plans: BTreeMap<TypeInfo, ConstructorPlan>,
    bases: BTreeMap<TypeInfo, BTreeMap<TypeInfo, Caster>>,
}

impl Registry {
    /// Adds a binding for `key` if there is none, an existing binding is never changed.
    pub(crate) fn ensure_binding(&mut self, key: TypeInfo, binding: Binding) {
        if self.bindings.contains_key(&key) {
            return;
        }
        self.bindings.insert(key, binding);
        self.names.entry(key.name).or_insert(key);
    }

    #[inline]
    #[must_use]
    pub(crate) fn binding(&self, key: &TypeInfo) -> Option<Binding> {
        self.bindings.get(key).copied()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &TypeInfo) -> bool {
        self.bindings.contains_key(key)
    }

    /// Registered keys in registration order
    #[inline]
    #[must_use]
    pub(crate) fn keys(&self) -> Vec<TypeInfo> {
        self.bindings.keys().copied().collect()
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn key_by_name(&self, name: &str) -> Option<TypeInfo> {
        self.names.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains_factory(&self, key: &TypeInfo) -> bool {
        self.factories.contains_key(key)
    }

    /// Stores the factory of `key`, a present one is kept.
    #[inline]
    pub(crate) fn insert_factory(&mut self, key: TypeInfo, factory: BoxedFactory) {
        self.factories.entry(key).or_insert(factory);
    }

    #[inline]
    #[must_use]
    pub(crate) fn factory(&self, key: &TypeInfo) -> Option<BoxedFactory> {
        self.factories.get(key).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn plan(&self, concrete: &TypeInfo) -> Option<ConstructorPlan> {
        self.plans.get(concrete).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains_plan(&self, concrete: &TypeInfo) -> bool {
        self.plans.contains_key(concrete)
    }

    /// Memoizes the plan of its concrete type, a present one is kept.
    #[inline]
    pub(crate) fn insert_plan(&mut self, plan: ConstructorPlan) {
        self.plans.entry(plan.concrete).or_insert(plan);
    }

    #[inline]
    pub(crate) fn insert_base(&mut self, key: TypeInfo, base: TypeInfo, caster: Caster) {
        self.bases.entry(key).or_default().insert(base, caster);
    }

    #[inline]
    #[must_use]
    pub(crate) fn caster(&self, key: &TypeInfo, base: &TypeInfo) -> Option<Caster> {
        self.bases.get(key).and_then(|bases| bases.get(base)).copied()
    }

    /// Removes the binding of `key`, its factory, its declared bases and the plan of the type it resolves to.
    /// The removed factory and plan are returned so the caller decides where they are dropped.
    pub(crate) fn remove(&mut self, key: &TypeInfo) -> (Option<BoxedFactory>, Option<ConstructorPlan>) {
        let resolves_to = self
            .bindings
            .shift_remove(key)
            .map_or(*key, |binding| binding.resolves_to(*key));

        if self.names.get(key.name) == Some(key) {
            self.names.remove(key.name);
        }
        self.bases.remove(key);

        (self.factories.remove(key), self.plans.remove(&resolves_to))
    }
}

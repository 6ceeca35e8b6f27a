#![allow(dead_code)]

use sillon::{implements, Constructors, Container, Inject, Injectable};
use std::sync::Arc;

pub trait Parent: Send + Sync {}
pub trait Derived: Send + Sync {}
pub trait Service1: Send + Sync {}
pub trait Service2: Send + Sync {}

pub struct ParentImpl;
pub struct DerivedImpl;
pub struct OtherDerived;
pub struct Service1Impl;
pub struct Service2Impl;

impl Parent for ParentImpl {}
impl Parent for DerivedImpl {}
impl Derived for DerivedImpl {}
impl Parent for OtherDerived {}
impl Service1 for Service1Impl {}
impl Service2 for Service2Impl {}

implements!(ParentImpl: dyn Parent);
implements!(DerivedImpl: dyn Parent, dyn Derived);
implements!(OtherDerived: dyn Parent);
implements!(Service1Impl: dyn Service1);
implements!(Service2Impl: dyn Service2);

macro_rules! unit_injectable {
    ($($ty:ident),+) => {
        $(
            impl Injectable for $ty {
                fn constructors() -> Constructors<Self> {
                    Constructors::new().public(|| $ty)
                }
            }
        )+
    };
}

unit_injectable!(ParentImpl, DerivedImpl, OtherDerived, Service1Impl, Service2Impl);

pub struct ComplexCtor {
    pub parent: Arc<dyn Parent>,
    pub derived: Option<Arc<dyn Derived>>,
}

impl Injectable for ComplexCtor {
    fn constructors() -> Constructors<Self> {
        Constructors::new().public(|Inject(parent): Inject<dyn Parent>, derived: Option<Inject<dyn Derived>>| ComplexCtor {
            parent,
            derived: derived.map(|Inject(derived)| derived),
        })
    }
}

pub struct TwoCtor {
    pub ctor: u8,
}

impl Injectable for TwoCtor {
    fn constructors() -> Constructors<Self> {
        Constructors::new()
            .public(|| TwoCtor { ctor: 1 })
            .public(|_: Inject<dyn Parent>| TwoCtor { ctor: 2 })
    }
}

pub struct NoPublicCtor;

impl Injectable for NoPublicCtor {
    fn constructors() -> Constructors<Self> {
        Constructors::new().private(|| NoPublicCtor)
    }
}

/// Six bindings: three contracts, two concrete self-bindings and one contract that isn't a `Parent`.
pub fn register_all(container: &Container) {
    container
        .register_type::<dyn Parent, ParentImpl>(false)
        .unwrap()
        .register_type::<dyn Derived, DerivedImpl>(false)
        .unwrap()
        .register_self::<OtherDerived>(false)
        .unwrap()
        .register_type::<dyn Service1, Service1Impl>(false)
        .unwrap()
        .register_type::<dyn Service2, Service2Impl>(false)
        .unwrap()
        .register_self::<ComplexCtor>(false)
        .unwrap()
        .declare_base::<OtherDerived, dyn Parent>();
}

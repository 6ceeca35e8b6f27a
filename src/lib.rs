//! Thread-safe runtime service registry with constructor injection.
//!
//! Bindings go from a key type (usually a `dyn Contract`) to a pre-built instance, a factory or a concrete
//! [`Injectable`] type. Each key resolves to a single instance, created on first request and reused afterwards.
//!
//! ```rust
//! use sillon::{implements, Constructors, Container, Inject, Injectable};
//! use std::sync::Arc;
//!
//! trait Storage: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! struct Memory;
//!
//! impl Storage for Memory {
//!     fn name(&self) -> &'static str {
//!         "memory"
//!     }
//! }
//!
//! impl Injectable for Memory {
//!     fn constructors() -> Constructors<Self> {
//!         Constructors::new().public(|| Memory)
//!     }
//! }
//!
//! implements!(Memory: dyn Storage);
//!
//! struct Service {
//!     storage: Arc<dyn Storage>,
//! }
//!
//! impl Injectable for Service {
//!     fn constructors() -> Constructors<Self> {
//!         Constructors::new().public(|Inject(storage): Inject<dyn Storage>| Service { storage })
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .register_type::<dyn Storage, Memory>(false)?
//!     .register_self::<Service>(false)?;
//!
//! let service = container.get::<Service>()?.unwrap();
//! assert_eq!(service.storage.name(), "memory");
//! assert!(Arc::ptr_eq(&service, &container.get::<Service>()?.unwrap()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod cast;
pub(crate) mod config;
pub(crate) mod constructor;
pub(crate) mod container;
pub(crate) mod dependency;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod registry;

#[cfg(feature = "global")]
pub(crate) mod global;

pub use any::{Instance, TypeInfo};
pub use cast::Implements;
pub use config::{Config, ConstructorSelection};
pub use constructor::{Constructor, Constructors, Injectable, Visibility};
pub use container::{Container, ErasedFactory};
pub use dependency::Dependency;
pub use dependency_resolver::DependencyResolver;
pub use errors::{PlanErrorKind, RegisterErrorKind, ResolveErrorKind};
pub use inject::Inject;

#[cfg(feature = "global")]
pub use global::global;

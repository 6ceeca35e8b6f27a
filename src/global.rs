use once_cell::sync::Lazy;

use crate::Container;

static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Process-wide default container, created on first access with the default [`Config`](crate::Config).
#[inline]
#[must_use]
pub fn global() -> &'static Container {
    &GLOBAL_CONTAINER
}

/// Config for a container
/// ## Fields
/// - `constructor_selection`:
///   How a constructor is picked when a concrete type declares several public ones.
///   See [`ConstructorSelection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub constructor_selection: ConstructorSelection,
}

impl Config {
    /// Config that refuses to guess between several public constructors
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            constructor_selection: ConstructorSelection::RequireUnique,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConstructorSelection {
    /// The first public constructor in declaration order is used
    #[default]
    FirstDeclared,
    /// More than one public constructor is a planning error
    RequireUnique,
}

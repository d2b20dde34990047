//! Catalog registration errors.

use crate::TypeIdx;

/// Error raised while registering or constructing catalog types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A type with the same full name is already registered.
    #[error("type `{full_name}` is already registered")]
    DuplicateType { full_name: String },

    /// A handle does not refer to any type in this catalog.
    #[error("unknown type {0}")]
    UnknownType(TypeIdx),

    /// An `implements` clause names something that is not an interface.
    #[error("`{full_name}` is not an interface")]
    NotAnInterface { full_name: String },

    /// An `extends` clause names an interface.
    #[error("`{full_name}` cannot be used as a base class")]
    InvalidBase { full_name: String },

    /// `construct_generic` was called on a type without generic parameters.
    #[error("`{full_name}` is not a generic type definition")]
    NotGenericDefinition { full_name: String },

    /// Wrong number of type arguments for a generic definition.
    #[error("`{full_name}` expects {expected} type argument(s), found {found}")]
    GenericArity {
        full_name: String,
        expected: usize,
        found: usize,
    },

    /// The catalog ran out of 32-bit indices.
    #[error("type catalog exceeded u32::MAX - 1 types")]
    CapacityExceeded,
}

//! Synthesis errors.

use compose_types::{MemberId, TypeIdx};

/// Boxed error returned by a fallible configure function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error surfaced from a synthesis query.
///
/// None of these are cached; a later query for the same key runs again.
#[derive(Debug, thiserror::Error)]
pub enum ConventionError {
    /// The queried type is not in the engine's catalog.
    #[error("unknown type {0}")]
    UnknownType(TypeIdx),

    /// The member does not exist or is not declared on the queried type.
    #[error("member {member} is not declared on {ty}")]
    UnknownMember { ty: TypeIdx, member: MemberId },

    /// A configure function failed while synthesizing markers for a type.
    #[error("convention failed for `{type_name}`")]
    Configure {
        type_name: String,
        #[source]
        source: BoxError,
    },
}

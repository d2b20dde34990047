//! Host type model for convention-based composition.
//!
//! The convention engine needs type identity, names, the inheritance and
//! interface graph, and declared members. Rust has no runtime reflection for
//! any of that, so hosts describe their composable types once in a
//! [`TypeCatalog`] and refer to them by [`TypeIdx`].
//!
//! # Architecture
//!
//! ```text
//! TypeDef / MemberDef (registration input)
//!     └── TypeCatalog (entries, full-name index, constructed generics)
//!             └── TypeView / MemberView (borrowed read views)
//!     └── SharedCatalog (frozen, cloneable handle)
//! ```

mod catalog;
mod def;
mod error;
mod idx;
mod view;

pub use catalog::{MemberEntry, SharedCatalog, TypeCatalog, TypeEntry};
pub use def::{MemberDef, MemberKind, TypeDef, TypeKind, Visibility};
pub use error::CatalogError;
pub use idx::{MemberId, TypeIdx};
pub use view::{MemberView, TypeView};

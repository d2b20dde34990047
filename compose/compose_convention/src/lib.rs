//! Convention-based export synthesis.
//!
//! Register rules once ("for types matching P, export under contract C with
//! metadata M") and get the corresponding markers for every matching type,
//! without annotating the types themselves.
//!
//! # Architecture
//!
//! ```text
//! ConventionBuilder (append-only rules)
//!     └── PartConventionBuilder (one matcher, many rules)
//!             └── ExportBuilder (contract type/name, metadata; literal or fn(type))
//! SynthesisEngine (owns rules + SharedCatalog)
//!     └── descriptors_for(type, member) -> Arc<[Marker]>, cached per key
//! ```
//!
//! # Example
//!
//! ```
//! use compose_convention::{ConventionBuilder, SynthesisEngine, exports};
//! use compose_types::{TypeCatalog, TypeDef};
//!
//! let mut catalog = TypeCatalog::new();
//! let ifoo = catalog.register(TypeDef::interface("App", "IFoo")).unwrap();
//! let foo = catalog
//!     .register(TypeDef::class("App", "FooImpl").implements(ifoo))
//!     .unwrap();
//!
//! let mut conventions = ConventionBuilder::new();
//! conventions.for_types_derived_from(ifoo).export_with(move |e| {
//!     e.as_contract_name("hey").as_contract_type(ifoo);
//! });
//!
//! let engine = SynthesisEngine::new(conventions, catalog);
//! let markers = engine.type_descriptors(foo).unwrap();
//! let export = exports(&markers).next().unwrap();
//! assert_eq!(export.contract_type, Some(ifoo));
//! assert_eq!(export.contract_name.as_deref(), Some("hey"));
//! ```

mod builder;
mod config;
mod descriptor;
mod engine;
mod error;
mod matcher;
mod registry;
mod tracing_setup;

pub use builder::{ExportBuilder, TypeFn};
pub use config::EngineConfig;
pub use descriptor::{
    export_groups, exports, ExportDescriptor, Marker, MarkerKind, MetadataDescriptor,
    MetadataValue, SharedDescriptor,
};
pub use engine::SynthesisEngine;
pub use error::{BoxError, ConventionError};
pub use matcher::{MemberPredicate, TypeMatcher, TypePredicate};
pub use registry::{ConventionBuilder, PartConventionBuilder};
pub use tracing_setup::init_tracing;

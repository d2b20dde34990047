//! Property-based tests for synthesis.
//!
//! 1. Idempotence: repeated queries return equal marker lists
//! 2. Metadata with duplicate keys is kept, in call order
//! 3. Last contract name assignment wins

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use compose_convention::{
    ConventionBuilder, EngineConfig, Marker, MetadataValue, SynthesisEngine,
};
use compose_types::{TypeCatalog, TypeDef, TypeIdx};
use proptest::prelude::*;

fn catalog() -> (TypeCatalog, TypeIdx, TypeIdx) {
    let mut catalog = TypeCatalog::new();
    let iface = catalog
        .register(TypeDef::interface("Props", "IPart"))
        .expect("IPart");
    let part = catalog
        .register(TypeDef::class("Props", "Part").implements(iface))
        .expect("Part");
    (catalog, iface, part)
}

/// Metadata entries over a tiny key space so duplicates are common.
fn entries_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-c]", any::<i64>()), 0..12)
}

proptest! {
    #[test]
    fn duplicate_metadata_is_preserved(entries in entries_strategy()) {
        let (catalog, iface, part) = catalog();
        let recorded = entries.clone();
        let mut conventions = ConventionBuilder::new();
        conventions.for_types_derived_from(iface).export_with(move |e| {
            for (key, value) in &recorded {
                e.add_metadata(key.clone(), *value);
            }
        });
        let engine = SynthesisEngine::new(conventions, catalog);

        let markers = engine.type_descriptors(part).expect("synthesize");
        prop_assert_eq!(markers.len(), entries.len() + 1);
        prop_assert!(matches!(markers[0], Marker::Export(_)));
        for (marker, (key, value)) in markers[1..].iter().zip(&entries) {
            let Marker::ExportMetadata(meta) = marker else {
                return Err(TestCaseError::fail("expected export metadata"));
            };
            prop_assert_eq!(&meta.key, key);
            prop_assert_eq!(&meta.value, &MetadataValue::Int(*value));
        }
    }

    #[test]
    fn queries_are_idempotent(
        names in prop::collection::vec("[A-Za-z]{1,8}", 1..6),
        cache in any::<bool>(),
    ) {
        let (catalog, iface, part) = catalog();
        let mut conventions = ConventionBuilder::new();
        for name in names {
            conventions
                .for_types_derived_from(iface)
                .export_with(move |e| {
                    e.as_contract_name(name.clone())
                        .add_metadata_with("type", |t| t.full_name().to_owned());
                })
                .shared();
        }
        let engine = SynthesisEngine::with_config(
            conventions,
            catalog,
            EngineConfig::default().with_cache(cache),
        );

        let first = engine.type_descriptors(part).expect("first");
        let second = engine.type_descriptors(part).expect("second");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn last_contract_name_wins(names in prop::collection::vec("[a-z]{1,6}", 1..8)) {
        let (catalog, iface, part) = catalog();
        let expected = names.last().cloned();
        let mut conventions = ConventionBuilder::new();
        conventions.for_types_derived_from(iface).export_with(move |e| {
            for name in &names {
                e.as_contract_name(name.clone());
            }
        });
        let engine = SynthesisEngine::new(conventions, catalog);

        let exports = engine.exports_for(part).expect("synthesize");
        prop_assert_eq!(exports.len(), 1);
        prop_assert_eq!(exports[0].contract_name.clone(), expected);
    }
}

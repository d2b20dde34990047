use super::*;
use compose_types::{TypeCatalog, TypeDef};
use pretty_assertions::assert_eq;

fn catalog() -> (TypeCatalog, TypeIdx, TypeIdx) {
    let mut catalog = TypeCatalog::new();
    let ifoo = catalog
        .register(TypeDef::interface("Tests", "IFoo"))
        .expect("register IFoo");
    let foo = catalog
        .register(TypeDef::class("Tests", "FooImpl").implements(ifoo))
        .expect("register FooImpl");
    (catalog, ifoo, foo)
}

fn export(contract_type: Option<TypeIdx>, contract_name: Option<&str>) -> Marker {
    Marker::Export(ExportDescriptor {
        contract_type,
        contract_name: contract_name.map(str::to_owned),
    })
}

fn meta(key: &str, value: impl Into<MetadataValue>) -> Marker {
    Marker::ExportMetadata(MetadataDescriptor {
        key: key.to_owned(),
        value: value.into(),
    })
}

#[test]
fn empty_builder_yields_bare_export() {
    let (catalog, _, foo) = catalog();
    let view = catalog.view(foo).expect("view");
    assert_eq!(ExportBuilder::new().build(&view), vec![export(None, None)]);
}

#[test]
fn default_contract_only_fills_when_both_unset() {
    let (catalog, ifoo, foo) = catalog();
    let view = catalog.view(foo).expect("view");

    assert_eq!(
        ExportBuilder::new().materialize(&view, Some(foo)),
        vec![export(Some(foo), None)]
    );

    let mut named = ExportBuilder::new();
    named.as_contract_name("hey");
    assert_eq!(
        named.materialize(&view, Some(foo)),
        vec![export(None, Some("hey"))]
    );

    assert_eq!(
        ExportBuilder::for_contract(ifoo).materialize(&view, Some(foo)),
        vec![export(Some(ifoo), None)]
    );
}

#[test]
fn last_contract_assignment_wins() {
    let (catalog, ifoo, foo) = catalog();
    let view = catalog.view(foo).expect("view");

    let mut builder = ExportBuilder::new();
    builder
        .as_contract_name("first")
        .as_contract_type(foo)
        .as_contract_name("second")
        .as_contract_type_with(move |_| ifoo);

    assert_eq!(builder.build(&view), vec![export(Some(ifoo), Some("second"))]);
}

#[test]
fn computed_values_see_matched_type() {
    let (catalog, ifoo, foo) = catalog();
    let view = catalog.view(foo).expect("view");

    let mut builder = ExportBuilder::new();
    builder
        .as_contract_name_with(|t| format!("Contract:{}", t.full_name()))
        .as_contract_type(ifoo)
        .add_metadata_with("name", |t| t.name().to_owned());

    assert_eq!(
        builder.build(&view),
        vec![
            export(Some(ifoo), Some("Contract:Tests.FooImpl")),
            meta("name", "FooImpl"),
        ]
    );
}

#[test]
fn duplicate_metadata_keys_are_all_kept_in_order() {
    let (catalog, _, foo) = catalog();
    let view = catalog.view(foo).expect("view");

    let mut builder = ExportBuilder::new();
    builder
        .add_metadata("k", "v1")
        .add_metadata("other", true)
        .add_metadata("k", "v2");
    assert_eq!(builder.metadata_count(), 3);

    assert_eq!(
        builder.build(&view),
        vec![
            export(None, None),
            meta("k", "v1"),
            meta("other", true),
            meta("k", "v2"),
        ]
    );
}

#[test]
fn computed_values_run_once_per_build() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let (catalog, _, foo) = catalog();
    let view = catalog.view(foo).expect("view");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = ExportBuilder::new();
    builder.as_contract_name_with(move |t| {
        counter.fetch_add(1, Ordering::SeqCst);
        t.name().to_owned()
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    builder.build(&view);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

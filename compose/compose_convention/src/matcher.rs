//! Type and member matchers.
//!
//! Matchers are pure functions of the candidate. Constructed generics are
//! distinct identities for `Exact`; `DerivedFrom` an open generic definition
//! accepts any type built on a construction of it.

use std::fmt;
use std::sync::Arc;

use compose_types::{MemberView, TypeIdx, TypeView};

/// Caller-supplied type predicate.
pub type TypePredicate = Arc<dyn Fn(&TypeView<'_>) -> bool + Send + Sync>;

/// Caller-supplied member predicate.
pub type MemberPredicate = Arc<dyn Fn(&MemberView<'_>) -> bool + Send + Sync>;

/// Decides whether a convention applies to a type.
#[derive(Clone)]
pub enum TypeMatcher {
    /// Type identity equality.
    Exact(TypeIdx),

    /// The type itself, or anything inheriting from or implementing it,
    /// transitively.
    DerivedFrom(TypeIdx),

    Predicate(TypePredicate),
}

impl TypeMatcher {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&TypeView<'_>) -> bool + Send + Sync + 'static,
    {
        TypeMatcher::Predicate(Arc::new(f))
    }

    pub fn matches(&self, ty: &TypeView<'_>) -> bool {
        match self {
            TypeMatcher::Exact(target) => ty.idx() == *target,
            TypeMatcher::DerivedFrom(target) => {
                let catalog = ty.catalog();
                let open_generic = catalog
                    .get(*target)
                    .is_some_and(compose_types::TypeEntry::is_generic_definition);
                if open_generic {
                    catalog.derives_from_generic(ty.idx(), *target)
                } else {
                    catalog.is_assignable_to(ty.idx(), *target)
                }
            }
            TypeMatcher::Predicate(f) => f(ty),
        }
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatcher::Exact(idx) => write!(f, "Exact({idx:?})"),
            TypeMatcher::DerivedFrom(idx) => write!(f, "DerivedFrom({idx:?})"),
            TypeMatcher::Predicate(_) => write!(f, "Predicate(<fn>)"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests {
    use super::*;
    use compose_types::{TypeCatalog, TypeDef};

    struct Types {
        catalog: TypeCatalog,
        ifoo: TypeIdx,
        foo: TypeIdx,
        derived: TypeIdx,
        bar: TypeIdx,
        store: TypeIdx,
        foo_store: TypeIdx,
        store_impl: TypeIdx,
    }

    fn types() -> Types {
        let mut catalog = TypeCatalog::new();
        let ifoo = catalog
            .register(TypeDef::interface("T", "IFoo"))
            .expect("IFoo");
        let foo = catalog
            .register(TypeDef::class("T", "FooImpl").implements(ifoo))
            .expect("FooImpl");
        let derived = catalog
            .register(TypeDef::class("T", "DerivedFoo").extends(foo))
            .expect("DerivedFoo");
        let bar = catalog.register(TypeDef::class("T", "Bar")).expect("Bar");
        let store = catalog
            .register(TypeDef::interface("T", "IStore").generic_params(["T"]))
            .expect("IStore");
        let foo_store = catalog.construct_generic(store, &[foo]).expect("IStore<Foo>");
        let store_impl = catalog
            .register(TypeDef::class("T", "FooStore").implements(foo_store))
            .expect("FooStore");
        Types {
            catalog,
            ifoo,
            foo,
            derived,
            bar,
            store,
            foo_store,
            store_impl,
        }
    }

    fn matches(t: &Types, matcher: &TypeMatcher, ty: TypeIdx) -> bool {
        matcher.matches(&t.catalog.view(ty).expect("view"))
    }

    #[test]
    fn exact_matches_identity_only() {
        let t = types();
        let m = TypeMatcher::Exact(t.foo);
        assert!(matches(&t, &m, t.foo));
        assert!(!matches(&t, &m, t.derived));
        assert!(!matches(&t, &m, t.ifoo));
    }

    #[test]
    fn derived_from_is_transitive() {
        let t = types();
        let m = TypeMatcher::DerivedFrom(t.ifoo);
        assert!(matches(&t, &m, t.ifoo));
        assert!(matches(&t, &m, t.foo));
        assert!(matches(&t, &m, t.derived));
        assert!(!matches(&t, &m, t.bar));

        let by_class = TypeMatcher::DerivedFrom(t.foo);
        assert!(matches(&t, &by_class, t.derived));
        assert!(!matches(&t, &by_class, t.ifoo));
    }

    #[test]
    fn generic_identities() {
        let t = types();
        assert!(matches(&t, &TypeMatcher::DerivedFrom(t.store), t.store_impl));
        assert!(matches(&t, &TypeMatcher::DerivedFrom(t.foo_store), t.store_impl));
        assert!(!matches(&t, &TypeMatcher::DerivedFrom(t.store), t.foo));
        assert!(!matches(&t, &TypeMatcher::Exact(t.store), t.foo_store));
    }

    #[test]
    fn predicate_sees_view() {
        let t = types();
        let m = TypeMatcher::predicate(|ty| ty.name().ends_with("Impl"));
        assert!(matches(&t, &m, t.foo));
        assert!(!matches(&t, &m, t.bar));
        assert_eq!(format!("{m:?}"), "Predicate(<fn>)");
    }
}

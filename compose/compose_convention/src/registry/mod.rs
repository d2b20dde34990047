//! Convention registry.
//!
//! `ConventionBuilder` is an append-only list of rules. Each `for_*` call
//! returns a [`PartConventionBuilder`] bound to one matcher; every call on that
//! handle appends one independent rule. Nothing is validated here: a faulty
//! configure function fails when the engine runs it.
//!
//! # Architecture
//!
//! ```text
//! ConventionBuilder
//!     └── Rule { matcher, action }
//!             ├── Export            (type-level export group)
//!             ├── ExportInterfaces  (one group per implemented interface)
//!             ├── ExportMember      (member-level export group)
//!             ├── PartMetadata
//!             └── Shared
//! ```

use std::fmt;
use std::sync::Arc;

use compose_types::{MemberView, TypeIdx, TypeView};

use crate::builder::{ExportBuilder, Source};
use crate::error::BoxError;
use crate::matcher::{MemberPredicate, TypeMatcher, TypePredicate};
use crate::MetadataValue;

/// Type-level configure function.
pub(crate) type Configure =
    Arc<dyn Fn(&mut ExportBuilder, &TypeView<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Member-level configure function.
pub(crate) type MemberConfigure =
    Arc<dyn Fn(&MemberView<'_>, &mut ExportBuilder) -> Result<(), BoxError> + Send + Sync>;

/// One registered convention.
pub(crate) struct Rule {
    pub(crate) matcher: TypeMatcher,
    pub(crate) action: RuleAction,
}

pub(crate) enum RuleAction {
    Export(Configure),
    ExportInterfaces {
        filter: TypePredicate,
        configure: Configure,
    },
    ExportMember {
        filter: MemberPredicate,
        configure: MemberConfigure,
    },
    PartMetadata {
        key: String,
        value: Source<MetadataValue>,
    },
    Shared {
        boundary: Option<String>,
    },
}

impl RuleAction {
    /// Member rules only answer member-scoped queries.
    #[inline]
    pub(crate) fn is_member_rule(&self) -> bool {
        matches!(self, RuleAction::ExportMember { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            RuleAction::Export(_) => "export",
            RuleAction::ExportInterfaces { .. } => "export_interfaces",
            RuleAction::ExportMember { .. } => "export_member",
            RuleAction::PartMetadata { .. } => "part_metadata",
            RuleAction::Shared { .. } => "shared",
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {}", self.matcher, self.action.label())
    }
}

/// Ordered collection of conventions.
#[derive(Debug, Default)]
pub struct ConventionBuilder {
    rules: Vec<Rule>,
}

impl ConventionBuilder {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventions for exactly `ty`.
    pub fn for_type(&mut self, ty: TypeIdx) -> PartConventionBuilder<'_> {
        self.scoped(TypeMatcher::Exact(ty))
    }

    /// Conventions for `ty` and every type inheriting from or implementing it.
    pub fn for_types_derived_from(&mut self, ty: TypeIdx) -> PartConventionBuilder<'_> {
        self.scoped(TypeMatcher::DerivedFrom(ty))
    }

    /// Conventions for every type the predicate accepts.
    pub fn for_types_matching<F>(&mut self, predicate: F) -> PartConventionBuilder<'_>
    where
        F: Fn(&TypeView<'_>) -> bool + Send + Sync + 'static,
    {
        self.scoped(TypeMatcher::predicate(predicate))
    }

    /// Conventions for types accepted by an existing matcher.
    pub fn scoped(&mut self, matcher: TypeMatcher) -> PartConventionBuilder<'_> {
        PartConventionBuilder {
            conventions: self,
            matcher,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    fn push(&mut self, matcher: TypeMatcher, action: RuleAction) {
        tracing::trace!(?matcher, action = action.label(), "register convention");
        self.rules.push(Rule { matcher, action });
    }
}

/// Registration handle bound to one matcher.
pub struct PartConventionBuilder<'a> {
    conventions: &'a mut ConventionBuilder,
    matcher: TypeMatcher,
}

impl PartConventionBuilder<'_> {
    fn add(&mut self, action: RuleAction) -> &mut Self {
        self.conventions.push(self.matcher.clone(), action);
        self
    }

    /// Export matching types under their own type.
    pub fn export(&mut self) -> &mut Self {
        self.add(RuleAction::Export(Arc::new(
            |_: &mut ExportBuilder, _: &TypeView<'_>| -> Result<(), BoxError> { Ok(()) },
        )))
    }

    /// Export matching types under `contract_type`.
    pub fn export_as(&mut self, contract_type: TypeIdx) -> &mut Self {
        self.export_with(move |e| {
            e.as_contract_type(contract_type);
        })
    }

    /// Export matching types, configured by `configure`.
    pub fn export_with<F>(&mut self, configure: F) -> &mut Self
    where
        F: Fn(&mut ExportBuilder) + Send + Sync + 'static,
    {
        self.add(RuleAction::Export(Arc::new(
            move |builder: &mut ExportBuilder, _: &TypeView<'_>| -> Result<(), BoxError> {
                configure(builder);
                Ok(())
            },
        )))
    }

    /// Export matching types with a configure function that sees the matched
    /// type and may fail.
    pub fn try_export<F, E>(&mut self, configure: F) -> &mut Self
    where
        F: Fn(&mut ExportBuilder, &TypeView<'_>) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.add(RuleAction::Export(Arc::new(
            move |builder: &mut ExportBuilder, ty: &TypeView<'_>| -> Result<(), BoxError> {
                configure(builder, ty).map_err(Into::into)
            },
        )))
    }

    /// Export matching types under every interface they implement.
    pub fn export_interfaces(&mut self) -> &mut Self {
        self.export_interfaces_with(|_| true, |_| {})
    }

    /// Export matching types under each implemented interface accepted by
    /// `filter`. Each export's contract type starts out as the interface.
    pub fn export_interfaces_with<P, F>(&mut self, filter: P, configure: F) -> &mut Self
    where
        P: Fn(&TypeView<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&mut ExportBuilder) + Send + Sync + 'static,
    {
        self.add(RuleAction::ExportInterfaces {
            filter: Arc::new(filter),
            configure: Arc::new(
                move |builder: &mut ExportBuilder, _: &TypeView<'_>| -> Result<(), BoxError> {
                    configure(builder);
                    Ok(())
                },
            ),
        })
    }

    /// Export the declared members accepted by `filter`.
    ///
    /// Applies to member-scoped queries. Builder functions are evaluated
    /// against the member's type.
    pub fn export_members<P, F>(&mut self, filter: P, configure: F) -> &mut Self
    where
        P: Fn(&MemberView<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&MemberView<'_>, &mut ExportBuilder) + Send + Sync + 'static,
    {
        self.add(RuleAction::ExportMember {
            filter: Arc::new(filter),
            configure: Arc::new(
                move |member: &MemberView<'_>,
                      builder: &mut ExportBuilder|
                      -> Result<(), BoxError> {
                    configure(member, builder);
                    Ok(())
                },
            ),
        })
    }

    /// Mark matching parts as shared.
    pub fn shared(&mut self) -> &mut Self {
        self.add(RuleAction::Shared { boundary: None })
    }

    /// Mark matching parts as shared within the named boundary.
    pub fn shared_boundary(&mut self, boundary: impl Into<String>) -> &mut Self {
        self.add(RuleAction::Shared {
            boundary: Some(boundary.into()),
        })
    }

    pub fn add_part_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> &mut Self {
        self.add(RuleAction::PartMetadata {
            key: key.into(),
            value: Source::Literal(value.into()),
        })
    }

    pub fn add_part_metadata_with<F, V>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&TypeView<'_>) -> V + Send + Sync + 'static,
        V: Into<MetadataValue>,
    {
        self.add(RuleAction::PartMetadata {
            key: key.into(),
            value: Source::Computed(Arc::new(
                move |ty: &TypeView<'_>| -> MetadataValue { f(ty).into() },
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_call_appends_one_rule() {
        let ty = TypeIdx::from_raw(1);
        let mut conventions = ConventionBuilder::new();
        assert!(conventions.is_empty());

        conventions
            .for_types_derived_from(ty)
            .export()
            .export_with(|e| {
                e.as_contract_name("x");
            })
            .shared();
        conventions.for_type(ty).add_part_metadata("k", 1);

        assert_eq!(conventions.len(), 4);
        let labels: Vec<_> = conventions
            .into_rules()
            .iter()
            .map(|r| format!("{r:?}"))
            .collect();
        assert_eq!(
            labels,
            vec![
                "DerivedFrom(TypeIdx(1)) => export",
                "DerivedFrom(TypeIdx(1)) => export",
                "DerivedFrom(TypeIdx(1)) => shared",
                "Exact(TypeIdx(1)) => part_metadata",
            ]
        );
    }

    #[test]
    fn member_rules_are_flagged() {
        let mut conventions = ConventionBuilder::new();
        conventions
            .for_types_matching(|_| true)
            .export_members(|_| true, |_, _| {})
            .export_interfaces();
        let rules = conventions.into_rules();
        assert!(rules[0].action.is_member_rule());
        assert!(!rules[1].action.is_member_rule());
    }
}

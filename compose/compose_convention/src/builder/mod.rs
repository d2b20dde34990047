//! Fluent export builder.
//!
//! An `ExportBuilder` collects the pending state of one export rule
//! invocation. Values are either literals or functions of the matched type;
//! functions run once, when the builder is materialized.
//!
//! Materialization order is fixed: the export descriptor first, then one
//! metadata descriptor per `add_metadata*` call in call order. Consumers index
//! marker lists positionally, so this order must not change.

use std::fmt;
use std::sync::Arc;

use compose_types::{TypeIdx, TypeView};

use crate::descriptor::{ExportDescriptor, Marker, MetadataDescriptor, MetadataValue};

/// A value computed from the matched type.
pub type TypeFn<T> = Arc<dyn Fn(&TypeView<'_>) -> T + Send + Sync>;

/// Literal or deferred value.
#[derive(Clone)]
pub(crate) enum Source<T> {
    Literal(T),
    Computed(TypeFn<T>),
}

impl<T: Clone> Source<T> {
    pub(crate) fn resolve(&self, ty: &TypeView<'_>) -> T {
        match self {
            Source::Literal(value) => value.clone(),
            Source::Computed(f) => f(ty),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Literal(value) => value.fmt(f),
            Source::Computed(_) => write!(f, "<fn(type)>"),
        }
    }
}

/// Pending configuration for one export.
#[derive(Clone, Debug, Default)]
pub struct ExportBuilder {
    contract_type: Option<Source<TypeIdx>>,
    contract_name: Option<Source<String>>,
    metadata: Vec<(String, Source<MetadataValue>)>,
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with the contract type already assigned.
    pub(crate) fn for_contract(contract_type: TypeIdx) -> Self {
        Self {
            contract_type: Some(Source::Literal(contract_type)),
            ..Self::default()
        }
    }

    /// Export under `ty`. Replaces any earlier contract type.
    pub fn as_contract_type(&mut self, ty: TypeIdx) -> &mut Self {
        self.contract_type = Some(Source::Literal(ty));
        self
    }

    /// Export under a contract type computed from the matched type.
    pub fn as_contract_type_with<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TypeView<'_>) -> TypeIdx + Send + Sync + 'static,
    {
        self.contract_type = Some(Source::Computed(Arc::new(f)));
        self
    }

    /// Export under `name`. Replaces any earlier contract name.
    pub fn as_contract_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.contract_name = Some(Source::Literal(name.into()));
        self
    }

    /// Export under a contract name computed from the matched type.
    pub fn as_contract_name_with<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TypeView<'_>) -> String + Send + Sync + 'static,
    {
        self.contract_name = Some(Source::Computed(Arc::new(f)));
        self
    }

    /// Append a metadata entry. Earlier entries with the same key are kept.
    pub fn add_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> &mut Self {
        self.metadata
            .push((key.into(), Source::Literal(value.into())));
        self
    }

    /// Append a metadata entry whose value is computed from the matched type.
    pub fn add_metadata_with<F, V>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&TypeView<'_>) -> V + Send + Sync + 'static,
        V: Into<MetadataValue>,
    {
        let f: TypeFn<MetadataValue> =
            Arc::new(move |ty: &TypeView<'_>| -> MetadataValue { f(ty).into() });
        self.metadata.push((key.into(), Source::Computed(f)));
        self
    }

    #[inline]
    pub fn metadata_count(&self) -> usize {
        self.metadata.len()
    }

    /// Materialize against `matched`: the export, then its metadata.
    pub fn build(self, matched: &TypeView<'_>) -> Vec<Marker> {
        self.materialize(matched, None)
    }

    /// Like `build`, but an export with neither contract type nor name gets
    /// `default_contract` as its contract type.
    pub(crate) fn materialize(
        self,
        matched: &TypeView<'_>,
        default_contract: Option<TypeIdx>,
    ) -> Vec<Marker> {
        let mut export = ExportDescriptor {
            contract_type: self.contract_type.map(|s| s.resolve(matched)),
            contract_name: self.contract_name.map(|s| s.resolve(matched)),
        };
        if export.contract_type.is_none() && export.contract_name.is_none() {
            export.contract_type = default_contract;
        }

        let mut markers = Vec::with_capacity(1 + self.metadata.len());
        markers.push(Marker::Export(export));
        markers.extend(self.metadata.into_iter().map(|(key, value)| {
            Marker::ExportMetadata(MetadataDescriptor {
                key,
                value: value.resolve(matched),
            })
        }));
        markers
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;

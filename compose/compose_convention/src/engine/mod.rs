//! Synthesis engine.
//!
//! Answers "which markers does this type (or member) carry by convention".
//! Rules run in registration order; each matching rule contributes its
//! markers as one contiguous group. Results are cached per `(type, member)`.
//!
//! # Concurrency
//!
//! The engine takes ownership of the `ConventionBuilder`, so registration is
//! closed before the first query. The cache is the only shared mutable
//! state: lookups take a read lock, synthesis runs without any lock held, and
//! the insert keeps whichever result was stored first. Rules are
//! deterministic, so racing writers store equal values.

use std::fmt;
use std::sync::Arc;

use compose_types::{MemberId, MemberView, SharedCatalog, TypeIdx, TypeView};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builder::ExportBuilder;
use crate::config::EngineConfig;
use crate::descriptor::{
    exports, ExportDescriptor, Marker, MetadataDescriptor, SharedDescriptor,
};
use crate::error::{BoxError, ConventionError};
use crate::registry::{ConventionBuilder, Rule, RuleAction};

type CacheKey = (TypeIdx, Option<MemberId>);

/// Computes and caches convention markers for catalog types.
pub struct SynthesisEngine {
    rules: Vec<Rule>,
    catalog: SharedCatalog,
    config: EngineConfig,
    cache: RwLock<FxHashMap<CacheKey, Arc<[Marker]>>>,
}

impl SynthesisEngine {
    /// Close `conventions` for registration and serve queries against `catalog`.
    pub fn new(conventions: ConventionBuilder, catalog: impl Into<SharedCatalog>) -> Self {
        Self::with_config(conventions, catalog, EngineConfig::default())
    }

    pub fn with_config(
        conventions: ConventionBuilder,
        catalog: impl Into<SharedCatalog>,
        config: EngineConfig,
    ) -> Self {
        let rules = conventions.into_rules();
        tracing::debug!(rules = rules.len(), ?config, "synthesis engine ready");
        Self {
            rules,
            catalog: catalog.into(),
            config,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    #[inline]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[inline]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of cached `(type, member)` results.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Markers for `ty`, or for one of its declared members.
    ///
    /// Type-scoped queries (`member == None`) run type rules; member-scoped
    /// queries run member rules. A type no rule matches yields an empty list.
    /// Failures are returned as-is and never cached.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %ty, member = ?member))]
    pub fn descriptors_for(
        &self,
        ty: TypeIdx,
        member: Option<MemberId>,
    ) -> Result<Arc<[Marker]>, ConventionError> {
        let key = (ty, member);
        if self.config.cache_results {
            if let Some(hit) = self.cache.read().get(&key) {
                tracing::debug!(len = hit.len(), "cache hit");
                return Ok(Arc::clone(hit));
            }
        }

        let markers: Arc<[Marker]> = match member {
            None => self.synthesize_type(ty)?,
            Some(member) => self.synthesize_member(ty, member)?,
        }
        .into();

        if !self.config.cache_results {
            return Ok(markers);
        }
        let mut cache = self.cache.write();
        let stored = cache.entry(key).or_insert(markers);
        tracing::debug!(len = stored.len(), "cached markers");
        Ok(Arc::clone(stored))
    }

    /// Markers for `ty` itself.
    pub fn type_descriptors(&self, ty: TypeIdx) -> Result<Arc<[Marker]>, ConventionError> {
        self.descriptors_for(ty, None)
    }

    /// Markers for a declared member.
    pub fn member_descriptors(&self, member: MemberId) -> Result<Arc<[Marker]>, ConventionError> {
        self.descriptors_for(member.owner, Some(member))
    }

    /// Just the export descriptors for `ty`, in order.
    pub fn exports_for(&self, ty: TypeIdx) -> Result<Vec<ExportDescriptor>, ConventionError> {
        Ok(exports(&self.type_descriptors(ty)?).cloned().collect())
    }

    fn synthesize_type(&self, ty: TypeIdx) -> Result<Vec<Marker>, ConventionError> {
        let view = self
            .catalog
            .view(ty)
            .ok_or(ConventionError::UnknownType(ty))?;
        let default_contract = self.default_contract(ty);
        let mut markers = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.action.is_member_rule() || !rule.matcher.matches(&view) {
                continue;
            }
            tracing::trace!(rule = index, ?rule, "convention matched");

            match &rule.action {
                RuleAction::Export(configure) => {
                    let mut builder = ExportBuilder::new();
                    configure(&mut builder, &view).map_err(|e| configure_failed(&view, e))?;
                    markers.extend(builder.materialize(&view, default_contract));
                }
                RuleAction::ExportInterfaces { filter, configure } => {
                    for interface in self.catalog.all_interfaces(ty) {
                        let Some(interface_view) = self.catalog.view(interface) else {
                            continue;
                        };
                        if !filter(&interface_view) {
                            continue;
                        }
                        let mut builder = ExportBuilder::for_contract(interface);
                        configure(&mut builder, &view).map_err(|e| configure_failed(&view, e))?;
                        markers.extend(builder.materialize(&view, default_contract));
                    }
                }
                RuleAction::PartMetadata { key, value } => {
                    markers.push(Marker::PartMetadata(MetadataDescriptor {
                        key: key.clone(),
                        value: value.resolve(&view),
                    }));
                }
                RuleAction::Shared { boundary } => {
                    markers.push(Marker::Shared(SharedDescriptor {
                        boundary: boundary.clone(),
                    }));
                }
                RuleAction::ExportMember { .. } => {}
            }
        }

        Ok(markers)
    }

    fn synthesize_member(
        &self,
        ty: TypeIdx,
        member: MemberId,
    ) -> Result<Vec<Marker>, ConventionError> {
        let view = self
            .catalog
            .view(ty)
            .ok_or(ConventionError::UnknownType(ty))?;
        let member_view = MemberView::resolve(&self.catalog, member)
            .filter(|m| m.id().owner == ty)
            .ok_or(ConventionError::UnknownMember { ty, member })?;
        let member_ty = member_view
            .ty_view()
            .ok_or(ConventionError::UnknownType(member_view.ty()))?;
        let default_contract = self.default_contract(member_ty.idx());
        let mut markers = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            let RuleAction::ExportMember { filter, configure } = &rule.action else {
                continue;
            };
            if !rule.matcher.matches(&view) || !filter(&member_view) {
                continue;
            }
            tracing::trace!(rule = index, member = member_view.name(), "member convention matched");

            let mut builder = ExportBuilder::new();
            configure(&member_view, &mut builder).map_err(|e| configure_failed(&view, e))?;
            markers.extend(builder.materialize(&member_ty, default_contract));
        }

        Ok(markers)
    }

    #[inline]
    fn default_contract(&self, exporting: TypeIdx) -> Option<TypeIdx> {
        self.config.infer_contract_type.then_some(exporting)
    }
}

fn configure_failed(ty: &TypeView<'_>, source: BoxError) -> ConventionError {
    tracing::debug!(ty = ty.full_name(), error = %source, "configure function failed");
    ConventionError::Configure {
        type_name: ty.full_name().to_owned(),
        source,
    }
}

impl fmt::Debug for SynthesisEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisEngine")
            .field("rules", &self.rules)
            .field("types", &self.catalog.len())
            .field("config", &self.config)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

//! Catalog of host types.
//!
//! The `TypeCatalog` is the introspection source the convention engine
//! matches against: identity, names, base class, interfaces, generic shape
//! and declared members.
//!
//! # Design
//!
//! - Entries stored in one `Vec`, indexed by `TypeIdx`
//! - Full name index in a `BTreeMap` for deterministic iteration
//! - Constructed generics interned by `(definition, args)` so identity is stable
//! - Hierarchy walks are breadth-first with cycle protection

use std::collections::{BTreeMap, VecDeque};
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::def::{MemberKind, TypeDef, TypeKind, Visibility};
use crate::{CatalogError, MemberId, TypeIdx, TypeView};

/// Registry of host types.
#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    /// All registered types; `TypeIdx` is the position in this list.
    types: Vec<TypeEntry>,

    /// Full name → index (`BTreeMap` for deterministic iteration).
    by_full_name: BTreeMap<String, TypeIdx>,

    /// `(definition, args)` → constructed generic index.
    constructed: FxHashMap<(TypeIdx, SmallVec<[TypeIdx; 2]>), TypeIdx>,
}

/// A registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    pub idx: TypeIdx,

    /// Simple name, e.g. `FooImpl`.
    pub name: String,

    /// Dotted namespace; empty for the root namespace.
    pub namespace: String,

    /// Namespace-qualified name. Open generic definitions carry their arity,
    /// e.g. ``Data.Repo`1``; constructed generics render their arguments,
    /// e.g. `Data.Repo<Model.User>`.
    pub full_name: String,

    pub kind: TypeKind,

    /// Direct base class.
    pub base: Option<TypeIdx>,

    /// Directly implemented interfaces, in declaration order.
    pub interfaces: SmallVec<[TypeIdx; 4]>,

    /// Generic parameter names. Non-empty only on open generic definitions.
    pub generic_params: Vec<String>,

    /// For constructed generics: the open definition they were built from.
    pub generic_definition: Option<TypeIdx>,

    /// For constructed generics: the type arguments.
    pub type_args: SmallVec<[TypeIdx; 2]>,

    /// Declared members, in declaration order.
    pub members: Vec<MemberEntry>,
}

impl TypeEntry {
    #[inline]
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty()
    }

    #[inline]
    pub fn is_constructed_generic(&self) -> bool {
        self.generic_definition.is_some()
    }
}

/// A declared member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberEntry {
    pub id: MemberId,
    pub name: String,
    pub kind: MemberKind,

    /// Field/property type, or method return type.
    pub ty: TypeIdx,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl TypeCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type definition.
    ///
    /// Base class and interfaces must already be registered.
    pub fn register(&mut self, def: TypeDef) -> Result<TypeIdx, CatalogError> {
        let full_name = qualify(&def.namespace, &def.name, &def.generic_params);
        if self.by_full_name.contains_key(&full_name) {
            return Err(CatalogError::DuplicateType { full_name });
        }

        if let Some(base) = def.base {
            let base_entry = self.entry(base)?;
            if base_entry.kind != TypeKind::Class || def.kind != TypeKind::Class {
                return Err(CatalogError::InvalidBase {
                    full_name: base_entry.full_name.clone(),
                });
            }
        }
        for &interface in &def.interfaces {
            let entry = self.entry(interface)?;
            if entry.kind != TypeKind::Interface {
                return Err(CatalogError::NotAnInterface {
                    full_name: entry.full_name.clone(),
                });
            }
        }

        let idx = self.next_idx()?;
        let mut members = Vec::with_capacity(def.members.len());
        for (local, member) in (0u32..).zip(def.members) {
            let ty = match member.kind {
                MemberKind::Constructor if member.ty.is_none() => idx,
                _ => {
                    self.entry(member.ty)?;
                    member.ty
                }
            };
            members.push(MemberEntry {
                id: MemberId::new(idx, local),
                name: member.name,
                kind: member.kind,
                ty,
                is_static: member.is_static,
                visibility: member.visibility,
            });
        }

        self.by_full_name.insert(full_name.clone(), idx);
        self.types.push(TypeEntry {
            idx,
            name: def.name,
            namespace: def.namespace,
            full_name,
            kind: def.kind,
            base: def.base,
            interfaces: def.interfaces,
            generic_params: def.generic_params,
            generic_definition: None,
            type_args: SmallVec::new(),
            members,
        });
        Ok(idx)
    }

    /// Construct (or look up) a generic instantiation.
    ///
    /// Calling this twice with the same definition and arguments returns the
    /// same index. The constructed type shares its definition's base class,
    /// interfaces and member declarations.
    pub fn construct_generic(
        &mut self,
        definition: TypeIdx,
        args: &[TypeIdx],
    ) -> Result<TypeIdx, CatalogError> {
        let key = (definition, SmallVec::from_slice(args));
        if let Some(&existing) = self.constructed.get(&key) {
            return Ok(existing);
        }

        let def_entry = self.entry(definition)?;
        if !def_entry.is_generic_definition() {
            return Err(CatalogError::NotGenericDefinition {
                full_name: def_entry.full_name.clone(),
            });
        }
        if def_entry.generic_params.len() != args.len() {
            return Err(CatalogError::GenericArity {
                full_name: def_entry.full_name.clone(),
                expected: def_entry.generic_params.len(),
                found: args.len(),
            });
        }

        let mut arg_names = Vec::with_capacity(args.len());
        for &arg in args {
            arg_names.push(self.entry(arg)?.full_name.as_str());
        }
        let prefix = if def_entry.namespace.is_empty() {
            def_entry.name.clone()
        } else {
            format!("{}.{}", def_entry.namespace, def_entry.name)
        };
        let full_name = format!("{prefix}<{}>", arg_names.join(", "));
        if self.by_full_name.contains_key(&full_name) {
            return Err(CatalogError::DuplicateType { full_name });
        }

        let idx = self.next_idx()?;
        let def_entry = &self.types[definition.slot()];
        let members = def_entry
            .members
            .iter()
            .map(|m| MemberEntry {
                id: MemberId::new(idx, m.id.local),
                ty: if m.kind == MemberKind::Constructor {
                    idx
                } else {
                    m.ty
                },
                ..m.clone()
            })
            .collect();
        let entry = TypeEntry {
            idx,
            name: def_entry.name.clone(),
            namespace: def_entry.namespace.clone(),
            full_name: full_name.clone(),
            kind: def_entry.kind,
            base: def_entry.base,
            interfaces: def_entry.interfaces.clone(),
            generic_params: Vec::new(),
            generic_definition: Some(definition),
            type_args: key.1.clone(),
            members,
        };

        self.by_full_name.insert(full_name, idx);
        self.constructed.insert(key, idx);
        self.types.push(entry);
        Ok(idx)
    }

    fn next_idx(&self) -> Result<TypeIdx, CatalogError> {
        match u32::try_from(self.types.len()) {
            Ok(raw) if raw != u32::MAX => Ok(TypeIdx::from_raw(raw)),
            _ => Err(CatalogError::CapacityExceeded),
        }
    }

    // === Lookup ===

    /// Look up a type entry.
    #[inline]
    pub fn get(&self, idx: TypeIdx) -> Option<&TypeEntry> {
        self.types.get(idx.slot())
    }

    /// Look up a type entry, failing with `UnknownType`.
    #[inline]
    pub fn entry(&self, idx: TypeIdx) -> Result<&TypeEntry, CatalogError> {
        self.get(idx).ok_or(CatalogError::UnknownType(idx))
    }

    /// Borrowed view of a type, for predicates and builder functions.
    #[inline]
    pub fn view(&self, idx: TypeIdx) -> Option<TypeView<'_>> {
        self.get(idx).map(|entry| TypeView::new(self, entry))
    }

    /// Find a type by its full name.
    #[inline]
    pub fn lookup(&self, full_name: &str) -> Option<TypeIdx> {
        self.by_full_name.get(full_name).copied()
    }

    #[inline]
    pub fn full_name(&self, idx: TypeIdx) -> Option<&str> {
        self.get(idx).map(|e| e.full_name.as_str())
    }

    #[inline]
    pub fn contains(&self, idx: TypeIdx) -> bool {
        idx.slot() < self.types.len()
    }

    /// Look up a member by identity.
    pub fn member(&self, id: MemberId) -> Option<&MemberEntry> {
        let local = usize::try_from(id.local).ok()?;
        self.get(id.owner)?.members.get(local)
    }

    /// Declared members of a type, empty for unknown types.
    pub fn members(&self, idx: TypeIdx) -> &[MemberEntry] {
        self.get(idx)
            .map(|e| e.members.as_slice())
            .unwrap_or(&[])
    }

    /// Find a declared member by name.
    pub fn member_by_name(&self, idx: TypeIdx, name: &str) -> Option<MemberId> {
        self.members(idx)
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
    }

    // === Hierarchy Queries ===

    /// Base classes from the direct parent upwards. Excludes `idx` itself.
    pub fn base_chain(&self, idx: TypeIdx) -> Vec<TypeIdx> {
        let mut chain = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(idx);
        let mut current = self.get(idx).and_then(|e| e.base);
        while let Some(base) = current {
            if !visited.insert(base) {
                break;
            }
            chain.push(base);
            current = self.get(base).and_then(|e| e.base);
        }
        chain
    }

    /// All interfaces `idx` implements, transitively.
    ///
    /// Breadth-first: direct interfaces, then those inherited through base
    /// classes, then interfaces extended by any of those. De-duplicated. For
    /// an interface, the interface itself is not included.
    pub fn all_interfaces(&self, idx: TypeIdx) -> Vec<TypeIdx> {
        let mut visited = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        let seeds = std::iter::once(idx).chain(self.base_chain(idx));
        for ty in seeds {
            if let Some(entry) = self.get(ty) {
                for &interface in &entry.interfaces {
                    if interface != idx && visited.insert(interface) {
                        queue.push_back(interface);
                    }
                }
            }
        }

        while let Some(interface) = queue.pop_front() {
            result.push(interface);
            if let Some(entry) = self.get(interface) {
                for &parent in &entry.interfaces {
                    if parent != idx && visited.insert(parent) {
                        queue.push_back(parent);
                    }
                }
            }
        }

        result
    }

    /// Check if `candidate` is `target`, inherits from it, or implements it.
    pub fn is_assignable_to(&self, candidate: TypeIdx, target: TypeIdx) -> bool {
        if candidate == target {
            return true;
        }
        let Some(target_entry) = self.get(target) else {
            return false;
        };
        match target_entry.kind {
            TypeKind::Interface => self.all_interfaces(candidate).contains(&target),
            TypeKind::Class => self.base_chain(candidate).contains(&target),
            TypeKind::Struct => false,
        }
    }

    /// Check if `candidate` is, inherits from, or implements a construction of
    /// the open generic `definition`.
    pub fn derives_from_generic(&self, candidate: TypeIdx, definition: TypeIdx) -> bool {
        let is_construction = |ty: TypeIdx| {
            ty == definition
                || self
                    .get(ty)
                    .is_some_and(|e| e.generic_definition == Some(definition))
        };
        std::iter::once(candidate)
            .chain(self.base_chain(candidate))
            .chain(self.all_interfaces(candidate))
            .any(is_construction)
    }

    // === Iteration ===

    /// Iterate over all types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn qualify(namespace: &str, name: &str, generic_params: &[String]) -> String {
    let mut full = if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}.{name}")
    };
    if !generic_params.is_empty() {
        full.push('`');
        full.push_str(&generic_params.len().to_string());
    }
    full
}

/// Shared catalog for handing one read-only catalog to several owners.
///
/// The catalog is built mutably, then frozen into a `SharedCatalog`; every
/// clone points at the same data.
#[derive(Clone, Debug)]
pub struct SharedCatalog(Arc<TypeCatalog>);

impl SharedCatalog {
    pub fn new(catalog: TypeCatalog) -> Self {
        SharedCatalog(Arc::new(catalog))
    }
}

impl From<TypeCatalog> for SharedCatalog {
    fn from(catalog: TypeCatalog) -> Self {
        Self::new(catalog)
    }
}

impl Deref for SharedCatalog {
    type Target = TypeCatalog;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

//! Borrowed read views over catalog entries.
//!
//! Predicates and builder functions receive a `TypeView` or `MemberView`
//! instead of raw entries so they can walk the hierarchy without holding the
//! catalog separately.

use std::fmt;

use crate::catalog::{MemberEntry, TypeCatalog, TypeEntry};
use crate::def::{MemberKind, TypeKind, Visibility};
use crate::{MemberId, TypeIdx};

/// A type in its catalog.
#[derive(Copy, Clone)]
pub struct TypeView<'a> {
    catalog: &'a TypeCatalog,
    entry: &'a TypeEntry,
}

impl<'a> TypeView<'a> {
    pub(crate) fn new(catalog: &'a TypeCatalog, entry: &'a TypeEntry) -> Self {
        Self { catalog, entry }
    }

    #[inline]
    pub fn idx(&self) -> TypeIdx {
        self.entry.idx
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    #[inline]
    pub fn namespace(&self) -> &'a str {
        &self.entry.namespace
    }

    #[inline]
    pub fn full_name(&self) -> &'a str {
        &self.entry.full_name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.entry.kind
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.entry.kind == TypeKind::Interface
    }

    #[inline]
    pub fn entry(&self) -> &'a TypeEntry {
        self.entry
    }

    #[inline]
    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    pub fn base(&self) -> Option<TypeView<'a>> {
        self.entry.base.and_then(|b| self.catalog.view(b))
    }

    /// Directly declared interfaces.
    pub fn interfaces(&self) -> impl Iterator<Item = TypeView<'a>> + 'a {
        let catalog = self.catalog;
        let entry = self.entry;
        entry
            .interfaces
            .iter()
            .filter_map(move |&i| catalog.view(i))
    }

    /// True for open generic definitions and constructed generics.
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.entry.is_generic_definition() || self.entry.is_constructed_generic()
    }

    #[inline]
    pub fn generic_definition(&self) -> Option<TypeIdx> {
        self.entry.generic_definition
    }

    #[inline]
    pub fn type_args(&self) -> &'a [TypeIdx] {
        &self.entry.type_args
    }

    pub fn is_assignable_to(&self, target: TypeIdx) -> bool {
        self.catalog.is_assignable_to(self.entry.idx, target)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberView<'a>> + 'a {
        let catalog = self.catalog;
        let entry = self.entry;
        entry
            .members
            .iter()
            .map(move |entry| MemberView { catalog, entry })
    }
}

impl fmt::Debug for TypeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.entry.idx, self.entry.full_name)
    }
}

/// A declared member in its catalog.
#[derive(Copy, Clone)]
pub struct MemberView<'a> {
    catalog: &'a TypeCatalog,
    entry: &'a MemberEntry,
}

impl<'a> MemberView<'a> {
    /// View of the member identified by `id`, if it exists.
    pub fn resolve(catalog: &'a TypeCatalog, id: MemberId) -> Option<Self> {
        catalog.member(id).map(|entry| Self { catalog, entry })
    }

    #[inline]
    pub fn id(&self) -> MemberId {
        self.entry.id
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.entry.kind
    }

    /// Field/property type or method return type.
    #[inline]
    pub fn ty(&self) -> TypeIdx {
        self.entry.ty
    }

    pub fn ty_view(&self) -> Option<TypeView<'a>> {
        self.catalog.view(self.entry.ty)
    }

    pub fn owner(&self) -> Option<TypeView<'a>> {
        self.catalog.view(self.entry.id.owner)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.entry.is_static
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.entry.visibility
    }
}

impl fmt::Debug for MemberView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} `{}`", self.entry.id, self.entry.kind, self.entry.name)
    }
}

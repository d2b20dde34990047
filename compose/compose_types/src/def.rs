//! Registration input for the type catalog.
//!
//! Hosts describe each type once with a [`TypeDef`], then hand it to
//! [`TypeCatalog::register`](crate::TypeCatalog::register).

use smallvec::SmallVec;

use crate::TypeIdx;

/// The shape of a catalog type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete or abstract class; may extend one base class.
    Class,
    /// An interface; may extend other interfaces.
    Interface,
    /// A value type; implements interfaces but has no base class.
    Struct,
}

/// Kind of a declared member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    /// A method; the member type is its return type.
    Method,
    Constructor,
}

/// Visibility of a type member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,

    /// Visible only within the declaring type.
    Private,
}

/// Pending type registration.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) base: Option<TypeIdx>,
    pub(crate) interfaces: SmallVec<[TypeIdx; 4]>,
    pub(crate) generic_params: Vec<String>,
    pub(crate) members: Vec<MemberDef>,
}

impl TypeDef {
    fn new(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            base: None,
            interfaces: SmallVec::new(),
            generic_params: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, namespace, name)
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, namespace, name)
    }

    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Struct, namespace, name)
    }

    /// Set the base class. A later call replaces an earlier one.
    #[must_use]
    pub fn extends(mut self, base: TypeIdx) -> Self {
        self.base = Some(base);
        self
    }

    /// Add a directly implemented (or, for interfaces, extended) interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeIdx) -> Self {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    /// Declare generic parameters, making this an open generic definition.
    #[must_use]
    pub fn generic_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }
}

/// Pending member declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDef {
    pub name: String,
    pub kind: MemberKind,
    pub ty: TypeIdx,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl MemberDef {
    fn new(kind: MemberKind, name: impl Into<String>, ty: TypeIdx) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            is_static: false,
            visibility: Visibility::Public,
        }
    }

    pub fn field(name: impl Into<String>, ty: TypeIdx) -> Self {
        Self::new(MemberKind::Field, name, ty)
    }

    pub fn property(name: impl Into<String>, ty: TypeIdx) -> Self {
        Self::new(MemberKind::Property, name, ty)
    }

    pub fn method(name: impl Into<String>, returns: TypeIdx) -> Self {
        Self::new(MemberKind::Method, name, returns)
    }

    /// A constructor; its member type is filled in with the owner on registration.
    pub fn constructor() -> Self {
        Self::new(MemberKind::Constructor, ".ctor", TypeIdx::NONE)
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

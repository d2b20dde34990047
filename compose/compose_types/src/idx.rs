//! Type and member handles.
//!
//! `TypeIdx` identifies one type in a [`TypeCatalog`](crate::TypeCatalog).
//! Constructed generics get their own index, so `Repo<Foo>` and `Repo<Bar>`
//! never compare equal. Equality is a 32-bit compare.

use std::fmt;

/// A 32-bit index into the type catalog.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeIdx(u32);

impl TypeIdx {
    /// Sentinel value indicating no type / invalid index.
    pub const NONE: Self = Self(u32::MAX);

    /// Create an index from a raw u32 value.
    ///
    /// The caller must ensure the index is valid in the catalog it is used with.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "TypeIdx::NONE")
        } else {
            write!(f, "TypeIdx({})", self.0)
        }
    }
}

impl fmt::Display for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "<none>")
        } else {
            write!(f, "type#{}", self.0)
        }
    }
}

/// Identity of a member declared on a type.
///
/// `local` is the declaration position within the owner's member list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberId {
    pub owner: TypeIdx,
    pub local: u32,
}

impl MemberId {
    #[inline]
    pub const fn new(owner: TypeIdx, local: u32) -> Self {
        Self { owner, local }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::member#{}", self.owner, self.local)
    }
}

const _: () = assert!(std::mem::size_of::<TypeIdx>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_sentinel_works() {
        assert!(TypeIdx::NONE.is_none());
        assert!(!TypeIdx::from_raw(0).is_none());
        assert_eq!(format!("{:?}", TypeIdx::NONE), "TypeIdx::NONE");
    }

    #[test]
    fn idx_equality() {
        assert_eq!(TypeIdx::from_raw(7), TypeIdx::from_raw(7));
        assert_ne!(TypeIdx::from_raw(7), TypeIdx::from_raw(8));
    }

    #[test]
    fn member_id_display() {
        let id = MemberId::new(TypeIdx::from_raw(3), 1);
        assert_eq!(id.to_string(), "type#3::member#1");
    }
}

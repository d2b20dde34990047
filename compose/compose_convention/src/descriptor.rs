//! Synthesized markers.
//!
//! A [`Marker`] stands in for a declarative annotation that would otherwise be
//! written on the type by hand. Discovery code filters by [`MarkerKind`] while
//! keeping relative order.

use std::fmt;

use compose_types::TypeIdx;

/// An export: the contract under which a type (or member) is offered.
///
/// Both fields unset means the consumer infers the contract type from the
/// exporting type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportDescriptor {
    pub contract_type: Option<TypeIdx>,
    pub contract_name: Option<String>,
}

impl ExportDescriptor {
    /// Contract type to resolve under, falling back to the exporting type.
    #[inline]
    pub fn effective_contract_type(&self, exporting: TypeIdx) -> TypeIdx {
        self.contract_type.unwrap_or(exporting)
    }
}

/// A metadata value attached to an export or a part.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetadataValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Type(TypeIdx),
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Str(s) => write!(f, "{s:?}"),
            MetadataValue::Int(i) => write!(f, "{i}"),
            MetadataValue::Float(x) => write!(f, "{x}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Type(t) => write!(f, "{t}"),
            MetadataValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Str(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(value)
    }
}

impl From<&String> for MetadataValue {
    fn from(value: &String) -> Self {
        MetadataValue::Str(value.clone())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Int(i64::from(value))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<TypeIdx> for MetadataValue {
    fn from(value: TypeIdx) -> Self {
        MetadataValue::Type(value)
    }
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(value: Vec<T>) -> Self {
        MetadataValue::List(value.into_iter().map(Into::into).collect())
    }
}

/// One key/value pair. Duplicate keys are kept; precedence is the consumer's call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataDescriptor {
    pub key: String,
    pub value: MetadataValue,
}

/// Sharing hint for a part: one instance per container, or per named boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedDescriptor {
    pub boundary: Option<String>,
}

/// A synthesized marker, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    /// Starts an export group.
    Export(ExportDescriptor),

    /// Metadata for the export that precedes it.
    ExportMetadata(MetadataDescriptor),

    /// Metadata for the part as a whole.
    PartMetadata(MetadataDescriptor),

    Shared(SharedDescriptor),
}

/// Discriminant of [`Marker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Export,
    ExportMetadata,
    PartMetadata,
    Shared,
}

impl Marker {
    #[inline]
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Export(_) => MarkerKind::Export,
            Marker::ExportMetadata(_) => MarkerKind::ExportMetadata,
            Marker::PartMetadata(_) => MarkerKind::PartMetadata,
            Marker::Shared(_) => MarkerKind::Shared,
        }
    }

    #[inline]
    pub fn as_export(&self) -> Option<&ExportDescriptor> {
        match self {
            Marker::Export(export) => Some(export),
            _ => None,
        }
    }

    /// Export or part metadata.
    #[inline]
    pub fn as_metadata(&self) -> Option<&MetadataDescriptor> {
        match self {
            Marker::ExportMetadata(meta) | Marker::PartMetadata(meta) => Some(meta),
            _ => None,
        }
    }
}

/// Iterate the export descriptors in a marker list, in order.
pub fn exports(markers: &[Marker]) -> impl Iterator<Item = &ExportDescriptor> {
    markers.iter().filter_map(Marker::as_export)
}

/// Split a marker list into export groups: each export with the metadata that
/// follows it. Part-level markers are skipped.
pub fn export_groups(markers: &[Marker]) -> Vec<(&ExportDescriptor, Vec<&MetadataDescriptor>)> {
    let mut groups: Vec<(&ExportDescriptor, Vec<&MetadataDescriptor>)> = Vec::new();
    for marker in markers {
        match marker {
            Marker::Export(export) => groups.push((export, Vec::new())),
            Marker::ExportMetadata(meta) => {
                if let Some((_, metadata)) = groups.last_mut() {
                    metadata.push(meta);
                }
            }
            Marker::PartMetadata(_) | Marker::Shared(_) => {}
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_contract_type_falls_back() {
        let ty = TypeIdx::from_raw(4);
        let contract = TypeIdx::from_raw(1);
        assert_eq!(ExportDescriptor::default().effective_contract_type(ty), ty);
        let named = ExportDescriptor {
            contract_type: Some(contract),
            contract_name: None,
        };
        assert_eq!(named.effective_contract_type(ty), contract);
    }

    #[test]
    fn metadata_value_conversions() {
        assert_eq!(MetadataValue::from("a"), MetadataValue::Str("a".to_owned()));
        assert_eq!(MetadataValue::from(3), MetadataValue::Int(3));
        assert_eq!(
            MetadataValue::from(vec![1, 2]),
            MetadataValue::List(vec![MetadataValue::Int(1), MetadataValue::Int(2)])
        );
        assert_eq!(MetadataValue::from(vec!["x", "y"]).to_string(), r#"["x", "y"]"#);
    }

    #[test]
    fn groups_keep_metadata_with_their_export() {
        let meta = |k: &str| MetadataDescriptor {
            key: k.to_owned(),
            value: MetadataValue::Bool(true),
        };
        let markers = vec![
            Marker::Export(ExportDescriptor::default()),
            Marker::ExportMetadata(meta("a")),
            Marker::Shared(SharedDescriptor::default()),
            Marker::Export(ExportDescriptor::default()),
            Marker::ExportMetadata(meta("b")),
            Marker::ExportMetadata(meta("c")),
        ];
        let groups = export_groups(&markers);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].1.iter().map(|m| m.key.as_str()).collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(exports(&markers).count(), 2);
        assert_eq!(markers[2].kind(), MarkerKind::Shared);
    }
}

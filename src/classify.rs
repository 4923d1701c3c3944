// Partition a structure's accessors into fields, instances, and parameters

use crate::error::{Result, TreeError};
use crate::parsed::{FieldInfo, StructDescriptor};

/// Accessor partition for one structure type.
///
/// `fields` follow the declared sequence order, `instances` the accessor
/// discovery order, `params` the declared parameter order. Children of a
/// composite node materialize in exactly that order: fields, then
/// instances, then parameters.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub fields: Vec<FieldInfo>,
    pub instances: Vec<FieldInfo>,
    pub params: Vec<FieldInfo>,
}

impl FieldLayout {
    /// Total number of child slots
    pub fn len(&self) -> usize {
        self.fields.len() + self.instances.len() + self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition a descriptor's accessors.
///
/// Accessor names with the internal `_` prefix never appear in any
/// bucket. A declared sequential field or parameter without a matching
/// accessor is a malformed descriptor and fails classification.
pub fn classify(desc: &'static StructDescriptor) -> Result<FieldLayout> {
    let mut fields = Vec::with_capacity(desc.seq.len());
    for &name in desc.seq {
        if name.starts_with('_') {
            continue;
        }
        match desc.accessor(name) {
            Some(info) => fields.push(*info),
            None => {
                return Err(TreeError::UnknownAccessor {
                    type_name: desc.type_name,
                    name,
                })
            }
        }
    }

    let mut params = Vec::with_capacity(desc.params.len());
    for &name in desc.params {
        if name.starts_with('_') {
            continue;
        }
        match desc.accessor(name) {
            Some(info) => params.push(*info),
            None => {
                return Err(TreeError::UnknownAccessor {
                    type_name: desc.type_name,
                    name,
                })
            }
        }
    }

    let mut instances = Vec::new();
    for info in desc.accessors {
        if info.name.starts_with('_') {
            continue;
        }
        if desc.seq.contains(&info.name) || desc.params.contains(&info.name) {
            continue;
        }
        instances.push(*info);
    }

    Ok(FieldLayout {
        fields,
        instances,
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    static BASIC: StructDescriptor = StructDescriptor {
        type_name: "Basic",
        seq: &["a", "b"],
        accessors: &[
            FieldInfo {
                name: "derived",
                ty: TypeTag::U32,
            },
            FieldInfo {
                name: "b",
                ty: TypeTag::U16,
            },
            FieldInfo {
                name: "a",
                ty: TypeTag::U8,
            },
            FieldInfo {
                name: "_io",
                ty: TypeTag::Opaque("io"),
            },
            FieldInfo {
                name: "limit",
                ty: TypeTag::U32,
            },
        ],
        params: &["limit"],
    };

    static MALFORMED: StructDescriptor = StructDescriptor {
        type_name: "Malformed",
        seq: &["ghost"],
        accessors: &[],
        params: &[],
    };

    #[test]
    fn test_fields_follow_sequence_order() {
        let layout = classify(&BASIC).unwrap();
        let names: Vec<&str> = layout.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_instances_follow_discovery_order() {
        let layout = classify(&BASIC).unwrap();
        let names: Vec<&str> = layout.instances.iter().map(|f| f.name).collect();
        assert_eq!(names, ["derived"]);
    }

    #[test]
    fn test_params_are_their_own_bucket() {
        let layout = classify(&BASIC).unwrap();
        let names: Vec<&str> = layout.params.iter().map(|f| f.name).collect();
        assert_eq!(names, ["limit"]);
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn test_internal_accessors_excluded() {
        let layout = classify(&BASIC).unwrap();
        assert!(layout
            .instances
            .iter()
            .chain(&layout.fields)
            .chain(&layout.params)
            .all(|f| f.name != "_io"));
    }

    #[test]
    fn test_missing_accessor_is_an_error() {
        let err = classify(&MALFORMED).unwrap_err();
        assert_eq!(
            err,
            TreeError::UnknownAccessor {
                type_name: "Malformed",
                name: "ghost",
            }
        );
    }
}

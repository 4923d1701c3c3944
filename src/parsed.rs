// Boundary with the external binary-format parser

use crate::positions::PositionTable;
use crate::value::{TypeTag, Value};

/// Identity of the stream an instance was parsed from.
///
/// Comparing a nested structure's id with its enclosing structure's id
/// distinguishes same-stream nesting from sub-stream nesting when
/// composing root-relative spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub u64);

/// One public accessor of a structure type: name plus declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub ty: TypeTag,
}

/// Static metadata the parser publishes once per generated structure type.
#[derive(Debug, Clone, Copy)]
pub struct StructDescriptor {
    /// Type name as declared in the format schema
    pub type_name: &'static str,
    /// Sequential field names, in declared parse order
    pub seq: &'static [&'static str],
    /// Every public accessor, in discovery order
    pub accessors: &'static [FieldInfo],
    /// Constructor parameter names, in declared order
    pub params: &'static [&'static str],
}

impl StructDescriptor {
    /// Look up an accessor by name
    pub fn accessor(&self, name: &str) -> Option<&'static FieldInfo> {
        self.accessors.iter().find(|a| a.name == name)
    }
}

/// A parsed structure instance, as handed over by the parser.
///
/// Implementations are expected to be cheap: `value_of` dispatches to a
/// stored field and clones a reference-counted handle at most.
pub trait ParsedStruct {
    /// Static descriptor of this instance's type
    fn descriptor(&self) -> &'static StructDescriptor;

    /// Value behind the named accessor; `None` is a null value
    fn value_of(&self, name: &str) -> Option<Value>;

    /// Per-field byte positions, absent when the parser was built
    /// without position tracking
    fn positions(&self) -> Option<&PositionTable>;

    /// Identity of the stream this instance was parsed from
    fn stream(&self) -> StreamId;

    /// Total consumed length of this instance's stream, in bytes
    fn stream_len(&self) -> u64;
}

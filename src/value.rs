// Runtime values and declared static types of parsed fields

use std::fmt;
use std::rc::Rc;

use crate::parsed::ParsedStruct;

/// Declared static type of an accessor, as published in the descriptor.
///
/// Retained on every leaf even when the value is null, because a null
/// value carries no runtime type information of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    Bool,
    Str,
    Bytes,
    /// Enumerated type, by schema name
    Enum(&'static str),
    /// User-defined structure type, by schema name
    Struct(&'static str),
    /// Repeated field, with the element type
    List(&'static TypeTag),
    /// Type outside the taxonomy, by whatever name the parser gives it
    Opaque(&'static str),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::S8 => write!(f, "s8"),
            TypeTag::S16 => write!(f, "s16"),
            TypeTag::S32 => write!(f, "s32"),
            TypeTag::S64 => write!(f, "s64"),
            TypeTag::F32 => write!(f, "f32"),
            TypeTag::F64 => write!(f, "f64"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Bytes => write!(f, "bytes"),
            TypeTag::Enum(name) | TypeTag::Struct(name) | TypeTag::Opaque(name) => {
                write!(f, "{}", name)
            }
            TypeTag::List(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// Runtime value of a parsed field.
///
/// Produced by the parser at parse time; the tree dispatches on the
/// variant with exhaustive matching and never inspects types any other
/// way. Byte buffers and nested structures are reference-counted, so
/// cloning a value never copies parsed data.
#[derive(Clone)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Bytes(Rc<Vec<u8>>),
    /// Enum variant label plus its backing integer when the encoding
    /// makes one accessible
    Enum {
        label: String,
        backing: Option<u64>,
    },
    /// Nested parsed structure
    Struct(Rc<dyn ParsedStruct>),
    /// Repeated field elements
    List(Vec<Value>),
    /// Parser escape hatch for values outside the taxonomy
    Opaque {
        type_name: String,
    },
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "Unsigned({})", v),
            Value::Signed(v) => write!(f, "Signed({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Str(v) => write!(f, "Str({:?})", v),
            Value::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Value::Enum { label, backing } => write!(f, "Enum({:?}, {:?})", label, backing),
            Value::Struct(v) => write!(f, "Struct({})", v.descriptor().type_name),
            Value::List(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Opaque { type_name } => write!(f, "Opaque({})", type_name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unsigned(a), Value::Unsigned(b)) => a == b,
            (Value::Signed(a), Value::Signed(b)) => a == b,
            (Value::Unsigned(a), Value::Signed(b)) => i64::try_from(*a) == Ok(*b),
            (Value::Signed(a), Value::Unsigned(b)) => i64::try_from(*b) == Ok(*a),
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (
                Value::Enum {
                    label: l1,
                    backing: b1,
                },
                Value::Enum {
                    label: l2,
                    backing: b2,
                },
            ) => l1 == l2 && b1 == b2,
            // Structure identity, not structural comparison
            (Value::Struct(a), Value::Struct(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Opaque { type_name: a }, Value::Opaque { type_name: b }) => a == b,
            _ => false,
        }
    }
}

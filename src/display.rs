// Human-readable rendering of leaf values

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::value::{TypeTag, Value};

/// Caps for value rendering.
///
/// Serializable so an embedding application can persist it with the rest
/// of its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Maximum byte pairs shown for byte buffers
    pub max_bytes: usize,
    /// Maximum elements shown for list values rendered in leaf position
    pub max_elems: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_bytes: 16,
            max_elems: 8,
        }
    }
}

/// Format a value for display, given the accessor's declared type.
///
/// Never fails: a null value renders as `null`, and shapes the taxonomy
/// cannot name degrade to a diagnostic label plus a logged warning, so
/// the tree stays navigable whatever the parser produced.
pub fn format_value(value: Option<&Value>, declared: TypeTag, options: &DisplayOptions) -> String {
    let value = match value {
        Some(v) => v,
        None => return "null".to_string(),
    };
    match value {
        Value::Unsigned(v) => format_unsigned(*v, declared),
        Value::Signed(v) => format_signed(*v, declared),
        Value::Float(v) => format!("{}", v),
        Value::Bool(v) => format!("{}", v),
        Value::Str(v) => format!("\"{}\"", v),
        Value::Bytes(bytes) => format_bytes(bytes, options),
        Value::Enum { label, backing } => match backing {
            Some(v) => format!("{} ({}, 0x{:02X})", label, v, v),
            None => {
                warn!(label = %label, "enum value has no accessible backing integer");
                label.clone()
            }
        },
        Value::Struct(s) => s.descriptor().type_name.to_string(),
        Value::List(items) => format_list(items, declared, options),
        Value::Opaque { type_name } => {
            warn!(type_name = %type_name, "value type outside the display taxonomy");
            format!("<{}>", type_name)
        }
    }
}

/// Decimal plus hex at the width of the declared type; values whose
/// declared type is not a fixed-width integer fall back to a width
/// scaled to the magnitude.
fn format_unsigned(v: u64, declared: TypeTag) -> String {
    match declared {
        TypeTag::U8 => format!("{} (0x{:02X})", v, v),
        TypeTag::U16 => format!("{} (0x{:04X})", v, v),
        TypeTag::U32 => format!("{} (0x{:08X})", v, v),
        TypeTag::U64 => format!("{} (0x{:016X})", v, v),
        _ => {
            if v <= 0xFF {
                format!("{} (0x{:02X})", v, v)
            } else if v <= 0xFFFF {
                format!("{} (0x{:04X})", v, v)
            } else if v <= 0xFFFF_FFFF {
                format!("{} (0x{:08X})", v, v)
            } else {
                format!("{} (0x{:X})", v, v)
            }
        }
    }
}

/// Decimal plus the two's-complement hex image at the declared width
fn format_signed(v: i64, declared: TypeTag) -> String {
    match declared {
        TypeTag::S8 => format!("{} (0x{:02X})", v, v as u8),
        TypeTag::S16 => format!("{} (0x{:04X})", v, v as u16),
        TypeTag::S32 => format!("{} (0x{:08X})", v, v as u32),
        TypeTag::S64 => format!("{} (0x{:016X})", v, v as u64),
        _ => format!("{}", v),
    }
}

fn format_bytes(bytes: &[u8], options: &DisplayOptions) -> String {
    let shown = bytes.len().min(options.max_bytes);
    let mut out = String::with_capacity(shown * 3);
    for (i, b) in bytes.iter().take(shown).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02x}", b));
    }
    if bytes.len() > shown {
        out.push_str(&format!(" .. (+{} more)", bytes.len() - shown));
    }
    out
}

fn format_list(items: &[Value], declared: TypeTag, options: &DisplayOptions) -> String {
    let elem = match declared {
        TypeTag::List(elem) => *elem,
        other => other,
    };
    let shown = items.len().min(options.max_elems);
    let rendered: Vec<String> = items
        .iter()
        .take(shown)
        .map(|v| format_value(Some(v), elem, options))
        .collect();
    if items.len() > shown {
        format!(
            "[{}, .. (+{} more)]",
            rendered.join(", "),
            items.len() - shown
        )
    } else {
        format!("[{}]", rendered.join(", "))
    }
}

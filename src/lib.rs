// Lazy tree model for inspecting parsed binary structures

pub mod classify;
pub mod display;
pub mod error;
pub mod model;
pub mod parsed;
pub mod positions;
pub mod span;
pub mod value;

// Re-export key types for public API
pub use classify::{classify, FieldLayout};
pub use display::{format_value, DisplayOptions};
pub use error::{Result, TreeError};
pub use model::{NodeId, NodeKind, StructModel};
pub use parsed::{FieldInfo, ParsedStruct, StreamId, StructDescriptor};
pub use positions::PositionTable;
pub use span::Span;
pub use value::{TypeTag, Value};

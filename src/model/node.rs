// Arena records and coordinate anchors for the materialized tree

use std::rc::Rc;

use crate::classify::FieldLayout;
use crate::parsed::{ParsedStruct, StreamId};
use crate::span::Span;
use crate::value::{TypeTag, Value};

/// Stable handle to a node in the model's arena.
///
/// Handles stay valid for the model's lifetime: expansion appends records
/// and never moves or removes existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Which of the four node shapes a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A parsed structure with one child per classified accessor
    Composite,
    /// A repeated field with one child per element
    List,
    /// A terminal value
    Leaf,
    /// A constructor parameter of the enclosing structure
    Parameter,
}

/// Coordinate context of an enclosing structure: the stream its offsets
/// are relative to, and that stream's root-relative origin when known.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchor {
    pub(crate) stream: StreamId,
    pub(crate) base: Option<u64>,
}

impl Anchor {
    /// Compose a stream-relative span into root coordinates.
    /// Without a base the subtree cannot be anchored and gets no spans.
    pub(crate) fn resolve(&self, local: Option<Span>) -> Option<Span> {
        match (local, self.base) {
            (Some(s), Some(b)) => Some(Span::new(b + s.start, b + s.end)),
            _ => None,
        }
    }

    /// Anchor for a structure that appears inside this context. A new
    /// stream means the structure was parsed from a sub-stream whose
    /// origin is the enclosing field's start.
    pub(crate) fn enter(&self, child_stream: StreamId, span: Option<Span>) -> Anchor {
        if child_stream == self.stream {
            *self
        } else {
            Anchor {
                stream: child_stream,
                base: span.map(|s| s.start),
            }
        }
    }
}

pub(crate) struct NodeRecord {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) span: Option<Span>,
    pub(crate) sequential: bool,
    pub(crate) body: Body,
    /// Written at most once, on first expansion
    pub(crate) children: Option<Vec<NodeId>>,
}

pub(crate) enum Body {
    Composite {
        value: Rc<dyn ParsedStruct>,
        layout: FieldLayout,
        /// Coordinate context for this structure's own fields
        anchor: Anchor,
    },
    List {
        values: Vec<Value>,
        elem: &'static TypeTag,
        /// Root-relative element spans, index-synchronized with `values`
        spans: Vec<Span>,
        /// Coordinate context of the owning structure, for element
        /// structures parsed from its stream
        anchor: Anchor,
    },
    Leaf {
        value: Option<Value>,
        ty: TypeTag,
    },
    Parameter {
        value: Option<Value>,
        ty: TypeTag,
    },
}

impl Body {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Body::Composite { .. } => NodeKind::Composite,
            Body::List { .. } => NodeKind::List,
            Body::Leaf { .. } => NodeKind::Leaf,
            Body::Parameter { .. } => NodeKind::Parameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_same_stream_inherits_base() {
        let anchor = Anchor {
            stream: StreamId(0),
            base: Some(8),
        };
        let inner = anchor.enter(StreamId(0), Some(Span::new(10, 14)));
        assert_eq!(inner.base, Some(8));
        assert_eq!(inner.stream, StreamId(0));
    }

    #[test]
    fn test_anchor_substream_rebases_to_field_start() {
        let anchor = Anchor {
            stream: StreamId(0),
            base: Some(0),
        };
        let inner = anchor.enter(StreamId(1), Some(Span::new(2, 6)));
        assert_eq!(inner.base, Some(2));
        assert_eq!(inner.stream, StreamId(1));
    }

    #[test]
    fn test_anchor_substream_without_span_is_unanchored() {
        let anchor = Anchor {
            stream: StreamId(0),
            base: Some(0),
        };
        let inner = anchor.enter(StreamId(1), None);
        assert_eq!(inner.base, None);
    }

    #[test]
    fn test_resolve_composes_with_base() {
        let anchor = Anchor {
            stream: StreamId(1),
            base: Some(2),
        };
        assert_eq!(
            anchor.resolve(Some(Span::new(1, 2))),
            Some(Span::new(3, 4))
        );
    }

    #[test]
    fn test_resolve_without_base_or_span() {
        let anchored = Anchor {
            stream: StreamId(1),
            base: Some(2),
        };
        let unanchored = Anchor {
            stream: StreamId(1),
            base: None,
        };
        assert_eq!(anchored.resolve(None), None);
        assert_eq!(unanchored.resolve(Some(Span::new(1, 2))), None);
    }
}

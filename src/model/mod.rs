// Lazy tree model over parsed structures

mod node;

pub use node::{NodeId, NodeKind};

use std::rc::Rc;

use tracing::debug;

use crate::classify::classify;
use crate::display::{format_value, DisplayOptions};
use crate::error::{Result, TreeError};
use crate::parsed::{FieldInfo, ParsedStruct};
use crate::positions::PositionTable;
use crate::span::Span;
use crate::value::{TypeTag, Value};

use node::{Anchor, Body, NodeRecord};

/// Default name for the root node
const ROOT_NAME: &str = "<root>";

/// One named value waiting to be materialized into a node.
///
/// `elements` carries the recorded element offsets under the member's
/// name, stream-relative; `None` when the value has no element-offset
/// source, which is the case for list elements themselves.
struct Member<'a> {
    name: String,
    value: Option<Value>,
    declared: TypeTag,
    span: Option<Span>,
    sequential: bool,
    elements: Option<(&'a [u64], &'a [u64])>,
}

/// Lazy tree model over a parsed structure.
///
/// Construction materializes only the root; a composite or list node's
/// children are built on the first navigation call that needs them and
/// are cached for the model's lifetime. The tree is read-only and holds
/// reference-counted handles into the parsed graph, keeping it alive.
pub struct StructModel {
    nodes: Vec<NodeRecord>,
    root: NodeId,
    options: DisplayOptions,
}

impl StructModel {
    /// Build a model over `value` with the root named `<root>`
    pub fn new(value: Rc<dyn ParsedStruct>) -> Result<Self> {
        Self::with_name(ROOT_NAME, value)
    }

    /// Build a model over `value` with an explicit root name
    pub fn with_name(name: impl Into<String>, value: Rc<dyn ParsedStruct>) -> Result<Self> {
        let mut model = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            options: DisplayOptions::default(),
        };
        let span = Span::new(0, value.stream_len());
        let enclosing = Anchor {
            stream: value.stream(),
            base: Some(0),
        };
        let root = model.push_composite(name.into(), None, Some(span), true, value, enclosing)?;
        model.root = root;
        Ok(model)
    }

    /// Replace the options used by `display`
    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.options = options;
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.record(id).body.kind()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.record(id).name
    }

    /// Root-relative byte range, absent when no position was recorded
    /// or the enclosing sub-stream could not be anchored
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.record(id).span
    }

    /// Whether the node came from the format's sequential layout
    pub fn is_sequential(&self, id: NodeId) -> bool {
        self.record(id).sequential
    }

    /// `None` for the root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).parent
    }

    /// Wrapped value of a leaf or parameter node; `None` for containers
    /// and for null values
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        match &self.record(id).body {
            Body::Leaf { value, .. } | Body::Parameter { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    /// Declared static type of the node's accessor
    pub fn declared_type(&self, id: NodeId) -> TypeTag {
        match &self.record(id).body {
            Body::Composite { value, .. } => TypeTag::Struct(value.descriptor().type_name),
            Body::List { elem, .. } => TypeTag::List(*elem),
            Body::Leaf { ty, .. } | Body::Parameter { ty, .. } => *ty,
        }
    }

    /// Number of children this node will have once expanded.
    /// Never triggers expansion.
    pub fn child_count(&self, id: NodeId) -> usize {
        let rec = self.record(id);
        if let Some(children) = &rec.children {
            return children.len();
        }
        match &rec.body {
            Body::Composite { layout, .. } => layout.len(),
            Body::List { values, .. } => values.len(),
            Body::Leaf { .. } | Body::Parameter { .. } => 0,
        }
    }

    /// True for terminal nodes and for containers with no children
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.child_count(id) == 0
    }

    /// Whether the node is a container shape, regardless of how many
    /// children it has
    pub fn allows_children(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Composite | NodeKind::List)
    }

    /// Whether children have been materialized
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.record(id).children.is_some()
    }

    /// Position of `child` among `parent`'s materialized children.
    /// `None` when `child` is not one of them or the parent has not been
    /// expanded yet. Never triggers expansion.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        let children = self.record(parent).children.as_ref()?;
        children.iter().position(|c| *c == child)
    }

    /// Children of `id`, materializing them on first access
    pub fn children(&mut self, id: NodeId) -> Result<&[NodeId]> {
        self.expand(id)?;
        Ok(self.record(id).children.as_deref().unwrap_or(&[]))
    }

    /// Child at `index`, materializing the children on first access
    pub fn child_at(&mut self, id: NodeId, index: usize) -> Result<NodeId> {
        let len = self.child_count(id);
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        let children = self.children(id)?;
        Ok(children[index])
    }

    /// Display label for a node, shaped by its kind
    pub fn display(&self, id: NodeId) -> String {
        let rec = self.record(id);
        match &rec.body {
            Body::Composite { value, layout, .. } => {
                let type_name = value.descriptor().type_name;
                match rec.span {
                    Some(span) => format!(
                        "{} [{}, fields = {}, size = {}]",
                        rec.name,
                        type_name,
                        layout.len(),
                        span.size()
                    ),
                    None => format!("{} [{}, fields = {}]", rec.name, type_name, layout.len()),
                }
            }
            Body::List { values, .. } => match rec.span {
                Some(span) => format!(
                    "{} [count = {}; size = {}]",
                    rec.name,
                    values.len(),
                    span.size()
                ),
                None => format!("{} [count = {}]", rec.name, values.len()),
            },
            Body::Leaf { value, ty } => {
                let rendered = format_value(value.as_ref(), *ty, &self.options);
                match rec.span {
                    Some(span) => {
                        format!("{} [size = {}] = {}", rec.name, span.size(), rendered)
                    }
                    None => format!("{} = {}", rec.name, rendered),
                }
            }
            Body::Parameter { value, ty } => {
                format!(
                    "{} = {}",
                    rec.name,
                    format_value(value.as_ref(), *ty, &self.options)
                )
            }
        }
    }

    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.0 as usize]
    }

    fn push(&mut self, record: NodeRecord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(record);
        id
    }

    /// Materialize the children of `id` unless already built. A failed
    /// expansion leaves the node unexpanded; records pushed before the
    /// failure stay orphaned in the arena.
    fn expand(&mut self, id: NodeId) -> Result<()> {
        if self.record(id).children.is_some() {
            return Ok(());
        }
        let children = match self.kind(id) {
            NodeKind::Composite => self.expand_composite(id)?,
            NodeKind::List => self.expand_list(id)?,
            NodeKind::Leaf | NodeKind::Parameter => Vec::new(),
        };
        debug!(node = id.0, children = children.len(), "expanded node");
        self.nodes[id.0 as usize].children = Some(children);
        Ok(())
    }

    fn expand_composite(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let (value, layout, anchor) = match &self.record(id).body {
            Body::Composite {
                value,
                layout,
                anchor,
            } => (Rc::clone(value), layout.clone(), *anchor),
            _ => return Ok(Vec::new()),
        };
        let table = match value.positions() {
            Some(table) => table,
            None => {
                return Err(TreeError::MissingPositionMetadata {
                    type_name: value.descriptor().type_name,
                })
            }
        };
        let mut children = Vec::with_capacity(layout.len());
        for info in &layout.fields {
            let member = field_member(value.as_ref(), table, anchor, info, true);
            children.push(self.materialize(id, member, anchor)?);
        }
        for info in &layout.instances {
            let member = field_member(value.as_ref(), table, anchor, info, false);
            children.push(self.materialize(id, member, anchor)?);
        }
        for info in &layout.params {
            // Parameters are hand-in values, never parsed bytes: no
            // position lookup even when the table has their name.
            let param = value.value_of(info.name);
            children.push(self.push(NodeRecord {
                name: info.name.to_string(),
                parent: Some(id),
                span: None,
                sequential: false,
                body: Body::Parameter {
                    value: param,
                    ty: info.ty,
                },
                children: None,
            }));
        }
        Ok(children)
    }

    fn expand_list(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let (values, elem, spans, anchor, sequential) = {
            let rec = self.record(id);
            match &rec.body {
                Body::List {
                    values,
                    elem,
                    spans,
                    anchor,
                } => (
                    values.clone(),
                    *elem,
                    spans.clone(),
                    *anchor,
                    rec.sequential,
                ),
                _ => return Ok(Vec::new()),
            }
        };
        let mut children = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let member = Member {
                name: format!("[{}]", i),
                value: Some(value),
                declared: *elem,
                span: Some(spans[i]),
                sequential,
                elements: None,
            };
            children.push(self.materialize(id, member, anchor)?);
        }
        Ok(children)
    }

    /// Dispatch one named value into the node shape it materializes as:
    /// structures become composites, repeated fields with a resolved
    /// span and recorded element offsets become lists, everything else
    /// is a leaf.
    fn materialize(
        &mut self,
        parent: NodeId,
        member: Member<'_>,
        anchor: Anchor,
    ) -> Result<NodeId> {
        let Member {
            name,
            value,
            declared,
            span,
            sequential,
            elements,
        } = member;
        match value {
            Some(Value::Struct(value)) => {
                self.push_composite(name, Some(parent), span, sequential, value, anchor)
            }
            Some(Value::List(values)) => {
                if let (TypeTag::List(elem), Some(_), Some(base), Some((starts, ends))) =
                    (declared, span, anchor.base, elements)
                {
                    if values.len() != starts.len() || values.len() != ends.len() {
                        return Err(TreeError::SpanCountMismatch {
                            field: name,
                            values: values.len(),
                            starts: starts.len(),
                            ends: ends.len(),
                        });
                    }
                    let spans = starts
                        .iter()
                        .zip(ends.iter())
                        .map(|(s, e)| Span::new(base + s, base + e))
                        .collect();
                    Ok(self.push(NodeRecord {
                        name,
                        parent: Some(parent),
                        span,
                        sequential,
                        body: Body::List {
                            values,
                            elem,
                            spans,
                            anchor,
                        },
                        children: None,
                    }))
                } else {
                    // Computed array value with no parsed positions:
                    // rendered in leaf position rather than expanded.
                    Ok(self.push(NodeRecord {
                        name,
                        parent: Some(parent),
                        span,
                        sequential,
                        body: Body::Leaf {
                            value: Some(Value::List(values)),
                            ty: declared,
                        },
                        children: None,
                    }))
                }
            }
            other => Ok(self.push(NodeRecord {
                name,
                parent: Some(parent),
                span,
                sequential,
                body: Body::Leaf {
                    value: other,
                    ty: declared,
                },
                children: None,
            })),
        }
    }

    fn push_composite(
        &mut self,
        name: String,
        parent: Option<NodeId>,
        span: Option<Span>,
        sequential: bool,
        value: Rc<dyn ParsedStruct>,
        enclosing: Anchor,
    ) -> Result<NodeId> {
        let desc = value.descriptor();
        if value.positions().is_none() {
            return Err(TreeError::MissingPositionMetadata {
                type_name: desc.type_name,
            });
        }
        let layout = classify(desc)?;
        let anchor = enclosing.enter(value.stream(), span);
        Ok(self.push(NodeRecord {
            name,
            parent,
            span,
            sequential,
            body: Body::Composite {
                value,
                layout,
                anchor,
            },
            children: None,
        }))
    }
}

/// Resolve one classified accessor against its owner's value and
/// position table
fn field_member<'a>(
    owner: &dyn ParsedStruct,
    table: &'a PositionTable,
    anchor: Anchor,
    info: &FieldInfo,
    sequential: bool,
) -> Member<'a> {
    Member {
        name: info.name.to_string(),
        value: owner.value_of(info.name),
        declared: info.ty,
        span: anchor.resolve(table.attr_span(info.name)),
        sequential,
        elements: Some((table.element_starts(info.name), table.element_ends(info.name))),
    }
}

//! The dynamic SQL node tree and its renderer.
//!
//! A statement body is an ordered [`NodeGroup`]. Every node kind renders to
//! a SQL fragment plus the arguments it bound, and containers concatenate
//! their children left to right: between adjacent non-empty fragments a
//! single space is inserted unless the preceding fragment already ends in
//! whitespace.

mod choose;
mod condition;
mod foreach;
mod include;
mod text;
mod trim;

use std::borrow::Cow;
use std::cell::Cell;

pub use choose::ChooseNode;
pub use condition::ConditionNode;
pub use foreach::ForeachNode;
pub use include::IncludeNode;
pub use text::{PureTextNode, TextNode};
pub use trim::{SetNode, TrimNode, WhereNode};

use crate::buffer::BufferPool;
use crate::error::RenderError;
use crate::param::Parameter;
use crate::registry::MapperRegistry;
use crate::translator::Translator;
use crate::value::ParamValue;

/// The outcome of rendering one node: a SQL fragment and its bound args.
pub type Rendered = (String, Vec<ParamValue>);

/// How deep `include` chains may nest within a single render.
pub(crate) const MAX_INCLUDE_DEPTH: usize = 16;

/// Per-render state threaded through the node tree.
///
/// Everything here is render-local; the node tree itself stays immutable and
/// is shared freely between concurrent renders.
pub struct RenderContext<'a> {
    registry: &'a MapperRegistry,
    translator: &'a dyn Translator,
    buffers: &'a BufferPool,
    ordinal: Cell<usize>,
    include_depth: Cell<usize>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        registry: &'a MapperRegistry,
        translator: &'a dyn Translator,
        buffers: &'a BufferPool,
    ) -> Self {
        Self {
            registry,
            translator,
            buffers,
            ordinal: Cell::new(0),
            include_depth: Cell::new(0),
        }
    }

    /// The registry includes resolve through.
    pub fn registry(&self) -> &MapperRegistry {
        self.registry
    }

    pub(crate) fn buffers(&self) -> &'a BufferPool {
        self.buffers
    }

    /// Claim the next placeholder ordinal and translate it.
    pub(crate) fn placeholder(&self, name: &str) -> Cow<'static, str> {
        let position = self.ordinal.get() + 1;
        self.ordinal.set(position);
        self.translator.translate(name, position)
    }

    pub(crate) fn enter_include(&self) -> Result<IncludeDepthGuard<'_>, RenderError> {
        let depth = self.include_depth.get() + 1;
        if depth > MAX_INCLUDE_DEPTH {
            return Err(RenderError::IncludeDepthExceeded {
                max: MAX_INCLUDE_DEPTH,
            });
        }
        self.include_depth.set(depth);
        Ok(IncludeDepthGuard {
            depth: &self.include_depth,
        })
    }
}

pub(crate) struct IncludeDepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for IncludeDepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

/// A unit of a statement body's render tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Text carrying `#{…}` or `${…}` sites.
    Text(TextNode),
    /// Text with nothing to substitute.
    PureText(PureTextNode),
    /// `<if test="…">`
    If(ConditionNode),
    /// `<where>`
    Where(WhereNode),
    /// `<set>`
    Set(SetNode),
    /// `<trim>`
    Trim(TrimNode),
    /// `<foreach>`
    Foreach(ForeachNode),
    /// `<include refid="…">`
    Include(IncludeNode),
    /// `<choose>`
    Choose(ChooseNode),
}

impl Node {
    /// Build a text node, downgrading to [`PureTextNode`] when the scan
    /// finds nothing to substitute.
    pub fn text(value: impl Into<String>) -> Self {
        let node = TextNode::scan(value.into());
        if node.has_matches() {
            Self::Text(node)
        } else {
            Self::PureText(PureTextNode::new(node.into_value()))
        }
    }

    /// Render this node against the parameter scope.
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        match self {
            Self::Text(node) => node.render(ctx, scope),
            Self::PureText(node) => Ok(node.render()),
            Self::If(node) => node.render(ctx, scope),
            Self::Where(node) => node.render(ctx, scope),
            Self::Set(node) => node.render(ctx, scope),
            Self::Trim(node) => node.render(ctx, scope),
            Self::Foreach(node) => node.render(ctx, scope),
            Self::Include(node) => node.render(ctx, scope),
            Self::Choose(node) => node.render(ctx, scope),
        }
    }

    /// The child groups nested under this node, for graph walks.
    pub fn child_groups(&self) -> Vec<&NodeGroup> {
        match self {
            Self::Text(_) | Self::PureText(_) | Self::Include(_) => Vec::new(),
            Self::If(node) => vec![node.children()],
            Self::Where(node) => vec![node.children()],
            Self::Set(node) => vec![node.children()],
            Self::Trim(node) => vec![node.children()],
            Self::Foreach(node) => vec![node.children()],
            Self::Choose(node) => node.child_groups(),
        }
    }
}

/// An ordered sequence of nodes composed under the group rule.
#[derive(Debug, Clone, Default)]
pub struct NodeGroup(Vec<Node>);

impl NodeGroup {
    /// Wrap an ordered node list.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    /// Check whether the group has no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the direct children.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    /// Render all children under the composition rule.
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        let mut buf = ctx.buffers().acquire();
        let mut args = Vec::new();
        for node in &self.0 {
            let (sql, mut node_args) = node.render(ctx, scope)?;
            if !sql.is_empty() {
                if !buf.is_empty() && !buf.as_str().ends_with(char::is_whitespace) {
                    buf.push(' ');
                }
                buf.push_str(&sql);
            }
            args.append(&mut node_args);
        }
        Ok((buf.detach(), args))
    }
}

impl From<Vec<Node>> for NodeGroup {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

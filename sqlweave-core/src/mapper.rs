//! The mapper object graph: statements, sql fragments, and their owner.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{RegistryError, RenderError};
use crate::node::{NodeGroup, RenderContext, Rendered};
use crate::param::Parameter;
use crate::result_map::ResultMap;

/// The action kind of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select,
    Insert,
    Update,
    Delete,
}

impl Action {
    /// Map a statement tag name onto an action.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "select" => Some(Self::Select),
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// The tag name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named SQL template of a specific action kind.
#[derive(Debug, Clone)]
pub struct Statement {
    action: Action,
    id: SmolStr,
    namespace: SmolStr,
    attributes: IndexMap<SmolStr, String>,
    nodes: NodeGroup,
}

impl Statement {
    /// Build a statement from its parsed parts.
    pub fn new(
        action: Action,
        namespace: impl Into<SmolStr>,
        id: impl Into<SmolStr>,
        attributes: IndexMap<SmolStr, String>,
        nodes: NodeGroup,
    ) -> Self {
        Self {
            action,
            id: id.into(),
            namespace: namespace.into(),
            attributes,
            nodes,
        }
    }

    /// The statement's local id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning mapper's namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The action kind.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The fully-qualified registry key, `namespace.id`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.id)
    }

    /// A source attribute copied verbatim off the statement element.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The statement body.
    pub fn nodes(&self) -> &NodeGroup {
        &self.nodes
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        self.nodes.render(ctx, scope)
    }
}

/// A reusable named body, includable into statements via `<include>`.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    id: SmolStr,
    namespace: SmolStr,
    nodes: NodeGroup,
}

impl SqlFragment {
    /// Build a fragment from its parsed body.
    pub fn new(id: impl Into<SmolStr>, namespace: impl Into<SmolStr>, nodes: NodeGroup) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            nodes,
        }
    }

    /// The fragment's local id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning mapper's namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The fragment body.
    pub fn nodes(&self) -> &NodeGroup {
        &self.nodes
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        self.nodes.render(ctx, scope)
    }
}

/// A named collection of statements, sql fragments, and result maps.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    namespace: SmolStr,
    attributes: IndexMap<SmolStr, String>,
    statements: IndexMap<SmolStr, Arc<Statement>>,
    fragments: IndexMap<SmolStr, Arc<SqlFragment>>,
    result_maps: IndexMap<SmolStr, Arc<ResultMap>>,
}

impl Mapper {
    /// Create an empty mapper under a namespace.
    pub fn new(namespace: impl Into<SmolStr>, attributes: IndexMap<SmolStr, String>) -> Self {
        Self {
            namespace: namespace.into(),
            attributes,
            ..Default::default()
        }
    }

    /// The globally unique namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// A source attribute copied verbatim off the mapper element.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attach a statement, rejecting a duplicate local id.
    pub fn add_statement(&mut self, statement: Statement) -> Result<(), RegistryError> {
        if self.statements.contains_key(statement.id()) {
            return Err(RegistryError::DuplicateStatement(statement.key()));
        }
        self.statements
            .insert(SmolStr::new(statement.id()), Arc::new(statement));
        Ok(())
    }

    /// Attach a sql fragment, rejecting a duplicate local id.
    pub fn add_fragment(&mut self, fragment: SqlFragment) -> Result<(), RegistryError> {
        if self.fragments.contains_key(fragment.id()) {
            return Err(RegistryError::DuplicateFragment {
                namespace: self.namespace.clone(),
                id: SmolStr::new(fragment.id()),
            });
        }
        self.fragments
            .insert(SmolStr::new(fragment.id()), Arc::new(fragment));
        Ok(())
    }

    /// Attach a result map, rejecting a duplicate id.
    pub fn add_result_map(&mut self, result_map: ResultMap) -> Result<(), RegistryError> {
        if self.result_maps.contains_key(result_map.id()) {
            return Err(RegistryError::DuplicateResultMap {
                namespace: self.namespace.clone(),
                id: SmolStr::new(result_map.id()),
            });
        }
        self.result_maps
            .insert(SmolStr::new(result_map.id()), Arc::new(result_map));
        Ok(())
    }

    /// Look up a statement by local id.
    pub fn statement(&self, id: &str) -> Option<&Arc<Statement>> {
        self.statements.get(id)
    }

    /// Look up a sql fragment by local id.
    pub fn fragment(&self, id: &str) -> Option<&Arc<SqlFragment>> {
        self.fragments.get(id)
    }

    /// Look up a result map by local id.
    pub fn result_map(&self, id: &str) -> Option<&Arc<ResultMap>> {
        self.result_maps.get(id)
    }

    /// Iterate the mapper's statements in declaration order.
    pub fn statements(&self) -> impl Iterator<Item = &Arc<Statement>> {
        self.statements.values()
    }

    /// Iterate the mapper's sql fragments in declaration order.
    pub fn fragments(&self) -> impl Iterator<Item = &Arc<SqlFragment>> {
        self.fragments.values()
    }
}

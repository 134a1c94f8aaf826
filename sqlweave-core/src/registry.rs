//! The mapper registry: namespace-keyed mappers and their render entry.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::buffer::BufferPool;
use crate::error::{RegistryError, RenderError};
use crate::mapper::{Mapper, SqlFragment, Statement};
use crate::node::{Node, NodeGroup, RenderContext};
use crate::param::Parameter;
use crate::translator::Translator;
use crate::value::ParamValue;

/// Holds every loaded mapper, keyed by namespace, plus a flat statement
/// table keyed by `namespace.id`.
///
/// The registry is built once at load time and read-only afterwards; renders
/// share it freely.
#[derive(Debug, Default)]
pub struct MapperRegistry {
    mappers: IndexMap<SmolStr, Arc<Mapper>>,
    statements: IndexMap<String, Arc<Statement>>,
    buffers: BufferPool,
}

impl MapperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapper and all of its statements.
    pub fn register(&mut self, mapper: Mapper) -> Result<(), RegistryError> {
        if self.mappers.contains_key(mapper.namespace()) {
            return Err(RegistryError::DuplicateNamespace(SmolStr::new(
                mapper.namespace(),
            )));
        }
        let mapper = Arc::new(mapper);
        for statement in mapper.statements() {
            self.set_statement(statement.key(), statement.clone())?;
        }
        debug!(namespace = mapper.namespace(), "mapper registered");
        self.mappers
            .insert(SmolStr::new(mapper.namespace()), mapper);
        Ok(())
    }

    /// Register one statement under a fully-qualified key.
    pub fn set_statement(
        &mut self,
        key: impl Into<String>,
        statement: Arc<Statement>,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        if self.statements.contains_key(&key) {
            return Err(RegistryError::DuplicateStatement(key));
        }
        self.statements.insert(key, statement);
        Ok(())
    }

    /// Look up a statement by fully-qualified key.
    pub fn get_statement(&self, key: &str) -> Option<&Arc<Statement>> {
        self.statements.get(key)
    }

    /// Look up a mapper by namespace.
    pub fn mapper(&self, namespace: &str) -> Option<&Arc<Mapper>> {
        self.mappers.get(namespace)
    }

    /// Number of registered mappers.
    pub fn mapper_count(&self) -> usize {
        self.mappers.len()
    }

    /// Number of registered statements.
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Resolve an `include` refid from the given owning namespace.
    ///
    /// A refid containing a dot is `namespace.id`; a bare refid resolves in
    /// the owning mapper's own fragment table.
    pub fn sql_fragment(
        &self,
        owner_namespace: &str,
        refid: &str,
    ) -> Result<Arc<SqlFragment>, RenderError> {
        let (namespace, id) = match refid.rsplit_once('.') {
            Some((namespace, id)) => (namespace, id),
            None => (owner_namespace, refid),
        };
        self.mappers
            .get(namespace)
            .and_then(|mapper| mapper.fragment(id))
            .cloned()
            .ok_or_else(|| RenderError::FragmentNotFound {
                refid: SmolStr::new(refid),
                namespace: SmolStr::new(owner_namespace),
            })
    }

    /// Compile a statement into SQL plus its ordered argument list.
    pub fn build_query(
        &self,
        key: &str,
        translator: &dyn Translator,
        params: &dyn Parameter,
    ) -> Result<(String, Vec<ParamValue>), RenderError> {
        let statement = self
            .get_statement(key)
            .ok_or_else(|| RenderError::StatementNotFound {
                key: key.to_string(),
            })?;
        let ctx = RenderContext::new(self, translator, &self.buffers);
        let (sql, args) = statement.render(&ctx, params)?;
        debug!(
            statement = key,
            sql_len = sql.len(),
            arg_count = args.len(),
            "query rendered"
        );
        Ok((sql, args))
    }

    /// Walk every fragment's include edges and reject cycles.
    ///
    /// Refids that do not resolve yet are skipped here; they surface as
    /// render errors on first use, matching lazy resolution.
    pub fn validate_includes(&self) -> Result<(), RegistryError> {
        for mapper in self.mappers.values() {
            for fragment in mapper.fragments() {
                let mut trail = Vec::new();
                self.visit_fragment(fragment, &mut trail)?;
            }
        }
        Ok(())
    }

    fn visit_fragment(
        &self,
        fragment: &SqlFragment,
        trail: &mut Vec<String>,
    ) -> Result<(), RegistryError> {
        let key = format!("{}.{}", fragment.namespace(), fragment.id());
        if trail.contains(&key) {
            trail.push(key);
            return Err(RegistryError::IncludeCycle {
                path: trail.join(" -> "),
            });
        }
        trail.push(key);
        self.visit_nodes(fragment.nodes(), trail)?;
        trail.pop();
        Ok(())
    }

    fn visit_nodes(&self, nodes: &NodeGroup, trail: &mut Vec<String>) -> Result<(), RegistryError> {
        for node in nodes.iter() {
            if let Node::Include(include) = node {
                if let Ok(fragment) = self.sql_fragment(include.namespace(), include.refid()) {
                    self.visit_fragment(&fragment, trail)?;
                }
                continue;
            }
            for group in node.child_groups() {
                self.visit_nodes(group, trail)?;
            }
        }
        Ok(())
    }
}

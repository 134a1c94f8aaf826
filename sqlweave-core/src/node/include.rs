//! `<include refid="…">`: splices a registered sql fragment in place.

use std::sync::{Arc, OnceLock};

use smol_str::SmolStr;
use tracing::debug;

use super::{RenderContext, Rendered};
use crate::error::RenderError;
use crate::mapper::SqlFragment;
use crate::param::Parameter;

/// A reference to a sql fragment, resolved through the registry on first
/// render and cached for every render after.
///
/// Resolution is deterministic, so the racy-but-idempotent publish through
/// [`OnceLock`] is safe under concurrent renders.
#[derive(Debug, Clone)]
pub struct IncludeNode {
    refid: SmolStr,
    namespace: SmolStr,
    resolved: OnceLock<Arc<SqlFragment>>,
}

impl IncludeNode {
    /// Reference a fragment from within the given mapper namespace.
    pub fn new(refid: impl Into<SmolStr>, namespace: impl Into<SmolStr>) -> Self {
        Self {
            refid: refid.into(),
            namespace: namespace.into(),
            resolved: OnceLock::new(),
        }
    }

    /// The raw refid as written in the source.
    pub fn refid(&self) -> &str {
        &self.refid
    }

    /// The namespace of the mapper the include appears in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        let _depth = ctx.enter_include()?;
        let fragment = match self.resolved.get() {
            Some(fragment) => fragment,
            None => {
                let fragment = ctx.registry().sql_fragment(&self.namespace, &self.refid)?;
                debug!(refid = %self.refid, namespace = %self.namespace, "include resolved");
                self.resolved.get_or_init(|| fragment)
            }
        };
        fragment.render(ctx, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferPool;
    use crate::mapper::Mapper;
    use crate::node::{Node, NodeGroup, RenderContext};
    use crate::params;
    use crate::registry::MapperRegistry;
    use crate::translator::Dialect;
    use crate::value::ParamValue;

    fn registry_with_fragment() -> MapperRegistry {
        let mut mapper = Mapper::new("acct", Default::default());
        mapper
            .add_fragment(SqlFragment::new(
                "cols",
                "acct",
                NodeGroup::new(vec![Node::text("id, name")]),
            ))
            .unwrap();
        let mut registry = MapperRegistry::new();
        registry.register(mapper).unwrap();
        registry
    }

    #[test]
    fn test_include_splices_fragment() {
        let registry = registry_with_fragment();
        let pool = BufferPool::new();
        let dialect = Dialect::MySql;
        let ctx = RenderContext::new(&registry, &dialect, &pool);
        let node = IncludeNode::new("cols", "acct");
        let (sql, args) = node.render(&ctx, &params! {}).unwrap();
        assert_eq!(sql, "id, name");
        assert!(args.is_empty());
        // Second render hits the cached reference.
        let (sql, _) = node.render(&ctx, &params! {}).unwrap();
        assert_eq!(sql, "id, name");
    }

    #[test]
    fn test_unresolved_refid_errors_on_render() {
        let registry = MapperRegistry::new();
        let pool = BufferPool::new();
        let dialect = Dialect::MySql;
        let ctx = RenderContext::new(&registry, &dialect, &pool);
        let node = IncludeNode::new("nope", "acct");
        let err = node.render(&ctx, &params! {}).unwrap_err();
        assert!(matches!(err, RenderError::FragmentNotFound { .. }));
    }

    #[test]
    fn test_cross_namespace_refid() {
        let registry = registry_with_fragment();
        let pool = BufferPool::new();
        let dialect = Dialect::MySql;
        let ctx = RenderContext::new(&registry, &dialect, &pool);
        // Referenced from another mapper by fully-qualified id.
        let node = IncludeNode::new("acct.cols", "other");
        let (sql, _) = node.render(&ctx, &params! {}).unwrap();
        assert_eq!(sql, "id, name");
    }

    #[test]
    fn test_argument_in_fragment_flows_through() {
        let mut mapper = Mapper::new("m", Default::default());
        mapper
            .add_fragment(SqlFragment::new(
                "cond",
                "m",
                NodeGroup::new(vec![Node::text("id = #{id}")]),
            ))
            .unwrap();
        let mut registry = MapperRegistry::new();
        registry.register(mapper).unwrap();
        let pool = BufferPool::new();
        let dialect = Dialect::MySql;
        let ctx = RenderContext::new(&registry, &dialect, &pool);
        let node = IncludeNode::new("cond", "m");
        let (sql, args) = node.render(&ctx, &params! { "id" => 4 }).unwrap();
        assert_eq!(sql, "id = ?");
        assert_eq!(args, vec![ParamValue::Int(4)]);
    }
}

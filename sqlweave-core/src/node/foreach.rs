//! `<foreach>`: iteration over sequences and mappings.

use smol_str::SmolStr;

use super::{NodeGroup, RenderContext, Rendered};
use crate::error::RenderError;
use crate::param::{IterationScope, ParamGroup, Parameter};
use crate::value::ParamValue;

/// Iterates a collection, rendering the body once per element.
///
/// Each pass pushes a scope binding `item` (and `index`, when named) in
/// front of the outer parameters. An empty collection contributes nothing,
/// not even `open`/`close`.
#[derive(Debug, Clone)]
pub struct ForeachNode {
    collection: SmolStr,
    item: SmolStr,
    index: Option<SmolStr>,
    open: String,
    close: String,
    separator: String,
    children: NodeGroup,
}

impl ForeachNode {
    /// Build a foreach container.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection: impl Into<SmolStr>,
        item: impl Into<SmolStr>,
        index: Option<SmolStr>,
        open: impl Into<String>,
        close: impl Into<String>,
        separator: impl Into<String>,
        children: NodeGroup,
    ) -> Self {
        Self {
            collection: collection.into(),
            item: item.into(),
            index,
            open: open.into(),
            close: close.into(),
            separator: separator.into(),
            children,
        }
    }

    /// The loop body.
    pub fn children(&self) -> &NodeGroup {
        &self.children
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        if scope.get(&self.item).is_some() {
            return Err(RenderError::ItemAlreadyBound {
                name: self.item.clone(),
            });
        }
        if let Some(index) = &self.index {
            if scope.get(index).is_some() {
                return Err(RenderError::ItemAlreadyBound { name: index.clone() });
            }
        }
        let collection =
            scope
                .get(&self.collection)
                .ok_or_else(|| RenderError::CollectionNotFound {
                    name: self.collection.clone(),
                })?;
        match collection {
            ParamValue::List(items) => {
                let entries = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (ParamValue::Int(i as i64), item));
                self.render_entries(ctx, scope, entries)
            }
            ParamValue::Map(entries) => {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (ParamValue::String(key), value));
                self.render_entries(ctx, scope, entries)
            }
            other => Err(RenderError::CollectionNotIterable {
                name: self.collection.clone(),
                kind: other.kind(),
            }),
        }
    }

    fn render_entries(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
        entries: impl ExactSizeIterator<Item = (ParamValue, ParamValue)>,
    ) -> Result<Rendered, RenderError> {
        let total = entries.len();
        if total == 0 {
            return Ok((String::new(), Vec::new()));
        }
        let mut buf = ctx.buffers().acquire();
        let mut args = Vec::new();
        buf.push_str(&self.open);
        for (position, (index, item)) in entries.enumerate() {
            let bindings =
                IterationScope::new(self.item.clone(), item, self.index.clone(), index);
            let pass = ParamGroup::stacked(&bindings, scope);
            for node in self.children.iter() {
                let (sql, mut node_args) = node.render(ctx, &pass)?;
                buf.push_str(&sql);
                args.append(&mut node_args);
            }
            if position < total - 1 {
                buf.push_str(&self.separator);
            }
        }
        buf.push_str(&self.close);
        Ok((buf.detach(), args))
    }
}

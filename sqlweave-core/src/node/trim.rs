//! String-shaping containers: `<where>`, `<set>`, and `<trim>`.

use super::{NodeGroup, RenderContext, Rendered};
use crate::error::RenderError;
use crate::param::Parameter;

/// `<where>`: emits nothing for an empty body, strips a leading `AND`/`OR`,
/// and guarantees exactly one `WHERE` leader.
#[derive(Debug, Clone)]
pub struct WhereNode {
    children: NodeGroup,
}

impl WhereNode {
    /// Wrap a body.
    pub fn new(children: NodeGroup) -> Self {
        Self { children }
    }

    /// The wrapped body.
    pub fn children(&self) -> &NodeGroup {
        &self.children
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        let (mut body, args) = self.children.render(ctx, scope)?;
        if body.is_empty() {
            return Ok((body, args));
        }
        if body.starts_with("and") || body.starts_with("AND") {
            body.replace_range(..3, "");
        } else if body.starts_with("or") || body.starts_with("OR") {
            body.replace_range(..2, "");
        }
        let rest = body.trim_start();
        let sql = if rest.starts_with("where") || rest.starts_with("WHERE") {
            rest.to_string()
        } else {
            format!("WHERE {rest}")
        };
        Ok((sql, args))
    }
}

/// `<set>`: prefixes a non-empty body with `SET ` and drops one trailing
/// comma.
#[derive(Debug, Clone)]
pub struct SetNode {
    children: NodeGroup,
}

impl SetNode {
    /// Wrap a body.
    pub fn new(children: NodeGroup) -> Self {
        Self { children }
    }

    /// The wrapped body.
    pub fn children(&self) -> &NodeGroup {
        &self.children
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        let (body, args) = self.children.render(ctx, scope)?;
        if body.is_empty() {
            return Ok((body, args));
        }
        let mut sql = format!("SET {body}");
        sql.truncate(sql.trim_end().len());
        if sql.ends_with(',') {
            sql.pop();
        }
        Ok((sql, args))
    }
}

/// `<trim>`: strips one matching prefix/suffix override from the body, then
/// attaches the configured prefix and suffix.
///
/// Overrides are tried in order and only the first hit on each side is
/// stripped; stripping happens before the prefix/suffix are attached.
#[derive(Debug, Clone)]
pub struct TrimNode {
    children: NodeGroup,
    prefix: String,
    suffix: String,
    prefix_overrides: Vec<String>,
    suffix_overrides: Vec<String>,
}

impl TrimNode {
    /// Build a trim container.
    pub fn new(
        children: NodeGroup,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        prefix_overrides: Vec<String>,
        suffix_overrides: Vec<String>,
    ) -> Self {
        Self {
            children,
            prefix: prefix.into(),
            suffix: suffix.into(),
            prefix_overrides: prefix_overrides.into_iter().filter(|o| !o.is_empty()).collect(),
            suffix_overrides: suffix_overrides.into_iter().filter(|o| !o.is_empty()).collect(),
        }
    }

    /// The wrapped body.
    pub fn children(&self) -> &NodeGroup {
        &self.children
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        let (mut body, args) = self.children.render(ctx, scope)?;
        for over in &self.prefix_overrides {
            if body.starts_with(over.as_str()) {
                body.replace_range(..over.len(), "");
                break;
            }
        }
        for over in &self.suffix_overrides {
            if body.ends_with(over.as_str()) {
                body.truncate(body.len() - over.len());
                break;
            }
        }
        if !self.prefix.is_empty() {
            body.insert_str(0, &self.prefix);
        }
        if !self.suffix.is_empty() {
            body.push_str(&self.suffix);
        }
        Ok((body, args))
    }
}

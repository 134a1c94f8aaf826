//! `<choose>` / `<when>` / `<otherwise>`: first non-empty branch wins.

use super::{ConditionNode, NodeGroup, RenderContext, Rendered};
use crate::error::RenderError;
use crate::param::Parameter;

/// An ordered set of guarded branches with an optional fallback.
///
/// Branches are tried in order; the first one producing non-empty output is
/// returned and the rest are skipped. A branch whose guard holds but whose
/// body renders empty does not win.
#[derive(Debug, Clone)]
pub struct ChooseNode {
    whens: Vec<ConditionNode>,
    otherwise: Option<NodeGroup>,
}

impl ChooseNode {
    /// Build from ordered `when` branches and an optional `otherwise`.
    pub fn new(whens: Vec<ConditionNode>, otherwise: Option<NodeGroup>) -> Self {
        Self { whens, otherwise }
    }

    /// The branch bodies plus the fallback, for graph walks.
    pub(crate) fn child_groups(&self) -> Vec<&NodeGroup> {
        let mut groups: Vec<&NodeGroup> = self.whens.iter().map(|w| w.children()).collect();
        if let Some(otherwise) = &self.otherwise {
            groups.push(otherwise);
        }
        groups
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        for when in &self.whens {
            let (sql, args) = when.render(ctx, scope)?;
            if !sql.is_empty() {
                return Ok((sql, args));
            }
        }
        match &self.otherwise {
            Some(otherwise) => otherwise.render(ctx, scope),
            None => Ok((String::new(), Vec::new())),
        }
    }
}

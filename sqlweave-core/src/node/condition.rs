//! Conditional rendering: `<if>` and `<when>` share one node type.

use super::{NodeGroup, RenderContext, Rendered};
use crate::error::RenderError;
use crate::eval::{EvalError, Expression};
use crate::param::Parameter;

/// A compiled `test` expression guarding a body.
#[derive(Debug, Clone)]
pub struct ConditionNode {
    expr: Expression,
    children: NodeGroup,
}

impl ConditionNode {
    /// Compile the `test` expression and attach the body.
    pub fn new(test: &str, children: NodeGroup) -> Result<Self, EvalError> {
        Ok(Self {
            expr: Expression::compile(test)?,
            children,
        })
    }

    /// The guarded body.
    pub fn children(&self) -> &NodeGroup {
        &self.children
    }

    /// Evaluate the guard against the scope.
    pub fn matches(&self, scope: &dyn Parameter) -> Result<bool, EvalError> {
        self.expr.truthy(scope)
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        if self.matches(scope)? {
            self.children.render(ctx, scope)
        } else {
            Ok((String::new(), Vec::new()))
        }
    }
}

//! Error types for the render core.

use smol_str::SmolStr;
use thiserror::Error;

use crate::eval::EvalError;

/// Structural errors raised while building the mapper graph.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two mappers declared the same namespace.
    #[error("duplicate mapper namespace `{0}`")]
    DuplicateNamespace(SmolStr),

    /// Two statements resolved to the same fully-qualified key.
    #[error("duplicate statement id `{0}`")]
    DuplicateStatement(String),

    /// Two sql fragments with the same id inside one mapper.
    #[error("duplicate sql fragment `{namespace}.{id}`")]
    DuplicateFragment { namespace: SmolStr, id: SmolStr },

    /// Two result maps with the same id inside one mapper.
    #[error("duplicate result map `{namespace}.{id}`")]
    DuplicateResultMap { namespace: SmolStr, id: SmolStr },

    /// The same column mapped more than once within a result map.
    #[error("ambiguous column mapping `{column}` in result map `{id}`")]
    AmbiguousColumn { id: SmolStr, column: SmolStr },

    /// Fragments include each other in a loop.
    #[error("include cycle: {path}")]
    IncludeCycle { path: String },
}

/// Errors raised while rendering a statement.
///
/// A render error aborts the whole render; no partial SQL is returned.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested fully-qualified statement key is not registered.
    #[error("statement `{key}` not found")]
    StatementNotFound { key: String },

    /// An `include` refid did not resolve to a registered fragment.
    #[error("sql fragment `{refid}` not found from mapper `{namespace}`")]
    FragmentNotFound { refid: SmolStr, namespace: SmolStr },

    /// A `#{…}` or `${…}` name missed the parameter scope.
    #[error("parameter `{name}` not found")]
    ParameterNotFound { name: SmolStr },

    /// The `foreach` collection missed the parameter scope.
    #[error("collection `{name}` not found")]
    CollectionNotFound { name: SmolStr },

    /// The `foreach` collection is neither a sequence nor a mapping.
    #[error("collection `{name}` is not iterable ({kind} value)")]
    CollectionNotIterable { name: SmolStr, kind: &'static str },

    /// A `foreach` binding name is already taken in the surrounding scope.
    #[error("item `{name}` already exists")]
    ItemAlreadyBound { name: SmolStr },

    /// Include recursion ran away; almost always an include cycle that
    /// crossed configurations and escaped the load-time check.
    #[error("include nesting exceeded {max} levels")]
    IncludeDepthExceeded { max: usize },

    /// A condition expression failed to evaluate.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

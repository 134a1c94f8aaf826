//! # sqlweave-core
//!
//! Render core for the sqlweave dynamic SQL mapping engine.
//!
//! This crate provides:
//! - The node tree (`text`, `if`, `where`, `set`, `trim`, `foreach`,
//!   `include`, `choose`) and its renderer
//! - The mapper / statement / fragment object graph and registry
//! - The condition expression compiler and evaluator
//! - Parameter views with dotted-path lookup and stacked scopes
//! - Dialect translators for placeholder styles
//!
//! Rendering a statement produces the final SQL string plus the ordered
//! argument list; the i-th argument always corresponds to the i-th
//! placeholder, left to right.
//!
//! ## Example
//!
//! ```rust
//! use sqlweave_core::{params, Dialect, MapperRegistry, Mapper, Statement, Action, Node, NodeGroup};
//!
//! let mut mapper = Mapper::new("users", Default::default());
//! mapper.add_statement(Statement::new(
//!     Action::Select,
//!     "users",
//!     "find",
//!     Default::default(),
//!     NodeGroup::new(vec![Node::text("SELECT * FROM users WHERE id = #{id}")]),
//! ))?;
//!
//! let mut registry = MapperRegistry::new();
//! registry.register(mapper)?;
//!
//! let (sql, args) = registry.build_query("users.find", &Dialect::MySql, &params! { "id" => 7 })?;
//! assert_eq!(sql, "SELECT * FROM users WHERE id = ?");
//! assert_eq!(args.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod buffer;
pub mod error;
pub mod eval;
pub mod mapper;
pub mod node;
pub mod param;
pub mod registry;
pub mod result_map;
pub mod translator;
pub mod value;

pub use error::{RegistryError, RenderError};
pub use eval::{EvalError, Expression};
pub use mapper::{Action, Mapper, SqlFragment, Statement};
pub use node::{
    ChooseNode, ConditionNode, ForeachNode, IncludeNode, Node, NodeGroup, RenderContext, Rendered,
    SetNode, TextNode, TrimNode, WhereNode,
};
pub use param::{IterationScope, ParamGroup, Parameter, Params, DEFAULT_PARAM_KEY};
pub use registry::MapperRegistry;
pub use result_map::{Association, Collection, ColumnMapping, ResultMap};
pub use translator::{Dialect, NamedColon, Translator};
pub use value::ParamValue;

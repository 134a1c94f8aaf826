//! # sqlweave
//!
//! An XML-driven dynamic SQL mapping engine.
//!
//! sqlweave loads a declarative description of parameterized SQL fragments
//! from an XML configuration and, at call time, compiles those fragments
//! (with conditionals, loops, references, and trimming rules) into a
//! concrete SQL string and an ordered argument list ready for a database
//! driver.
//!
//! ## Quick start
//!
//! ```rust
//! use sqlweave::prelude::*;
//!
//! let config = sqlweave::load_str(r#"
//!     <configuration>
//!       <environments default="dev">
//!         <environment id="dev">
//!           <driver>postgres</driver>
//!           <dataSource>postgres://localhost/app</dataSource>
//!         </environment>
//!       </environments>
//!       <mappers>
//!         <mapper namespace="users">
//!           <select id="search">
//!             SELECT * FROM users
//!             <where>
//!               <if test="id != 0">AND id = #{id}</if>
//!               <if test="name != ''">AND name = #{name}</if>
//!             </where>
//!           </select>
//!         </mapper>
//!       </mappers>
//!     </configuration>
//! "#)?;
//!
//! let (sql, args) = config.build_query("users.search", &params! { "id" => 7, "name" => "" })?;
//! assert_eq!(sql, "SELECT * FROM users WHERE id = $1");
//! assert_eq!(args.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Tags
//!
//! Statement bodies mix raw SQL with dynamic tags:
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `<if test="…">` | Renders its body when the expression is truthy |
//! | `<where>` | Emits `WHERE`, strips a leading `AND`/`OR`, drops out when empty |
//! | `<set>` | Emits `SET`, drops one trailing comma, drops out when empty |
//! | `<trim>` | Prefix/suffix attachment with override stripping |
//! | `<foreach>` | Iterates a sequence or mapping with `open`/`close`/`separator` |
//! | `<include refid="…">` | Splices a named `<sql>` fragment |
//! | `<choose>/<when>/<otherwise>` | First branch with non-empty output wins |
//!
//! `#{name}` sites bind arguments through the dialect translator; `${name}`
//! sites splice the value's text form in place.

pub use sqlweave_config::{
    load_file, load_str, ConfigError, ConfigResult, Configuration, Environment, Environments,
    FileSystem, LocalFs, Settings, XmlLoader,
};
pub use sqlweave_core::{
    params, Action, Dialect, EvalError, Expression, Mapper, MapperRegistry, NamedColon, Node,
    NodeGroup, ParamGroup, ParamValue, Parameter, Params, RegistryError, RenderError, SqlFragment,
    Statement, Translator,
};

/// The commonly needed names in one import.
pub mod prelude {
    pub use sqlweave_config::{load_file, load_str, Configuration};
    pub use sqlweave_core::{params, Dialect, ParamValue, Parameter, Params, Translator};
}

//! # sqlweave-config
//!
//! XML configuration loader for the sqlweave dynamic SQL mapping engine.
//!
//! This crate provides:
//! - A streaming parser for `<configuration>` documents (`settings`,
//!   `environments`, `mappers`)
//! - Statement and fragment body parsing into the core node tree
//! - External mapper loading by `resource` (through an injected file
//!   system) or `url` (`file://`, `http://`, `https://`)
//! - Load-time validation: required attributes, duplicate ids, expression
//!   compilation, include-cycle rejection
//!
//! ## Example
//!
//! ```rust
//! use sqlweave_config::load_str;
//! use sqlweave_core::{params, Dialect};
//!
//! let config = load_str(r#"
//!     <configuration>
//!       <mappers>
//!         <mapper namespace="users">
//!           <select id="find">SELECT * FROM users WHERE id = #{id}</select>
//!         </mapper>
//!       </mappers>
//!     </configuration>
//! "#)?;
//!
//! let (sql, args) = config.build_query_with("users.find", &Dialect::Postgres, &params! { "id" => 7 })?;
//! assert_eq!(sql, "SELECT * FROM users WHERE id = $1");
//! assert_eq!(args.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod configuration;
pub mod error;
pub mod fs;
pub mod loader;

pub use configuration::{Configuration, Environment, Environments, Settings};
pub use error::{ConfigError, ConfigResult};
pub use fs::{FileSystem, LocalFs};
pub use loader::{load_file, load_str, XmlLoader};

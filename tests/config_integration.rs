//! Loading a complete configuration: settings, environments, and mappers
//! from inline bodies and external sources.

use std::collections::HashMap;
use std::io;

use sqlweave::prelude::*;
use sqlweave::{ConfigError, FileSystem, XmlLoader};

struct MemoryFs(HashMap<String, String>);

impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

const FULL_CONFIG: &str = r#"
<configuration>
  <settings>
    <logLevel>debug</logLevel>
    <pretty>true</pretty>
  </settings>
  <environments default="prod">
    <environment id="prod">
      <driver>postgres</driver>
      <dataSource>postgres://db.internal/app</dataSource>
      <maxOpenConnNum>50</maxOpenConnNum>
      <maxIdleConnNum>10</maxIdleConnNum>
      <maxLifetime>3600</maxLifetime>
      <maxIdleConnLifetime>600</maxIdleConnLifetime>
    </environment>
    <environment id="dev">
      <driver>sqlite3</driver>
      <dataSource>dev.db</dataSource>
    </environment>
  </environments>
  <mappers>
    <mapper namespace="users">
      <sql id="cols">id, name, role</sql>
      <select id="byId">SELECT <include refid="cols"/> FROM users WHERE id = #{id}</select>
    </mapper>
    <mapper namespace="orders" resource="mappers/orders.xml"/>
  </mappers>
</configuration>
"#;

fn loader() -> XmlLoader<MemoryFs> {
    let mut files = HashMap::new();
    files.insert(
        "mappers/orders.xml".to_string(),
        r#"<mapper>
             <select id="forUser">
               SELECT * FROM orders
               <where>
                 <if test="user_id != 0">AND user_id = #{user_id}</if>
               </where>
             </select>
           </mapper>"#
            .to_string(),
    );
    XmlLoader::with_fs(MemoryFs(files))
}

#[test]
fn full_configuration_loads() {
    let config = loader().load_str(FULL_CONFIG).unwrap();

    assert_eq!(config.settings().get("logLevel"), Some("debug"));
    assert_eq!(config.settings().get("pretty"), Some("true"));

    let envs = config.environments();
    assert_eq!(envs.len(), 2);
    let prod = envs.default_environment().unwrap();
    assert_eq!(prod.driver, "postgres");
    assert_eq!(prod.data_source, "postgres://db.internal/app");
    assert_eq!(prod.max_open_conns, 50);
    assert_eq!(prod.max_idle_conns, 10);
    assert_eq!(prod.max_conn_lifetime, 3600);
    assert_eq!(prod.max_idle_conn_lifetime, 600);

    assert_eq!(config.mappers().mapper_count(), 2);
    assert!(config.mappers().get_statement("users.byId").is_some());
    assert!(config.mappers().get_statement("orders.forUser").is_some());
}

#[test]
fn default_environment_drives_the_dialect() {
    let config = loader().load_str(FULL_CONFIG).unwrap();
    let (sql, args) = config
        .build_query("users.byId", &params! { "id" => 7 })
        .unwrap();
    assert_eq!(sql, "SELECT id, name, role FROM users WHERE id = $1");
    assert_eq!(args.len(), 1);
}

#[test]
fn external_mapper_lives_under_declared_namespace() {
    let config = loader().load_str(FULL_CONFIG).unwrap();
    let (sql, args) = config
        .build_query_with(
            "orders.forUser",
            &Dialect::MySql,
            &params! { "user_id" => 42 },
        )
        .unwrap();
    assert_eq!(sql, "SELECT * FROM orders WHERE user_id = ?");
    assert_eq!(args, vec![ParamValue::Int(42)]);
}

#[test]
fn missing_external_resource_is_fatal() {
    let loader = XmlLoader::with_fs(MemoryFs(HashMap::new()));
    let err = loader.load_str(FULL_CONFIG).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn explicit_translator_overrides_environment() {
    let config = loader().load_str(FULL_CONFIG).unwrap();
    let (sql, _) = config
        .build_query_with("users.byId", &Dialect::MySql, &params! { "id" => 7 })
        .unwrap();
    assert_eq!(sql, "SELECT id, name, role FROM users WHERE id = ?");
}

#[test]
fn named_translator_binds_by_name() {
    let config = loader().load_str(FULL_CONFIG).unwrap();
    let (sql, args) = config
        .build_query_with("users.byId", &sqlweave::NamedColon, &params! { "id" => 7 })
        .unwrap();
    assert_eq!(sql, "SELECT id, name, role FROM users WHERE id = :id");
    assert_eq!(args.len(), 1);
}

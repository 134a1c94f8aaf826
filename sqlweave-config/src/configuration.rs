//! The top-level configuration façade.

use indexmap::IndexMap;
use smol_str::SmolStr;

use sqlweave_core::{Dialect, MapperRegistry, ParamValue, Parameter, RenderError, Translator};

/// The root object a loaded configuration file produces.
///
/// Built once by the loader and immutable afterwards; renders read it
/// concurrently without synchronization.
#[derive(Debug, Default)]
pub struct Configuration {
    settings: Settings,
    environments: Environments,
    mappers: MapperRegistry,
}

impl Configuration {
    /// Assemble a configuration from its loaded parts.
    pub fn new(settings: Settings, environments: Environments, mappers: MapperRegistry) -> Self {
        Self {
            settings,
            environments,
            mappers,
        }
    }

    /// The `<settings>` block.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The `<environments>` block.
    pub fn environments(&self) -> &Environments {
        &self.environments
    }

    /// The mapper registry.
    pub fn mappers(&self) -> &MapperRegistry {
        &self.mappers
    }

    /// The placeholder dialect of the default environment's driver.
    pub fn dialect(&self) -> Option<Dialect> {
        self.environments
            .default_environment()
            .and_then(|env| Dialect::for_driver(&env.driver))
    }

    /// Compile a statement using the default environment's dialect.
    ///
    /// Falls back to the default dialect when no environment is declared or
    /// the driver name is unrecognized. Use [`Self::build_query_with`] to
    /// pick the translator explicitly.
    pub fn build_query(
        &self,
        statement: &str,
        params: &dyn Parameter,
    ) -> Result<(String, Vec<ParamValue>), RenderError> {
        let dialect = self.dialect().unwrap_or_default();
        self.mappers.build_query(statement, &dialect, params)
    }

    /// Compile a statement with an explicit translator.
    pub fn build_query_with(
        &self,
        statement: &str,
        translator: &dyn Translator,
        params: &dyn Parameter,
    ) -> Result<(String, Vec<ParamValue>), RenderError> {
        self.mappers.build_query(statement, translator, params)
    }
}

/// A flat `name -> value` settings bag.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: IndexMap<SmolStr, String>,
}

impl Settings {
    /// Look up a setting value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no settings were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate settings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub(crate) fn insert(&mut self, name: impl Into<SmolStr>, value: String) {
        self.entries.insert(name.into(), value);
    }
}

/// The environment table plus the id of the default entry.
#[derive(Debug, Clone, Default)]
pub struct Environments {
    default_id: SmolStr,
    entries: IndexMap<SmolStr, Environment>,
}

impl Environments {
    pub(crate) fn new(default_id: impl Into<SmolStr>) -> Self {
        Self {
            default_id: default_id.into(),
            entries: IndexMap::new(),
        }
    }

    /// The declared default environment id.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Look up an environment by id.
    pub fn get(&self, id: &str) -> Option<&Environment> {
        self.entries.get(id)
    }

    /// The environment the `default` attribute names.
    pub fn default_environment(&self) -> Option<&Environment> {
        self.entries.get(self.default_id.as_str())
    }

    /// Number of declared environments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no environments were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn insert(&mut self, env: Environment) {
        self.entries.insert(env.id.clone(), env);
    }
}

/// Connection parameters for one `<environment>`.
///
/// The four numerics are optional; zero means "unset".
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub id: SmolStr,
    pub driver: String,
    pub data_source: String,
    pub max_open_conns: u64,
    pub max_idle_conns: u64,
    pub max_conn_lifetime: u64,
    pub max_idle_conn_lifetime: u64,
}

impl Environment {
    pub(crate) fn new(id: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The placeholder dialect of this environment's driver, if known.
    pub fn dialect(&self) -> Option<Dialect> {
        Dialect::for_driver(&self.driver)
    }
}

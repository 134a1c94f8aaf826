//! Streaming XML loader for mapper configurations.
//!
//! The loader walks the token stream once, dispatching on element names and
//! materializing the typed object graph as it goes. Loading an external
//! mapper (by `resource` or `url`) re-enters the same logic on a sub-stream;
//! the content is attached under the namespace declared at the reference
//! site.

use std::path::Path;

use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;
use smol_str::SmolStr;
use tracing::{debug, info};

use sqlweave_core::node::{ChooseNode, ConditionNode, ForeachNode, IncludeNode, TrimNode};
use sqlweave_core::result_map::{Association, Collection, ColumnMapping, ResultMap};
use sqlweave_core::{
    Action, Mapper, MapperRegistry, Node, NodeGroup, SetNode, SqlFragment, Statement, WhereNode,
    DEFAULT_PARAM_KEY,
};

use crate::configuration::{Configuration, Environment, Environments, Settings};
use crate::error::{ConfigError, ConfigResult};
use crate::fs::{fetch_url, FileSystem, LocalFs};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Load a configuration from an XML string.
pub fn load_str(xml: &str) -> ConfigResult<Configuration> {
    XmlLoader::new().load_str(xml)
}

/// Load a configuration from an XML file on the local file system.
pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Configuration> {
    XmlLoader::new().load_file(path)
}

/// The streaming configuration loader.
pub struct XmlLoader<F = LocalFs> {
    fs: F,
}

impl XmlLoader<LocalFs> {
    /// A loader backed by the local file system.
    pub fn new() -> Self {
        Self { fs: LocalFs }
    }
}

impl Default for XmlLoader<LocalFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> XmlLoader<F> {
    /// A loader with an injected file system.
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Load a configuration from a file opened through the loader's
    /// file system.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<Configuration> {
        let path = path.as_ref().to_string_lossy().into_owned();
        info!(path = %path, "loading configuration file");
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| ConfigError::io(path, e))?;
        self.load_str(&content)
    }

    /// Load a configuration from an XML string.
    pub fn load_str(&self, xml: &str) -> ConfigResult<Configuration> {
        let mut reader = Reader::from_str(xml);
        let mut settings = Settings::default();
        let mut environments = Environments::default();
        let mut registry = MapperRegistry::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"configuration" => {}
                    b"settings" => settings = self.parse_settings(&mut reader)?,
                    b"environments" => environments = self.parse_environments(&mut reader, &e)?,
                    b"mappers" => self.parse_mappers(&mut reader, &mut registry)?,
                    _ => {
                        // Unknown top-level elements are skipped whole.
                        reader.read_to_end(e.name())?;
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }
        registry.validate_includes()?;
        info!(
            mappers = registry.mapper_count(),
            statements = registry.statement_count(),
            environments = environments.len(),
            settings = settings.len(),
            "configuration loaded"
        );
        Ok(Configuration::new(settings, environments, registry))
    }

    fn parse_settings(&self, reader: &mut XmlReader<'_>) -> ConfigResult<Settings> {
        let mut settings = Settings::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = start_name(&e);
                    let value = read_char_data(reader, &name)?;
                    settings.insert(name, value.trim().to_string());
                }
                Event::Empty(e) => {
                    settings.insert(start_name(&e), String::new());
                }
                Event::End(e) if end_name(&e) == "settings" => return Ok(settings),
                Event::Eof => return Err(ConfigError::UnexpectedEof("settings".into())),
                _ => {}
            }
        }
    }

    fn parse_environments(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
    ) -> ConfigResult<Environments> {
        let attributes = collect_attributes(start)?;
        let default_id = required(&attributes, "environments", "default")?;
        let mut environments = Environments::new(default_id.as_str());
        loop {
            match reader.read_event()? {
                Event::Start(e) if start_name(&e) == "environment" => {
                    let env = self.parse_environment(reader, &e)?;
                    if environments.contains(&env.id) {
                        return Err(ConfigError::DuplicateEnvironment(env.id.to_string()));
                    }
                    environments.insert(env);
                }
                Event::End(e) if end_name(&e) == "environments" => {
                    if !environments.contains(&default_id) {
                        return Err(ConfigError::UnknownDefaultEnvironment(default_id));
                    }
                    return Ok(environments);
                }
                Event::Eof => return Err(ConfigError::UnexpectedEof("environments".into())),
                _ => {}
            }
        }
    }

    fn parse_environment(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
    ) -> ConfigResult<Environment> {
        let attributes = collect_attributes(start)?;
        let id = required(&attributes, "environment", "id")?;
        let mut env = Environment::new(id.as_str());
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = start_name(&e);
                    match name.as_str() {
                        "driver" => env.driver = read_char_data(reader, "driver")?.trim().into(),
                        "dataSource" => {
                            env.data_source = read_char_data(reader, "dataSource")?.trim().into();
                        }
                        "maxIdleConnNum" => env.max_idle_conns = read_uint(reader, &name)?,
                        "maxOpenConnNum" => env.max_open_conns = read_uint(reader, &name)?,
                        "maxLifetime" => env.max_conn_lifetime = read_uint(reader, &name)?,
                        "maxIdleConnLifetime" => {
                            env.max_idle_conn_lifetime = read_uint(reader, &name)?;
                        }
                        _ => {
                            reader.read_to_end(e.name())?;
                        }
                    }
                }
                Event::End(e) if end_name(&e) == "environment" => return Ok(env),
                Event::Eof => return Err(ConfigError::UnexpectedEof("environment".into())),
                _ => {}
            }
        }
    }

    fn parse_mappers(
        &self,
        reader: &mut XmlReader<'_>,
        registry: &mut MapperRegistry,
    ) -> ConfigResult<()> {
        loop {
            match reader.read_event()? {
                Event::Start(e) if start_name(&e) == "mapper" => {
                    let mapper = self.parse_mapper_open(reader, &e)?;
                    debug!(namespace = mapper.namespace(), "mapper parsed");
                    registry.register(mapper)?;
                }
                Event::Empty(e) if start_name(&e) == "mapper" => {
                    let mapper = self.parse_mapper_empty(&e)?;
                    debug!(namespace = mapper.namespace(), "mapper parsed");
                    registry.register(mapper)?;
                }
                Event::End(e) if end_name(&e) == "mappers" => return Ok(()),
                Event::Eof => return Err(ConfigError::UnexpectedEof("mappers".into())),
                _ => {}
            }
        }
    }

    fn parse_mapper_open(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
    ) -> ConfigResult<Mapper> {
        let attributes = collect_attributes(start)?;
        let namespace = required(&attributes, "mapper", "namespace")?;
        if let Some(mapper) = self.external_mapper(&namespace, &attributes)? {
            // The inline body, if any, is superseded by the external source.
            reader.read_to_end(start.name())?;
            return Ok(mapper);
        }
        self.parse_mapper_body(reader, &namespace, attributes)
    }

    fn parse_mapper_empty(&self, start: &BytesStart<'_>) -> ConfigResult<Mapper> {
        let attributes = collect_attributes(start)?;
        let namespace = required(&attributes, "mapper", "namespace")?;
        if let Some(mapper) = self.external_mapper(&namespace, &attributes)? {
            return Ok(mapper);
        }
        Ok(Mapper::new(namespace.as_str(), attributes))
    }

    /// Resolve a `resource=` or `url=` reference, if the mapper carries one.
    fn external_mapper(
        &self,
        namespace: &str,
        attributes: &IndexMap<SmolStr, String>,
    ) -> ConfigResult<Option<Mapper>> {
        if let Some(resource) = attributes.get("resource").filter(|v| !v.is_empty()) {
            debug!(namespace, resource = resource.as_str(), "loading mapper resource");
            let content = self
                .fs
                .read_to_string(resource)
                .map_err(|e| ConfigError::io(resource.clone(), e))?;
            return self
                .parse_external(&content, namespace, attributes.clone())
                .map(Some);
        }
        if let Some(url) = attributes.get("url").filter(|v| !v.is_empty()) {
            let Some((scheme, rest)) = url.split_once("://") else {
                return Err(ConfigError::MalformedUrl(url.clone()));
            };
            debug!(namespace, url = url.as_str(), "loading mapper url");
            let content = match scheme {
                "file" => self
                    .fs
                    .read_to_string(rest)
                    .map_err(|e| ConfigError::io(rest, e))?,
                "http" | "https" => fetch_url(url)?,
                other => {
                    return Err(ConfigError::UnknownUrlScheme {
                        scheme: other.to_string(),
                        url: url.clone(),
                    })
                }
            };
            return self
                .parse_external(&content, namespace, attributes.clone())
                .map(Some);
        }
        Ok(None)
    }

    /// Parse an external mapper document under the declared namespace.
    fn parse_external(
        &self,
        content: &str,
        namespace: &str,
        declared: IndexMap<SmolStr, String>,
    ) -> ConfigResult<Mapper> {
        let mut reader = Reader::from_str(content);
        loop {
            match reader.read_event()? {
                Event::Start(e) if start_name(&e) == "mapper" => {
                    let mut attributes = collect_attributes(&e)?;
                    attributes.extend(declared);
                    return self.parse_mapper_body(&mut reader, namespace, attributes);
                }
                Event::Empty(e) if start_name(&e) == "mapper" => {
                    let mut attributes = collect_attributes(&e)?;
                    attributes.extend(declared);
                    return Ok(Mapper::new(namespace, attributes));
                }
                Event::Eof => {
                    return Err(ConfigError::invalid(format!(
                        "no <mapper> element in external source for `{namespace}`"
                    )))
                }
                _ => {}
            }
        }
    }

    fn parse_mapper_body(
        &self,
        reader: &mut XmlReader<'_>,
        namespace: &str,
        attributes: IndexMap<SmolStr, String>,
    ) -> ConfigResult<Mapper> {
        let mut mapper = Mapper::new(namespace, attributes);
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = start_name(&e);
                    if let Some(action) = Action::parse(&name) {
                        let stmt_attributes = collect_attributes(&e)?;
                        let id = required(&stmt_attributes, &name, "id")?;
                        let nodes = self.parse_body(reader, action.as_str(), namespace)?;
                        mapper.add_statement(Statement::new(
                            action,
                            namespace,
                            id.as_str(),
                            stmt_attributes,
                            nodes,
                        ))?;
                    } else if name == "sql" {
                        let frag_attributes = collect_attributes(&e)?;
                        let id = required(&frag_attributes, "sql", "id")?;
                        let nodes = self.parse_body(reader, "sql", namespace)?;
                        mapper.add_fragment(SqlFragment::new(id.as_str(), namespace, nodes))?;
                    } else if name == "resultMap" {
                        let result_map = self.parse_result_map(reader, &e)?;
                        mapper.add_result_map(result_map)?;
                    } else {
                        // Unknown mapper children are skipped whole.
                        reader.read_to_end(e.name())?;
                    }
                }
                Event::Empty(e) => {
                    let name = start_name(&e);
                    if let Some(action) = Action::parse(&name) {
                        let stmt_attributes = collect_attributes(&e)?;
                        let id = required(&stmt_attributes, &name, "id")?;
                        mapper.add_statement(Statement::new(
                            action,
                            namespace,
                            id.as_str(),
                            stmt_attributes,
                            NodeGroup::default(),
                        ))?;
                    } else if name == "sql" {
                        let frag_attributes = collect_attributes(&e)?;
                        let id = required(&frag_attributes, "sql", "id")?;
                        mapper.add_fragment(SqlFragment::new(
                            id.as_str(),
                            namespace,
                            NodeGroup::default(),
                        ))?;
                    }
                }
                Event::End(e) if end_name(&e) == "mapper" => return Ok(mapper),
                Event::Eof => return Err(ConfigError::UnexpectedEof("mapper".into())),
                _ => {}
            }
        }
    }

    /// Parse a statement or fragment body up to its end element.
    fn parse_body(
        &self,
        reader: &mut XmlReader<'_>,
        end_tag: &str,
        namespace: &str,
    ) -> ConfigResult<NodeGroup> {
        let mut nodes = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) => nodes.push(self.parse_tag(reader, &e, namespace, false)?),
                Event::Empty(e) => nodes.push(self.parse_tag(reader, &e, namespace, true)?),
                Event::Text(t) => {
                    let text = t.unescape()?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        nodes.push(Node::text(trimmed));
                    }
                }
                Event::CData(t) => {
                    let raw = t.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        nodes.push(Node::text(trimmed));
                    }
                }
                Event::End(e) => {
                    let name = end_name(&e);
                    if name == end_tag {
                        return Ok(NodeGroup::new(nodes));
                    }
                    return Err(ConfigError::UnexpectedEndElement(name));
                }
                Event::Eof => return Err(ConfigError::UnexpectedEof(end_tag.into())),
                _ => {}
            }
        }
    }

    /// Dispatch one tag inside a statement body.
    fn parse_tag(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
        namespace: &str,
        is_empty: bool,
    ) -> ConfigResult<Node> {
        let name = start_name(start);
        match name.as_str() {
            "if" => {
                let attributes = collect_attributes(start)?;
                let test = required(&attributes, "if", "test")?;
                let body = self.tag_body(reader, "if", namespace, is_empty)?;
                Ok(Node::If(ConditionNode::new(&test, body)?))
            }
            "where" => {
                let body = self.tag_body(reader, "where", namespace, is_empty)?;
                Ok(Node::Where(WhereNode::new(body)))
            }
            "set" => {
                let body = self.tag_body(reader, "set", namespace, is_empty)?;
                Ok(Node::Set(SetNode::new(body)))
            }
            "trim" => {
                let attributes = collect_attributes(start)?;
                let body = self.tag_body(reader, "trim", namespace, is_empty)?;
                Ok(Node::Trim(TrimNode::new(
                    body,
                    attributes.get("prefix").cloned().unwrap_or_default(),
                    attributes.get("suffix").cloned().unwrap_or_default(),
                    override_list(attributes.get("prefixOverrides")),
                    override_list(attributes.get("suffixOverrides")),
                )))
            }
            "foreach" => {
                let attributes = collect_attributes(start)?;
                let item = required(&attributes, "foreach", "item")?;
                let collection = attributes
                    .get("collection")
                    .filter(|v| !v.is_empty())
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PARAM_KEY);
                let index = attributes
                    .get("index")
                    .filter(|v| !v.is_empty())
                    .map(|v| SmolStr::new(v));
                let body = self.tag_body(reader, "foreach", namespace, is_empty)?;
                Ok(Node::Foreach(ForeachNode::new(
                    collection,
                    item.as_str(),
                    index,
                    attributes.get("open").cloned().unwrap_or_default(),
                    attributes.get("close").cloned().unwrap_or_default(),
                    attributes.get("separator").cloned().unwrap_or_default(),
                    body,
                )))
            }
            "include" => {
                let attributes = collect_attributes(start)?;
                let refid = required(&attributes, "include", "refid")?;
                if !is_empty {
                    reader.read_to_end(start.name())?;
                }
                Ok(Node::Include(IncludeNode::new(refid.as_str(), namespace)))
            }
            "choose" => self.parse_choose(reader, namespace, is_empty),
            other => Err(ConfigError::UnknownTag(other.to_string())),
        }
    }

    fn tag_body(
        &self,
        reader: &mut XmlReader<'_>,
        end_tag: &str,
        namespace: &str,
        is_empty: bool,
    ) -> ConfigResult<NodeGroup> {
        if is_empty {
            Ok(NodeGroup::default())
        } else {
            self.parse_body(reader, end_tag, namespace)
        }
    }

    fn parse_choose(
        &self,
        reader: &mut XmlReader<'_>,
        namespace: &str,
        is_empty: bool,
    ) -> ConfigResult<Node> {
        let mut whens = Vec::new();
        let mut otherwise: Option<NodeGroup> = None;
        if !is_empty {
            loop {
                match reader.read_event()? {
                    Event::Start(e) => {
                        let name = start_name(&e);
                        match name.as_str() {
                            "when" => {
                                let attributes = collect_attributes(&e)?;
                                let test = required(&attributes, "when", "test")?;
                                let body = self.parse_body(reader, "when", namespace)?;
                                whens.push(ConditionNode::new(&test, body)?);
                            }
                            "otherwise" => {
                                if otherwise.is_some() {
                                    return Err(ConfigError::invalid(
                                        "duplicate `otherwise` in `choose`",
                                    ));
                                }
                                otherwise = Some(self.parse_body(reader, "otherwise", namespace)?);
                            }
                            other => return Err(ConfigError::UnknownTag(other.to_string())),
                        }
                    }
                    Event::Empty(e) => {
                        let name = start_name(&e);
                        match name.as_str() {
                            "when" => {
                                let attributes = collect_attributes(&e)?;
                                let test = required(&attributes, "when", "test")?;
                                whens.push(ConditionNode::new(&test, NodeGroup::default())?);
                            }
                            "otherwise" => {
                                if otherwise.is_some() {
                                    return Err(ConfigError::invalid(
                                        "duplicate `otherwise` in `choose`",
                                    ));
                                }
                                otherwise = Some(NodeGroup::default());
                            }
                            other => return Err(ConfigError::UnknownTag(other.to_string())),
                        }
                    }
                    Event::End(e) => {
                        let name = end_name(&e);
                        if name == "choose" {
                            break;
                        }
                        return Err(ConfigError::UnexpectedEndElement(name));
                    }
                    Event::Eof => return Err(ConfigError::UnexpectedEof("choose".into())),
                    _ => {}
                }
            }
        }
        Ok(Node::Choose(ChooseNode::new(whens, otherwise)))
    }

    fn parse_result_map(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
    ) -> ConfigResult<ResultMap> {
        let attributes = collect_attributes(start)?;
        let id = required(&attributes, "resultMap", "id")?;
        let mut pk = None;
        let mut results = Vec::new();
        let mut associations = Vec::new();
        let mut collections = Vec::new();
        loop {
            let event = reader.read_event()?;
            let (element, is_empty) = match &event {
                Event::Start(e) => (Some(e.to_owned()), false),
                Event::Empty(e) => (Some(e.to_owned()), true),
                Event::End(e) if end_name(e) == "resultMap" => {
                    return ResultMap::try_new(id.as_str(), pk, results, associations, collections)
                        .map_err(Into::into);
                }
                Event::Eof => return Err(ConfigError::UnexpectedEof("resultMap".into())),
                _ => (None, false),
            };
            let Some(e) = element else { continue };
            let name = start_name(&e);
            match name.as_str() {
                "id" => {
                    pk = Some(column_mapping(&e)?);
                    if !is_empty {
                        reader.read_to_end(e.name())?;
                    }
                }
                "result" => {
                    results.push(column_mapping(&e)?);
                    if !is_empty {
                        reader.read_to_end(e.name())?;
                    }
                }
                "association" => {
                    associations.push(self.parse_association(reader, &e, is_empty)?);
                }
                "collection" => {
                    collections.push(self.parse_collection(reader, &e, is_empty)?);
                }
                other => return Err(ConfigError::UnknownTag(other.to_string())),
            }
        }
    }

    fn parse_association(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
        is_empty: bool,
    ) -> ConfigResult<Association> {
        let attributes = collect_attributes(start)?;
        let property = required(&attributes, "association", "property")?;
        let mut association = Association::new(property.as_str());
        if is_empty {
            return Ok(association);
        }
        loop {
            let event = reader.read_event()?;
            let (element, child_empty) = match &event {
                Event::Start(e) => (Some(e.to_owned()), false),
                Event::Empty(e) => (Some(e.to_owned()), true),
                Event::End(e) if end_name(e) == "association" => return Ok(association),
                Event::Eof => return Err(ConfigError::UnexpectedEof("association".into())),
                _ => (None, false),
            };
            let Some(e) = element else { continue };
            let name = start_name(&e);
            match name.as_str() {
                "result" => {
                    association.results.push(column_mapping(&e)?);
                    if !child_empty {
                        reader.read_to_end(e.name())?;
                    }
                }
                "association" => {
                    association
                        .associations
                        .push(self.parse_association(reader, &e, child_empty)?);
                }
                other => return Err(ConfigError::UnknownTag(other.to_string())),
            }
        }
    }

    fn parse_collection(
        &self,
        reader: &mut XmlReader<'_>,
        start: &BytesStart<'_>,
        is_empty: bool,
    ) -> ConfigResult<Collection> {
        let attributes = collect_attributes(start)?;
        let property = required(&attributes, "collection", "property")?;
        let mut collection = Collection::new(property.as_str());
        if is_empty {
            return Ok(collection);
        }
        loop {
            let event = reader.read_event()?;
            let (element, child_empty) = match &event {
                Event::Start(e) => (Some(e.to_owned()), false),
                Event::Empty(e) => (Some(e.to_owned()), true),
                Event::End(e) if end_name(e) == "collection" => return Ok(collection),
                Event::Eof => return Err(ConfigError::UnexpectedEof("collection".into())),
                _ => (None, false),
            };
            let Some(e) = element else { continue };
            let name = start_name(&e);
            match name.as_str() {
                "result" => {
                    collection.results.push(column_mapping(&e)?);
                    if !child_empty {
                        reader.read_to_end(e.name())?;
                    }
                }
                "association" => {
                    collection
                        .associations
                        .push(self.parse_association(reader, &e, child_empty)?);
                }
                other => return Err(ConfigError::UnknownTag(other.to_string())),
            }
        }
    }
}

fn start_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn end_name(e: &BytesEnd<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn collect_attributes(start: &BytesStart<'_>) -> ConfigResult<IndexMap<SmolStr, String>> {
    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = SmolStr::new(String::from_utf8_lossy(attr.key.local_name().as_ref()));
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}

fn required(
    attributes: &IndexMap<SmolStr, String>,
    element: &str,
    name: &'static str,
) -> ConfigResult<String> {
    attributes
        .get(name)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::missing_attribute(element, name))
}

fn override_list(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn column_mapping(start: &BytesStart<'_>) -> ConfigResult<ColumnMapping> {
    let element = start_name(start);
    let attributes = collect_attributes(start)?;
    let property = required(&attributes, &element, "property")?;
    let column = required(&attributes, &element, "column")?;
    Ok(ColumnMapping::new(property.as_str(), column.as_str()))
}

fn read_char_data(reader: &mut XmlReader<'_>, element: &str) -> ConfigResult<String> {
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => out.push_str(&t.unescape()?),
            Event::CData(t) => {
                let raw = t.into_inner();
                out.push_str(&String::from_utf8_lossy(&raw));
            }
            Event::End(e) => {
                let name = end_name(&e);
                if name == element {
                    return Ok(out);
                }
                return Err(ConfigError::UnexpectedEndElement(name));
            }
            Event::Eof => return Err(ConfigError::UnexpectedEof(element.to_string())),
            _ => {}
        }
    }
}

fn read_uint(reader: &mut XmlReader<'_>, element: &str) -> ConfigResult<u64> {
    let text = read_char_data(reader, element)?;
    let value = text.trim();
    let parsed: i64 = value.parse().map_err(|_| ConfigError::InvalidInteger {
        element: element.to_string(),
        value: value.to_string(),
    })?;
    u64::try_from(parsed).map_err(|_| {
        ConfigError::invalid(format!("`{element}` must be non-negative, got {parsed}"))
    })
}

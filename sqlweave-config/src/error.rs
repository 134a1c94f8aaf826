//! Error types for configuration loading.

use miette::Diagnostic;
use thiserror::Error;

use sqlweave_core::{EvalError, RegistryError};

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a configuration.
///
/// Every load error is fatal: no [`crate::Configuration`] is produced.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Error reading a configuration or mapper source.
    #[error("failed to read `{path}`")]
    #[diagnostic(code(sqlweave::config::io_error))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The XML token stream is malformed.
    #[error("malformed xml")]
    #[diagnostic(code(sqlweave::config::xml))]
    Xml(#[from] quick_xml::Error),

    /// An element attribute is malformed.
    #[error("malformed xml attribute")]
    #[diagnostic(code(sqlweave::config::xml_attr))]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// A required attribute is absent or empty.
    #[error("element `{element}` is missing required attribute `{attribute}`")]
    #[diagnostic(code(sqlweave::config::missing_attribute))]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// Two environments declared the same id.
    #[error("duplicate environment id `{0}`")]
    #[diagnostic(code(sqlweave::config::duplicate_environment))]
    DuplicateEnvironment(String),

    /// The `default` environment id names no declared environment.
    #[error("default environment `{0}` is not defined")]
    #[diagnostic(code(sqlweave::config::unknown_default_environment))]
    UnknownDefaultEnvironment(String),

    /// An element inside a statement body is not a recognized tag.
    #[error("unknown tag `{0}`")]
    #[diagnostic(code(sqlweave::config::unknown_tag))]
    UnknownTag(String),

    /// An end element closed something other than the open element.
    #[error("unexpected end element `{0}`")]
    #[diagnostic(code(sqlweave::config::unexpected_end))]
    UnexpectedEndElement(String),

    /// The document ended inside an open element.
    #[error("unexpected end of document inside `{0}`")]
    #[diagnostic(code(sqlweave::config::unexpected_eof))]
    UnexpectedEof(String),

    /// A mapper `url` carries no `://` separator.
    #[error("invalid url `{0}`")]
    #[diagnostic(code(sqlweave::config::malformed_url))]
    MalformedUrl(String),

    /// A mapper `url` scheme is not `file`, `http`, or `https`.
    #[error("unknown url scheme `{scheme}` in `{url}`")]
    #[diagnostic(code(sqlweave::config::unknown_url_scheme))]
    UnknownUrlScheme { scheme: String, url: String },

    /// Character data expected to be an integer did not parse.
    #[error("invalid integer in `{element}`: `{value}`")]
    #[diagnostic(code(sqlweave::config::invalid_integer))]
    InvalidInteger { element: String, value: String },

    /// A `test` attribute failed to compile.
    #[error("invalid expression")]
    #[diagnostic(code(sqlweave::config::expression))]
    Expression {
        #[from]
        source: EvalError,
    },

    /// A structural invariant of the mapper graph was violated.
    #[error(transparent)]
    #[diagnostic(code(sqlweave::config::registry))]
    Registry(#[from] RegistryError),

    /// Fetching an `http(s)://` mapper failed.
    #[error("failed to fetch mapper url")]
    #[diagnostic(code(sqlweave::config::http))]
    Http(#[from] reqwest::Error),

    /// Any other structural problem.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(sqlweave::config::invalid))]
    Invalid { message: String },
}

impl ConfigError {
    /// Create an I/O error for a source path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing-attribute error.
    pub fn missing_attribute(element: impl Into<String>, attribute: &'static str) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute,
        }
    }

    /// Create a catch-all structural error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

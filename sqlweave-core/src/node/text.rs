//! Text nodes: raw SQL carrying `#{…}` placeholders and `${…}` splices.

use std::sync::LazyLock;

use regex_lite::Regex;
use smol_str::SmolStr;

use super::{RenderContext, Rendered};
use crate::error::RenderError;
use crate::param::Parameter;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{ *([A-Za-z0-9_.]+) *\}").unwrap());
static SUBSTITUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{ *([A-Za-z0-9_.]+) *\}").unwrap());

/// One scanned `#{…}` or `${…}` site: the full match and the captured name.
#[derive(Debug, Clone)]
struct ParamSite {
    full: String,
    name: SmolStr,
}

/// Text whose parameter sites were precomputed at load time.
///
/// Placeholders are replaced first (each one binds an argument and takes the
/// translator's token), then splices are replaced with the value's text
/// form. Each precomputed site replaces exactly one occurrence.
#[derive(Debug, Clone)]
pub struct TextNode {
    value: String,
    placeholders: Vec<ParamSite>,
    substitutions: Vec<ParamSite>,
}

impl TextNode {
    /// Scan raw text for parameter sites.
    pub fn scan(value: String) -> Self {
        let placeholders = PLACEHOLDER_RE
            .captures_iter(&value)
            .map(|captures| ParamSite {
                full: captures[0].to_string(),
                name: SmolStr::new(&captures[1]),
            })
            .collect();
        let substitutions = SUBSTITUTION_RE
            .captures_iter(&value)
            .map(|captures| ParamSite {
                full: captures[0].to_string(),
                name: SmolStr::new(&captures[1]),
            })
            .collect();
        Self {
            value,
            placeholders,
            substitutions,
        }
    }

    /// Whether the scan found anything to substitute.
    pub fn has_matches(&self) -> bool {
        !self.placeholders.is_empty() || !self.substitutions.is_empty()
    }

    /// Give the raw text back (used to downgrade to a pure text node).
    pub(crate) fn into_value(self) -> String {
        self.value
    }

    pub(crate) fn render(
        &self,
        ctx: &RenderContext<'_>,
        scope: &dyn Parameter,
    ) -> Result<Rendered, RenderError> {
        if !self.has_matches() {
            return Ok((self.value.clone(), Vec::new()));
        }
        let mut sql = self.value.clone();
        let mut args = Vec::with_capacity(self.placeholders.len());
        for site in &self.placeholders {
            let value = scope
                .get(&site.name)
                .ok_or_else(|| RenderError::ParameterNotFound {
                    name: site.name.clone(),
                })?;
            sql = sql.replacen(&site.full, &ctx.placeholder(&site.name), 1);
            args.push(value);
        }
        for site in &self.substitutions {
            let value = scope
                .get(&site.name)
                .ok_or_else(|| RenderError::ParameterNotFound {
                    name: site.name.clone(),
                })?;
            sql = sql.replacen(&site.full, &value.to_string(), 1);
        }
        Ok((sql, args))
    }
}

/// Text with nothing to substitute; emitted verbatim.
#[derive(Debug, Clone)]
pub struct PureTextNode(String);

impl PureTextNode {
    /// Wrap plain text.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub(crate) fn render(&self) -> Rendered {
        (self.0.clone(), Vec::new())
    }
}

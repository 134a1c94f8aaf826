//! Dialect translators for parameter placeholders.
//!
//! The renderer is dialect-agnostic: every `#{…}` site asks a [`Translator`]
//! for the driver's placeholder token and appends the bound value to the
//! argument list. The built-in [`Dialect`] covers the common positional
//! styles; anything else implements the one-method trait.

use std::borrow::Cow;

/// Turns a named parameter into the driver's placeholder token.
///
/// `position` is the 1-based ordinal of the placeholder within the render,
/// counted left to right across the final SQL.
pub trait Translator {
    /// Produce the placeholder token for one parameter site.
    fn translate(&self, name: &str, position: usize) -> Cow<'static, str>;
}

/// Static placeholder string for `?`-style dialects to avoid allocation.
const QUESTION_MARK_PLACEHOLDER: &str = "?";

/// Pre-computed `$N` placeholder strings for the common positions.
///
/// Index 0 is unused (placeholders start at $1) but kept for simpler
/// indexing; positions past the table fall back to `format!`.
const DOLLAR_PLACEHOLDERS: &[&str] = &[
    "$0", "$1", "$2", "$3", "$4", "$5", "$6", "$7", "$8", "$9", "$10", "$11", "$12", "$13", "$14",
    "$15", "$16", "$17", "$18", "$19", "$20", "$21", "$22", "$23", "$24", "$25", "$26", "$27",
    "$28", "$29", "$30", "$31", "$32",
];

/// Placeholder style of a database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// PostgreSQL uses `$1`, `$2`, …
    #[default]
    Postgres,
    /// MySQL uses `?`.
    MySql,
    /// SQLite uses `?`.
    Sqlite,
}

impl Dialect {
    /// Map an environment driver name onto a dialect.
    pub fn for_driver(driver: &str) -> Option<Self> {
        match driver {
            "postgres" | "postgresql" | "pgx" => Some(Self::Postgres),
            "mysql" => Some(Self::MySql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// The placeholder token for a 1-based position.
    #[inline]
    pub fn placeholder(&self, position: usize) -> Cow<'static, str> {
        match self {
            Self::Postgres => {
                if position > 0 && position < DOLLAR_PLACEHOLDERS.len() {
                    Cow::Borrowed(DOLLAR_PLACEHOLDERS[position])
                } else {
                    Cow::Owned(format!("${position}"))
                }
            }
            Self::MySql | Self::Sqlite => Cow::Borrowed(QUESTION_MARK_PLACEHOLDER),
        }
    }
}

impl Translator for Dialect {
    fn translate(&self, _name: &str, position: usize) -> Cow<'static, str> {
        self.placeholder(position)
    }
}

/// Named `:name` placeholders for drivers that bind by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedColon;

impl Translator for NamedColon {
    fn translate(&self, name: &str, _position: usize) -> Cow<'static, str> {
        Cow::Owned(format!(":{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(1).as_ref(), "$1");
        assert_eq!(Dialect::Postgres.placeholder(32).as_ref(), "$32");
        assert_eq!(Dialect::Postgres.placeholder(33).as_ref(), "$33");
        assert!(matches!(Dialect::Postgres.placeholder(5), Cow::Borrowed(_)));
        assert!(matches!(Dialect::Postgres.placeholder(200), Cow::Owned(_)));
    }

    #[test]
    fn test_question_mark_dialects() {
        assert_eq!(Dialect::MySql.placeholder(1).as_ref(), "?");
        assert_eq!(Dialect::Sqlite.placeholder(9).as_ref(), "?");
        assert!(matches!(Dialect::MySql.placeholder(1), Cow::Borrowed(_)));
    }

    #[test]
    fn test_for_driver() {
        assert_eq!(Dialect::for_driver("postgres"), Some(Dialect::Postgres));
        assert_eq!(Dialect::for_driver("postgresql"), Some(Dialect::Postgres));
        assert_eq!(Dialect::for_driver("mysql"), Some(Dialect::MySql));
        assert_eq!(Dialect::for_driver("sqlite3"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::for_driver("oracle"), None);
    }

    #[test]
    fn test_named_colon() {
        assert_eq!(NamedColon.translate("user_id", 3).as_ref(), ":user_id");
    }
}

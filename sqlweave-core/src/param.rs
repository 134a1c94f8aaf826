//! Parameter lookup and render scopes.
//!
//! A [`Parameter`] is a read-only view over caller-supplied arguments with
//! dotted-path lookup. Scopes stack: `foreach` pushes an [`IterationScope`]
//! carrying just the loop bindings in front of the outer view, and the first
//! hit wins.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::value::ParamValue;

/// Key a bare collection binds under when `foreach` omits `collection`.
pub const DEFAULT_PARAM_KEY: &str = "param";

/// Read-only, path-addressed access to render parameters.
///
/// `path` is a dotted chain such as `user.address.city`; each segment after
/// the first descends into a map member. A miss anywhere along the path is
/// `None`, never an error.
pub trait Parameter {
    /// Look up a value by dotted path.
    fn get(&self, path: &str) -> Option<ParamValue>;
}

/// The standard map-backed parameter store.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: IndexMap<String, ParamValue>,
}

impl Params {
    /// Create an empty parameter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under a name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Number of top-level bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the store has no bindings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a store from a JSON value.
    ///
    /// Objects spread into top-level bindings; any other JSON value binds
    /// whole under [`DEFAULT_PARAM_KEY`].
    pub fn from_json(value: serde_json::Value) -> Self {
        let mut params = Self::new();
        match ParamValue::from(value) {
            ParamValue::Map(entries) => {
                for (key, value) in entries {
                    params.values.insert(key, value);
                }
            }
            other => {
                params.values.insert(DEFAULT_PARAM_KEY.to_string(), other);
            }
        }
        params
    }
}

impl Parameter for Params {
    fn get(&self, path: &str) -> Option<ParamValue> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current = self.values.get(head)?;
        for segment in segments {
            current = current.member(segment)?;
        }
        Some(current.clone())
    }
}

/// An ordered stack of parameter views; the first hit wins.
pub struct ParamGroup<'a> {
    views: Vec<&'a dyn Parameter>,
}

impl<'a> ParamGroup<'a> {
    /// Build a group from views ordered innermost first.
    pub fn new(views: Vec<&'a dyn Parameter>) -> Self {
        Self { views }
    }

    /// The two-level stack `foreach` uses: loop bindings over the outer scope.
    pub fn stacked(inner: &'a dyn Parameter, outer: &'a dyn Parameter) -> Self {
        Self {
            views: vec![inner, outer],
        }
    }
}

impl Parameter for ParamGroup<'_> {
    fn get(&self, path: &str) -> Option<ParamValue> {
        self.views.iter().find_map(|view| view.get(path))
    }
}

/// The single-binding view a `foreach` iteration pushes onto the scope.
#[derive(Debug, Clone)]
pub struct IterationScope {
    item_name: SmolStr,
    item: ParamValue,
    index_name: Option<SmolStr>,
    index: ParamValue,
}

impl IterationScope {
    /// Bind one element (and optionally its index) for a loop pass.
    pub fn new(
        item_name: SmolStr,
        item: ParamValue,
        index_name: Option<SmolStr>,
        index: ParamValue,
    ) -> Self {
        Self {
            item_name,
            item,
            index_name,
            index,
        }
    }
}

impl Parameter for IterationScope {
    fn get(&self, path: &str) -> Option<ParamValue> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let root = if head == self.item_name {
            &self.item
        } else if self.index_name.as_deref() == Some(head) {
            &self.index
        } else {
            return None;
        };
        match rest {
            None => Some(root.clone()),
            Some(rest) => {
                let mut current = root;
                for segment in rest.split('.') {
                    current = current.member(segment)?;
                }
                Some(current.clone())
            }
        }
    }
}

/// Build a [`Params`] store from `name => value` pairs.
///
/// ```
/// use sqlweave_core::{params, Parameter};
///
/// let p = params! { "id" => 7, "name" => "ada" };
/// assert!(p.get("id").is_some());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::param::Params::new()
    };
    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut params = $crate::param::Params::new();
        $(params.insert($name, $crate::value::ParamValue::from($value));)+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_lookup() {
        let p = params! { "id" => 7 };
        assert_eq!(p.get("id"), Some(ParamValue::Int(7)));
        assert_eq!(p.get("missing"), None);
    }

    #[test]
    fn test_dotted_lookup() {
        let p = Params::from_json(json!({"user": {"address": {"city": "Oslo"}}}));
        assert_eq!(p.get("user.address.city"), Some(ParamValue::from("Oslo")));
        assert_eq!(p.get("user.address.zip"), None);
        assert_eq!(p.get("user.missing.city"), None);
    }

    #[test]
    fn test_path_into_null_is_miss() {
        let p = Params::from_json(json!({"user": null}));
        assert_eq!(p.get("user"), Some(ParamValue::Null));
        assert_eq!(p.get("user.name"), None);
    }

    #[test]
    fn test_from_json_scalar_binds_default_key() {
        let p = Params::from_json(json!([1, 2, 3]));
        assert!(p.get(DEFAULT_PARAM_KEY).is_some());
    }

    #[test]
    fn test_group_inner_shadows_outer() {
        let outer = params! { "x" => 1, "y" => 2 };
        let inner = params! { "x" => 10 };
        let group = ParamGroup::stacked(&inner, &outer);
        assert_eq!(group.get("x"), Some(ParamValue::Int(10)));
        assert_eq!(group.get("y"), Some(ParamValue::Int(2)));
        assert_eq!(group.get("z"), None);
    }

    #[test]
    fn test_iteration_scope() {
        let scope = IterationScope::new(
            "item".into(),
            ParamValue::from(json!({"id": 4})),
            Some("i".into()),
            ParamValue::Int(0),
        );
        assert_eq!(scope.get("item.id"), Some(ParamValue::Int(4)));
        assert_eq!(scope.get("i"), Some(ParamValue::Int(0)));
        assert_eq!(scope.get("other"), None);
    }

    #[test]
    fn test_iteration_scope_without_index() {
        let scope = IterationScope::new("x".into(), ParamValue::Int(1), None, ParamValue::Int(0));
        assert_eq!(scope.get("x"), Some(ParamValue::Int(1)));
        assert_eq!(scope.get(""), None);
    }
}

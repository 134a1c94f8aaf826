//! The result-map data model.
//!
//! Result maps describe how result-set columns line up with object
//! properties. Only the data model and its ambiguity check live here; row
//! binding belongs to the executing layer, not the render core.

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::error::RegistryError;

/// One `property <- column` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub property: SmolStr,
    pub column: SmolStr,
}

impl ColumnMapping {
    /// Pair a property with its source column.
    pub fn new(property: impl Into<SmolStr>, column: impl Into<SmolStr>) -> Self {
        Self {
            property: property.into(),
            column: column.into(),
        }
    }
}

/// A nested single-valued mapping (`<association>`).
#[derive(Debug, Clone, Default)]
pub struct Association {
    pub property: SmolStr,
    pub results: Vec<ColumnMapping>,
    pub associations: Vec<Association>,
}

impl Association {
    /// Create an association for a property.
    pub fn new(property: impl Into<SmolStr>) -> Self {
        Self {
            property: property.into(),
            ..Default::default()
        }
    }

    fn collect_columns(&self, seen: &mut IndexSet<SmolStr>, id: &SmolStr) -> Result<(), RegistryError> {
        collect(seen, id, &self.results)?;
        for association in &self.associations {
            association.collect_columns(seen, id)?;
        }
        Ok(())
    }
}

/// A nested many-valued mapping (`<collection>`).
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub property: SmolStr,
    pub results: Vec<ColumnMapping>,
    pub associations: Vec<Association>,
}

impl Collection {
    /// Create a collection for a property.
    pub fn new(property: impl Into<SmolStr>) -> Self {
        Self {
            property: property.into(),
            ..Default::default()
        }
    }
}

/// A validated result map.
///
/// Construction flattens the whole tree and rejects any column that is
/// mapped twice.
#[derive(Debug, Clone)]
pub struct ResultMap {
    id: SmolStr,
    pk: Option<ColumnMapping>,
    results: Vec<ColumnMapping>,
    associations: Vec<Association>,
    collections: Vec<Collection>,
}

impl ResultMap {
    /// Validate and build a result map from its parsed parts.
    pub fn try_new(
        id: impl Into<SmolStr>,
        pk: Option<ColumnMapping>,
        results: Vec<ColumnMapping>,
        associations: Vec<Association>,
        collections: Vec<Collection>,
    ) -> Result<Self, RegistryError> {
        let id = id.into();
        let mut seen = IndexSet::new();
        if let Some(pk) = &pk {
            collect(&mut seen, &id, std::slice::from_ref(pk))?;
        }
        collect(&mut seen, &id, &results)?;
        for association in &associations {
            association.collect_columns(&mut seen, &id)?;
        }
        for collection in &collections {
            collect(&mut seen, &id, &collection.results)?;
            for association in &collection.associations {
                association.collect_columns(&mut seen, &id)?;
            }
        }
        Ok(Self {
            id,
            pk,
            results,
            associations,
            collections,
        })
    }

    /// The result map's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The primary-key mapping, when declared.
    pub fn pk(&self) -> Option<&ColumnMapping> {
        self.pk.as_ref()
    }

    /// Top-level column mappings.
    pub fn results(&self) -> &[ColumnMapping] {
        &self.results
    }

    /// Nested single-valued mappings.
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Nested many-valued mappings.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }
}

fn collect(
    seen: &mut IndexSet<SmolStr>,
    id: &SmolStr,
    mappings: &[ColumnMapping],
) -> Result<(), RegistryError> {
    for mapping in mappings {
        if !seen.insert(mapping.column.clone()) {
            return Err(RegistryError::AmbiguousColumn {
                id: id.clone(),
                column: mapping.column.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_result_map() {
        let map = ResultMap::try_new(
            "userMap",
            Some(ColumnMapping::new("id", "id")),
            vec![
                ColumnMapping::new("name", "user_name"),
                ColumnMapping::new("age", "user_age"),
            ],
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(map.id(), "userMap");
        assert_eq!(map.results().len(), 2);
        assert!(map.pk().is_some());
    }

    #[test]
    fn test_duplicate_column_is_ambiguous() {
        let err = ResultMap::try_new(
            "userMap",
            None,
            vec![
                ColumnMapping::new("name", "user_name"),
                ColumnMapping::new("alias", "user_name"),
            ],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AmbiguousColumn { column, .. } if column == "user_name"
        ));
    }

    #[test]
    fn test_duplicate_across_association_is_ambiguous() {
        let mut association = Association::new("address");
        association.results.push(ColumnMapping::new("city", "id"));
        let err = ResultMap::try_new(
            "userMap",
            Some(ColumnMapping::new("id", "id")),
            vec![],
            vec![association],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::AmbiguousColumn { .. }));
    }

    #[test]
    fn test_nested_associations_collect() {
        let mut inner = Association::new("country");
        inner.results.push(ColumnMapping::new("code", "country_code"));
        let mut outer = Association::new("address");
        outer.results.push(ColumnMapping::new("city", "city"));
        outer.associations.push(inner);
        let map = ResultMap::try_new("m", None, vec![], vec![outer], vec![]).unwrap();
        assert_eq!(map.associations().len(), 1);
    }
}

//! Case-insensitive substring search over a catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{Catalog, Cube, Field, FieldKind};

/// Which attribute of an entity contained the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedOn {
    CubeName,
    CubeDescription,
    FieldName,
    FieldDescription,
}

/// One matching cube or field.
///
/// `field` and `kind` are absent when the cube itself matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub cube: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    pub matched_on: MatchedOn,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl SearchHit {
    /// `Cube.field` for field hits, the cube name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.cube, field),
            None => self.cube.clone(),
        }
    }

    fn for_cube(cube: &Cube, matched_on: MatchedOn) -> Self {
        Self {
            cube: cube.name.clone(),
            field: None,
            kind: None,
            matched_on,
            description: cube.description.clone().unwrap_or_default(),
            variants: None,
            metadata: BTreeMap::new(),
        }
    }

    fn for_field(cube: &Cube, field: &Field, matched_on: MatchedOn) -> Self {
        Self {
            cube: cube.name.clone(),
            field: Some(field.name.clone()),
            kind: Some(field.kind),
            matched_on,
            description: field.description.clone(),
            variants: field.variants.clone(),
            metadata: field.metadata.clone(),
        }
    }
}

/// Optional restrictions applied on top of the term match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilter {
    /// Only this cube (exact name)
    #[serde(default)]
    pub cube: Option<String>,
    /// Only fields of this kind; cube-level hits are dropped
    #[serde(default)]
    pub kind: Option<FieldKind>,
}

impl SearchFilter {
    pub fn cube(mut self, cube: impl Into<String>) -> Self {
        self.cube = Some(cube.into());
        self
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Lazily search `catalog` for `term`.
///
/// Hits are yielded cube by cube in catalog order: the cube itself (if it
/// matched), then its measures, then its dimensions. Each entity yields at
/// most one hit, reporting the first matching attribute (name before
/// description). The iterator borrows the catalog and can be recreated at
/// will; an empty term matches everything.
pub fn search<'a>(
    catalog: &'a Catalog,
    term: &str,
    filter: &'a SearchFilter,
) -> impl Iterator<Item = SearchHit> + 'a {
    let needle = term.to_lowercase();

    catalog
        .cubes()
        .iter()
        .filter(move |cube| filter.cube.as_deref().map_or(true, |c| c == cube.name))
        .flat_map(move |cube| {
            let cube_hit = match filter.kind {
                Some(_) => None,
                None => match_cube(cube, &needle).map(|on| SearchHit::for_cube(cube, on)),
            };

            let needle = needle.clone();
            let field_hits = cube
                .fields()
                .filter(move |field| filter.kind.map_or(true, |k| k == field.kind))
                .filter_map(move |field| {
                    match_field(field, &needle).map(|on| SearchHit::for_field(cube, field, on))
                });

            cube_hit.into_iter().chain(field_hits)
        })
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn match_cube(cube: &Cube, needle: &str) -> Option<MatchedOn> {
    if contains(&cube.name, needle) {
        Some(MatchedOn::CubeName)
    } else if cube.description.as_deref().is_some_and(|d| contains(d, needle)) {
        Some(MatchedOn::CubeDescription)
    } else {
        None
    }
}

fn match_field(field: &Field, needle: &str) -> Option<MatchedOn> {
    if contains(&field.name, needle) {
        Some(MatchedOn::FieldName)
    } else if contains(&field.description, needle) {
        Some(MatchedOn::FieldDescription)
    } else {
        None
    }
}

//! The semantic layer index.
//!
//! [`SemanticIndex`] owns the current [`Catalog`] snapshot and answers the
//! read-only lookups used by agent tools and the CLI.
//!
//! ```text
//!   Unloaded ──load()──▶ Loaded ──load()/reload()──▶ Loaded
//! ```
//!
//! Queries against an unloaded index fail with [`QueryError::NotLoaded`].
//! A load parses the whole source before taking the write lock and then swaps
//! the snapshot in one step, so readers only ever see a complete catalog. A
//! failed load leaves the previous snapshot in place.
//!
//! Readers take an `Arc<Catalog>` and query it without holding the lock.

mod error;
pub mod search;

pub use error::{QueryError, QueryResult};
pub use search::{MatchedOn, SearchFilter, SearchHit};

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::loader::{self, LoadReport, LoadResult};
use crate::model::{Catalog, Cube, Field, FieldKind};

/// Summary row returned by [`SemanticIndex::list_cubes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeSummary {
    pub name: String,
    pub description: Option<String>,
    pub measures_count: usize,
    pub dimensions_count: usize,
}

impl From<&Cube> for CubeSummary {
    fn from(cube: &Cube) -> Self {
        Self {
            name: cube.name.clone(),
            description: cube.description.clone(),
            measures_count: cube.measures.len(),
            dimensions_count: cube.dimensions.len(),
        }
    }
}

/// A field together with its owning cube, as returned by
/// [`SemanticIndex::list_measures`] and [`SemanticIndex::list_dimensions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub cube: String,
    pub name: String,
    pub kind: FieldKind,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl FieldEntry {
    fn new(cube: &Cube, field: &Field) -> Self {
        Self {
            cube: cube.name.clone(),
            name: field.name.clone(),
            kind: field.kind,
            description: field.description.clone(),
            data_type: field.data_type.clone(),
            unit: field.unit.clone(),
            variants: field.variants.clone(),
            metadata: field.metadata.clone(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.cube, self.name)
    }
}

#[derive(Debug)]
struct Snapshot {
    catalog: Arc<Catalog>,
    source: Option<PathBuf>,
}

/// Owner of the loaded catalog.
#[derive(Debug, Default)]
pub struct SemanticIndex {
    state: RwLock<Option<Snapshot>>,
}

impl SemanticIndex {
    /// Create an index in the unloaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index already holding `catalog`.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let index = Self::new();
        index.install(catalog, None);
        index
    }

    /// Load (or replace) the catalog from a semantic layer file.
    ///
    /// On `FileNotReadable` the index keeps whatever it held before.
    pub fn load(&self, path: &Path) -> LoadResult<LoadReport> {
        let loaded = loader::load_catalog(path)?;
        self.install(loaded.catalog, Some(path.to_path_buf()));
        Ok(loaded.report)
    }

    /// Load (or replace) the catalog from in-memory text.
    pub fn load_str(&self, content: &str) -> LoadReport {
        let loaded = loader::parse_str(content);
        self.install(loaded.catalog, None);
        loaded.report
    }

    /// Re-read the file of the last successful file load.
    pub fn reload(&self) -> Result<LoadReport, ReloadError> {
        let path = self.source_path().ok_or(ReloadError::NoSource)?;
        Ok(self.load(&path)?)
    }

    fn install(&self, catalog: Catalog, source: Option<PathBuf>) {
        let snapshot = Snapshot {
            catalog: Arc::new(catalog),
            source,
        };
        *self.state.write() = Some(snapshot);
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().is_some()
    }

    /// Path of the file backing the current catalog, if it came from a file.
    pub fn source_path(&self) -> Option<PathBuf> {
        self.state.read().as_ref().and_then(|s| s.source.clone())
    }

    /// The current catalog. The returned snapshot stays valid across reloads.
    pub fn catalog(&self) -> QueryResult<Arc<Catalog>> {
        self.state
            .read()
            .as_ref()
            .map(|s| Arc::clone(&s.catalog))
            .ok_or(QueryError::NotLoaded)
    }

    /// All cubes in source order.
    pub fn list_cubes(&self) -> QueryResult<Vec<CubeSummary>> {
        let catalog = self.catalog()?;
        Ok(catalog.cubes().iter().map(CubeSummary::from).collect())
    }

    /// Full detail of one cube. The name must match exactly.
    pub fn get_cube(&self, name: &str) -> QueryResult<Cube> {
        let catalog = self.catalog()?;
        catalog
            .cube(name)
            .cloned()
            .ok_or_else(|| QueryError::not_found(name))
    }

    /// Case-insensitive substring search across cubes and fields.
    pub fn search(&self, term: &str) -> QueryResult<Vec<SearchHit>> {
        self.search_with(term, &SearchFilter::default())
    }

    /// [`search`](Self::search) restricted by cube and/or field kind.
    pub fn search_with(&self, term: &str, filter: &SearchFilter) -> QueryResult<Vec<SearchHit>> {
        let catalog = self.catalog()?;
        Ok(search::search(&catalog, term, filter).collect())
    }

    /// Measures of one cube, or of every cube when `cube` is `None`.
    pub fn list_measures(&self, cube: Option<&str>) -> QueryResult<Vec<FieldEntry>> {
        self.list_fields(cube, FieldKind::Measure)
    }

    /// Dimensions of one cube, or of every cube when `cube` is `None`.
    pub fn list_dimensions(&self, cube: Option<&str>) -> QueryResult<Vec<FieldEntry>> {
        self.list_fields(cube, FieldKind::Dimension)
    }

    fn list_fields(&self, cube: Option<&str>, kind: FieldKind) -> QueryResult<Vec<FieldEntry>> {
        let catalog = self.catalog()?;

        let cubes: Vec<&Cube> = match cube {
            Some(name) => vec![catalog.cube(name).ok_or_else(|| QueryError::not_found(name))?],
            None => catalog.cubes().iter().collect(),
        };

        Ok(cubes
            .into_iter()
            .flat_map(|cube| {
                let fields = match kind {
                    FieldKind::Measure => &cube.measures,
                    FieldKind::Dimension => &cube.dimensions,
                };
                fields.iter().map(move |field| FieldEntry::new(cube, field))
            })
            .collect())
    }
}

/// Errors from [`SemanticIndex::reload`].
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("Nothing to reload: the semantic layer was not loaded from a file")]
    NoSource,

    #[error(transparent)]
    Load(#[from] loader::LoadError),
}

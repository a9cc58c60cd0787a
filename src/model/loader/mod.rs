//! Semantic layer loader.
//!
//! The source is JSON Lines: every non-blank line is one self-describing
//! record that places a single measure or dimension in a cube.
//!
//! ```text
//! {"cube":"Orders","field":"net_sales","kind":"measure","description":"Total net sales"}
//! {"cube":"Orders","field":"product_brand","kind":"dimension","description":"Brand name"}
//! ```
//!
//! Loading is lenient at the line level. A line that fails validation is
//! recorded in the [`LoadReport`] and skipped; the remaining lines are still
//! loaded. When the same `Cube.field` pair appears more than once, the last
//! record wins without a diagnostic. Only an unreadable source aborts a load.
//!
//! # Example
//!
//! ```rust,ignore
//! use cube_analyst::model::loader::load_catalog;
//! use std::path::Path;
//!
//! let loaded = load_catalog(Path::new("assets/semantic_layer.txt"))?;
//! println!("{}", loaded.report);
//! ```

pub mod record;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::Catalog;
pub use record::Record;

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file is missing or could not be read
    #[error("Semantic layer file not readable: {path}: {source}")]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for model loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Why a single line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RecordError {
    /// Not a JSON object, or an attribute has the wrong JSON type
    #[error("malformed record: {message}")]
    Malformed { message: String },

    /// A required attribute is absent or blank
    #[error("missing required attribute '{attribute}'")]
    MissingAttribute { attribute: String },

    /// `kind` is neither measure nor dimension
    #[error("unknown field kind '{kind}', expected 'measure' or 'dimension'")]
    UnknownFieldKind { kind: String },
}

/// A line that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the source
    pub line_no: usize,
    pub reason: RecordError,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_no, self.reason)
    }
}

/// Diagnostics produced by a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Number of lines accepted as records, duplicates included
    pub loaded_count: usize,
    pub skipped_lines: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn has_skipped(&self) -> bool {
        !self.skipped_lines.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loaded {} record(s), skipped {} line(s)",
            self.loaded_count,
            self.skipped_lines.len()
        )
    }
}

/// A freshly built catalog and the diagnostics of building it.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub report: LoadReport,
}

/// Read and parse a semantic layer file.
///
/// Lines are decoded one at a time, so a line that is not valid UTF-8 is
/// skipped like any other malformed line.
pub fn load_catalog(path: &Path) -> LoadResult<LoadedCatalog> {
    let content = std::fs::read(path).map_err(|source| LoadError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_bytes(&content))
}

/// Parse raw semantic layer bytes, splitting on `\n`.
pub fn parse_bytes(content: &[u8]) -> LoadedCatalog {
    let mut builder = CatalogBuilder::default();

    for (idx, raw) in content.split(|&b| b == b'\n').enumerate() {
        match std::str::from_utf8(raw) {
            Ok(line) => builder.line(idx + 1, line),
            Err(e) => builder.skip(
                idx + 1,
                RecordError::Malformed {
                    message: format!("invalid UTF-8: {}", e),
                },
            ),
        }
    }

    builder.finish()
}

/// Parse semantic layer text (useful for testing).
pub fn parse_str(content: &str) -> LoadedCatalog {
    parse_lines(content.lines())
}

/// Parse a sequence of source lines into a catalog.
pub fn parse_lines<I, S>(lines: I) -> LoadedCatalog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = CatalogBuilder::default();
    for (idx, line) in lines.into_iter().enumerate() {
        builder.line(idx + 1, line.as_ref());
    }
    builder.finish()
}

#[derive(Default)]
struct CatalogBuilder {
    catalog: Catalog,
    report: LoadReport,
}

impl CatalogBuilder {
    fn line(&mut self, line_no: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match Record::from_line(line) {
            Ok(record) => {
                let cube = self.catalog.cube_mut(&record.cube);
                if record.cube_description.is_some() {
                    cube.description = record.cube_description;
                }
                cube.upsert(record.field);
                self.report.loaded_count += 1;
            }
            Err(reason) => self.skip(line_no, reason),
        }
    }

    fn skip(&mut self, line_no: usize, reason: RecordError) {
        self.report.skipped_lines.push(SkippedLine { line_no, reason });
    }

    fn finish(self) -> LoadedCatalog {
        LoadedCatalog {
            catalog: self.catalog,
            report: self.report,
        }
    }
}

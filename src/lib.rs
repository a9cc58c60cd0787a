//! # Cube Analyst
//!
//! A semantic layer index for conversational BI agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Semantic layer file (JSON Lines)                │
//! │   one record per measure / dimension of a cube           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model::loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │         Catalog (Cubes → Measures, Dimensions)           │
//! │         + LoadReport (skipped lines)                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [index]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SemanticIndex: list_cubes / get_cube / search          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [tools, CLI]
//! ┌─────────────────────────────────────────────────────────┐
//! │         Agent tool calls and JSON inspector              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod index;
pub mod model;
pub mod repl;
pub mod tools;

pub use index::{CubeSummary, FieldEntry, QueryError, SearchFilter, SearchHit, SemanticIndex};
pub use model::loader::{LoadError, LoadReport, RecordError, SkippedLine};
pub use model::{Catalog, Cube, Field, FieldKind};

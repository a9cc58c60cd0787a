//! Semantic layer model: cubes, their measures and dimensions, and the catalog.

pub mod catalog;
pub mod cube;
pub mod field;
pub mod loader;

pub use catalog::Catalog;
pub use cube::Cube;
pub use field::{Field, FieldKind};

// src/model/catalog.rs
use crate::model::cube::Cube;
use crate::model::field::Field;
use std::collections::HashMap;

/// The full set of cubes built from one semantic layer source.
///
/// Cubes keep the order in which they first appeared in the source. A catalog
/// is assembled once by the loader and never mutated after it is handed to
/// the index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cubes: Vec<Cube>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cubes in first-appearance order.
    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    /// Exact, case-sensitive lookup.
    pub fn cube(&self, name: &str) -> Option<&Cube> {
        self.by_name.get(name).map(|&idx| &self.cubes[idx])
    }

    pub fn contains_cube(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Number of distinct `Cube.field` entries.
    pub fn field_count(&self) -> usize {
        self.cubes.iter().map(Cube::field_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Resolve a `Cube.field` pair.
    pub fn field(&self, cube: &str, field: &str) -> Option<&Field> {
        self.cube(cube).and_then(|c| c.field(field))
    }

    /// Get the named cube, creating an empty one at the end if absent.
    pub(crate) fn cube_mut(&mut self, name: &str) -> &mut Cube {
        let idx = match self.by_name.get(name) {
            Some(&idx) => idx,
            None => {
                self.cubes.push(Cube::new(name));
                let idx = self.cubes.len() - 1;
                self.by_name.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.cubes[idx]
    }
}

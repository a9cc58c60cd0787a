// src/model/cube.rs
use crate::model::field::{Field, FieldKind};
use serde::{Deserialize, Serialize};

/// A named functional grouping of measures and dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Measures in first-appearance order
    pub measures: Vec<Field>,
    /// Dimensions in first-appearance order
    pub dimensions: Vec<Field>,
}

impl Cube {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            measures: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    pub fn measure(&self, name: &str) -> Option<&Field> {
        self.measures.iter().find(|f| f.name == name)
    }

    pub fn dimension(&self, name: &str) -> Option<&Field> {
        self.dimensions.iter().find(|f| f.name == name)
    }

    /// Look up a field of either kind.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.measure(name).or_else(|| self.dimension(name))
    }

    /// Measures followed by dimensions.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.measures.iter().chain(self.dimensions.iter())
    }

    pub fn field_count(&self) -> usize {
        self.measures.len() + self.dimensions.len()
    }

    /// Insert a field, replacing any existing field with the same name.
    ///
    /// A replacement of the same kind keeps its position. A replacement that
    /// changes kind is removed from the old list and appended to the new one,
    /// so a name is never both a measure and a dimension.
    pub fn upsert(&mut self, field: Field) {
        let (same, other) = match field.kind {
            FieldKind::Measure => (&mut self.measures, &mut self.dimensions),
            FieldKind::Dimension => (&mut self.dimensions, &mut self.measures),
        };

        other.retain(|f| f.name != field.name);

        match same.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => same.push(field),
        }
    }
}

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the vertex store.
    pub struct VertexId;
}

/// A labeled structural point on the vehicle.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The label used by edge and panel records.
    pub name: String,
    /// Position in the working coordinate system (axes swapped, scaled).
    pub point: Point3,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(name: impl Into<String>, point: Point3) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

/// Arena owning every vertex of the layout, addressable by id or label.
#[derive(Debug, Default)]
pub struct VertexStore {
    vertices: SlotMap<VertexId, VertexData>,
    by_name: HashMap<String, VertexId>,
}

impl VertexStore {
    /// Creates a new, empty vertex store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex with the same label already exists.
    pub fn insert(&mut self, data: VertexData) -> Result<VertexId, TopologyError> {
        if self.by_name.contains_key(&data.name) {
            return Err(TopologyError::DuplicateId {
                kind: "vertex",
                id: data.name,
            });
        }
        let name = data.name.clone();
        let id = self.vertices.insert(data);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Looks up a vertex ID by label.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingVertex`] if no vertex has this label.
    pub fn id(&self, name: &str) -> Result<VertexId, TopologyError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TopologyError::MissingVertex(name.into()))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn get(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::MissingVertex(format!("{id:?}")))
    }

    /// Returns the position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point(&self, id: VertexId) -> Result<Point3, TopologyError> {
        self.get(id).map(|v| v.point)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over all vertices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }
}

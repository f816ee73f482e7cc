use crate::error::{GeometryError, Result};
use crate::math::Point3;
use crate::records::VertexRecord;
use crate::topology::{VertexData, VertexStore};

/// Builds the vertex store from raw records.
///
/// Each point is first rotated a quarter turn about Y so the show side of
/// the vehicle faces the default camera (`x' = -z`, `z' = x`), then divided
/// by the unit scale.
pub struct LoadVertices<'a> {
    records: &'a [VertexRecord],
    unit_scale: f64,
}

impl<'a> LoadVertices<'a> {
    /// Creates a new `LoadVertices` operation.
    ///
    /// * `unit_scale` - Raw units per working unit (microns per inch).
    #[must_use]
    pub fn new(records: &'a [VertexRecord], unit_scale: f64) -> Self {
        Self {
            records,
            unit_scale,
        }
    }

    /// Executes the load, returning the populated store.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit scale is not a positive finite number or
    /// two records share a label.
    pub fn execute(&self) -> Result<VertexStore> {
        if !(self.unit_scale.is_finite() && self.unit_scale > 0.0) {
            return Err(GeometryError::Degenerate(format!(
                "unit scale must be positive, got {}",
                self.unit_scale
            ))
            .into());
        }

        let mut store = VertexStore::new();
        for record in self.records {
            let swapped = Point3::new(-record.z, record.y, record.x);
            let point = Point3::from(swapped.coords / self.unit_scale);
            store.insert(VertexData::new(record.name.clone(), point))?;
        }
        Ok(store)
    }
}

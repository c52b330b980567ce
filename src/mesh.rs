use crate::{
    element::{EH, FH, HasTopology, VH},
    error::Error,
    garbage::Remap,
    property::VField,
    topol::Topology,
};
use glam::DVec3;

/// Triangle mesh with vertex positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriMesh {
    pub(crate) topol: Topology,
    pub(crate) points: VField<DVec3>,
}

impl HasTopology for TriMesh {
    fn topology(&self) -> &Topology {
        &self.topol
    }
}

impl TriMesh {
    /// Create a mesh from vertex positions and counter-clockwise triangles
    /// indexing into them.
    pub fn new(points: Vec<DVec3>, triangles: &[[u32; 3]]) -> Result<Self, Error> {
        let topol = Topology::from_triangles(points.len(), triangles)?;
        Ok(TriMesh {
            topol,
            points: VField::from(points),
        })
    }

    /// Create a mesh from existing topology and positions. There must be one
    /// position per vertex slot.
    pub fn from_parts(topol: Topology, points: VField<DVec3>) -> Result<Self, Error> {
        if points.len() != topol.num_vertex_slots() {
            return Err(Error::MismatchedArrayLengths(
                topol.num_vertex_slots(),
                points.len(),
            ));
        }
        Ok(TriMesh { topol, points })
    }

    pub fn into_parts(self) -> (Topology, VField<DVec3>) {
        (self.topol, self.points)
    }

    pub fn points(&self) -> &VField<DVec3> {
        &self.points
    }

    pub fn point(&self, v: VH) -> DVec3 {
        self.points[v]
    }

    pub fn num_vertices(&self) -> usize {
        self.topol.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<'_> {
        self.topol.vertices()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<'_> {
        self.topol.edges()
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<'_> {
        self.topol.faces()
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.points.len() != self.topol.num_vertex_slots() {
            return Err(Error::MismatchedArrayLengths(
                self.topol.num_vertex_slots(),
                self.points.len(),
            ));
        }
        self.topol.check()
    }

    /// Remove deleted elements, compacting the positions along with the
    /// topology.
    pub fn garbage_collection(&mut self) -> Result<Remap, Error> {
        let remap = self.topol.garbage_collection();
        self.points.compact(&remap.vertices)?;
        Ok(remap)
    }
}

use crate::{
    element::{Face, Halfedge, Handle, Vertex, EH, FH, HH, VH},
    error::Error,
    iterator,
};
use std::collections::HashMap;

/// Halfedge connectivity of a triangle mesh.
///
/// Edge `e` owns the halfedges `2e` and `2e + 1`. Elements removed by edge
/// collapses are flagged as deleted and stay in storage until
/// [`Topology::garbage_collection`] is called, so handles of live elements
/// remain stable during decimation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<Halfedge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) vdeleted: Vec<bool>,
    pub(crate) edeleted: Vec<bool>,
    pub(crate) fdeleted: Vec<bool>,
    pub(crate) nverts: usize,
    pub(crate) nedges: usize,
    pub(crate) nfaces: usize,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        Topology {
            vertices: Vec::with_capacity(nverts),
            halfedges: Vec::with_capacity(nedges * 2),
            faces: Vec::with_capacity(nfaces),
            vdeleted: Vec::with_capacity(nverts),
            edeleted: Vec::with_capacity(nedges),
            fdeleted: Vec::with_capacity(nfaces),
            nverts: 0,
            nedges: 0,
            nfaces: 0,
        }
    }

    /// Build the topology of `num_vertices` vertices connected by
    /// `triangles`. Every triangle is a counter-clockwise loop of vertex
    /// indices, and neighboring triangles must be consistently oriented.
    ///
    /// Vertices not referenced by any triangle are kept as isolated vertices.
    pub fn from_triangles(num_vertices: usize, triangles: &[[u32; 3]]) -> Result<Self, Error> {
        let mut topol = Topology::with_capacity(
            num_vertices,
            (triangles.len() * 3).div_ceil(2),
            triangles.len(),
        );
        topol
            .vertices
            .resize(num_vertices, Vertex { halfedge: None });
        topol.vdeleted.resize(num_vertices, false);
        topol.nverts = num_vertices;
        // Maps a directed pair of vertex indices to its halfedge.
        let mut lookup = HashMap::<(u32, u32), HH>::with_capacity(triangles.len() * 3);
        let mut valences = vec![0usize; num_vertices];
        for (fi, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= num_vertices) {
                return Err(Error::InvalidVertex(bad.into()));
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
                return Err(Error::DegenerateFace(fi));
            }
            let f: FH = (topol.faces.len() as u32).into();
            let mut hloop = [HH::from(0u32); 3];
            for (i, slot) in hloop.iter_mut().enumerate() {
                let (from, to) = (tri[i], tri[(i + 1) % 3]);
                let h = match lookup.get(&(from, to)) {
                    Some(&h) => h,
                    None => {
                        let h = topol.new_edge(from.into(), to.into());
                        lookup.insert((from, to), h);
                        lookup.insert((to, from), h.opposite());
                        valences[from as usize] += 1;
                        valences[to as usize] += 1;
                        h
                    }
                };
                let hdata = topol.halfedge_mut(h);
                if hdata.face.is_some() {
                    return Err(Error::ComplexHalfedge(h));
                }
                hdata.face = Some(f);
                let vdata = &mut topol.vertices[from as usize];
                if vdata.halfedge.is_none() {
                    vdata.halfedge = Some(h);
                }
                *slot = h;
            }
            for i in 0..3 {
                topol.link_halfedges(hloop[i], hloop[(i + 1) % 3]);
            }
            topol.faces.push(Face { halfedge: hloop[0] });
            topol.fdeleted.push(false);
            topol.nfaces += 1;
        }
        // Every boundary vertex must have exactly one outgoing boundary
        // halfedge, which makes the boundary loops unambiguous.
        let mut boundary_out: Vec<Option<HH>> = vec![None; num_vertices];
        for h in topol.halfedges() {
            if topol.is_boundary_halfedge(h) {
                let v = topol.tail_vertex(h);
                if boundary_out[v.index() as usize].replace(h).is_some() {
                    return Err(Error::ComplexVertex(v));
                }
            }
        }
        for h in topol.halfedges().collect::<Vec<_>>() {
            if topol.is_boundary_halfedge(h) {
                let v = topol.head_vertex(h);
                let next = boundary_out[v.index() as usize].ok_or(Error::ComplexVertex(v))?;
                topol.link_halfedges(h, next);
            }
        }
        for (vdata, hb) in topol.vertices.iter_mut().zip(boundary_out.iter()) {
            if hb.is_some() {
                vdata.halfedge = *hb;
            }
        }
        // A vertex whose faces form more than one fan can't reach all of its
        // halfedges by circulating.
        for (vi, valence) in valences.iter().enumerate() {
            let v: VH = (vi as u32).into();
            if iterator::voh_ccw_iter(&topol, v).count() != *valence {
                return Err(Error::ComplexVertex(v));
            }
        }
        Ok(topol)
    }

    fn new_edge(&mut self, from: VH, to: VH) -> HH {
        let h: HH = (self.halfedges.len() as u32).into();
        let oh = h.opposite();
        self.halfedges.push(Halfedge {
            face: None,
            vertex: to,
            next: h,
            prev: h,
        });
        self.halfedges.push(Halfedge {
            face: None,
            vertex: from,
            next: oh,
            prev: oh,
        });
        self.edeleted.push(false);
        self.nedges += 1;
        h
    }

    pub(crate) fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    pub(crate) fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.halfedges[h.index() as usize]
    }

    pub(crate) fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.halfedges[h.index() as usize]
    }

    pub(crate) fn face_mut(&mut self, f: FH) -> &mut Face {
        &mut self.faces[f.index() as usize]
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn head_vertex(&self, h: HH) -> VH {
        self.halfedge(h).vertex
    }

    pub fn tail_vertex(&self, h: HH) -> VH {
        self.halfedge(h.opposite()).vertex
    }

    pub fn opposite_halfedge(&self, h: HH) -> HH {
        h.opposite()
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn halfedge_face(&self, h: HH) -> Option<FH> {
        self.halfedge(h).face
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.faces[f.index() as usize].halfedge
    }

    /// The three vertices of a triangle, in counter-clockwise order starting
    /// from the head of its halfedge.
    pub fn face_vertices(&self, f: FH) -> [VH; 3] {
        let h0 = self.face_halfedge(f);
        let h1 = self.next_halfedge(h0);
        let h2 = self.next_halfedge(h1);
        [
            self.head_vertex(h0),
            self.head_vertex(h1),
            self.head_vertex(h2),
        ]
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.halfedge(h).face.is_none()
    }

    /// Isolated vertices are considered boundary vertices.
    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        match self.vertex_halfedge(v) {
            Some(h) => self.is_boundary_halfedge(h),
            None => true,
        }
    }

    /// Find the halfedge going from `from` to `to`, if the two vertices are
    /// connected by an edge.
    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_ccw_iter(self, from).find(|h| self.head_vertex(*h) == to)
    }

    pub fn is_valid_vertex(&self, v: VH) -> bool {
        self.vdeleted
            .get(v.index() as usize)
            .is_some_and(|deleted| !deleted)
    }

    pub fn is_valid_halfedge(&self, h: HH) -> bool {
        self.is_valid_edge(h.edge())
    }

    pub fn is_valid_edge(&self, e: EH) -> bool {
        self.edeleted
            .get(e.index() as usize)
            .is_some_and(|deleted| !deleted)
    }

    pub fn is_valid_face(&self, f: FH) -> bool {
        self.fdeleted
            .get(f.index() as usize)
            .is_some_and(|deleted| !deleted)
    }

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.nverts
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.nedges
    }

    /// Number of live halfedges.
    pub fn num_halfedges(&self) -> usize {
        self.nedges * 2
    }

    /// Number of live faces.
    pub fn num_faces(&self) -> usize {
        self.nfaces
    }

    /// Number of vertices in storage, including deleted ones. Per-vertex
    /// fields must have this length.
    pub fn num_vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edge_slots(&self) -> usize {
        self.edeleted.len()
    }

    pub fn num_face_slots(&self) -> usize {
        self.faces.len()
    }

    /// Whether any element is flagged as deleted.
    pub fn has_deleted(&self) -> bool {
        self.nverts != self.vertices.len()
            || self.nedges != self.edeleted.len()
            || self.nfaces != self.faces.len()
    }

    /// Live vertices.
    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<'_> {
        (0..self.vertices.len() as u32)
            .map(VH::from)
            .filter(|v| !self.vdeleted[v.index() as usize])
    }

    /// Live halfedges.
    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<'_> {
        (0..self.halfedges.len() as u32)
            .map(HH::from)
            .filter(|h| !self.edeleted[h.edge().index() as usize])
    }

    /// Live edges.
    pub fn edges(&self) -> impl Iterator<Item = EH> + use<'_> {
        (0..self.edeleted.len() as u32)
            .map(EH::from)
            .filter(|e| !self.edeleted[e.index() as usize])
    }

    /// Live faces.
    pub fn faces(&self) -> impl Iterator<Item = FH> + use<'_> {
        (0..self.faces.len() as u32)
            .map(FH::from)
            .filter(|f| !self.fdeleted[f.index() as usize])
    }

    pub(crate) fn link_halfedges(&mut self, prev: HH, next: HH) {
        self.halfedge_mut(prev).next = next;
        self.halfedge_mut(next).prev = prev;
    }

    /// Make the stored outgoing halfedge of `v` a boundary halfedge, if `v`
    /// has one.
    pub(crate) fn adjust_outgoing_halfedge(&mut self, v: VH) {
        let boundary =
            iterator::voh_ccw_iter(self, v).find(|h| self.is_boundary_halfedge(*h));
        if let Some(h) = boundary {
            self.vertex_mut(v).halfedge = Some(h);
        }
    }
}

use crate::{
    element::Handle,
    error::Error,
    topol::Topology,
};

fn check_vertices(mesh: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    for v in mesh.vertices() {
        if let Some(h) = v.halfedge(mesh) {
            if !h.is_valid(mesh) {
                return Err(Error::DeletedHalfedge(h));
            }
            // Boundary vertices must store a boundary halfedge.
            if !h.is_boundary(mesh) && mesh.voh_ccw_iter(v).any(|h| h.is_boundary(mesh)) {
                return Err(Error::OutgoingHalfedgeNotBoundary(v));
            }
            if h.tail(mesh) != v {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
        // Every outgoing halfedge is visited once.
        for h in mesh.voh_ccw_iter(v) {
            if std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
    }
    Ok(())
}

fn check_halfedges(mesh: &Topology, hvisited: &[bool]) -> Result<(), Error> {
    for h in mesh.halfedges() {
        let (head, tail) = (h.head(mesh), h.tail(mesh));
        if head == tail {
            return Err(Error::DegenerateHalfedge(h));
        }
        let (next, prev) = (h.next(mesh), h.prev(mesh));
        for linked in [next, prev] {
            if !linked.is_valid(mesh) {
                return Err(Error::DeletedHalfedge(linked));
            }
        }
        if !head.is_valid(mesh) {
            return Err(Error::DeletedVertex(head));
        }
        if let Some(f) = h.face(mesh) {
            if !f.is_valid(mesh) {
                return Err(Error::DeletedFace(f));
            }
        }
        if prev.next(mesh) != h
            || next.prev(mesh) != h
            || head != next.tail(mesh)
            || tail != prev.head(mesh)
        {
            return Err(Error::InvalidHalfedgeLink(h));
        }
        // Must be reachable by circulating around the tail.
        if !hvisited[h.index() as usize] {
            return Err(Error::InvalidHalfedgeLink(h));
        }
    }
    Ok(())
}

fn check_faces(mesh: &Topology) -> Result<(), Error> {
    for f in mesh.faces() {
        let h = f.halfedge(mesh);
        if !h.is_valid(mesh) {
            return Err(Error::DeletedHalfedge(h));
        }
        let h1 = h.next(mesh);
        let h2 = h1.next(mesh);
        if h2.next(mesh) != h || h1 == h || h2 == h {
            return Err(Error::NonTriangleFace(f));
        }
        for fh in [h, h1, h2] {
            if fh.face(mesh) != Some(f) {
                return Err(Error::InconsistentFaceInLoop(fh));
            }
        }
    }
    Ok(())
}

impl Topology {
    /// Check the topology of this mesh for errors. Only live elements are
    /// checked, and they must not reference any deleted elements.
    pub fn check(&self) -> Result<(), Error> {
        let counts = (
            self.vertices().count(),
            self.edges().count(),
            self.faces().count(),
        );
        if counts != (self.num_vertices(), self.num_edges(), self.num_faces()) {
            return Err(Error::InconsistentElementCounts);
        }
        let mut hvisited = vec![false; self.halfedges.len()];
        check_vertices(self, &mut hvisited)?;
        check_halfedges(self, &hvisited)?;
        check_faces(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{element::HH, error::Error, mesh::TriMesh};

    #[test]
    fn t_primitives_check() {
        for mesh in [
            TriMesh::tetrahedron(1.0),
            TriMesh::octahedron(1.0),
            TriMesh::icosahedron(1.0),
            TriMesh::icosphere(1.0, 2),
            TriMesh::grid(3, 5, 2.0),
        ] {
            mesh.expect("Unable to create mesh")
                .check()
                .expect("Topological errors found");
        }
    }

    #[test]
    fn t_broken_link() {
        let mut mesh = TriMesh::octahedron(1.0).expect("Unable to create octahedron");
        let h = HH::from(0);
        let next = mesh.topol.next_halfedge(h);
        // Point the halfedge at its own opposite.
        mesh.topol.halfedge_mut(h).next = h.opposite();
        assert!(matches!(mesh.check(), Err(Error::InvalidHalfedgeLink(_))));
        mesh.topol.halfedge_mut(h).next = next;
        mesh.check().expect("Topological errors found");
    }

    #[test]
    fn t_wrong_count() {
        let mut mesh = TriMesh::octahedron(1.0).expect("Unable to create octahedron");
        mesh.topol.nfaces += 1;
        assert!(matches!(mesh.check(), Err(Error::InconsistentElementCounts)));
    }
}

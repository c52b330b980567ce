use crate::{
    element::{FH, HH, Handle, VH},
    error::Error,
    iterator,
    topol::Topology,
};

impl Topology {
    /// The vertex opposite to `h` in its triangle, if `h` has a face.
    fn opposite_vertex(&self, h: HH) -> Option<VH> {
        self.halfedge_face(h)?;
        Some(self.head_vertex(self.next_halfedge(h)))
    }

    /// Check whether the triangle of `h`, if any, can be removed by
    /// collapsing `h`. Returns the vertex opposite to `h`.
    fn check_collapse_wing(&self, h: HH) -> Result<Option<VH>, ()> {
        let Some(vl) = self.opposite_vertex(h) else {
            return Ok(None);
        };
        let h1 = self.next_halfedge(h);
        let h2 = self.next_halfedge(h1);
        // An isolated triangle would vanish entirely.
        if self.is_boundary_halfedge(h1.opposite()) && self.is_boundary_halfedge(h2.opposite()) {
            return Err(());
        }
        // An interior vertex of valence 3 would be left with two faces
        // folded onto each other.
        if !self.is_boundary_vertex(vl) && iterator::voh_ccw_iter(self, vl).nth(3).is_none() {
            return Err(());
        }
        Ok(Some(vl))
    }

    /// Check whether collapsing `h` keeps the mesh a manifold triangle mesh.
    /// The tail of `h` would be merged into its head.
    pub fn is_collapse_safe(&self, h: HH) -> bool {
        if !self.is_valid_halfedge(h) {
            return false;
        }
        let oh = h.opposite();
        let v0 = self.head_vertex(oh);
        let v1 = self.head_vertex(h);
        if !self.is_valid_vertex(v0) || !self.is_valid_vertex(v1) {
            return false;
        }
        let (Ok(vl), Ok(vr)) = (self.check_collapse_wing(h), self.check_collapse_wing(oh)) else {
            return false;
        };
        if vl == vr {
            return false;
        }
        // An interior edge between two boundary vertices would pinch the
        // boundary.
        if self.is_boundary_vertex(v0)
            && self.is_boundary_vertex(v1)
            && !self.is_boundary_halfedge(h)
            && !self.is_boundary_halfedge(oh)
        {
            return false;
        }
        // Link condition: the only vertices shared by the one rings of v0 and
        // v1 are the ones opposite to the edge.
        iterator::vv_ccw_iter(self, v0).all(|v| {
            v == v1
                || Some(v) == vl
                || Some(v) == vr
                || self.find_halfedge(v, v1).is_none()
        })
    }

    /// Dissolve the two sided loop formed by `h` and `next(h)` after a
    /// collapse, keeping `next(h)` in place of both.
    fn collapse_degenerate_triangle(&mut self, h: HH) {
        let h1 = self.next_halfedge(h);
        let o = h.opposite();
        let o1 = h1.opposite();
        let v0 = self.head_vertex(h);
        let v1 = self.head_vertex(h1);
        let fh = self.halfedge_face(h);
        let fo = self.halfedge_face(o);
        debug_assert_eq!(self.next_halfedge(h1), h);
        debug_assert_ne!(h1, o);
        // Halfedge -> halfedge.
        self.link_halfedges(h1, self.next_halfedge(o));
        self.link_halfedges(self.prev_halfedge(o), h1);
        // Halfedge -> face.
        self.halfedge_mut(h1).face = fo;
        // Vertex -> halfedge.
        self.vertex_mut(v0).halfedge = Some(h1);
        self.adjust_outgoing_halfedge(v0);
        self.vertex_mut(v1).halfedge = Some(o1);
        self.adjust_outgoing_halfedge(v1);
        // Face -> halfedge.
        if let Some(fo) = fo {
            if self.face_halfedge(fo) == o {
                self.face_mut(fo).halfedge = h1;
            }
        }
        if let Some(fh) = fh {
            self.delete_face(fh);
        }
        self.delete_edge(h);
    }

    /// Merge the tail of `h` into its head, without checking whether the
    /// collapse is safe. The tail vertex, the edge, and the faces incident on
    /// the edge are deleted.
    ///
    /// Use [`Topology::is_collapse_safe`] first, or
    /// [`Topology::try_collapse_edge`].
    pub fn collapse_edge_unchecked(&mut self, h: HH) {
        let hn = self.next_halfedge(h);
        let hp = self.prev_halfedge(h);
        let o = h.opposite();
        let on = self.next_halfedge(o);
        let op = self.prev_halfedge(o);
        let fh = self.halfedge_face(h);
        let fo = self.halfedge_face(o);
        let vh = self.head_vertex(h);
        let vo = self.head_vertex(o);
        // Everything pointing at the removed vertex now points at the kept one.
        let incoming: Vec<HH> = iterator::vih_ccw_iter(self, vo).collect();
        for ih in incoming {
            self.halfedge_mut(ih).vertex = vh;
        }
        self.link_halfedges(hp, hn);
        self.link_halfedges(op, on);
        if let Some(fh) = fh {
            self.face_mut(fh).halfedge = hn;
        }
        if let Some(fo) = fo {
            self.face_mut(fo).halfedge = on;
        }
        if self.vertex_halfedge(vh) == Some(o) {
            self.vertex_mut(vh).halfedge = Some(hn);
        }
        self.adjust_outgoing_halfedge(vh);
        self.vertex_mut(vo).halfedge = None;
        self.delete_edge(h);
        self.delete_vertex(vo);
        // The loops that contained the collapsed halfedges are now two sided
        // if they were triangles.
        if self.next_halfedge(hn) == hp {
            self.collapse_degenerate_triangle(hn);
        }
        if self.next_halfedge(on) == op {
            self.collapse_degenerate_triangle(on);
        }
    }

    /// Collapse `h` if it is safe to do so, otherwise return
    /// [`Error::UnsafeCollapse`] and leave the mesh untouched.
    pub fn try_collapse_edge(&mut self, h: HH) -> Result<(), Error> {
        if !self.is_collapse_safe(h) {
            return Err(Error::UnsafeCollapse(h));
        }
        self.collapse_edge_unchecked(h);
        Ok(())
    }

    fn delete_vertex(&mut self, v: VH) {
        let deleted = &mut self.vdeleted[v.index() as usize];
        if !*deleted {
            *deleted = true;
            self.nverts -= 1;
        }
    }

    fn delete_edge(&mut self, h: HH) {
        let deleted = &mut self.edeleted[h.edge().index() as usize];
        if !*deleted {
            *deleted = true;
            self.nedges -= 1;
        }
    }

    fn delete_face(&mut self, f: FH) {
        let deleted = &mut self.fdeleted[f.index() as usize];
        if !*deleted {
            *deleted = true;
            self.nfaces -= 1;
        }
    }
}

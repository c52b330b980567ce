use crate::{
    element::{FH, HH, VH},
    topol::Topology,
};

/// Walks a cycle of halfedges by repeatedly applying `step`, until it returns
/// to where it started.
struct Circulator<'a> {
    topol: &'a Topology,
    hstart: Option<HH>,
    hcurrent: Option<HH>,
    step: fn(&Topology, HH) -> HH,
}

impl Iterator for Circulator<'_> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = (self.step)(self.topol, current);
        self.hcurrent = match self.hstart {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

fn ccw_rotate(topol: &Topology, h: HH) -> HH {
    topol.prev_halfedge(h).opposite()
}

fn cw_rotate(topol: &Topology, h: HH) -> HH {
    topol.next_halfedge(h.opposite())
}

fn outgoing(topol: &Topology, v: VH, step: fn(&Topology, HH) -> HH) -> Circulator<'_> {
    let h = topol.vertex_halfedge(v);
    Circulator {
        topol,
        hstart: h,
        hcurrent: h,
        step,
    }
}

pub(crate) fn voh_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    outgoing(topol, v, ccw_rotate)
}

pub(crate) fn voh_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    outgoing(topol, v, cw_rotate)
}

pub(crate) fn vih_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.opposite())
}

pub(crate) fn vv_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| topol.head_vertex(h))
}

pub(crate) fn vv_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_cw_iter(topol, v).map(|h| topol.head_vertex(h))
}

pub(crate) fn vf_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_ccw_iter(topol, v).filter_map(|h| topol.halfedge_face(h))
}

pub(crate) fn fh_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    let h = topol.face_halfedge(f);
    Circulator {
        topol,
        hstart: Some(h),
        hcurrent: Some(h),
        step: Topology::next_halfedge,
    }
}

pub(crate) fn fv_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(topol, f).map(|h| topol.head_vertex(h))
}

impl Topology {
    /// Outgoing halfedges of `v` in counter-clockwise order, starting from
    /// the halfedge stored for `v`.
    pub fn voh_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        voh_ccw_iter(self, v)
    }

    /// Incoming halfedges of `v` in counter-clockwise order.
    pub fn vih_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        vih_ccw_iter(self, v)
    }

    /// Neighboring vertices of `v` in counter-clockwise order.
    pub fn vv_ccw_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        vv_ccw_iter(self, v)
    }

    pub fn vf_ccw_iter(&self, v: VH) -> impl Iterator<Item = FH> + use<'_> {
        vf_ccw_iter(self, v)
    }

    pub fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        fv_ccw_iter(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::{
        fh_ccw_iter, fv_ccw_iter, vf_ccw_iter, vih_ccw_iter, voh_ccw_iter, voh_cw_iter,
        vv_ccw_iter, vv_cw_iter,
    };
    use crate::{
        element::{FH, Handle, VH},
        topol::Topology,
    };
    use arrayvec::ArrayVec;

    /**
     * A square made of four triangles around a center vertex.
     * ```text
     *
     *   3-----------2
     *   | \       / |
     *   |   \   /   |
     *   |     4     |
     *   |   /   \   |
     *   | /       \ |
     *   0-----------1
     * ```
     */
    fn fan() -> Topology {
        Topology::from_triangles(5, &[[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]])
            .expect("Unable to build topology")
    }

    fn rotate_to_min(mut items: ArrayVec<u32, 8>) -> ArrayVec<u32, 8> {
        if let Some(pos) = items.iter().enumerate().min_by_key(|(_, i)| **i).map(|(i, _)| i) {
            items.rotate_left(pos);
        }
        items
    }

    #[test]
    fn t_fan_vv_ccw_iter() {
        let topol = fan();
        let ring = rotate_to_min(vv_ccw_iter(&topol, 4.into()).map(|v| v.index()).collect());
        assert_eq!(&ring[..], &[0, 1, 2, 3]);
        let ring = rotate_to_min(vv_cw_iter(&topol, 4.into()).map(|v| v.index()).collect());
        assert_eq!(&ring[..], &[0, 3, 2, 1]);
    }

    #[test]
    fn t_fan_boundary_vertex() {
        let topol = fan();
        // Boundary vertices start circulating from their boundary halfedge.
        let ring: ArrayVec<u32, 8> = vv_ccw_iter(&topol, 0.into()).map(|v| v.index()).collect();
        assert_eq!(&ring[..], &[3, 1, 4]);
        let ring: ArrayVec<u32, 8> = vv_cw_iter(&topol, 0.into()).map(|v| v.index()).collect();
        assert_eq!(&ring[..], &[3, 4, 1]);
        let faces: ArrayVec<u32, 8> = vf_ccw_iter(&topol, 0.into()).map(|f| f.index()).collect();
        assert_eq!(&faces[..], &[0, 3]);
    }

    #[test]
    fn t_fan_halfedge_directions() {
        let topol = fan();
        for v in topol.vertices() {
            assert!(voh_ccw_iter(&topol, v).all(|h| topol.tail_vertex(h) == v));
            assert!(voh_cw_iter(&topol, v).all(|h| topol.tail_vertex(h) == v));
            assert!(vih_ccw_iter(&topol, v).all(|h| topol.head_vertex(h) == v));
            assert_eq!(
                voh_ccw_iter(&topol, v).count(),
                voh_cw_iter(&topol, v).count()
            );
        }
    }

    #[test]
    fn t_fan_face_loops() {
        let topol = fan();
        for f in topol.faces() {
            assert_eq!(fh_ccw_iter(&topol, f).count(), 3);
            assert!(fh_ccw_iter(&topol, f).all(|h| topol.halfedge_face(h) == Some(f)));
        }
        let fvs: ArrayVec<u32, 3> = fv_ccw_iter(&topol, FH::from(1)).map(|v| v.index()).collect();
        assert_eq!(&fvs[..], &[2, 4, 1]);
        assert_eq!(vf_ccw_iter(&topol, VH::from(4)).count(), 4);
    }
}

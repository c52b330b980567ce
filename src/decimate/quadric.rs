use crate::{
    element::VH,
    math::triangle_normal,
    property::VField,
    topol::Topology,
};
use glam::DVec3;

/// Area weighted sum of squared distances to the planes of the faces around a
/// vertex. The matrix is symmetric, so only the upper triangle is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Quadric {
    a00: f64,
    a01: f64,
    a02: f64,
    a11: f64,
    a12: f64,
    a22: f64,
    b: DVec3,
    c: f64,
    total: f64,
}

/// Best collapse target of a vertex, and the error of moving the vertex there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Collapse {
    pub score: f64,
    pub dst: VH,
}

impl Quadric {
    /// Add the plane through `p` with the normal `n`. The length of `n` is the
    /// weight of the plane. Zero normals are ignored.
    pub fn add_plane(&mut self, p: DVec3, n: DVec3) {
        let w = n.length();
        if w == 0.0 {
            return;
        }
        let d = p.dot(n);
        self.a00 += n.x * n.x / w;
        self.a01 += n.x * n.y / w;
        self.a02 += n.x * n.z / w;
        self.a11 += n.y * n.y / w;
        self.a12 += n.y * n.z / w;
        self.a22 += n.z * n.z / w;
        self.b += n * (d / w);
        self.c += d * d / w;
        self.total += w;
    }

    /// Divide by the total weight, so the quadric measures the mean squared
    /// distance. The linear term is doubled here, once.
    pub fn normalized(self) -> Self {
        if self.total == 0.0 {
            return self;
        }
        let s = 1.0 / self.total;
        Quadric {
            a00: self.a00 * s,
            a01: self.a01 * s,
            a02: self.a02 * s,
            a11: self.a11 * s,
            a12: self.a12 * s,
            a22: self.a22 * s,
            b: self.b * (2.0 * s),
            c: self.c * s,
            total: self.total,
        }
    }

    fn mul(&self, x: DVec3) -> DVec3 {
        DVec3::new(
            self.a00 * x.x + self.a01 * x.y + self.a02 * x.z,
            self.a01 * x.x + self.a11 * x.y + self.a12 * x.z,
            self.a02 * x.x + self.a12 * x.y + self.a22 * x.z,
        )
    }

    /// `x.A.x - b.x + c`
    pub fn eval(&self, x: DVec3) -> f64 {
        x.dot(self.mul(x) - self.b) + self.c
    }
}

/// Quadric of the interior faces around `v`, normalized by their total area.
/// Degenerate faces contribute nothing.
pub(crate) fn vertex_quadric(topol: &Topology, points: &VField<DVec3>, v: VH) -> Quadric {
    let p = points[v];
    topol
        .voh_ccw_iter(v)
        .filter(|h| !topol.is_boundary_halfedge(*h))
        .fold(Quadric::default(), |mut quadric, h| {
            let q = points[topol.head_vertex(h)];
            let r = points[topol.head_vertex(topol.next_halfedge(h))];
            quadric.add_plane(p, triangle_normal(p, q, r));
            quadric
        })
        .normalized()
}

/// The neighbor of `v` whose position has the smallest error under the
/// quadric of `v`. Ties go to the first neighbor in counter-clockwise order.
/// `None` if `v` has no neighbors.
pub(crate) fn best_collapse(topol: &Topology, points: &VField<DVec3>, v: VH) -> Option<Collapse> {
    let quadric = vertex_quadric(topol, points, v);
    topol
        .vv_ccw_iter(v)
        .map(|dst| Collapse {
            score: quadric.eval(points[dst]),
            dst,
        })
        .filter(|c| !c.score.is_nan())
        .fold(None, |best, c| match best {
            Some(best) if best.score <= c.score => Some(best),
            _ => Some(c),
        })
}

use crate::{
    element::HH,
    math::{line_point_distance, sign_sqr},
    property::VField,
    topol::Topology,
};
use glam::DVec3;
use std::f64::consts::PI;

/// Reason a topologically safe collapse was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    BoundaryDrift,
    NormalDeviation,
}

/// Geometric limits a collapse must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CollapseLimits {
    /// Signed square of the cosine of the largest allowed normal deviation,
    /// or -1 when any deviation is allowed.
    normal_threshold: f64,
    boundary_distance: f64,
}

impl CollapseLimits {
    pub fn new(max_angle: f64, boundary_distance: f64) -> Self {
        let normal_threshold = if max_angle > 0.99 * PI {
            -1.0
        } else {
            sign_sqr(max_angle.cos())
        };
        CollapseLimits {
            normal_threshold,
            boundary_distance,
        }
    }

    /// Check both limits for the collapse of `tail(h)` into `head(h)`. The
    /// boundary is checked first.
    pub fn check(&self, topol: &Topology, points: &VField<DVec3>, h: HH) -> Result<(), Rejection> {
        if !self.boundary_ok(topol, points, h) {
            return Err(Rejection::BoundaryDrift);
        }
        if !self.normals_ok(topol, points, h) {
            return Err(Rejection::NormalDeviation);
        }
        Ok(())
    }

    /// A boundary vertex may only move along the lines to its two boundary
    /// neighbors, within `boundary_distance`.
    pub fn boundary_ok(&self, topol: &Topology, points: &VField<DVec3>, h: HH) -> bool {
        let src = topol.tail_vertex(h);
        let Some(b) = topol.vertex_halfedge(src) else {
            return true;
        };
        if !topol.is_boundary_halfedge(b) {
            return true;
        }
        let xs = points[src];
        let xd = points[topol.head_vertex(h)];
        let x0 = points[topol.head_vertex(b)];
        let x1 = points[topol.tail_vertex(topol.prev_halfedge(b))];
        !(line_point_distance(xs, x0, xd) > self.boundary_distance
            || line_point_distance(xs, x1, xd) > self.boundary_distance)
    }

    /// Faces around `tail(h)` that survive the collapse must not turn by more
    /// than the allowed angle once the tail moves to the head.
    pub fn normals_ok(&self, topol: &Topology, points: &VField<DVec3>, h: HH) -> bool {
        if self.normal_threshold <= -1.0 {
            return true;
        }
        let src = topol.tail_vertex(h);
        let dst = topol.head_vertex(h);
        let xs = points[src];
        let xd = points[dst];
        topol
            .voh_ccw_iter(src)
            .filter(|e| *e != h && !topol.is_boundary_halfedge(*e))
            .all(|e| {
                let v2 = topol.head_vertex(topol.next_halfedge(e));
                if v2 == dst {
                    return true;
                }
                let x1 = points[topol.head_vertex(e)];
                let x2 = points[v2];
                let n0 = (x2 - x1).cross(xs - x1);
                let n1 = (x2 - x1).cross(xd - x1);
                sign_sqr(n0.dot(n1))
                    >= self.normal_threshold * n0.length_squared() * n1.length_squared()
            })
    }
}

use crate::{
    element::{FH, VH},
    mesh::TriMesh,
    property::FField,
};
use glam::DVec3;

/// Normal of the triangle `(a, b, c)`, scaled by twice its area.
pub fn triangle_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a)
}

/// `x * |x|`, i.e. the square of `x` that keeps the sign of `x`.
pub fn sign_sqr(x: f64) -> f64 {
    x * x.abs()
}

/// Distance from `p` to the infinite line through `a` and `b`. If `a` and `b`
/// coincide, this is the distance from `p` to `a`.
pub fn line_point_distance(a: DVec3, b: DVec3, p: DVec3) -> f64 {
    let dir = b - a;
    let len2 = dir.length_squared();
    let rel = p - a;
    if len2 == 0.0 {
        return rel.length();
    }
    (rel - dir * (rel.dot(dir) / len2)).length()
}

impl TriMesh {
    fn face_positions(&self, f: FH) -> [DVec3; 3] {
        self.topol.face_vertices(f).map(|v: VH| self.points[v])
    }

    /// Unit normal of the face. Degenerate faces have a zero normal.
    pub fn face_normal(&self, f: FH) -> DVec3 {
        let [a, b, c] = self.face_positions(f);
        triangle_normal(a, b, c).normalize_or_zero()
    }

    pub fn face_area(&self, f: FH) -> f64 {
        let [a, b, c] = self.face_positions(f);
        triangle_normal(a, b, c).length() * 0.5
    }

    /// Sum of the areas of all live faces.
    pub fn total_area(&self) -> f64 {
        self.topol.faces().map(|f| self.face_area(f)).sum()
    }

    /// Unit normals of all faces, including deleted faces.
    pub fn face_normals(&self) -> FField<DVec3> {
        let mut normals = FField::new(self.topol.num_face_slots(), DVec3::ZERO);
        for f in self.topol.faces() {
            normals[f] = self.face_normal(f);
        }
        normals
    }
}

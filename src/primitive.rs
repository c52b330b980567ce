use crate::{error::Error, mesh::TriMesh};
use glam::DVec3;
use std::collections::HashMap;

const ICO_A: f64 = 0.5257311121191336;
const ICO_B: f64 = 0.8506508083520399;

const ICOSAHEDRON_POINTS: [[f64; 3]; 12] = [
    [0.0, ICO_A, -ICO_B],
    [ICO_A, ICO_B, 0.0],
    [-ICO_A, ICO_B, 0.0],
    [0.0, ICO_A, ICO_B],
    [0.0, -ICO_A, ICO_B],
    [-ICO_B, 0.0, ICO_A],
    [0.0, -ICO_A, -ICO_B],
    [ICO_B, 0.0, -ICO_A],
    [ICO_B, 0.0, ICO_A],
    [-ICO_B, 0.0, -ICO_A],
    [ICO_A, -ICO_B, 0.0],
    [-ICO_A, -ICO_B, 0.0],
];

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [2, 1, 0],
    [1, 2, 3],
    [5, 4, 3],
    [4, 8, 3],
    [7, 6, 0],
    [6, 9, 0],
    [11, 10, 4],
    [10, 11, 6],
    [9, 5, 2],
    [5, 9, 11],
    [8, 7, 1],
    [7, 8, 10],
    [2, 5, 3],
    [8, 1, 3],
    [9, 2, 0],
    [1, 7, 0],
    [11, 9, 6],
    [7, 10, 6],
    [5, 11, 4],
    [10, 8, 4],
];

fn scaled(points: &[[f64; 3]], radius: f64) -> Vec<DVec3> {
    points
        .iter()
        .map(|p| DVec3::from_array(*p) * radius)
        .collect()
}

/// Platonic solids and other simple shapes. Closed shapes are centered at the
/// origin with their vertices on a sphere of the given radius, and their faces
/// oriented outward.
impl TriMesh {
    pub fn tetrahedron(radius: f64) -> Result<Self, Error> {
        let a = 1.0f64 / 3.0;
        let b = (8.0f64 / 9.0).sqrt();
        let c = (2.0f64 / 9.0).sqrt();
        let d = (2.0f64 / 3.0).sqrt();
        TriMesh::new(
            scaled(
                &[[0.0, 0.0, 1.0], [-c, d, -a], [-c, -d, -a], [b, 0.0, -a]],
                radius,
            ),
            &[[0, 1, 2], [0, 2, 3], [0, 3, 1], [3, 2, 1]],
        )
    }

    pub fn octahedron(radius: f64) -> Result<Self, Error> {
        TriMesh::new(
            scaled(
                &[
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [-1.0, 0.0, 0.0],
                    [0.0, -1.0, 0.0],
                    [0.0, 0.0, 1.0],
                    [0.0, 0.0, -1.0],
                ],
                radius,
            ),
            &[
                [0, 4, 3],
                [1, 4, 0],
                [2, 4, 1],
                [3, 4, 2],
                [3, 5, 0],
                [0, 5, 1],
                [1, 5, 2],
                [2, 5, 3],
            ],
        )
    }

    pub fn icosahedron(radius: f64) -> Result<Self, Error> {
        TriMesh::new(scaled(&ICOSAHEDRON_POINTS, radius), &ICOSAHEDRON_FACES)
    }

    /// Subdivide an icosahedron `subdivisions` times, splitting every triangle
    /// into four and projecting the new vertices onto the sphere.
    pub fn icosphere(radius: f64, subdivisions: usize) -> Result<Self, Error> {
        let mut points = scaled(&ICOSAHEDRON_POINTS, 1.0);
        let mut faces = ICOSAHEDRON_FACES.to_vec();
        let mut midpoints = HashMap::<(u32, u32), u32>::new();
        for _ in 0..subdivisions {
            midpoints.clear();
            let mut split = |a: u32, b: u32| -> u32 {
                *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                    let mid = (points[a as usize] + points[b as usize]).normalize();
                    points.push(mid);
                    (points.len() - 1) as u32
                })
            };
            faces = faces
                .iter()
                .flat_map(|&[a, b, c]| {
                    let (ab, bc, ca) = (split(a, b), split(b, c), split(c, a));
                    [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
                })
                .collect();
        }
        for p in points.iter_mut() {
            *p *= radius;
        }
        TriMesh::new(points, &faces)
    }

    /// Flat square patch in the XY plane spanning from the origin to
    /// `(size, size, 0)`, divided into `nx` by `ny` cells of two triangles
    /// each. Vertex `i + j * (nx + 1)` is at column `i` and row `j`.
    pub fn grid(nx: usize, ny: usize, size: f64) -> Result<Self, Error> {
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidParameter("grid resolution"));
        }
        let points = (0..=ny)
            .flat_map(|j| {
                (0..=nx).map(move |i| {
                    DVec3::new(
                        size * i as f64 / nx as f64,
                        size * j as f64 / ny as f64,
                        0.0,
                    )
                })
            })
            .collect();
        let stride = (nx + 1) as u32;
        let faces: Vec<[u32; 3]> = (0..ny as u32)
            .flat_map(|j| {
                (0..nx as u32).flat_map(move |i| {
                    let a = i + j * stride;
                    let (b, c, d) = (a + 1, a + 1 + stride, a + stride);
                    [[a, b, c], [a, c, d]]
                })
            })
            .collect();
        TriMesh::new(points, &faces)
    }
}

#[cfg(test)]
mod test {
    use crate::{element::HasTopology, mesh::TriMesh};

    fn euler_characteristic(mesh: &TriMesh) -> i64 {
        mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64
    }

    #[test]
    fn t_platonic_counts() {
        for (mesh, counts) in [
            (TriMesh::tetrahedron(1.0), (4, 6, 4)),
            (TriMesh::octahedron(1.0), (6, 12, 8)),
            (TriMesh::icosahedron(1.0), (12, 30, 20)),
        ] {
            let mesh = mesh.expect("Unable to create mesh");
            assert_eq!(
                (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces()),
                counts
            );
            assert_eq!(euler_characteristic(&mesh), 2);
            assert!(mesh.vertices().all(|v| !v.is_boundary(&mesh)));
            for v in mesh.vertices() {
                assert!((mesh.point(v).length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn t_icosphere() {
        let mesh = TriMesh::icosphere(2.0, 2).expect("Unable to create icosphere");
        assert_eq!(mesh.num_faces(), 320);
        assert_eq!(mesh.num_vertices(), 162);
        assert_eq!(euler_characteristic(&mesh), 2);
        for v in mesh.vertices() {
            assert!((mesh.point(v).length() - 2.0).abs() < 1e-12);
        }
        mesh.check().expect("Topological errors found");
        // Outward orientation survives subdivision.
        for f in mesh.faces() {
            let centroid = mesh
                .topology()
                .face_vertices(f)
                .iter()
                .fold(glam::DVec3::ZERO, |total, v| total + mesh.point(*v));
            assert!(mesh.face_normal(f).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn t_grid() {
        let mesh = TriMesh::grid(3, 2, 1.0).expect("Unable to create grid");
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_faces(), 12);
        assert_eq!(mesh.num_edges(), 23);
        assert_eq!(euler_characteristic(&mesh), 1);
        let boundary = mesh.vertices().filter(|v| v.is_boundary(&mesh)).count();
        assert_eq!(boundary, 10);
        assert!(TriMesh::grid(0, 2, 1.0).is_err());
    }
}

/*!
Greedy decimation of triangle meshes by halfedge collapses.

Every vertex is scored by the error its quadric assigns to the position of its
best neighbor. Vertices are collapsed into that neighbor in order of
increasing error, as long as the error stays below `distance²` and the
collapse keeps the mesh manifold, keeps boundary vertices on the boundary and
does not turn any face too far. Vertices never move, so the result is a subset
of the input vertices.
*/

use crate::{
    element::VH,
    error::Error,
    mesh::TriMesh,
    property::VField,
    topol::Topology,
};
use admissible::{CollapseLimits, Rejection};
use glam::DVec3;
use heap::{CollapseHeap, Entry};
use quadric::best_collapse;
use std::{f64::consts::PI, fmt::Display};
use tracing::{debug, info, trace};

mod admissible;
mod heap;
mod quadric;

/// Parameters of a decimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimateParams {
    /// Largest error a collapse may introduce, as a distance. Collapses are
    /// only considered if their quadric error is at most `distance²`.
    pub distance: f64,
    /// Largest allowed change in the normal of a face, in radians. Angles
    /// within one percent of π disable the check.
    pub max_angle: f64,
    /// Decimation stops as soon as the mesh has this many vertices.
    pub min_vertices: usize,
    /// How far a boundary vertex may be moved off the lines to its boundary
    /// neighbors.
    pub boundary_distance: f64,
}

impl Default for DecimateParams {
    fn default() -> Self {
        DecimateParams {
            distance: f64::INFINITY,
            max_angle: PI,
            min_vertices: 0,
            boundary_distance: 0.0,
        }
    }
}

impl DecimateParams {
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    #[must_use]
    pub fn with_max_angle(mut self, max_angle: f64) -> Self {
        self.max_angle = max_angle;
        self
    }

    #[must_use]
    pub fn with_min_vertices(mut self, min_vertices: usize) -> Self {
        self.min_vertices = min_vertices;
        self
    }

    #[must_use]
    pub fn with_boundary_distance(mut self, boundary_distance: f64) -> Self {
        self.boundary_distance = boundary_distance;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.distance.is_nan() {
            return Err(Error::InvalidParameter("distance"));
        }
        if self.max_angle.is_nan() {
            return Err(Error::InvalidParameter("max_angle"));
        }
        if self.boundary_distance.is_nan() || self.boundary_distance < 0.0 {
            return Err(Error::InvalidParameter("boundary_distance"));
        }
        Ok(())
    }
}

/// What happened during a decimation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimateStats {
    /// Number of collapsed edges, i.e. number of removed vertices.
    pub collapses: usize,
    /// Candidates whose vertices or edge no longer existed.
    pub stale: usize,
    /// Candidates that would have broken the topology.
    pub unsafe_topology: usize,
    /// Candidates that would have moved a boundary vertex too far.
    pub boundary_drift: usize,
    /// Candidates that would have turned a face too far.
    pub normal_deviation: usize,
    pub final_vertices: usize,
}

impl DecimateStats {
    pub fn rejected(&self) -> usize {
        self.stale + self.unsafe_topology + self.boundary_drift + self.normal_deviation
    }
}

impl Display for DecimateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} collapses, {} vertices left; rejected {} stale, {} unsafe, {} boundary, {} normal",
            self.collapses,
            self.final_vertices,
            self.stale,
            self.unsafe_topology,
            self.boundary_drift,
            self.normal_deviation
        )
    }
}

/// Insert, update or remove the candidate collapse of `v`.
fn queue_vertex_collapse(
    heap: &mut CollapseHeap,
    topol: &Topology,
    points: &VField<DVec3>,
    v: VH,
    area: f64,
) {
    match best_collapse(topol, points, v) {
        Some(c) if c.score <= area => heap.set(v, c.score, c.dst),
        _ => heap.erase(v),
    }
}

/// Decimate the mesh in place. Vertices keep their positions, so `points` is
/// only read. Deleted elements stay in storage until
/// [`Topology::garbage_collection`] is called.
pub fn decimate_inplace_with(
    topol: &mut Topology,
    points: &VField<DVec3>,
    params: &DecimateParams,
) -> Result<DecimateStats, Error> {
    params.validate()?;
    if points.len() != topol.num_vertex_slots() {
        return Err(Error::MismatchedArrayLengths(
            topol.num_vertex_slots(),
            points.len(),
        ));
    }
    let mut stats = DecimateStats::default();
    if topol.num_vertices() <= params.min_vertices {
        debug!(
            vertices = topol.num_vertices(),
            min_vertices = params.min_vertices,
            "Mesh is already at the vertex floor"
        );
        stats.final_vertices = topol.num_vertices();
        return Ok(stats);
    }
    info!(
        vertices = topol.num_vertices(),
        faces = topol.num_faces(),
        distance = params.distance,
        max_angle = params.max_angle,
        min_vertices = params.min_vertices,
        boundary_distance = params.boundary_distance,
        "Decimating mesh"
    );
    let area = params.distance * params.distance;
    let limits = CollapseLimits::new(params.max_angle, params.boundary_distance);
    let mut heap = CollapseHeap::with_capacity(topol.num_vertex_slots());
    heap.extend(topol.vertices().filter_map(|v| {
        best_collapse(topol, points, v)
            .filter(|c| c.score <= area)
            .map(|c| Entry {
                src: v,
                score: c.score,
                dst: c.dst,
            })
    }));
    debug!(candidates = heap.len(), area, "Seeded collapse queue");
    while !heap.is_empty() {
        let (src, dst) = heap.pop();
        if !topol.is_valid_vertex(src) || !topol.is_valid_vertex(dst) {
            stats.stale += 1;
            continue;
        }
        let Some(h) = topol.find_halfedge(src, dst) else {
            stats.stale += 1;
            continue;
        };
        if !topol.is_collapse_safe(h) {
            stats.unsafe_topology += 1;
            continue;
        }
        match limits.check(topol, points, h) {
            Ok(()) => {}
            Err(Rejection::BoundaryDrift) => {
                stats.boundary_drift += 1;
                continue;
            }
            Err(Rejection::NormalDeviation) => {
                stats.normal_deviation += 1;
                continue;
            }
        }
        topol.collapse_edge_unchecked(h);
        stats.collapses += 1;
        trace!(%src, %dst, vertices = topol.num_vertices(), "Collapsed edge");
        if topol.num_vertices() <= params.min_vertices {
            break;
        }
        queue_vertex_collapse(&mut heap, topol, points, dst, area);
        for v in topol.vv_ccw_iter(dst) {
            queue_vertex_collapse(&mut heap, topol, points, v, area);
        }
    }
    stats.final_vertices = topol.num_vertices();
    info!(
        collapses = stats.collapses,
        rejected = stats.rejected(),
        vertices = topol.num_vertices(),
        faces = topol.num_faces(),
        "Finished decimating mesh"
    );
    Ok(stats)
}

/// Decimate the mesh in place. See [`DecimateParams`] for the meaning of the
/// arguments.
pub fn decimate_inplace(
    topol: &mut Topology,
    points: &VField<DVec3>,
    distance: f64,
    max_angle: f64,
    min_vertices: usize,
    boundary_distance: f64,
) -> Result<DecimateStats, Error> {
    decimate_inplace_with(
        topol,
        points,
        &DecimateParams {
            distance,
            max_angle,
            min_vertices,
            boundary_distance,
        },
    )
}

/// Decimate a copy of the mesh, leaving the input untouched. The returned
/// mesh has no deleted elements, and the returned positions belong to its
/// vertices.
pub fn decimate_with(
    topol: &Topology,
    points: &VField<DVec3>,
    params: &DecimateParams,
) -> Result<(Topology, VField<DVec3>), Error> {
    let mut topol = topol.clone();
    let mut points = points.clone();
    decimate_inplace_with(&mut topol, &points, params)?;
    let remap = topol.garbage_collection();
    points.compact(&remap.vertices)?;
    Ok((topol, points))
}

/// Decimate a copy of the mesh. See [`decimate_with`].
pub fn decimate(
    topol: &Topology,
    points: &VField<DVec3>,
    distance: f64,
    max_angle: f64,
    min_vertices: usize,
    boundary_distance: f64,
) -> Result<(Topology, VField<DVec3>), Error> {
    decimate_with(
        topol,
        points,
        &DecimateParams {
            distance,
            max_angle,
            min_vertices,
            boundary_distance,
        },
    )
}

impl TriMesh {
    /// Decimate this mesh in place. Call [`TriMesh::garbage_collection`]
    /// afterwards to drop the removed elements.
    pub fn decimate(&mut self, params: &DecimateParams) -> Result<DecimateStats, Error> {
        decimate_inplace_with(&mut self.topol, &self.points, params)
    }

    /// Decimated, compacted copy of this mesh.
    pub fn decimated(&self, params: &DecimateParams) -> Result<TriMesh, Error> {
        let (topol, points) = decimate_with(&self.topol, &self.points, params)?;
        TriMesh::from_parts(topol, points)
    }
}

#[cfg(test)]
mod test {
    use super::{DecimateParams, DecimateStats, decimate, decimate_inplace};
    use crate::{
        element::{HasTopology, VH},
        error::Error,
        macros::assert_float_eq,
        mesh::TriMesh,
        property::VField,
    };
    use glam::DVec3;
    use std::f64::consts::PI;

    fn assert_outward(mesh: &TriMesh) {
        for f in mesh.faces() {
            let centroid = mesh
                .topology()
                .face_vertices(f)
                .iter()
                .fold(DVec3::ZERO, |total, v| total + mesh.point(*v));
            assert!(mesh.face_normal(f).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn t_params() {
        let params = DecimateParams::default();
        assert_eq!(params.distance, f64::INFINITY);
        assert_eq!(params.max_angle, PI);
        assert_eq!(params.min_vertices, 0);
        assert_eq!(params.boundary_distance, 0.0);
        let params = params
            .with_distance(0.5)
            .with_max_angle(0.25)
            .with_min_vertices(10)
            .with_boundary_distance(0.125);
        assert_eq!(
            params,
            DecimateParams {
                distance: 0.5,
                max_angle: 0.25,
                min_vertices: 10,
                boundary_distance: 0.125,
            }
        );
        assert!(params.validate().is_ok());
        assert!(
            DecimateParams::default()
                .with_boundary_distance(f64::INFINITY)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn t_invalid_params() {
        let mut mesh = TriMesh::icosahedron(1.0).expect("Unable to create icosahedron");
        let before = mesh.clone();
        for (params, name) in [
            (DecimateParams::default().with_distance(f64::NAN), "distance"),
            (DecimateParams::default().with_max_angle(f64::NAN), "max_angle"),
            (
                DecimateParams::default().with_boundary_distance(-1.0),
                "boundary_distance",
            ),
            (
                DecimateParams::default().with_boundary_distance(f64::NAN),
                "boundary_distance",
            ),
        ] {
            match mesh.decimate(&params) {
                Err(Error::InvalidParameter(found)) => assert_eq!(found, name),
                other => panic!("Expected an invalid parameter error, got {other:?}"),
            }
        }
        assert_eq!(mesh, before);
        // One position per vertex slot is required.
        let points = VField::from(mesh.points().iter().take(11).copied().collect::<Vec<_>>());
        assert!(matches!(
            decimate_inplace(&mut mesh.topol, &points, 1.0, PI, 0, 0.0),
            Err(Error::MismatchedArrayLengths(12, 11))
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_icosahedron_to_tetrahedron() {
        let mut mesh = TriMesh::icosahedron(1.0).expect("Unable to create icosahedron");
        let stats = mesh
            .decimate(&DecimateParams::default().with_min_vertices(4))
            .expect("Unable to decimate");
        assert_eq!(stats.collapses, 8);
        assert_eq!(stats.final_vertices, 4);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_faces(), 4);
        mesh.check().expect("Topological errors found");
        assert!(mesh.vertices().all(|v| v.valence(&mesh) == 3));
    }

    #[test]
    fn t_icosahedron_one_collapse_at_a_time() {
        // Lowering the floor by one vertex at a time exposes every
        // intermediate state.
        let mut mesh = TriMesh::icosahedron(1.0).expect("Unable to create icosahedron");
        for target in (4..12).rev() {
            let stats = mesh
                .decimate(&DecimateParams::default().with_min_vertices(target))
                .expect("Unable to decimate");
            assert_eq!(stats.collapses, 1);
            assert_eq!(mesh.num_vertices(), target);
            assert_eq!(mesh.num_faces(), 2 * target - 4);
            mesh.check().expect("Topological errors found");
        }
        // The tetrahedron can't be collapsed any further.
        let stats = mesh
            .decimate(&DecimateParams::default())
            .expect("Unable to decimate");
        assert_eq!(stats.collapses, 0);
        assert_eq!(stats.unsafe_topology, 4);
        assert_eq!(mesh.num_vertices(), 4);
    }

    #[test]
    fn t_floor_already_met() {
        for floor in [12, 13, 100] {
            let mut mesh = TriMesh::icosahedron(1.0).expect("Unable to create icosahedron");
            let before = mesh.clone();
            let stats = mesh
                .decimate(&DecimateParams::default().with_min_vertices(floor))
                .expect("Unable to decimate");
            assert_eq!(
                stats,
                DecimateStats {
                    final_vertices: 12,
                    ..Default::default()
                }
            );
            assert_eq!(mesh, before);
        }
    }

    #[test]
    fn t_idempotent() {
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let params = DecimateParams::default().with_distance(0.1);
        let stats = mesh.decimate(&params).expect("Unable to decimate");
        assert!(stats.collapses > 0);
        assert_eq!(mesh.num_vertices(), 162 - stats.collapses);
        mesh.check().expect("Topological errors found");
        let before = mesh.clone();
        let stats = mesh.decimate(&params).expect("Unable to decimate");
        assert_eq!(stats.collapses, 0);
        assert_eq!(mesh, before);
        // Nothing scores below a tiny distance on a curved surface.
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let before = mesh.clone();
        let stats = mesh
            .decimate(&DecimateParams::default().with_distance(0.01))
            .expect("Unable to decimate");
        assert_eq!(stats, DecimateStats {
            final_vertices: 162,
            ..Default::default()
        });
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_larger_distance_removes_more() {
        let counts: Vec<usize> = [0.05, 0.1, 0.2]
            .into_iter()
            .map(|distance| {
                let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
                let stats = mesh
                    .decimate(&DecimateParams::default().with_distance(distance))
                    .expect("Unable to decimate");
                mesh.check().expect("Topological errors found");
                assert_outward(&mesh);
                assert_eq!(stats.final_vertices, mesh.num_vertices());
                mesh.num_vertices()
            })
            .collect();
        assert!(counts[0] < 162);
        assert!(counts[1] < counts[0]);
        assert!(counts[2] < counts[1]);
    }

    #[test]
    fn t_normal_limit() {
        // Every collapse on a sphere turns some face by more than a tiny angle.
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let before = mesh.clone();
        let stats = mesh
            .decimate(&DecimateParams::default().with_max_angle(0.01))
            .expect("Unable to decimate");
        assert_eq!(stats.collapses, 0);
        assert_eq!(stats.normal_deviation, 162);
        assert_eq!(mesh, before);
        // A moderate limit stops the decimation early.
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let stats = mesh
            .decimate(&DecimateParams::default().with_max_angle(PI / 6.0))
            .expect("Unable to decimate");
        assert!(stats.collapses > 0);
        assert!(stats.normal_deviation > 0);
        assert!(mesh.num_vertices() > 4);
        mesh.check().expect("Topological errors found");
        assert_outward(&mesh);
        // Without a limit, it goes all the way down.
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let stats = mesh
            .decimate(&DecimateParams::default())
            .expect("Unable to decimate");
        assert_eq!(stats.normal_deviation, 0);
        assert_eq!(mesh.num_vertices(), 4);
        mesh.check().expect("Topological errors found");
    }

    #[test]
    fn t_normal_limit_per_collapse() {
        // One collapse per run, so every accepted collapse can be compared
        // against the faces it touched.
        let max_angle = PI / 6.0;
        let min_cos = max_angle.cos();
        let mut mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let mut collapses = 0;
        loop {
            let normals: Vec<_> = mesh.faces().map(|f| (f, mesh.face_normal(f))).collect();
            let params = DecimateParams::default()
                .with_max_angle(max_angle)
                .with_min_vertices(mesh.num_vertices() - 1);
            let stats = mesh.decimate(&params).expect("Unable to decimate");
            if stats.collapses == 0 {
                break;
            }
            assert_eq!(stats.collapses, 1);
            collapses += 1;
            mesh.check().expect("Topological errors found");
            for (f, before) in normals {
                if f.is_valid(&mesh) {
                    assert!(mesh.face_normal(f).dot(before) >= min_cos - 1e-9);
                }
            }
        }
        assert!(collapses > 0);
        assert!(mesh.num_vertices() > 4);
    }

    #[test]
    fn t_grid_boundary_drift() {
        let mut mesh = TriMesh::grid(8, 8, 1.0).expect("Unable to create grid");
        let stats = mesh
            .decimate(
                &DecimateParams::default()
                    .with_distance(0.01)
                    .with_max_angle(PI / 4.0)
                    .with_boundary_distance(1e-9),
            )
            .expect("Unable to decimate");
        assert!(stats.boundary_drift > 0);
        assert_eq!(stats.collapses, 81 - mesh.num_vertices());
        mesh.check().expect("Topological errors found");
        // The corners survive, and every boundary edge lies on a side of the
        // square, so the patch still covers it exactly.
        for corner in [0u32, 8, 72, 80] {
            assert!(VH::from(corner).is_valid(&mesh));
        }
        let on_side = |a: DVec3, b: DVec3| {
            [(a.x, b.x), (a.y, b.y)]
                .iter()
                .any(|(a, b)| (*a == 0.0 && *b == 0.0) || (*a == 1.0 && *b == 1.0))
        };
        for h in mesh.topology().halfedges() {
            if h.is_boundary(&mesh) {
                assert!(on_side(mesh.point(h.tail(&mesh)), mesh.point(h.head(&mesh))));
            }
        }
        for f in mesh.faces() {
            assert!(mesh.face_normal(f).z > 0.0);
        }
        assert_float_eq!(mesh.total_area(), 1.0, 1e-12);
        // Without the boundary constraint the corners are lost.
        let mut mesh = TriMesh::grid(8, 8, 1.0).expect("Unable to create grid");
        mesh.decimate(
            &DecimateParams::default()
                .with_distance(0.01)
                .with_boundary_distance(f64::INFINITY),
        )
        .expect("Unable to decimate");
        mesh.check().expect("Topological errors found");
        assert!(mesh.total_area() < 0.5);
    }

    #[test]
    fn t_copy_isolation() {
        let mesh = TriMesh::icosphere(1.0, 2).expect("Unable to create icosphere");
        let before = mesh.clone();
        let (topol, points) = decimate(mesh.topology(), mesh.points(), 0.2, PI, 0, 0.0)
            .expect("Unable to decimate");
        assert_eq!(mesh, before);
        assert!(!topol.has_deleted());
        assert!(topol.num_vertices() < 162);
        assert_eq!(points.len(), topol.num_vertices());
        // Vertices don't move, they only disappear.
        for p in points.iter() {
            assert!(mesh.points().contains(p));
        }
        let decimated = TriMesh::from_parts(topol, points).expect("Mismatched parts");
        decimated.check().expect("Topological errors found");
        assert_outward(&decimated);
        // Same result through the mesh wrapper.
        let copy = mesh
            .decimated(&DecimateParams::default().with_distance(0.2))
            .expect("Unable to decimate");
        assert_eq!(copy, decimated);
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_stats_display() {
        let stats = DecimateStats {
            collapses: 5,
            stale: 1,
            unsafe_topology: 2,
            boundary_drift: 3,
            normal_deviation: 4,
            final_vertices: 7,
        };
        assert_eq!(stats.rejected(), 10);
        assert_eq!(
            stats.to_string(),
            "5 collapses, 7 vertices left; rejected 1 stale, 2 unsafe, 3 boundary, 4 normal"
        );
    }
}

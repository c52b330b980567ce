/*!
Simplification of triangle meshes by quadric error metric decimation, on top
of a halfedge mesh.

# Overview

+ [`Topology`] is a halfedge representation of a manifold triangle mesh, i.e.
  the connectivity of its vertices, edges and faces. Elements are referred to
  by the handles [`VH`], [`HH`], [`EH`] and [`FH`]. Collapsing edges marks
  elements as deleted, and [`Topology::garbage_collection`] removes them from
  storage.

+ Data stored per element, such as vertex positions, lives in a [`Field`]
  indexed by handles. Positions are [`glam::DVec3`].

+ [`TriMesh`] bundles a topology with vertex positions. It can be created from
  triangles, from a few builtin shapes, or loaded from OBJ files with the
  `obj` feature.

+ [`decimate_inplace`] and [`decimate`] greedily collapse vertices into their
  neighbors in order of increasing quadric error, within the limits given by
  [`DecimateParams`]. Vertices are never moved, so the decimated mesh is made
  of a subset of the original vertices.

```
use decimesh::{DecimateParams, TriMesh};

let mut mesh = TriMesh::icosphere(1.0, 3).unwrap();
let stats = mesh
    .decimate(&DecimateParams::default().with_distance(0.05))
    .unwrap();
assert_eq!(mesh.num_vertices(), stats.final_vertices);
mesh.garbage_collection().unwrap();
mesh.check().unwrap();
```
*/

mod check;
mod collapse;
mod decimate;
mod element;
mod error;
mod garbage;
mod iterator;
mod macros;
mod math;
mod mesh;
#[cfg(feature = "obj")]
mod obj;
mod primitive;
mod property;
mod topol;

pub use decimate::{
    DecimateParams, DecimateStats, decimate, decimate_inplace, decimate_inplace_with,
    decimate_with,
};
pub use element::{EH, FH, HH, Handle, HasTopology, VH};
pub use error::Error;
pub use garbage::Remap;
pub use math::{line_point_distance, sign_sqr, triangle_normal};
pub use mesh::TriMesh;
pub use property::{FField, Field, VField};
pub use topol::Topology;

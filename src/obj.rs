use crate::{
    element::{Handle, VH},
    error::Error,
    mesh::TriMesh,
};
use glam::DVec3;
use std::{io::Write, path::Path};

impl TriMesh {
    /// Load a mesh from an OBJ file. All models in the file are merged into
    /// one mesh. Polygons are triangulated.
    pub fn load_obj(path: &Path) -> Result<Self, Error> {
        let options = tobj::LoadOptions {
            triangulate: true,
            ..Default::default()
        };
        let (models, _) = tobj::load_obj(path, &options)
            .map_err(|e| Error::ObjLoadFailed(format!("{}: {}", path.display(), e)))?;
        let (nverts, nfaces) = models
            .iter()
            .fold((0usize, 0usize), |(nverts, nfaces), model| {
                (
                    nverts + model.mesh.positions.len() / 3,
                    nfaces + model.mesh.indices.len() / 3,
                )
            });
        let mut points = Vec::with_capacity(nverts);
        let mut triangles = Vec::with_capacity(nfaces);
        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::ObjLoadFailed(format!(
                    "Model '{}' has {} coordinates, which is not a multiple of 3",
                    model.name,
                    mesh.positions.len()
                )));
            }
            if mesh.indices.len() % 3 != 0 {
                return Err(Error::ObjLoadFailed(format!(
                    "Model '{}' has {} indices, which is not a multiple of 3",
                    model.name,
                    mesh.indices.len()
                )));
            }
            let voffset = points.len() as u32;
            points.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| DVec3::new(p[0], p[1], p[2])),
            );
            triangles.extend(
                mesh.indices
                    .chunks_exact(3)
                    .map(|t| [t[0] + voffset, t[1] + voffset, t[2] + voffset]),
            );
        }
        TriMesh::new(points, &triangles)
    }

    /// Write the live vertices and faces of this mesh in OBJ format. Vertices
    /// are renumbered so deleted vertices leave no gaps.
    pub fn write_obj(&self, writer: &mut impl Write) -> Result<(), Error> {
        let mut indices: Vec<Option<usize>> = vec![None; self.topol.num_vertex_slots()];
        for (i, v) in self.topol.vertices().enumerate() {
            let p = self.points[v];
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
            indices[v.index() as usize] = Some(i + 1);
        }
        let index = |v: VH| indices[v.index() as usize].ok_or(Error::DeletedVertex(v));
        for f in self.topol.faces() {
            let [a, b, c] = self.topol.face_vertices(f);
            writeln!(writer, "f {} {} {}", index(a)?, index(b)?, index(c)?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{error::Error, mesh::TriMesh};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("decimesh_{}_{}.obj", name, std::process::id()));
        path
    }

    #[test]
    fn t_load_quads() {
        // A unit square made of two quads, which get triangulated.
        let path = temp_path("quads");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 2 0 0\nv 0 1 0\nv 1 1 0\nv 2 1 0\nf 1 2 5 4\nf 2 3 6 5\n",
        )
        .expect("Unable to write obj file");
        let mesh = TriMesh::load_obj(&path).expect("Unable to load obj file");
        std::fs::remove_file(&path).expect("Unable to remove obj file");
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_edges(), 9);
        mesh.check().expect("Topological errors found");
        assert!((mesh.total_area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn t_write_then_load() {
        let mut mesh = TriMesh::icosahedron(1.0).expect("Unable to create icosahedron");
        let h = mesh
            .topol
            .find_halfedge(0.into(), 1.into())
            .expect("Unable to find halfedge");
        mesh.topol
            .try_collapse_edge(h)
            .expect("Unable to collapse edge");
        let mut buf = Vec::new();
        mesh.write_obj(&mut buf).expect("Unable to write obj");
        let text = String::from_utf8(buf).expect("Obj output is not utf8");
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 11);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 18);
        let path = temp_path("roundtrip");
        std::fs::write(&path, text).expect("Unable to write obj file");
        let loaded = TriMesh::load_obj(&path).expect("Unable to load obj file");
        std::fs::remove_file(&path).expect("Unable to remove obj file");
        assert_eq!(loaded.num_vertices(), 11);
        assert_eq!(loaded.num_faces(), 18);
        loaded.check().expect("Topological errors found");
        assert!((loaded.total_area() - mesh.total_area()).abs() < 1e-9);
    }

    #[test]
    fn t_missing_file() {
        let path = temp_path("missing");
        assert!(matches!(
            TriMesh::load_obj(&path),
            Err(Error::ObjLoadFailed(_))
        ));
    }
}

use crate::{
    element::{Face, Halfedge, Handle, Vertex, FH, HH, VH},
    topol::Topology,
};

/// Maps the old index of every element to its new handle after garbage
/// collection, or to `None` if the element was deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Remap {
    pub vertices: Vec<Option<VH>>,
    pub faces: Vec<Option<FH>>,
}

const REMOVED: u32 = u32::MAX;

/// New index of every element, preserving the relative order of the live
/// ones.
fn compact_indices(deleted: &[bool]) -> Vec<u32> {
    let mut next = 0u32;
    deleted
        .iter()
        .map(|&d| {
            if d {
                REMOVED
            } else {
                next += 1;
                next - 1
            }
        })
        .collect()
}

fn public_map<H: From<u32>>(indices: &[u32]) -> Vec<Option<H>> {
    indices
        .iter()
        .map(|&i| (i != REMOVED).then(|| H::from(i)))
        .collect()
}

impl Topology {
    /// Remove all deleted elements from storage and rewrite the handles of
    /// the remaining ones. Handles obtained before this call are invalid
    /// afterwards. Use the returned map to update any data stored per element,
    /// for example with [`crate::Field::compact`].
    pub fn garbage_collection(&mut self) -> Remap {
        let vnew = compact_indices(&self.vdeleted);
        let enew = compact_indices(&self.edeleted);
        let fnew = compact_indices(&self.fdeleted);
        let vmap = |v: VH| VH::from(vnew[v.index() as usize]);
        let hmap = |h: HH| HH::from((enew[h.edge().index() as usize] << 1) | (h.index() & 1));
        let fmap = |f: FH| FH::from(fnew[f.index() as usize]);
        self.vertices = self
            .vertices
            .iter()
            .zip(self.vdeleted.iter())
            .filter(|(_, deleted)| !**deleted)
            .map(|(v, _)| Vertex {
                halfedge: v.halfedge.map(hmap),
            })
            .collect();
        self.halfedges = self
            .halfedges
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.edeleted[i >> 1])
            .map(|(_, h)| Halfedge {
                face: h.face.map(fmap),
                vertex: vmap(h.vertex),
                next: hmap(h.next),
                prev: hmap(h.prev),
            })
            .collect();
        self.faces = self
            .faces
            .iter()
            .zip(self.fdeleted.iter())
            .filter(|(_, deleted)| !**deleted)
            .map(|(f, _)| Face {
                halfedge: hmap(f.halfedge),
            })
            .collect();
        self.vdeleted = vec![false; self.vertices.len()];
        self.edeleted = vec![false; self.halfedges.len() / 2];
        self.fdeleted = vec![false; self.faces.len()];
        debug_assert_eq!(self.vertices.len(), self.nverts);
        debug_assert_eq!(self.edeleted.len(), self.nedges);
        debug_assert_eq!(self.faces.len(), self.nfaces);
        Remap {
            vertices: public_map(&vnew),
            faces: public_map(&fnew),
        }
    }
}

use crate::element::{FH, HH, VH};
use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    // Topology.
    /// A triangle references a vertex that doesn't exist.
    InvalidVertex(VH),
    /// The triangle at this index uses the same vertex more than once.
    DegenerateFace(usize),
    /// The faces around this vertex don't form a single fan.
    ComplexVertex(VH),
    /// This halfedge would be shared by two faces.
    ComplexHalfedge(HH),
    UnsafeCollapse(HH),
    // Topology checks.
    DeletedVertex(VH),
    DeletedHalfedge(HH),
    DeletedFace(FH),
    OutgoingHalfedgeNotBoundary(VH),
    InvalidOutgoingHalfedges(VH),
    DegenerateHalfedge(HH),
    InvalidHalfedgeLink(HH),
    InconsistentFaceInLoop(HH),
    NonTriangleFace(FH),
    InconsistentElementCounts,
    // Parameters.
    InvalidParameter(&'static str),
    // Obj.
    ObjLoadFailed(String),
    Io(std::io::Error),
    // Other,
    MismatchedArrayLengths(usize, usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidVertex(v) => write!(f, "Face references a nonexistent vertex {v}"),
            Error::DegenerateFace(i) => write!(f, "Face {i} uses the same vertex more than once"),
            Error::ComplexVertex(v) => write!(f, "Vertex {v} is not manifold"),
            Error::ComplexHalfedge(h) => {
                write!(f, "Halfedge {h} is shared by more than one face")
            }
            Error::UnsafeCollapse(h) => write!(f, "Collapsing {h} would break the topology"),
            Error::DeletedVertex(v) => write!(f, "Deleted vertex {v} is still referenced"),
            Error::DeletedHalfedge(h) => write!(f, "Deleted halfedge {h} is still referenced"),
            Error::DeletedFace(fh) => write!(f, "Deleted face {fh} is still referenced"),
            Error::OutgoingHalfedgeNotBoundary(v) => {
                write!(f, "Boundary vertex {v} doesn't store a boundary halfedge")
            }
            Error::InvalidOutgoingHalfedges(v) => {
                write!(f, "Outgoing halfedges of {v} are not linked correctly")
            }
            Error::DegenerateHalfedge(h) => write!(f, "Halfedge {h} starts and ends at the same vertex"),
            Error::InvalidHalfedgeLink(h) => write!(f, "Halfedge {h} is not linked correctly"),
            Error::InconsistentFaceInLoop(h) => {
                write!(f, "Halfedge {h} doesn't reference the face of its loop")
            }
            Error::NonTriangleFace(fh) => write!(f, "Face {fh} is not a triangle"),
            Error::InconsistentElementCounts => {
                write!(f, "Element counts don't match the stored elements")
            }
            Error::InvalidParameter(name) => write!(f, "Invalid parameter: {name}"),
            Error::ObjLoadFailed(msg) => write!(f, "Unable to load obj file: {msg}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::MismatchedArrayLengths(expected, found) => {
                write!(f, "Expected an array of length {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

use crate::{
    element::{FH, Handle, VH},
    error::Error,
};
use std::{
    marker::PhantomData,
    ops::{Deref, DerefMut, Index, IndexMut},
};

/// Dense buffer of values associated with the elements of a mesh, indexed
/// directly by the element handle.
///
/// The buffer is sized to the element storage of the topology, including
/// deleted elements, so handles stay valid indices until garbage collection.
/// After garbage collection, use [`Field::compact`] with the returned map to
/// keep the field in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<H, T> {
    buf: Vec<T>,
    _phantom: PhantomData<H>,
}

/// Values associated with vertices. Positions are stored as
/// `VField<glam::DVec3>`.
pub type VField<T> = Field<VH, T>;

/// Values associated with faces.
pub type FField<T> = Field<FH, T>;

impl<H, T> Field<H, T>
where
    H: Handle,
{
    pub fn new(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push(&mut self, value: T) {
        self.buf.push(value);
    }

    pub fn get(&self, h: H) -> Option<&T> {
        self.buf.get(h.index() as usize)
    }

    /// Move the values to their new slots according to `map`, which maps the
    /// old index of every element to its new handle, or `None` if the element
    /// was removed. The map must cover the whole buffer and assign every new
    /// slot exactly once. If it doesn't, an error is returned and the field is
    /// left empty.
    pub fn compact(&mut self, map: &[Option<H>]) -> Result<(), Error> {
        if map.len() != self.buf.len() {
            return Err(Error::MismatchedArrayLengths(self.buf.len(), map.len()));
        }
        let count = map.iter().flatten().count();
        let mut slots: Vec<Option<T>> = Vec::with_capacity(count);
        slots.resize_with(count, || None);
        for (value, dst) in std::mem::take(&mut self.buf).into_iter().zip(map.iter()) {
            if let Some(dst) = dst {
                match slots.get_mut(dst.index() as usize) {
                    Some(slot) => *slot = Some(value),
                    None => return Err(Error::MismatchedArrayLengths(count, dst.index() as usize)),
                }
            }
        }
        let filled = slots.iter().filter(|s| s.is_some()).count();
        self.buf = slots
            .into_iter()
            .collect::<Option<Vec<T>>>()
            .ok_or(Error::MismatchedArrayLengths(count, filled))?;
        Ok(())
    }
}

impl<H, T> Default for Field<H, T> {
    fn default() -> Self {
        Field {
            buf: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl<H, T> From<Vec<T>> for Field<H, T> {
    fn from(buf: Vec<T>) -> Self {
        Field {
            buf,
            _phantom: PhantomData,
        }
    }
}

impl<H, T> Index<H> for Field<H, T>
where
    H: Handle,
{
    type Output = T;

    fn index(&self, handle: H) -> &Self::Output {
        &self.buf[handle.index() as usize]
    }
}

impl<H, T> IndexMut<H> for Field<H, T>
where
    H: Handle,
{
    fn index_mut(&mut self, handle: H) -> &mut Self::Output {
        &mut self.buf[handle.index() as usize]
    }
}

impl<H, T> Deref for Field<H, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<H, T> DerefMut for Field<H, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

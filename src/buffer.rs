//! Flat position buffers shared with the render layer.
//!
//! A [`PointBuffer`] is a fixed-length sequence of xyz triples, laid out
//! exactly the way the render layer consumes it (`[x0, y0, z0, x1, ...]`).
//! The length is fixed at creation: buffers for the same entity across
//! different target shapes always hold the same point count so they can be
//! blended index-for-index.

use glam::Vec3;

/// A fixed-length buffer of 3D points stored as flat `f32` triples.
///
/// Generators produce these, the morph engine blends them, and the render
/// layer uploads them via [`PointBuffer::as_bytes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
    data: Vec<f32>,
}

impl PointBuffer {
    /// Create a zeroed buffer holding `count` points.
    pub fn with_len(count: usize) -> Self {
        Self {
            data: vec![0.0; count * 3],
        }
    }

    /// Build a buffer from a list of points.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut buf = Self::with_len(points.len());
        for (i, p) in points.iter().enumerate() {
            buf.set_point(i, *p);
        }
        buf
    }

    /// Number of points (not floats) in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    /// True if the buffer holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the point at `index`.
    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        let i3 = index * 3;
        Vec3::new(self.data[i3], self.data[i3 + 1], self.data[i3 + 2])
    }

    /// Write the point at `index`.
    #[inline]
    pub fn set_point(&mut self, index: usize, p: Vec3) {
        let i3 = index * 3;
        self.data[i3] = p.x;
        self.data[i3 + 1] = p.y;
        self.data[i3 + 2] = p.z;
    }

    /// Flat view of the coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flat view of the coordinates.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Raw byte view for uploading to a vertex/instance buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Copy another buffer's contents into this one.
    ///
    /// Panics if the point counts differ; target buffers for one entity are
    /// always created with matching lengths.
    pub fn copy_from(&mut self, other: &PointBuffer) {
        assert_eq!(self.data.len(), other.data.len(), "point count mismatch");
        self.data.copy_from_slice(&other.data);
    }

    /// Iterate over the points.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2]))
    }
}

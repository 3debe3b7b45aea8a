//! Renderable surface: row-major vertex buffer plus a fixed triangle index buffer.

use crate::float::Float;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Triangle indices for a grid of `cols x rows` cells.
///
/// Each quad with top-left vertex `a` yields `(a, b, c)` and `(b, d, c)`
/// where `b = a + 1`, `c = a + cols + 1`, `d = c + 1`. Every triangle shares
/// this winding so normals face the same side across the sheet.
///
/// The vertex count must fit in `u32`; `ClothConfig::validate` enforces it.
pub fn grid_indices(cols: usize, rows: usize) -> AllocVec<u32> {
    let stride = cols + 1;
    let mut indices = AllocVec::with_capacity(cols * rows * 6);
    for row in 0..rows {
        for col in 0..cols {
            let a = (row * stride + col) as u32;
            let b = a + 1;
            let c = a + stride as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

/// Vertex and index buffers for a cloth sheet.
///
/// Channels are flat: three scalars per position and normal, two per uv,
/// vertex `row * (cols + 1) + col`. The layout never changes after export;
/// [`Cloth::refresh_surface`](crate::cloth::Cloth::refresh_surface) only
/// rewrites positions and normals in place and bumps [`Surface::revision`].
#[derive(Clone, Debug)]
pub struct Surface<F: Float> {
    positions: AllocVec<F>,
    normals: AllocVec<F>,
    uvs: AllocVec<F>,
    indices: AllocVec<u32>,
    revision: u64,
}

impl<F: Float> Surface<F> {
    pub(crate) fn build<I>(cols: usize, rows: usize, positions: I) -> Self
    where
        I: IntoIterator<Item = Vec3<F>>,
    {
        let vertex_count = (cols + 1) * (rows + 1);
        let mut uvs = AllocVec::with_capacity(vertex_count * 2);
        for row in 0..=rows {
            for col in 0..=cols {
                uvs.push(F::from_usize(col) / F::from_usize(cols));
                uvs.push(F::from_usize(row) / F::from_usize(rows));
            }
        }

        let mut surface = Surface {
            positions: AllocVec::with_capacity(vertex_count * 3),
            normals: alloc::vec![F::zero(); vertex_count * 3],
            uvs,
            indices: grid_indices(cols, rows),
            revision: 0,
        };
        for p in positions {
            surface.positions.extend_from_slice(&[p.x, p.y, p.z]);
        }
        surface.compute_vertex_normals();
        surface
    }

    /// Overwrite positions in order and recompute normals.
    pub(crate) fn write_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec3<F>>,
    {
        for (slot, p) in self.positions.chunks_exact_mut(3).zip(positions) {
            slot[0] = p.x;
            slot[1] = p.y;
            slot[2] = p.z;
        }
        self.compute_vertex_normals();
        self.revision += 1;
    }

    /// Area-weighted vertex normals from the current positions.
    ///
    /// Vertices with no non-degenerate adjacent face get a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = alloc::vec![Vec3::<F>::zero(); self.vertex_count()];
        for tri in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let a = self.position(ia);
            let face = (self.position(ib) - a).cross(self.position(ic) - a);
            accum[ia] = accum[ia] + face;
            accum[ib] = accum[ib] + face;
            accum[ic] = accum[ic] + face;
        }
        for (slot, n) in self.normals.chunks_exact_mut(3).zip(accum) {
            let n = n.normalize();
            slot[0] = n.x;
            slot[1] = n.y;
            slot[2] = n.z;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3<F> {
        let i = vertex * 3;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    pub fn normal(&self, vertex: usize) -> Vec3<F> {
        let i = vertex * 3;
        Vec3::new(self.normals[i], self.normals[i + 1], self.normals[i + 2])
    }

    pub fn positions(&self) -> &[F] { &self.positions }
    pub fn normals(&self) -> &[F] { &self.normals }
    pub fn uvs(&self) -> &[F] { &self.uvs }
    pub fn indices(&self) -> &[u32] { &self.indices }

    /// Number of refreshes since export; renderers re-upload when it changes.
    pub fn revision(&self) -> u64 { self.revision }
}

//! Heightfield terrain grid
//!
//! Owns the height samples, produces the two-triangle tessellation of each
//! grid cell, and tracks which samples the most recent collision touched.
//! The touch flags and the version counter are the only mutable state; an
//! external renderer polls both to recolor affected triangles.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Triangle;

/// Construction and contract errors. Degenerate geometry is never an error,
/// only malformed input shapes and out-of-range cell addresses are.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerrainError {
    #[error("terrain needs at least 2x2 samples, got {width}x{length}")]
    TooSmall { width: usize, length: usize },
    #[error("expected {expected} height samples, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("cell ({row}, {col}) out of range for a {width}x{length} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        width: usize,
        length: usize,
    },
}

/// One terrain grid corner: a fixed world position plus a flag marking
/// membership in the most recently reported collision triangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeightSample {
    pub position: Vec3,
    pub touched: bool,
}

/// Row-major grid of `width x length` height samples.
///
/// Each interior cell `(row, col)` tessellates into two triangles along the
/// fixed `i1-i2` diagonal:
///
/// ```text
///   i0 --- i2        i0 = row * width + col
///   |    / |         i1 = i0 + width
///   |  /   |         i2 = i0 + 1
///   i1 --- i3        i3 = i0 + width + 1
/// ```
///
/// triangle A = `(i0, i1, i2)`, triangle B = `(i2, i1, i3)`. The split is a
/// design invariant: the alternate diagonal produces different collision
/// results.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    samples: Vec<HeightSample>,
    width: usize,
    length: usize,
    version: u64,
}

impl TerrainGrid {
    /// Build a terrain from a row-major grid of raw (non-negative) height
    /// values, as produced by an external heightmap decoder.
    ///
    /// The grid is centered on the world origin: sample `(row, col)` lands
    /// at `x = (col - (width-1)/2) * grid_size`, `y = height * height_scale`,
    /// `z = (row - (length-1)/2) * grid_size`.
    pub fn from_heights(
        heights: &[f32],
        width: usize,
        length: usize,
        grid_size: f32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        if width < 2 || length < 2 {
            return Err(TerrainError::TooSmall { width, length });
        }
        let expected = width * length;
        if heights.len() != expected {
            return Err(TerrainError::SampleCountMismatch {
                expected,
                actual: heights.len(),
            });
        }

        let half_w = (width - 1) as f32 / 2.0;
        let half_l = (length - 1) as f32 / 2.0;
        let mut samples = Vec::with_capacity(expected);
        for row in 0..length {
            for col in 0..width {
                samples.push(HeightSample {
                    position: Vec3::new(
                        (col as f32 - half_w) * grid_size,
                        heights[row * width + col] * height_scale,
                        (row as f32 - half_l) * grid_size,
                    ),
                    touched: false,
                });
            }
        }

        log::debug!(
            "terrain built: {}x{} samples, {} triangles",
            width,
            length,
            (width - 1) * (length - 1) * 2
        );

        Ok(Self {
            samples,
            width,
            length,
            version: 0,
        })
    }

    /// Zero-height terrain, handy for tests and demos.
    pub fn flat(width: usize, length: usize, grid_size: f32) -> Result<Self, TerrainError> {
        Self::from_heights(&vec![0.0; width * length], width, length, grid_size, 1.0)
    }

    /// `(width, length)` in samples
    #[inline]
    pub fn sample_count(&self) -> (usize, usize) {
        (self.width, self.length)
    }

    /// All samples in row-major order, for render-data derivation
    #[inline]
    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }

    /// Monotonic counter, bumped whenever the touch flags of a collision
    /// triangle are set. Collaborators poll it to know when render data is
    /// stale.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// World-space x/z extent of the grid, `(min, max)` corners.
    pub fn xz_extent(&self) -> (Vec3, Vec3) {
        // Row-major and axis-aligned, so the first and last samples bound it.
        let first = self.samples[0].position;
        let last = self.samples[self.samples.len() - 1].position;
        (first, last)
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), TerrainError> {
        if row >= self.length - 1 || col >= self.width - 1 {
            return Err(TerrainError::CellOutOfRange {
                row,
                col,
                width: self.width,
                length: self.length,
            });
        }
        Ok(())
    }

    // Callers guarantee the cell is in range.
    pub(crate) fn corner_indices(&self, row: usize, col: usize) -> [usize; 4] {
        let i0 = row * self.width + col;
        [i0, i0 + self.width, i0 + 1, i0 + self.width + 1]
    }

    /// The four corner sample indices of cell `(row, col)`.
    pub fn cell_corner_indices(&self, row: usize, col: usize) -> Result<[usize; 4], TerrainError> {
        self.check_cell(row, col)?;
        Ok(self.corner_indices(row, col))
    }

    /// Both triangles of cell `(row, col)`, first `(i0, i1, i2)` then
    /// `(i2, i1, i3)`.
    pub fn cell_triangles(&self, row: usize, col: usize) -> Result<(Triangle, Triangle), TerrainError> {
        let [i0, i1, i2, i3] = self.cell_corner_indices(row, col)?;
        let p = |i: usize| self.samples[i].position;
        Ok((
            Triangle::new(p(i0), p(i1), p(i2)),
            Triangle::new(p(i2), p(i1), p(i3)),
        ))
    }

    /// Reset every sample's touch flag. Runs at the start of every collision
    /// query so stale visualization state never outlives a missing frame.
    pub fn clear_touch_flags(&mut self) {
        for sample in &mut self.samples {
            sample.touched = false;
        }
    }

    /// Flag the three samples of the winning collision triangle. Render data
    /// derived from the samples is stale afterwards, so the version bumps.
    pub fn mark_touched(&mut self, i0: usize, i1: usize, i2: usize) {
        self.samples[i0].touched = true;
        self.samples[i1].touched = true;
        self.samples[i2].touched = true;
        self.version += 1;
    }
}

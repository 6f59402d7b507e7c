//! Volume geometry: dimensions, voxel spacing and spaced voxel volumes.

use common::Buffer3;
use serde::{Deserialize, Serialize};

/// Extent of a volume in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeDimensions {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl VolumeDimensions {
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total voxel count, or `None` on overflow.
    pub fn num_voxels(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.depth)
    }

    #[inline]
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }
}

impl From<(usize, usize, usize)> for VolumeDimensions {
    fn from((width, height, depth): (usize, usize, usize)) -> Self {
        Self::new(width, height, depth)
    }
}

/// Physical voxel size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// In-plane size, shared by x and y.
    pub pixel: f32,
    /// Distance between z-slices.
    pub slice: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            pixel: 1.0,
            slice: 1.0,
        }
    }
}

impl Spacing {
    pub const fn new(pixel: f32, slice: f32) -> Self {
        Self { pixel, slice }
    }

    /// Volume of one voxel in mm^3.
    #[inline]
    pub fn voxel_volume(&self) -> f64 {
        let pixel = self.pixel as f64;
        pixel * pixel * self.slice as f64
    }
}

/// Voxel data together with its physical spacing.
#[derive(Debug, Clone)]
pub struct Volume<T> {
    pub voxels: Buffer3<T>,
    pub spacing: Spacing,
}

impl<T> Volume<T> {
    pub fn new(voxels: Buffer3<T>, spacing: Spacing) -> Self {
        Self { voxels, spacing }
    }

    #[inline]
    pub fn dimensions(&self) -> VolumeDimensions {
        self.voxels.dimensions().into()
    }
}

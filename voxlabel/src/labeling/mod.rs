//! Connected component labeling of 3D masks with 6-connectivity.
//!
//! Two-pass algorithm:
//! 1. Raster scan (z, then y, then x) assigning provisional labels. The three
//!    backward neighbors `(x-1,y,z)`, `(x,y-1,z)`, `(x,y,z-1)` are already
//!    labeled when a voxel is visited, so one forward pass discovers every
//!    adjacency. Merges go through an [`EquivalenceResolver`].
//! 2. Count voxels per resolved component, rank components by descending
//!    size, and rewrite every voxel through a single lookup table in parallel.
//!
//! The scan is strictly sequential; only the final write-back is parallel.

pub mod equivalence;
pub mod error;
pub(crate) mod ranking;

#[cfg(test)]
pub(crate) mod test_utils;

use std::time::Instant;

use common::{BitBuffer3, Buffer3};

use crate::config::{LabelingConfig, ResolverKind};

use equivalence::{EagerEquivalence, EquivalenceResolver, FrozenEquivalence, UnionFind};
use error::LabelingError;

/// Component label. 0 is background.
pub type LabelId = u32;

/// Label reserved for background voxels.
pub const BACKGROUND: LabelId = 0;

/// Voxel count below which the final relabeling runs on the calling thread.
/// Building a pool costs more than the write for small volumes.
const PARALLEL_RELABEL_THRESHOLD: usize = 65_000;

// ============================================================================
// LabelVolume
// ============================================================================

/// A 3D label volume from connected component analysis.
///
/// Components are numbered `1..=num_labels` in descending order of voxel
/// count. Equal counts are ordered by the raster position of the first voxel.
#[derive(Debug, Clone)]
pub struct LabelVolume {
    labels: Buffer3<LabelId>,
    num_labels: usize,
    /// Voxel count per label; index 0 is the background count.
    sizes: Vec<u64>,
}

impl LabelVolume {
    /// Label a mask with the default configuration.
    pub fn from_mask(mask: &BitBuffer3) -> Result<Self, LabelingError> {
        Self::from_mask_with_config(mask, &LabelingConfig::default())
    }

    /// Label a mask, allocating the output volume.
    pub fn from_mask_with_config(
        mask: &BitBuffer3,
        config: &LabelingConfig,
    ) -> Result<Self, LabelingError> {
        let (width, height, depth) = mask.dimensions();
        let labels = try_zeroed_volume(width, height, depth, "label volume")?;
        Self::from_buffer(mask, config, labels)
    }

    /// Label a mask into a caller-provided buffer of the same dimensions.
    ///
    /// The buffer is zero-filled first, then overwritten exactly once by the
    /// final relabeling pass.
    pub fn from_buffer(
        mask: &BitBuffer3,
        config: &LabelingConfig,
        mut labels: Buffer3<LabelId>,
    ) -> Result<Self, LabelingError> {
        if labels.dimensions() != mask.dimensions() {
            return Err(LabelingError::DimensionMismatch {
                expected: mask.dimensions(),
                actual: labels.dimensions(),
            });
        }
        labels.fill(BACKGROUND);

        if mask.is_empty() {
            return Ok(Self {
                labels,
                num_labels: 0,
                sizes: vec![0],
            });
        }

        let start = Instant::now();
        let (width, height, depth) = mask.dimensions();
        let mut provisional = try_zeroed_volume(width, height, depth, "provisional labels")?;

        let equivalence = match config.resolver {
            ResolverKind::Eager => {
                label_provisional(mask, &mut provisional, EagerEquivalence::new())?
            }
            ResolverKind::UnionFind => {
                label_provisional(mask, &mut provisional, UnionFind::new())?
            }
        };

        let compaction = ranking::count_components(&provisional, &equivalence)?;
        let num_labels = compaction.num_components();
        let ranking = ranking::rank_components(compaction, &equivalence)?;

        relabel(&provisional, &ranking.lookup, &mut labels, config.num_threads)?;

        tracing::debug!(
            width,
            height,
            depth,
            num_labels,
            provisional = equivalence.provisional_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Labeled volume"
        );

        Ok(Self {
            labels,
            num_labels,
            sizes: ranking.sizes,
        })
    }

    /// Number of connected components (excluding background).
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.labels.depth()
    }

    #[inline]
    pub fn labels(&self) -> &Buffer3<LabelId> {
        &self.labels
    }

    #[inline]
    pub fn into_labels(self) -> Buffer3<LabelId> {
        self.labels
    }

    /// Voxel count per label; index 0 holds the background count.
    ///
    /// Non-increasing from index 1 on.
    #[inline]
    pub fn component_sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Voxel count of `label`, or `None` if no such component exists.
    #[inline]
    pub fn component_size(&self, label: LabelId) -> Option<u64> {
        if label == BACKGROUND {
            return None;
        }
        self.sizes.get(label as usize).copied()
    }

    /// Mask of the voxels belonging to `label`.
    pub fn component_mask(&self, label: LabelId) -> BitBuffer3 {
        self.mask_where(|l| l == label && l != BACKGROUND)
    }

    /// Mask of the `n` largest components (labels `1..=n`).
    pub fn largest_components_mask(&self, n: usize) -> BitBuffer3 {
        let n = n.min(self.num_labels) as LabelId;
        self.mask_where(|l| l != BACKGROUND && l <= n)
    }

    fn mask_where(&self, keep: impl Fn(LabelId) -> bool) -> BitBuffer3 {
        let (width, height, depth) = self.labels.dimensions();
        let mut mask = BitBuffer3::new_default(width, height, depth);
        for (idx, &label) in self.labels.voxels().iter().enumerate() {
            if keep(label) {
                mask.set(idx, true);
            }
        }
        mask
    }
}

impl std::ops::Index<usize> for LabelVolume {
    type Output = LabelId;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.labels[idx]
    }
}

impl std::ops::Index<(usize, usize, usize)> for LabelVolume {
    type Output = LabelId;

    #[inline]
    fn index(&self, xyz: (usize, usize, usize)) -> &Self::Output {
        &self.labels[xyz]
    }
}

fn try_zeroed_volume(
    width: usize,
    height: usize,
    depth: usize,
    what: &'static str,
) -> Result<Buffer3<LabelId>, LabelingError> {
    Buffer3::try_new_filled(width, height, depth, BACKGROUND).map_err(|source| {
        LabelingError::AllocationFailure {
            what,
            requested: width * height * depth,
            source,
        }
    })
}

// ============================================================================
// Pass 1: provisional labels
// ============================================================================

/// Raster-scan `mask`, writing provisional labels and recording merges.
///
/// `provisional` must be zero-filled with the mask's dimensions.
pub(crate) fn label_provisional<R: EquivalenceResolver>(
    mask: &BitBuffer3,
    provisional: &mut Buffer3<LabelId>,
    mut resolver: R,
) -> Result<FrozenEquivalence, LabelingError> {
    let (width, height, depth) = mask.dimensions();
    debug_assert_eq!(provisional.dimensions(), mask.dimensions());
    let slice_len = width * height;
    let labels = provisional.voxels_mut();

    for z in 0..depth {
        for y in 0..height {
            let row_start = z * slice_len + y * width;
            for x in 0..width {
                let idx = row_start + x;
                if !mask.get(idx) {
                    continue;
                }

                let mut neighbors = [BACKGROUND; 3];
                let mut count = 0;
                if z > 0 && labels[idx - slice_len] != BACKGROUND {
                    neighbors[count] = labels[idx - slice_len];
                    count += 1;
                }
                if y > 0 && labels[idx - width] != BACKGROUND {
                    neighbors[count] = labels[idx - width];
                    count += 1;
                }
                if x > 0 && labels[idx - 1] != BACKGROUND {
                    neighbors[count] = labels[idx - 1];
                    count += 1;
                }

                labels[idx] = match count {
                    0 => resolver.allocate_new_label()?,
                    1 => neighbors[0],
                    _ => {
                        let neighbors = &neighbors[..count];
                        let min = neighbors.iter().copied().min().unwrap_or(BACKGROUND);
                        for &label in neighbors {
                            if label != min {
                                resolver.union(min, label)?;
                            }
                        }
                        min
                    }
                };
            }
        }
    }

    tracing::debug!(
        provisional = resolver.len() - 1,
        merges = resolver.merge_count(),
        "Provisional labeling pass done"
    );

    Ok(resolver.freeze())
}

// ============================================================================
// Pass 2b: final relabel
// ============================================================================

/// Write `lookup[provisional[i]]` into every output voxel.
///
/// Workers own disjoint voxel ranges; `lookup` and `provisional` are
/// read-only here.
fn relabel(
    provisional: &Buffer3<LabelId>,
    lookup: &[LabelId],
    labels: &mut Buffer3<LabelId>,
    num_threads: usize,
) -> Result<(), LabelingError> {
    let source = provisional.voxels();
    let write = |out: &mut [LabelId]| {
        common::parallel::parallel_chunked(out, |i| lookup[source[i] as usize]);
    };

    if source.len() < PARALLEL_RELABEL_THRESHOLD {
        for (out, &label) in labels.voxels_mut().iter_mut().zip(source) {
            *out = lookup[label as usize];
        }
    } else if num_threads == 0 {
        write(labels.voxels_mut());
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;
        pool.install(|| write(labels.voxels_mut()));
    }

    Ok(())
}

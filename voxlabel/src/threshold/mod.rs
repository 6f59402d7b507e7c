//! Intensity thresholding into packed foreground masks.
//!
//! Slices are independent, and every [`BitBuffer3`] slice starts on a fresh
//! word, so each worker packs 64 voxels at a time straight into its own
//! words.

#[cfg(test)]
mod tests;

use common::{BitBuffer3, Buffer3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Hounsfield cutoff separating air and lung parenchyma from soft tissue.
pub const DEFAULT_CUTOFF_HU: f32 = -400.0;

/// Which side of the cutoff is foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// `value < cutoff`.
    #[default]
    Below,
    /// `value > cutoff`.
    Above,
}

/// Strict threshold; values equal to the cutoff and NaN are background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threshold {
    pub cutoff: f32,
    pub polarity: Polarity,
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF_HU,
            polarity: Polarity::Below,
        }
    }
}

impl Threshold {
    pub const fn below(cutoff: f32) -> Self {
        Self {
            cutoff,
            polarity: Polarity::Below,
        }
    }

    pub const fn above(cutoff: f32) -> Self {
        Self {
            cutoff,
            polarity: Polarity::Above,
        }
    }

    #[inline]
    pub fn is_foreground(&self, value: f32) -> bool {
        match self.polarity {
            Polarity::Below => value < self.cutoff,
            Polarity::Above => value > self.cutoff,
        }
    }
}

/// Pack one run of slices. `voxels` and `words` cover the same slices.
#[inline]
fn process_slices<const ABOVE: bool>(
    voxels: &[f32],
    cutoff: f32,
    words: &mut [u64],
    slice_len: usize,
    words_per_slice: usize,
) {
    for (slice_voxels, slice_words) in voxels
        .chunks(slice_len)
        .zip(words.chunks_mut(words_per_slice))
    {
        for (word, values) in slice_words.iter_mut().zip(slice_voxels.chunks(64)) {
            let mut bits = 0u64;
            for (bit, &value) in values.iter().enumerate() {
                let hit = if ABOVE { value > cutoff } else { value < cutoff };
                bits |= (hit as u64) << bit;
            }
            *word = bits;
        }
    }
}

/// Write the foreground mask of `volume` into `mask`.
///
/// Every word of `mask` is overwritten, padding bits included.
pub fn create_threshold_mask(volume: &Buffer3<f32>, threshold: Threshold, mask: &mut BitBuffer3) {
    assert_eq!(
        volume.dimensions(),
        mask.dimensions(),
        "mask dimensions must match the volume"
    );
    if mask.is_empty() {
        return;
    }

    let slice_len = volume.slice_len();
    let words_per_slice = mask.words_per_slice();
    let slices_per_chunk = common::parallel::slices_per_chunk(volume.depth());
    let voxels = volume.voxels();

    mask.words_mut()
        .par_chunks_mut(words_per_slice * slices_per_chunk)
        .enumerate()
        .for_each(|(chunk_idx, words)| {
            let first_slice = chunk_idx * slices_per_chunk;
            let num_slices = words.len() / words_per_slice;
            let start = first_slice * slice_len;
            let chunk_voxels = &voxels[start..start + num_slices * slice_len];

            match threshold.polarity {
                Polarity::Below => process_slices::<false>(
                    chunk_voxels,
                    threshold.cutoff,
                    words,
                    slice_len,
                    words_per_slice,
                ),
                Polarity::Above => process_slices::<true>(
                    chunk_voxels,
                    threshold.cutoff,
                    words,
                    slice_len,
                    words_per_slice,
                ),
            }
        });
}

/// Allocate and fill a foreground mask for `volume`.
pub fn threshold_volume(volume: &Buffer3<f32>, threshold: Threshold) -> BitBuffer3 {
    let (width, height, depth) = volume.dimensions();
    let mut mask = BitBuffer3::new_default(width, height, depth);
    create_threshold_mask(volume, threshold, &mut mask);
    mask
}

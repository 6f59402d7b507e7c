//! Component compaction, size counting and size ranking.
//!
//! Pass 2a walks the provisional labels once, giving every representative a
//! dense compact id in order of first appearance and counting its voxels.
//! Ranking then sorts components by descending size and folds everything
//! into one `provisional label -> final label` lookup table.

use common::Buffer3;

use super::equivalence::FrozenEquivalence;
use super::error::LabelingError;
use super::{LabelId, BACKGROUND};

/// Voxel count of one compacted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ComponentCount {
    pub count: u64,
    pub compact_id: u32,
}

/// Result of pass 2a.
#[derive(Debug)]
pub(crate) struct Compaction {
    /// `representative -> compact id`, indexed by provisional label. 0 = unseen.
    compact_of: Vec<u32>,
    /// `K + 1` entries; entry 0 is the background sentinel.
    counts: Vec<ComponentCount>,
    background_voxels: u64,
}

impl Compaction {
    /// Number of distinct components.
    #[inline]
    pub fn num_components(&self) -> usize {
        self.counts.len() - 1
    }
}

/// Final lookup produced by ranking.
#[derive(Debug)]
pub(crate) struct Ranking {
    /// `provisional label -> final label`.
    pub lookup: Vec<LabelId>,
    /// Voxel count per final label; index 0 is the background count.
    pub sizes: Vec<u64>,
}

fn try_zeroed<T: Clone + Default>(
    len: usize,
    what: &'static str,
) -> Result<Vec<T>, LabelingError> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|source| LabelingError::AllocationFailure {
            what,
            requested: len,
            source,
        })?;
    table.resize(len, T::default());
    Ok(table)
}

/// Pass 2a: compact representatives and count voxels per component.
pub(crate) fn count_components(
    provisional: &Buffer3<LabelId>,
    equivalence: &FrozenEquivalence,
) -> Result<Compaction, LabelingError> {
    let mut compact_of: Vec<u32> = try_zeroed(equivalence.len(), "compaction table")?;
    let mut counts = vec![ComponentCount {
        // Background sorts first regardless of its true count.
        count: u64::MAX,
        compact_id: 0,
    }];
    let mut background_voxels = 0u64;

    for &label in provisional.voxels() {
        if label == BACKGROUND {
            background_voxels += 1;
            continue;
        }

        let representative = equivalence.representative_of(label)? as usize;
        let mut compact_id = compact_of[representative];
        if compact_id == 0 {
            compact_id = counts.len() as u32;
            compact_of[representative] = compact_id;
            counts.push(ComponentCount {
                count: 0,
                compact_id,
            });
        }
        counts[compact_id as usize].count += 1;
    }

    Ok(Compaction {
        compact_of,
        counts,
        background_voxels,
    })
}

/// Pass 2b preparation: rank components and build the final lookup.
///
/// Components are ordered by descending voxel count; equal counts keep
/// ascending compact id, i.e. the component reached first in raster order
/// gets the smaller label.
pub(crate) fn rank_components(
    compaction: Compaction,
    equivalence: &FrozenEquivalence,
) -> Result<Ranking, LabelingError> {
    let Compaction {
        compact_of,
        mut counts,
        background_voxels,
    } = compaction;

    counts.sort_unstable_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.compact_id.cmp(&b.compact_id))
    });
    debug_assert_eq!(counts[0].compact_id, 0);

    let mut final_of_compact: Vec<LabelId> = try_zeroed(counts.len(), "rank table")?;
    let mut sizes = Vec::with_capacity(counts.len());
    for (rank, entry) in counts.iter().enumerate() {
        final_of_compact[entry.compact_id as usize] = rank as LabelId;
        sizes.push(entry.count);
    }
    sizes[0] = background_voxels;

    let mut lookup: Vec<LabelId> = try_zeroed(equivalence.len(), "final lookup")?;
    for (label, slot) in lookup.iter_mut().enumerate().skip(1) {
        let representative = equivalence.representative_of(label as LabelId)? as usize;
        // Every representative owns at least one voxel, so it has a compact id.
        *slot = final_of_compact[compact_of[representative] as usize];
    }

    Ok(Ranking { lookup, sizes })
}

//! Test utilities for the labeling module.

use std::collections::{HashMap, VecDeque};

use common::{BitBuffer3, Buffer3};

use super::{LabelId, LabelVolume, BACKGROUND};

/// Mask with the given voxels set.
pub fn mask_from_points(
    width: usize,
    height: usize,
    depth: usize,
    points: &[(usize, usize, usize)],
) -> BitBuffer3 {
    let mut mask = BitBuffer3::new_default(width, height, depth);
    for &(x, y, z) in points {
        mask.set_xyz(x, y, z, true);
    }
    mask
}

/// Reference labeling by breadth-first flood fill over face neighbors.
///
/// Ids are assigned in raster order of each component's first voxel and are
/// not size ranked.
pub fn flood_fill_components(mask: &BitBuffer3) -> Buffer3<LabelId> {
    let (width, height, depth) = mask.dimensions();
    let mut ids = Buffer3::new_filled(width, height, depth, BACKGROUND);
    let mut next_id = 0;
    let mut queue = VecDeque::new();

    for start in 0..mask.len() {
        if !mask.get(start) || ids[start] != BACKGROUND {
            continue;
        }
        next_id += 1;
        ids[start] = next_id;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            let (x, y, z) = ids.coords(idx);
            let mut neighbors = Vec::with_capacity(6);
            if x > 0 {
                neighbors.push((x - 1, y, z));
            }
            if x + 1 < width {
                neighbors.push((x + 1, y, z));
            }
            if y > 0 {
                neighbors.push((x, y - 1, z));
            }
            if y + 1 < height {
                neighbors.push((x, y + 1, z));
            }
            if z > 0 {
                neighbors.push((x, y, z - 1));
            }
            if z + 1 < depth {
                neighbors.push((x, y, z + 1));
            }

            for (nx, ny, nz) in neighbors {
                let n = ids.index(nx, ny, nz);
                if mask.get(n) && ids[n] == BACKGROUND {
                    ids[n] = next_id;
                    queue.push_back(n);
                }
            }
        }
    }

    ids
}

/// Assert that `labels` and `reference` describe the same partition of voxels.
pub fn assert_same_partition(labels: &Buffer3<LabelId>, reference: &Buffer3<LabelId>) {
    assert_eq!(labels.dimensions(), reference.dimensions());
    let mut forward: HashMap<LabelId, LabelId> = HashMap::new();
    let mut backward: HashMap<LabelId, LabelId> = HashMap::new();

    for (idx, (&a, &b)) in labels.voxels().iter().zip(reference.voxels()).enumerate() {
        assert_eq!(
            a == BACKGROUND,
            b == BACKGROUND,
            "background mismatch at voxel {:?}",
            labels.coords(idx)
        );
        if a == BACKGROUND {
            continue;
        }
        assert_eq!(*forward.entry(a).or_insert(b), b, "label {a} split");
        assert_eq!(*backward.entry(b).or_insert(a), a, "labels merged into {b}");
    }
}

/// Assert label numbering invariants: dense `1..=K`, sizes non-increasing,
/// ties ordered by first raster appearance.
pub fn assert_ranked(label_volume: &LabelVolume) {
    let k = label_volume.num_labels();
    let mut counts = vec![0u64; k + 1];
    let mut first_seen = vec![usize::MAX; k + 1];
    for (idx, &label) in label_volume.labels().voxels().iter().enumerate() {
        let label = label as usize;
        assert!(label <= k, "label {label} exceeds component count {k}");
        counts[label] += 1;
        first_seen[label] = first_seen[label].min(idx);
    }

    assert_eq!(counts.as_slice(), label_volume.component_sizes());
    for label in 2..=k {
        assert!(counts[label] > 0, "label {label} is unused");
        assert!(
            counts[label - 1] > counts[label]
                || (counts[label - 1] == counts[label]
                    && first_seen[label - 1] < first_seen[label]),
            "labels {} and {} out of order",
            label - 1,
            label
        );
    }
}

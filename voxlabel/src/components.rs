//! Per-component statistics of a label volume.

use crate::labeling::{LabelId, LabelVolume, BACKGROUND};
use crate::volume::Spacing;

/// Axis-aligned bounding box with inclusive voxel bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aabb3 {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl Aabb3 {
    #[inline]
    pub const fn new(min: [usize; 3], max: [usize; 3]) -> Self {
        Self { min, max }
    }

    /// Inverted bounds, so the first `include()` sets them.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: [usize::MAX; 3],
            max: [0; 3],
        }
    }

    #[inline]
    pub fn include(&mut self, x: usize, y: usize, z: usize) {
        for (axis, v) in [x, y, z].into_iter().enumerate() {
            self.min[axis] = self.min[axis].min(v);
            self.max[axis] = self.max[axis].max(v);
        }
    }

    /// Extent in voxels along x, y and z.
    #[inline]
    pub fn extent(&self) -> [usize; 3] {
        [0, 1, 2].map(|axis| self.max[axis].saturating_sub(self.min[axis]) + 1)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        [x, y, z]
            .into_iter()
            .enumerate()
            .all(|(axis, v)| v >= self.min[axis] && v <= self.max[axis])
    }

    /// Voxel count of the box.
    #[inline]
    pub fn volume(&self) -> usize {
        self.extent().iter().product()
    }
}

/// One connected component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub label: LabelId,
    pub voxel_count: u64,
    /// Physical volume in mm^3.
    pub volume_mm3: f64,
    pub bbox: Aabb3,
}

/// Statistics of every component in a [`LabelVolume`], ordered by label.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStats {
    components: Vec<Component>,
    background_voxels: u64,
    spacing: Spacing,
}

impl ComponentStats {
    /// Collect statistics in one sweep over the labels.
    pub fn from_labels(label_volume: &LabelVolume, spacing: Spacing) -> Self {
        let sizes = label_volume.component_sizes();
        let voxel_volume = spacing.voxel_volume();
        let mut components: Vec<Component> = (1..sizes.len())
            .map(|label| Component {
                label: label as LabelId,
                voxel_count: sizes[label],
                volume_mm3: sizes[label] as f64 * voxel_volume,
                bbox: Aabb3::empty(),
            })
            .collect();

        let labels = label_volume.labels();
        let width = labels.width();
        let slice_len = labels.slice_len();
        for (idx, &label) in labels.voxels().iter().enumerate() {
            if label == BACKGROUND {
                continue;
            }
            let z = idx / slice_len;
            let in_slice = idx % slice_len;
            components[label as usize - 1]
                .bbox
                .include(in_slice % width, in_slice / width, z);
        }

        Self {
            components,
            background_voxels: sizes[0],
            spacing,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component with the given label, `None` for background or unknown labels.
    pub fn get(&self, label: LabelId) -> Option<&Component> {
        if label == BACKGROUND {
            return None;
        }
        self.components.get(label as usize - 1)
    }

    /// The largest component, if any.
    #[inline]
    pub fn largest(&self) -> Option<&Component> {
        self.components.first()
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    #[inline]
    pub fn background_voxels(&self) -> u64 {
        self.background_voxels
    }

    pub fn foreground_voxels(&self) -> u64 {
        self.components.iter().map(|c| c.voxel_count).sum()
    }

    pub fn foreground_volume_mm3(&self) -> f64 {
        self.foreground_voxels() as f64 * self.spacing.voxel_volume()
    }

    #[inline]
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }
}

impl<'a> IntoIterator for &'a ComponentStats {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::test_utils::mask_from_points;

    #[test]
    fn test_aabb_include() {
        let mut bbox = Aabb3::empty();
        bbox.include(5, 3, 1);
        assert_eq!(bbox, Aabb3::new([5, 3, 1], [5, 3, 1]));

        bbox.include(2, 7, 0);
        assert_eq!(bbox, Aabb3::new([2, 3, 0], [5, 7, 1]));
        assert_eq!(bbox.extent(), [4, 5, 2]);
        assert_eq!(bbox.volume(), 40);
    }

    #[test]
    fn test_aabb_contains() {
        let bbox = Aabb3::new([1, 1, 1], [3, 4, 2]);
        assert!(bbox.contains(1, 1, 1));
        assert!(bbox.contains(3, 4, 2));
        assert!(!bbox.contains(0, 2, 1));
        assert!(!bbox.contains(2, 2, 3));
    }

    #[test]
    fn test_stats_from_labels() {
        // 3-voxel rod along z, and a single voxel
        let points = [(0, 0, 0), (0, 0, 1), (0, 0, 2), (3, 2, 1)];
        let mask = mask_from_points(4, 3, 3, &points);
        let label_volume = LabelVolume::from_mask(&mask).unwrap();

        let stats = ComponentStats::from_labels(&label_volume, Spacing::new(0.5, 2.0));
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.background_voxels(), 36 - 4);
        assert_eq!(stats.foreground_voxels(), 4);

        let rod = stats.largest().unwrap();
        assert_eq!(rod.label, 1);
        assert_eq!(rod.voxel_count, 3);
        assert!((rod.volume_mm3 - 1.5).abs() < 1e-12);
        assert_eq!(rod.bbox, Aabb3::new([0, 0, 0], [0, 0, 2]));

        let dot = stats.get(2).unwrap();
        assert_eq!(dot.voxel_count, 1);
        assert_eq!(dot.bbox, Aabb3::new([3, 2, 1], [3, 2, 1]));

        assert!(stats.get(0).is_none());
        assert!(stats.get(3).is_none());
        assert!((stats.foreground_volume_mm3() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_empty() {
        let mask = mask_from_points(2, 2, 2, &[]);
        let label_volume = LabelVolume::from_mask(&mask).unwrap();
        let stats = ComponentStats::from_labels(&label_volume, Spacing::default());
        assert!(stats.is_empty());
        assert!(stats.largest().is_none());
        assert_eq!(stats.background_voxels(), 8);
        assert_eq!((&stats).into_iter().count(), 0);
    }
}

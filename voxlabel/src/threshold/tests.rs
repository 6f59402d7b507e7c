use common::{BitBuffer3, Buffer3};

use super::*;
use crate::testing::synthetic_ct;

fn scalar_mask(volume: &Buffer3<f32>, threshold: Threshold) -> BitBuffer3 {
    let (width, height, depth) = volume.dimensions();
    let mut mask = BitBuffer3::new_default(width, height, depth);
    for (i, &value) in volume.voxels().iter().enumerate() {
        mask.set(i, threshold.is_foreground(value));
    }
    mask
}

#[test]
fn test_default_threshold() {
    let threshold = Threshold::default();
    assert_eq!(threshold.cutoff, -400.0);
    assert_eq!(threshold.polarity, Polarity::Below);
    assert!(threshold.is_foreground(-1000.0));
    assert!(threshold.is_foreground(-400.5));
    assert!(!threshold.is_foreground(-400.0));
    assert!(!threshold.is_foreground(40.0));
    assert!(!threshold.is_foreground(f32::NAN));
}

#[test]
fn test_above_polarity() {
    let threshold = Threshold::above(300.0);
    assert!(threshold.is_foreground(301.0));
    assert!(!threshold.is_foreground(300.0));
    assert!(!threshold.is_foreground(-1000.0));
}

#[test]
fn test_threshold_small_volume() {
    let voxels = vec![-1000.0, 40.0, -500.0, -400.0, 0.0, -401.0];
    let volume = Buffer3::new(3, 2, 1, voxels);

    let mask = threshold_volume(&volume, Threshold::default());
    let bits: Vec<bool> = (&mask).into();
    assert_eq!(bits, vec![true, false, true, false, false, true]);

    let mask = threshold_volume(&volume, Threshold::above(-450.0));
    let bits: Vec<bool> = (&mask).into();
    assert_eq!(bits, vec![false, true, false, true, true, true]);
}

#[test]
fn test_matches_scalar_on_unaligned_slices() {
    // 13 * 11 = 143 voxels per slice, not a multiple of 64
    let volume = synthetic_ct(13, 11, 9, 0.4, 7);
    for threshold in [Threshold::default(), Threshold::above(0.0)] {
        let mask = threshold_volume(&volume, threshold);
        assert_eq!(mask, scalar_mask(&volume, threshold));
    }
}

#[test]
fn test_overwrites_stale_mask_and_padding() {
    let volume = Buffer3::new_filled(5, 3, 4, 40.0f32);
    let mut mask = BitBuffer3::new_filled(5, 3, 4, true);
    for word in mask.words_mut() {
        *word = !0;
    }

    create_threshold_mask(&volume, Threshold::default(), &mut mask);
    assert!(mask.words().iter().all(|&w| w == 0));
}

#[test]
fn test_all_foreground_keeps_padding_clear() {
    let volume = Buffer3::new_filled(10, 10, 3, -1000.0f32);
    let mask = threshold_volume(&volume, Threshold::default());
    assert_eq!(mask.count_ones(), 300);
    assert_eq!(mask, BitBuffer3::new_filled(10, 10, 3, true));
}

#[test]
fn test_empty_volume() {
    let volume = Buffer3::new(0, 4, 4, Vec::new());
    let mask = threshold_volume(&volume, Threshold::default());
    assert!(mask.is_empty());
}

#[test]
#[should_panic(expected = "mask dimensions must match")]
fn test_dimension_mismatch_panics() {
    let volume = Buffer3::new_filled(2, 2, 2, 0.0f32);
    let mut mask = BitBuffer3::new_default(2, 2, 3);
    create_threshold_mask(&volume, Threshold::default(), &mut mask);
}

#[test]
fn test_threshold_yaml() {
    let threshold: Threshold = serde_yml::from_str("polarity: above").unwrap();
    assert_eq!(threshold, Threshold::above(-400.0));
}

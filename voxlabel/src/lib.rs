//! Voxlabel - connected component segmentation of CT volumes.
//!
//! This library provides:
//! - Raw volume reading and writing (8/16/32-bit integer and float, either byte order)
//! - Intensity thresholding into packed foreground masks
//! - Two-pass 3D connected component labeling with 6-connectivity, components
//!   numbered by descending size
//! - Per-component statistics (voxel count, physical volume, bounding box)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use voxlabel::{Pipeline, PipelineConfig, VolumeDimensions};
//!
//! let mut config = PipelineConfig::new("volume1_512x512x56.raw", VolumeDimensions::new(512, 512, 56));
//! config.output = Some("labels.raw".into());
//!
//! let result = Pipeline::from_config(config)?.run()?;
//! println!("Found {} components", result.num_components());
//! ```

pub mod components;
pub mod config;
pub mod labeling;
pub mod pipeline;
pub mod raw_io;
pub mod threshold;
pub mod volume;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Volumes and I/O
// ============================================================================

pub use raw_io::{ByteOrder, ElementType, RawIoError, RawIoErrorKind, RawReader, RawWriter};
pub use volume::{Spacing, Volume, VolumeDimensions};

// ============================================================================
// Labeling
// ============================================================================

pub use labeling::equivalence::{
    EagerEquivalence, EquivalenceResolver, FrozenEquivalence, UnionFind,
};
pub use labeling::error::LabelingError;
pub use labeling::{BACKGROUND, LabelId, LabelVolume};

// ============================================================================
// Pipeline
// ============================================================================

pub use components::{Aabb3, Component, ComponentStats};
pub use config::{LabelingConfig, PipelineConfig, ResolverKind};
pub use pipeline::{Pipeline, SegmentationResult, StageTimings};
pub use threshold::{Polarity, Threshold, create_threshold_mask, threshold_volume};

//! Configuration types for labeling and the segmentation pipeline.
//!
//! Every struct has sensible defaults; [`PipelineConfig`] can also be loaded
//! from a YAML file.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::raw_io::{ByteOrder, ElementType};
use crate::threshold::Threshold;
use crate::volume::{Spacing, VolumeDimensions};

/// Worker count used for the parallel stages unless configured otherwise.
pub const DEFAULT_NUM_THREADS: usize = 4;

// ============================================================================
// Labeling
// ============================================================================

/// Equivalence bookkeeping used during the first labeling pass.
///
/// Both variants produce identical label volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Every merge rewrites the losing class in place. O(1) lookups.
    #[default]
    Eager,
    /// Parent pointers with path compression. Cheaper merges.
    UnionFind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub resolver: ResolverKind,
    /// Workers for the final relabeling pass. 0 = rayon's global pool.
    pub num_threads: usize,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverKind::Eager,
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Full segmentation run: raw volume in, label volume out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw intensity volume to read.
    pub input: PathBuf,
    /// Where to write the label volume (little-endian `u32`). Skipped if unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
    pub dimensions: VolumeDimensions,
    #[serde(default)]
    pub element_type: ElementType,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub threshold: Threshold,
    #[serde(default)]
    pub labeling: LabelingConfig,
}

impl PipelineConfig {
    /// Config with default element type, byte order, spacing and threshold.
    pub fn new(input: impl Into<PathBuf>, dimensions: VolumeDimensions) -> Self {
        Self {
            input: input.into(),
            output: None,
            dimensions,
            element_type: ElementType::default(),
            byte_order: ByteOrder::default(),
            spacing: Spacing::default(),
            threshold: Threshold::default(),
            labeling: LabelingConfig::default(),
        }
    }

    /// Load and validate a config from a YAML file.
    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let config: Self = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let VolumeDimensions {
            width,
            height,
            depth,
        } = self.dimensions;
        ensure!(
            width > 0 && height > 0 && depth > 0,
            "dimensions must be positive, got {width}x{height}x{depth}"
        );
        ensure!(
            self.spacing.pixel.is_finite() && self.spacing.pixel > 0.0,
            "pixel spacing must be positive, got {}",
            self.spacing.pixel
        );
        ensure!(
            self.spacing.slice.is_finite() && self.spacing.slice > 0.0,
            "slice spacing must be positive, got {}",
            self.spacing.slice
        );
        ensure!(
            self.threshold.cutoff.is_finite(),
            "threshold cutoff must be finite, got {}",
            self.threshold.cutoff
        );
        Ok(())
    }
}

//! End-to-end segmentation: raw volume in, ranked label volume out.


use std::time::{Duration, Instant};

use anyhow::Context;

use crate::components::ComponentStats;
use crate::config::PipelineConfig;
use crate::labeling::LabelVolume;
use crate::raw_io::{ByteOrder, RawReader, RawWriter};
use crate::threshold::threshold_volume;
use crate::volume::Volume;

/// Wall-clock time spent in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub read: Duration,
    pub threshold: Duration,
    pub labeling: Duration,
    pub statistics: Duration,
    /// Zero when no output path is configured.
    pub write: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.read + self.threshold + self.labeling + self.statistics + self.write
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    pub labels: LabelVolume,
    pub stats: ComponentStats,
    /// Foreground voxels after thresholding.
    pub foreground_voxels: usize,
    pub timings: StageTimings,
}

impl SegmentationResult {
    #[inline]
    pub fn num_components(&self) -> usize {
        self.labels.num_labels()
    }
}

/// Threshold-and-label pipeline driven by a [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `config` and build the pipeline.
    pub fn from_config(config: PipelineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the configured input, segment it and write the labels if an
    /// output path is set.
    pub fn run(&self) -> anyhow::Result<SegmentationResult> {
        let config = &self.config;

        let start = Instant::now();
        let volume = RawReader::new(&config.input)
            .with_element_type(config.element_type)
            .with_byte_order(config.byte_order)
            .with_spacing(config.spacing)
            .read::<f32>(config.dimensions)?;
        let read = start.elapsed();
        tracing::info!(
            path = %config.input.display(),
            dimensions = ?config.dimensions.as_tuple(),
            element_type = %config.element_type,
            elapsed_ms = read.as_secs_f64() * 1000.0,
            "Loaded volume"
        );

        let mut result = self.segment(&volume)?;
        result.timings.read = read;

        if let Some(output) = &config.output {
            let start = Instant::now();
            RawWriter::new(output)
                .with_byte_order(ByteOrder::Little)
                .write(result.labels.labels())
                .with_context(|| format!("Failed to write labels to '{}'", output.display()))?;
            result.timings.write = start.elapsed();
            tracing::info!(
                path = %output.display(),
                elapsed_ms = result.timings.write.as_secs_f64() * 1000.0,
                "Wrote label volume"
            );
        }

        tracing::info!(
            components = result.num_components(),
            total_ms = result.timings.total().as_secs_f64() * 1000.0,
            "Segmentation finished"
        );
        Ok(result)
    }

    /// Threshold, label and measure an in-memory volume. Ignores the
    /// configured input and output paths.
    pub fn segment(&self, volume: &Volume<f32>) -> anyhow::Result<SegmentationResult> {
        let config = &self.config;
        let mut timings = StageTimings::default();

        let start = Instant::now();
        let mask = threshold_volume(&volume.voxels, config.threshold);
        timings.threshold = start.elapsed();
        let foreground_voxels = mask.count_ones();
        tracing::info!(
            cutoff = config.threshold.cutoff,
            polarity = ?config.threshold.polarity,
            foreground_voxels,
            elapsed_ms = timings.threshold.as_secs_f64() * 1000.0,
            "Thresholded volume"
        );

        let start = Instant::now();
        let labels = LabelVolume::from_mask_with_config(&mask, &config.labeling)
            .context("Connected component labeling failed")?;
        timings.labeling = start.elapsed();
        tracing::info!(
            components = labels.num_labels(),
            resolver = ?config.labeling.resolver,
            elapsed_ms = timings.labeling.as_secs_f64() * 1000.0,
            "Labeled components"
        );
        if labels.num_labels() == 0 {
            tracing::warn!("No voxels passed the threshold, segmentation is empty");
        }

        let start = Instant::now();
        let stats = ComponentStats::from_labels(&labels, volume.spacing);
        timings.statistics = start.elapsed();
        if let Some(largest) = stats.largest() {
            tracing::info!(
                voxels = largest.voxel_count,
                volume_mm3 = largest.volume_mm3,
                "Largest component"
            );
        }

        Ok(SegmentationResult {
            labels,
            stats,
            foreground_voxels,
            timings,
        })
    }
}

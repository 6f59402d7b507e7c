//! Example: Segment a raw CT volume into connected components
//!
//! Reads the volume described by a YAML config, thresholds it, labels the
//! 6-connected components by descending size and optionally writes the label
//! volume as little-endian `u32`.
//!
//! # Config
//!
//! ```yaml
//! input: volume1_512x512x56.raw
//! output: labels_512x512x56.raw
//! dimensions: { width: 512, height: 512, depth: 56 }
//! element_type: short
//! byte_order: big
//! spacing: { pixel: 0.7, slice: 2.5 }
//! threshold: { cutoff: -400.0, polarity: below }
//! labeling: { resolver: eager, num_threads: 4 }
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example segment_volume -- segment.yaml
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use common::log_setup::{setup_logging, LogFiles};
use voxlabel::{Pipeline, PipelineConfig};

/// Number of components listed in the summary.
const SUMMARY_ROWS: usize = 10;

fn main() -> anyhow::Result<()> {
    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: segment_volume <config.yaml>")?;

    setup_logging("info", &LogFiles::new("logs", "segment_volume"));

    let config = PipelineConfig::from_yaml_file(&config_path)?;
    tracing::info!(config = %config_path.display(), "Loaded config");

    let result = Pipeline::from_config(config)?.run()?;

    println!(
        "{} components, {} foreground voxels, {} background voxels",
        result.num_components(),
        result.stats.foreground_voxels(),
        result.stats.background_voxels()
    );
    println!(
        "{:>6} {:>12} {:>14}  bounding box",
        "label", "voxels", "volume mm^3"
    );
    for component in result.stats.iter().take(SUMMARY_ROWS) {
        println!(
            "{:>6} {:>12} {:>14.1}  {:?}..={:?}",
            component.label,
            component.voxel_count,
            component.volume_mm3,
            component.bbox.min,
            component.bbox.max
        );
    }
    if result.num_components() > SUMMARY_ROWS {
        println!("... {} more", result.num_components() - SUMMARY_ROWS);
    }

    let timings = result.timings;
    println!(
        "read {:?}, threshold {:?}, labeling {:?}, statistics {:?}, write {:?}",
        timings.read, timings.threshold, timings.labeling, timings.statistics, timings.write
    );
    Ok(())
}

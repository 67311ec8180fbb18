//! Point-cloud ingestion
//!
//! Samples arrive as an unordered stream of `x y z` triples. This module reads
//! them, keeps them in arrival order and gathers elevation statistics in the
//! same pass.

mod ingest;
mod sample;
mod stats;
pub mod synthetic;

pub use ingest::{ingest, parse, write_samples, IngestOptions};
pub use sample::Sample;
pub use stats::{BoundingBox, Statistics, StatsAccumulator};

use crate::error::{Result, WatershedError};
use crate::grid::{Grid, GridBuilder};
use std::io::Write;
use tracing::info;

/// Ingested samples plus the statistics computed while reading them.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub samples: Vec<Sample>,
    pub statistics: Statistics,
}

impl PointCloud {
    /// Wrap samples that were obtained elsewhere.
    ///
    /// # Errors
    /// Returns [`WatershedError::EmptyInput`] for an empty sample set.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let statistics = Statistics::from_samples(&samples).ok_or(WatershedError::EmptyInput)?;
        Ok(PointCloud {
            samples,
            statistics,
        })
    }

    /// Drop samples below zero elevation and refresh the statistics.
    ///
    /// Returns the number of samples removed.
    ///
    /// # Errors
    /// Returns [`WatershedError::EmptyInput`] if nothing survives; the cloud is
    /// left untouched in that case.
    pub fn discard_negative_heights(&mut self) -> Result<usize> {
        let kept: Vec<Sample> = self.samples.iter().copied().filter(|s| s.z >= 0.0).collect();
        let removed = self.samples.len() - kept.len();
        let statistics = Statistics::from_samples(&kept).ok_or(WatershedError::EmptyInput)?;
        self.samples = kept;
        self.statistics = statistics;
        info!("Removed {} samples with negative heights", removed);
        Ok(removed)
    }

    /// Serialize in the text stream format.
    ///
    /// # Errors
    /// Propagates I/O errors from `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_samples(writer, &self.samples)
    }

    /// Build a linked grid with the default builder.
    ///
    /// # Errors
    /// See [`GridBuilder::build`].
    pub fn into_grid(self) -> Result<Grid> {
        GridBuilder::default().build(self.samples)
    }
}

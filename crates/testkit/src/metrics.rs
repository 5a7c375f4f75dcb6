//! Run metrics aggregated from tick reports and exported as JSON for CI artifacts.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use skafos_world::{GameWorld, TickReport};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Totals over a scripted run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Test identifier.
    pub test_name: String,
    /// Ticks observed.
    pub ticks: u64,
    /// Chunks generated by streaming.
    pub chunks_generated: usize,
    /// Chunks dropped by the retention policy.
    pub chunks_evicted: usize,
    /// Resident chunks at the end of the run.
    pub chunks_resident: usize,
    /// Overlapping solid pairs seen by the collision pass.
    pub contacts: usize,
    /// Floaters collected by the player.
    pub pickups: usize,
    /// Floaters thrown out of the inventory.
    pub thrown: usize,
    /// Tiles placed into the world.
    pub placed: usize,
    /// Items held plus items lying in the world at the end of the run.
    pub items_total: u64,
}

impl RunMetrics {
    /// Empty metrics labelled `test_name`.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            ..Default::default()
        }
    }

    /// Fold one tick report into the totals.
    pub fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.chunks_generated += report.generated.len();
        self.chunks_evicted += report.evicted.len();
        self.contacts += report.collisions.contacts.len();
        self.pickups += report.collisions.pickups.len();
        self.thrown += report.thrown.len();
        self.placed += report.placed.len();
    }

    /// Capture end-of-run state from the world.
    pub fn finish(&mut self, world: &GameWorld) {
        self.chunks_resident = world.map().len();
        self.items_total = world.total_item_count();
    }
}

/// Writes [`RunMetrics`] as pretty JSON.
pub struct MetricsSink {
    file: File,
}

impl MetricsSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the metrics.
    pub fn write(&mut self, metrics: &RunMetrics) -> Result<()> {
        let json = serde_json::to_string_pretty(metrics)?;
        self.file.write_all(json.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

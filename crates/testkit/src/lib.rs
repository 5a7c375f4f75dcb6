#![warn(missing_docs)]
//! Deterministic testing surfaces: event logs, replays, world fixtures, and run metrics.

mod metrics;
mod replay;
mod snapshot;

use anyhow::Result;
use serde::Serialize;
use skafos_core::SimTick;
use skafos_world::{GameWorld, WorldConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use metrics::*;
pub use replay::*;
pub use snapshot::*;

/// Primary event record captured by headless tests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        self.write_value(event)
    }

    /// Append any serializable value as one line.
    pub fn write_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let line = serde_json::to_string(value)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// Default world configuration with a fixed seed.
pub fn seeded_config(seed: u64) -> WorldConfig {
    WorldConfig {
        world_seed: Some(seed),
        ..Default::default()
    }
}

/// Default world with a fixed seed.
pub fn seeded_world(seed: u64) -> Result<GameWorld> {
    Ok(GameWorld::new(seeded_config(seed))?)
}

/// World whose generator never places overlays near play, so only placed tiles collide.
pub fn empty_world(seed: u64) -> Result<GameWorld> {
    Ok(GameWorld::new(WorldConfig {
        spawn_safe_radius: 1 << 20,
        ..seeded_config(seed)
    })?)
}

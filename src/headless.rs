use crate::config::SimConfig;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use glam::Vec2;
use serde::Serialize;
use skafos_world::{GameWorld, InputState};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct HeadlessConfig {
    pub sim: SimConfig,
    pub scripted_input: Option<PathBuf>,
    /// Stop early once the script has run out.
    pub exit_when_script_finished: bool,
}

/// End-of-run report written as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub world_seed: u64,
    pub ticks: u64,
    pub chunks_generated: usize,
    pub chunks_evicted: usize,
    pub chunks_resident: usize,
    pub pickups: usize,
    pub placed: usize,
    pub thrown: usize,
    pub floaters: usize,
    pub items_total: u64,
    pub player_position: Vec2,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    cfg.sim.validate()?;
    let mut script = cfg
        .scripted_input
        .as_deref()
        .map(ScriptedInputPlayer::from_path)
        .transpose()?;

    let mut world = GameWorld::new(cfg.sim.world.clone()).context("invalid world config")?;
    let mut summary = RunSummary {
        world_seed: world.map().world_seed(),
        ..Default::default()
    };
    info!(seed = summary.world_seed, ticks = cfg.sim.ticks, "headless run starting");

    for _ in 0..cfg.sim.ticks {
        if cfg.exit_when_script_finished && script.as_ref().is_some_and(|s| s.finished()) {
            debug!(tick = world.tick().0, "script finished");
            break;
        }
        let input = match script.as_mut() {
            Some(script) => script.advance(cfg.sim.dt),
            None => InputState::idle(),
        };
        let report = world.update(&input, cfg.sim.dt);

        summary.chunks_generated += report.generated.len();
        summary.chunks_evicted += report.evicted.len();
        summary.pickups += report.collisions.pickups.len();
        summary.placed += report.placed.len();
        summary.thrown += report.thrown.len();

        if cfg.sim.log_every > 0 && world.tick().0 % cfg.sim.log_every == 0 {
            info!(
                tick = world.tick().0,
                resident = world.map().len(),
                position = ?world.player().position,
                "progress"
            );
        }
    }

    summary.ticks = world.tick().0;
    summary.chunks_resident = world.map().len();
    summary.floaters = world.floaters().len();
    summary.items_total = world.total_item_count();
    summary.player_position = world.player().position;

    if let Some(path) = cfg.sim.summary.as_deref() {
        write_summary(path, &summary)?;
    }
    info!(ticks = summary.ticks, resident = summary.chunks_resident, "headless run finished");
    Ok(summary)
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("failed to write summary {}", path.display()))
}

//! Scripted tick runner for deterministic worldtests.
//!
//! A replay feeds a fixed input script into a [`GameWorld`] and captures a snapshot after
//! every tick. Running the same script twice against the same seed must produce identical
//! frames; [`assert_replay_deterministic`] checks exactly that.

use anyhow::Result;
use serde::Serialize;
use skafos_world::{GameWorld, InputState, TickReport, WorldConfig};

use crate::snapshot::assert_json_eq;

/// Fixed step used by scripted runs (60 Hz).
pub const REPLAY_DT: f32 = 1.0 / 60.0;

/// One tick of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame<S> {
    /// Tick the report was produced on.
    pub tick: u64,
    /// State captured after the tick.
    pub snapshot: S,
}

/// Input for tick `n` is `script[n]`; ticks past the end of the script run idle.
pub fn input_for(script: &[InputState], tick: usize) -> InputState {
    script.get(tick).cloned().unwrap_or_default()
}

/// Step `world` for `ticks` ticks, snapshotting after each one.
pub fn run_replay<S, F>(
    world: &mut GameWorld,
    script: &[InputState],
    ticks: usize,
    mut snapshot: F,
) -> Vec<ReplayFrame<S>>
where
    F: FnMut(&GameWorld, &TickReport) -> S,
{
    (0..ticks)
        .map(|tick| {
            let report = world.update(&input_for(script, tick), REPLAY_DT);
            ReplayFrame {
                tick: report.tick,
                snapshot: snapshot(world, &report),
            }
        })
        .collect()
}

/// Run the script on two fresh worlds built from `config` and require identical frames.
pub fn assert_replay_deterministic<S, F>(
    config: &WorldConfig,
    script: &[InputState],
    ticks: usize,
    mut snapshot: F,
) -> Result<Vec<ReplayFrame<S>>>
where
    S: Serialize,
    F: FnMut(&GameWorld, &TickReport) -> S,
{
    let mut first = GameWorld::new(config.clone())?;
    let mut second = GameWorld::new(config.clone())?;
    let a = run_replay(&mut first, script, ticks, &mut snapshot);
    let b = run_replay(&mut second, script, ticks, &mut snapshot);
    assert_json_eq("replay", &a, &b)?;
    tracing::debug!(ticks, "replay matched");
    Ok(a)
}

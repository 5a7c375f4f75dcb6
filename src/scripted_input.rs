use anyhow::Context;
use glam::Vec2;
use serde::Deserialize;
use skafos_world::{InputEvent, InputState};
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

/// Held keys for `duration` seconds. `events` fire once, on the step's first tick.
#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    duration: f32,
    #[serde(default)]
    up: bool,
    #[serde(default)]
    down: bool,
    #[serde(default)]
    left: bool,
    #[serde(default)]
    right: bool,
    #[serde(default)]
    aim: Option<Vec2>,
    #[serde(default)]
    events: Vec<InputEvent>,
}

pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    fired: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            fired: false,
        })
    }

    /// True once every step has run its full duration.
    pub fn finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Input for the next tick of length `dt`. Idle after the script ends.
    pub fn advance(&mut self, dt: f32) -> InputState {
        let Some(step) = self.steps.get(self.index) else {
            return InputState::idle();
        };

        let mut input = step.held_input();
        if !self.fired {
            input.events = step.events.clone();
            self.fired = true;
        }

        // At most one step boundary per tick so no step's events are skipped.
        self.time_in_step += dt;
        if self.time_in_step >= step.duration {
            self.time_in_step = (self.time_in_step - step.duration).max(0.0);
            self.index += 1;
            self.fired = false;
        }
        input
    }
}

impl ScriptedStep {
    fn held_input(&self) -> InputState {
        InputState {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            aim: self.aim,
            events: Vec::new(),
        }
    }
}

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use skafos_world::WorldConfig;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/skafos.toml";

/// Host-side run options wrapping the world configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks to simulate.
    pub ticks: u64,
    /// Seconds per tick.
    pub dt: f32,
    /// Emit a progress line every this many ticks (0 disables).
    pub log_every: u64,
    /// Where to write the JSON run summary.
    pub summary: Option<PathBuf>,
    pub world: WorldConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            log_every: 60,
            summary: None,
            world: WorldConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from `path`, falling back to defaults when the file is missing or malformed.
    pub fn load_lenient(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => match cfg.validate() {
                    Ok(()) => cfg,
                    Err(err) => {
                        warn!("Invalid config {}: {err}. Using defaults", path.display());
                        SimConfig::default()
                    }
                },
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }

    /// Load from `path`, failing on any read or parse error.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: SimConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject run options the world cannot step with.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be a positive number of seconds, got {}", self.dt);
        }
        Ok(())
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skafos_world::ChunkRetention;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("skafos-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: SimConfig = toml::from_str(
            r#"
            ticks = 30

            [world]
            draw_radius = 2
            world_seed = 99

            [world.retention]
            policy = "keep_alive"
            radius = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ticks, 30);
        assert_eq!(cfg.dt, 1.0 / 60.0);
        assert_eq!(cfg.world.draw_radius, 2);
        assert_eq!(cfg.world.world_seed, Some(99));
        assert_eq!(cfg.world.retention, ChunkRetention::KeepAlive { radius: 5 });
        assert_eq!(cfg.world.chunk_width, 16);
    }

    #[test]
    fn lenient_load_falls_back_on_missing_file() {
        let cfg = SimConfig::load_lenient(&temp_path("missing.toml"));
        assert_eq!(cfg, SimConfig::default());
    }

    #[test]
    fn strict_load_rejects_bad_toml() {
        let path = temp_path("bad.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "ticks = \"many\"").unwrap();
        assert!(SimConfig::load_strict(&path).is_err());
        assert_eq!(SimConfig::load_lenient(&path), SimConfig::default());
    }

    #[test]
    fn non_positive_dt_is_rejected() {
        let path = temp_path("negative_dt.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "ticks = 10\ndt = -1.0\n").unwrap();
        let err = SimConfig::load_strict(&path).unwrap_err();
        assert!(format!("{err:#}").contains("dt must be a positive"));
        assert_eq!(SimConfig::load_lenient(&path), SimConfig::default());

        let zero: SimConfig = toml::from_str("dt = 0.0").unwrap();
        assert!(zero.validate().is_err());
        let nan = SimConfig {
            dt: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn save_then_strict_load() {
        let path = temp_path("saved.toml");
        let mut cfg = SimConfig::default();
        cfg.world.world_seed = Some(5);
        cfg.ticks = 12;
        cfg.save_to_path(&path).unwrap();
        assert_eq!(SimConfig::load_strict(&path).unwrap(), cfg);
    }
}

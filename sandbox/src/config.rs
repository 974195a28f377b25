//! RON-backed sandbox configuration.

use bevy::math::{IVec2, IVec3, Vec3};
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use std::fs;
use wavefield::{GridSettings, StageMask, WaveSettings};

/// Everything the runner needs from a settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxSettings {
    pub grid: GridSettings,
    pub waves: WaveSettings,
}

impl Default for SandboxSettings {
    /// Demo-scale defaults: a grid small enough to relax comfortably on the
    /// CPU at the fixed tick rate.
    fn default() -> Self {
        Self {
            grid: GridSettings {
                world_origin: Vec3::ZERO,
                world_size: Vec3::new(32.0, 16.0, 32.0),
                grid_size: IVec3::new(32, 16, 32),
                stage_mask: StageMask::layer(0),
                bfs_passes: 24,
                heightfield_resolution: IVec2::new(32, 32),
            },
            waves: WaveSettings::default(),
        }
    }
}

/// Loads settings from a RON file, or the demo defaults when no path is
/// given.
pub fn load_settings(path: Option<&str>) -> Result<SandboxSettings, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SandboxSettings::default());
    };
    let contents = fs::read_to_string(path)?;
    let settings: SandboxSettings = from_str(&contents)?;
    settings.grid.validate()?;
    settings.waves.validate()?;
    Ok(settings)
}

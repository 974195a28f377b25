//! Grid and wave configuration resources.
//!
//! Both resources are plain serializable data so an embedding application can
//! load them from configuration files or author them in tooling.

use bevy::math::{IVec2, IVec3, Vec3};
use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::grid::StageMask;

/// Extents and resolution of the voxelized stage volume.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Minimum corner of the stage volume in world space.
    pub world_origin: Vec3,
    /// Size of the stage volume in world units.
    pub world_size: Vec3,
    /// Number of voxels per axis.
    pub grid_size: IVec3,
    /// Collision layers counted as stage geometry.
    pub stage_mask: StageMask,
    /// Relaxation passes per tick. Zero or negative leaves the distance
    /// field at its seeded state, which is a valid degenerate output.
    pub bfs_passes: i32,
    /// Resolution of the baked XZ heightfield published for rendering.
    pub heightfield_resolution: IVec2,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            world_origin: Vec3::ZERO,
            world_size: Vec3::new(64.0, 32.0, 64.0),
            grid_size: IVec3::new(64, 32, 64),
            stage_mask: StageMask::ALL,
            bfs_passes: 128,
            heightfield_resolution: IVec2::new(32, 32),
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.grid_size.x <= 0 || self.grid_size.y <= 0 || self.grid_size.z <= 0 {
            return Err(FieldError::InvalidGridSize(self.grid_size));
        }
        if self.world_size.x <= 0.0 || self.world_size.y <= 0.0 || self.world_size.z <= 0.0 {
            return Err(FieldError::InvalidWorldSize(self.world_size));
        }
        Ok(())
    }

    /// Uniform world-units-per-voxel, the largest of the per-axis ratios.
    /// A single scalar on purpose: voxels are not generally cubic when the
    /// axis resolutions do not match the world proportions.
    pub fn cell_size(&self) -> f32 {
        (self.world_size.x / self.grid_size.x as f32)
            .max(self.world_size.y / self.grid_size.y as f32)
            .max(self.world_size.z / self.grid_size.z as f32)
    }
}

/// Parameters stamped onto newly emitted waves.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WaveSettings {
    /// Propagation speed of the wavefront, world units per second.
    pub speed: f32,
    /// Wavelength in world units.
    pub wavelength: f32,
    /// Crest amplitude in world units.
    pub amplitude: f32,
    /// Exponential decay rate applied over a wave's age.
    pub damping: f32,
    /// Grace period before an event that has crossed the whole field is
    /// discarded.
    pub hide_delay: f32,
    /// Width of the rendered wavefront band, world units.
    pub thickness: f32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            speed: 4.0,
            wavelength: 4.0,
            amplitude: 1.0,
            damping: 0.5,
            hide_delay: 1.0,
            thickness: 1.0,
        }
    }
}

impl WaveSettings {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.speed <= 0.0 {
            return Err(FieldError::InvalidWaveSpeed(self.speed));
        }
        if self.wavelength <= 0.0 {
            return Err(FieldError::InvalidWavelength(self.wavelength));
        }
        Ok(())
    }
}

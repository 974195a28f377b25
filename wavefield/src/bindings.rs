//! Buffers published for the rendering collaborator.
//!
//! The renderer is an external consumer: it binds the occupancy volume, the
//! distance volume, the wave parameter list, the baked heightfield, and the
//! wavefront uniform under well-known global names. This module only fills
//! plain CPU-side buffers; texture upload and compute dispatch stay on the
//! renderer's side of the boundary.

use bevy::math::{IVec2, IVec3, Vec3};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::{HEIGHT_NO_GROUND, MAX_GPU_WAVES};
use crate::grid::{DistanceField, VoxelField};
use crate::parallel;
use crate::settings::{GridSettings, WaveSettings};
use crate::wave::{sample_height, WaveEmitter, WaveEvent};

pub const GLOBAL_OCCUPANCY_TEX: &str = "_OccupancyTex";
pub const GLOBAL_DISTANCE_TEX: &str = "_DistanceTex";
pub const GLOBAL_HEIGHT_FIELD: &str = "_HeightField";
pub const GLOBAL_WORLD_ORIGIN: &str = "_WorldOrigin";
pub const GLOBAL_WORLD_SIZE: &str = "_WorldSize";
pub const GLOBAL_CELL_SIZE: &str = "_CellSize";

/// Wave parameters in GPU buffer layout, eight floats per entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GpuWaveParam {
    pub origin: [f32; 3],
    pub start_time: f32,
    pub speed: f32,
    pub wavelength: f32,
    pub amplitude: f32,
    pub damping: f32,
}

impl From<&WaveEvent> for GpuWaveParam {
    fn from(event: &WaveEvent) -> Self {
        Self {
            origin: event.origin.to_array(),
            start_time: event.start_time,
            speed: event.speed,
            wavelength: event.wavelength,
            amplitude: event.amplitude,
            damping: event.damping,
        }
    }
}

/// Expanding-ring parameters of the most recent emission.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WavefrontUniform {
    pub radius: f32,
    pub thickness: f32,
}

/// All buffers the core publishes per tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct FieldBuffers {
    pub grid_size: IVec3,
    pub world_origin: Vec3,
    pub cell_size: f32,
    /// R8-style occupancy volume, 255 solid / 0 air, linear layout.
    pub occupancy: Vec<u8>,
    /// Current distance volume, linear layout.
    pub distance: Vec<f32>,
    /// Live wave list, truncated to [`MAX_GPU_WAVES`].
    pub waves: Vec<GpuWaveParam>,
    /// Baked XZ surface heights, row-major over `heightfield_resolution`,
    /// [`HEIGHT_NO_GROUND`] where a column has no surface.
    pub heightfield: Vec<f32>,
    pub heightfield_resolution: IVec2,
    pub front: WavefrontUniform,
}

impl FieldBuffers {
    /// Rebuilds every published buffer from this tick's state.
    pub fn refresh(
        &mut self,
        field: &VoxelField,
        distance: &DistanceField,
        emitter: &WaveEmitter,
        grid_settings: &GridSettings,
        wave_settings: &WaveSettings,
        now: f32,
    ) {
        self.grid_size = field.grid_size();
        self.world_origin = field.world_origin();
        self.cell_size = field.cell_size();

        self.occupancy.clear();
        self.occupancy
            .extend(field.voxels().iter().map(|v| if v.is_solid { 255 } else { 0 }));

        self.distance.clear();
        self.distance.extend_from_slice(distance.values());

        self.waves.clear();
        self.waves.extend(
            emitter
                .events()
                .iter()
                .take(MAX_GPU_WAVES)
                .map(GpuWaveParam::from),
        );

        self.front = WavefrontUniform {
            radius: if emitter.last_emit().is_some() {
                (now - emitter.last_emit_time()) * wave_settings.speed
            } else {
                0.0
            },
            thickness: wave_settings.thickness,
        };

        self.bake_heightfield(field, emitter.events(), grid_settings.heightfield_resolution, now);
    }

    /// Bakes the sampled surface heights into a dense XZ grid, one row per
    /// pool task. Queries run at the field's base plane.
    fn bake_heightfield(
        &mut self,
        field: &VoxelField,
        waves: &[WaveEvent],
        resolution: IVec2,
        now: f32,
    ) {
        if field.is_empty() || resolution.x <= 0 || resolution.y <= 0 {
            self.heightfield.clear();
            self.heightfield_resolution = IVec2::ZERO;
            return;
        }

        self.heightfield_resolution = resolution;
        self.heightfield
            .resize((resolution.x * resolution.y) as usize, 0.0);

        let origin = field.world_origin();
        let extent = field.world_extent();
        let step = Vec3::new(
            extent.x / resolution.x as f32,
            0.0,
            extent.z / resolution.y as f32,
        );

        parallel::for_each_slab(&mut self.heightfield, resolution.x as usize, |row, out| {
            let z = origin.z + (row as f32 + 0.5) * step.z;
            for (ix, height) in out.iter_mut().enumerate() {
                let pos = Vec3::new(origin.x + (ix as f32 + 0.5) * step.x, origin.y, z);
                *height =
                    sample_height(pos, now, field, waves).unwrap_or(HEIGHT_NO_GROUND);
            }
        });
    }
}

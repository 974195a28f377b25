//! Dense voxel occupancy and slope metadata for the stage volume.
//!
//! The field is rebuilt wholesale from stage geometry; there is no
//! incremental mutation. Every voxel center is tested against the collidable
//! geometry with a half-cell box, and slope metadata is taken verbatim from
//! the stage's authoring data.

use bevy::math::{IVec3, Vec2, Vec3};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::stage::{StageGeometry, StageMask};
use crate::error::FieldError;
use crate::settings::GridSettings;

/// Per-voxel occupancy and slope metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoxelData {
    pub is_solid: bool,
    /// Slope angle in degrees, zero meaning flat.
    pub slope_angle: f32,
    /// Unit direction of the slope in the XZ plane.
    pub slope_dir: Vec2,
}

impl Default for VoxelData {
    fn default() -> Self {
        Self {
            is_solid: false,
            slope_angle: 0.0,
            slope_dir: Vec2::ZERO,
        }
    }
}

/// Dense row-major voxel grid over the stage volume.
///
/// Linear layout is `y * (width * depth) + z * width + x`. All world-space
/// conversions use the single uniform [`cell_size`](Self::cell_size).
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxelField {
    grid_size: IVec3,
    world_origin: Vec3,
    cell_size: f32,
    voxels: Vec<VoxelData>,
    /// Incremented on every rebuild, for cache invalidation downstream.
    generation: u64,
}

impl VoxelField {
    /// Voxelizes the stage geometry into a fresh field.
    ///
    /// Returns an error for a degenerate grid configuration; callers keep
    /// their previous field in that case.
    pub fn build(
        stage: &(impl StageGeometry + ?Sized),
        settings: &GridSettings,
    ) -> Result<Self, FieldError> {
        settings.validate()?;

        let gs = settings.grid_size;
        let cell = settings.cell_size();
        let half = Vec3::splat(cell * 0.5);
        let mut voxels = Vec::with_capacity((gs.x * gs.y * gs.z) as usize);

        for y in 0..gs.y {
            for z in 0..gs.z {
                for x in 0..gs.x {
                    let center = settings.world_origin
                        + (IVec3::new(x, y, z).as_vec3() + Vec3::splat(0.5)) * cell;
                    let is_solid = stage.overlaps_box(settings.stage_mask, center, half);
                    let slope = stage.slope_at(center);
                    voxels.push(VoxelData {
                        is_solid,
                        slope_angle: slope.angle_deg,
                        slope_dir: slope.dir,
                    });
                }
            }
        }

        Ok(Self {
            grid_size: gs,
            world_origin: settings.world_origin,
            cell_size: cell,
            voxels,
            generation: 0,
        })
    }

    #[inline]
    pub fn grid_size(&self) -> IVec3 {
        self.grid_size
    }

    #[inline]
    pub fn world_origin(&self) -> Vec3 {
        self.world_origin
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// World-space extent actually covered by the voxel lattice. Can exceed
    /// the configured world size on axes with a smaller per-axis ratio.
    pub fn world_extent(&self) -> Vec3 {
        self.grid_size.as_vec3() * self.cell_size
    }

    /// Length of the lattice diagonal, the longest distance a wavefront can
    /// travel inside the field.
    pub fn max_traversal(&self) -> f32 {
        self.world_extent().length()
    }

    /// Clamps a coordinate onto the grid. The grid must be non-empty.
    #[inline]
    pub fn clamp(&self, coord: IVec3) -> IVec3 {
        coord.clamp(IVec3::ZERO, self.grid_size - IVec3::ONE)
    }

    #[inline]
    pub fn contains(&self, coord: IVec3) -> bool {
        coord.cmpge(IVec3::ZERO).all() && coord.cmplt(self.grid_size).all()
    }

    /// Linear index of an in-bounds coordinate.
    #[inline]
    pub fn index(&self, coord: IVec3) -> usize {
        debug_assert!(self.contains(coord), "voxel coordinate out of bounds");
        (coord.y * self.grid_size.x * self.grid_size.z + coord.z * self.grid_size.x + coord.x)
            as usize
    }

    /// Voxel data at a coordinate, clamped onto the grid.
    #[inline]
    pub fn voxel(&self, coord: IVec3) -> &VoxelData {
        &self.voxels[self.index(self.clamp(coord))]
    }

    /// Nearest voxel coordinate for a world position, clamped onto the grid.
    pub fn world_to_voxel(&self, world_pos: Vec3) -> IVec3 {
        let rel = (world_pos - self.world_origin) / self.cell_size;
        self.clamp(IVec3::new(
            rel.x.floor() as i32,
            rel.y.floor() as i32,
            rel.z.floor() as i32,
        ))
    }

    /// World-space center of a voxel.
    pub fn voxel_center(&self, coord: IVec3) -> Vec3 {
        self.world_origin + (coord.as_vec3() + Vec3::splat(0.5)) * self.cell_size
    }

    /// Voxels of the `(x, z)` column from bottom to top.
    pub fn column(&self, x: i32, z: i32) -> impl Iterator<Item = (i32, &VoxelData)> {
        (0..self.grid_size.y).map(move |y| (y, &self.voxels[self.index(IVec3::new(x, y, z))]))
    }

    /// Raw voxel storage in linear layout order.
    pub fn voxels(&self) -> &[VoxelData] {
        &self.voxels
    }

    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid).count()
    }
}

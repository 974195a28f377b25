//! Procedural demo stage.
//!
//! A Perlin heightfield terrain with an authored ramp strip. The ramp
//! carries slope metadata so the height sampler's in-cell shape offset is
//! exercised; everywhere else the terrain is tagged flat and relies on
//! voxel resolution alone.

use bevy::math::{Vec2, Vec3};
use noiz::prelude::*;
use wavefield::{SlopeSample, StageGeometry, StageMask};

/// Layer the terrain collides on.
pub const TERRAIN_LAYER: StageMask = StageMask::layer(0);

const RAMP_ANGLE_DEG: f32 = 15.0;
const NOISE_SCALE: f32 = 0.08;

pub struct DemoStage {
    origin: Vec3,
    size: Vec3,
    base_height: f32,
    relief: f32,
    ramp_start: f32,
    ramp_end: f32,
    perlin: Noise<common_noise::Perlin>,
}

impl DemoStage {
    pub fn generate(seed: u32, origin: Vec3, size: Vec3) -> Self {
        let mut perlin = Noise::<common_noise::Perlin>::default();
        perlin.set_seed(seed);

        let ramp_start = origin.x + size.x * 0.625;
        Self {
            origin,
            size,
            base_height: origin.y + size.y * 0.25,
            relief: size.y * 0.125,
            ramp_start,
            ramp_end: ramp_start + size.x * 0.25,
            perlin,
        }
    }

    fn in_ramp(&self, x: f32) -> bool {
        x >= self.ramp_start && x < self.ramp_end
    }

    fn in_bounds(&self, x: f32, z: f32) -> bool {
        x >= self.origin.x
            && x <= self.origin.x + self.size.x
            && z >= self.origin.z
            && z <= self.origin.z + self.size.z
    }

    /// Terrain surface height at an XZ position.
    pub fn surface_height(&self, x: f32, z: f32) -> f32 {
        if self.in_ramp(x) {
            self.base_height + (x - self.ramp_start) * RAMP_ANGLE_DEG.to_radians().tan()
        } else {
            let sample = self
                .perlin
                .sample_for::<f32>(Vec2::new(x, z) * NOISE_SCALE);
            self.base_height + sample * self.relief
        }
    }

    /// Highest surface point anywhere on the stage, for placing emitters.
    pub fn ceiling(&self) -> f32 {
        let ramp_top =
            self.base_height + (self.ramp_end - self.ramp_start) * RAMP_ANGLE_DEG.to_radians().tan();
        ramp_top.max(self.base_height + self.relief)
    }
}

impl StageGeometry for DemoStage {
    fn overlaps_box(&self, mask: StageMask, center: Vec3, half_extents: Vec3) -> bool {
        mask.intersects(TERRAIN_LAYER)
            && self.in_bounds(center.x, center.z)
            && center.y - half_extents.y <= self.surface_height(center.x, center.z)
    }

    fn probe_down(&self, mask: StageMask, origin: Vec3, range: f32) -> Option<Vec3> {
        if !mask.intersects(TERRAIN_LAYER) || !self.in_bounds(origin.x, origin.z) {
            return None;
        }
        let height = self.surface_height(origin.x, origin.z);
        (origin.y >= height && origin.y - range <= height)
            .then(|| Vec3::new(origin.x, height, origin.z))
    }

    fn slope_at(&self, center: Vec3) -> SlopeSample {
        if self.in_ramp(center.x) {
            SlopeSample::new(RAMP_ANGLE_DEG, Vec2::X)
        } else {
            SlopeSample::FLAT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_stage() -> DemoStage {
        DemoStage::generate(7, Vec3::ZERO, Vec3::new(32.0, 16.0, 32.0))
    }

    #[test]
    fn test_ground_is_solid_below_the_surface() {
        let stage = demo_stage();
        let surface = stage.surface_height(4.0, 4.0);
        let below = Vec3::new(4.0, surface - 1.0, 4.0);
        let above = Vec3::new(4.0, surface + 1.0, 4.0);
        let half = Vec3::splat(0.5);
        assert!(stage.overlaps_box(TERRAIN_LAYER, below, half));
        assert!(!stage.overlaps_box(TERRAIN_LAYER, above, half));
    }

    #[test]
    fn test_probe_lands_on_the_surface() {
        let stage = demo_stage();
        let hit = stage
            .probe_down(TERRAIN_LAYER, Vec3::new(4.0, stage.ceiling() + 1.0, 4.0), 10.0)
            .unwrap();
        assert!((hit.y - stage.surface_height(4.0, 4.0)).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_layer_sees_no_geometry() {
        let stage = demo_stage();
        let props = StageMask::layer(5);
        assert!(!stage.overlaps_box(props, Vec3::new(4.0, 1.0, 4.0), Vec3::splat(0.5)));
        assert!(stage
            .probe_down(props, Vec3::new(4.0, 10.0, 4.0), 20.0)
            .is_none());
    }

    #[test]
    fn test_ramp_strip_carries_slope_metadata() {
        let stage = demo_stage();
        let on_ramp = stage.slope_at(Vec3::new(21.0, 4.0, 8.0));
        let off_ramp = stage.slope_at(Vec3::new(4.0, 4.0, 8.0));
        assert_eq!(on_ramp.angle_deg, RAMP_ANGLE_DEG);
        assert_eq!(on_ramp.dir, Vec2::X);
        assert_eq!(off_ramp.angle_deg, 0.0);
    }

    #[test]
    fn test_ramp_rises_along_x() {
        let stage = demo_stage();
        let low = stage.surface_height(20.5, 8.0);
        let high = stage.surface_height(27.5, 8.0);
        assert!(high > low);
    }
}

//! Surface height reconstruction.
//!
//! `sample_height` is a pure function over an immutable field snapshot and
//! wave list: no allocation, no locks, no side effects. It is safe to call
//! concurrently from rendering, foot placement, and buoyancy queries as long
//! as the snapshot it reads is not mutated mid-call.
//!
//! The height of a column is the best candidate over its solid voxels, each
//! candidate combining the voxel base height, the slope ramp within the cell,
//! and the interference of all live waves at the query point.

use bevy::math::Vec3;

use super::event::{WaveEvent, WaveGroup};
use crate::grid::{VoxelData, VoxelField};

/// Samples the surface height at a world position.
///
/// Returns `None` when the column holds no solid voxel; there is no ground
/// there, which is not the same thing as a height of zero.
pub fn sample_height(
    world_pos: Vec3,
    now: f32,
    field: &VoxelField,
    waves: &[WaveEvent],
) -> Option<f32> {
    if field.is_empty() {
        return None;
    }

    let cell = field.cell_size();
    let rel = world_pos - field.world_origin();
    let grid_size = field.grid_size();
    let x = ((rel.x / cell).floor() as i32).clamp(0, grid_size.x - 1);
    let z = ((rel.z / cell).floor() as i32).clamp(0, grid_size.z - 1);

    // Fractional position inside the column's cell, for the slope ramp.
    let lx = rel.x / cell - x as f32;
    let lz = rel.z / cell - z as f32;

    // Wave interference depends only on the query point, not the voxel.
    let wave = wave_offset(world_pos, now, waves);
    let origin_y = field.world_origin().y;

    let mut best: Option<f32> = None;
    for (y, voxel) in field.column(x, z) {
        if !voxel.is_solid {
            continue;
        }
        let candidate = origin_y + y as f32 * cell + shape_offset(voxel, lx, lz, cell) + wave;
        best = Some(best.map_or(candidate, |b: f32| b.max(candidate)));
    }
    best
}

/// Slope-derived height offset inside one cell.
///
/// Projects the fractional in-cell offset onto the slope direction, clamps
/// the projection to the cell, and applies the slope's tangent. Reproduces a
/// linear ramp across the cell in the slope's direction.
pub fn shape_offset(voxel: &VoxelData, lx: f32, lz: f32, cell_size: f32) -> f32 {
    if voxel.slope_angle <= 0.0 {
        return 0.0;
    }
    let proj = (lx * voxel.slope_dir.x + lz * voxel.slope_dir.y).clamp(0.0, 1.0) * cell_size;
    proj * voxel.slope_angle.to_radians().tan()
}

/// Combined wave height at a point.
///
/// Contributions are summed per group. When both groups reach the point the
/// combined offset is exactly zero, whatever the magnitudes; the cancellation
/// is binary, not a blend. A group counts as present as soon as one of its
/// fronts has reached the point, even at a zero crossing of its sine.
pub fn wave_offset(world_pos: Vec3, now: f32, waves: &[WaveEvent]) -> f32 {
    let mut sum_alpha = 0.0;
    let mut sum_beta = 0.0;
    let mut has_alpha = false;
    let mut has_beta = false;

    for wave in waves {
        if !wave.reaches(world_pos, now) {
            continue;
        }
        let contribution = wave.contribution(world_pos, now);
        match wave.group {
            WaveGroup::Alpha => {
                has_alpha = true;
                sum_alpha += contribution;
            }
            WaveGroup::Beta => {
                has_beta = true;
                sum_beta += contribution;
            }
        }
    }

    if has_alpha && has_beta {
        0.0
    } else {
        sum_alpha + sum_beta
    }
}

/// Distance-above-ground helper for gameplay queries: height of the sample
/// point over the sampled surface, when there is one.
pub fn height_above_surface(
    world_pos: Vec3,
    now: f32,
    field: &VoxelField,
    waves: &[WaveEvent],
) -> Option<f32> {
    sample_height(world_pos, now, field, waves).map(|surface| world_pos.y - surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{SlopeSample, StageGeometry, StageMask};
    use crate::settings::GridSettings;
    use bevy::math::{IVec3, Vec2};

    /// Solid floor below `top`, with an optional uniform slope tag.
    struct Floor {
        top: f32,
        slope: SlopeSample,
    }

    impl Floor {
        fn flat(top: f32) -> Self {
            Self {
                top,
                slope: SlopeSample::FLAT,
            }
        }
    }

    impl StageGeometry for Floor {
        fn overlaps_box(&self, _mask: StageMask, center: Vec3, half_extents: Vec3) -> bool {
            center.y - half_extents.y <= self.top
        }

        fn probe_down(&self, _mask: StageMask, origin: Vec3, range: f32) -> Option<Vec3> {
            (origin.y >= self.top && origin.y - range <= self.top)
                .then(|| Vec3::new(origin.x, self.top, origin.z))
        }

        fn slope_at(&self, _center: Vec3) -> SlopeSample {
            self.slope
        }
    }

    /// No solid geometry anywhere.
    struct Void;

    impl StageGeometry for Void {
        fn overlaps_box(&self, _mask: StageMask, _center: Vec3, _half: Vec3) -> bool {
            false
        }

        fn probe_down(&self, _mask: StageMask, _origin: Vec3, _range: f32) -> Option<Vec3> {
            None
        }
    }

    fn flat_4x1x4() -> VoxelField {
        let settings = GridSettings {
            world_size: Vec3::new(4.0, 1.0, 4.0),
            grid_size: IVec3::new(4, 1, 4),
            ..Default::default()
        };
        VoxelField::build(&Floor::flat(0.5), &settings).unwrap()
    }

    fn ripple(origin: Vec3, group: WaveGroup) -> WaveEvent {
        WaveEvent {
            origin,
            start_time: 0.0,
            speed: 1.0,
            wavelength: 2.0,
            amplitude: 1.0,
            damping: 0.0,
            hide_delay: 1.0,
            group,
            degraded: false,
        }
    }

    #[test]
    fn test_expanding_front_scenario() {
        let field = flat_4x1x4();
        let wave = ripple(Vec3::ZERO, WaveGroup::Alpha);
        let sample_pos = Vec3::new(2.0, 0.0, 0.0);

        // Front exactly at the sample point: phase zero, flat floor.
        let at_front = sample_height(sample_pos, 2.0, &field, &[wave]).unwrap();
        assert!(at_front.abs() < 1e-5, "expected ~0, got {at_front}");

        // Quarter wavelength behind the front: full crest.
        let crest = sample_height(sample_pos, 2.5, &field, &[wave]).unwrap();
        assert!((crest - 1.0).abs() < 1e-5, "expected ~1, got {crest}");
    }

    #[test]
    fn test_wave_is_silent_until_the_front_arrives() {
        let wave = ripple(Vec3::ZERO, WaveGroup::Alpha);
        let point = Vec3::new(3.0, 0.0, 0.0);

        assert_eq!(wave_offset(point, 1.0, &[wave]), 0.0);
        assert_eq!(wave_offset(point, 2.9, &[wave]), 0.0);
        assert!(wave_offset(point, 3.5, &[wave]).abs() > 1e-3);
    }

    #[test]
    fn test_cross_group_overlap_cancels_exactly() {
        let alpha = ripple(Vec3::ZERO, WaveGroup::Alpha);
        let beta = ripple(Vec3::new(0.5, 0.0, 0.0), WaveGroup::Beta);
        let point = Vec3::new(1.0, 0.0, 0.0);

        // Both fronts have passed the point; amplitudes are irrelevant.
        let offset = wave_offset(point, 5.25, &[alpha, beta]);
        assert_eq!(offset, 0.0);

        // Cancellation also applies when one side sits on a zero crossing.
        let offset = wave_offset(Vec3::new(2.0, 0.0, 0.0), 2.0, &[alpha, beta]);
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn test_same_group_waves_add_linearly() {
        let first = ripple(Vec3::ZERO, WaveGroup::Alpha);
        let second = ripple(Vec3::new(1.0, 0.0, 0.0), WaveGroup::Alpha);
        let point = Vec3::new(1.5, 0.0, 0.5);
        let now = 4.25;

        let combined = wave_offset(point, now, &[first, second]);
        let expected = first.contribution(point, now) + second.contribution(point, now);
        assert!((combined - expected).abs() < 1e-6);
    }

    #[test]
    fn test_column_without_ground_returns_none() {
        let settings = GridSettings {
            world_size: Vec3::new(4.0, 1.0, 4.0),
            grid_size: IVec3::new(4, 1, 4),
            ..Default::default()
        };
        let field = VoxelField::build(&Void, &settings).unwrap();
        assert_eq!(sample_height(Vec3::new(2.0, 0.0, 2.0), 0.0, &field, &[]), None);
    }

    #[test]
    fn test_slope_ramps_linearly_across_the_cell() {
        let settings = GridSettings {
            world_size: Vec3::new(2.0, 1.0, 2.0),
            grid_size: IVec3::new(2, 1, 2),
            ..Default::default()
        };
        let stage = Floor {
            top: 0.5,
            slope: SlopeSample::new(45.0, Vec2::X),
        };
        let field = VoxelField::build(&stage, &settings).unwrap();

        // A 45 degree ramp along +X raises the surface by the local x offset.
        let low = sample_height(Vec3::new(0.1, 0.0, 0.5), 0.0, &field, &[]).unwrap();
        let high = sample_height(Vec3::new(0.9, 0.0, 0.5), 0.0, &field, &[]).unwrap();
        assert!((low - 0.1).abs() < 1e-5);
        assert!((high - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_positions_clamp_to_the_border_column() {
        let field = flat_4x1x4();
        let inside = sample_height(Vec3::new(3.9, 0.0, 3.9), 0.0, &field, &[]);
        let outside = sample_height(Vec3::new(100.0, 0.0, 100.0), 0.0, &field, &[]);
        assert!(inside.is_some());
        // Far outside the grid, the wave-free flat floor reads the same as
        // the border column it clamps to.
        assert_eq!(outside, Some(0.0));
    }

    #[test]
    fn test_height_above_surface() {
        let field = flat_4x1x4();
        let above = height_above_surface(Vec3::new(2.0, 1.5, 2.0), 0.0, &field, &[]).unwrap();
        assert!((above - 1.5).abs() < 1e-6);
    }
}

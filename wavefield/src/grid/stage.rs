//! Interface to the scene's collidable stage geometry.
//!
//! The wave system never owns scene geometry. Voxelization, emission probing
//! and slope authoring data all go through [`StageGeometry`], implemented by
//! the embedding application (a physics scene, a test fixture, a procedural
//! stage).

use bevy::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Collision-layer selector for stage geometry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMask(pub u32);

impl StageMask {
    pub const ALL: StageMask = StageMask(u32::MAX);
    pub const NONE: StageMask = StageMask(0);

    /// Mask selecting a single layer by index.
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    #[inline]
    pub fn intersects(&self, other: StageMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for StageMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Slope metadata attached to a voxel by authoring data.
///
/// `angle_deg` of zero means flat; `dir` is the downhill-to-uphill direction
/// of the ramp in the XZ plane.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlopeSample {
    pub angle_deg: f32,
    pub dir: Vec2,
}

impl SlopeSample {
    pub const FLAT: SlopeSample = SlopeSample {
        angle_deg: 0.0,
        dir: Vec2::ZERO,
    };

    pub fn new(angle_deg: f32, dir: Vec2) -> Self {
        Self {
            angle_deg,
            dir: dir.normalize_or_zero(),
        }
    }
}

/// Stage geometry collaborator.
pub trait StageGeometry {
    /// Volumetric overlap test against collidable geometry on `mask`.
    fn overlaps_box(&self, mask: StageMask, center: Vec3, half_extents: Vec3) -> bool;

    /// Short downward probe. Returns the surface point when one lies within
    /// `range` below `origin`.
    fn probe_down(&self, mask: StageMask, origin: Vec3, range: f32) -> Option<Vec3>;

    /// Slope authoring data at a voxel center. Flat when unspecified.
    fn slope_at(&self, _center: Vec3) -> SlopeSample {
        SlopeSample::FLAT
    }
}

use bevy::math::IVec3;

pub const TICKS_PER_SECOND: u64 = 20;

/// Distance assigned to voxels the relaxation has not reached yet.
/// Large and finite so the buffer stays serializable and renderable.
pub const DISTANCE_UNREACHED: f32 = 1.0e9;

/// Height published for columns with no solid voxel.
pub const HEIGHT_NO_GROUND: f32 = -1.0e9;

/// Upward offset of the emission probe start point, in world units.
pub const EMIT_PROBE_HEIGHT: f32 = 1.0;

/// Downward range of the emission probe, in world units.
pub const EMIT_PROBE_RANGE: f32 = 5.0;

/// Maximum number of wave entries published to the render bindings.
pub const MAX_GPU_WAVES: usize = 16;

pub const SIX_OFFSETS: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

//! Voxel occupancy grid and the distance field relaxed over it.

pub mod distance;
pub mod field;
pub mod stage;

pub use distance::DistanceField;
pub use field::{VoxelData, VoxelField};
pub use stage::{SlopeSample, StageGeometry, StageMask};

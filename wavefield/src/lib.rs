//! Voxel wave propagation and surface height sampling.
//!
//! The stage volume is voxelized into a dense occupancy grid. Ripple events
//! expand outward from their emission point; an iterative relaxation computes
//! an approximate distance field from the active emission anchors, and a pure
//! sampler reconstructs the surface height at arbitrary world positions from
//! the occupancy grid, slope metadata, and the live wave list.
//!
//! Scene geometry, rendering, and input are external collaborators: they
//! implement [`StageGeometry`], send [`EmitWave`] events, and consume the
//! published [`FieldSnapshot`] and [`bindings::FieldBuffers`].

pub mod bindings;
pub mod constants;
pub mod error;
pub mod grid;
pub mod parallel;
pub mod plugin;
pub mod sets;
pub mod settings;
pub mod wave;

pub use constants::*;
pub use error::FieldError;
pub use grid::{DistanceField, SlopeSample, StageGeometry, StageMask, VoxelData, VoxelField};
pub use plugin::{EmitWave, FieldSnapshot, RebuildStage, SceneStage, VoxelWavePlugin};
pub use sets::WaveUpdateSet;
pub use settings::{GridSettings, WaveSettings};
pub use wave::{sample_height, wave_offset, WaveEmitter, WaveEvent, WaveGroup};

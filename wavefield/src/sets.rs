use bevy::prelude::*;

/// Fixed-order partition of the per-tick wave pipeline.
///
/// Stage refresh happens before wave intake so a rebuilt field is visible to
/// this tick's emissions; expiry runs before relaxation so expired anchors
/// never seed the distance field; publication always sees the relaxed state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WaveUpdateSet {
    StageRefresh,
    WaveInput,
    Relax,
    Publish,
}

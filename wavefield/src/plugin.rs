//! ECS integration of the wave pipeline.
//!
//! Each fixed tick runs the pipeline in a fixed order (see
//! [`WaveUpdateSet`]): stage refresh, wave intake and expiry, distance
//! relaxation, publication. Publication rebuilds the immutable
//! [`FieldSnapshot`], which is what concurrent height queries should read;
//! everything a query needs lives behind cheap shared handles, so a snapshot
//! clone taken by a render or physics job stays valid for the whole tick.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_log::{debug, info, warn};

use crate::bindings::FieldBuffers;
use crate::constants::DISTANCE_UNREACHED;
use crate::grid::{DistanceField, StageGeometry, VoxelField};
use crate::sets::WaveUpdateSet;
use crate::settings::{GridSettings, WaveSettings};
use crate::wave::{sampler, WaveEmitter, WaveEvent, WaveGroup};

/// The scene's stage geometry, supplied by the embedding application.
#[derive(Resource)]
pub struct SceneStage(pub Box<dyn StageGeometry + Send + Sync>);

/// Request to spawn a ripple at a world position.
#[derive(Event, Debug, Clone)]
pub struct EmitWave {
    pub position: Vec3,
    pub group: WaveGroup,
}

/// Request to re-voxelize the stage, sent after stage geometry changed.
#[derive(Event, Debug, Clone, Default)]
pub struct RebuildStage;

/// Immutable per-tick view for height and distance queries.
///
/// Published at the end of every tick, after expiry and relaxation, so
/// samples never observe a half-updated wave list or field.
#[derive(Resource, Clone, Default)]
pub struct FieldSnapshot {
    pub field: Arc<VoxelField>,
    pub waves: Arc<Vec<WaveEvent>>,
    pub distance: Arc<Vec<f32>>,
    pub time: f32,
}

impl FieldSnapshot {
    /// Surface height at a world position, `None` where there is no ground.
    pub fn sample_height(&self, world_pos: Vec3) -> Option<f32> {
        sampler::sample_height(world_pos, self.time, &self.field, &self.waves)
    }

    /// Relaxed distance at a voxel coordinate, clamped onto the grid.
    pub fn sample_distance(&self, coord: IVec3) -> f32 {
        if self.field.is_empty() || self.distance.is_empty() {
            return DISTANCE_UNREACHED;
        }
        self.distance[self.field.index(self.field.clamp(coord))]
    }
}

pub struct VoxelWavePlugin;

impl Plugin for VoxelWavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridSettings>()
            .init_resource::<WaveSettings>()
            .init_resource::<VoxelField>()
            .init_resource::<DistanceField>()
            .init_resource::<WaveEmitter>()
            .init_resource::<FieldBuffers>()
            .init_resource::<FieldSnapshot>()
            .add_event::<EmitWave>()
            .add_event::<RebuildStage>()
            .configure_sets(
                FixedUpdate,
                (
                    WaveUpdateSet::StageRefresh,
                    WaveUpdateSet::WaveInput,
                    WaveUpdateSet::Relax,
                    WaveUpdateSet::Publish,
                )
                    .chain(),
            )
            .add_systems(Startup, build_stage_field)
            .add_systems(
                FixedUpdate,
                refresh_stage_field.in_set(WaveUpdateSet::StageRefresh),
            )
            .add_systems(
                FixedUpdate,
                (collect_wave_input, expire_waves)
                    .chain()
                    .in_set(WaveUpdateSet::WaveInput),
            )
            .add_systems(
                FixedUpdate,
                relax_distance_field.in_set(WaveUpdateSet::Relax),
            )
            .add_systems(
                FixedUpdate,
                publish_field_outputs.in_set(WaveUpdateSet::Publish),
            );
    }
}

/// Replaces the voxel field from stage geometry. On a configuration error
/// the previous field is kept and the failure is logged, not raised.
fn rebuild_field(
    stage: &SceneStage,
    settings: &GridSettings,
    field: &mut VoxelField,
    distance: &mut DistanceField,
) {
    match VoxelField::build(stage.0.as_ref(), settings) {
        Ok(mut built) => {
            built.set_generation(field.generation() + 1);
            *field = built;
            distance.resize_for(field);
            info!(
                "voxelized stage: {}/{} solid voxels, cell size {}",
                field.solid_count(),
                field.voxel_count(),
                field.cell_size()
            );
        }
        Err(err) => {
            warn!("stage voxelization skipped, keeping previous field: {err}");
        }
    }
}

fn build_stage_field(
    stage: Option<Res<SceneStage>>,
    settings: Res<GridSettings>,
    mut field: ResMut<VoxelField>,
    mut distance: ResMut<DistanceField>,
) {
    let Some(stage) = stage else {
        warn!("no SceneStage resource, the stage field stays empty");
        return;
    };
    rebuild_field(&stage, &settings, &mut field, &mut distance);
}

fn refresh_stage_field(
    mut requests: EventReader<RebuildStage>,
    stage: Option<Res<SceneStage>>,
    settings: Res<GridSettings>,
    mut field: ResMut<VoxelField>,
    mut distance: ResMut<DistanceField>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    let Some(stage) = stage else {
        return;
    };
    rebuild_field(&stage, &settings, &mut field, &mut distance);
}

fn collect_wave_input(
    mut requests: EventReader<EmitWave>,
    stage: Option<Res<SceneStage>>,
    grid_settings: Res<GridSettings>,
    wave_settings: Res<WaveSettings>,
    mut emitter: ResMut<WaveEmitter>,
    time: Res<Time>,
) {
    if requests.is_empty() {
        return;
    }
    let Some(stage) = stage else {
        requests.clear();
        return;
    };
    if let Err(err) = wave_settings.validate() {
        warn!("dropping {} emission requests: {err}", requests.len());
        requests.clear();
        return;
    }

    let now = time.elapsed_secs();
    for request in requests.read() {
        let event = emitter.emit(
            stage.0.as_ref(),
            grid_settings.stage_mask,
            request.position,
            request.group,
            now,
            &wave_settings,
        );
        debug!("ripple {:?} emitted at {}", event.group, event.origin);
    }
}

fn expire_waves(mut emitter: ResMut<WaveEmitter>, field: Res<VoxelField>, time: Res<Time>) {
    let removed = emitter.tick(time.elapsed_secs(), field.max_traversal());
    if removed > 0 {
        debug!("{removed} ripple(s) expired, {} live", emitter.len());
    }
}

fn relax_distance_field(
    field: Res<VoxelField>,
    mut distance: ResMut<DistanceField>,
    emitter: Res<WaveEmitter>,
    settings: Res<GridSettings>,
) {
    if field.is_empty() {
        return;
    }
    distance.resize_for(&field);

    let seeds = emitter.seed_anchors(&field);
    distance.init(&seeds);
    if seeds.is_empty() {
        return;
    }
    distance.relax(settings.bfs_passes);

    if let Some(pos) = emitter.last_emit() {
        let anchor = field.world_to_voxel(pos);
        debug!("distance sample at {anchor:?} = {}", distance.sample(anchor));
    }
}

fn publish_field_outputs(
    field: Res<VoxelField>,
    distance: Res<DistanceField>,
    emitter: Res<WaveEmitter>,
    grid_settings: Res<GridSettings>,
    wave_settings: Res<WaveSettings>,
    mut buffers: ResMut<FieldBuffers>,
    mut snapshot: ResMut<FieldSnapshot>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    buffers.refresh(
        &field,
        &distance,
        &emitter,
        &grid_settings,
        &wave_settings,
        now,
    );

    // The field only changes on rebuild; reuse the shared handle otherwise.
    if snapshot.field.generation() != field.generation() {
        snapshot.field = Arc::new(field.clone());
    }
    snapshot.waves = Arc::new(emitter.events().to_vec());
    snapshot.distance = Arc::new(distance.values().to_vec());
    snapshot.time = now;
}

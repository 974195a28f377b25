//! Scripted ripple emission and query logging.
//!
//! Stands in for gameplay input and its consumers: ripples spawn on a timer
//! at random stage positions, alternating interference groups, and a probe
//! logger plays the part of foot placement and buoyancy queries against the
//! published snapshot.

use bevy::prelude::*;
use bevy_ecs::resource::Resource;
use bevy_log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use wavefield::{EmitWave, FieldSnapshot, GridSettings, WaveGroup};

/// Vertical clearance of the foot targets above the sampled surface.
const FOOT_BASE_OFFSET: f32 = 0.1;

#[derive(Resource, Debug)]
pub struct DemoScript {
    pub emit_period: f32,
    /// Seconds before the app exits, zero to run until interrupted.
    pub duration: f32,
    next_emit: f32,
    next_log: f32,
    next_group: WaveGroup,
    rng: StdRng,
}

impl DemoScript {
    pub fn new(seed: u64, emit_period: f32, duration: f32) -> Self {
        Self {
            emit_period,
            duration,
            next_emit: 0.0,
            next_log: 0.0,
            next_group: WaveGroup::Alpha,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Emits a ripple on the script's cadence, alternating groups so the
/// cross-group cancellation shows up in the probe log.
pub fn spawn_ripples(
    mut script: ResMut<DemoScript>,
    settings: Res<GridSettings>,
    time: Res<Time>,
    mut requests: EventWriter<EmitWave>,
) {
    let now = time.elapsed_secs();
    if now < script.next_emit {
        return;
    }
    script.next_emit = now + script.emit_period;

    let origin = settings.world_origin;
    let size = settings.world_size;
    let x = origin.x + script.rng.gen_range(0.1..0.9) * size.x;
    let z = origin.z + script.rng.gen_range(0.1..0.9) * size.z;
    // Just above the tallest terrain so the downward probe lands on the
    // surface instead of flagging the event degraded.
    let position = Vec3::new(x, origin.y + size.y * 0.375, z);

    let group = script.next_group;
    script.next_group = match group {
        WaveGroup::Alpha => WaveGroup::Beta,
        WaveGroup::Beta => WaveGroup::Alpha,
    };

    info!("emitting {group:?} ripple above ({x:.1}, {z:.1})");
    requests.write(EmitWave { position, group });
}

/// Samples the published snapshot the way gameplay consumers would and logs
/// the results once a second.
pub fn log_probes(
    mut script: ResMut<DemoScript>,
    snapshot: Res<FieldSnapshot>,
    settings: Res<GridSettings>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    if now < script.next_log || snapshot.field.is_empty() {
        return;
    }
    script.next_log = now + 1.0;

    let center = settings.world_origin + settings.world_size * 0.5;
    for (label, offset) in [("left foot", -0.3), ("right foot", 0.3)] {
        let probe = Vec3::new(center.x + offset, center.y, center.z);
        match snapshot.sample_height(probe) {
            Some(height) => {
                info!("{label} target y = {:.3}", height + FOOT_BASE_OFFSET);
            }
            None => info!("{label}: no ground"),
        }
    }

    let anchor = snapshot.field.world_to_voxel(center);
    info!(
        "distance at {anchor:?} = {:.2}, {} live wave(s)",
        snapshot.sample_distance(anchor),
        snapshot.waves.len()
    );
}

pub fn exit_after_duration(
    script: Res<DemoScript>,
    time: Res<Time>,
    mut exit: EventWriter<AppExit>,
) {
    if script.duration > 0.0 && time.elapsed_secs() >= script.duration {
        info!("sandbox finished after {:.1}s", time.elapsed_secs());
        exit.write(AppExit::Success);
    }
}

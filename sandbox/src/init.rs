//! App construction for the sandbox runner.

use std::time::Duration;

use bevy::prelude::*;
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{info, LogPlugin};
use wavefield::{SceneStage, VoxelWavePlugin, WaveUpdateSet, TICKS_PER_SECOND};

use crate::config::SandboxSettings;
use crate::ripples::{self, DemoScript};
use crate::stage::DemoStage;

pub fn run(settings: SandboxSettings, seed: u32, emit_period: f32, duration: f32) {
    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / TICKS_PER_SECOND as f64,
        ))),
    );
    app.add_plugins(LogPlugin::default());

    let stage = DemoStage::generate(seed, settings.grid.world_origin, settings.grid.world_size);
    info!(
        "generated demo stage, surface ceiling {:.1}",
        stage.ceiling()
    );

    app.insert_resource(settings.grid);
    app.insert_resource(settings.waves);
    app.insert_resource(SceneStage(Box::new(stage)));
    app.insert_resource(DemoScript::new(u64::from(seed), emit_period, duration));
    app.add_plugins(VoxelWavePlugin);

    app.add_systems(
        FixedUpdate,
        ripples::spawn_ripples.before(WaveUpdateSet::StageRefresh),
    );
    app.add_systems(
        FixedUpdate,
        (ripples::log_probes, ripples::exit_after_duration).after(WaveUpdateSet::Publish),
    );

    app.run();
}

//! Wave emission and expiry.

use bevy::math::{IVec3, Vec3};
use bevy_ecs::resource::Resource;
use bevy_log::warn;

use super::event::{WaveEvent, WaveGroup};
use crate::constants::{EMIT_PROBE_HEIGHT, EMIT_PROBE_RANGE};
use crate::grid::{StageGeometry, StageMask, VoxelField};
use crate::settings::WaveSettings;

/// Ordered list of in-flight ripples.
///
/// Events are appended on emission and removed on expiry; nothing mutates an
/// event in between, and overlapping events are never merged.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaveEmitter {
    events: Vec<WaveEvent>,
    last_emit: Option<Vec3>,
    last_emit_time: f32,
}

impl WaveEmitter {
    /// Records a new ripple at `position`.
    ///
    /// The origin is projected onto the nearest stage surface below the
    /// point first. When no surface lies within probe range the raw position
    /// is kept and the event is flagged degraded rather than dropped.
    pub fn emit(
        &mut self,
        stage: &(impl StageGeometry + ?Sized),
        mask: StageMask,
        position: Vec3,
        group: WaveGroup,
        now: f32,
        settings: &WaveSettings,
    ) -> WaveEvent {
        let probe_start = position + Vec3::Y * EMIT_PROBE_HEIGHT;
        let (origin, degraded) = match stage.probe_down(mask, probe_start, EMIT_PROBE_RANGE) {
            Some(hit) => (hit, false),
            None => {
                warn!("emit: stage surface not found under {position}");
                (position, true)
            }
        };

        let event = WaveEvent {
            origin,
            start_time: now,
            speed: settings.speed,
            wavelength: settings.wavelength,
            amplitude: settings.amplitude,
            damping: settings.damping,
            hide_delay: settings.hide_delay,
            group,
            degraded,
        };
        self.events.push(event);
        self.last_emit = Some(origin);
        self.last_emit_time = now;
        event
    }

    /// Discards events whose front has crossed the whole field and outlived
    /// their grace period. Returns how many were removed.
    pub fn tick(&mut self, now: f32, max_traversal: f32) -> usize {
        let before = self.events.len();
        self.events.retain(|event| !event.expired(now, max_traversal));
        before - self.events.len()
    }

    #[inline]
    pub fn events(&self) -> &[WaveEvent] {
        &self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Origin of the most recent emission, for debug readback and the
    /// wavefront render uniform.
    #[inline]
    pub fn last_emit(&self) -> Option<Vec3> {
        self.last_emit
    }

    #[inline]
    pub fn last_emit_time(&self) -> f32 {
        self.last_emit_time
    }

    /// Voxel anchors of all live events, the seed set for distance
    /// relaxation. Duplicates are harmless to the seeding pass.
    pub fn seed_anchors(&self, field: &VoxelField) -> Vec<IVec3> {
        if field.is_empty() {
            return Vec::new();
        }
        self.events
            .iter()
            .map(|event| field.world_to_voxel(event.origin))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat ground at a fixed height, on layer 0.
    struct Ground {
        height: f32,
    }

    impl StageGeometry for Ground {
        fn overlaps_box(&self, mask: StageMask, center: Vec3, half_extents: Vec3) -> bool {
            mask.intersects(StageMask::layer(0)) && center.y - half_extents.y <= self.height
        }

        fn probe_down(&self, mask: StageMask, origin: Vec3, range: f32) -> Option<Vec3> {
            if mask.intersects(StageMask::layer(0))
                && origin.y >= self.height
                && origin.y - range <= self.height
            {
                Some(Vec3::new(origin.x, self.height, origin.z))
            } else {
                None
            }
        }
    }

    #[test]
    fn test_emit_projects_onto_the_surface_below() {
        let mut emitter = WaveEmitter::default();
        let event = emitter.emit(
            &Ground { height: 2.0 },
            StageMask::ALL,
            Vec3::new(1.0, 3.5, 1.0),
            WaveGroup::Alpha,
            0.0,
            &WaveSettings::default(),
        );
        assert_eq!(event.origin, Vec3::new(1.0, 2.0, 1.0));
        assert!(!event.degraded);
        assert_eq!(emitter.last_emit(), Some(event.origin));
    }

    #[test]
    fn test_emit_without_surface_keeps_raw_position_degraded() {
        let mut emitter = WaveEmitter::default();
        // Ground far below the probe range.
        let event = emitter.emit(
            &Ground { height: -100.0 },
            StageMask::ALL,
            Vec3::new(1.0, 3.5, 1.0),
            WaveGroup::Beta,
            0.0,
            &WaveSettings::default(),
        );
        assert_eq!(event.origin, Vec3::new(1.0, 3.5, 1.0));
        assert!(event.degraded);
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn test_tick_discards_expired_events_permanently() {
        let mut emitter = WaveEmitter::default();
        let settings = WaveSettings {
            speed: 4.0,
            hide_delay: 1.0,
            ..Default::default()
        };
        emitter.emit(
            &Ground { height: 0.0 },
            StageMask::ALL,
            Vec3::ZERO,
            WaveGroup::Alpha,
            0.0,
            &settings,
        );

        // Lifetime for an 8-unit field: 1 + 8/4 + 1 = 4 seconds.
        assert_eq!(emitter.tick(3.9, 8.0), 0);
        assert_eq!(emitter.len(), 1);
        assert_eq!(emitter.tick(4.1, 8.0), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_group_tag_is_preserved() {
        let mut emitter = WaveEmitter::default();
        let ground = Ground { height: 0.0 };
        emitter.emit(
            &ground,
            StageMask::ALL,
            Vec3::ZERO,
            WaveGroup::Alpha,
            0.0,
            &WaveSettings::default(),
        );
        emitter.emit(
            &ground,
            StageMask::ALL,
            Vec3::X,
            WaveGroup::Beta,
            0.5,
            &WaveSettings::default(),
        );
        assert_eq!(emitter.events()[0].group, WaveGroup::Alpha);
        assert_eq!(emitter.events()[1].group, WaveGroup::Beta);
    }
}

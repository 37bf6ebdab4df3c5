//! Quality tiers and automatic downgrade on sustained low frame rate

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use showroom_core::QualityTier;

use crate::messages::QualityDowngraded;
use crate::scene::KeyLight;
use crate::types::ViewerSettings;

/// Extra spotlights used on medium and high tiers
#[derive(Component)]
pub struct QualitySpotLight;

/// Watches the smoothed frame rate for sustained drops
#[derive(Debug, Clone, Resource)]
pub struct FrameRateMonitor {
    /// Below this the frame rate counts as low
    pub threshold: f64,
    /// Seconds the frame rate must stay low before acting
    pub sustain_secs: f32,
    /// Seconds to wait after a change before judging again
    pub cooldown_secs: f32,
    low_for: f32,
    cooldown: f32,
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self {
            threshold: 30.0,
            sustain_secs: 3.0,
            cooldown_secs: 5.0,
            low_for: 0.0,
            cooldown: 5.0,
        }
    }
}

impl FrameRateMonitor {
    /// Feed one sample; true when quality should step down
    pub fn sample(&mut self, fps: f64, dt: f32) -> bool {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
            self.low_for = 0.0;
            return false;
        }
        if fps >= self.threshold {
            self.low_for = 0.0;
            return false;
        }
        self.low_for += dt;
        if self.low_for < self.sustain_secs {
            return false;
        }
        self.restart();
        true
    }

    /// Start a fresh cooldown, e.g. after any quality change
    pub fn restart(&mut self) {
        self.low_for = 0.0;
        self.cooldown = self.cooldown_secs;
    }
}

pub struct QualityPlugin;

impl Plugin for QualityPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }
        app.init_resource::<FrameRateMonitor>()
            .add_systems(Update, (monitor_frame_rate, apply_quality).chain());
    }
}

fn monitor_frame_rate(
    diagnostics: Res<DiagnosticsStore>,
    time: Res<Time>,
    mut monitor: ResMut<FrameRateMonitor>,
    mut settings: ResMut<ViewerSettings>,
    mut downgraded: MessageWriter<QualityDowngraded>,
) {
    if !settings.auto_quality {
        return;
    }
    let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };
    if !monitor.sample(fps, time.delta_secs()) {
        return;
    }
    let from = settings.quality;
    if let Some(to) = from.downgrade() {
        tracing::warn!("Frame rate {:.0} fps, lowering quality {} -> {}", fps, from.as_str(), to.as_str());
        settings.quality = to;
        downgraded.write(QualityDowngraded { from, to });
    }
}

/// Reconfigure antialiasing, shadows and extra lights for the tier
fn apply_quality(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    mut monitor: ResMut<FrameRateMonitor>,
    mut cameras: Query<&mut Msaa, With<Camera>>,
    mut key_lights: Query<&mut DirectionalLight, With<KeyLight>>,
    spot_lights: Query<Entity, With<QualitySpotLight>>,
    mut applied: Local<Option<QualityTier>>,
) {
    let quality = settings.quality;
    if *applied == Some(quality) {
        return;
    }
    tracing::info!("Applying {} quality", quality.as_str());

    let msaa = match quality.msaa_samples() {
        1 => Msaa::Off,
        _ => Msaa::Sample4,
    };
    for mut camera_msaa in cameras.iter_mut() {
        *camera_msaa = msaa;
    }
    for mut light in key_lights.iter_mut() {
        light.shadows_enabled = quality.shadows();
    }

    let has_spots = !spot_lights.is_empty();
    if quality.extra_lights() && !has_spots {
        for (position, intensity) in [(Vec3::new(0.0, 6.0, 4.0), 2_000_000.0), (Vec3::new(0.0, 6.0, -4.0), 1_200_000.0)] {
            commands.spawn((
                SpotLight {
                    intensity,
                    range: 30.0,
                    outer_angle: 0.6,
                    inner_angle: 0.4,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
                QualitySpotLight,
            ));
        }
    } else if !quality.extra_lights() {
        for entity in spot_lights.iter() {
            commands.entity(entity).despawn();
        }
    }

    monitor.restart();
    *applied = Some(quality);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_monitor() -> FrameRateMonitor {
        let mut monitor = FrameRateMonitor::default();
        monitor.cooldown = 0.0;
        monitor
    }

    #[test]
    fn test_brief_drop_is_ignored() {
        let mut monitor = ready_monitor();
        for _ in 0..60 {
            assert!(!monitor.sample(20.0, 1.0 / 60.0));
        }
        // Recovery resets the timer
        assert!(!monitor.sample(60.0, 1.0 / 60.0));
        for _ in 0..120 {
            assert!(!monitor.sample(20.0, 1.0 / 60.0));
        }
    }

    #[test]
    fn test_sustained_drop_triggers_once_then_cools_down() {
        let mut monitor = ready_monitor();
        let mut triggered = 0;
        for _ in 0..(60 * 4) {
            if monitor.sample(15.0, 1.0 / 60.0) {
                triggered += 1;
            }
        }
        assert_eq!(triggered, 1);
    }

    #[test]
    fn test_startup_cooldown() {
        let mut monitor = FrameRateMonitor::default();
        for _ in 0..(60 * 4) {
            assert!(!monitor.sample(5.0, 1.0 / 60.0));
        }
    }
}

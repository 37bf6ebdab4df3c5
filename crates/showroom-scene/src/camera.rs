//! Orbit camera with per-view presets and dolly controls

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use showroom_core::view::CameraPreset;
use showroom_core::ViewMode;

use crate::messages::CameraCommand;
use crate::types::{to_vec3, ViewerSettings};

/// Multiplicative step of one dolly command
pub const DOLLY_FACTOR: f32 = 1.2;
/// Closest the user may orbit to the target
pub const MIN_DISTANCE: f32 = 2.0;
/// Farthest the user may orbit from the target
pub const MAX_DISTANCE: f32 = 10.0;

const MAX_ELEVATION: f32 = 1.5;
/// Seconds without input before the exterior view starts turning
const IDLE_DELAY_SECS: f32 = 6.0;

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub target_azimuth: f32,
    pub elevation: f32,
    pub target_elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
    /// Lower zoom bound; relaxed for presets that sit closer than `MIN_DISTANCE`
    pub min_distance: f32,
    pub max_distance: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    /// Idle orbit speed in radians per second; zero disables it
    pub idle_rotate_speed: f32,
    /// Seconds since the last user input
    pub idle_secs: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let mut settings = Self {
            distance: 0.0,
            target_distance: 0.0,
            azimuth: 0.0,
            target_azimuth: 0.0,
            elevation: 0.0,
            target_elevation: 0.0,
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
            idle_rotate_speed: 0.1,
            idle_secs: 0.0,
        };
        settings.snap_to(ViewMode::Exterior.camera_preset());
        settings
    }
}

/// Spherical coordinates of an eye around a target (Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
}

impl OrbitPose {
    pub fn from_preset(preset: CameraPreset) -> Self {
        let offset = to_vec3(preset.position) - to_vec3(preset.target);
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Self { azimuth: 0.0, elevation: 0.0, distance: 0.0 };
        }
        Self {
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
        }
    }

    /// Eye offset from the target
    pub fn offset(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        )
    }
}

impl CameraSettings {
    /// Ease toward a preset from wherever the camera is now
    pub fn move_to(&mut self, preset: CameraPreset) {
        let pose = OrbitPose::from_preset(preset);
        self.min_distance = MIN_DISTANCE.min(pose.distance);
        self.target_focus = to_vec3(preset.target);
        self.target_distance = pose.distance;
        // Take the short way round
        self.target_azimuth = self.azimuth + wrap_angle(pose.azimuth - self.azimuth);
        self.target_elevation = pose.elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Jump straight to a preset
    pub fn snap_to(&mut self, preset: CameraPreset) {
        self.move_to(preset);
        self.distance = self.target_distance;
        self.azimuth = self.target_azimuth;
        self.elevation = self.target_elevation;
        self.target = self.target_focus;
    }

    /// Scale the zoom target by `factor`, keeping it within bounds
    pub fn dolly(&mut self, factor: f32) {
        self.target_distance = (self.target_distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn pose(&self) -> OrbitPose {
        OrbitPose {
            azimuth: self.azimuth,
            elevation: self.elevation,
            distance: self.distance,
        }
    }

    fn orbit(&mut self, delta: Vec2) {
        self.target_azimuth -= delta.x * self.sensitivity;
        self.target_elevation =
            (self.target_elevation + delta.y * self.sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Slowly orbit once the user has left the camera alone
    fn idle_rotate(&mut self, dt: f32, had_input: bool) {
        if had_input {
            self.idle_secs = 0.0;
            return;
        }
        self.idle_secs += dt;
        if self.idle_secs >= IDLE_DELAY_SECS {
            self.target_azimuth += self.idle_rotate_speed * dt;
        }
    }

    fn smooth(&mut self, dt: f32) {
        let lerp_factor = 1.0 - (-self.smooth_factor * 60.0 * dt).exp();
        self.distance += (self.target_distance - self.distance) * lerp_factor;
        self.azimuth += (self.target_azimuth - self.azimuth) * lerp_factor;
        self.elevation += (self.target_elevation - self.elevation) * lerp_factor;
        self.target += (self.target_focus - self.target) * lerp_factor;
    }
}

/// Map an angle into (-PI, PI]
fn wrap_angle(angle: f32) -> f32 {
    let two_pi = std::f32::consts::TAU;
    let wrapped = (angle + std::f32::consts::PI).rem_euclid(two_pi) - std::f32::consts::PI;
    if wrapped <= -std::f32::consts::PI {
        wrapped + two_pi
    } else {
        wrapped
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, (follow_view_preset, handle_camera_commands, update_camera).chain());
    }
}

/// Move to the preset whenever the active view changes
fn follow_view_preset(
    settings: Res<ViewerSettings>,
    mut camera: ResMut<CameraSettings>,
    mut last_view: Local<Option<ViewMode>>,
) {
    if *last_view == Some(settings.active_view) {
        return;
    }
    if last_view.is_none() {
        camera.snap_to(settings.active_view.camera_preset());
    } else {
        tracing::debug!("Camera moving to {} preset", settings.active_view);
        camera.move_to(settings.active_view.camera_preset());
    }
    *last_view = Some(settings.active_view);
}

fn handle_camera_commands(
    mut commands: MessageReader<CameraCommand>,
    settings: Res<ViewerSettings>,
    mut camera: ResMut<CameraSettings>,
) {
    for command in commands.read() {
        match command {
            CameraCommand::DollyIn => camera.dolly(1.0 / DOLLY_FACTOR),
            CameraCommand::DollyOut => camera.dolly(DOLLY_FACTOR),
            CameraCommand::Reset => camera.move_to(settings.active_view.camera_preset()),
        }
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    viewer: Res<ViewerSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Check if egui wants the mouse - if so, don't process camera controls
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    let mut had_input = mouse_button.get_pressed().next().is_some() || touch_input.iter().next().is_some();

    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        settings.orbit(total_motion);
    }

    if !egui_wants_pointer {
        for scroll in mouse_wheel.read() {
            had_input = true;
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed * 0.3;
            settings.dolly(zoom_factor);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Touch support for mobile
    if touch_input.iter().count() == 1 && !egui_wants_pointer {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                settings.orbit(delta);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            settings.dolly(prev_dist / curr_dist.max(1.0));
        }
    }

    let dt = time.delta_secs();
    // Only the exterior view turns by itself
    let had_input = had_input || viewer.active_view != ViewMode::Exterior;
    settings.idle_rotate(dt, had_input);
    settings.smooth(dt);

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.target + settings.pose().offset();
        transform.look_at(settings.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_presets_round_trip_through_orbit_pose() {
        for view in ViewMode::ALL {
            let preset = view.camera_preset();
            let pose = OrbitPose::from_preset(preset);
            assert_close(to_vec3(preset.target) + pose.offset(), to_vec3(preset.position));
        }
    }

    #[test]
    fn test_interior_preset_relaxes_min_distance() {
        let mut camera = CameraSettings::default();
        camera.snap_to(ViewMode::Interior.camera_preset());
        assert!((camera.distance - 1.0).abs() < 1e-4);
        assert!(camera.min_distance <= 1.0);

        camera.snap_to(ViewMode::Exterior.camera_preset());
        assert_eq!(camera.min_distance, MIN_DISTANCE);
    }

    #[test]
    fn test_dolly_is_multiplicative_and_clamped() {
        let mut camera = CameraSettings::default();
        let start = camera.target_distance;
        camera.dolly(DOLLY_FACTOR);
        assert!((camera.target_distance - start * DOLLY_FACTOR).abs() < 1e-4);

        for _ in 0..50 {
            camera.dolly(DOLLY_FACTOR);
        }
        assert_eq!(camera.target_distance, MAX_DISTANCE);

        for _ in 0..50 {
            camera.dolly(1.0 / DOLLY_FACTOR);
        }
        assert_eq!(camera.target_distance, MIN_DISTANCE);
    }

    #[test]
    fn test_move_to_takes_shortest_rotation() {
        let mut camera = CameraSettings::default();
        camera.azimuth = 3.0 * std::f32::consts::TAU;
        camera.move_to(ViewMode::Exterior.camera_preset());
        assert!((camera.target_azimuth - camera.azimuth).abs() <= std::f32::consts::PI);
    }

    #[test]
    fn test_idle_rotation_waits_for_quiet() {
        let mut camera = CameraSettings::default();
        let start = camera.target_azimuth;
        for _ in 0..60 {
            camera.idle_rotate(0.05, false);
        }
        assert_eq!(camera.target_azimuth, start);

        for _ in 0..80 {
            camera.idle_rotate(0.05, false);
        }
        assert!(camera.target_azimuth > start);

        let turned = camera.target_azimuth;
        camera.idle_rotate(0.05, true);
        camera.idle_rotate(0.05, false);
        assert_eq!(camera.target_azimuth, turned);
        assert!(camera.idle_secs < IDLE_DELAY_SECS);
    }

    #[test]
    fn test_smoothing_converges() {
        let mut camera = CameraSettings::default();
        camera.move_to(ViewMode::Engine.camera_preset());
        for _ in 0..600 {
            camera.smooth(1.0 / 60.0);
        }
        let preset = ViewMode::Engine.camera_preset();
        assert_close(camera.target + camera.pose().offset(), to_vec3(preset.position));
    }
}

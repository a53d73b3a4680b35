//! Debug camera controllers
//!
//! - FreeFly: WASD/QE movement, mouse look, scroll adjusts speed
//! - Orbit: drag to circle a target, scroll to zoom

use glam::{Vec2, Vec3};

use super::Camera;

const TWO_PI: f32 = std::f32::consts::TAU;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Input state gathered by the host for one frame
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub sprint: bool,

    /// Cursor movement since last frame, in pixels
    pub mouse_delta: Vec2,

    /// Positive when scrolling up
    pub scroll_delta: f32,

    /// Right mouse button held
    pub mouse_look_active: bool,
}

impl CameraInput {
    /// Unit direction of the held movement keys in controller space
    /// (x = right, y = up, z = forward)
    fn movement_axes(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        Vec3::new(
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.backward),
        )
        .normalize_or_zero()
    }

    /// Clear the per-frame deltas once every controller has seen them
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

/// Something that moves a camera from user input
pub trait CameraController {
    fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32);

    fn name(&self) -> &'static str;

    /// Adopt the camera's current placement so switching controllers does not jump
    fn sync_with_camera(&mut self, camera: &Camera);
}

/// FPS-style free flight
pub struct FreeFlyController {
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second
    pub move_speed: f32,
    pub speed_range: (f32, f32),
    /// Radians per pixel
    pub mouse_sensitivity: f32,
    pub sprint_multiplier: f32,
}

impl Default for FreeFlyController {
    fn default() -> Self {
        Self {
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            move_speed: 5.0,
            speed_range: (0.5, 50.0),
            mouse_sensitivity: 0.003,
            sprint_multiplier: 2.0,
        }
    }
}

impl FreeFlyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    fn look_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
    }
}

impl CameraController for FreeFlyController {
    fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32) {
        if input.scroll_delta != 0.0 {
            let factor = if input.scroll_delta > 0.0 { 1.2 } else { 1.0 / 1.2 };
            self.move_speed =
                (self.move_speed * factor).clamp(self.speed_range.0, self.speed_range.1);
        }

        if input.mouse_look_active {
            self.yaw = (self.yaw + input.mouse_delta.x * self.mouse_sensitivity) % TWO_PI;
            self.pitch = (self.pitch - input.mouse_delta.y * self.mouse_sensitivity)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        let look = self.look_direction();
        let right = look.cross(Vec3::Y).normalize_or_zero();
        let axes = input.movement_axes();
        let speed = if input.sprint {
            self.move_speed * self.sprint_multiplier
        } else {
            self.move_speed
        };

        camera.position += (right * axes.x + Vec3::Y * axes.y + look * axes.z) * speed * dt;
        camera.target = camera.position + look;
    }

    fn name(&self) -> &'static str {
        "FreeFly"
    }

    fn sync_with_camera(&mut self, camera: &Camera) {
        let look = camera.forward();
        if look != Vec3::ZERO {
            self.yaw = look.z.atan2(look.x);
            self.pitch = look.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }
}

/// Circles a target point at a given distance
pub struct OrbitController {
    pub target: Vec3,
    pub distance: f32,
    pub distance_range: (f32, f32),
    /// Horizontal angle in radians
    pub azimuth: f32,
    /// Vertical angle in radians
    pub elevation: f32,
    /// Radians per pixel
    pub orbit_sensitivity: f32,
    /// Distance multiplier per scroll notch
    pub zoom_factor: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            distance_range: (0.5, 50.0),
            azimuth: std::f32::consts::FRAC_PI_2,
            elevation: 0.0,
            orbit_sensitivity: 0.005,
            zoom_factor: 1.1,
        }
    }
}

impl OrbitController {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            ..Default::default()
        }
    }

    fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + Vec3::new(cos_el * cos_az, sin_el, cos_el * sin_az) * self.distance
    }
}

impl CameraController for OrbitController {
    fn update(&mut self, camera: &mut Camera, input: &CameraInput, _dt: f32) {
        if input.scroll_delta > 0.0 {
            self.distance /= self.zoom_factor;
        } else if input.scroll_delta < 0.0 {
            self.distance *= self.zoom_factor;
        }
        self.distance = self.distance.clamp(self.distance_range.0, self.distance_range.1);

        if input.mouse_look_active {
            self.azimuth = (self.azimuth + input.mouse_delta.x * self.orbit_sensitivity) % TWO_PI;
            self.elevation = (self.elevation + input.mouse_delta.y * self.orbit_sensitivity)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        camera.position = self.eye();
        camera.target = self.target;
    }

    fn name(&self) -> &'static str {
        "Orbit"
    }

    fn sync_with_camera(&mut self, camera: &Camera) {
        let offset = camera.position - camera.target;
        let distance = offset.length();
        if distance > f32::EPSILON {
            self.target = camera.target;
            self.distance = distance;
            self.elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
            self.azimuth = offset.z.atan2(offset.x);
        }
    }
}

/// Cycles between several controllers, driving only the active one
#[derive(Default)]
pub struct ControllerSet {
    controllers: Vec<Box<dyn CameraController>>,
    active: usize,
}

impl ControllerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: CameraController + 'static>(mut self, controller: C) -> Self {
        self.controllers.push(Box::new(controller));
        self
    }

    /// Activate the next controller, handing it the camera's current placement
    pub fn switch_next(&mut self, camera: &Camera) {
        if self.controllers.is_empty() {
            return;
        }
        self.active = (self.active + 1) % self.controllers.len();
        self.controllers[self.active].sync_with_camera(camera);
        log::info!("Camera controller: {}", self.active_name());
    }

    pub fn active_name(&self) -> &'static str {
        self.controllers
            .get(self.active)
            .map_or("None", |c| c.name())
    }

    pub fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32) {
        if let Some(controller) = self.controllers.get_mut(self.active) {
            controller.update(camera, input, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_fly_moves_forward() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut controller = FreeFlyController::new().with_speed(2.0);
        controller.sync_with_camera(&camera);

        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.5);

        assert!((camera.position - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_free_fly_pitch_is_clamped() {
        let mut camera = Camera::default();
        let mut controller = FreeFlyController::new();
        let input = CameraInput {
            mouse_look_active: true,
            mouse_delta: Vec2::new(0.0, -100_000.0),
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);
        assert!(controller.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_orbit_keeps_distance_to_target() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new(Vec3::ZERO, 3.0);
        let input = CameraInput {
            mouse_look_active: true,
            mouse_delta: Vec2::new(40.0, 25.0),
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);

        assert!((camera.position.length() - 3.0).abs() < 1e-4);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_zoom_respects_range() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new(Vec3::ZERO, 0.6);
        let input = CameraInput {
            scroll_delta: 1.0,
            ..Default::default()
        };
        for _ in 0..10 {
            controller.update(&mut camera, &input, 0.016);
        }
        assert_eq!(controller.distance, 0.5);
    }

    #[test]
    fn test_controller_set_cycles() {
        let camera = Camera::default();
        let mut set = ControllerSet::new()
            .with(OrbitController::default())
            .with(FreeFlyController::default());

        assert_eq!(set.active_name(), "Orbit");
        set.switch_next(&camera);
        assert_eq!(set.active_name(), "FreeFly");
        set.switch_next(&camera);
        assert_eq!(set.active_name(), "Orbit");
    }
}

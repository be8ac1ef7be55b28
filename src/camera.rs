use glam::{Mat4, Quat, Vec3};

use crate::config::CameraConfig;
use crate::world::HeightMap;

pub const PITCH_LIMIT: f32 = 89.0;
pub const GROUND_LEVEL: f32 = 2.0;
/// Range the field of view can be dialled through at runtime.
pub const FOV_RANGE: (f32, f32) = (30.0, 120.0);
const JUMP_VELOCITY: f32 = 0.2;
const GRAVITY: f32 = 0.01;

/// First-person eye/at/up camera walking over the block grid.
///
/// Eye and at always move together on translation, so the look direction
/// only changes through the rotation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    at: Vec3,
    up: Vec3,
    pub fov: f32,
    pub speed: f32,
    pub rotation_speed: f32,
    pub mouse_sensitivity: f32,
    pitch: f32,
    jumping: bool,
    jump_height: f32,
    jump_velocity: f32,
}

impl Camera {
    pub fn new(eye: Vec3, at: Vec3) -> Self {
        Self::with_config(eye, at, &CameraConfig::default())
    }

    pub fn with_config(eye: Vec3, at: Vec3, config: &CameraConfig) -> Self {
        Self {
            eye,
            at,
            up: Vec3::Y,
            fov: config.fov,
            speed: config.speed,
            rotation_speed: config.rotation_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            pitch: 0.0,
            jumping: false,
            jump_height: 0.0,
            jump_velocity: 0.0,
        }
    }

    /// On the west edge of a `size` map, halfway along Z, facing +X
    /// toward the central hill.
    pub fn spawn(size: usize, config: &CameraConfig) -> Self {
        let z = (size / 2) as f32 + 0.5;
        Self::with_config(
            Vec3::new(0.5, GROUND_LEVEL, z),
            Vec3::new(1.5, GROUND_LEVEL, z),
            config,
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn at(&self) -> Vec3 {
        self.at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }

    pub fn forward_vector(&self) -> Vec3 {
        (self.at - self.eye).normalize()
    }

    pub fn right_vector(&self) -> Vec3 {
        self.forward_vector().cross(self.up).normalize()
    }

    fn translate(&mut self, offset: Vec3) {
        self.eye += offset;
        self.at += offset;
    }

    pub fn forward(&mut self) {
        self.translate(self.forward_vector() * self.speed);
    }

    pub fn backward(&mut self) {
        self.translate(self.forward_vector() * -self.speed);
    }

    pub fn left(&mut self) {
        self.translate(self.right_vector() * -self.speed);
    }

    pub fn right(&mut self) {
        self.translate(self.right_vector() * self.speed);
    }

    /// Turn the view about the up axis; positive degrees turn left.
    pub fn yaw(&mut self, degrees: f32) {
        let view = self.at - self.eye;
        let rotation = Quat::from_axis_angle(self.up, degrees.to_radians());
        self.at = self.eye + rotation * view;
    }

    pub fn rot_left(&mut self) {
        self.yaw(self.rotation_speed);
    }

    pub fn rot_right(&mut self) {
        self.yaw(-self.rotation_speed);
    }

    /// Mouse-look from a raw pointer delta.
    ///
    /// Pitch is kept as an absolute angle and the view is rebuilt from the
    /// flattened forward vector each time, so it cannot drift past the limit.
    pub fn look(&mut self, delta_x: f32, delta_y: f32) {
        if delta_x != 0.0 {
            self.yaw(-delta_x * self.mouse_sensitivity);
        }

        if delta_y != 0.0 {
            self.pitch = (self.pitch + delta_y * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

            let view = self.at - self.eye;
            let horizontal = Vec3::new(view.x, 0.0, view.z).normalize_or_zero();
            let right = view.cross(self.up).normalize_or_zero();
            if horizontal == Vec3::ZERO || right == Vec3::ZERO {
                return;
            }

            let rotation = Quat::from_axis_angle(right, self.pitch.to_radians());
            self.at = self.eye + (rotation * horizontal).normalize();
        }
    }

    /// Widen (positive) or narrow the field of view, kept inside [`FOV_RANGE`].
    pub fn adjust_fov(&mut self, degrees: f32) {
        self.fov = (self.fov + degrees).clamp(FOV_RANGE.0, FOV_RANGE.1);
    }

    pub fn jump(&mut self) {
        if !self.jumping {
            self.jumping = true;
            self.jump_height = 0.0;
            self.jump_velocity = JUMP_VELOCITY;
        }
    }

    /// One animation tick of the jump. `jump_height` tracks the summed
    /// velocity before gravity, so landing happens once it sums back to 0.
    pub fn update_jump(&mut self) {
        if !self.jumping {
            return;
        }

        self.jump_height += self.jump_velocity;
        self.jump_velocity -= GRAVITY;
        self.eye.y += self.jump_velocity;
        self.at.y += self.jump_velocity;

        if self.jump_height <= 0.0 {
            self.jumping = false;
            self.jump_height = 0.0;
            let drop = GROUND_LEVEL - self.eye.y;
            self.eye.y = GROUND_LEVEL;
            self.at.y += drop;
        }
    }

    /// Whether one forward step would walk into a column taller than the eye.
    pub fn blocked_ahead(&self, map: &HeightMap) -> bool {
        let probe = self.eye + self.forward_vector() * self.speed;
        if probe.x < 0.0 || probe.z < 0.0 {
            return false;
        }
        let floor_y = probe.y.floor();
        match map.get(probe.x.floor() as usize, probe.z.floor() as usize) {
            Some(height) => height as f32 > floor_y,
            None => false,
        }
    }

    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }
}

pub struct Projection {
    aspect: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn build_projection_matrix(&self, fovy_degrees: f32) -> Mat4 {
        Mat4::perspective_rh(fovy_degrees.to_radians(), self.aspect, self.znear, self.zfar)
    }
}

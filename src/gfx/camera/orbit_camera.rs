use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Margin keeping the pitch short of the poles
const PITCH_MARGIN: f32 = 1e-3;

/// Perspective camera orbiting a target point, Y up
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: (f32, f32, f32, Vector3<f32>),
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * self.build_view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
            home: (distance, pitch, yaw, target),
        };
        camera.pitch = camera.pitch.clamp(camera.bounds.min_pitch, camera.bounds.max_pitch);
        camera.update();
        camera.update_view_proj();
        camera
    }

    /// Creates a camera at `eye` looking at `target`
    pub fn from_eye(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    /// Returns to the pose the camera was created with
    pub fn reset_to_default(&mut self) {
        let (distance, pitch, yaw, target) = self.home;
        self.distance = distance;
        self.pitch = pitch;
        self.yaw = yaw;
        self.target = target;

        self.update(); // Recalculate eye position
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance * (1.0 + delta));
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.clamp(min_yaw, f32::MAX);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.clamp(f32::MIN, max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        // Move both eye and target to maintain the view direction
        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        Matrix4::look_at_rh(eye, target, self.up)
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
        self.uniform.view = convert_matrix4_to_array(self.build_view_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(60.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + PITCH_MARGIN,
            max_pitch: std::f32::consts::FRAC_PI_2 - PITCH_MARGIN,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_eye_reproduces_eye() {
        let camera = OrbitCamera::from_eye(Vector3::new(0.5, -1.0, 4.0), Vector3::zero(), 1.5);
        assert_relative_eq!(camera.eye.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, 4.0, epsilon = 1e-5);
        assert_relative_eq!(camera.fovy.0, 75f32.to_radians(), epsilon = 1e-6);
        assert_eq!(camera.up, Vector3::unit_y());
    }

    #[test]
    fn test_pitch_stays_short_of_poles() {
        let mut camera = OrbitCamera::new(4.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(0.5, -1.0, 4.0), Vector3::zero(), 1.0);
        let initial_eye = camera.eye;
        camera.add_yaw(1.0);
        camera.pan((2.0, 1.0));
        camera.set_distance(10.0);
        camera.reset_to_default();
        assert_relative_eq!(camera.eye.x, initial_eye.x, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, initial_eye.z, epsilon = 1e-5);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.7, Vector3::new(1.0, 2.0, 3.0), 1.0);
        camera.update_view_proj();
        let view = Matrix4::from(camera.uniform.view);
        let target = view * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(target.z, -5.0, epsilon = 1e-4);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_resize_ignores_zero_height() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.resize_projection(1200, 800);
        assert_relative_eq!(camera.aspect, 1.5);
        camera.resize_projection(1200, 0);
        assert_relative_eq!(camera.aspect, 1.5);
    }
}

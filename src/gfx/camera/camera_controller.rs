use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Default damping factor: the share of the pending motion applied per frame
pub const DEFAULT_DAMPING: f32 = 0.05;

/// Remaining motion below this is dropped
const REST_THRESHOLD: f32 = 1e-5;

/// Mouse/keyboard orbit controls with damped motion
///
/// Input accumulates yaw/pitch and pan deltas; [`CameraController::update`]
/// applies `factor` of the pending motion each frame and keeps the rest, so
/// the camera glides to a stop after the mouse is released.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pending_rotate: (f32, f32),
    pending_pan: (f32, f32),
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping_factor: DEFAULT_DAMPING,
            pending_rotate: (0.0, 0.0),
            pending_pan: (0.0, 0.0),
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    /// Builder pattern: set the damping factor (clamped to `(0, 1]`)
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_factor = factor.clamp(f32::EPSILON, 1.0);
        self
    }

    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.05
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.push_drag(delta.0 as f32, delta.1 as f32);
                }
            }
            _ => (),
        }
    }

    /// Queues motion for a mouse drag of `(dx, dy)` pixels
    pub fn push_drag(&mut self, dx: f32, dy: f32) {
        if self.is_shift_held {
            // SHIFT + DRAG = PAN (move focus point)
            self.pending_pan.0 -= dx * self.pan_speed;
            self.pending_pan.1 += dy * self.pan_speed;
        } else {
            // NORMAL DRAG = ROTATE (orbit around focus)
            self.pending_rotate.0 -= dx * self.rotate_speed;
            self.pending_rotate.1 += dy * self.rotate_speed;
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held {
                    log::info!("Resetting camera to default position");
                    self.stop();
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Applies one frame of damped motion to the camera
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        let k = self.damping_factor;

        let (yaw, pitch) = self.pending_rotate;
        if yaw != 0.0 || pitch != 0.0 {
            camera.add_yaw(yaw * k);
            camera.add_pitch(pitch * k);
            self.pending_rotate = settle((yaw * (1.0 - k), pitch * (1.0 - k)));
        }

        let (x, y) = self.pending_pan;
        if x != 0.0 || y != 0.0 {
            camera.pan((x * k, y * k));
            self.pending_pan = settle((x * (1.0 - k), y * (1.0 - k)));
        }
    }

    /// Drops any pending motion
    pub fn stop(&mut self) {
        self.pending_rotate = (0.0, 0.0);
        self.pending_pan = (0.0, 0.0);
    }

    /// Returns true while damped motion is still being applied
    pub fn is_moving(&self) -> bool {
        self.pending_rotate != (0.0, 0.0) || self.pending_pan != (0.0, 0.0)
    }

    pub fn set_shift_held(&mut self, held: bool) {
        self.is_shift_held = held;
    }
}

fn settle(delta: (f32, f32)) -> (f32, f32) {
    if delta.0.abs() < REST_THRESHOLD && delta.1.abs() < REST_THRESHOLD {
        (0.0, 0.0)
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(4.0, 0.0, 0.0, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_damping_applies_full_delta_and_stops() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        controller.push_drag(-50.0, 0.0);

        let mut frames = 0;
        while controller.is_moving() {
            controller.update(&mut camera);
            frames += 1;
            assert!(frames < 1000, "controls never settled");
        }

        // Geometric series: the whole 0.5 rad yaw is applied eventually
        assert_relative_eq!(camera.yaw, 0.5, epsilon = 1e-3);

        let yaw = camera.yaw;
        controller.update(&mut camera);
        assert_eq!(camera.yaw, yaw);
    }

    #[test]
    fn test_first_frame_applies_damping_factor() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        controller.push_drag(0.0, 20.0);
        controller.update(&mut camera);
        assert_relative_eq!(camera.pitch, 0.2 * DEFAULT_DAMPING, epsilon = 1e-6);
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(1.0);
        controller.set_shift_held(true);
        controller.push_drag(10.0, 0.0);
        controller.update(&mut camera);

        assert_relative_eq!(camera.yaw, 0.0);
        assert!(camera.target.x.abs() > 0.0);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_stop_clears_motion() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.push_drag(5.0, 5.0);
        assert!(controller.is_moving());
        controller.stop();
        assert!(!controller.is_moving());
    }
}

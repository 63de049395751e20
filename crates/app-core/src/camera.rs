//! Hand-driven orbit camera.
//!
//! The desired orbit (spherical coordinates around a fixed anchor) moves in
//! discrete steps from hand-motion deltas; the rendered eye eases toward it
//! every frame, which hides per-frame tracking noise.

use crate::constants::*;
use crate::gesture::GestureState;
use glam::{Mat4, Vec2, Vec3};

/// Right-handed perspective camera description.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Polar angle is measured from +Y, azimuth around +Y starting at +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
}

impl Spherical {
    pub fn to_cartesian(self) -> Vec3 {
        let sin_polar = self.polar.sin();
        Vec3::new(
            self.radius * sin_polar * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * sin_polar * self.azimuth.cos(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitConfig {
    pub initial: Spherical,
    pub look_at: Vec3,
    pub start_eye: Vec3,
    pub rotate_sensitivity: f32,
    pub elevate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub polar_min: f32,
    pub polar_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub position_easing: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            initial: Spherical {
                radius: ORBIT_INITIAL_RADIUS,
                polar: ORBIT_INITIAL_POLAR,
                azimuth: ORBIT_INITIAL_AZIMUTH,
            },
            look_at: ORBIT_LOOK_AT,
            start_eye: CAMERA_START,
            rotate_sensitivity: ORBIT_ROTATE_SENSITIVITY,
            elevate_sensitivity: ORBIT_ELEVATE_SENSITIVITY,
            zoom_sensitivity: ORBIT_ZOOM_SENSITIVITY,
            polar_min: ORBIT_POLAR_MIN,
            polar_max: ORBIT_POLAR_MAX,
            radius_min: ORBIT_RADIUS_MIN,
            radius_max: ORBIT_RADIUS_MAX,
            position_easing: ORBIT_POSITION_EASING,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrbitRig {
    config: OrbitConfig,
    spherical: Spherical,
    prev_hand: Option<Vec2>,
    prev_pinch: Option<f32>,
    eye: Vec3,
}

impl OrbitRig {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            spherical: config.initial,
            prev_hand: None,
            prev_pinch: None,
            eye: config.start_eye,
            config,
        }
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_at(&self) -> Vec3 {
        self.config.look_at
    }

    pub fn previous_hand(&self) -> Option<Vec2> {
        self.prev_hand
    }

    pub fn previous_pinch(&self) -> Option<f32> {
        self.prev_pinch
    }

    /// Where the eye is heading: the orbit point offset by the anchor.
    pub fn desired_eye(&self) -> Vec3 {
        self.spherical.to_cartesian() + self.config.look_at
    }

    /// Apply one frame of gesture input and ease the eye. Returns the new eye.
    pub fn update(&mut self, gesture: &GestureState, dt_sec: f32) -> Vec3 {
        if gesture.hand_present {
            self.track(gesture);
        } else {
            self.prev_hand = None;
            self.prev_pinch = None;
        }
        let desired = self.desired_eye();
        self.eye = self
            .eye
            .lerp(desired, frame_alpha(self.config.position_easing, dt_sec));
        self.eye
    }

    fn track(&mut self, gesture: &GestureState) {
        let c = &self.config;
        if let Some(prev) = self.prev_hand {
            let delta = gesture.position - prev;
            self.spherical.azimuth -= delta.x * c.rotate_sensitivity;
            self.spherical.polar = (self.spherical.polar - delta.y * c.elevate_sensitivity)
                .clamp(c.polar_min, c.polar_max);
        }
        self.prev_hand = Some(gesture.position);

        // A zero pinch means the distance is unavailable this frame.
        if gesture.pinch_distance > 0.0 {
            if let Some(prev) = self.prev_pinch {
                let pinch_delta = gesture.pinch_distance - prev;
                self.spherical.radius = (self.spherical.radius - pinch_delta * c.zoom_sensitivity)
                    .clamp(c.radius_min, c.radius_max);
            }
            self.prev_pinch = Some(gesture.pinch_distance);
        }
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera::new(self.eye, self.config.look_at, aspect)
    }
}

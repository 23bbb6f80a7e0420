//! First-person camera and its perspective projection.
//!
//! Matrices follow the OpenGL clip-space convention produced by
//! `cgmath::perspective`, which is what frustum extraction expects.

use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Pitch stops just short of straight up or down so `look_to_rh` stays defined.
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Eye position plus look angles.
///
/// Yaw is measured from +X toward +Z, pitch from the horizon toward +Y.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space
    pub position: Point3<f32>,
    /// Look angle around +Y
    pub yaw: Rad<f32>,
    /// Look angle above the horizon
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Places a camera. Angles accept `Deg` or `Rad`; the pitch is clamped.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_world::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(90.0), Deg(0.0));
    /// // A yaw of 90 degrees looks along +Z.
    /// assert!((camera.direction().z - 1.0).abs() < 1e-5);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// The unit vector the camera looks along.
    pub fn direction(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// The world-to-view matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction(), Vector3::unit_y())
    }

    /// Turns the camera, keeping the pitch short of straight up or down.
    pub fn rotate<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(&mut self, yaw: Y, pitch: P) {
        self.yaw += yaw.into();
        self.pitch += pitch.into();
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Perspective projection for a viewport.
#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    /// Chunks past this distance fall outside the frustum.
    zfar: f32,
}

impl Projection {
    /// A projection for a `width` x `height` viewport with vertical field of
    /// view `fovy` and clip planes at `znear` and `zfar`.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// The view-to-clip matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

//! Math utilities and types
//!
//! Provides the vector, rotation and color types exchanged between the
//! resolver, resource components and the scene-graph backend.

pub use nalgebra::{Vector3, Matrix4, Quaternion, Unit};
use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Order in which the three axis rotations of an [`Euler`] are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    /// X, then Y, then Z (intrinsic)
    #[default]
    Xyz,
    /// Y, then X, then Z
    Yxz,
    /// Z, then X, then Y
    Zxy,
    /// Z, then Y, then X
    Zyx,
    /// Y, then Z, then X
    Yzx,
    /// X, then Z, then Y
    Xzy,
}

impl RotationOrder {
    /// Parse an order name such as `"XYZ"` (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "XYZ" => Some(Self::Xyz),
            "YXZ" => Some(Self::Yxz),
            "ZXY" => Some(Self::Zxy),
            "ZYX" => Some(Self::Zyx),
            "YZX" => Some(Self::Yzx),
            "XZY" => Some(Self::Xzy),
            _ => None,
        }
    }

    fn axes(self) -> [usize; 3] {
        match self {
            Self::Xyz => [0, 1, 2],
            Self::Yxz => [1, 0, 2],
            Self::Zxy => [2, 0, 1],
            Self::Zyx => [2, 1, 0],
            Self::Yzx => [1, 2, 0],
            Self::Xzy => [0, 2, 1],
        }
    }
}

/// Euler rotation in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    /// Rotation around X
    pub x: f32,
    /// Rotation around Y
    pub y: f32,
    /// Rotation around Z
    pub z: f32,
    /// Application order
    pub order: RotationOrder,
}

impl Euler {
    /// Create an euler rotation with the default XYZ order
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, order: RotationOrder::Xyz }
    }

    /// Builder pattern: set rotation order
    pub fn with_order(mut self, order: RotationOrder) -> Self {
        self.order = order;
        self
    }

    /// Component by axis index (0 = x)
    pub fn axis(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Convert to a unit quaternion
    pub fn to_quat(&self) -> Quat {
        let [a, b, c] = self.order.axes();
        self.axis_quat(a) * self.axis_quat(b) * self.axis_quat(c)
    }

    /// Build from a quaternion; the result uses ZYX order
    pub fn from_quat(quat: &Quat) -> Self {
        let (roll, pitch, yaw) = quat.euler_angles();
        Self { x: roll, y: pitch, z: yaw, order: RotationOrder::Zyx }
    }

    fn axis_quat(&self, index: usize) -> Quat {
        let axis = match index {
            0 => Vec3::x_axis(),
            1 => Vec3::y_axis(),
            _ => Vec3::z_axis(),
        };
        Quat::from_axis_angle(&axis, self.axis(index))
    }
}

/// Linear RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from float components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let r = (hex >> 16) & 0xff;
        let g = (hex >> 8) & 0xff;
        let b = hex & 0xff;
        Self::from_rgb8(r as u8, g as u8, b as u8)
    }

    /// Create a color from 8-bit components
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Create a color from hue (0..1), saturation (0..1) and lightness (0..1)
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Packed `0xRRGGBB` representation
    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Point on a sphere; `phi` is the polar angle from +Y, `theta` the
    /// azimuth around Y measured from +Z. Angles in radians.
    pub fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
        let sin_phi_radius = phi.sin() * radius;
        Vec3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        )
    }

    /// Point on a cylinder around Y; `theta` measured from +Z, in radians
    pub fn cylindrical_to_cartesian(radius: f32, theta: f32, y: f32) -> Vec3 {
        Vec3::new(radius * theta.sin(), y, radius * theta.cos())
    }
}

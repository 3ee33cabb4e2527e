//! 3D vector type used for points, directions and offsets

use core::ops::{Add, Div, Mul, Neg, Sub};

/// Point, direction or offset in 3D
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEG_Y: Self = Self::new(0.0, -1.0, 0.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Unit axis by index (0 = X, 1 = Y, 2 = Z)
    ///
    /// # Panics
    /// Panics if `index > 2`.
    #[inline]
    pub fn axis(index: usize) -> Self {
        match index {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Z,
            _ => panic!("axis index out of range: {}", index),
        }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector along `self`; zero stays zero
    pub fn normalize(self) -> Self {
        match self.length() {
            len if len > 0.0 => self / len,
            _ => Self::ZERO,
        }
    }

    /// Like [`normalize`](Self::normalize) but treats near-zero vectors as zero
    pub fn normalize_or_zero(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq <= 1e-10 {
            return Self::ZERO;
        }
        self / len_sq.sqrt()
    }

    /// Some unit vector perpendicular to `self`
    pub fn any_orthonormal(self) -> Self {
        let helper = if self.x.abs() < 0.9 { Self::X } else { Self::Y };
        helper.cross(self).normalize()
    }

    /// Component-wise comparison within `eps`
    pub fn abs_diff_eq(self, other: Self, eps: f32) -> bool {
        let d = self - other;
        d.x.abs() <= eps && d.y.abs() <= eps && d.z.abs() <= eps
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vec3 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x $op rhs.x, self.y $op rhs.y, self.z $op rhs.z)
            }
        }
    };
    ($trait:ident<f32>, $method:ident, $op:tt) => {
        impl $trait<f32> for Vec3 {
            type Output = Self;

            #[inline]
            fn $method(self, s: f32) -> Self {
                Self::new(self.x $op s, self.y $op s, self.z $op s)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);
componentwise!(Mul<f32>, mul, *);
componentwise!(Div<f32>, div, /);

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self * -1.0
    }
}

//! 2D geometry value types
//!
//! `Matrix` follows the browser `DOMMatrix` 2D conventions: the six
//! coefficients `a b c d e f` map a point as
//! `x' = a*x + c*y + e`, `y' = b*x + d*y + f`, and the chaining helpers
//! (`translate`, `rotate`, `scale`, `multiply`) post-multiply, so the most
//! recently chained operation is applied to points first.

use crate::error::GeometryError;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

const DETERMINANT_EPSILON: f64 = 1e-12;

/// A point or vector in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Translation, rotation (degrees), scale and skew (degrees) recovered from
/// an affine matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformComponents {
    pub translate: Point,
    pub rotate: f64,
    pub scale: Point,
    pub skew: f64,
}

/// 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    inner: Matrix3<f64>,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Builds a matrix from its six `DOMMatrix` coefficients.
    #[allow(clippy::many_single_char_names)]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            inner: Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0),
        }
    }

    pub fn identity() -> Self {
        Self {
            inner: Matrix3::identity(),
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Rotation about the origin, in degrees.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn a(&self) -> f64 {
        self.inner[(0, 0)]
    }

    pub fn b(&self) -> f64 {
        self.inner[(1, 0)]
    }

    pub fn c(&self) -> f64 {
        self.inner[(0, 1)]
    }

    pub fn d(&self) -> f64 {
        self.inner[(1, 1)]
    }

    pub fn e(&self) -> f64 {
        self.inner[(0, 2)]
    }

    pub fn f(&self) -> f64 {
        self.inner[(1, 2)]
    }

    /// Overwrites the translation part.
    pub fn set_translation(&mut self, tx: f64, ty: f64) {
        self.inner[(0, 2)] = tx;
        self.inner[(1, 2)] = ty;
    }

    pub fn is_identity(&self) -> bool {
        self.inner == Matrix3::identity()
    }

    /// Returns `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Self {
            inner: self.inner * other.inner,
        }
    }

    pub fn translate(&self, tx: f64, ty: f64) -> Matrix {
        self.multiply(&Matrix::translation(tx, ty))
    }

    pub fn rotate(&self, degrees: f64) -> Matrix {
        self.multiply(&Matrix::rotation(degrees))
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Matrix {
        self.multiply(&Matrix::scaling(sx, sy))
    }

    /// Determinant of the linear (2x2) part.
    pub fn determinant(&self) -> f64 {
        self.a() * self.d() - self.b() * self.c()
    }

    pub fn try_inverse(&self) -> Result<Matrix, GeometryError> {
        let determinant = self.determinant();
        if determinant.abs() < DETERMINANT_EPSILON || !determinant.is_finite() {
            return Err(GeometryError::NonInvertible { determinant });
        }
        self.inner
            .try_inverse()
            .map(|inner| Matrix { inner })
            .ok_or(GeometryError::NonInvertible { determinant })
    }

    pub fn inverse(&self) -> Option<Matrix> {
        self.try_inverse().ok()
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a() * p.x + self.c() * p.y + self.e(),
            self.b() * p.x + self.d() * p.y + self.f(),
        )
    }

    /// Appends a translation given in the parent (screen) frame.
    ///
    /// The delta is mapped through the inverse of the linear part so that
    /// rotated or scaled layers still move by exactly `(dx, dy)` on screen.
    /// When the linear part is singular the raw delta is used instead.
    pub fn translated_in_parent(&self, dx: f64, dy: f64) -> Matrix {
        let mut linear = *self;
        linear.set_translation(0.0, 0.0);

        let local = match linear.try_inverse() {
            Ok(inv) => inv.transform_point(Point::new(dx, dy)),
            Err(err) => {
                tracing::debug!("Using raw translation delta: {}", err);
                Point::new(dx, dy)
            }
        };

        self.translate(local.x, local.y)
    }

    /// Splits the matrix into translate/rotate/scale/skew components.
    pub fn decompose(&self) -> TransformComponents {
        let (a, b, c, d) = (self.a(), self.b(), self.c(), self.d());
        let translate = Point::new(self.e(), self.f());

        let scale_x = (a * a + b * b).sqrt();
        if scale_x < DETERMINANT_EPSILON {
            return TransformComponents {
                translate,
                rotate: 0.0,
                scale: Point::new(0.0, (c * c + d * d).sqrt()),
                skew: 0.0,
            };
        }

        let rotate = b.atan2(a).to_degrees();
        let scale_y = self.determinant() / scale_x;
        let skew = ((a * c + b * d) / (scale_x * scale_x)).atan().to_degrees();

        TransformComponents {
            translate,
            rotate,
            scale: Point::new(scale_x, scale_y),
            skew,
        }
    }
}

/// Position, size and rotation (degrees) of the selection bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub pos: Point,
    pub size: Point,
    pub rot: f64,
}

impl Bounds {
    pub fn new(pos: Point, size: Point, rot: f64) -> Self {
        Self { pos, size, rot }
    }
}

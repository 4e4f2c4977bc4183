//! 2D affine transforms: parsing SVG `transform` attributes, composing them
//! along an ancestor chain, and mapping pointer coordinates into content space.
//!
//! Matrices use the SVG `[a b c d e f]` layout:
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::fmt;

use crate::doc::{NodeId, SvgDoc};
use crate::viewport::{Point, Rect, ViewBox};

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin; `degrees` is clockwise in SVG's y-down space.
    #[must_use]
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    #[must_use]
    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    #[must_use]
    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// `self × other`: `other` is applied to points first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point { x: self.a * p.x + self.c * p.y + self.e, y: self.b * p.x + self.d * p.y + self.f }
    }

    /// Inverse transform, or `None` when the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Serialize in `matrix(a,b,c,d,e,f)` notation.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matrix({},{},{},{},{},{})", self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

/// Parse an SVG `transform` attribute into a single matrix.
///
/// Supports `matrix`, `translate`, `scale`, `rotate` (with optional pivot),
/// `skewX` and `skewY`. Functions are composed left to right, as SVG does.
/// Unknown functions and malformed argument lists are skipped.
#[must_use]
pub fn parse_transform(raw: &str) -> Matrix {
    let mut out = Matrix::IDENTITY;
    let mut rest = raw;
    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim_matches(|c: char| c.is_whitespace() || c == ',');
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let args = parse_numbers(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];

        let Some(step) = args.as_deref().and_then(|args| function_matrix(name, args)) else {
            tracing::debug!(function = name, "skipping unsupported transform function");
            continue;
        };
        out = out.multiply(&step);
    }
    out
}

fn function_matrix(name: &str, args: &[f64]) -> Option<Matrix> {
    match (name, args) {
        ("matrix", [a, b, c, d, e, f]) => Some(Matrix::new(*a, *b, *c, *d, *e, *f)),
        ("translate", [tx]) => Some(Matrix::translate(*tx, 0.0)),
        ("translate", [tx, ty]) => Some(Matrix::translate(*tx, *ty)),
        ("scale", [s]) => Some(Matrix::scale(*s, *s)),
        ("scale", [sx, sy]) => Some(Matrix::scale(*sx, *sy)),
        ("rotate", [deg]) => Some(Matrix::rotate(*deg)),
        ("rotate", [deg, cx, cy]) => Some(
            Matrix::translate(*cx, *cy)
                .multiply(&Matrix::rotate(*deg))
                .multiply(&Matrix::translate(-cx, -cy)),
        ),
        ("skewX", [deg]) => Some(Matrix::skew_x(*deg)),
        ("skewY", [deg]) => Some(Matrix::skew_y(*deg)),
        _ => None,
    }
}

/// Split a function argument list. `None` if any token is not a number.
fn parse_numbers(raw: &str) -> Option<Vec<f64>> {
    let parsed: Result<Vec<f64>, _> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(str::parse::<f64>)
        .collect();
    match parsed {
        Ok(nums) => Some(nums),
        Err(_) => None,
    }
}

/// Compose the transforms of `node` and all of its ancestors, up to and
/// including the document root, into one matrix.
///
/// The result maps the node's local coordinates to the root's user space, so a
/// clone of `node` re-parented directly under the root renders in the same
/// place when given this matrix as its `transform`.
#[must_use]
pub fn compose_chain(doc: &SvgDoc, node: NodeId) -> Matrix {
    doc.ancestors(node)
        .iter()
        .rev()
        .filter_map(|&n| doc.attr(n, "transform"))
        .fold(Matrix::IDENTITY, |acc, raw| acc.multiply(&parse_transform(raw)))
}

/// Screen transform of an SVG root whose `viewBox` is `view_box` and whose
/// on-screen box is `screen`, using the default `xMidYMid meet` fit.
///
/// Returns `None` when either rectangle is degenerate.
#[must_use]
pub fn screen_ctm(screen: Rect, view_box: ViewBox) -> Option<Matrix> {
    if screen.width <= 0.0 || screen.height <= 0.0 || !view_box.is_valid() {
        return None;
    }
    let scale = (screen.width / view_box.w).min(screen.height / view_box.h);
    let tx = screen.x + (screen.width - view_box.w * scale) / 2.0 - view_box.x * scale;
    let ty = screen.y + (screen.height - view_box.h * scale) / 2.0 - view_box.y * scale;
    Some(Matrix::new(scale, 0.0, 0.0, scale, tx, ty))
}

/// Map a screen-space point into the root's user coordinate space.
#[must_use]
pub fn screen_to_content(point: Point, screen: Rect, view_box: ViewBox) -> Option<Point> {
    let inverse = screen_ctm(screen, view_box)?.inverse()?;
    Some(inverse.apply(point))
}

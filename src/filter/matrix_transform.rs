//! Pre-rotates/reflects the sampled direction before delegating to an inner
//! source.

use crate::coord::Coordinate;
use crate::matrix::Matrix3;
use crate::source::{RenderFlags, Source};

/// Wraps a source, multiplying every sampled direction by a fixed matrix
/// first. Used to implement `--rotate` and `--flip`. Does not renormalize
/// the rotated vector: a pure rotation or reflection preserves unit length,
/// so this only matters for a hypothetical non-orthonormal matrix, which
/// this crate's CLI never constructs.
pub struct MatrixTransform {
    inner: Box<dyn Source>,
    transform: Matrix3,
}

impl MatrixTransform {
    pub fn new(inner: Box<dyn Source>, transform: Matrix3) -> Self {
        MatrixTransform { inner, transform }
    }
}

impl Source for MatrixTransform {
    fn sample(&self, where_: Coordinate, flags: RenderFlags) -> crate::color::Color {
        let v = self.transform.multiply_vector(where_.as_vector());
        self.inner.sample(Coordinate::from_vector(v), flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::coord::Vector;

    struct Echo;
    impl Source for Echo {
        fn sample(&self, where_: Coordinate, _flags: RenderFlags) -> Color {
            let v = where_.as_vector();
            Color::new(v.x, v.y, v.z, 1.0)
        }
    }

    #[test]
    fn identity_matrix_passes_through_unchanged() {
        let wrapped = MatrixTransform::new(Box::new(Echo), Matrix3::identity());
        let v = Vector::new(0.2, 0.3, 0.9).normalized();
        let c = wrapped.sample(Coordinate::from_vector(v), RenderFlags::default());
        assert!((c.r - v.x).abs() < 1e-6);
        assert!((c.g - v.y).abs() < 1e-6);
        assert!((c.b - v.z).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_applied_before_delegating() {
        let wrapped = MatrixTransform::new(
            Box::new(Echo),
            Matrix3::rotate_y(std::f32::consts::FRAC_PI_2),
        );
        let c = wrapped.sample(Coordinate::from_vector(Vector::Z), RenderFlags::default());
        assert!((c.r - 1.0).abs() < 1e-5);
    }
}

//! Cosine-weighted hemispheric blur: turns a sharp environment source into
//! one suitable for generating diffuse irradiance maps.

use log::warn;

use crate::color::Color;
use crate::coord::{Coordinate, Vector};
use crate::source::{RenderFlags, Source};

/// Wraps a cube-map-like source, re-synthesizing each requested direction as
/// a cosine-weighted average over all directions in the hemisphere around
/// it. `size` controls the resolution of the internal sampling grid over
/// each of the six cube faces: cost is `O(size^2)` per sampled direction, so
/// this is intended for small outputs (e.g. irradiance maps).
pub struct CosineBlur {
    inner: Box<dyn Source>,
    size: usize,
    scale_bias: f32,
    scale_offset: f32,
}

impl CosineBlur {
    pub fn new(inner: Box<dyn Source>, size: usize, unmasked_scale: f32, masked_scale: f32) -> Self {
        CosineBlur {
            inner,
            size,
            scale_bias: unmasked_scale,
            scale_offset: masked_scale - unmasked_scale,
        }
    }

    fn sample_face(&self, out_v: Vector, axes: (Vector, Vector, Vector), flags: RenderFlags, totals: &mut Totals) {
        let (x_axis, y_axis, z_axis) = axes;
        let size = self.size as f32;
        let incr = 2.0 / size;

        for y in 0..self.size {
            let fy = y as f32 * incr - 1.0;
            for x in 0..self.size {
                let fx = x as f32 * incr - 1.0;
                let v = (x_axis * fx + y_axis * fy + z_axis).normalized();
                let weight = v.dot(out_v);
                if weight <= 0.0 {
                    continue;
                }

                let color = self.inner.sample(Coordinate::from_vector(v), flags);
                if !color.is_finite() {
                    warn!("skipped non-finite sample at direction {v:?}");
                    continue;
                }

                let local_weight = self.scale_bias + color.a * self.scale_offset;
                totals.accum = totals.accum.add(color.scale(weight * local_weight));
                totals.weight += weight;
            }
        }
    }
}

#[derive(Default)]
struct Totals {
    accum: Color,
    weight: f32,
}

impl Source for CosineBlur {
    fn sample(&self, where_: Coordinate, flags: RenderFlags) -> Color {
        let out_v = where_.as_vector();
        let mut totals = Totals::default();

        self.sample_face(out_v, (Vector::Z, Vector::Y, Vector::X), flags, &mut totals);
        self.sample_face(out_v, (Vector::Z, Vector::Y, -Vector::X), flags, &mut totals);
        self.sample_face(out_v, (Vector::X, Vector::Z, Vector::Y), flags, &mut totals);
        self.sample_face(out_v, (Vector::X, Vector::Z, -Vector::Y), flags, &mut totals);
        self.sample_face(out_v, (Vector::Y, Vector::X, Vector::Z), flags, &mut totals);
        self.sample_face(out_v, (Vector::Y, Vector::X, -Vector::Z), flags, &mut totals);

        if totals.weight <= 0.0 {
            return Color::CLEAR;
        }
        let inv = 1.0 / totals.weight;
        Color::new(totals.accum.r * inv, totals.accum.g * inv, totals.accum.b * inv, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(Color);
    impl Source for Constant {
        fn sample(&self, _where_: Coordinate, _flags: RenderFlags) -> Color {
            self.0
        }
    }

    #[test]
    fn constant_source_blurs_to_itself() {
        let c = Color::new(0.4, 0.5, 0.6, 1.0);
        let blur = CosineBlur::new(Box::new(Constant(c)), 8, 1.0, 1.0);
        let out = blur.sample(Coordinate::from_vector(Vector::Z), RenderFlags::default());
        assert!((out.r - c.r).abs() < 1e-3);
        assert!((out.g - c.g).abs() < 1e-3);
        assert!((out.b - c.b).abs() < 1e-3);
        assert_eq!(out.a, 1.0);
    }

    #[test]
    fn masked_scale_boosts_alpha_weighted_regions() {
        // alpha=1 everywhere should weight identically to alpha=0 when the
        // two scales are equal.
        let blur_equal = CosineBlur::new(Box::new(Constant(Color::new(1.0, 0.0, 0.0, 1.0))), 6, 1.0, 1.0);
        let blur_boosted = CosineBlur::new(Box::new(Constant(Color::new(1.0, 0.0, 0.0, 1.0))), 6, 1.0, 2.0);
        let a = blur_equal.sample(Coordinate::from_vector(Vector::Y), RenderFlags::default());
        let b = blur_boosted.sample(Coordinate::from_vector(Vector::Y), RenderFlags::default());
        // Both converge to the same color since output is renormalized, but
        // the boosted masked weighting must not panic or produce NaN.
        assert!(a.r.is_finite() && b.r.is_finite());
    }
}

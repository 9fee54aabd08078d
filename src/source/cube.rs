//! Reads a six-face cube map, either vertically stacked or in cross layout,
//! as a spherical pixel source.

use crate::color::Color;
use crate::coord::{Coordinate, Vector};
use crate::pixmap::{PixMap, Wrap};
use crate::source::{RenderFlags, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CubeReaderError {
    #[error("cube map height must be a multiple of six pixels")]
    BadVerticalGeometry,
    #[error("cross cube map width must be a multiple of four pixels and height must be a multiple of three pixels")]
    BadCrossGeometry,
}

#[derive(Debug, Clone, Copy)]
struct FaceOffset {
    x: usize,
    y: usize,
}

/// Samples a six-face cube map. The only difference between the vertical
/// and cross layouts is where each face's top-left corner sits within the
/// backing pixmap; face selection and in-face sampling are shared.
pub struct CubeReader {
    pm: PixMap,
    face_size: usize,
    offsets: [FaceOffset; 6],
}

impl CubeReader {
    /// Six vertically stacked faces in the fixed order `{+x,-x,+y,-y,+z,-z}`.
    pub fn new_vertical(pm: PixMap) -> Result<Self, CubeReaderError> {
        if !pm.height().is_multiple_of(6) {
            return Err(CubeReaderError::BadVerticalGeometry);
        }
        let face_size = pm.height() / 6;
        let offsets = std::array::from_fn(|i| FaceOffset { x: 0, y: i * face_size });
        Ok(CubeReader { pm, face_size, offsets })
    }

    /// A horizontal-cross layout: 4 columns by 3 rows of face-sized cells.
    pub fn new_cross(pm: PixMap) -> Result<Self, CubeReaderError> {
        if !pm.width().is_multiple_of(4) || !pm.height().is_multiple_of(3) {
            return Err(CubeReaderError::BadCrossGeometry);
        }
        let face_size = pm.width() / 4;
        let s = face_size;
        let offsets = [
            FaceOffset { x: 2 * s, y: s }, // +x
            FaceOffset { x: 0, y: s },     // -x
            FaceOffset { x: s, y: 0 },     // +y
            FaceOffset { x: s, y: 2 * s }, // -y
            FaceOffset { x: s, y: s },     // +z
            FaceOffset { x: 3 * s, y: s }, // -z
        ];
        Ok(CubeReader { pm, face_size, offsets })
    }
}

impl Source for CubeReader {
    fn sample(&self, where_: Coordinate, _flags: RenderFlags) -> Color {
        let v = where_.as_vector();
        let ax = v.x.abs();
        let ay = v.y.abs();
        let az = v.z.abs();

        let (mut u, mut w, face) = if ax > ay && ax > az {
            let u = v.z / ax;
            let w = -v.y / ax;
            if v.x > 0.0 { (-u, w, 0) } else { (u, w, 1) }
        } else if ay > ax && ay > az {
            let u = v.x / ay;
            let w = v.z / ay;
            if v.y > 0.0 { (u, w, 2) } else { (u, -w, 3) }
        } else {
            let u = v.x / az;
            let w = -v.y / az;
            if v.z > 0.0 { (u, w, 4) } else { (-u, w, 5) }
        };

        let half = self.face_size as f32 / 2.0;
        u = u * half + half;
        w = w * half + half;

        let offset = self.offsets[face];
        self.pm.sample_bilinear(
            u + offset.x as f32,
            w + offset.y as f32,
            Wrap::Clamp,
            Wrap::Clamp,
        )
    }
}

/// The (outward normal, down vector) pair defining each cube face's
/// orientation, indexed `{+x,-x,+y,-y,+z,-z}`.
pub fn face_basis(index: usize) -> (Vector, Vector) {
    match index {
        0 => (Vector::X, -Vector::Y),
        1 => (-Vector::X, -Vector::Y),
        2 => (Vector::Y, Vector::Z),
        3 => (-Vector::Y, -Vector::Z),
        4 => (Vector::Z, -Vector::Y),
        5 => (-Vector::Z, -Vector::Y),
        _ => unreachable!("cube maps have exactly six faces"),
    }
}

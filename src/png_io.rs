//! PNG read/write on top of the `image` crate, converting at the file
//! boundary between the file's encoded color space and this crate's
//! linear-light working space.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, ImageReader};
use log::debug;
use thiserror::Error;

use crate::color::Color;
use crate::pixmap::PixMap;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("could not open '{path}': {source}")]
    Open { path: String, #[source] source: std::io::Error },

    #[error("could not decode '{path}' as an image: {source}")]
    Decode { path: String, #[source] source: image::ImageError },

    #[error("could not write '{path}': {source}")]
    Write { path: String, #[source] source: image::ImageError },
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 { c * 12.92 } else { 1.055 * c.powf(1.0 / 2.4) - 0.055 }
}

/// The source gamma found in a PNG's `gAMA`/`sRGB` chunks, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SourceGamma {
    /// An `sRGB` chunk was present, or no gamma metadata at all: use the
    /// sRGB transfer function, the common case for planet texture assets.
    Srgb,
    /// A `gAMA` chunk gave an explicit gamma value: `sample.powf(1.0 / g)`
    /// converts to linear.
    Explicit(f32),
}

/// Peeks a PNG's header chunks for gamma metadata without decoding any
/// pixel data. Falls back to [`SourceGamma::Srgb`] if the file can't be
/// opened or parsed as a PNG here; the subsequent full decode through
/// `image` reports the real error for that case.
fn detect_gamma(path: &Path) -> SourceGamma {
    let Ok(file) = File::open(path) else { return SourceGamma::Srgb };
    let decoder = png::Decoder::new(BufReader::new(file));
    let Ok(reader) = decoder.read_info() else { return SourceGamma::Srgb };
    let info = reader.info();

    if info.srgb.is_some() {
        return SourceGamma::Srgb;
    }

    match info.gama_chunk {
        Some(gamma) if gamma.into_value() > 0.0 => SourceGamma::Explicit(gamma.into_value()),
        _ => SourceGamma::Srgb,
    }
}

/// Loads a PNG (8- or 16-bit, any color type the `image` crate supports) as
/// a linear-light [`PixMap`]. An embedded `gAMA` chunk is honored when
/// present and no `sRGB` chunk overrides it; otherwise input is treated as
/// sRGB-encoded.
pub fn read_png(path: &Path) -> Result<PixMap, PngError> {
    let display_path = path.display().to_string();
    let gamma = detect_gamma(path);

    let reader = ImageReader::open(path).map_err(|source| PngError::Open { path: display_path.clone(), source })?;
    let image = reader.decode().map_err(|source| PngError::Decode { path: display_path.clone(), source })?;

    debug!("decoded '{display_path}' as {:?}, {}x{}, gamma={gamma:?}", image.color(), image.width(), image.height());

    let to_linear: fn(f32) -> f32 = match gamma {
        SourceGamma::Srgb => srgb_to_linear,
        SourceGamma::Explicit(g) => return Ok(decode_with_gamma(&image, g)),
    };

    let rgba = image.to_rgba32f();
    let (width, height) = rgba.dimensions();
    let mut pm = PixMap::new(width as usize, height as usize);

    for y in 0..height {
        for x in 0..width {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            pm.set(x as usize, y as usize, Color::new(to_linear(r), to_linear(g), to_linear(b), a));
        }
    }

    Ok(pm)
}

fn decode_with_gamma(image: &DynamicImage, gamma: f32) -> PixMap {
    let rgba = image.to_rgba32f();
    let (width, height) = rgba.dimensions();
    let mut pm = PixMap::new(width as usize, height as usize);
    let exponent = 1.0 / gamma;

    for y in 0..height {
        for x in 0..width {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            pm.set(
                x as usize,
                y as usize,
                Color::new(r.powf(exponent), g.powf(exponent), b.powf(exponent), a),
            );
        }
    }

    pm
}

/// Writes a linear-light [`PixMap`] as an sRGB-encoded PNG, at 8 or 16 bits
/// per channel.
pub fn write_png(pm: &PixMap, path: &Path, sixteen_bit: bool) -> Result<(), PngError> {
    let display_path = path.display().to_string();
    let image = if sixteen_bit { encode_16bit(pm) } else { encode_8bit(pm) };

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| PngError::Write { path: display_path, source })
}

fn encode_8bit(pm: &PixMap) -> DynamicImage {
    let mut buf = image::RgbaImage::new(pm.width() as u32, pm.height() as u32);
    for y in 0..pm.height() {
        for x in 0..pm.width() {
            let c = pm.get(x, y);
            let r = (linear_to_srgb(c.r) * 255.0).round() as u8;
            let g = (linear_to_srgb(c.g) * 255.0).round() as u8;
            let b = (linear_to_srgb(c.b) * 255.0).round() as u8;
            let a = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            buf.put_pixel(x as u32, y as u32, image::Rgba([r, g, b, a]));
        }
    }
    DynamicImage::ImageRgba8(buf)
}

fn encode_16bit(pm: &PixMap) -> DynamicImage {
    let mut buf = image::ImageBuffer::<image::Rgba<u16>, Vec<u16>>::new(pm.width() as u32, pm.height() as u32);
    for y in 0..pm.height() {
        for x in 0..pm.width() {
            let c = pm.get(x, y);
            let r = (linear_to_srgb(c.r) * 65535.0).round() as u16;
            let g = (linear_to_srgb(c.g) * 65535.0).round() as u16;
            let b = (linear_to_srgb(c.b) * 65535.0).round() as u16;
            let a = (c.a.clamp(0.0, 1.0) * 65535.0).round() as u16;
            buf.put_pixel(x as u32, y as u32, image::Rgba([r, g, b, a]));
        }
    }
    DynamicImage::ImageRgba16(buf)
}

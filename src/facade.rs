//! Assembles a source chain from CLI arguments and drives a sink to produce
//! the output PNG. This is the only module that ties the CLI, source, filter
//! and sink layers together.

use std::path::PathBuf;
use std::str::FromStr;

use log::{error, info};
use thiserror::Error;

use crate::cli::{Args, GeneratorKind, InputKind, OutputKind};
use crate::coord::DEG_TO_RAD;
use crate::error::RenderError;
use crate::filter::{CosineBlur, MatrixTransform};
use crate::matrix::Matrix3;
use crate::pixmap::PixMap;
use crate::png_io;
use crate::sink;
use crate::source::{CubeReader, GridGenerator, LatLongReader, RenderFlags, Source};

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("argument error: {0}")]
    Argument(String),

    #[error(transparent)]
    Png(#[from] png_io::PngError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("cube map input error: {0}")]
    CubeInput(#[from] crate::source::CubeReaderError),
}

/// Runs the whole pipeline described by `args`: load or generate a source,
/// wrap it in the requested filters, render through the requested sink, and
/// write the output PNG. Returns the output path on success.
pub fn run(args: &Args) -> Result<PathBuf, FacadeError> {
    let (output_kind, output_path) = parse_type_path::<OutputKind>(&args.output, "output")?;
    let size = args.size.unwrap_or_else(|| output_kind.default_size());
    let flags = RenderFlags { fast: args.fast, jitter: args.jitter };

    let mut source = build_source(args)?;

    if let Some(matrix) = rotation_matrix(args)
        && !matrix.is_identity()
    {
        source = Box::new(MatrixTransform::new(source, matrix));
    }

    if let Some(scales) = &args.cosblur {
        let (unmasked, masked) = (scales[0], scales[1]);
        source = Box::new(CosineBlur::new(source, size, unmasked, masked));
    }

    info!("rendering {output_kind:?} at size {size} -> {}", output_path.display());

    let mut progress: Box<dyn FnMut(usize, usize) -> bool> = if args.quiet {
        Box::new(|_n, _d| true)
    } else {
        Box::new(|n, d| {
            if let Some(pct) = (n * 100).checked_div(d) {
                eprint!("\rrendering: {pct:>3}%");
            }
            true
        })
    };

    let pm = render(output_kind, size, flags, source.as_ref(), &mut *progress)?;
    if !args.quiet {
        eprintln!();
    }

    png_io::write_png(&pm, &output_path, args.sixteen_bit)?;
    info!("wrote {}", output_path.display());

    Ok(output_path)
}

fn render(
    kind: OutputKind,
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut dyn FnMut(usize, usize) -> bool,
) -> Result<PixMap, RenderError> {
    match kind {
        OutputKind::LatLong => sink::render_lat_long(size, flags, source, progress),
        OutputKind::CubeVertical => sink::render_cube_vertical(size, flags, source, progress),
        OutputKind::CubeCross => sink::render_cube_cross(size, flags, source, progress),
        OutputKind::Mercator => sink::render_mercator(size, flags, source, progress),
        OutputKind::GallPeters => sink::render_gall_peters(size, flags, source, progress),
    }
}

fn build_source(args: &Args) -> Result<Box<dyn Source>, FacadeError> {
    if let Some(input) = &args.input {
        let (kind, path) = parse_type_path::<InputKind>(input, "input")?;
        let pm = png_io::read_png(&path)?;
        return Ok(match kind {
            InputKind::LatLong => Box::new(LatLongReader::new(pm)),
            InputKind::CubeVertical => Box::new(CubeReader::new_vertical(pm)?),
            InputKind::CubeCross => Box::new(CubeReader::new_cross(pm)?),
        });
    }

    if let Some(name) = &args.generate {
        return match GeneratorKind::from_str(name) {
            Ok(GeneratorKind::Grid1) => Ok(Box::new(GridGenerator::new())),
            Err(e) => Err(FacadeError::Argument(e)),
        };
    }

    Err(FacadeError::Argument("one of --input or --generate is required".into()))
}

/// Builds the rotate/flip transform matrix. Flip is applied first (innermost,
/// closest to the raw sampled direction), then the X, Z, Y rotation chain, so
/// `--flip --rotate 0 90 0` mirrors the source and then rotates the mirrored
/// result, matching how the two flags read left-to-right on the command
/// line. Returns `None` if neither flag is present.
fn rotation_matrix(args: &Args) -> Option<Matrix3> {
    if !args.flip && args.rotate.is_none() {
        return None;
    }

    let mut m = if args.flip { Matrix3::scale(-1.0, 1.0, 1.0) } else { Matrix3::identity() };

    if let Some(r) = &args.rotate {
        let (rx, rz, ry) = (r[0] * DEG_TO_RAD, r[2] * DEG_TO_RAD, r[1] * DEG_TO_RAD);
        m = Matrix3::rotate_x(rx).multiply(&m);
        m = Matrix3::rotate_z(rz).multiply(&m);
        m = Matrix3::rotate_y(ry).multiply(&m);
    }

    Some(m)
}

fn parse_type_path<T: FromStr<Err = String>>(pair: &[String], flag: &str) -> Result<(T, PathBuf), FacadeError> {
    match pair {
        [kind, path] => {
            let kind = T::from_str(kind).map_err(FacadeError::Argument)?;
            Ok((kind, PathBuf::from(path)))
        }
        _ => Err(FacadeError::Argument(format!("--{flag} requires exactly two arguments: type and path"))),
    }
}

pub fn log_error_chain(err: &anyhow::Error) {
    error!("{err}");
    for cause in err.chain().skip(1) {
        error!("caused by: {cause}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Vector;

    fn base_args() -> Args {
        Args {
            output: vec!["latlong".into(), "/tmp/does-not-matter.png".into()],
            input: None,
            generate: Some("grid1".into()),
            size: Some(8),
            fast: true,
            jitter: false,
            sixteen_bit: false,
            flip: false,
            rotate: None,
            cosblur: None,
            quiet: true,
            verbosity: 0,
            help: None,
        }
    }

    #[test]
    fn no_rotation_or_flip_yields_no_matrix() {
        let args = base_args();
        assert!(rotation_matrix(&args).is_none());
    }

    #[test]
    fn flip_alone_yields_a_reflection() {
        let mut args = base_args();
        args.flip = true;
        let m = rotation_matrix(&args).unwrap();
        assert!(!m.is_identity());
        let v = m.multiply_vector(Vector::X);
        assert!((v.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn build_source_requires_input_or_generate() {
        let mut args = base_args();
        args.generate = None;
        let err = match build_source(&args) {
            Ok(_) => panic!("expected an argument error"),
            Err(e) => e,
        };
        assert!(matches!(err, FacadeError::Argument(_)));
    }

    #[test]
    fn run_end_to_end_writes_a_png() {
        let dir = std::env::temp_dir().join(format!("sphereproj-facade-test-{:?}", std::thread::current().id()));
        std::fs::create_dir_all(&dir).unwrap();
        let out_path = dir.join("out.png");

        let mut args = base_args();
        args.output = vec!["cube".into(), out_path.to_string_lossy().into_owned()];

        let result = run(&args).unwrap();
        assert_eq!(result, out_path);
        assert!(out_path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}

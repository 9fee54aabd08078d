//! Command-line argument surface.

use std::str::FromStr;

use clap::{ArgAction, Parser};

/// Long option names accepted by [`Args`]. The original tool treats `-name`
/// and `--name` as equivalent for any multi-character option, reserving a
/// single dash plus a single character for short forms; `clap` only
/// recognizes the double-dash spelling for long names, so [`normalize_args`]
/// rewrites single-dash multi-character tokens that match one of these
/// before `Args` ever sees them.
const LONG_FLAGS: &[&str] = &[
    "output",
    "input",
    "generate",
    "size",
    "fast",
    "jitter",
    "sixteen-bit",
    "cosblur",
    "flip",
    "rotate",
    "help",
    "version",
    "quiet",
    "verbose",
];

/// Rewrites `-name` to `--name` for any token whose keyword (the part after
/// one leading dash, before an optional `=value`) matches a known long
/// option. Single-character shortcuts (`-o`, `-F`, ...) and non-matching
/// tokens (including negative numbers like `-45`) pass through unchanged.
pub fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-') else { return arg };
            if rest.starts_with('-') || rest.chars().count() <= 1 {
                return arg;
            }

            let (name, value) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };

            if !LONG_FLAGS.contains(&name) {
                return arg;
            }

            match value {
                Some(value) => format!("--{name}={value}"),
                None => format!("--{name}"),
            }
        })
        .collect()
}

/// Reprojects a planet texture between equirectangular, cube-map, Mercator
/// and Gall-Peters layouts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
pub struct Args {
    /// Output projection and destination path.
    #[arg(short = 'o', long = "output", value_names = ["TYPE", "PATH"], num_args = 2, required = true)]
    pub output: Vec<String>,

    /// Read the source texture from a PNG file.
    #[arg(short = 'i', long = "input", value_names = ["TYPE", "PATH"], num_args = 2)]
    pub input: Option<Vec<String>>,

    /// Use a procedural source instead of `--input`.
    #[arg(short = 'g', long = "generate", value_name = "NAME")]
    pub generate: Option<String>,

    /// Output base size in pixels.
    #[arg(short = 'S', long = "size")]
    pub size: Option<usize>,

    /// Use the coarse 3x3 sample grid instead of the full 11x11 grid.
    #[arg(short = 'F', long = "fast")]
    pub fast: bool,

    /// Randomize sample positions within each grid cell.
    #[arg(short = 'J', long = "jitter")]
    pub jitter: bool,

    /// Emit a 16-bit-per-channel PNG instead of 8-bit.
    #[arg(long = "sixteen-bit")]
    pub sixteen_bit: bool,

    /// Mirror the source through the YZ plane before rendering.
    #[arg(short = 'L', long = "flip")]
    pub flip: bool,

    /// Rotate the source before rendering: degrees, applied X then Z then Y.
    #[arg(short = 'R', long = "rotate", value_names = ["RX", "RY", "RZ"], num_args = 3, allow_negative_numbers = true)]
    pub rotate: Option<Vec<f32>>,

    /// Apply a cosine-weighted hemispheric blur, turning an environment map
    /// into a diffuse light map: unmasked scale, then masked (alpha=1) scale.
    #[arg(long = "cosblur", value_names = ["UNMASKED_SCALE", "MASKED_SCALE"], num_args = 2, allow_negative_numbers = true)]
    pub cosblur: Option<Vec<f32>>,

    /// Suppress progress output.
    #[arg(short = 'Q', long = "quiet")]
    pub quiet: bool,

    /// Increase log verbosity (repeatable): warn -> info -> debug -> trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Print usage and projection descriptions.
    #[arg(short = 'H', long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Input projection keywords accepted by `--input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    LatLong,
    CubeVertical,
    CubeCross,
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latlong" | "l" => Ok(InputKind::LatLong),
            "cube" | "c" => Ok(InputKind::CubeVertical),
            "cubex" | "x" => Ok(InputKind::CubeCross),
            other => Err(format!("unknown input type '{other}'")),
        }
    }
}

/// Output projection keywords accepted by `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    LatLong,
    CubeVertical,
    CubeCross,
    Mercator,
    GallPeters,
}

impl OutputKind {
    /// The default base size for this projection when `--size` is omitted.
    pub fn default_size(self) -> usize {
        match self {
            OutputKind::LatLong => 2048,
            OutputKind::CubeVertical => 1024,
            OutputKind::CubeCross => 1024,
            OutputKind::Mercator => 2048,
            OutputKind::GallPeters => 2048,
        }
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latlong" | "l" => Ok(OutputKind::LatLong),
            "cube" | "c" => Ok(OutputKind::CubeVertical),
            "cubex" | "x" => Ok(OutputKind::CubeCross),
            "mercator" | "m" => Ok(OutputKind::Mercator),
            "gall-peters" | "g" => Ok(OutputKind::GallPeters),
            other => Err(format!("unknown output type '{other}'")),
        }
    }
}

/// Procedural generator keywords accepted by `--generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Grid1,
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid1" | "g" => Ok(GeneratorKind::Grid1),
            other => Err(format!("unknown generator '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_kind_accepts_long_and_short_keywords() {
        assert_eq!("latlong".parse(), Ok(InputKind::LatLong));
        assert_eq!("l".parse(), Ok(InputKind::LatLong));
        assert_eq!("cubex".parse(), Ok(InputKind::CubeCross));
    }

    #[test]
    fn output_kind_rejects_unknown_keyword() {
        assert!(OutputKind::from_str("nonsense").is_err());
    }

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_dash_long_keyword_is_rewritten() {
        let out = normalize_args(strs(&["sphereproj", "-output", "latlong", "out.png"]));
        assert_eq!(out, strs(&["sphereproj", "--output", "latlong", "out.png"]));
    }

    #[test]
    fn single_dash_long_keyword_with_equals_value_is_rewritten() {
        let out = normalize_args(strs(&["sphereproj", "-size=512"]));
        assert_eq!(out, strs(&["sphereproj", "--size=512"]));
    }

    #[test]
    fn single_char_shortcut_is_left_alone() {
        let out = normalize_args(strs(&["sphereproj", "-o", "latlong", "out.png"]));
        assert_eq!(out, strs(&["sphereproj", "-o", "latlong", "out.png"]));
    }

    #[test]
    fn double_dash_long_keyword_is_left_alone() {
        let out = normalize_args(strs(&["sphereproj", "--output", "latlong", "out.png"]));
        assert_eq!(out, strs(&["sphereproj", "--output", "latlong", "out.png"]));
    }

    #[test]
    fn negative_number_is_not_mistaken_for_a_flag() {
        let out = normalize_args(strs(&["sphereproj", "-R", "-45", "0", "0"]));
        assert_eq!(out, strs(&["sphereproj", "-R", "-45", "0", "0"]));
    }

    #[test]
    fn unknown_single_dash_keyword_is_left_alone_for_clap_to_reject() {
        let out = normalize_args(strs(&["sphereproj", "-bogus"]));
        assert_eq!(out, strs(&["sphereproj", "-bogus"]));
    }

    #[test]
    fn default_sizes_match_each_projection() {
        assert_eq!(OutputKind::LatLong.default_size(), 2048);
        assert_eq!(OutputKind::CubeVertical.default_size(), 1024);
        assert_eq!(OutputKind::GallPeters.default_size(), 2048);
    }
}

use crate::config::DEFAULT_INPUT_SIZE;
use std::fmt;
use std::str::FromStr;

/// In-memory byte layout of one 32-bit pixel.
///
/// The alpha slot is never read back: it is written as fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Skip-first ARGB: padding byte, then red, green, blue.
    #[default]
    Argb32,
    Bgra32,
    Rgba32,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }

    /// Byte offsets of the red, green and blue channels within a pixel.
    pub const fn rgb_offsets(self) -> [usize; 3] {
        match self {
            PixelFormat::Argb32 => [1, 2, 3],
            PixelFormat::Bgra32 => [2, 1, 0],
            PixelFormat::Rgba32 => [0, 1, 2],
        }
    }

    pub const fn alpha_offset(self) -> usize {
        match self {
            PixelFormat::Argb32 => 0,
            PixelFormat::Bgra32 | PixelFormat::Rgba32 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::Argb32 => "argb32",
            PixelFormat::Bgra32 => "bgra32",
            PixelFormat::Rgba32 => "rgba32",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "argb32" | "argb" => Ok(PixelFormat::Argb32),
            "bgra32" | "bgra" => Ok(PixelFormat::Bgra32),
            "rgba32" | "rgba" => Ok(PixelFormat::Rgba32),
            other => Err(format!("unsupported pixel format: {other}")),
        }
    }
}

/// Shape and layout a model expects for its single image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

impl InputSpec {
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            pixel_format,
        }
    }
}

impl Default for InputSpec {
    fn default() -> Self {
        Self::new(
            DEFAULT_INPUT_SIZE.0,
            DEFAULT_INPUT_SIZE.1,
            PixelFormat::default(),
        )
    }
}

impl fmt::Display for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
    }
}

use crate::error::AllocationError;
use image::DynamicImage;
use std::path::Path;

/// A decoded photo of arbitrary size and colour depth.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an encoded image (JPEG, PNG) held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, AllocationError> {
        Ok(Self::new(image::load_from_memory(bytes)?))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, AllocationError> {
        Ok(Self::new(image::open(path)?))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Packed RGB with any transparency composited over opaque black.
    pub(crate) fn to_opaque_rgb(&self) -> Vec<u8> {
        if !self.image.color().has_alpha() {
            return self.image.to_rgb8().into_raw();
        }

        let rgba = self.image.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        for px in rgba.as_raw().chunks_exact(4) {
            let alpha = px[3] as u16;
            rgb.extend(px[..3].iter().map(|&c| ((c as u16 * alpha + 127) / 255) as u8));
        }
        rgb
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

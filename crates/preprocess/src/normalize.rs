use crate::buffer::ModelInputBuffer;
use crate::context::{BitmapContext, Origin};
use crate::error::AllocationError;
use crate::layout::{InputSpec, PixelFormat};
use crate::source::SourceImage;
use common::span;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};

/// Produces model-ready buffers for a fixed [`InputSpec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    spec: InputSpec,
}

impl Normalizer {
    pub fn new(spec: InputSpec) -> Self {
        Self { spec }
    }

    pub fn normalize(&self, source: &SourceImage) -> Result<ModelInputBuffer, AllocationError> {
        normalize(
            source,
            self.spec.width,
            self.spec.height,
            self.spec.pixel_format,
        )
    }
}

/// Stretch `source` over a `target_width` x `target_height` buffer in
/// `pixel_format`.
///
/// Aspect ratio is not preserved: non-square photos are distorted rather
/// than letterboxed.
pub fn normalize(
    source: &SourceImage,
    target_width: u32,
    target_height: u32,
    pixel_format: PixelFormat,
) -> Result<ModelInputBuffer, AllocationError> {
    let _s = span!("normalize");

    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(AllocationError::EmptySource { width, height });
    }

    tracing::trace!(
        width,
        height,
        target_width,
        target_height,
        format = %pixel_format,
        "Normalizing source image"
    );

    let mut buffer = ModelInputBuffer::allocate(target_width, target_height, pixel_format)?;
    let resized = resample(source, target_width, target_height)?;

    {
        let mut lock = buffer.lock();
        let mut ctx = BitmapContext::new(&mut lock, Origin::BottomLeft);
        ctx.flip_to_top_left();
        ctx.draw_rgb(resized.buffer(), target_width, target_height);
    }

    Ok(buffer)
}

fn resample(
    source: &SourceImage,
    width: u32,
    height: u32,
) -> Result<Image<'static>, AllocationError> {
    let _s = span!("resample");

    let rgb = source.to_opaque_rgb();
    let src = ImageRef::new(source.width(), source.height(), &rgb, PixelType::U8x3)?;

    let len = width as usize * height as usize * 3;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| AllocationError::OutOfMemory { bytes: len })?;
    pixels.resize(len, 0);

    let mut resized = Image::from_vec_u8(width, height, pixels, PixelType::U8x3)?;

    Resizer::new().resize(
        &src,
        &mut resized,
        &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
    )?;

    Ok(resized)
}

use thiserror::Error;

/// Failure to produce a model input buffer. The request is aborted and the
/// source image is left untouched.
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Source image has zero area ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    #[error("Target buffer has zero area ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },

    #[error("Source image could not be decoded: {0}")]
    Undecodable(#[from] image::ImageError),

    #[error("Failed to reserve {bytes} bytes for pixel buffer")]
    OutOfMemory { bytes: usize },

    #[error("Pixel buffer rejected: {0}")]
    InvalidBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Resampling failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),
}

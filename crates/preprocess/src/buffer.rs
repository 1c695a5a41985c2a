use crate::config::ROW_ALIGNMENT;
use crate::error::AllocationError;
use crate::layout::{InputSpec, PixelFormat};
use std::ops::{Deref, DerefMut};

/// Fixed-size 32-bit pixel buffer handed to the classifier.
///
/// Rows are stored top to bottom and padded to [`ROW_ALIGNMENT`] bytes.
#[derive(Debug, Clone)]
pub struct ModelInputBuffer {
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl ModelInputBuffer {
    /// Allocate a zeroed buffer. Fails instead of aborting when the memory
    /// cannot be reserved.
    pub fn allocate(
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
    ) -> Result<Self, AllocationError> {
        if width == 0 || height == 0 {
            return Err(AllocationError::EmptyTarget { width, height });
        }

        let packed_row = (width as usize)
            .checked_mul(pixel_format.bytes_per_pixel())
            .ok_or(AllocationError::OutOfMemory { bytes: usize::MAX })?;
        let bytes_per_row = packed_row.next_multiple_of(ROW_ALIGNMENT);
        let len = bytes_per_row
            .checked_mul(height as usize)
            .ok_or(AllocationError::OutOfMemory { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| AllocationError::OutOfMemory { bytes: len })?;
        data.resize(len, 0);

        tracing::trace!(
            width,
            height,
            format = %pixel_format,
            bytes_per_row,
            "Allocated pixel buffer"
        );

        Ok(Self {
            width,
            height,
            pixel_format,
            bytes_per_row,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn spec(&self) -> InputSpec {
        InputSpec::new(self.width, self.height, self.pixel_format)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Lock the base address for direct writes. The lock is released when
    /// the guard is dropped.
    pub fn lock(&mut self) -> BaseAddressLock<'_> {
        tracing::trace!("Locking pixel buffer base address");
        BaseAddressLock {
            width: self.width,
            height: self.height,
            pixel_format: self.pixel_format,
            bytes_per_row: self.bytes_per_row,
            pixels: &mut self.data,
        }
    }

    /// Red, green and blue of the pixel at (`x`, `y`), `y` counted from the top.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        let base = y as usize * self.bytes_per_row + x as usize * self.pixel_format.bytes_per_pixel();
        self.pixel_format.rgb_offsets().map(|offset| self.data[base + offset])
    }
}

/// Exclusive write access to a locked [`ModelInputBuffer`].
pub struct BaseAddressLock<'a> {
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    bytes_per_row: usize,
    pixels: &'a mut [u8],
}

impl BaseAddressLock<'_> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }
}

impl Deref for BaseAddressLock<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &*self.pixels
    }
}

impl DerefMut for BaseAddressLock<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut *self.pixels
    }
}

impl Drop for BaseAddressLock<'_> {
    fn drop(&mut self) {
        tracing::trace!("Unlocking pixel buffer base address");
    }
}

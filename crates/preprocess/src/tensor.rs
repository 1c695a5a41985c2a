use crate::buffer::ModelInputBuffer;
use common::span;
use ndarray::{Array, IxDyn, ShapeError};

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

impl ModelInputBuffer {
    /// Planar `[1, 3, H, W]` tensor in RGB order, scaled to 0-1 and then
    /// standardized with `mean` / `std`.
    pub fn to_nchw_tensor(
        &self,
        mean: [f32; 3],
        std: [f32; 3],
    ) -> Result<Array<f32, IxDyn>, ShapeError> {
        let _s = span!("to_nchw_tensor");

        let width = self.width() as usize;
        let height = self.height() as usize;
        let spatial = width * height;
        let bpp = self.pixel_format().bytes_per_pixel();
        let [r_off, g_off, b_off] = self.pixel_format().rgb_offsets();

        let mut output = vec![0.0f32; 3 * spatial];

        for (y, row) in self
            .as_bytes()
            .chunks_exact(self.bytes_per_row())
            .enumerate()
        {
            for (x, px) in row[..width * bpp].chunks_exact(bpp).enumerate() {
                let i = y * width + x;
                let r = px[r_off] as f32 / 255.0;
                let g = px[g_off] as f32 / 255.0;
                let b = px[b_off] as f32 / 255.0;

                output[i] = (r - mean[0]) / std[0];
                output[i + spatial] = (g - mean[1]) / std[1];
                output[i + 2 * spatial] = (b - mean[2]) / std[2];
            }
        }

        Array::from_shape_vec(IxDyn(&[1, 3, height, width]), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelFormat, SourceImage, normalize};
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn test_tensor_shape_and_identity_scaling() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 51]));
        let source = SourceImage::new(DynamicImage::ImageRgb8(img));
        let buffer = normalize(&source, 3, 2, PixelFormat::Bgra32).unwrap();

        let tensor = buffer.to_nchw_tensor([0.0; 3], [1.0; 3]).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 2, 3]);
        assert!((tensor[[0, 0, 1, 2]] - 1.0).abs() < 1e-6);
        assert!(tensor[[0, 1, 1, 2]].abs() < 1e-6);
        assert!((tensor[[0, 2, 0, 0]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_imagenet_normalization() {
        // Mid gray 128 (0.502) with ImageNet norm:
        //   R: (0.502 - 0.485) / 0.229 ≈ 0.074
        //   G: (0.502 - 0.456) / 0.224 ≈ 0.205
        //   B: (0.502 - 0.406) / 0.225 ≈ 0.427
        let img = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        let source = SourceImage::new(DynamicImage::ImageRgb8(img));
        let buffer = normalize(&source, 224, 224, PixelFormat::Argb32).unwrap();

        let tensor = buffer.to_nchw_tensor(IMAGENET_MEAN, IMAGENET_STD).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let r = tensor[[0, 0, 112, 112]];
        let g = tensor[[0, 1, 112, 112]];
        let b = tensor[[0, 2, 112, 112]];
        assert!((r - 0.074).abs() < 0.01, "R channel should be ~0.074 (got {r})");
        assert!((g - 0.205).abs() < 0.01, "G channel should be ~0.205 (got {g})");
        assert!((b - 0.427).abs() < 0.01, "B channel should be ~0.427 (got {b})");
    }

    #[test]
    fn test_row_padding_is_skipped() {
        // width 3 -> 12 packed bytes padded to 64, so padding must not leak
        // into the next row's pixels
        let img = RgbImage::from_fn(3, 2, |_, y| if y == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let source = SourceImage::new(DynamicImage::ImageRgb8(img));
        let buffer = normalize(&source, 3, 2, PixelFormat::Rgba32).unwrap();
        assert!(buffer.bytes_per_row() > 12);

        let tensor = buffer.to_nchw_tensor([0.0; 3], [1.0; 3]).unwrap();
        for x in 0..3 {
            assert!(tensor[[0, 0, 0, x]] < 0.5);
            assert!(tensor[[0, 0, 1, x]] > 0.5);
        }
    }
}

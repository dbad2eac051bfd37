use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
    #[error("Image of {width}x{height} is too large to process after resizing")]
    TooLarge { width: u32, height: u32 },
}

/// Upper bound on the resized image, about 1500 × 16000.
pub const MAX_OUTPUT_PIXELS: u64 = 24_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Output width in pixels; small photos are upscaled to it.
    pub target_width: u32,
    /// Luma at or above this becomes white, below becomes black.
    pub threshold: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self { target_width: 1500, threshold: 160 }
    }
}

/// Process raw image bytes (JPEG / PNG / WEBP / …) and return binarized PNG bytes.
pub fn prepare_for_ocr_from_bytes(
    data: &[u8],
    options: PreprocessOptions,
) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(clean(img, options)?)
}

/// Resize → grayscale → contrast stretch → sharpen → binarize.
fn clean(img: DynamicImage, options: PreprocessOptions) -> Result<DynamicImage, PreprocessError> {
    let img = resize_to_width(img, options.target_width)?;
    let gray = stretch_contrast(img.to_luma8());
    let sharp = imageops::unsharpen(&gray, 1.0, 2);
    Ok(DynamicImage::ImageLuma8(binarize(&sharp, options.threshold)))
}

/// Rejects anything whose output would exceed [`MAX_OUTPUT_PIXELS`], checked before allocating.
fn resize_to_width(img: DynamicImage, width: u32) -> Result<DynamicImage, PreprocessError> {
    let (w, h) = (img.width() as u64, img.height() as u64);
    let (out_w, out_h) = if width == 0 || w == 0 || w == width as u64 {
        (w, h)
    } else {
        (width as u64, (h * width as u64 / w).max(1))
    };

    if out_w * out_h > MAX_OUTPUT_PIXELS || out_h > u32::MAX as u64 {
        return Err(PreprocessError::TooLarge { width: img.width(), height: img.height() });
    }
    if (out_w, out_h) == (w, h) {
        return Ok(img);
    }
    Ok(img.resize_exact(out_w as u32, out_h as u32, FilterType::Lanczos3))
}

fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min_px, max_px) = gray
        .pixels()
        .fold((255u8, 0u8), |(mn, mx), p| (mn.min(p[0]), mx.max(p[0])));

    if max_px == min_px {
        // Uniform image — nothing to stretch.
        return gray;
    }

    let range = (max_px - min_px) as u32;
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0];
        Luma([((p - min_px) as u32 * 255 / range) as u8])
    })
}

fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] >= threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(width, height, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }

    fn gradient_gray(width: u32, height: u32) -> GrayImage {
        ImageBuffer::from_fn(width, height, |x, _| Luma([(x * 255 / width) as u8]))
    }

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn small_image_is_upscaled_to_target_width() {
        let out = clean(solid_gray(100, 50, 128), PreprocessOptions::default()).unwrap();
        assert_eq!(out.width(), 1500);
        assert_eq!(out.height(), 750);
    }

    #[test]
    fn large_image_is_downscaled() {
        let out = resize_to_width(solid_gray(3000, 1000, 200), 1500).unwrap();
        assert_eq!((out.width(), out.height()), (1500, 500));
    }

    #[test]
    fn tall_sliver_is_rejected_before_resizing() {
        let err = resize_to_width(solid_gray(1, 4000, 200), 1500).unwrap_err();
        assert!(matches!(err, PreprocessError::TooLarge { width: 1, height: 4000 }));
    }

    #[test]
    fn tiny_sliver_upload_is_rejected() {
        let sliver = png_bytes(&solid_gray(1, 40, 200));
        let err = prepare_for_ocr_from_bytes(&sliver, PreprocessOptions::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::TooLarge { .. }));
    }

    #[test]
    fn gradient_stretches_to_full_range() {
        let gray = stretch_contrast(gradient_gray(256, 1));
        let min = gray.pixels().map(|p| p[0]).min().unwrap();
        let max = gray.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn uniform_image_is_left_alone() {
        let gray = stretch_contrast(solid_gray(10, 10, 128).to_luma8());
        assert!(gray.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn binarize_produces_only_black_and_white() {
        let out = binarize(&gradient_gray(256, 4), 160);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(255, 0)[0], 255);
    }

    #[test]
    fn prepare_from_bytes_produces_png_header() {
        let options = PreprocessOptions { target_width: 8, threshold: 160 };
        let result = prepare_for_ocr_from_bytes(&png_bytes(&solid_gray(4, 4, 100)), options).unwrap();
        // PNG magic bytes: 0x89 0x50 0x4E 0x47
        assert_eq!(&result[..4], b"\x89PNG");
    }

    #[test]
    fn undecodable_bytes_are_a_load_error() {
        let err = prepare_for_ocr_from_bytes(b"not an image", PreprocessOptions::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::Load(_)));
    }
}

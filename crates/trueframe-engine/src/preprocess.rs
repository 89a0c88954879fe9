//! Frame preprocessing for classifier input.

use image::{DynamicImage, ImageBuffer, Rgb};

use crate::config::{MODEL_INPUT_SIZE, NORMALIZE_MEAN, NORMALIZE_STD};
use crate::error::{EngineError, EngineResult};
use crate::sampler::RgbFrame;

/// A normalized classifier input tensor in CHW layout.
///
/// Dimensions and normalization must match what the loaded model was
/// calibrated for; a mismatch is a configuration defect, not a runtime
/// condition to recover from.
#[derive(Debug, Clone)]
pub struct FrameTensor {
    /// `3 * MODEL_INPUT_SIZE * MODEL_INPUT_SIZE` floats, CHW
    pub data: Vec<f32>,
}

impl FrameTensor {
    /// Number of floats in one tensor.
    pub const LEN: usize = 3 * (MODEL_INPUT_SIZE as usize) * (MODEL_INPUT_SIZE as usize);
}

/// Convert a decoded frame into the classifier's input tensor.
///
/// Resizes to the fixed square resolution, scales pixels to [0, 1], and
/// applies the per-channel mean/std normalization. Deterministic; the only
/// failure mode is a frame whose buffer does not match its dimensions.
pub fn preprocess_frame(frame: &RgbFrame) -> EngineResult<FrameTensor> {
    let expected_len = (frame.width * frame.height * 3) as usize;
    if frame.data.len() != expected_len {
        return Err(EngineError::internal(format!(
            "Invalid frame data length: expected {}, got {}",
            expected_len,
            frame.data.len()
        )));
    }

    let img_buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| EngineError::internal("Failed to create image buffer"))?;

    let resized = DynamicImage::ImageRgb8(img_buffer).resize_exact(
        MODEL_INPUT_SIZE,
        MODEL_INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let rgb = resized.to_rgb8();

    let size = MODEL_INPUT_SIZE as usize;
    let mut data = vec![0f32; FrameTensor::LEN];

    // HWC -> CHW with [0,1] scaling and per-channel normalization
    for c in 0..3 {
        let offset = c * size * size;
        for y in 0..size {
            for x in 0..size {
                let pixel = rgb.get_pixel(x as u32, y as u32);
                let value = pixel[c] as f32 / 255.0;
                data[offset + y * size + x] = (value - NORMALIZE_MEAN[c]) / NORMALIZE_STD[c];
            }
        }
    }

    Ok(FrameTensor { data })
}

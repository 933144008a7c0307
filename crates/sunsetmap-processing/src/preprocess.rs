//! Image decoding and normalization
//!
//! Decodes an arbitrary supported encoding into RGB, resizes to 224x224
//! with bilinear interpolation, and rescales each channel with
//! `px / 127.5 - 1.0`, the affine transform the classifier was trained
//! with.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageReader;

use crate::tensor::{ImageTensor, INPUT_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image buffer is empty")]
    Empty,

    #[error("unrecognized image format: {0}")]
    UnknownFormat(String),

    #[error("failed to decode image: {0}")]
    Malformed(String),
}

/// Decode and normalize an uploaded image into the classifier's input
/// tensor.
pub fn normalize(image_bytes: &[u8]) -> Result<ImageTensor, DecodeError> {
    if image_bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(image_bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::UnknownFormat(e.to_string()))?;
    let decoded = reader
        .decode()
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let rgb = decoded.to_rgb8();
    // Triangle filter = bilinear.
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let mut data = Vec::with_capacity(ImageTensor::len());
    for pixel in resized.pixels() {
        for channel in 0..3 {
            data.push(f32::from(pixel[channel]) / 127.5 - 1.0);
        }
    }

    Ok(ImageTensor::from_data(data))
}

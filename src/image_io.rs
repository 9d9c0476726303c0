//! Grayscale image adapter.
//!
//! Thin bridge between PNG/JPEG files and [`Matrix`] values. Decoding
//! produces a `(height, width)` matrix with one value per pixel in `[0, 1]`,
//! either the RGB average or a single caller-selected channel; alpha is
//! ignored. Encoding treats cells as notionally in `[0, 1]`, scales by 255,
//! truncates, and silently clamps into `[0, 255]` before writing an 8-bit
//! grayscale pixel.

use crate::matrix::Matrix;
use image::{GrayImage, ImageFormat, Luma};
use std::path::Path;
use thiserror::Error;

/// Image adapter failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Decoding or encoding failed (includes file i/o).
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Which pixel component becomes the cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// Average of the three RGB channels.
    #[default]
    Gray,
    /// Red channel only.
    Red,
    /// Green channel only.
    Green,
    /// Blue channel only.
    Blue,
}

/// Decodes a PNG or JPEG file into a grayscale matrix.
///
/// # Errors
///
/// Returns [`Error::Image`] when the file cannot be read or decoded.
pub fn read(path: impl AsRef<Path>) -> Result<Matrix, Error> {
    read_channel(path, Channel::Gray)
}

/// Decodes a PNG or JPEG file into a matrix from one pixel component.
///
/// # Errors
///
/// Returns [`Error::Image`] when the file cannot be read or decoded.
pub fn read_channel(path: impl AsRef<Path>, channel: Channel) -> Result<Matrix, Error> {
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let p = img.get_pixel(x, y);
            let v = match channel {
                Channel::Gray => (f64::from(p[0]) + f64::from(p[1]) + f64::from(p[2])) / 765.0,
                Channel::Red => f64::from(p[0]) / 255.0,
                Channel::Green => f64::from(p[1]) / 255.0,
                Channel::Blue => f64::from(p[2]) / 255.0,
            };
            data.push(v);
        }
    }
    Ok(Matrix::from_raw(height as usize, width as usize, data))
}

/// Maps a cell to an 8-bit gray level: scale by 255, truncate, clamp.
fn gray_level(v: f64) -> u8 {
    ((v * 255.0) as i64).clamp(0, 255) as u8
}

fn to_gray_image(matrix: &Matrix) -> GrayImage {
    let width = matrix.cols() as u32;
    let height = matrix.rows() as u32;
    let mut img = GrayImage::new(width, height);
    for (idx, &v) in matrix.as_slice().iter().enumerate() {
        let x = (idx % matrix.cols()) as u32;
        let y = (idx / matrix.cols()) as u32;
        img.put_pixel(x, y, Luma([gray_level(v)]));
    }
    img
}

/// Writes the matrix as a grayscale PNG.
///
/// # Errors
///
/// Returns [`Error::Image`] when encoding or writing fails.
pub fn write_png(matrix: &Matrix, path: impl AsRef<Path>) -> Result<(), Error> {
    to_gray_image(matrix).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Writes the matrix as a grayscale JPEG.
///
/// # Errors
///
/// Returns [`Error::Image`] when encoding or writing fails.
pub fn write_jpeg(matrix: &Matrix, path: impl AsRef<Path>) -> Result<(), Error> {
    to_gray_image(matrix).save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

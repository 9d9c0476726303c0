//! Fixed-header WAV adapter.
//!
//! Reads and writes mono 16-bit PCM files at 44.1 kHz with the classic
//! 44-byte header, the only layout the original tooling produced. Decoding
//! yields a single-row matrix of samples normalized by 32768 into
//! `[-1, 1)`; a trailing odd byte is ignored. Encoding flattens any shape
//! row-major, clamps to `[-1, 1]`, rounds after scaling by 32767, clamps to
//! the 16-bit signed range, and serializes little-endian.

use crate::matrix::Matrix;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs;
use std::io::Cursor;
use std::io::Write as _;
use std::path::Path;
use thiserror::Error;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 44;

const SAMPLE_RATE: u32 = 44_100;

/// WAV adapter failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is shorter than the fixed header.
    #[error("file holds {len} bytes, shorter than the {HEADER_LEN}-byte wav header")]
    TooShort {
        /// Bytes actually present.
        len: usize,
    },
}

/// Reads a fixed-header WAV file into a single-row matrix of samples in
/// `[-1, 1)`.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures and [`Error::TooShort`]
/// when the file cannot hold the header.
pub fn read(path: impl AsRef<Path>) -> Result<Matrix, Error> {
    let bytes = fs::read(path)?;
    if bytes.len() < HEADER_LEN {
        return Err(Error::TooShort { len: bytes.len() });
    }
    let body = &bytes[HEADER_LEN..];
    let count = body.len() / 2;
    let mut cursor = Cursor::new(body);
    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        let sample = cursor.read_i16::<LittleEndian>()?;
        data.push(f64::from(sample) / 32768.0);
    }
    Ok(Matrix::from_raw(1, count, data))
}

/// Maps a cell to a PCM sample: clamp, scale by 32767, round, clamp again.
fn pcm_sample(v: f64) -> i16 {
    let scaled = (v.clamp(-1.0, 1.0) * 32767.0).round();
    scaled.clamp(-32768.0, 32767.0) as i16
}

/// Writes the matrix as a mono 16-bit 44.1 kHz WAV file, treating any shape
/// as a flat row-major sample sequence.
///
/// # Errors
///
/// Returns [`Error::Io`] when writing fails.
pub fn write(matrix: &Matrix, path: impl AsRef<Path>) -> Result<(), Error> {
    let samples = matrix.as_slice();
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    out.write_all(b"RIFF")?;
    out.write_u32::<LittleEndian>(data_len + 36)?;
    out.write_all(b"WAVE")?;
    out.write_all(b"fmt ")?;
    out.write_u32::<LittleEndian>(16)?; // fmt chunk size
    out.write_u16::<LittleEndian>(1)?; // PCM
    out.write_u16::<LittleEndian>(1)?; // mono
    out.write_u32::<LittleEndian>(SAMPLE_RATE)?;
    out.write_u32::<LittleEndian>(SAMPLE_RATE * 2)?; // byte rate
    out.write_u16::<LittleEndian>(2)?; // block align
    out.write_u16::<LittleEndian>(16)?; // bits per sample
    out.write_all(b"data")?;
    out.write_u32::<LittleEndian>(data_len)?;
    for &v in samples {
        out.write_i16::<LittleEndian>(pcm_sample(v))?;
    }
    fs::write(path, out)?;
    Ok(())
}

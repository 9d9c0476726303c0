#![cfg(all(feature = "image", feature = "wave"))]

use convmat::{Matrix, image_io, matrix, wave};

#[test]
fn wave_round_trips_samples_within_quantization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");

    let samples = matrix![[0.0, 0.25, -0.5, 0.1, 1.0, -1.0, 2.5, -2.5]];
    wave::write(&samples, &path).unwrap();
    let back = wave::read(&path).unwrap();

    assert_eq!(back.rows(), 1);
    assert_eq!(back.cols(), samples.cols());
    let clamped = samples.hard_cut(-1.0, 1.0);
    for (a, b) in clamped.as_slice().iter().zip(back.as_slice()) {
        assert!((a - b).abs() <= 1.0 / 32767.0, "{a} vs {b}");
    }
}

#[test]
fn wave_files_carry_the_fixed_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header.wav");

    let samples = matrix![[0.5, -0.5, 0.25]];
    wave::write(&samples, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    assert_eq!(bytes.len(), wave::HEADER_LEN + 2 * samples.cols());
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[36..40], b"data");
    let data_len = u32::from_le_bytes(bytes[40..44].try_into().unwrap());
    assert_eq!(data_len as usize, 2 * samples.cols());
}

#[test]
fn wave_rejects_files_shorter_than_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stub.wav");
    std::fs::write(&path, b"RIFF").unwrap();
    assert!(matches!(wave::read(&path), Err(wave::Error::TooShort { .. })));
}

#[test]
fn wave_flattens_any_shape_row_major() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.wav");

    let grid = matrix![[0.25, 0.5], [-0.25, -0.5]];
    wave::write(&grid, &path).unwrap();
    let back = wave::read(&path).unwrap();
    assert_eq!(back.rows(), 1);
    assert_eq!(back.cols(), 4);
    for (a, b) in grid.as_slice().iter().zip(back.as_slice()) {
        assert!((a - b).abs() <= 1.0 / 32767.0);
    }
}

#[test]
fn png_round_trips_gray_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");

    let m = matrix![[0.0, 1.0], [0.25, 0.75]];
    image_io::write_png(&m, &path).unwrap();
    let back = image_io::read(&path).unwrap();

    assert_eq!(back.rows(), 2);
    assert_eq!(back.cols(), 2);
    // levels after scale-truncate-clamp: 0, 255, 63, 191
    let expected = [0.0, 255.0 / 255.0, 63.0 / 255.0, 191.0 / 255.0];
    for (a, b) in back.as_slice().iter().zip(expected) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }
}

#[test]
fn out_of_range_cells_clamp_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clamped.png");

    let m = matrix![[-4.0, 9.0]];
    image_io::write_png(&m, &path).unwrap();
    let back = image_io::read(&path).unwrap();
    assert_eq!(back.as_slice(), &[0.0, 1.0]);
}

#[test]
fn channel_reads_agree_on_gray_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channels.png");

    let m = matrix![[0.25, 0.5, 0.75]];
    image_io::write_png(&m, &path).unwrap();
    let gray = image_io::read_channel(&path, image_io::Channel::Gray).unwrap();
    let red = image_io::read_channel(&path, image_io::Channel::Red).unwrap();
    let blue = image_io::read_channel(&path, image_io::Channel::Blue).unwrap();
    assert_eq!(gray, red);
    assert_eq!(red, blue);
}

#[test]
fn jpeg_files_decode_to_the_written_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");

    let mut m = Matrix::zeros(16, 24);
    m.fill_random(0.0, 1.0);
    image_io::write_jpeg(&m, &path).unwrap();
    let back = image_io::read(&path).unwrap();
    assert_eq!(back.rows(), 16);
    assert_eq!(back.cols(), 24);
    // lossy codec: values stay in range but need not match exactly
    assert!(back.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
}

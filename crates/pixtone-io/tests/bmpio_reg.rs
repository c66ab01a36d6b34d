//! BMP I/O regression test
//!
//! Decodes hand-assembled BMP streams and checks row order, channel
//! order, padding handling, extended headers, and write/read round trips.

use pixtone_core::{ChannelLayout, PixelBuffer};
use pixtone_io::{IoError, decode, encode, read_image, write_image};
use pixtone_test::{BmpFixture, RegParams, fixtures};

const RED: (u8, u8, u8) = (255, 0, 0);
const GREEN: (u8, u8, u8) = (0, 255, 0);
const BLUE: (u8, u8, u8) = (0, 0, 255);
const WHITE: (u8, u8, u8) = (255, 255, 255);

fn rgb_tuple(pix: &PixelBuffer, x: u32, y: u32) -> (f64, f64, f64) {
    let (r, g, b) = pix.get_rgb(x, y).unwrap();
    (f64::from(r), f64::from(g), f64::from(b))
}

fn compare_rgb(rp: &mut RegParams, expected: (u8, u8, u8), actual: (f64, f64, f64)) {
    rp.compare_values(f64::from(expected.0), actual.0, 0.0);
    rp.compare_values(f64::from(expected.1), actual.1, 0.0);
    rp.compare_values(f64::from(expected.2), actual.2, 0.0);
}

#[test]
fn bmpio_reg_two_by_two() {
    let mut rp = RegParams::new("bmpio_2x2");

    // Red, green on top; blue, white on the bottom
    let bytes = BmpFixture::new(2, 2, vec![RED, GREEN, BLUE, WHITE]).bytes();
    let pix = decode(&bytes).unwrap();

    rp.compare_values(2.0, pix.width() as f64, 0.0);
    rp.compare_values(2.0, pix.height() as f64, 0.0);
    rp.compare_values(3.0, pix.channels() as f64, 0.0);
    compare_rgb(&mut rp, RED, rgb_tuple(&pix, 0, 0));
    compare_rgb(&mut rp, GREEN, rgb_tuple(&pix, 1, 0));
    compare_rgb(&mut rp, BLUE, rgb_tuple(&pix, 0, 1));
    compare_rgb(&mut rp, WHITE, rgb_tuple(&pix, 1, 1));
    rp.compare_strings(
        pix.data(),
        &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
    );

    assert!(rp.cleanup(), "bmpio 2x2 decode failed");
}

#[test]
fn bmpio_reg_padding_ignored() {
    let mut rp = RegParams::new("bmpio_padding");

    // Width 3 -> 9 pixel bytes + 3 padding bytes per row
    let pixels: Vec<_> = (0..6u8).map(|i| (i, i * 10, i * 20)).collect();
    let clean = decode(&BmpFixture::new(3, 2, pixels.clone()).bytes()).unwrap();
    let noisy = decode(
        &BmpFixture::new(3, 2, pixels)
            .with_padding_fill(0xAB)
            .bytes(),
    )
    .unwrap();

    rp.compare_buffers(&clean, &noisy);
    compare_rgb(&mut rp, (4, 40, 80), rgb_tuple(&noisy, 1, 1));
    rp.compare_values(0.0, if noisy.is_padded() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "bmpio padding test failed");
}

#[test]
fn bmpio_reg_extended_headers() {
    let mut rp = RegParams::new("bmpio_headers");

    let pixels = vec![RED, GREEN, BLUE, WHITE, RED, GREEN];
    let reference = decode(&BmpFixture::new(2, 3, pixels.clone()).bytes()).unwrap();

    for size in [108u32, 124] {
        let fixture = BmpFixture::new(2, 3, pixels.clone())
            .with_info_header_size(size)
            .with_gap(6);
        rp.compare_values(
            (14 + size + 6) as f64,
            fixture.data_offset() as f64,
            0.0,
        );
        let pix = decode(&fixture.bytes()).unwrap();
        rp.compare_buffers(&reference, &pix);
    }

    assert!(rp.cleanup(), "bmpio extended header test failed");
}

#[test]
fn bmpio_reg_rejects() {
    let mut rp = RegParams::new("bmpio_rejects");

    let is = |ok: bool| if ok { 1.0 } else { 0.0 };

    let r = decode(b"PNG....");
    rp.compare_values(1.0, is(matches!(r, Err(IoError::InvalidFormat(_)))), 0.0);

    let r = decode(&BmpFixture::new(1, 1, vec![RED]).with_bits_per_pixel(8).bytes());
    rp.compare_values(1.0, is(matches!(r, Err(IoError::UnsupportedFormat(_)))), 0.0);

    let r = decode(&BmpFixture::new(1, 0, vec![]).bytes());
    rp.compare_values(
        1.0,
        is(matches!(r, Err(IoError::CorruptHeader { field: "height", .. }))),
        0.0,
    );

    let r = decode(&BmpFixture::new(-1, 1, vec![]).bytes());
    rp.compare_values(
        1.0,
        is(matches!(r, Err(IoError::CorruptHeader { field: "width", .. }))),
        0.0,
    );

    let mut truncated = BmpFixture::new(2, 2, vec![RED, GREEN, BLUE, WHITE]).bytes();
    truncated.truncate(truncated.len() - 5);
    let r = decode(&truncated);
    rp.compare_values(
        1.0,
        is(matches!(r, Err(IoError::CorruptHeader { field: "pixel data", .. }))),
        0.0,
    );

    let r = decode(&BmpFixture::new(2, 2, vec![RED; 4]).bytes()[..30]);
    rp.compare_values(
        1.0,
        is(matches!(r, Err(IoError::CorruptHeader { field: "info header", .. }))),
        0.0,
    );

    let r = read_image("/nonexistent/pixtone/missing.bmp");
    rp.compare_values(1.0, is(matches!(r, Err(IoError::Io(_)))), 0.0);

    assert!(rp.cleanup(), "bmpio reject test failed");
}

#[test]
fn bmpio_reg_geometry_exceeds_data() {
    let mut rp = RegParams::new("bmpio_geometry");

    let is = |ok: bool| if ok { 1.0 } else { 0.0 };
    let corrupt_pixels = |r: &Result<PixelBuffer, IoError>| {
        matches!(r, Err(IoError::CorruptHeader { field: "pixel data", .. }))
    };

    // A few bytes claiming the largest representable image
    let huge = BmpFixture::new(i32::MAX, i32::MAX, vec![RED]).bytes();
    rp.compare_values(1.0, is(huge.len() < 64), 0.0);
    rp.compare_values(1.0, is(corrupt_pixels(&decode(&huge))), 0.0);

    // 4x4 declared, one row present, file size telling the truth
    let short = BmpFixture::new(4, 4, vec![RED; 4]).bytes();
    rp.compare_values(1.0, is(corrupt_pixels(&decode(&short))), 0.0);

    // 20000x20000 declared with a file size to match, one row present
    let mut lying = BmpFixture::new(20000, 20000, vec![GREEN; 20000]).bytes();
    let claimed: u32 = 54 + 60000 * 20000;
    lying[2..6].copy_from_slice(&claimed.to_le_bytes());
    rp.compare_values(1.0, is(corrupt_pixels(&decode(&lying))), 0.0);

    assert!(rp.cleanup(), "bmpio geometry test failed");
}

#[test]
fn bmpio_reg_roundtrip() {
    let mut rp = RegParams::new("bmpio_roundtrip");

    // Odd widths exercise every row padding length
    for w in [1u32, 2, 3, 5] {
        let pix = fixtures::pattern_rgb(w, 4).unwrap();
        let bytes = encode(&pix).unwrap();
        let back = decode(&bytes).unwrap();
        rp.compare_buffers(&pix, &back);
        rp.compare_strings(&bytes, &encode(&back).unwrap());
    }

    // Gray buffers are written as R = G = B
    let gray = fixtures::gradient_gray(7, 3).unwrap();
    let back = decode(&encode(&gray).unwrap()).unwrap();
    rp.compare_values(3.0, back.channels() as f64, 0.0);
    let (r, g, b) = back.get_rgb(5, 2).unwrap();
    let expected = gray.get_sample(5, 2, 0).unwrap();
    rp.compare_values(f64::from(expected), f64::from(r), 0.0);
    rp.compare_values(f64::from(expected), f64::from(g), 0.0);
    rp.compare_values(f64::from(expected), f64::from(b), 0.0);

    // A padded source encodes the same as its unpadded copy
    let padded = PixelBuffer::with_stride(3, 2, ChannelLayout::Rgb, 12).unwrap();
    rp.compare_strings(
        &encode(&padded).unwrap(),
        &encode(&padded.to_unpadded()).unwrap(),
    );

    assert!(rp.cleanup(), "bmpio roundtrip test failed");
}

#[test]
fn bmpio_reg_files() {
    let mut rp = RegParams::new("bmpio_files");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pattern.bmp");
    let pix = fixtures::pattern_rgb(9, 5).unwrap();

    write_image(&path, &pix).unwrap();
    let back = read_image(&path).unwrap();
    rp.compare_buffers(&pix, &back);

    let on_disk = std::fs::read(&path).unwrap();
    rp.compare_strings(&encode(&pix).unwrap(), &on_disk);
    rp.compare_values(on_disk.len() as f64, decode_file_size(&on_disk), 0.0);

    assert!(rp.cleanup(), "bmpio file test failed");
}

fn decode_file_size(bytes: &[u8]) -> f64 {
    f64::from(u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]))
}

use image::{GenericImageView, Rgba, RgbaImage};
use jtool_qrcode::ean13::{self, SYMBOL_MODULES};
use jtool_qrcode::{QrOptions, decode, decode_bytes, decode_file, encode, encode_to_file, encode_to_writer};
use proptest::prelude::*;

#[test]
fn test_qr_round_trip_in_memory() {
    let image = encode("jtool 你好", &QrOptions::default()).unwrap();
    assert_eq!(image.dimensions(), (220, 220));
    let text = decode(&image::DynamicImage::ImageRgba8(image)).unwrap();
    assert_eq!(text, "jtool 你好");
}

#[test]
fn test_qr_png_writer_round_trip() {
    let mut png = Vec::new();
    encode_to_writer("order-42", &mut png, &QrOptions::default()).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
    assert_eq!(decode_bytes(&png).unwrap(), "order-42");
}

#[test]
fn test_qr_file_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/codes/qr.png");
    encode_to_file("https://example.com/a?b=c", &path, &QrOptions::default()).unwrap();
    assert_eq!(decode_file(&path).unwrap(), "https://example.com/a?b=c");
}

#[test]
fn test_logo_is_centred_and_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    RgbaImage::from_pixel(200, 200, Rgba([255, 0, 0, 255])).save(&logo_path).unwrap();

    let options = QrOptions::builder().logo(logo_path).build();
    let image = encode("with logo", &options).unwrap();

    // 220 / 5 = 44 pixels, centred at (88..132).
    assert_eq!(image.get_pixel(110, 110), &Rgba([255, 0, 0, 255]));
    assert_ne!(image.get_pixel(80, 110), &Rgba([255, 0, 0, 255]));
}

#[test]
fn test_missing_logo_reports_path() {
    let options = QrOptions::builder().logo("/no/such/logo.png").build();
    let err = encode("x", &options).unwrap_err();
    assert!(err.to_string().contains("logo.png"));
}

#[test]
fn test_ean13_image_geometry() {
    let image = ean13::encode_ean13("5901234123457", 0, 0).unwrap();
    assert_eq!(image.dimensions(), (220, 120));

    let narrow = ean13::encode_ean13("5901234123457", 10, 50).unwrap();
    assert_eq!(narrow.width(), SYMBOL_MODULES + 18);
    assert_eq!(narrow.get_pixel(0, 0).0, [255]);
    // First bar of the start guard, just after the quiet zone.
    assert_eq!(narrow.get_pixel(9, 25).0, [0]);
}

#[test]
fn test_ean13_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bars/ean.png");
    ean13::ean13_to_file("4006381333931", &path, 300, 100).unwrap();
    let image = image::open(&path).unwrap();
    assert_eq!(image.dimensions(), (300, 100));
}

proptest! {
    #[test]
    fn test_bar_code_always_passes_check(prefix in "[0-9]{12}") {
        let code = ean13::bar_code(&prefix).unwrap();
        prop_assert_eq!(code.len(), 13);
        prop_assert!(ean13::check_checksum(&code));
        prop_assert_eq!(ean13::modules(&code).unwrap().len(), SYMBOL_MODULES as usize);
    }
}

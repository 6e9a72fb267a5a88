use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(decoded.frame_count(), 1);
    assert_eq!(
        decoded.frames[0].rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_gif_keeps_every_frame() {
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    let mut buf = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut buf);
        for color in [[255u8, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
            let img = RgbaImage::from_pixel(4, 3, Rgba(color));
            enc.encode_frame(Frame::from_parts(
                img,
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            ))
            .unwrap();
        }
    }

    let decoded = decode_image(&buf).unwrap();
    assert_eq!((decoded.width, decoded.height), (4, 3));
    assert_eq!(decoded.frame_count(), 3);
    assert_eq!(decoded.frame_delay_ms(), 100);
    assert_ne!(
        decoded.frames[0].rgba8_premul.as_slice(),
        decoded.frames[1].rgba8_premul.as_slice()
    );
}

#[test]
fn decode_garbage_fails() {
    assert!(decode_image(b"definitely not an image").is_err());
}

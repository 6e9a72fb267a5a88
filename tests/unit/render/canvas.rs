use super::*;
use crate::assets::store::DecodedImage;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    rgba.repeat((w * h) as usize)
}

#[test]
fn rejects_bad_sizes() {
    assert!(CpuCanvas::new(0, 10).is_err());
    assert!(CpuCanvas::new(70_000, 10).is_err());
}

#[test]
fn fill_rect_clears_to_color() {
    let mut c = CpuCanvas::new(8, 4).unwrap();
    c.begin();
    c.fill_rect(kurbo::Rect::new(0.0, 0.0, 8.0, 4.0), Rgba8::rgb(0, 0, 255));
    let f = c.finish();
    assert_eq!((f.width, f.height), (8, 4));
    assert!(f.premultiplied);
    assert!(f.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
    assert_eq!(f.pixel(7, 3), Some([0, 0, 255, 255]));
    assert_eq!(f.pixel(8, 0), None);
}

#[test]
fn draws_the_requested_sub_frame_at_a_pixel_origin() {
    let mut arena = ImageArena::new();
    let id = arena.insert(
        DecodedImage::from_rgba8_frames(
            2,
            2,
            vec![
                (solid(2, 2, [255, 0, 0, 255]), 50),
                (solid(2, 2, [0, 255, 0, 255]), 50),
            ],
        )
        .unwrap(),
    );

    let mut c = CpuCanvas::new(6, 6).unwrap();
    c.begin();
    c.fill_rect(kurbo::Rect::new(0.0, 0.0, 6.0, 6.0), Rgba8::BLACK);
    c.draw_image(&arena, id, 1, kurbo::Point::new(2.0, 3.0)).unwrap();
    let f = c.finish();

    assert_eq!(f.pixel(2, 3), Some([0, 255, 0, 255]));
    assert_eq!(f.pixel(3, 4), Some([0, 255, 0, 255]));
    assert_eq!(f.pixel(1, 3), Some([0, 0, 0, 255]));
    assert_eq!(f.pixel(2, 5), Some([0, 0, 0, 255]));
    assert_eq!(c.cached_paints(), 1);
}

#[test]
fn unknown_images_and_sub_frames_are_errors() {
    let mut arena = ImageArena::new();
    let id = arena
        .insert(DecodedImage::from_rgba8_frames(1, 1, vec![(vec![1, 2, 3, 255], 0)]).unwrap());
    let mut c = CpuCanvas::new(4, 4).unwrap();
    c.begin();
    assert!(c.draw_image(&arena, id, 1, kurbo::Point::ORIGIN).is_err());
    assert!(
        c.draw_image(&arena, ImageId(9), 0, kurbo::Point::ORIGIN)
            .is_err()
    );
}

#[test]
fn begin_discards_previous_draws() {
    let mut c = CpuCanvas::new(4, 4).unwrap();
    c.begin();
    c.fill_rect(kurbo::Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::WHITE);
    let _ = c.finish();
    c.begin();
    c.fill_rect(kurbo::Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::BLACK);
    let f = c.finish();
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn flattened_frames_are_opaque_over_the_background() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 0, 255, 0, 0, 255],
        premultiplied: true,
    };
    let out = f.flattened(Rgba8::rgb(0, 0, 200)).unwrap();
    assert_eq!(out, vec![0, 0, 200, 255, 255, 0, 0, 255]);
}

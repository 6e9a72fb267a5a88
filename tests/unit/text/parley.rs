use super::*;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<Vec<u8>> {
    SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok())
}

#[test]
fn rejects_bad_size() {
    assert!(matches!(
        ParleyText::new(Vec::new(), None, 0.0),
        Err(ReelError::Validation(_))
    ));
    assert!(ParleyText::new(Vec::new(), None, f32::NAN).is_err());
}

#[test]
fn rejects_bytes_that_are_not_a_font() {
    assert!(ParleyText::new(b"not a font".to_vec(), None, 12.0).is_err());
}

#[test]
fn measure_is_deterministic_and_monotonic() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut t = ParleyText::new(bytes, None, 14.0).unwrap();
    assert!(t.font_height() > 0.0);

    let a = t.measure("chat", FontWeight::Regular).unwrap();
    let b = t.measure("chat", FontWeight::Regular).unwrap();
    let c = t.measure("chat message", FontWeight::Regular).unwrap();
    assert_eq!(a, b);
    assert!(c.width > a.width);
    let spaced = t.measure("chat ", FontWeight::Regular).unwrap();
    assert!(spaced.width > a.width);
}

#[test]
fn bold_without_a_bold_face_measures_as_regular() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut t = ParleyText::new(bytes, None, 14.0).unwrap();
    let regular = t.measure("User:", FontWeight::Regular).unwrap();
    let bold = t.measure("User:", FontWeight::Bold).unwrap();
    assert_eq!(regular, bold);
}

#[test]
fn draw_paints_glyph_pixels() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut t = ParleyText::new(bytes, None, 16.0).unwrap();
    let mut ctx = vello_cpu::RenderContext::new(64, 32);
    t.draw(
        &mut ctx,
        "Hi",
        FontWeight::Bold,
        Rgba8::WHITE,
        kurbo::Point::new(2.0, 2.0),
    )
    .unwrap();
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(64, 32);
    ctx.render_to_pixmap(&mut pixmap);
    assert!(
        pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .any(|px| px[3] > 0)
    );
}

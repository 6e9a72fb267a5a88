use std::collections::HashMap;

use super::*;
use crate::assets::store::{ImageArena, ImageId};
use crate::text::block::BlockText;
use crate::text::engine::TextSize;
use crate::tokens::cheer::Cheer;

#[derive(Default)]
struct StubResolver {
    emoji: HashMap<String, ResolvedImage>,
    third_party: HashMap<String, ResolvedImage>,
    native: HashMap<String, ResolvedImage>,
    badges: HashMap<(String, String), ResolvedImage>,
    cheers: HashMap<String, Cheer>,
    arena: ImageArena,
}

impl TokenResolver for StubResolver {
    fn knows_emoji(&self, glyph: &str) -> bool {
        self.emoji.contains_key(glyph)
    }
    fn resolve_emoji(&mut self, word: &str) -> Option<ResolvedImage> {
        self.emoji.get(word).copied()
    }
    fn resolve_third_party(&mut self, word: &str) -> Option<ResolvedImage> {
        self.third_party.get(word).copied()
    }
    fn resolve_native(&mut self, id: &str) -> Option<ResolvedImage> {
        self.native.get(id).copied()
    }
    fn resolve_cheer(&mut self, word: &str, has_bits: bool) -> Option<Cheer> {
        if !has_bits {
            return None;
        }
        self.cheers.get(word).cloned()
    }
    fn resolve_badge(&mut self, id: &str, version: &str) -> Option<ResolvedImage> {
        self.badges
            .get(&(id.to_owned(), version.to_owned()))
            .copied()
    }
    fn images(&self) -> &ImageArena {
        &self.arena
    }
}

fn img(id: u32, width: u32, height: u32) -> ResolvedImage {
    ResolvedImage {
        id: ImageId(id),
        width,
        height,
        frame_count: 1,
        delay_ms: 0,
    }
}

fn engine(width: f32) -> LayoutEngine {
    LayoutEngine::new(
        LayoutOpts {
            max_width: width,
            fps: Fps::integer(24).unwrap(),
            chat_color: Rgba8::WHITE,
            background: Rgba8::BLACK,
            show_badges: true,
        },
        0,
    )
    .unwrap()
}

fn text() -> BlockText {
    BlockText::new(10.0, 12.0).unwrap()
}

fn texts(m: &DrawableMessage) -> Vec<(String, f32)> {
    m.drawables()
        .filter_map(|(_, d)| d.text().map(|t| (t.to_owned(), d.offset_x)))
        .collect()
}

#[test]
fn short_message_fits_on_one_line() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("User", "hi", 0.0);
    let out = engine(200.0).layout(&msg, &mut r, &mut text()).unwrap();

    assert_eq!(out.lines.len(), 1);
    let line = &out.lines[0];
    assert_eq!(line.offset_x, HORIZONTAL_PAD);
    assert_eq!(line.offset_y, 0.0);
    assert_eq!(line.drawables.len(), 2);
    assert!(matches!(line.drawables[0].kind, DrawableKind::User { .. }));
    assert_eq!(texts(&out), vec![("User:".to_owned(), 5.0), ("hi".to_owned(), 55.0)]);
}

#[test]
fn words_wrap_onto_new_lines() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("U", "aaa bbb ccc", 0.0);
    let out = engine(100.0).layout(&msg, &mut r, &mut text()).unwrap();

    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.lines[1].offset_y, 12.0);
    assert_eq!(
        texts(&out),
        vec![
            ("U:".to_owned(), 5.0),
            ("aaa".to_owned(), 25.0),
            ("bbb ccc".to_owned(), 5.0),
        ]
    );
    assert_eq!(out.height(), 24.0);
}

#[test]
fn plain_text_round_trips_through_runs() {
    let mut r = StubResolver::default();
    let body = "the quick brown fox jumps over the lazy dog again and again";
    let msg = ChatMessage::new("someone", body, 0.0);
    let out = engine(120.0).layout(&msg, &mut r, &mut text()).unwrap();

    assert!(out.lines.len() > 1);
    let joined = texts(&out)
        .into_iter()
        .skip(1)
        .map(|(t, _)| t)
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(joined, body);
}

#[test]
fn oversized_word_sits_alone_without_blank_lines() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("U", "abcdefghijkl", 0.0);
    let out = engine(50.0).layout(&msg, &mut r, &mut text()).unwrap();

    assert_eq!(out.lines.len(), 2);
    assert!(out.lines.iter().all(|l| !l.drawables.is_empty()));
    assert_eq!(out.lines[1].drawables[0].text(), Some("abcdefghijkl"));
}

#[test]
fn tall_emote_shifts_the_line_down() {
    let mut r = StubResolver::default();
    r.third_party.insert("Pog".to_owned(), img(1, 20, 30));
    let msg = ChatMessage::new("U", "wow Pog", 0.0);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();

    assert_eq!(out.lines.len(), 1);
    let line = &out.lines[0];
    assert_eq!(line.height(), 30.0);
    for d in &line.drawables {
        assert!(d.offset_y >= 0.0);
    }
    // 12 / 2 - 30 / 2 = -9, shifted by 9
    let emote = line
        .drawables
        .iter()
        .find(|d| matches!(d.kind, DrawableKind::Emote { .. }))
        .unwrap();
    assert_eq!(emote.offset_y, 0.0);
    // "U:" 20 + "wow " 40 + emote pad
    assert_eq!(emote.offset_x, 5.0 + 20.0 + 40.0 + EMOTE_PAD);
    assert_eq!(line.drawables[0].offset_y, 9.0);
}

#[test]
fn emote_that_does_not_fit_starts_a_new_line() {
    let mut r = StubResolver::default();
    r.third_party.insert("Wide".to_owned(), img(1, 30, 12));
    let msg = ChatMessage::new("U", "Wide", 0.0);

    let fits = engine(60.0).layout(&msg, &mut r, &mut text()).unwrap();
    assert_eq!(fits.lines.len(), 1);

    let wraps = engine(59.0).layout(&msg, &mut r, &mut text()).unwrap();
    assert_eq!(wraps.lines.len(), 2);
    assert_eq!(wraps.lines[1].drawables[0].offset_x, HORIZONTAL_PAD + EMOTE_PAD);
}

#[test]
fn resolution_priority_prefers_emoji_then_third_party_then_native() {
    let mut r = StubResolver::default();
    r.third_party.insert("Kappa".to_owned(), img(2, 10, 10));
    r.native.insert("25".to_owned(), img(3, 10, 10));
    let msg = ChatMessage::new("U", "Kappa Kappa", 0.0).with_emote("25", 6, 10);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();

    let ids: Vec<ImageId> = out
        .drawables()
        .filter_map(|(_, d)| match d.kind {
            DrawableKind::Emote { image, .. } => Some(image),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![ImageId(2), ImageId(2)]);
}

#[test]
fn native_emotes_match_on_word_offset() {
    let mut r = StubResolver::default();
    r.native.insert("25".to_owned(), img(3, 10, 10));
    let msg = ChatMessage::new("U", "hello Kappa there", 0.0).with_emote("25", 6, 10);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();

    let kinds: Vec<&DrawableKind> = out.drawables().map(|(_, d)| &d.kind).collect();
    assert!(matches!(kinds[2], DrawableKind::Emote { image: ImageId(3), .. }));
    assert_eq!(
        texts(&out).into_iter().map(|(t, _)| t).collect::<Vec<_>>(),
        vec!["U:", "hello", "there"]
    );
}

#[test]
fn known_emoji_keeps_native_offsets_aligned() {
    let mut r = StubResolver::default();
    r.emoji.insert("😀".to_owned(), img(4, 12, 12));
    r.native.insert("25".to_owned(), img(3, 10, 10));
    let msg = ChatMessage::new("U", "😀 Kappa", 0.0).with_emote("25", 2, 6);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();

    let ids: Vec<ImageId> = out
        .drawables()
        .filter_map(|(_, d)| match d.kind {
            DrawableKind::Emote { image, .. } => Some(image),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![ImageId(4), ImageId(3)]);
}

#[test]
fn unknown_astral_glyph_becomes_question_mark() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("U", "a🦀b", 0.0);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();
    assert_eq!(texts(&out)[1].0, "a?b");
}

#[test]
fn cheer_needs_bits_and_emits_amount_label() {
    let mut r = StubResolver::default();
    let purple = Rgba8::rgb(0x9C, 0x3E, 0xE8);
    r.cheers.insert(
        "Cheer100".to_owned(),
        Cheer {
            image: img(7, 20, 20),
            color: purple,
            amount: 100,
        },
    );

    let msg = ChatMessage::new("U", "Cheer100", 0.0).with_bits(100);
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();
    let ds = &out.lines[0].drawables;
    assert_eq!(ds.len(), 3);
    assert!(matches!(ds[1].kind, DrawableKind::Emote { image: ImageId(7), .. }));
    assert_eq!(
        ds[2].kind,
        DrawableKind::Text {
            text: "100".to_owned(),
            color: purple
        }
    );
    assert_eq!(ds[2].offset_x, ds[1].right());

    let no_bits = ChatMessage::new("U", "Cheer100", 0.0);
    let out = engine(300.0).layout(&no_bits, &mut r, &mut text()).unwrap();
    assert_eq!(texts(&out)[1].0, "Cheer100");
}

#[test]
fn badges_precede_the_author_tag_centered_on_it() {
    let mut r = StubResolver::default();
    r.badges
        .insert(("moderator".to_owned(), "1".to_owned()), img(9, 18, 18));
    let msg = ChatMessage::new("U", "hi", 0.0)
        .with_badge("moderator", "1")
        .with_badge("missing", "1");
    let out = engine(300.0).layout(&msg, &mut r, &mut text()).unwrap();

    let ds = &out.lines[0].drawables;
    assert!(matches!(ds[0].kind, DrawableKind::Badge { image: ImageId(9) }));
    assert_eq!((ds[0].offset_x, ds[0].offset_y), (5.0, 0.0));
    assert_eq!(ds[1].offset_x, 5.0 + 18.0 + BADGE_PAD);
    assert_eq!(ds[1].offset_y, 3.0);
    assert_eq!(ds.len(), 3);
}

#[test]
fn badges_can_be_hidden() {
    let mut r = StubResolver::default();
    r.badges
        .insert(("moderator".to_owned(), "1".to_owned()), img(9, 18, 18));
    let mut opts = *engine(300.0).opts();
    opts.show_badges = false;
    let e = LayoutEngine::new(opts, 0).unwrap();
    let msg = ChatMessage::new("U", "hi", 0.0).with_badge("moderator", "1");
    let out = e.layout(&msg, &mut r, &mut text()).unwrap();
    assert_eq!(out.lines[0].drawables[0].offset_x, 5.0);
    assert!(matches!(out.lines[0].drawables[0].kind, DrawableKind::User { .. }));
}

#[test]
fn empty_body_still_has_the_author_line() {
    let mut r = StubResolver::default();
    let out = engine(200.0)
        .layout(&ChatMessage::new("U", "", 0.0), &mut r, &mut text())
        .unwrap();
    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.lines[0].drawables.len(), 1);
}

#[test]
fn start_frame_and_live_flag() {
    let mut r = StubResolver::default();
    let e = engine(200.0);
    let live = e
        .layout(&ChatMessage::new("U", "x", 2.5), &mut r, &mut text())
        .unwrap();
    assert_eq!(live.start_frame, FrameIndex(60));
    assert!(live.live);

    let replay = e
        .layout(&ChatMessage::new("U", "x", 0.99).replay(), &mut r, &mut text())
        .unwrap();
    assert_eq!(replay.start_frame, FrameIndex(23));
    assert!(!replay.live);
}

#[test]
fn author_color_is_corrected_against_background() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("U", "x", 0.0).with_color(Rgba8::rgb(10, 10, 10));
    let out = engine(200.0).layout(&msg, &mut r, &mut text()).unwrap();
    let DrawableKind::User { color, .. } = &out.lines[0].drawables[0].kind else {
        panic!("expected user tag first");
    };
    assert_eq!(*color, Rgba8::rgb(138, 138, 138));
}

struct FailingText;

impl TextEngine for FailingText {
    fn measure(&mut self, _text: &str, _weight: FontWeight) -> ReelResult<TextSize> {
        Err(ReelError::metrics("no font"))
    }
    fn font_height(&self) -> f32 {
        10.0
    }
    fn draw(
        &mut self,
        _ctx: &mut vello_cpu::RenderContext,
        _text: &str,
        _weight: FontWeight,
        _color: Rgba8,
        _origin: kurbo::Point,
    ) -> ReelResult<()> {
        Ok(())
    }
}

#[test]
fn metrics_failure_is_an_error() {
    let mut r = StubResolver::default();
    let err = engine(200.0)
        .layout(&ChatMessage::new("U", "x", 0.0), &mut r, &mut FailingText)
        .unwrap_err();
    assert!(matches!(err, ReelError::Metrics(_)));
}

#[test]
fn normalize_text_shifts_later_offsets() {
    let mut emotes = vec![(0usize, "a"), (2, "b"), (5, "c")];
    let out = normalize_text("x😀y🦀", &mut emotes, |g| g == "😀");
    assert_eq!(out, "x 😀 y?");
    // 😀 at utf16 1, 🦀 at utf16 4
    assert_eq!(emotes, vec![(0, "a"), (3, "b"), (7, "c")]);
}

#[test]
fn right_edges_stay_within_width_for_text() {
    let mut r = StubResolver::default();
    let msg = ChatMessage::new("abc", "one two three four five six seven eight nine ten", 0.0);
    let out = engine(110.0).layout(&msg, &mut r, &mut text()).unwrap();
    for line in &out.lines {
        assert!(line.right() + HORIZONTAL_PAD < 110.0, "{line:?}");
    }
}

use super::*;
use serde_json::json;

#[test]
fn parses_comment_wire_shape() {
    let v = json!({
        "_id": "abc",
        "content_offset_seconds": 12.5,
        "source": "chat",
        "commenter": { "display_name": "Viewer", "name": "viewer" },
        "message": {
            "body": "hello Kappa",
            "user_color": "#1E90FF",
            "bits_spent": 0,
            "emoticons": [ { "_id": "25", "begin": 6, "end": 10 } ],
            "user_badges": [ { "_id": "subscriber", "version": "12" } ]
        }
    });
    let m: ChatMessage = serde_json::from_value(v).unwrap();
    assert_eq!(m.author, "Viewer");
    assert_eq!(m.text, "hello Kappa");
    assert_eq!(m.color, Some(Rgba8::rgb(0x1E, 0x90, 0xFF)));
    assert_eq!(m.time_offset, 12.5);
    assert_eq!(m.emotes.len(), 1);
    assert_eq!(m.emotes[0].id, "25");
    assert_eq!(m.emotes[0].begin, 6);
    assert_eq!(m.badges[0].version, "12");
    assert!(m.is_live());
}

#[test]
fn missing_optionals_default() {
    let v = json!({
        "commenter": { "display_name": null, "name": "lurker" },
        "message": { "body": "hi", "user_color": null },
        "source": "comment"
    });
    let m: ChatMessage = serde_json::from_value(v).unwrap();
    assert_eq!(m.author, "lurker");
    assert_eq!(m.color, None);
    assert!(m.emotes.is_empty());
    assert!(m.badges.is_empty());
    assert_eq!(m.bits_spent, 0);
    assert_eq!(m.source, ChatSource::Replay);
    assert_eq!(m.time_offset, 0.0);
}

#[test]
fn malformed_color_is_dropped() {
    let v = json!({
        "commenter": { "display_name": "a" },
        "message": { "body": "x", "user_color": "blue" }
    });
    let m: ChatMessage = serde_json::from_value(v).unwrap();
    assert_eq!(m.color, None);
}

#[test]
fn builder_sets_fields() {
    let m = ChatMessage::new("u", "Cheer100 nice", 3.0)
        .with_bits(100)
        .with_badge("bits", "100")
        .with_emote("1", 0, 1)
        .replay();
    assert_eq!(m.bits_spent, 100);
    assert_eq!(m.badges.len(), 1);
    assert_eq!(m.emotes.len(), 1);
    assert!(!m.is_live());
}

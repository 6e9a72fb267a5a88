use super::*;

#[test]
fn parses_full_manifest() {
    let json = r##"{
        "emoji": { "😀": "emoji/1f600.png" },
        "ffz": { "Pog": "ffz/pog.png" },
        "bttv": { "PepeHands": "bttv/pepehands.gif" },
        "native": { "25": "twitch/25.png" },
        "badges": { "subscriber": { "12": "badges/sub-12.png" } },
        "cheers": [
            { "prefix": "Cheer", "tiers": [
                { "min_bits": 1, "color": "#979797", "image": "cheers/1.gif" },
                { "min_bits": 100, "color": "#9C3EE8", "image": "cheers/100.gif", "can_cheer": false }
            ] }
        ]
    }"##;
    let pack = EmotePack::from_json(json).unwrap();
    assert_eq!(pack.emoji["😀"], "emoji/1f600.png");
    assert_eq!(pack.ffz["Pog"], "ffz/pog.png");
    assert_eq!(pack.badges["subscriber"]["12"], "badges/sub-12.png");
    assert_eq!(pack.cheers[0].tiers.len(), 2);
    assert!(pack.cheers[0].tiers[0].can_cheer);
    assert!(!pack.cheers[0].tiers[1].can_cheer);
    assert_eq!(pack.cheers[0].tiers[1].color, Rgba8::rgb(0x9C, 0x3E, 0xE8));
}

#[test]
fn empty_object_is_an_empty_pack() {
    let pack = EmotePack::from_json("{}").unwrap();
    assert!(pack.ffz.is_empty());
    assert!(pack.cheers.is_empty());
}

#[test]
fn bad_color_is_rejected() {
    let json = r#"{"cheers":[{"prefix":"x","tiers":[{"min_bits":1,"color":"nope","image":"a"}]}]}"#;
    assert!(matches!(EmotePack::from_json(json), Err(ReelError::Serde(_))));
}

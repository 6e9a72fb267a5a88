use super::*;

fn comment(name: &str, body: &str, t: f64) -> String {
    format!(
        r#"{{"commenter":{{"display_name":"{name}"}},"message":{{"body":"{body}"}},"content_offset_seconds":{t},"source":"chat"}}"#
    )
}

#[test]
fn accepts_wrapped_and_bare_forms() {
    let wrapped = format!(r#"{{"comments":[{}]}}"#, comment("a", "one", 1.0));
    let bare = format!("[{}]", comment("a", "one", 1.0));
    assert_eq!(parse_chat_history(&wrapped).unwrap().len(), 1);
    assert_eq!(parse_chat_history(&bare).unwrap().len(), 1);
}

#[test]
fn sorts_by_time_offset_stably() {
    let json = format!(
        "[{},{},{}]",
        comment("late", "x", 5.0),
        comment("first", "x", 1.0),
        comment("second", "x", 1.0)
    );
    let msgs = parse_chat_history(&json).unwrap();
    let names: Vec<_> = msgs.iter().map(|m| m.author.as_str()).collect();
    assert_eq!(names, ["first", "second", "late"]);
}

#[test]
fn invalid_json_is_a_serde_error() {
    let err = parse_chat_history("{not json").unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn missing_file_is_reported() {
    let err = load_chat_history(Path::new("/nonexistent/chat.json")).unwrap_err();
    assert!(err.to_string().contains("chat.json"));
}

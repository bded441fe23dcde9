use monitor_core::protocol::{
    decode_frame, ClientMessage, ConversionStatus, ConvertedFileEntry, MessageKind,
    ProtocolError, ServerMessage,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn decode(frame: serde_json::Value) -> Result<ServerMessage, ProtocolError> {
    decode_frame(&frame.to_string())
}

fn body(tag: &str, body: serde_json::Value) -> Result<ServerMessage, ProtocolError> {
    decode(json!({"messageType": tag, "messageBody": body}))
}

fn entry(filename: &str, percentage_saved: Option<f64>) -> ConvertedFileEntry {
    ConvertedFileEntry {
        filename: filename.to_string(),
        percentage_saved,
    }
}

#[test]
fn every_kind_round_trips_through_its_tag() {
    for kind in MessageKind::ALL {
        assert_eq!(MessageKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(MessageKind::from_tag("disk_usage"), None);
    assert_eq!(MessageKind::from_tag("Converting_File"), None);
}

#[test]
fn every_kind_is_listed_and_decodes() {
    // Adding a kind without listing it fails to compile here.
    let listed = |kind: MessageKind| match kind {
        MessageKind::ConvertingFile
        | MessageKind::ConvertingFiles
        | MessageKind::FilesToConvert
        | MessageKind::ConvertedFiles
        | MessageKind::Statistics => MessageKind::ALL.contains(&kind),
    };
    for kind in MessageKind::ALL {
        assert!(listed(kind));
        let decoded = body(kind.tag(), json!(null)).unwrap();
        assert!(
            !matches!(decoded, ServerMessage::Unknown { .. }),
            "{} decoded as unknown",
            kind.tag()
        );
    }
}

#[test]
fn ping_frame_carries_only_the_tag() {
    let frame: serde_json::Value = serde_json::from_str(&ClientMessage::Ping.to_frame()).unwrap();
    assert_eq!(frame, json!({"messageType": "ping"}));
}

#[test]
fn unknown_tag_keeps_its_name() {
    assert_eq!(
        body("disk_usage", json!({"free": 1})).unwrap(),
        ServerMessage::Unknown {
            tag: "disk_usage".to_string()
        }
    );
}

#[test]
fn missing_body_is_null() {
    assert_eq!(
        decode(json!({"messageType": "statistics"})).unwrap(),
        ServerMessage::Statistics(None)
    );
}

#[test]
fn converting_files_accepts_wrapped_bare_and_null_bodies() {
    let status = json!({
        "filename": "a.mkv",
        "progress": 10,
        "time_since_start": "0:01:00",
        "time_remaining": "0:09:00",
        "backend_name": "qsv"
    });
    let expected = ConversionStatus {
        filename: "a.mkv".to_string(),
        progress: 10.0,
        time_since_start: "0:01:00".to_string(),
        time_remaining: Some("0:09:00".to_string()),
        backend_name: Some("qsv".to_string()),
    };

    assert_eq!(
        body("converting_files", json!({"converting_files": [status.clone()]})).unwrap(),
        ServerMessage::ConvertingFiles(Some(vec![expected.clone()]))
    );
    assert_eq!(
        body("converting_files", json!([status])).unwrap(),
        ServerMessage::ConvertingFiles(Some(vec![expected]))
    );
    assert_eq!(
        body("converting_files", json!({"converting_files": null})).unwrap(),
        ServerMessage::ConvertingFiles(None)
    );
    assert_eq!(
        body("converting_files", json!(null)).unwrap(),
        ServerMessage::ConvertingFiles(None)
    );
}

#[test]
fn files_to_convert_accepts_list_object_and_null() {
    assert_eq!(
        body("files_to_convert", json!(["a", "b"])).unwrap(),
        ServerMessage::FilesToConvert(Some(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(
        body("files_to_convert", json!({"filenames": ["c"]})).unwrap(),
        ServerMessage::FilesToConvert(Some(vec!["c".to_string()]))
    );
    assert_eq!(
        body("files_to_convert", json!({"filenames": null})).unwrap(),
        ServerMessage::FilesToConvert(None)
    );
    assert_eq!(
        body("files_to_convert", json!({})).unwrap(),
        ServerMessage::FilesToConvert(None)
    );
}

#[test]
fn converted_files_accepts_entries_wrapped_entries_and_legacy_names() {
    assert_eq!(
        body(
            "converted_files",
            json!([{"filename": "a.mkv", "percentage_saved": 12.5}])
        )
        .unwrap(),
        ServerMessage::ConvertedFiles(Some(vec![entry("a.mkv", Some(12.5))]))
    );
    assert_eq!(
        body(
            "converted_files",
            json!({"converted_files": [{"filename": "b.mkv", "percentage_saved": 3}]})
        )
        .unwrap(),
        ServerMessage::ConvertedFiles(Some(vec![entry("b.mkv", Some(3.0))]))
    );
    assert_eq!(
        body("converted_files", json!({"converted_files": null})).unwrap(),
        ServerMessage::ConvertedFiles(None)
    );
    assert_eq!(
        body("converted_files", json!({"filenames": ["old.avi", "older.avi"]})).unwrap(),
        ServerMessage::ConvertedFiles(Some(vec![entry("old.avi", None), entry("older.avi", None)]))
    );
    assert_eq!(
        body("converted_files", json!({"filenames": null})).unwrap(),
        ServerMessage::ConvertedFiles(None)
    );
}

#[test]
fn malformed_bodies_are_rejected_with_their_tag() {
    let cases = [
        ("files_to_convert", json!("a.mkv")),
        ("files_to_convert", json!([1, 2])),
        ("converted_files", json!(42)),
        ("converted_files", json!({"filenames": "a.mkv"})),
        ("converting_files", json!("busy")),
        ("converting_files", json!({"converting_files": [{"progress": 5}]})),
        ("converting_file", json!({"filename": "a.mkv"})),
        ("statistics", json!([1, 2])),
    ];
    for (tag, bad) in cases {
        match body(tag, bad.clone()) {
            Err(ProtocolError::Body { tag: reported, .. }) => assert_eq!(reported, tag),
            other => panic!("{tag} with {bad} gave {other:?}"),
        }
    }
}

#[test]
fn frames_without_an_envelope_are_rejected() {
    for text in ["not json", "[]", r#"{"messageBody": null}"#, r#"{"messageType": 3}"#] {
        assert!(
            matches!(decode_frame(text), Err(ProtocolError::Envelope(_))),
            "{text}"
        );
    }
}

use super::*;
use serde_json::json;

// =============================================================================
// CONSTRUCTORS
// =============================================================================

#[test]
fn request_sets_fields() {
    let frame = Frame::request("scene:generate", json!({}));
    assert_eq!(frame.syscall, "scene:generate");
    assert_eq!(frame.status, Status::Request);
    assert!(frame.parent_id.is_none());
    assert!(frame.from.is_none());
}

#[test]
fn reply_inherits_context() {
    let req = Frame::request("chat:send", json!({"message": "hi"}));
    let item = req.item(json!({"text": "chunk"}));

    assert_eq!(item.parent_id.as_deref(), Some(req.id.as_str()));
    assert_eq!(item.syscall, "chat:send");
    assert_eq!(item.status, Status::Item);
    assert_eq!(item.data.get("text").and_then(|v| v.as_str()), Some("chunk"));
}

#[test]
fn done_with_carries_payload() {
    let req = Frame::request("scene:suggest", json!({"prompt": "a dog"}));
    let done = req.done_with(json!({"suggestions": []}));

    assert_eq!(done.status, Status::Done);
    assert!(done.data.get("suggestions").is_some());
}

#[test]
fn terminal_statuses() {
    assert!(Status::Done.is_terminal());
    assert!(Status::Error.is_terminal());
    assert!(Status::Cancel.is_terminal());
    assert!(!Status::Request.is_terminal());
    assert!(!Status::Item.is_terminal());
    assert!(!Status::Bulk.is_terminal());
}

#[test]
fn prefix_and_op_extraction() {
    let frame = Frame::request("scene:generate", json!({}));
    assert_eq!(frame.prefix(), "scene");
    assert_eq!(frame.op(), "generate");

    let frame = Frame::request("noseparator", json!({}));
    assert_eq!(frame.prefix(), "noseparator");
    assert_eq!(frame.op(), "");
}

#[test]
fn cancel_references_target() {
    let req = Frame::request("chat:send", json!({}));
    let cancel = Frame::cancel(req.id.clone());

    assert_eq!(cancel.parent_id.as_deref(), Some(req.id.as_str()));
    assert_eq!(cancel.status, Status::Cancel);
    assert!(cancel.status.is_terminal());
}

#[test]
fn cancelled_acknowledgement_is_terminal() {
    let req = Frame::request("chat:send", json!({}));
    let ack = req.cancelled();

    assert_eq!(ack.parent_id.as_deref(), Some(req.id.as_str()));
    assert_eq!(ack.status, Status::Cancel);
    assert_eq!(ack.syscall, "chat:send");
}

#[test]
fn with_data_promotes_payload_to_object() {
    let frame = Frame::request("chat:send", serde_json::Value::Null).with_data("key", "value");
    assert_eq!(frame.data.get("key").and_then(|v| v.as_str()), Some("value"));
}

// =============================================================================
// ERROR FRAMES
// =============================================================================

#[test]
fn error_from_typed() {
    #[derive(Debug, thiserror::Error)]
    #[error("provider unavailable")]
    struct Unavailable;

    impl ErrorCode for Unavailable {
        fn error_code(&self) -> &'static str {
            "E_PROVIDER_UNAVAILABLE"
        }

        fn retryable(&self) -> bool {
            true
        }
    }

    let req = Frame::request("scene:generate", json!({}));
    let err = req.error_from(&Unavailable);

    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data.get(FRAME_CODE).and_then(|v| v.as_str()), Some("E_PROVIDER_UNAVAILABLE"));
    assert_eq!(
        err.data.get(FRAME_MESSAGE).and_then(|v| v.as_str()),
        Some("provider unavailable")
    );
    assert_eq!(
        err.data
            .get(FRAME_RETRYABLE)
            .and_then(serde_json::Value::as_bool),
        Some(true)
    );
}

#[test]
fn error_from_string_message() {
    let req = Frame::request("scene:generate", json!({}));
    let err = req.error("prompt required");
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data.get(FRAME_MESSAGE).and_then(|v| v.as_str()), Some("prompt required"));
}

// =============================================================================
// SERDE
// =============================================================================

#[test]
fn json_round_trip() {
    let original = Frame::request("chat:send", json!({"message": "hello"}))
        .with_from("client-1")
        .with_data("key", "value");

    let json = serde_json::to_string(&original).expect("serialize");
    let restored: Frame = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored, original);
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&Status::Error).expect("serialize");
    assert_eq!(json, "\"error\"");
}

// =============================================================================
// CODEC
// =============================================================================

#[test]
fn codec_round_trip() {
    let original = Frame::request(
        "scene:generate",
        json!({
            "prompt": "a detective in a rain-soaked office",
            "style": "Cinematic",
            "aspect_ratio": "16:9",
            "nested": {"flag": true, "count": 3.0},
            "list": ["a", "b"],
        }),
    )
    .with_from("client-1");

    let bytes = encode_frame(&original);
    let restored = decode_frame(&bytes).expect("decode");

    assert_eq!(restored, original);
}

#[test]
fn codec_round_trip_every_status() {
    let req = Frame::request("chat:send", json!({}));
    for frame in [
        req.clone(),
        req.item(json!({"text": "chunk"})),
        req.done(),
        req.error("boom"),
        req.cancelled(),
    ] {
        let restored = decode_frame(&encode_frame(&frame)).expect("decode");
        assert_eq!(restored.status, frame.status);
        assert_eq!(restored.parent_id, frame.parent_id);
    }
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_frame(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn decode_missing_data_defaults_to_empty_object() {
    // A frame whose wire `data` field is absent decodes to `{}` rather than null.
    let wire = WireFrame {
        id: "abc".into(),
        parent_id: None,
        ts: 0,
        from: None,
        syscall: "chat:send".into(),
        status: Status::Request.as_i32(),
        data: None,
    };
    let bytes = wire.encode_to_vec();
    let restored = decode_frame(&bytes).expect("decode");
    assert!(restored.data.is_object());
    assert_eq!(restored.data, json!({}));
}

#[test]
fn decode_rejects_out_of_range_status() {
    let wire = WireFrame {
        id: "abc".into(),
        parent_id: None,
        ts: 0,
        from: None,
        syscall: "chat:send".into(),
        status: 99,
        data: None,
    };
    let err = decode_frame(&wire.encode_to_vec()).unwrap_err();
    assert!(matches!(err, CodecError::InvalidStatus(99)));
}

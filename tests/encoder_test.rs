use std::collections::BTreeMap;

use livetree::{to_value, EncodeError, ErrorCategory, TreeError, Value};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormChange {
    field_name: String,
    value: Option<String>,
    checked: bool,
    tags: Vec<&'static str>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ClientEvent {
    Click { x: i32, y: i32 },
    Blur,
}

#[test]
fn test_encode_event_payload() {
    let change = FormChange {
        field_name: "email".to_string(),
        value: None,
        checked: true,
        tags: vec!["a", "b"],
    };

    let value = to_value(&change).unwrap();

    assert_eq!(
        value,
        Value::from(json!({
            "fieldName": "email",
            "value": null,
            "checked": true,
            "tags": ["a", "b"]
        }))
    );
}

#[test]
fn test_internally_tagged_enum() {
    let click = to_value(&ClientEvent::Click { x: 3, y: 4 }).unwrap();
    assert_eq!(click, Value::from(json!({"type": "Click", "x": 3, "y": 4})));

    let blur = to_value(&ClientEvent::Blur).unwrap();
    assert_eq!(blur, Value::from(json!({"type": "Blur"})));
}

#[test]
fn test_encoded_value_serializes_as_json() {
    let mut map = BTreeMap::new();
    map.insert("n", 1.5);
    let value = to_value(&map).unwrap();

    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"n":1.5}"#);
}

#[test]
fn test_encode_error_category() {
    let err: TreeError = to_value(&f64::NAN).unwrap_err().into();

    assert_eq!(err.category(), ErrorCategory::Encoding);
    assert!(!err.requires_resync());
    assert!(matches!(
        err.inner(),
        TreeError::Encode(EncodeError::NonFiniteFloat(_))
    ));
}

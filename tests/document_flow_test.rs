mod common;

use livetree::{
    decode_root, Child, Component, Document, ErrorCategory, Fragment, PushEvent, Root, Statics,
    TreeConfig, Value,
};

#[test]
fn test_join_update_render_flow() {
    common::init_tracing();

    let mut doc = Document::from_json(&common::page_payload().to_string()).unwrap();
    assert_eq!(doc.render().unwrap(), common::page_markup());

    let events = doc
        .apply_json(r#"{"1": "2", "2": {"d": [["walk dog"], ["write tests"]]}, "e": [["removed", {"id": 1}]]}"#)
        .unwrap();

    assert_eq!(doc.sequence(), 1);
    assert_eq!(
        doc.render().unwrap(),
        "<h1>Todos</h1><span>2</span><ul><li>walk dog</li><li>write tests</li></ul>"
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "removed");
    assert_eq!(events[0].payload.get("id"), Some(&Value::Integer(1)));
}

#[test]
fn test_rejected_update_then_resync() {
    let mut doc = Document::from_json(&common::components_payload().to_string()).unwrap();
    doc.apply_json(r#"{"c": {"1": {"0": "first!"}}}"#).unwrap();
    let before = doc.root().clone();

    let err = doc.apply_json(r#"{"c": {"42": {"0": "nope"}}}"#).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::State);
    assert!(err.requires_resync());
    assert_eq!(err.context().unwrap().sequence, Some(2));
    assert_eq!(err.context().unwrap().component, Some(42));
    assert_eq!(doc.root(), &before);
    assert_eq!(doc.sequence(), 1);

    // Caller fetches a fresh root and starts over
    doc.reset(decode_root(&common::components_payload()).unwrap());
    assert_eq!(doc.sequence(), 0);
    assert_eq!(doc.render().unwrap(), common::components_markup());
}

#[test]
fn test_malformed_diff_is_protocol_error() {
    let mut doc = Document::from_json(&common::page_payload().to_string()).unwrap();

    let err = doc.apply_json(r#"{"0": [1, 2]}"#).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert!(err.as_decode().is_some());
    assert!(!err.user_message().is_empty());
    assert_eq!(doc.render().unwrap(), common::page_markup());
}

#[test]
fn test_invalid_join_payload() {
    let err = Document::from_json(r#"{"0": "a"}"#).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert_eq!(err.error_code(), "E_DECODE_MISSING_KEY");
}

#[test]
fn test_config_carried_to_render() {
    let root = Root::new(Fragment::regular(
        vec![Child::ComponentId(1)],
        Statics::inline(["", ""]),
    ))
    .with_component(
        1,
        Component::new(vec![Child::ComponentId(2)], Statics::inline(["<", ">"])),
    )
    .with_component(2, Component::new(vec!["x".into()], Statics::inline(["(", ")"])));

    assert_eq!(Document::new(root.clone()).render().unwrap(), "<(x)>");

    // Two nested components below the root exceed a limit of one
    let doc = Document::with_config(root, TreeConfig::default().with_max_depth(1));
    let err = doc.render().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Internal);
    assert!(!err.requires_resync());
    assert_eq!(err.error_code(), "E_RENDER_DEPTH");
}

#[test]
fn test_events_only_diff_keeps_tree() {
    let mut doc = Document::from_json(&common::page_payload().to_string()).unwrap();

    let events = doc.apply_json(r#"{"e": [["ping", null]]}"#).unwrap();

    assert_eq!(events, vec![PushEvent::new("ping", Value::Null)]);
    assert_eq!(doc.render().unwrap(), common::page_markup());
    assert_eq!(doc.sequence(), 1);
}

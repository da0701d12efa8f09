//! Common test utilities for integration tests.
//!
//! Payload fixtures shaped like what a server sends on join and on update,
//! plus a tracing initializer so `RUST_LOG=livetree=trace cargo test` shows
//! the crate's logs.

#![allow(dead_code)]

use serde_json::{json, Value as JsonValue};

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A page with a heading, a counter and a list rendered through a comprehension.
pub fn page_payload() -> JsonValue {
    json!({
        "0": "Todos",
        "1": "3",
        "2": {
            "d": [["buy milk"], ["walk dog"], ["write tests"]],
            "s": ["<li>", "</li>"]
        },
        "s": ["<h1>", "</h1><span>", "</span><ul>", "</ul>"],
        "t": "Todo list"
    })
}

pub fn page_markup() -> &'static str {
    "<h1>Todos</h1><span>3</span><ul><li>buy milk</li><li>walk dog</li><li>write tests</li></ul>"
}

/// Two card components; the second shares the first one's statics.
pub fn components_payload() -> JsonValue {
    json!({
        "0": 1,
        "1": 2,
        "s": ["<main>", "", "</main>"],
        "c": {
            "1": {"0": "first", "s": ["<div class=\"card\">", "</div>"]},
            "2": {"0": "second", "s": -1}
        }
    })
}

pub fn components_markup() -> &'static str {
    "<main><div class=\"card\">first</div><div class=\"card\">second</div></main>"
}

/// A table whose rows are fragments sharing a template.
pub fn template_payload() -> JsonValue {
    json!({
        "0": {
            "d": [
                [{"0": "a", "1": "1", "s": 0}],
                [{"0": "b", "1": "2", "s": 0}]
            ],
            "p": {"0": ["<td>", "</td><td>", "</td>"]},
            "s": ["<tr>", "</tr>"]
        },
        "s": ["<table>", "</table>"]
    })
}

pub fn template_markup() -> &'static str {
    "<table><tr><td>a</td><td>1</td></tr><tr><td>b</td><td>2</td></tr></table>"
}

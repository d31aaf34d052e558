#![allow(missing_docs, dead_code)]
#![allow(clippy::needless_raw_string_hashes)]

/// A tool-call style response used across the integration tests.
pub const DOCUMENT: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "score": 0.125,
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "attempt": 3,
        "options": {
            "opt_level": "2",
            "strict": true,
            "features": [
                "serde",
                "tokio"
            ]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")"
    ],
    "entities": [
        {
            "type": "function",
            "name": "main",
            "line": 1
        },
        {
            "type": "macro",
            "name": "println",
            "line": 2
        }
    ],
    "matrix": [
        [
            "a"
        ]
    ],
    "mixed": [
        "s",
        {
            "k": "v"
        },
        "t",
        [
            "u"
        ],
        "end"
    ],
    "caf\u00e9": "escaped key",
    "nested_objects": {
        "outer": {
            "inner": 1
        }
    }
}"#;

/// [`DOCUMENT`] without insignificant whitespace, as a server would send it.
#[rustfmt::skip]
pub const COMPACT: [&str; 8] = [
    r#"{"moderation":{"decision":"allow","score":0.125,"reason":null},"#,
    r#""request":{"filename":"example.rs","language":"rust","attempt":3,"#,
    r#""options":{"opt_level":"2","strict":true,"features":["serde","tokio"]}},"#,
    r#""snippets":["fn main() {}","println!(\"hi\")"],"#,
    r#""entities":[{"type":"function","name":"main","line":1},{"type":"macro","name":"println","line":2}],"#,
    r#""matrix":[["a"]],"mixed":["s",{"k":"v"},"t",["u"],"end"],"#,
    r#""café":"escaped key","#,
    r#""nested_objects":{"outer":{"inner":1}}}"#,
];

#[test]
fn fixtures_describe_the_same_document() {
    use lazyjson::{LazyNode, LazyValue};

    let pretty = LazyValue::parse(DOCUMENT).unwrap();
    let compact = LazyValue::parse(COMPACT.concat()).unwrap();
    assert_ne!(pretty, compact);
    assert_eq!(pretty.keys().collect::<Vec<_>>(), compact.keys().collect::<Vec<_>>());
    assert_eq!(pretty.object().unwrap(), compact.object().unwrap());

    let oracle: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
    assert_eq!(serde_json::to_string(&oracle).unwrap(), COMPACT.concat());
}

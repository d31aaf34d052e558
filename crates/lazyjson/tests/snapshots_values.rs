#![expect(missing_docs)]
#![allow(clippy::needless_raw_string_hashes)]

mod common;

use core::fmt::Write;

use lazyjson::{LazyNode, LazyValue, ParseOptions, path};

/// One line per child: key or index, type, and encoded text.
fn render_children(value: &LazyValue) -> String {
    let mut out = String::new();
    if value.keys().len() > 0 {
        for (key, child) in value.keys().zip(value) {
            writeln!(out, "{key}: {} {}", child.value_type(), child.to_text()).unwrap();
        }
    } else {
        for (i, child) in value.iter().enumerate() {
            writeln!(out, "{i}: {} {}", child.value_type(), child.to_text()).unwrap();
        }
    }
    out
}

fn render_error(input: &str, options: ParseOptions) -> String {
    match LazyValue::parse_with(input.to_owned(), options) {
        Ok(v) => format!("ok: {v:?}"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn snapshot_children() {
    let doc = LazyValue::parse(common::DOCUMENT).unwrap();

    insta::assert_snapshot!(render_children(doc.get(&path!["request"]).unwrap()), @r#"
    filename: string "example.rs"
    language: string "rust"
    attempt: number 3
    options: object {
                "opt_level": "2",
                "strict": true,
                "features": [
                    "serde",
                    "tokio"
                ]
            }
    "#);
    insta::assert_snapshot!(render_children(doc.get(&path!["mixed"]).unwrap()), @r#"
    0: string "s"
    1: object {
                "k": "v"
            }
    2: string "t"
    3: array [
                "u"
            ]
    4: string "end"
    "#);
}

#[test]
fn snapshot_materialized() {
    let doc = LazyValue::parse(common::COMPACT.concat()).unwrap();

    insta::assert_snapshot!(doc.object_at(&path!["entities"]).unwrap().unwrap(), @r#"[{"line":1,"name":"main","type":"function"},{"line":2,"name":"println","type":"macro"}]"#);
    insta::assert_snapshot!(doc.object_at(&path!["moderation"]).unwrap().unwrap(), @r#"{"decision":"allow","reason":null,"score":0.125}"#);
    insta::assert_snapshot!(doc.object_at(&path!["snippets"]).unwrap().unwrap(), @r#"["fn main() {}","println!(\"hi\")"]"#);
}

#[test]
fn snapshot_errors() {
    let strict = ParseOptions::default();
    let lenient = ParseOptions {
        validate: false,
        ..Default::default()
    };

    insta::assert_snapshot!(render_error("", strict), @"decode error: unexpected end of input at byte 0");
    insta::assert_snapshot!(render_error(r#"{"a": [1, 2,]}"#, strict), @"decode error: invalid character ']' at byte 12");
    insta::assert_snapshot!(render_error(r#"["\x"]"#, strict), @r"decode error: invalid escape sequence '\x' at byte 3");
    insta::assert_snapshot!(render_error("[1] [2]", strict), @"decode error: trailing characters at byte 4");
    insta::assert_snapshot!(render_error("\"a\u{1}\"", strict), @"decode error: unescaped control character 0x01 in string at byte 2");
    insta::assert_snapshot!(render_error(r#"{"a": [1, 2,]}"#, lenient), @r#"ok: Object("{\"a\": [1, 2,]}")"#);

    let doc = LazyValue::parse(r#"{"n": 1.5, "s": "x"}"#).unwrap();
    insta::assert_snapshot!(doc.to_bool_at(&path!["n"]).unwrap_err(), @"type mismatch: expected boolean, found number");
    insta::assert_snapshot!(doc.to_i64_at(&path!["s"]).unwrap_err(), @"type mismatch: expected number, found string");
    insta::assert_snapshot!(doc.to_text_at(&path!["n"]).unwrap(), @"1.5");
}

#![allow(missing_docs)]

mod common;

use lazyjson::{LazyNode, LazyValue, PathComponent, Value, ValueType, path};
use rstest::{fixture, rstest};

#[fixture]
fn document() -> LazyValue {
    LazyValue::parse(common::DOCUMENT).unwrap()
}

#[rstest]
#[case::top_level(&path!["moderation"], ValueType::Object)]
#[case::nested_string(&path!["request", "options", "opt_level"], ValueType::String)]
#[case::through_array(&path!["entities", 1, "line"], ValueType::Number)]
#[case::matrix(&path!["matrix", 0, 0], ValueType::String)]
#[case::null(&path!["moderation", "reason"], ValueType::Null)]
#[case::escaped_key(&path!["café"], ValueType::String)]
fn resolves_paths(
    document: LazyValue,
    #[case] path: &[PathComponent<'static>],
    #[case] expected: ValueType,
) {
    assert_eq!(document.get(path).map(LazyNode::value_type), Some(expected));
}

#[rstest]
#[case::unknown_key(&path!["nope"])]
#[case::index_out_of_range(&path!["snippets", 2])]
#[case::key_on_array(&path!["entities", "type"])]
#[case::index_on_object(&path!["request", 0])]
#[case::past_a_scalar(&path!["request", "attempt", 0])]
fn misses_are_absent(document: LazyValue, #[case] path: &[PathComponent<'static>]) {
    assert!(document.get(path).is_none());
    assert_eq!(document.to_i64_at(path).unwrap(), 0);
    assert!(!document.to_bool_at(path).unwrap());
    assert_eq!(document.to_text_at(path), None);
}

#[rstest]
fn typed_reads(document: LazyValue) {
    assert_eq!(document.to_i32_at(&path!["request", "attempt"]).unwrap(), 3);
    assert!(document.to_bool_at(&path!["request", "options", "strict"]).unwrap());
    assert!((document.to_f64_at(&path!["moderation", "score"]).unwrap() - 0.125).abs() < f64::EPSILON);
    assert_eq!(
        document.to_str_at(&path!["snippets", 1]).unwrap().as_deref(),
        Some("println!(\"hi\")")
    );
    assert_eq!(
        document.to_text_at(&path!["snippets", 1]).as_deref(),
        Some(r#""println!(\"hi\")""#)
    );
}

#[rstest]
fn walks_containers(document: LazyValue) {
    let names: Vec<String> = document
        .get(&path!["entities"])
        .unwrap()
        .iter()
        .map(|entity| entity.to_str_at(&path!["name"]).unwrap().unwrap().into_owned())
        .collect();
    assert_eq!(names, ["main", "println"]);

    let mixed = document.get_key("mixed").unwrap();
    let shapes: Vec<ValueType> = mixed.into_iter().map(LazyNode::value_type).collect();
    assert_eq!(
        shapes,
        [
            ValueType::String,
            ValueType::Object,
            ValueType::String,
            ValueType::Array,
            ValueType::String
        ]
    );

    let top: Vec<&str> = document.keys().collect();
    assert_eq!(
        top,
        [
            "moderation",
            "request",
            "snippets",
            "entities",
            "matrix",
            "mixed",
            "café",
            "nested_objects"
        ]
    );
}

#[rstest]
fn materializes_one_branch(document: LazyValue) {
    let options = document.object_at(&path!["request", "options"]).unwrap().unwrap();
    assert_eq!(
        options.to_string(),
        r#"{"features":["serde","tokio"],"opt_level":"2","strict":true}"#
    );
    assert_eq!(
        options.get("features"),
        Some(&Value::Array(vec!["serde".into(), "tokio".into()]))
    );
}

#[test]
fn compact_and_pretty_agree_on_every_leaf() {
    fn leaves(value: &LazyValue, out: &mut Vec<String>) {
        match value.value_type() {
            ValueType::Array | ValueType::Object => {
                for child in value {
                    leaves(child, out);
                }
            }
            _ => out.push(value.to_text().into_owned()),
        }
    }

    let pretty = LazyValue::parse(common::DOCUMENT).unwrap();
    let compact = LazyValue::parse(common::COMPACT.concat()).unwrap();
    let (mut a, mut b) = (Vec::new(), Vec::new());
    leaves(&pretty, &mut a);
    leaves(&compact, &mut b);
    assert_eq!(a, b);
    assert_eq!(a.len(), 26);
}

#![no_main]

use arbitrary::Arbitrary;
use lazyjson::{LazyNode, LazyValue, ParseOptions, PathComponent};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Key(String),
    Index(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    document: Vec<u8>,
    validate: bool,
    allow_trailing: bool,
    path: Vec<Step>,
}

/// Touches every accessor; none of them may panic, whatever the bytes are.
fn exercise(value: &LazyValue) {
    let _ = value.to_text();
    let _ = value.to_bool();
    let _ = value.to_i32();
    let _ = value.to_i64();
    let _ = value.to_f64();
    let _ = value.to_str();
    let _ = value.object();
    for key in value.keys() {
        assert!(value.get_key(key).is_some());
    }
    assert_eq!(value.iter().count(), value.size());
}

fuzz_target!(|input: Input| {
    let options = ParseOptions {
        validate: input.validate,
        allow_trailing: input.allow_trailing,
    };
    let path: Vec<PathComponent<'_>> = input
        .path
        .iter()
        .map(|step| match step {
            Step::Key(key) => PathComponent::Key(key),
            Step::Index(i) => PathComponent::Index(usize::from(*i)),
        })
        .collect();

    let oracle_accepts = serde_json::from_slice::<serde_json::Value>(&input.document).is_ok();
    let Ok(root) = LazyValue::parse_with(input.document, options) else {
        // Everything serde_json accepts must be accepted here too.
        assert!(!oracle_accepts);
        return;
    };
    if input.validate && oracle_accepts {
        assert!(root.object().is_ok());
    }

    exercise(&root);
    let mut node = Some(&root);
    for component in &path {
        node = node.and_then(|n| match *component {
            PathComponent::Key(key) => n.get_key(key),
            PathComponent::Index(i) => n.get_index(i),
        });
        match node {
            Some(n) => exercise(n),
            None => break,
        }
    }
    assert_eq!(root.get(&path).is_some(), node.is_some());
});

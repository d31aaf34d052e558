use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use std::dbg;

use quickcheck::QuickCheck;

use crate::{LazyNode, LazyValue, Value};

fn oracle(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

/// Property: navigating a rendered document finds the same children that
/// `serde_json` does, and materializing it gives back the original value.
#[test]
fn lazy_navigation_matches_serde_json() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        let lazy = LazyValue::parse(text.clone()).unwrap();
        let expected = oracle(&text);

        if lazy.to_text() != text || lazy.object().unwrap() != value {
            dbg!(&text);
            return false;
        }

        match &expected {
            serde_json::Value::Array(items) => {
                lazy.size() == items.len()
                    && lazy
                        .iter()
                        .zip(items)
                        .all(|(child, item)| oracle(&child.to_text()) == *item)
            }
            serde_json::Value::Object(fields) => {
                let keys: Vec<&str> = lazy.keys().collect();
                let oracle_keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                keys == oracle_keys
                    && fields.iter().all(|(key, item)| {
                        lazy.get_key(key)
                            .is_some_and(|child| oracle(&child.to_text()) == *item)
                    })
            }
            _ => lazy.size() == 0 && lazy.keys().next().is_none(),
        }
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: a non-validating parse of valid input indexes containers exactly
/// as a validating one does.
#[test]
fn unvalidated_scan_agrees_on_valid_input() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let text = value.to_string();
        let checked = LazyValue::parse(text.clone()).unwrap();
        let unchecked = LazyValue::parse_with(
            text,
            crate::ParseOptions {
                validate: false,
                ..Default::default()
            },
        )
        .unwrap();
        checked == unchecked
            && checked.iter().eq(unchecked.iter())
            && checked.keys().eq(unchecked.keys())
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(Value) -> bool);
}

//! Gating a tool-call response on its moderation verdict before touching the
//! rest of it.
//!
//! The assistant's tool description yields a JSON object shaped roughly like
//! this (abridged):
//!
//! ```text
//! {
//!   "moderation": {
//!     "decision": "allow" | "block",
//!     "reason":   string | null
//!   },
//!   "filename":   string,
//!   "language":   string,
//!   "code":       string
//! }
//! ```
//!
//! Only `moderation.decision` is decoded up front. When the content is
//! blocked the potentially large `code` string is never unescaped, and the
//! rest of the document is never materialized.
//!
//! Run with
//!
//! ```bash
//! cargo run -p lazyjson --example moderation_gate
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use lazyjson::{Error, LazyNode, LazyValue, path};

#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
struct Moderation {
    decision: String,
    reason: Option<String>,
}

fn handle(response: &'static str) -> Result<(), Error> {
    let doc = LazyValue::parse(response)?;

    let decision = doc.to_str_at(&path!["moderation", "decision"])?;
    if decision.as_deref() != Some("allow") {
        #[cfg(feature = "serde")]
        if let Some(m) = doc.deserialize_at::<Moderation>(&path!["moderation"])? {
            eprintln!("blocked ({}): {}", m.decision, m.reason.as_deref().unwrap_or("no reason"));
            return Ok(());
        }
        eprintln!("blocked: {}", doc.to_text_at(&path!["moderation"]).unwrap_or_default());
        return Ok(());
    }

    let filename = doc.to_str_at(&path!["filename"])?.unwrap_or_default();
    let language = doc.to_str_at(&path!["language"])?.unwrap_or_default();
    println!("// {filename} ({language})");
    if let Some(code) = doc.to_str_at(&path!["code"])? {
        println!("{code}");
    }
    println!("// {} top-level fields", doc.size());
    Ok(())
}

fn main() -> Result<(), Error> {
    handle(
        r#"{"moderation":{"decision":"allow","reason":null},"filename":"example.rs","language":"rust","code":"use lazyjson::LazyValue;\nfn main() {\n    println!(\"Hello from lazyjson!\");\n}\n"}"#,
    )?;
    handle(
        r#"{"moderation":{"decision":"block","reason":"policy"},"filename":"evil.rs","language":"rust","code":"..."}"#,
    )
}

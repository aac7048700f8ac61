//! Working with documents and flagged values at runtime.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_kv3::{kv3, parse, to_value, Document, Flags, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Sound {
    event: String,
    volume: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build a document with the kv3! macro; flags survive the Document API
    let root = kv3!({
        "model": (RESOURCE: "models/props/crate.vmdl"),
        "break_sound": (SOUNDEVENT: "crate.break"),
        "gibs": [1, 2, 3],
        "solid": true
    });
    let mut doc = Document::new(root);
    if let Value::Object(map) = &mut doc.root {
        map.insert(
            "notes".to_string(),
            Value::multiline("Spawned by the level script.\nDo not move."),
        );
    }

    let text = doc.to_kv3_string()?;
    println!("Document:\n{}\n", text);

    // Parse it back and inspect values dynamically
    let parsed = parse(&text)?;
    println!("Format: {}", parsed.header.format_name());
    if let Some(map) = parsed.root.as_object() {
        for (key, value) in map {
            if value.flags().is_empty() {
                println!("  {} is a {}", key, value.kind());
            } else {
                println!("  {} is a {} flagged {}", key, value.unflagged().kind(), value.flags());
            }
        }
        if let Some(model) = map.get("model") {
            assert!(model.flags().contains(Flags::RESOURCE));
        }
    }
    assert_eq!(parsed, doc);

    // Convert an existing struct to a Value
    let sound = Sound {
        event: "crate.break".to_string(),
        volume: 0.8,
    };
    let sound_value = to_value(&sound)?;
    println!("\nSound as a document:\n{}", Document::new(sound_value).to_kv3_string()?);

    Ok(())
}

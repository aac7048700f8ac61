//! Basic KV3 serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_kv3::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Prop {
    name: String,
    model: String,
    health: u32,
    scale: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let props = vec![
        Prop {
            name: "wooden_crate".to_string(),
            model: "models/props/crate.vmdl".to_string(),
            health: 50,
            scale: 1.0,
        },
        Prop {
            name: "metal_barrel".to_string(),
            model: "models/props/barrel.vmdl".to_string(),
            health: 200,
            scale: 1.25,
        },
    ];

    // Serialize to KV3
    let text = to_string(&props)?;
    println!("KV3 output:\n{}\n", text);

    // Deserialize back to structs
    let props_back: Vec<Prop> = from_str(&text)?;
    assert_eq!(props, props_back);
    println!("✓ Round-trip successful");

    Ok(())
}

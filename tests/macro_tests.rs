use serde_kv3::{kv3, Document, Flags, Kv3Map, Value};

#[test]
fn test_kv3_macro_null() {
    assert_eq!(kv3!(null), Value::Null);
}

#[test]
fn test_kv3_macro_booleans() {
    assert_eq!(kv3!(true), Value::Bool(true));
    assert_eq!(kv3!(false), Value::Bool(false));
}

#[test]
fn test_kv3_macro_numbers() {
    assert_eq!(kv3!(42), Value::Int(42));
    assert_eq!(kv3!(3.5), Value::Float(3.5));
    assert_eq!(kv3!(-123), Value::Int(-123));
    let big = u64::MAX;
    assert_eq!(kv3!(big).as_i64(), None);
}

#[test]
fn test_kv3_macro_strings() {
    assert_eq!(kv3!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(kv3!(""), Value::String(String::new()));
}

#[test]
fn test_kv3_macro_arrays() {
    assert_eq!(kv3!([]), Value::Array(vec![]));
    assert_eq!(
        kv3!([1, "hello", true, null]),
        Value::Array(vec![
            Value::Int(1),
            Value::from("hello"),
            Value::Bool(true),
            Value::Null,
        ])
    );
    assert_eq!(
        kv3!([[1, 2], []]),
        Value::Array(vec![
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
            Value::Array(vec![]),
        ])
    );
}

#[test]
fn test_kv3_macro_objects_keep_order() {
    assert_eq!(kv3!({}), Value::Object(Kv3Map::new()));

    let value = kv3!({
        "zeta": 1,
        "alpha": { "inner": [true] },
        "mid": null,
    });
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_kv3_macro_flags() {
    let value = kv3!(SOUNDEVENT: "ui.click");
    assert_eq!(value, Value::flagged(Value::from("ui.click"), Flags::SOUNDEVENT));

    let combined = kv3!(RESOURCE | RESOURCE_NAME: "x.vmdl");
    assert_eq!(combined.flags(), Flags::RESOURCE | Flags::RESOURCE_NAME);

    let nested = kv3!({ "child": (SUBCLASS: { "name": "base" }) });
    let child = nested.as_object().and_then(|o| o.get("child")).unwrap();
    assert_eq!(child.flags(), Flags::SUBCLASS);
    assert!(child.unflagged().is_object());
}

#[test]
fn test_kv3_macro_expressions() {
    let name = String::from("crate");
    let count = 3u8;
    let notes = Value::multiline("a\nb");
    let value = kv3!({ "name": name, "count": count, "multi": notes });
    let map = value.as_object().unwrap();
    assert_eq!(map.get("name"), Some(&Value::from("crate")));
    assert_eq!(map.get("count"), Some(&Value::Int(3)));
    assert_eq!(map.get("multi"), Some(&Value::multiline("a\nb")));
}

#[test]
fn test_kv3_macro_document_round_trip() {
    let value = kv3!({
        "name": "crate",
        "model": (RESOURCE: "models/crate.vmdl"),
        "tags": ["wood", (PANORAMA: "icon")]
    });
    let doc = Document::new(value);
    let text = doc.to_kv3_string().unwrap();
    assert_eq!(Document::parse(&text).unwrap(), doc);
}

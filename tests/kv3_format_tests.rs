use pretty_assertions::assert_eq;
use serde_kv3::{
    kv3, parse, Document, Error, ErrorCategory, FlaggedValue, Flags, Header, Kv3Map, Kv3Options,
    Rule, Value,
};

const HEADER: &str = "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->";

fn doc(body: &str) -> String {
    format!("{}\n{}", HEADER, body)
}

fn write(root: Value) -> String {
    Document::new(root).to_kv3_string().unwrap()
}

#[test]
fn test_inline_array_of_ints() {
    assert_eq!(write(kv3!([1, 2, 3])), doc("[1, 2, 3]"));
}

#[test]
fn test_array_with_object_is_block() {
    let text = write(kv3!({ "list": [1, { "a": true }] }));
    assert_eq!(
        text,
        doc("{\n\tlist = \n\t[\n\t\t1,\n\t\t{\n\t\t\ta = true\n\t\t},\n\t]\n}")
    );
    assert_eq!(
        parse(&text).unwrap().root,
        kv3!({ "list": [1, { "a": true }] })
    );
}

#[test]
fn test_array_of_block_arrays_is_block() {
    let text = write(kv3!([[{}]]));
    assert_eq!(text, doc("[\n\t[\n\t\t{\n\t\t},\n\t],\n]"));
    assert_eq!(parse(&text).unwrap().root, kv3!([[{}]]));
}

#[test]
fn test_flag_combination_order() {
    let value = Value::flagged(Value::from("x"), Flags::RESOURCE_NAME | Flags::RESOURCE);
    assert_eq!(write(value), doc("resource+resourcename:\"x\""));
}

#[test]
fn test_flags_read_case_insensitive_and_pipe() {
    let parsed = parse(&doc("RESOURCENAME|Resource:\"x\"")).unwrap();
    assert_eq!(parsed.root.flags(), Flags::RESOURCE | Flags::RESOURCE_NAME);
    assert_eq!(
        parsed.to_kv3_string().unwrap(),
        doc("resource+resourcename:\"x\"")
    );
}

#[test]
fn test_object_order_preserved() {
    let mut map = Kv3Map::new();
    for key in ["c", "a", "b"] {
        map.insert(key.to_string(), Value::from(key));
    }
    let text = write(Value::Object(map));
    assert_eq!(text, doc("{\n\tc = \"c\"\n\ta = \"a\"\n\tb = \"b\"\n}"));

    let keys: Vec<String> = parse(&text)
        .unwrap()
        .root
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[test]
fn test_floats_are_rounded() {
    let text = write(Value::Array(vec![
        Value::Float(64.0),
        Value::Float(0.1),
        Value::Float(1.23456789),
        Value::Float(-0.5),
    ]));
    assert_eq!(text, doc("[64.0, 0.1, 1.234568, -0.5]"));
}

#[test]
fn test_float_precision_option() {
    let text = Document::new(Value::Float(3.14159))
        .to_kv3_string_with_options(Kv3Options::new().with_float_precision(2))
        .unwrap();
    assert_eq!(text, doc("3.14"));
}

#[test]
fn test_int_and_float_distinguished() {
    assert_eq!(parse(&doc("5")).unwrap().root, Value::Int(5));
    assert_eq!(parse(&doc("5.0")).unwrap().root, Value::Float(5.0));
    assert_eq!(write(Value::Float(5.0)), doc("5.0"));
}

#[test]
fn test_quoted_keys() {
    let text = write(kv3!({ "my key": 1, "": 2, "ok_key": 3 }));
    assert_eq!(
        text,
        doc("{\n\t\"my key\" = 1\n\t\"\" = 2\n\tok_key = 3\n}")
    );
    assert_eq!(
        parse(&text).unwrap().root,
        kv3!({ "my key": 1, "": 2, "ok_key": 3 })
    );
}

#[test]
fn test_multiline_string_layout() {
    let value = Value::multiline("\nfirst\n\tsecond\n");
    let text = write(value.clone());
    assert_eq!(text, doc("\"\"\"\nfirst\n\tsecond\n\"\"\""));
    assert_eq!(parse(&text).unwrap().root, value);
}

#[test]
fn test_multiline_string_ending_in_quote() {
    let value = Value::multiline("say \"hi\"");
    let text = write(value.clone());
    assert_eq!(parse(&text).unwrap().root, value);
}

#[test]
fn test_header_whitespace_is_lenient() {
    let text = "<!--\tkv3  encoding:text:version{E21C7F3C-8A33-41C5-9977-A76D3A32AA0D}\tformat:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7}  -->\r\nnull";
    let parsed = parse(text).unwrap();
    assert_eq!(parsed.header, Header::default());
    assert_eq!(parsed.to_kv3_string().unwrap(), doc("null"));
}

#[test]
fn test_header_line_ending_is_optional() {
    let text = format!("{}null", HEADER);
    let parsed = parse(&text).unwrap();
    assert_eq!(parsed.root, Value::Null);
    assert_eq!(parsed.to_kv3_string().unwrap(), doc("null"));

    let object = parse(&format!("{} {{ a = 1 }}", HEADER)).unwrap();
    assert_eq!(object.to_kv3_string().unwrap(), doc("{\n\ta = 1\n}"));
}

#[test]
fn test_lenient_numbers_are_written_canonically() {
    let text = doc("[+5, 5., .5, 1.5e3, 1E-4, -2.5e+1]");
    let parsed = parse(&text).unwrap();
    assert_eq!(
        parsed.root,
        Value::Array(vec![
            Value::Int(5),
            Value::Float(5.0),
            Value::Float(0.5),
            Value::Float(1500.0),
            Value::Float(0.0001),
            Value::Float(-25.0),
        ])
    );
    assert_eq!(
        parsed.to_kv3_string().unwrap(),
        doc("[5, 5.0, 0.5, 1500.0, 0.0001, -25.0]")
    );
}

#[test]
fn test_overflowing_float_is_syntax_error() {
    let err = parse(&doc(&format!("{{ big = {}.0 }}", "9".repeat(400)))).unwrap_err();
    match err {
        Error::Syntax { position, expected } => {
            assert_eq!(expected, Rule::Float);
            assert_eq!((position.line, position.column), (2, 9));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_syntax_error_position() {
    let err = parse(&doc("{\n\tkey \"value\"\n}")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    match err {
        Error::Syntax { position, expected } => {
            assert_eq!(expected, Rule::Literal("="));
            assert_eq!((position.line, position.column), (3, 6));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_header_is_syntax_error() {
    let err = parse("{ a = 1 }").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            expected: Rule::Header,
            ..
        }
    ));
}

#[test]
fn test_malformed_guid_in_document_is_syntax_error() {
    let text = HEADER.replace("7412167c-06e9", "7412167c-06e");
    let err = parse(&format!("{}\nnull", text)).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            expected: Rule::Guid,
            ..
        }
    ));
}

#[test]
fn test_malformed_guid_in_constructor() {
    let err = Header::from_parts("text", "123-123", "generic", "234-234").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_empty_document_error() {
    let err = parse(&format!("{}\n  /* nothing */  ", HEADER)).unwrap_err();
    assert!(matches!(err, Error::EmptyDocument));
    assert_eq!(err.category(), ErrorCategory::Semantic);
}

#[test]
fn test_unknown_flag_error() {
    let err = parse(&doc("{ a = multiline:\"x\" }")).unwrap_err();
    match err {
        Error::UnknownFlag { ref name, .. } => assert_eq!(name, "multiline"),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.category(), ErrorCategory::Semantic);
}

#[test]
fn test_binary_blob_not_implemented() {
    let err = parse(&doc("{ data = #[ 0a 1b 2c ] }")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotImplemented);
    assert!(err.to_string().contains("binary blob"));
}

#[test]
fn test_invalid_trees_rejected() {
    let nested = Value::Flagged(FlaggedValue::new(
        Value::flagged(Value::from("x"), Flags::RESOURCE),
        Flags::SUBCLASS,
    ));
    for tree in [
        nested,
        Value::flagged(Value::Null, Flags::empty()),
        Value::from("a \"quoted\" word"),
        Value::Float(f64::NAN),
        Value::BigInt(5.into()),
        kv3!({ "bad\"key": 1 }),
    ] {
        let err = Document::new(tree).to_kv3_string().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}

#[test]
fn test_canonical_text_is_fixed_point() {
    let text = doc(
        "{\n\tname = \"crate\"\n\tmodel = resource:\"models/crate.vmdl\"\n\tbounds = \n\t{\n\t\tmins = [-16.0, -16.0, 0.0]\n\t\tmaxs = [16.0, 16.0, 32.0]\n\t}\n\tgibs = \n\t[\n\t\t{\n\t\t\tmodel = resource:\"models/gib1.vmdl\"\n\t\t},\n\t]\n\tnotes = \"\"\"\nhandle with care\n\"\"\"\n\tempty = \n\t{\n\t}\n\tnothing = null\n}",
    );
    let again = parse(&text).unwrap().to_kv3_string().unwrap();
    assert_eq!(again, text);
}

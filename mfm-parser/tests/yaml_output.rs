//! YAML output of full conversions

use mfm_parser::{convert, FunctionKey};
use serde::Deserialize;
use serde_yaml::Value;

fn convert_str(source: &str) -> String {
    let mut out = Vec::new();
    convert(source.as_bytes(), &mut out).expect("conversion to succeed");
    String::from_utf8(out).expect("output to be UTF-8")
}

fn documents(output: &str) -> Vec<Value> {
    serde_yaml::Deserializer::from_str(output)
        .map(|document| Value::deserialize(document).expect("valid YAML document"))
        .collect()
}

#[test]
fn test_fixture_output() {
    let output = convert_str(include_str!("fixtures/basic.mfm"));

    insta::assert_snapshot!(output, @r"
    Color:
      0: White
      1: Red
      2: Green
      3: Blue
      255: None
    FontSize:
      50: Small
      100: Normal
      150: Large
    ---
    '[0, 0]': !Ruby
    - !u16 Rt
    '[0, 2]': !Size
    - !FontSize Size
    '[0, 3]': !Color
    - !Color Color
    '[1, 0]': !PlayerName []
    '[1, 1]': !Counter
    - !u16 Id
    - !s16 Padding
    '[2, 5]': !Wait
    - !u32 Frames
    ");
}

#[test]
fn test_output_is_two_documents() {
    let output = convert_str("map Kind int\n0 Foo\n1 Bar\n[1, 2] doThing {Kind} k int n\n");
    let docs = documents(&output);
    assert_eq!(docs.len(), 2);

    let kind = docs[0]["Kind"].as_mapping().expect("enum values mapping");
    let values: Vec<(i64, &str)> = kind
        .iter()
        .map(|(key, name)| (key.as_i64().unwrap(), name.as_str().unwrap()))
        .collect();
    assert_eq!(values, vec![(0, "Foo"), (1, "Bar")]);

    let functions = docs[1].as_mapping().expect("functions mapping");
    let keys: Vec<FunctionKey> = functions
        .keys()
        .map(|key| key.as_str().unwrap().parse().unwrap())
        .collect();
    assert_eq!(keys, vec![FunctionKey::new(1, 2)]);
}

#[test]
fn test_separator_line() {
    let output = convert_str("");
    assert_eq!(output, "{}\n---\n{}\n");

    let output = convert_str("[7, 8] f\n");
    assert!(output.starts_with("{}\n---\n"));
    assert_eq!(output.lines().filter(|line| *line == "---").count(), 1);
}

#[test]
fn test_negative_keys_round_trip() {
    let output = convert_str("map Sign s8\n-1 minus\n[-3, -4] neg\n");
    let docs = documents(&output);

    let (key, _) = docs[0]["Sign"].as_mapping().unwrap().iter().next().unwrap();
    assert_eq!(key.as_i64(), Some(-1));

    let (key, _) = docs[1].as_mapping().unwrap().iter().next().unwrap();
    let key: FunctionKey = key.as_str().unwrap().parse().unwrap();
    assert_eq!(key, FunctionKey::new(-3, -4));
}

#[test]
fn test_bang_prefixed_function_name_is_not_truncated() {
    let output = convert_str("[1, 2] !!str int a\n");
    assert_eq!(output, "{}\n---\n'[1, 2]':\n- !int A\n");

    let docs = documents(&output);
    assert!(docs[1]["[1, 2]"].as_sequence().is_some());
}

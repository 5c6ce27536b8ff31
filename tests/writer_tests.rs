//! Rendering the model back to INI text

use ini_config::{AssignmentCharacter, ConfigParser, ParserOptions, Value};

#[test]
fn test_set_global_produces_default_block() {
    let mut parser = ConfigParser::new();
    parser.set_global("ServerAliveInterval", 45);
    parser.add_section("bitbucket.org").unwrap();
    parser.set("bitbucket.org", "User", "hg").unwrap();

    assert_eq!(
        parser.write(),
        "[DEFAULT]\nServerAliveInterval = 45\n\n[bitbucket.org]\nUser = hg"
    );
}

#[test]
fn test_empty_parser_writes_nothing() {
    assert_eq!(ConfigParser::new().write(), "");
}

#[test]
fn test_padding_defaults_and_overrides() {
    let mut parser = ConfigParser::new();
    parser.set_global("k", "v");
    assert_eq!(parser.write(), "[DEFAULT]\nk = v");

    let colon = ParserOptions::new().with_assignment_character(AssignmentCharacter::Colon);
    let mut parser = ConfigParser::with_options(colon.clone());
    parser.set_global("k", "v");
    assert_eq!(parser.write(), "[DEFAULT]\nk: v");

    let mut parser = ConfigParser::with_options(colon.with_leading_spaces(2));
    parser.set_global("k", "v");
    assert_eq!(parser.write(), "[DEFAULT]\nk  :  v");

    let tight = ParserOptions::new()
        .with_leading_spaces(0)
        .with_trailing_spaces(0);
    let mut parser = ConfigParser::with_options(tight);
    parser.set_global("k", "v");
    assert_eq!(parser.write(), "[DEFAULT]\nk=v");
}

#[test]
fn test_boolean_format() {
    let mut parser = ConfigParser::with_options(ParserOptions::new().with_boolean_format("on", "off"));
    parser.set_value("features", "cache", true).unwrap();
    parser.set_value("features", "trace", false).unwrap();
    assert_eq!(parser.write(), "[features]\ncache = on\ntrace = off");

    let reread: ConfigParser = parser.write().parse().unwrap();
    assert_eq!(reread.value("features", "cache"), Some(&Value::Bool(true)));
}

#[test]
fn test_order_survives_value_updates() {
    let mut parser = ConfigParser::new();
    parser.set_value("s", "first", 1).unwrap();
    parser.set_value("s", "second", 2).unwrap();
    parser.set_value("s", "third", 3).unwrap();
    parser.set_value("s", "first", 100).unwrap();

    assert_eq!(parser.write(), "[s]\nfirst = 100\nsecond = 2\nthird = 3");
}

#[test]
fn test_strings_that_look_typed_are_quoted() {
    let mut parser = ConfigParser::new();
    parser.set_value("s", "port", "8080").unwrap();
    parser.set_value("s", "flag", "no").unwrap();
    parser.set_value("s", "padded", "  x ").unwrap();
    parser.set_value("s", "hash", "#notacomment").unwrap();
    parser.set_value("s", "plain", "just text").unwrap();

    let text = parser.write();
    assert_eq!(
        text,
        "[s]\nport = \"8080\"\nflag = \"no\"\npadded = \"  x \"\nhash = \"#notacomment\"\nplain = just text"
    );

    let reread: ConfigParser = text.parse().unwrap();
    assert_eq!(reread.config(), parser.config());
}

#[test]
fn test_floats_keep_their_kind() {
    let mut parser = ConfigParser::new();
    parser.set_value("n", "whole", 3.0).unwrap();
    parser.set_value("n", "big", 1e20).unwrap();
    parser.set_value("n", "small", -0.25).unwrap();

    let reread: ConfigParser = parser.write().parse().unwrap();
    assert_eq!(reread.value("n", "whole"), Some(&Value::Float(3.0)));
    assert_eq!(reread.value("n", "big"), Some(&Value::Float(1e20)));
    assert_eq!(reread.value("n", "small"), Some(&Value::Float(-0.25)));
}

#[test]
fn test_removed_section_is_not_written() {
    let mut parser: ConfigParser = "[a]\nx = 1\n\n[b]\ny = 2\n\n[c]\nz = 3".parse().unwrap();
    parser.remove_section("b").unwrap();
    assert_eq!(parser.write(), "[a]\nx = 1\n\n[c]\nz = 3");
}

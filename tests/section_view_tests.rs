//! Section-scoped accessors

use ini_config::{ConfigParser, IniError, ParserOptions, Value};

fn sample() -> ConfigParser {
    "retries = 3\n\n[http]\nport = 80\nhost = example.com\n\n[https]\nport = 443\n"
        .parse()
        .unwrap()
}

#[test]
fn test_sections_enumerates_in_order() {
    let parser = sample();
    let summary: Vec<(String, usize)> = parser
        .sections()
        .map(|view| (view.name().to_string(), view.len()))
        .collect();
    assert_eq!(
        summary,
        [
            ("DEFAULT".to_string(), 1),
            ("http".to_string(), 2),
            ("https".to_string(), 1),
        ]
    );
}

#[test]
fn test_view_iteration_is_ordered_and_finite() {
    let parser = sample();
    let http = parser.section("http").unwrap();
    let pairs: Vec<_> = http.iter().collect();
    assert_eq!(
        pairs,
        [("port", &Value::Int(80)), ("host", &Value::from("example.com"))]
    );
    assert_eq!(http.iter().count(), 2);
}

#[test]
fn test_view_typed_access_and_fallback() {
    let parser = sample();
    let https = parser.section("https").unwrap();
    assert_eq!(https.get_as::<u16>("port").unwrap(), 443);
    assert_eq!(https.get_as::<i64>("retries").unwrap(), 3);
    assert!(matches!(
        https.get_as::<i64>("host"),
        Err(IniError::OptionNotFound(_))
    ));
}

#[test]
fn test_views_without_fallback() {
    let input = "retries = 3\n[http]\nport = 80\n";
    let parser =
        ConfigParser::from_input(input, ParserOptions::new().with_default_fallback(false)).unwrap();
    let http = parser.section("http").unwrap();
    assert_eq!(http.get("retries"), None);
    assert_eq!(http.get("port"), Some(&Value::Int(80)));
}

#[test]
fn test_mutable_view_is_write_through() {
    let mut parser = sample();
    {
        let mut https = parser.section_mut("https").unwrap();
        https.set("port", 8443);
        https.set("cert", "/etc/tls/cert.pem");
        assert_eq!(https.len(), 2);
        assert_eq!(https.options().collect::<Vec<_>>(), ["port", "cert"]);
    }
    assert_eq!(parser.get_int("https", "port").unwrap(), 8443);
    assert_eq!(
        parser.get_string("https", "cert").unwrap(),
        "/etc/tls/cert.pem"
    );
    assert!(parser.section_mut("ftp").is_none());
}

#[test]
fn test_view_sees_current_state() {
    let mut parser = sample();
    parser.set_value("http", "timeout", 30).unwrap();
    let http = parser.section("http").unwrap();
    assert!(http.contains("timeout"));
    assert_eq!(http.len(), 3);
}

use rampart::http::cookie::{Cookie, parse_header};

#[test]
fn test_cookie_round_trip() {
    let cookies = parse_header("a=1; b=2");

    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies.get("a").unwrap().value(), "1");
    assert_eq!(cookies.get("b").unwrap().value(), "2");
}

#[test]
fn test_parse_single_cookie() {
    let cookies = parse_header("sessionid=deadbeef");
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies.get("sessionid").unwrap().value(), "deadbeef");
}

#[test]
fn test_parse_tolerates_missing_spaces() {
    let cookies = parse_header("a=1;b=2;  c=3");
    assert_eq!(cookies.len(), 3);
    assert_eq!(cookies.get("b").unwrap().value(), "2");
    assert_eq!(cookies.get("c").unwrap().value(), "3");
}

#[test]
fn test_malformed_segments_dropped_silently() {
    let cookies = parse_header("valid=yes; notacookie; =noname; also=fine");
    assert_eq!(cookies.len(), 2);
    assert!(cookies.contains_key("valid"));
    assert!(cookies.contains_key("also"));
}

#[test]
fn test_empty_header_yields_no_cookies() {
    assert!(parse_header("").is_empty());
}

#[test]
fn test_value_may_contain_equals() {
    let cookies = parse_header("token=a=b=c");
    assert_eq!(cookies.get("token").unwrap().value(), "a=b=c");
}

#[test]
fn test_new_cookie_has_unset_attributes() {
    let cookie = Cookie::new("a", "1");
    assert_eq!(cookie.expired(), -1);
    assert_eq!(cookie.max_age(), -1);
    assert!(!cookie.secure());
    assert!(!cookie.httponly());
    assert_eq!(cookie.path(), None);
    assert_eq!(cookie.domain(), None);
}

#[test]
fn test_setters() {
    let mut cookie = Cookie::new("a", "1");
    cookie.set_value("2");
    cookie.set_path("/admin");
    cookie.set_domain("example.com");
    cookie.set_max_age(3600);

    assert_eq!(cookie.value(), "2");
    assert_eq!(cookie.path(), Some("/admin"));
    assert_eq!(cookie.domain(), Some("example.com"));
    assert_eq!(cookie.max_age(), 3600);
}

#[test]
fn test_serialize_minimal() {
    assert_eq!(Cookie::new("k", "v").serialize(), "k=v");
}

#[test]
fn test_serialize_full_attribute_order() {
    let mut cookie = Cookie::new("sessionid", "abc");
    cookie.set_domain("example.com");
    cookie.set_path("/");
    cookie.set_expired(1700000000);
    cookie.set_max_age(86400);
    cookie.set_secure(true);
    cookie.set_httponly(true);

    assert_eq!(
        cookie.serialize(),
        "sessionid=abc ;Domain=example.com ;Path=/ ;Expires=1700000000 ;Max-Age=86400 ;Secure ;HttpOnly"
    );
}

#[test]
fn test_serialize_partial_attributes() {
    let mut cookie = Cookie::new("a", "1");
    cookie.set_path("/");
    cookie.set_httponly(true);
    assert_eq!(cookie.serialize(), "a=1 ;Path=/ ;HttpOnly");
}

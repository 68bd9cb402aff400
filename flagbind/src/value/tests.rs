//! Unit tests for literal conversion and slot write-through.

use std::path::PathBuf;

use rstest::rstest;

use super::{FlagValue, Slot, Value};

#[rstest]
#[case("1", true)]
#[case("t", true)]
#[case("TRUE", true)]
#[case("true", true)]
#[case("0", false)]
#[case("F", false)]
#[case("False", false)]
fn bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: bool) {
    let mut value = !expected;
    value.assign(raw, true).expect("valid bool literal");
    assert_eq!(value, expected);
}

#[test]
fn bool_rejects_other_words() {
    let mut value = false;
    let err = value.assign("yes", true).expect_err("yes is not a bool");
    assert_eq!(err.type_name, "bool");
    assert_eq!(err.value, "yes");
}

#[test]
fn integer_error_keeps_parse_int_source() {
    let mut value = 0_u16;
    let err = value.assign("70000", true).expect_err("out of range");
    assert!(err.source.downcast_ref::<std::num::ParseIntError>().is_some());
    assert_eq!(err.to_string(), format!("invalid uint16 value \"70000\": {}", err.source));
}

#[rstest]
#[case::int("-12", "-12")]
#[case::float("2.5", "2.5")]
fn scalars_render_their_literal(#[case] raw: &str, #[case] expected: &str) {
    let mut float = 0.0_f64;
    let mut int = 0_i64;
    if raw.contains('.') {
        float.assign(raw, true).expect("float literal");
        assert_eq!(float.render(), expected);
    } else {
        int.assign(raw, true).expect("int literal");
        assert_eq!(int.render(), expected);
    }
}

#[test]
fn list_replaces_then_appends_through_slot() {
    let mut hosts = vec![String::from("stale")];
    {
        let mut slot = Slot::new(&mut hosts);
        slot.set_default("a, b").expect("default list");
        slot.set("c").expect("first command-line value");
        slot.set("d,e").expect("second command-line value");
        assert_eq!(slot.render(), "c,d,e");
        assert!(slot.is_list());
        assert_eq!(slot.type_name(), "strings");
    }
    assert_eq!(hosts, ["c", "d", "e"]);
}

#[test]
fn empty_list_literal_clears() {
    let mut ports = vec![1_u16, 2];
    ports.assign("", true).expect("empty list");
    assert!(ports.is_empty());
}

#[test]
fn list_error_leaves_previous_contents() {
    let mut ports = vec![80_u16];
    let err = ports.assign("8080,http", true).expect_err("http is not a port");
    assert_eq!(err.value, "http");
    assert_eq!(ports, [80]);
}

#[rstest]
#[case("", None)]
#[case("7", Some(7))]
fn option_treats_empty_as_none(#[case] raw: &str, #[case] expected: Option<u8>) {
    let mut value = Some(1_u8);
    value.assign(raw, true).expect("option literal");
    assert_eq!(value, expected);
}

#[test]
fn optional_bool_is_a_bool_flag() {
    let value: Option<bool> = None;
    assert!(value.is_bool());
    assert!(!Vec::<bool>::new().is_bool());
}

#[test]
fn path_round_trips() {
    let mut path = PathBuf::new();
    path.assign("/etc/app.toml", true).expect("path literal");
    assert_eq!(path.render(), "/etc/app.toml");
    assert_eq!(path.type_name(), "path");
}

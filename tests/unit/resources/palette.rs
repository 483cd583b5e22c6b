use super::*;

#[test]
fn known_schemes_are_non_empty() {
    for name in scheme_names() {
        let colors = scheme(name).unwrap();
        assert!(!colors.is_empty(), "{name}");
    }
}

#[test]
fn lookup_ignores_case() {
    assert_eq!(scheme("Pastel"), scheme("pastel"));
    assert!(scheme(" neon ").is_some());
}

#[test]
fn unknown_scheme_falls_back_to_mid_gray() {
    assert!(scheme("no-such-scheme").is_none());
    assert_eq!(scheme_or_gray("no-such-scheme"), &[Rgb8::MID_GRAY]);
}

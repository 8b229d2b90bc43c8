#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use qualname_transform::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
filter:
  patern: "mypkg.*" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.filter.pattern, None);
    assert!(!cfg.filter.to_filter().unwrap().allows("anything"));
}

#[test]
fn ok_with_pattern() {
    let ok = r#"
version: 1
filter:
  pattern: "mypkg.*"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let filter = cfg.filter.to_filter().unwrap();
    assert!(filter.allows("mypkg.Widget"));
    assert!(!filter.allows("otherpkg.Widget"));
}

#[test]
fn empty_pattern_is_rejected() {
    let err = config::load_from_str("version: 1\nfilter:\n  pattern: \"\"\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn unterminated_class_is_rejected() {
    let err = config::load_from_str("version: 1\nfilter:\n  pattern: \"pkg.[ab\"\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
    assert!(err.to_string().contains("unsupported config version"));
}

#[test]
fn activation_is_scoped() {
    let cfg = config::load_from_str("version: 1\nfilter:\n  pattern: \"mypkg.*\"\n").unwrap();
    {
        let _scope = cfg.filter.activate().unwrap();
        assert!(qualname_transform::FilterGuard::check("mypkg.Widget").is_ok());
    }
    assert!(qualname_transform::FilterGuard::check("mypkg.Widget").is_err());
}

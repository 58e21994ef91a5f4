use super::Harness;
use crate::attributes::{AssignOp, ParsingErrorReason, Section};

#[test]
fn string_values_are_copied_verbatim() {
    let mut h = Harness::new();
    h.set("id", &["telnet-stream"]).unwrap();
    h.set("banner", &["/etc/issue.net"]).unwrap();
    h.set("banner_success", &["/etc/motd"]).unwrap();
    h.set("banner_fail", &["/etc/go away"]).unwrap();
    assert_eq!(h.record.id.as_deref(), Some("telnet-stream"));
    assert_eq!(h.record.banner.as_deref(), Some("/etc/issue.net"));
    assert_eq!(h.record.banner_success.as_deref(), Some("/etc/motd"));
    assert_eq!(h.record.banner_fail.as_deref(), Some("/etc/go away"));
}

#[test]
fn string_values_take_exactly_one_token() {
    let mut h = Harness::new();
    h.set("id", &["ftp"]).unwrap();
    h.set("banner", &["/etc/issue"]).unwrap();

    for name in ["id", "banner", "banner_success", "banner_fail"] {
        assert!(
            matches!(h.set(name, &[]), Err(ParsingErrorReason::MissingValue(_))),
            "{name}"
        );
        assert!(
            matches!(
                h.set(name, &["a", "b"]),
                Err(ParsingErrorReason::WrongValueCount { .. })
            ),
            "{name}"
        );
    }
    assert_eq!(h.record.id.as_deref(), Some("ftp"));
    assert_eq!(h.record.banner.as_deref(), Some("/etc/issue"));
    assert_eq!(h.record.banner_success, None);
    assert_eq!(h.record.banner_fail, None);
}

#[test]
fn string_values_reject_modifiers() {
    let mut h = Harness::new();
    h.set("banner", &["/etc/issue"]).unwrap();
    assert!(matches!(
        h.add("banner", &["/etc/motd"]),
        Err(ParsingErrorReason::UnsupportedOperator(_, AssignOp::Add))
    ));
    assert!(matches!(
        h.remove("id", &["ftp"]),
        Err(ParsingErrorReason::UnsupportedOperator(_, AssignOp::Remove))
    ));
    assert_eq!(h.record.banner.as_deref(), Some("/etc/issue"));
    assert_eq!(h.record.id, None);
}

#[test]
fn banners_are_allowed_in_defaults() {
    let mut h = Harness::new();
    for name in ["banner", "banner_success", "banner_fail"] {
        h.apply_in(Section::Defaults, name, AssignOp::Set, &["/etc/issue"])
            .unwrap();
    }
    assert_eq!(h.record.banner_fail.as_deref(), Some("/etc/issue"));
    assert!(matches!(
        h.apply_in(Section::Defaults, "id", AssignOp::Set, &["x"]),
        Err(ParsingErrorReason::WrongSection(_, Section::Defaults))
    ));
}

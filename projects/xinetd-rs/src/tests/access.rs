use super::Harness;
use crate::addrlist::AddressEntry;
use crate::attributes::{AssignOp, ParsingErrorReason, Section};
use crate::timex::TimeInterval;

fn entries(list: Option<&crate::addrlist::AddressList>) -> Vec<AddressEntry> {
    list.map(|l| l.entries().to_vec()).unwrap_or_default()
}

#[test]
fn only_from_operators() {
    let mut h = Harness::new();
    h.set("only_from", &["10.0.0.0", "192.168.1.0/24"]).unwrap();
    h.add("only_from", &[".example.org"]).unwrap();
    assert_eq!(entries(h.record.only_from.as_ref()).len(), 3);

    h.remove("only_from", &["10.0.0.0"]).unwrap();
    let list = h.record.only_from.as_ref().unwrap();
    assert!(!list.matches_addr(&"10.1.1.1".parse().unwrap()));
    assert!(list.matches_addr(&"192.168.1.20".parse().unwrap()));

    // `=` after `+=` replaces the whole list
    h.set("only_from", &["172.16.0.0/12"]).unwrap();
    assert_eq!(
        entries(h.record.only_from.as_ref()),
        vec![AddressEntry::Net {
            addr: "172.16.0.0".parse().unwrap(),
            prefix: 12
        }]
    );
}

#[test]
fn bad_address_keeps_the_list() {
    let mut h = Harness::new();
    h.set("no_access", &["198.51.100.7"]).unwrap();
    let before = entries(h.record.no_access.as_ref());

    assert!(matches!(
        h.add("no_access", &["203.0.113.0/24", "10.0.0.0/40"]),
        Err(ParsingErrorReason::InvalidValue(_, _))
    ));
    assert_eq!(entries(h.record.no_access.as_ref()), before);

    assert!(h.set("no_access", &["not a host!"]).is_err());
    assert_eq!(entries(h.record.no_access.as_ref()), before);
}

#[test]
fn access_times() {
    let mut h = Harness::new();
    h.set("access_times", &["08:00-12:00", "13:00-17:30"]).unwrap();
    h.add("access_times", &["20:00-21:00"]).unwrap();
    h.remove("access_times", &["13:00-17:30"]).unwrap();
    assert_eq!(
        h.record.access_times,
        Some(vec![
            TimeInterval::parse("08:00-12:00").unwrap(),
            TimeInterval::parse("20:00-21:00").unwrap(),
        ])
    );

    h.set("access_times", &["00:00-23:59"]).unwrap();
    assert_eq!(h.record.access_times.as_ref().map(Vec::len), Some(1));

    assert!(matches!(
        h.set("access_times", &[]),
        Err(ParsingErrorReason::MissingValue(_))
    ));
    assert!(h.add("access_times", &["09:00-10:00", "25:00-26:00"]).is_err());
    assert!(h.set("access_times", &["17:00-08:00"]).is_err());
    assert_eq!(h.record.access_times.as_ref().map(Vec::len), Some(1));
}

#[test]
fn service_lists_in_defaults() {
    let mut h = Harness::new();
    h.apply_in(Section::Defaults, "disabled", AssignOp::Set, &["finger", "rsh"])
        .unwrap();
    h.apply_in(Section::Defaults, "disabled", AssignOp::Add, &["rexec", "finger"])
        .unwrap();
    h.apply_in(Section::Defaults, "disabled", AssignOp::Remove, &["rsh"])
        .unwrap();
    assert_eq!(
        h.record.disabled_services,
        Some(vec![
            "finger".to_owned(),
            "rexec".to_owned(),
            "finger".to_owned()
        ])
    );

    h.apply_in(Section::Defaults, "enabled", AssignOp::Set, &["no-such-service"])
        .unwrap();
    assert_eq!(
        h.record.enabled_services,
        Some(vec!["no-such-service".to_owned()])
    );
}

#[test]
fn defaults_only_attributes_in_a_service() {
    let mut h = Harness::new();
    assert!(matches!(
        h.set("enabled", &["telnet"]),
        Err(ParsingErrorReason::WrongSection(_, Section::Service))
    ));
    assert!(matches!(
        h.apply_in(Section::Defaults, "server", AssignOp::Set, &["/bin/true"]),
        Err(ParsingErrorReason::WrongSection(_, Section::Defaults))
    ));
    assert_eq!(h.record.enabled_services, None);
}
